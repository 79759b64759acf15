//! Serial port discovery through the bridge's HTTP endpoint.

use std::time::Duration;

use url::Url;

use sermon_core::prelude::*;
use sermon_core::PortListResponse;

/// Path of the port-list endpoint relative to the server root
pub const LIST_PORTS_PATH: &str = "api/list_ports";

/// Default request timeout for a port-list fetch
pub const DEFAULT_LIST_TIMEOUT: Duration = Duration::from_secs(5);

/// Source of available serial port names
#[trait_variant::make(PortSource: Send)]
pub trait LocalPortSource {
    /// Fetch the current port list.
    ///
    /// A reply with `success == false` is still `Ok`; `Err` means the
    /// request itself failed.
    async fn list_ports(&self) -> Result<PortListResponse>;
}

/// [`PortSource`] backed by `GET {server}/api/list_ports`.
#[derive(Debug, Clone)]
pub struct HttpPortSource {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpPortSource {
    pub fn new(server_url: &Url, timeout: Duration) -> Result<Self> {
        let endpoint = server_url
            .join(LIST_PORTS_PATH)
            .map_err(|_| Error::invalid_server_url(server_url.as_str()))?;
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl PortSource for HttpPortSource {
    async fn list_ports(&self) -> Result<PortListResponse> {
        debug!("Fetching port list from {}", self.endpoint);
        let response = self
            .client
            .get(self.endpoint.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::http(e.to_string()))?;

        // The bridge answers failures with a 500 carrying the same JSON shape,
        // so the body is parsed regardless of status.
        let status = response.status();
        let body = response
            .json::<PortListResponse>()
            .await
            .map_err(|e| Error::http(format!("HTTP {status}: {e}")))?;

        if !status.is_success() {
            warn!("Port list request returned HTTP {}", status);
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::serve_http_once;

    #[test]
    fn test_endpoint_joins_server_root() {
        let server = Url::parse("http://localhost:50002").unwrap();
        let source = HttpPortSource::new(&server, DEFAULT_LIST_TIMEOUT).unwrap();
        assert_eq!(
            source.endpoint().as_str(),
            "http://localhost:50002/api/list_ports"
        );
    }

    #[tokio::test]
    async fn test_list_ports_success() {
        let url = serve_http_once(200, r#"{"success":true,"ports":["COM3","COM4"]}"#)
            .await
            .unwrap();
        let source = HttpPortSource::new(&url, DEFAULT_LIST_TIMEOUT).unwrap();
        let resp = PortSource::list_ports(&source).await.unwrap();
        assert!(resp.success);
        assert_eq!(resp.ports, vec!["COM3", "COM4"]);
    }

    #[tokio::test]
    async fn test_list_ports_parses_body_of_server_error() {
        let url = serve_http_once(
            500,
            r#"{"success":false,"message":"Access denied","ports":[]}"#,
        )
        .await
        .unwrap();
        let source = HttpPortSource::new(&url, DEFAULT_LIST_TIMEOUT).unwrap();
        let resp = PortSource::list_ports(&source).await.unwrap();
        assert!(!resp.success);
        assert_eq!(resp.message.as_deref(), Some("Access denied"));
    }

    #[tokio::test]
    async fn test_list_ports_non_json_is_http_error() {
        let url = serve_http_once(502, "<html>bad gateway</html>").await.unwrap();
        let source = HttpPortSource::new(&url, DEFAULT_LIST_TIMEOUT).unwrap();
        assert!(matches!(
            PortSource::list_ports(&source).await,
            Err(Error::Http { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_ports_unreachable_is_http_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{addr}")).unwrap();
        let source = HttpPortSource::new(&url, DEFAULT_LIST_TIMEOUT).unwrap();
        assert!(matches!(
            PortSource::list_ports(&source).await,
            Err(Error::Http { .. })
        ));
    }
}
