//! Background port-list fetch

use std::sync::Arc;

use tokio::sync::mpsc;

use sermon_channel::PortSource;
use sermon_core::ResultExt;

use crate::message::Message;
use crate::selectors::FetchOrigin;

pub(super) fn spawn_port_fetch<S>(origin: FetchOrigin, source: Arc<S>, msg_tx: mpsc::Sender<Message>)
where
    S: PortSource + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let result = source
            .list_ports()
            .await
            .with_context(|| format!("Port list fetch ({origin:?})"))
            .map_err(|e| e.to_string());
        let _ = msg_tx.send(Message::PortsFetched { origin, result }).await;
    });
}
