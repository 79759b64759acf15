//! Port-list refresh and selector handlers

use std::time::Instant;

use tracing::{debug, warn};

use sermon_core::PortListResponse;

use crate::selectors::{FetchOrigin, PendingRefresh};
use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

pub(crate) fn handle_refresh_ports(state: &mut AppState) -> UpdateResult {
    if !state.enablement().refresh {
        return UpdateResult::none();
    }
    // One fetch at a time; its result restores the status from before it.
    if state.ports.pending_refresh.is_some() {
        debug!("Refresh already in flight");
        return UpdateResult::none();
    }

    let status_before = state.status.text().to_string();
    state.status.set("Refreshing port list...");
    state.ports.pending_refresh = Some(PendingRefresh {
        status_before,
        status_revision: state.status.revision(),
    });
    UpdateResult::action(UpdateAction::FetchPorts {
        origin: FetchOrigin::User,
    })
}

/// Apply a fetch result.
///
/// The status line is only touched if it still shows what the refresh put
/// there; transient texts revert to the status from before the refresh.
pub(crate) fn handle_ports_fetched(
    state: &mut AppState,
    origin: FetchOrigin,
    result: Result<PortListResponse, String>,
) -> UpdateResult {
    let (status_is_ours, revert_to) = match origin {
        FetchOrigin::User => match state.ports.pending_refresh.take() {
            Some(pending) => (
                pending.status_revision == state.status.revision(),
                pending.status_before,
            ),
            None => (false, String::new()),
        },
        FetchOrigin::Startup => (true, state.status.text().to_string()),
    };
    let now = Instant::now();

    match result {
        Ok(response) if response.success => {
            debug!("Fetched {} ports", response.ports.len());
            state.ports.replace(response.ports);
            if status_is_ours && origin == FetchOrigin::User {
                state.status.set("Port list has been refreshed.");
            }
        }
        Ok(response) => {
            let message = response
                .message
                .unwrap_or_else(|| "unknown error".to_string());
            warn!("Port list refresh failed: {}", message);
            if status_is_ours {
                state
                    .status
                    .set_transient(format!("Refresh failed: {message}"), revert_to, now);
            }
        }
        Err(e) => {
            warn!("Port list request failed: {}", e);
            if status_is_ours {
                state.status.set_transient(
                    "A network error occurred while refreshing.",
                    revert_to,
                    now,
                );
            }
        }
    }

    UpdateResult::none()
}

pub(crate) fn handle_select_port(state: &mut AppState, forward: bool) -> UpdateResult {
    if state.enablement().port_select {
        if forward {
            state.ports.select_next();
        } else {
            state.ports.select_previous();
        }
    }
    UpdateResult::none()
}

pub(crate) fn handle_select_baud(state: &mut AppState, forward: bool) -> UpdateResult {
    if state.enablement().baud_select {
        if forward {
            state.baud.select_next();
        } else {
            state.baud.select_previous();
        }
    }
    UpdateResult::none()
}
