//! Timed-send handlers

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::state::AppState;
use crate::timed_send::{JobId, TimerTask};

use super::send::send_payload;
use super::{UpdateAction, UpdateResult};

pub(crate) fn handle_toggle_timed_send(state: &mut AppState) -> UpdateResult {
    if state.timed_send.is_active() {
        disable_timed_send(state);
        return UpdateResult::none();
    }

    let enabled = state
        .timed_send
        .enable(
            state.connection.state(),
            &state.send_input,
            &state.interval_input,
        )
        .map(|job| (job.id, job.interval_ms));

    match enabled {
        Ok((job_id, interval_ms)) => {
            info!("Timed send enabled every {}ms", interval_ms);
            state
                .status
                .set(format!("Sending data every {interval_ms}ms..."));
            state.settle_focus();
            UpdateResult::action(UpdateAction::StartTimedSend {
                job_id,
                interval_ms,
            })
        }
        Err(err) => {
            state.show_alert(err.to_string());
            UpdateResult::none()
        }
    }
}

/// Stop the job and restore the status for the connection state.
pub(crate) fn disable_timed_send(state: &mut AppState) {
    if state.timed_send.disable() {
        info!("Timed send disabled");
        let text = state.connection_status_text();
        state.status.set(text);
    }
    state.settle_focus();
}

pub(crate) fn handle_timed_send_started(
    state: &mut AppState,
    job_id: JobId,
    shutdown_tx: Arc<watch::Sender<bool>>,
    task_handle: Arc<Mutex<Option<JoinHandle<()>>>>,
) -> UpdateResult {
    let handle = task_handle.lock().ok().and_then(|mut slot| slot.take());
    state
        .timed_send
        .attach_task(job_id, TimerTask::new(shutdown_tx, handle));
    UpdateResult::none()
}

pub(crate) fn handle_timed_send_tick(state: &mut AppState, job_id: JobId) -> UpdateResult {
    match state.timed_send.payload_for(job_id).map(str::to_string) {
        Some(payload) => {
            send_payload(state, &payload);
        }
        None => debug!("Ignoring tick of stale timed send job {}", job_id),
    }
    UpdateResult::none()
}
