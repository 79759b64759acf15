//! Repeating timer behind the timed-send mode.
//!
//! The single entry point is [`spawn_timed_send_timer`], called from
//! `handle_action` for `StartTimedSend`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use crate::message::Message;
use crate::timed_send::JobId;

/// Spawn the timer task for `job_id`.
///
/// The shutdown channel is created outside the task so both the sender and
/// the `JoinHandle` can be packaged into `TimedSendStarted`. The handle goes
/// through an `Arc<Mutex<Option<_>>>` slot that is filled right after
/// `tokio::spawn` returns, before the task reaches its first await.
///
/// The task posts `TimedSendTick` every `interval_ms`, first one full
/// interval after it starts, until:
/// - the shutdown channel receives `true` (or its sender is dropped), or
/// - `msg_tx` is closed (engine shutting down).
pub(super) fn spawn_timed_send_timer(
    job_id: JobId,
    interval_ms: u64,
    msg_tx: mpsc::Sender<Message>,
) {
    let period = Duration::from_millis(interval_ms);

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    // Arc because Message derives Clone and watch::Sender does not.
    let shutdown_tx = Arc::new(shutdown_tx);

    let task_handle_slot: Arc<Mutex<Option<JoinHandle<()>>>> = Arc::new(Mutex::new(None));
    let task_handle_for_msg = task_handle_slot.clone();

    let join_handle = tokio::spawn(async move {
        if msg_tx
            .send(Message::TimedSendStarted {
                job_id,
                shutdown_tx,
                task_handle: task_handle_for_msg,
            })
            .await
            .is_err()
        {
            return;
        }

        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if msg_tx.send(Message::TimedSendTick { job_id }).await.is_err() {
                        break;
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
        debug!("Timed send timer for job {} stopped", job_id);
    });

    if let Ok(mut slot) = task_handle_slot.lock() {
        *slot = Some(join_handle);
    };
}
