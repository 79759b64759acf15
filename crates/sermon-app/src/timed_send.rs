//! Timed-send scheduler: one repeating send job bound to the open session.
//!
//! The scheduler only holds state. The repeating timer itself is a tokio task
//! spawned by the action layer; it posts `TimedSendTick { job_id }` messages
//! and hands its shutdown sender and `JoinHandle` back through
//! `TimedSendStarted`.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use sermon_core::ConnectionState;

use crate::validation::ValidationError;

/// Smallest accepted interval between two sends
pub const MIN_INTERVAL_MS: u64 = 100;

/// Identifies one enable of the scheduler.
///
/// Ticks carrying any other id are stale and ignored.
pub type JobId = u64;

/// Handles of the background timer task
#[derive(Debug)]
pub struct TimerTask {
    shutdown_tx: Arc<watch::Sender<bool>>,
    handle: Option<JoinHandle<()>>,
}

impl TimerTask {
    pub fn new(shutdown_tx: Arc<watch::Sender<bool>>, handle: Option<JoinHandle<()>>) -> Self {
        Self {
            shutdown_tx,
            handle,
        }
    }

    /// Signal shutdown and abort the task.
    pub fn stop(mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// The active repeating send
#[derive(Debug)]
pub struct TimedSendJob {
    pub id: JobId,
    /// Payload captured when the job was enabled
    pub payload: String,
    pub interval_ms: u64,
    task: Option<TimerTask>,
}

impl TimedSendJob {
    pub fn has_task(&self) -> bool {
        self.task.is_some()
    }
}

/// Parse the interval input text.
///
/// # Errors
///
/// [`ValidationError::InvalidInterval`] unless the trimmed text is an integer
/// of at least [`MIN_INTERVAL_MS`].
pub fn validate_interval(text: &str) -> Result<u64, ValidationError> {
    match text.trim().parse::<u64>() {
        Ok(ms) if ms >= MIN_INTERVAL_MS => Ok(ms),
        _ => Err(ValidationError::InvalidInterval),
    }
}

/// Owner of the (at most one) [`TimedSendJob`]
#[derive(Debug, Default)]
pub struct TimedSendScheduler {
    job: Option<TimedSendJob>,
    next_job_id: JobId,
}

impl TimedSendScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.job.is_some()
    }

    pub fn job(&self) -> Option<&TimedSendJob> {
        self.job.as_ref()
    }

    /// Validate and create a job. The caller starts the timer for the
    /// returned id.
    ///
    /// Checks run in order: connected, payload, interval. Any running job is
    /// stopped first.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`ValidationError`]; the scheduler is left
    /// disabled.
    pub fn enable(
        &mut self,
        state: ConnectionState,
        payload: &str,
        interval_text: &str,
    ) -> Result<&TimedSendJob, ValidationError> {
        self.disable();

        if !state.is_connected() {
            return Err(ValidationError::NotConnected);
        }
        if payload.is_empty() {
            return Err(ValidationError::EmptyPayload);
        }
        let interval_ms = validate_interval(interval_text)?;

        self.next_job_id += 1;
        let job = self.job.insert(TimedSendJob {
            id: self.next_job_id,
            payload: payload.to_string(),
            interval_ms,
            task: None,
        });
        debug!("Timed send job {} enabled every {}ms", job.id, interval_ms);
        Ok(job)
    }

    /// Attach the running timer to its job.
    ///
    /// A task for a job that is no longer current is stopped immediately.
    /// Returns `true` if the task was attached.
    pub fn attach_task(&mut self, job_id: JobId, task: TimerTask) -> bool {
        match self.job.as_mut() {
            Some(job) if job.id == job_id && job.task.is_none() => {
                job.task = Some(task);
                true
            }
            _ => {
                debug!("Stopping timer for stale timed send job {}", job_id);
                task.stop();
                false
            }
        }
    }

    /// Payload to send for a tick, or `None` if the tick is stale.
    pub fn payload_for(&self, job_id: JobId) -> Option<&str> {
        self.job
            .as_ref()
            .filter(|job| job.id == job_id)
            .map(|job| job.payload.as_str())
    }

    /// Cancel the timer and destroy the job. Idempotent.
    ///
    /// Returns `true` if a job was running.
    pub fn disable(&mut self) -> bool {
        let Some(mut job) = self.job.take() else {
            return false;
        };
        if let Some(task) = job.task.take() {
            task.stop();
        }
        debug!("Timed send job {} disabled", job.id);
        true
    }
}
