//! Background jobs
//!
//! Long-running steps (checking out, importing) run as jobs on their own
//! worker thread. A job receives a [`CancellationToken`] and is expected to
//! check it between sub-steps; it is never interrupted mid-I/O.
//!
//! ```ignore
//! let queue = WorkQueue::new();
//! let handle = queue.submit("Importing projects", move |token| {
//!     if token.is_cancelled() {
//!         return JobStatus::Cancelled;
//!     }
//!     JobStatus::Success(import())
//! })?;
//! match handle.wait() { /* ... */ }
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;

use crate::error::{Result, ScmError};

/// Cooperative cancellation flag shared between a job and its owner
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Final status of a job
#[derive(Debug)]
pub enum JobStatus<T> {
    Success(T),
    Failure(ScmError),
    Cancelled,
}

impl<T> JobStatus<T> {
    pub fn state(&self) -> JobState {
        match self {
            JobStatus::Success(_) => JobState::Succeeded,
            JobStatus::Failure(_) => JobState::Failed,
            JobStatus::Cancelled => JobState::Cancelled,
        }
    }
}

impl<T> From<Result<T>> for JobStatus<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => JobStatus::Success(value),
            Err(ScmError::CheckoutCancelled) => JobStatus::Cancelled,
            Err(e) => JobStatus::Failure(e),
        }
    }
}

/// Payload-free summary of a job status, for listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Succeeded,
    Failed,
    Cancelled,
}

/// Observer notified about every job run by a [`WorkQueue`]
pub trait JobListener: Send + Sync {
    fn scheduled(&self, _name: &str) {}

    fn done(&self, name: &str, state: JobState);
}

/// Submits jobs to worker threads
#[derive(Clone, Default)]
pub struct WorkQueue {
    listeners: Vec<Arc<dyn JobListener>>,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for all subsequently submitted jobs
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn JobListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Run `job` on a new worker thread
    ///
    /// A job that panics finishes with [`JobStatus::Failure`].
    pub fn submit<T, F>(&self, name: &str, job: F) -> Result<JobHandle<T>>
    where
        T: Send + 'static,
        F: FnOnce(&CancellationToken) -> JobStatus<T> + Send + 'static,
    {
        let token = CancellationToken::new();
        let (sender, receiver) = mpsc::channel();
        let listeners = self.listeners.clone();

        for listener in &listeners {
            listener.scheduled(name);
        }

        let finished = Arc::new(AtomicBool::new(false));
        let job_finished = finished.clone();
        let job_token = token.clone();
        let job_name = name.to_string();
        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let status = if job_token.is_cancelled() {
                    JobStatus::Cancelled
                } else {
                    panic::catch_unwind(AssertUnwindSafe(|| job(&job_token))).unwrap_or_else(
                        |payload| {
                            JobStatus::Failure(ScmError::JobFailed {
                                name: job_name.clone(),
                                message: panic_message(payload.as_ref()),
                            })
                        },
                    )
                };

                tracing::debug!(job = %job_name, state = ?status.state(), "job finished");
                for listener in &listeners {
                    listener.done(&job_name, status.state());
                }
                job_finished.store(true, Ordering::SeqCst);

                // The owner may have dropped its handle; nothing to report to then.
                let _ = sender.send(status);
            })
            .map_err(|e| ScmError::JobFailed {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!(job = %name, "job scheduled");
        Ok(JobHandle {
            name: name.to_string(),
            token,
            finished,
            receiver,
        })
    }
}

/// Handle to a submitted job
pub struct JobHandle<T> {
    name: String,
    token: CancellationToken,
    finished: Arc<AtomicBool>,
    receiver: mpsc::Receiver<JobStatus<T>>,
}

impl<T> JobHandle<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Request cancellation; the job observes it at its next checkpoint
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Token shared with the job
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    /// Block until the job finishes
    pub fn wait(self) -> JobStatus<T> {
        self.receiver.recv().unwrap_or_else(|_| {
            JobStatus::Failure(ScmError::JobFailed {
                name: self.name.clone(),
                message: "worker exited without reporting a status".to_string(),
            })
        })
    }
}

/// Extract a readable message from a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingListener {
        events: Mutex<Vec<String>>,
    }

    impl JobListener for RecordingListener {
        fn scheduled(&self, name: &str) {
            self.events.lock().unwrap().push(format!("scheduled:{name}"));
        }

        fn done(&self, name: &str, state: JobState) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done:{name}:{state:?}"));
        }
    }

    #[test]
    fn test_job_success() {
        let handle = WorkQueue::new()
            .submit("answer", |_| JobStatus::Success(42))
            .unwrap();
        assert!(matches!(handle.wait(), JobStatus::Success(42)));
    }

    #[test]
    fn test_job_failure() {
        let handle = WorkQueue::new()
            .submit("failing", |_| -> JobStatus<()> {
                JobStatus::Failure(crate::error::io_error("nope"))
            })
            .unwrap();
        assert!(matches!(handle.wait(), JobStatus::Failure(ScmError::IoError { .. })));
    }

    #[test]
    fn test_job_panic_becomes_failure() {
        let handle = WorkQueue::new()
            .submit("panicking", |_| -> JobStatus<()> { panic!("kaboom") })
            .unwrap();
        match handle.wait() {
            JobStatus::Failure(ScmError::JobFailed { message, .. }) => {
                assert_eq!(message, "kaboom");
            }
            other => panic!("unexpected status: {other:?}"),
        }
    }

    #[test]
    fn test_cancellation_observed_at_checkpoint() {
        let (started_tx, started_rx) = mpsc::channel();
        let handle = WorkQueue::new()
            .submit("loop", move |token| {
                started_tx.send(()).unwrap();
                for _ in 0..500 {
                    if token.is_cancelled() {
                        return JobStatus::Cancelled;
                    }
                    thread::sleep(Duration::from_millis(10));
                }
                JobStatus::Success(())
            })
            .unwrap();

        started_rx.recv().unwrap();
        handle.cancel();
        assert!(matches!(handle.wait(), JobStatus::Cancelled));
    }

    #[test]
    fn test_listener_notified() {
        let listener = Arc::new(RecordingListener::default());
        let queue = WorkQueue::new().with_listener(listener.clone());

        let handle = queue.submit("import", |_| JobStatus::Success(())).unwrap();
        while !handle.is_finished() {
            thread::sleep(Duration::from_millis(5));
        }
        handle.wait();

        let events = listener.events.lock().unwrap().clone();
        assert_eq!(events, vec!["scheduled:import", "done:import:Succeeded"]);
    }

    #[test]
    fn test_result_conversion() {
        let status: JobStatus<()> = Err(ScmError::CheckoutCancelled).into();
        assert!(matches!(status, JobStatus::Cancelled));

        let status: JobStatus<u8> = Ok(1).into();
        assert!(matches!(status, JobStatus::Success(1)));
    }
}
