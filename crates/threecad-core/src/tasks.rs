//! Background work polled from the UI thread.
//!
//! Network requests and file decodes run on their own threads through
//! `poll_promise`; the app checks them once per frame and never blocks.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use poll_promise::Promise;

/// A cancellation token that can be shared between the UI and a worker
#[derive(Clone, Debug)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Monotonic request counter. Only the newest issued generation is current.
#[derive(Debug, Default, Clone, Copy)]
pub struct Generation(u64);

impl Generation {
    /// Issue the next generation
    pub fn next(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }

    pub fn current(&self) -> u64 {
        self.0
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.0 == generation
    }
}

/// A background task that panicked instead of returning
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Background task '{task}' panicked: {message}")]
pub struct TaskPanic {
    pub task: String,
    pub message: String,
}

impl TaskPanic {
    fn from_payload(task: String, payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self { task, message }
    }
}

/// A finished background task
#[derive(Debug)]
pub struct Completed<T> {
    pub generation: u64,
    pub value: Result<T, TaskPanic>,
    pub elapsed: Duration,
}

/// A background task tagged with the generation that issued it
pub struct PendingTask<T: Send + 'static> {
    generation: u64,
    started: Instant,
    promise: Promise<Result<T, TaskPanic>>,
}

impl<T: Send + 'static> PendingTask<T> {
    /// Run `work` on a named thread. A panic in `work` completes the task with a `TaskPanic`.
    pub fn spawn(name: &str, generation: u64, work: impl FnOnce() -> T + Send + 'static) -> Self {
        log::debug!("Spawning task '{}' (generation {})", name, generation);
        let task = name.to_string();
        Self {
            generation,
            started: Instant::now(),
            promise: Promise::spawn_thread(name, move || {
                panic::catch_unwind(AssertUnwindSafe(work)).map_err(|payload| {
                    let panic = TaskPanic::from_payload(task, payload.as_ref());
                    log::error!("{}", panic);
                    panic
                })
            }),
        }
    }

    /// Wrap an already available value
    #[cfg(test)]
    pub fn ready(generation: u64, value: T) -> Self {
        Self {
            generation,
            started: Instant::now(),
            promise: Promise::from_ready(Ok(value)),
        }
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Take the result if the task has finished, otherwise hand the task back
    pub fn try_complete(self) -> Result<Completed<T>, Self> {
        let generation = self.generation;
        let started = self.started;
        match self.promise.try_take() {
            Ok(value) => Ok(Completed {
                generation,
                value,
                elapsed: started.elapsed(),
            }),
            Err(promise) => Err(Self {
                generation,
                started,
                promise,
            }),
        }
    }
}

/// Poll the task in `slot`, clearing the slot once it completes
pub fn poll_slot<T: Send + 'static>(slot: &mut Option<PendingTask<T>>) -> Option<Completed<T>> {
    let task = slot.take()?;
    match task.try_complete() {
        Ok(done) => Some(done),
        Err(task) => {
            *slot = Some(task);
            None
        }
    }
}
