//! Cancellable background tasks.
//!
//! Every piece of asynchronous work the screen starts (an acquisition, a
//! report, the push listener) runs as a [`CancellableTask`]: a spawned tokio
//! task paired with a [`CancellationToken`]. Cancelling the token drops the
//! inner future at its next await point, which runs any drop guards it holds.
//!
//! # Lifecycle
//!
//! 1. **Spawn**: [`CancellableTask::spawn`] or [`CancellableTask::with_token`]
//! 2. **Cancel** (optional): [`CancellableTask::cancel`]
//! 3. **Join**: [`CancellableTask::join`] yields the output, or
//!    [`TaskError::Cancelled`] if the token won the race

use std::future::Future;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Why a task produced no output.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Cancelled before completion.
    #[error("Task was cancelled")]
    Cancelled,

    /// The task panicked.
    #[error("Task panicked: {0}")]
    Panicked(String),
}

/// Handle to a spawned, cancellable unit of work.
#[derive(Debug)]
pub struct CancellableTask<T> {
    token: CancellationToken,
    handle: JoinHandle<Option<T>>,
}

impl<T: Send + 'static> CancellableTask<T> {
    /// Spawn `future` with a fresh token.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self::with_token(CancellationToken::new(), future)
    }

    /// Spawn `future`, cancelled when `token` is.
    ///
    /// Pass a child token to tie the task to a wider shutdown.
    pub fn with_token<F>(token: CancellationToken, future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = task_token.cancelled() => None,
                output = future => Some(output),
            }
        });

        Self { token, handle }
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether the task has stopped running.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// The task's token.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Wait for the task to end.
    pub async fn join(self) -> Result<T, TaskError> {
        match self.handle.await {
            Ok(Some(output)) => Ok(output),
            Ok(None) => Err(TaskError::Cancelled),
            Err(e) if e.is_cancelled() => Err(TaskError::Cancelled),
            Err(e) => Err(TaskError::Panicked(e.to_string())),
        }
    }
}
