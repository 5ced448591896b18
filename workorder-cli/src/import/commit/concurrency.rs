//! Worker limiter for commit operations
//!
//! A semaphore caps how many persistence calls run at once. Each operation
//! holds a permit for its whole lifetime and releases it when it finishes.

use anyhow::{Context, Result};
use log::debug;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Semaphore-based limiter for in-flight operations
#[derive(Debug, Clone)]
pub struct WorkerLimiter {
    semaphore: Arc<Semaphore>,
    workers: usize,
}

impl WorkerLimiter {
    /// Create a limiter allowing `workers` operations at once (at least one)
    pub fn new(workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(workers)),
            workers,
        }
    }

    /// Acquire a permit, waiting while all workers are busy.
    /// The permit is released when dropped.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit> {
        if self.available_permits() == 0 {
            debug!("Worker limiter: waiting for a free worker ({} busy)", self.workers);
        }

        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .context("Worker pool was closed")?;

        debug!(
            "Worker limiter: acquired permit ({}/{} busy)",
            self.workers - self.available_permits(),
            self.workers
        );

        Ok(permit)
    }

    /// Number of idle workers
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Configured worker count
    pub fn workers(&self) -> usize {
        self.workers
    }
}
