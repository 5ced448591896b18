//! Batch committer
//!
//! Dispatches resolved operations to a [`WorkOrderStore`], isolating failures
//! per operation, streaming progress, and honouring cancellation between
//! dispatches.

mod concurrency;
mod config;
mod executor;

pub use concurrency::WorkerLimiter;
pub use config::{CommitConfig, CommitConfigBuilder};
pub use executor::commit;

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

use crate::import::types::{OperationFailure, WorkOrderDraft};

/// Persistence capabilities the committer writes through
#[async_trait]
pub trait WorkOrderStore: Send + Sync {
    /// Insert a new work order, returning its persisted id
    async fn create(&self, draft: &WorkOrderDraft) -> anyhow::Result<String>;

    /// Overwrite the work order with the given persisted id
    async fn update(&self, id: &str, draft: &WorkOrderDraft) -> anyhow::Result<()>;
}

/// Status update sent while committing
#[derive(Debug, Clone)]
pub enum CommitUpdate {
    /// Commit started
    Started { total: usize },
    /// An operation finished (successfully or not)
    Progress { processed: usize, total: usize },
    /// An operation failed
    Failed(OperationFailure),
    /// All operations were dispatched and finished
    Completed { success_count: usize, error_count: usize },
    /// Dispatch stopped early; `skipped` operations never ran
    Cancelled { skipped: usize },
}

/// Context for a commit run
#[derive(Debug, Clone)]
pub struct CommitContext {
    /// Channel to send status updates
    pub update_tx: mpsc::Sender<CommitUpdate>,
    /// Flag to signal cancellation
    pub cancel_flag: Arc<AtomicBool>,
}

impl CommitContext {
    /// Create a new commit context
    pub fn new(update_tx: mpsc::Sender<CommitUpdate>, cancel_flag: Arc<AtomicBool>) -> Self {
        CommitContext {
            update_tx,
            cancel_flag,
        }
    }

    /// Context nobody listens to, with a private cancel flag
    #[cfg(test)]
    pub fn detached() -> Self {
        let (update_tx, _) = mpsc::channel(1);
        CommitContext::new(update_tx, Arc::new(AtomicBool::new(false)))
    }

    /// Check if cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    /// Send a status update (non-blocking)
    pub fn send_update(&self, update: CommitUpdate) {
        // Use try_send to avoid blocking if the receiver is slow
        let _ = self.update_tx.try_send(update);
    }
}
