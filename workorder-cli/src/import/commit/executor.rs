//! Operation dispatch loop

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{CommitConfig, CommitContext, CommitUpdate, WorkOrderStore, WorkerLimiter};
use crate::import::types::{ImportOperation, ImportResult, OperationFailure};

/// Commit operations through the store.
///
/// Operations are dispatched in order, at most `config.workers` at a time.
/// A failed operation never stops the batch. Cancellation is checked before
/// each dispatch; operations not dispatched are counted as skipped. Errors
/// are reported in operation order regardless of completion order.
pub async fn commit<S>(
    operations: Vec<ImportOperation>,
    store: Arc<S>,
    config: &CommitConfig,
    ctx: &CommitContext,
) -> ImportResult
where
    S: WorkOrderStore + 'static,
{
    let total = operations.len();
    let mut workers = config.effective_workers();

    if workers > 1 && !identifiers_unique(&operations) {
        log::warn!(
            "Several operations target the same work order; committing with 1 worker instead of {}",
            workers
        );
        workers = 1;
    }

    let limiter = WorkerLimiter::new(workers);
    log::info!("Committing {} operations with {} worker(s)", total, limiter.workers());
    ctx.send_update(CommitUpdate::Started { total });

    let processed = Arc::new(AtomicUsize::new(0));
    let mut pending = Vec::with_capacity(total);
    let mut skipped_count = 0;

    for (index, operation) in operations.into_iter().enumerate() {
        let permit = match limiter.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                log::error!("Stopping dispatch: {:#}", e);
                skipped_count = total - index;
                break;
            }
        };

        // Checked after acquiring so a flag raised while waiting is honoured
        if ctx.is_cancelled() {
            skipped_count = total - index;
            log::warn!("Commit cancelled, {} operations not dispatched", skipped_count);
            break;
        }

        let descriptor = OperationFailure::new(&operation, String::new());
        let store = Arc::clone(&store);
        let processed = Arc::clone(&processed);
        let task_ctx = ctx.clone();

        let handle = tokio::spawn(async move {
            let outcome = apply(&*store, &operation).await;
            drop(permit);

            let done = processed.fetch_add(1, Ordering::SeqCst) + 1;
            task_ctx.send_update(CommitUpdate::Progress {
                processed: done.min(total),
                total,
            });

            outcome.map_err(|message| {
                let failure = OperationFailure::new(&operation, message);
                log::warn!("Row {}: {}", failure.row, failure);
                task_ctx.send_update(CommitUpdate::Failed(failure.clone()));
                failure
            })
        });

        pending.push((descriptor, handle));
    }

    let mut result = ImportResult {
        skipped_count,
        ..ImportResult::default()
    };

    // Awaiting in dispatch order keeps errors in operation order
    for (descriptor, handle) in pending {
        match handle.await {
            Ok(Ok(())) => result.success_count += 1,
            Ok(Err(failure)) => {
                result.error_count += 1;
                result.errors.push(failure);
            }
            Err(e) => {
                result.error_count += 1;
                result.errors.push(OperationFailure {
                    message: format!("worker task failed: {}", e),
                    ..descriptor
                });
            }
        }
    }

    if result.was_cancelled() {
        ctx.send_update(CommitUpdate::Cancelled {
            skipped: result.skipped_count,
        });
    } else {
        ctx.send_update(CommitUpdate::Completed {
            success_count: result.success_count,
            error_count: result.error_count,
        });
    }

    log::info!(
        "Commit finished: {} succeeded, {} failed, {} skipped",
        result.success_count,
        result.error_count,
        result.skipped_count
    );

    result
}

async fn apply<S>(store: &S, operation: &ImportOperation) -> Result<(), String>
where
    S: WorkOrderStore + ?Sized,
{
    log::debug!("Dispatching {}", operation.describe());
    let outcome = match operation {
        ImportOperation::Create(draft) => store.create(draft).await.map(|id| {
            log::debug!("Created {} as {}", draft.key(), id);
        }),
        ImportOperation::Update { existing_id, draft } => store.update(existing_id, draft).await,
    };
    outcome.map_err(|e| format!("{:#}", e))
}

fn identifiers_unique(operations: &[ImportOperation]) -> bool {
    let mut seen = HashSet::with_capacity(operations.len());
    operations.iter().all(|op| seen.insert(op.identifier()))
}
