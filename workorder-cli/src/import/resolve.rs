//! Turn a classified batch and an operator strategy into operations

use crate::import::types::{ClassifiedBatch, DuplicateStrategy, ImportOperation};

/// Build the ordered operation list for a strategy.
///
/// Creates for every new draft come first; with
/// [`DuplicateStrategy::ReplaceDuplicates`] one update per duplicate follows,
/// targeting the persisted id captured at classification time.
pub fn resolve(batch: &ClassifiedBatch, strategy: DuplicateStrategy) -> Vec<ImportOperation> {
    let mut operations: Vec<ImportOperation> = batch
        .new
        .iter()
        .cloned()
        .map(ImportOperation::create)
        .collect();

    match strategy {
        DuplicateStrategy::SkipDuplicates => {
            if batch.has_duplicates() {
                log::info!("Skipping {} duplicate work orders", batch.duplicate.len());
            }
        }
        DuplicateStrategy::ReplaceDuplicates => {
            operations.extend(
                batch
                    .duplicate
                    .iter()
                    .map(|dup| ImportOperation::update(dup.existing_id.clone(), dup.draft.clone())),
            );
        }
    }

    log::debug!("Resolved {} operations with strategy {}", operations.len(), strategy);
    operations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::classify::classify;
    use crate::import::types::{ExistingIndex, OperationKind, WorkOrderDraft};
    use chrono::NaiveDate;

    fn draft(row: usize, identifier: &str) -> WorkOrderDraft {
        WorkOrderDraft::new(row, identifier, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())
    }

    fn batch() -> ClassifiedBatch {
        let existing = ExistingIndex::from_pairs(vec![("OT-10", "persisted-10")]);
        classify(
            vec![draft(2, "OT-10"), draft(3, "OT-11"), draft(4, "OT-10")],
            &existing,
        )
    }

    #[test]
    fn test_skip_creates_only_new() {
        let ops = resolve(&batch(), DuplicateStrategy::SkipDuplicates);

        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].kind(), OperationKind::Create);
        assert_eq!(ops[0].identifier(), "OT-11");
        assert!(ops.iter().all(|op| op.identifier() != "OT-10"));
    }

    #[test]
    fn test_replace_updates_each_duplicate_once() {
        let ops = resolve(&batch(), DuplicateStrategy::ReplaceDuplicates);

        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].describe(), "Create OT-11");
        match &ops[1] {
            ImportOperation::Update { existing_id, draft } => {
                assert_eq!(existing_id, "persisted-10");
                assert_eq!(draft.row, 2);
            }
            other => panic!("expected update, got {:?}", other),
        }
        let updates = ops
            .iter()
            .filter(|op| op.identifier() == "OT-10")
            .count();
        assert_eq!(updates, 1);
    }

    #[test]
    fn test_operation_count_matches_strategy() {
        let existing = ExistingIndex::from_pairs(vec![("A", "1"), ("B", "2")]);
        let batch = classify(
            vec![draft(2, "A"), draft(3, "B"), draft(4, "C")],
            &existing,
        );

        assert_eq!(resolve(&batch, DuplicateStrategy::SkipDuplicates).len(), batch.new.len());
        assert_eq!(
            resolve(&batch, DuplicateStrategy::ReplaceDuplicates).len(),
            batch.new.len() + batch.duplicate.len()
        );
    }
}
