//! Conflict classification against existing work orders

use std::collections::HashMap;

use crate::import::types::{ClassifiedBatch, DuplicateDraft, ExistingIndex, RepeatedRow, WorkOrderDraft};

/// Partition validated drafts into new and duplicate, in input order.
///
/// When several drafts share an identifier, only the first is classified and
/// the rest are reported as repeated, so each identifier ends up in at most
/// one operation.
pub fn classify(drafts: Vec<WorkOrderDraft>, existing: &ExistingIndex) -> ClassifiedBatch {
    let mut batch = ClassifiedBatch::default();
    let mut first_seen: HashMap<String, usize> = HashMap::new();

    for draft in drafts {
        let key = draft.key().to_string();

        if let Some(first_row) = first_seen.get(&key) {
            log::warn!(
                "Row {}: identifier '{}' repeats row {}, ignoring",
                draft.row,
                key,
                first_row
            );
            batch.repeated.push(RepeatedRow {
                row: draft.row,
                identifier: key,
                first_row: *first_row,
            });
            continue;
        }
        first_seen.insert(key.clone(), draft.row);

        match existing.id_for(&key) {
            Some(id) => batch.duplicate.push(DuplicateDraft {
                existing_id: id.to_string(),
                draft,
            }),
            None => batch.new.push(draft),
        }
    }

    log::info!(
        "Classified {} drafts: {} new, {} duplicate, {} repeated",
        batch.total() + batch.repeated.len(),
        batch.new.len(),
        batch.duplicate.len(),
        batch.repeated.len()
    );

    batch
}
