//! Work-order spreadsheet import engine
//!
//! Data flows through the stages in order:
//! headers -> normalize (dates, matching) -> classify -> resolve -> commit.
//! Everything except `excel` and the store behind `commit` is pure.

pub mod classify;
pub mod commit;
pub mod dates;
pub mod excel;
pub mod headers;
pub mod normalize;
pub mod pipeline;
pub mod resolve;
pub mod types;

pub use classify::classify;
pub use commit::{CommitConfig, CommitContext, CommitUpdate, WorkOrderStore, commit};
pub use dates::{format_iso, normalize_date, serial_to_date};
pub use excel::read_table;
pub use headers::{HeaderAliases, normalize_header, resolve_headers};
pub use normalize::{coerce_price, derive_status, normalize_row};
pub use pipeline::{ImportSnapshot, ImportSummary, PreparedImport, prepare_import};
pub use resolve::resolve;
pub use types::*;
