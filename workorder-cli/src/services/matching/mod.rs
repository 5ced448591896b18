// Matching service for resolving free-text references
//
// Collaborator and service names typed into spreadsheets are resolved
// against canonical registries. Pure logic, no I/O, reusable from the
// import engine and the CLI alike.

pub mod core;
pub mod models;

// Re-export commonly used types
pub use self::core::{NameIndex, normalize_name, strip_accents};
pub use models::{MatchOutcome, MatchType};
