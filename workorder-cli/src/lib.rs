//! Work-order spreadsheet import and reconciliation
//!
//! Reads `.xlsx`/`.xls`/`.ods`/`.csv` exports, validates and normalizes every
//! row, classifies rows against the work orders already stored, and commits
//! the resulting create/update operations to SQLite.

pub mod cli;
pub mod config;
pub mod import;
pub mod services;
