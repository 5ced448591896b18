// Business logic services layer
//
// Reusable logic shared by the import engine and the CLI.

pub mod matching;
