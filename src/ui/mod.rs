//! Terminal and JSON output for the CLI

pub mod error;
pub mod json;
