//! Subcommand implementations

pub mod decode;
pub mod ledger;
pub mod records;
