//! snapdb: read-only access to folders of daily CSV snapshot files.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;

pub use domain::assembler::{FileDatePolicy, RecordLookup};
pub use domain::catalog::DateSpan;
pub use domain::database::Database;
pub use domain::error::SnapdbError;
pub use domain::transaction::TransactionRow;
