//! Snapshot folder access port.

use crate::domain::error::SnapdbError;
use crate::domain::transaction::TransactionRow;
use chrono::NaiveDate;

/// Rows kept from one file, plus how many malformed rows were dropped on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct RowScan<T> {
    pub rows: Vec<T>,
    pub dropped: usize,
}

impl<T> Default for RowScan<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            dropped: 0,
        }
    }
}

pub trait SnapshotPort {
    /// Every entry name in the snapshot folder, unfiltered and in no particular order.
    fn list_entries(&self) -> Result<Vec<String>, SnapdbError>;

    /// The `InstrumentID` of every readable row in `file_name`, in file order.
    fn read_instrument_ids(&self, file_name: &str) -> Result<RowScan<String>, SnapdbError>;

    /// Rows of `file_name` whose `InstrumentID` equals `instrument_id`, in file
    /// order, each stamped with `date`.
    fn read_transactions(
        &self,
        file_name: &str,
        instrument_id: &str,
        date: NaiveDate,
    ) -> Result<RowScan<TransactionRow>, SnapdbError>;
}
