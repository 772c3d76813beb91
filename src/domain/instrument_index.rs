//! Distinct instrument identifiers across a set of snapshot files.

use crate::domain::catalog::FileCatalog;
use crate::domain::error::SnapdbError;
use crate::ports::snapshot_port::SnapshotPort;
use chrono::NaiveDate;
use std::collections::HashSet;

pub struct InstrumentIndex<'a> {
    catalog: FileCatalog<'a>,
    port: &'a dyn SnapshotPort,
}

impl<'a> InstrumentIndex<'a> {
    pub fn new(name: &'a str, port: &'a dyn SnapshotPort) -> Self {
        Self {
            catalog: FileCatalog::new(name, port),
            port,
        }
    }

    /// Identifiers found in `files`, in order of first appearance.
    ///
    /// Every file is read in full. Rows the port cannot read are dropped; a
    /// missing file or a file without an `InstrumentID` column is an error.
    pub fn list_instruments<S: AsRef<str>>(&self, files: &[S]) -> Result<Vec<String>, SnapdbError> {
        let mut seen = HashSet::new();
        let mut instruments = Vec::new();
        let mut dropped = 0;

        for file in files {
            let file = file.as_ref();
            let scan = self.port.read_instrument_ids(file)?;
            log::debug!("{}: {} rows scanned", file, scan.rows.len());
            dropped += scan.dropped;
            for id in scan.rows {
                if seen.insert(id.clone()) {
                    instruments.push(id);
                }
            }
        }

        if dropped > 0 {
            log::warn!(
                "dropped {} unreadable rows across {} files",
                dropped,
                files.len()
            );
        }
        Ok(instruments)
    }

    /// Identifiers across the whole catalog.
    pub fn all(&self) -> Result<Vec<String>, SnapdbError> {
        let files = self.catalog.list_files()?;
        self.list_instruments(files.as_slice())
    }

    /// Identifiers across the files covering `start..=end`.
    pub fn in_range(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<Vec<String>, SnapdbError> {
        let files = self.catalog.resolve_date_range(start, end)?;
        self.list_instruments(files.as_slice())
    }
}
