//! Database handle: a name plus the snapshot source it reads from.
//!
//! Nothing is validated or read at construction; every call re-lists the
//! folder and re-reads whatever files it needs.

use crate::domain::assembler::{FileDatePolicy, RecordLookup, RecordStream, TransactionAssembler};
use crate::domain::catalog::{DateSpan, FileCatalog};
use crate::domain::error::SnapdbError;
use crate::domain::instrument_index::InstrumentIndex;
use crate::domain::report::FolderReport;
use crate::domain::transaction::TransactionRow;
use crate::ports::snapshot_port::SnapshotPort;
use chrono::NaiveDate;

pub struct Database<P> {
    name: String,
    port: P,
    policy: FileDatePolicy,
}

impl<P: SnapshotPort> Database<P> {
    pub fn new(name: impl Into<String>, port: P) -> Self {
        Self {
            name: name.into(),
            port,
            policy: FileDatePolicy::default(),
        }
    }

    pub fn with_file_date_policy(mut self, policy: FileDatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    fn catalog(&self) -> FileCatalog<'_> {
        FileCatalog::new(&self.name, &self.port)
    }

    fn index(&self) -> InstrumentIndex<'_> {
        InstrumentIndex::new(&self.name, &self.port)
    }

    fn assembler(&self) -> TransactionAssembler<'_> {
        TransactionAssembler::new(&self.name, &self.port).with_policy(self.policy)
    }

    pub fn list_files(&self) -> Result<Vec<String>, SnapdbError> {
        self.catalog().list_files()
    }

    pub fn resolve_date_range(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<Vec<String>, SnapdbError> {
        self.catalog().resolve_date_range(start, end)
    }

    /// Instrument ids across the whole catalog, or across the files of `span`.
    pub fn list_instruments(&self, span: Option<DateSpan>) -> Result<Vec<String>, SnapdbError> {
        match span {
            None => self.index().all(),
            Some(span) => self.index().in_range(span.start, span.end),
        }
    }

    pub fn get_record(
        &self,
        instrument_id: &str,
        span: Option<DateSpan>,
    ) -> Result<RecordLookup<Vec<TransactionRow>>, SnapdbError> {
        self.assembler().get_record(instrument_id, span)
    }

    pub fn stream_record(
        &self,
        instrument_id: &str,
        span: Option<DateSpan>,
    ) -> Result<RecordLookup<RecordStream<'_>>, SnapdbError> {
        self.assembler().stream_record(instrument_id, span)
    }

    pub fn folder_report(&self) -> Result<FolderReport, SnapdbError> {
        let files = self.list_files()?;
        Ok(FolderReport::from_catalog(&self.name, &files))
    }
}
