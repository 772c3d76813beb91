//! Transaction history assembly for a single instrument.
//!
//! Files are resolved through the catalog, the instrument is checked against
//! the whole database, then matching rows are streamed file by file, each
//! stamped with the date embedded in its filename.

use crate::domain::catalog::{DateSpan, FileCatalog};
use crate::domain::error::SnapdbError;
use crate::domain::instrument_index::InstrumentIndex;
use crate::domain::naming::parse_file_date;
use crate::domain::transaction::TransactionRow;
use crate::ports::snapshot_port::SnapshotPort;

/// What to do with a catalog file whose date segment does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileDatePolicy {
    /// Fail the whole query.
    #[default]
    Abort,
    /// Leave the file out and carry on.
    Skip,
}

/// Outcome of a record query.
///
/// `Unknown` means the instrument appears nowhere in the database. A known
/// instrument with no rows in the requested window is `Found` with nothing in it.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordLookup<T> {
    Unknown { instrument_id: String },
    Found(T),
}

impl<T> RecordLookup<T> {
    pub fn is_unknown(&self) -> bool {
        matches!(self, RecordLookup::Unknown { .. })
    }

    pub fn found(self) -> Option<T> {
        match self {
            RecordLookup::Found(value) => Some(value),
            RecordLookup::Unknown { .. } => None,
        }
    }
}

pub struct TransactionAssembler<'a> {
    name: &'a str,
    port: &'a dyn SnapshotPort,
    policy: FileDatePolicy,
}

impl<'a> TransactionAssembler<'a> {
    pub fn new(name: &'a str, port: &'a dyn SnapshotPort) -> Self {
        Self {
            name,
            port,
            policy: FileDatePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FileDatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Every row for `instrument_id` in `span` (or the whole catalog), in file
    /// order then row order.
    pub fn get_record(
        &self,
        instrument_id: &str,
        span: Option<DateSpan>,
    ) -> Result<RecordLookup<Vec<TransactionRow>>, SnapdbError> {
        let lookup = match self.stream_record(instrument_id, span)? {
            RecordLookup::Found(stream) => RecordLookup::Found(stream.collect::<Result<Vec<_>, _>>()?),
            RecordLookup::Unknown { instrument_id } => RecordLookup::Unknown { instrument_id },
        };
        if let RecordLookup::Found(rows) = &lookup {
            log::info!("{}: {} rows for {}", self.name, rows.len(), instrument_id);
        }
        Ok(lookup)
    }

    /// Same as [`get_record`](Self::get_record) but reads files lazily.
    ///
    /// Catalog resolution and the existence check run up front, so structural
    /// errors and `Unknown` surface before any row is produced.
    pub fn stream_record(
        &self,
        instrument_id: &str,
        span: Option<DateSpan>,
    ) -> Result<RecordLookup<RecordStream<'a>>, SnapdbError> {
        let catalog = FileCatalog::new(self.name, self.port);
        let files = match span {
            None => catalog.list_files()?,
            Some(span) => catalog.resolve_date_range(span.start, span.end)?,
        };

        if !self.instrument_exists_anywhere(instrument_id)? {
            log::info!("{}: instrument {} not in database", self.name, instrument_id);
            return Ok(RecordLookup::Unknown {
                instrument_id: instrument_id.to_string(),
            });
        }

        Ok(RecordLookup::Found(RecordStream {
            name: self.name,
            port: self.port,
            instrument_id: instrument_id.to_string(),
            policy: self.policy,
            files: files.into_iter(),
            current: Vec::new().into_iter(),
            finished: false,
        }))
    }

    /// Existence is judged against the full catalog, never the query window.
    pub fn instrument_exists_anywhere(&self, instrument_id: &str) -> Result<bool, SnapdbError> {
        let all = InstrumentIndex::new(self.name, self.port).all()?;
        Ok(all.iter().any(|id| id == instrument_id))
    }
}

/// Lazily reads one file at a time. Stops after the first error.
pub struct RecordStream<'a> {
    name: &'a str,
    port: &'a dyn SnapshotPort,
    instrument_id: String,
    policy: FileDatePolicy,
    files: std::vec::IntoIter<String>,
    current: std::vec::IntoIter<TransactionRow>,
    finished: bool,
}

impl RecordStream<'_> {
    fn fail(&mut self, err: SnapdbError) -> Option<Result<TransactionRow, SnapdbError>> {
        self.finished = true;
        Some(Err(err))
    }
}

impl Iterator for RecordStream<'_> {
    type Item = Result<TransactionRow, SnapdbError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(row) = self.current.next() {
                return Some(Ok(row));
            }
            if self.finished {
                return None;
            }
            let file = self.files.next()?;

            let date = match parse_file_date(self.name, &file) {
                Ok(date) => date,
                Err(e) if self.policy == FileDatePolicy::Skip => {
                    log::warn!("skipping {}: {}", file, e);
                    continue;
                }
                Err(e) => return self.fail(e.into()),
            };

            match self.port.read_transactions(&file, &self.instrument_id, date) {
                Ok(scan) => {
                    if scan.dropped > 0 {
                        log::warn!(
                            "{}: dropped {} unreadable rows for {}",
                            file,
                            scan.dropped,
                            self.instrument_id
                        );
                    }
                    log::debug!("{}: {} rows matched", file, scan.rows.len());
                    self.current = scan.rows.into_iter();
                }
                Err(e) => return self.fail(e),
            }
        }
    }
}
