//! CSV snapshot folder adapter.

use crate::domain::database::Database;
use crate::domain::error::SnapdbError;
use crate::domain::transaction::{INSTRUMENT_ID_COLUMN, SNAPSHOT_COLUMNS, TransactionRow};
use crate::ports::snapshot_port::{RowScan, SnapshotPort};
use chrono::NaiveDate;
use csv::StringRecord;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct CsvSnapshotAdapter {
    base_path: PathBuf,
}

impl CsvSnapshotAdapter {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn open(&self, file_name: &str) -> Result<(csv::Reader<File>, StringRecord), SnapdbError> {
        let path = self.base_path.join(file_name);
        let file = File::open(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SnapdbError::not_found(format!("snapshot file {}", path.display())),
            _ => SnapdbError::Io(e),
        })?;

        // Field counts are checked per row. Long lines are dropped, short ones read as blank-padded.
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
        let headers = reader
            .headers()
            .map_err(|e| SnapdbError::Csv {
                file: file_name.to_string(),
                reason: e.to_string(),
            })?
            .clone();
        Ok((reader, headers))
    }

    /// Next record, skipping undecodable lines. `None` at end of file.
    fn next_record(
        reader: &mut csv::Reader<File>,
        record: &mut StringRecord,
        file_name: &str,
        dropped: &mut usize,
    ) -> Result<bool, SnapdbError> {
        loop {
            match reader.read_record(record) {
                Ok(more) => return Ok(more),
                Err(e) if matches!(e.kind(), csv::ErrorKind::Utf8 { .. }) => {
                    log::debug!("{}: undecodable row: {}", file_name, e);
                    *dropped += 1;
                }
                Err(e) => {
                    return Err(SnapdbError::Csv {
                        file: file_name.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }
}

impl SnapshotPort for CsvSnapshotAdapter {
    fn list_entries(&self) -> Result<Vec<String>, SnapdbError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            SnapdbError::not_found(format!(
                "snapshot folder {} ({})",
                self.base_path.display(),
                e
            ))
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn read_instrument_ids(&self, file_name: &str) -> Result<RowScan<String>, SnapdbError> {
        let (mut reader, headers) = self.open(file_name)?;
        let id_index = column_index(&headers, INSTRUMENT_ID_COLUMN, file_name)?;

        let mut scan = RowScan::default();
        let mut record = StringRecord::new();
        while Self::next_record(&mut reader, &mut record, file_name, &mut scan.dropped)? {
            if record.len() > headers.len() {
                scan.dropped += 1;
                continue;
            }
            match record.get(id_index).map(str::trim) {
                Some(id) if !id.is_empty() => scan.rows.push(id.to_string()),
                _ => scan.dropped += 1,
            }
        }
        Ok(scan)
    }

    fn read_transactions(
        &self,
        file_name: &str,
        instrument_id: &str,
        date: NaiveDate,
    ) -> Result<RowScan<TransactionRow>, SnapdbError> {
        let (mut reader, headers) = self.open(file_name)?;
        let schema = SnapshotSchema::from_headers(&headers, file_name)?;

        let mut scan = RowScan::default();
        let mut record = StringRecord::new();
        while Self::next_record(&mut reader, &mut record, file_name, &mut scan.dropped)? {
            if record.get(schema.instrument_id()).map(str::trim) != Some(instrument_id) {
                continue;
            }
            if record.len() > headers.len() {
                scan.dropped += 1;
                continue;
            }
            match schema.parse_row(&record, date) {
                Ok(row) => scan.rows.push(row),
                Err(reason) => {
                    log::debug!("{}: dropping row for {}: {}", file_name, instrument_id, reason);
                    scan.dropped += 1;
                }
            }
        }
        Ok(scan)
    }
}

impl Database<CsvSnapshotAdapter> {
    /// Database over the CSV snapshots in `folder`.
    pub fn open(name: impl Into<String>, folder: impl Into<PathBuf>) -> Self {
        Database::new(name, CsvSnapshotAdapter::new(folder))
    }
}

fn column_index(headers: &StringRecord, column: &str, file_name: &str) -> Result<usize, SnapdbError> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| SnapdbError::MissingColumn {
            file: file_name.to_string(),
            column: column.to_string(),
        })
}

/// Positions of the snapshot columns within one file's header.
struct SnapshotSchema {
    indices: [usize; SNAPSHOT_COLUMNS.len()],
}

impl SnapshotSchema {
    fn from_headers(headers: &StringRecord, file_name: &str) -> Result<Self, SnapdbError> {
        let mut indices = [0; SNAPSHOT_COLUMNS.len()];
        for (slot, column) in indices.iter_mut().zip(SNAPSHOT_COLUMNS) {
            *slot = column_index(headers, column, file_name)?;
        }
        Ok(Self { indices })
    }

    fn instrument_id(&self) -> usize {
        self.indices[0]
    }

    fn field<'r>(&self, record: &'r StringRecord, column: usize) -> &'r str {
        record.get(self.indices[column]).unwrap_or("").trim()
    }

    fn float(&self, record: &StringRecord, column: usize) -> Result<f64, String> {
        parse_float(self.field(record, column))
            .map_err(|e| format!("{}: {}", SNAPSHOT_COLUMNS[column], e))
    }

    fn int(&self, record: &StringRecord, column: usize) -> Result<Option<i64>, String> {
        parse_int(self.field(record, column))
            .map_err(|e| format!("{}: {}", SNAPSHOT_COLUMNS[column], e))
    }

    fn parse_row(&self, record: &StringRecord, date: NaiveDate) -> Result<TransactionRow, String> {
        Ok(TransactionRow {
            date,
            instrument_id: self.field(record, 0).to_string(),
            update_time: self.field(record, 1).to_string(),
            update_millisec: self.int(record, 2)?,
            last_price: self.float(record, 3)?,
            volume: self.int(record, 4)?,
            open_interest: self.float(record, 5)?,
            bid_price1: self.float(record, 6)?,
            bid_volume1: self.int(record, 7)?,
            ask_price1: self.float(record, 8)?,
            ask_volume1: self.int(record, 9)?,
            upper_limit_price: self.float(record, 10)?,
            lower_limit_price: self.float(record, 11)?,
            open_price: self.float(record, 12)?,
            close_price: self.float(record, 13)?,
            highest_price: self.float(record, 14)?,
            lowest_price: self.float(record, 15)?,
            second_of_day: self.int(record, 16)?,
            turnover: self.float(record, 17)?,
        })
    }
}

fn parse_float(value: &str) -> Result<f64, String> {
    if value.is_empty() {
        return Ok(f64::NAN);
    }
    value
        .parse()
        .map_err(|e| format!("invalid number {:?}: {}", value, e))
}

/// Integers may be written as integral floats (`"120.0"`). Blank is `None`.
fn parse_int(value: &str) -> Result<Option<i64>, String> {
    if value.is_empty() {
        return Ok(None);
    }
    if let Ok(v) = value.parse::<i64>() {
        return Ok(Some(v));
    }
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 => Ok(Some(v as i64)),
        _ => Err(format!("invalid integer {:?}", value)),
    }
}
