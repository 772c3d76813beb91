#![allow(dead_code)]

use chrono::NaiveDate;
use snapdb::domain::error::SnapdbError;
use snapdb::domain::transaction::TransactionRow;
use snapdb::ports::snapshot_port::{RowScan, SnapshotPort};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const HEADER: &str = "InstrumentID,UpdateTime,UpdateMillisec,LastPrice,Volume,OpenInterest,\
    BidPrice1,BidVolume1,AskPrice1,AskVolume1,UpperLimitPrice,LowerLimitPrice,OpenPrice,\
    ClosePrice,HighestPrice,LowestPrice,SecondOfDay,Turnover";

/// One well-formed snapshot line.
pub fn snapshot_line(id: &str, update_time: &str, last_price: f64) -> String {
    format!(
        "{id},{update_time},0,{last_price},100,2000,{bid},3,{ask},4,1.0,0.0001,{last_price},,{last_price},{last_price},34200,{turnover}",
        bid = last_price - 0.001,
        ask = last_price + 0.001,
        turnover = last_price * 100.0,
    )
}

/// A temporary snapshot folder.
pub struct SnapshotFolder {
    dir: TempDir,
}

impl SnapshotFolder {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn path_buf(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Write `file_name` with the standard header and one line per (id, price).
    pub fn with_day(self, file_name: &str, rows: &[(&str, f64)]) -> Self {
        let mut content = String::from(HEADER);
        content.push('\n');
        for (i, (id, price)) in rows.iter().enumerate() {
            let time = format!("09:30:{:02}", i % 60);
            content.push_str(&snapshot_line(id, &time, *price));
            content.push('\n');
        }
        self.with_raw(file_name, &content)
    }

    pub fn with_raw(self, file_name: &str, content: &str) -> Self {
        fs::write(self.dir.path().join(file_name), content).unwrap();
        self
    }
}

/// The two-day demo database: A and B on the 1st, A alone on the 2nd.
pub fn demo_folder() -> SnapshotFolder {
    SnapshotFolder::new()
        .with_day("demo_20200601.csv", &[("A", 1.0), ("B", 2.0)])
        .with_day("demo_20200602.csv", &[("A", 1.1)])
}

/// In-memory port that records which files were read.
pub struct MockSnapshotPort {
    pub files: HashMap<String, Vec<String>>,
    pub reads: RefCell<Vec<String>>,
}

impl MockSnapshotPort {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
            reads: RefCell::new(Vec::new()),
        }
    }

    pub fn with_file(mut self, name: &str, ids: &[&str]) -> Self {
        self.files
            .insert(name.to_string(), ids.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn read_count(&self) -> usize {
        self.reads.borrow().len()
    }

    fn ids(&self, file_name: &str) -> Result<&Vec<String>, SnapdbError> {
        self.reads.borrow_mut().push(file_name.to_string());
        self.files
            .get(file_name)
            .ok_or_else(|| SnapdbError::NotFound {
                what: file_name.to_string(),
            })
    }
}

impl SnapshotPort for MockSnapshotPort {
    fn list_entries(&self) -> Result<Vec<String>, SnapdbError> {
        Ok(self.files.keys().cloned().collect())
    }

    fn read_instrument_ids(&self, file_name: &str) -> Result<RowScan<String>, SnapdbError> {
        Ok(RowScan {
            rows: self.ids(file_name)?.clone(),
            dropped: 0,
        })
    }

    fn read_transactions(
        &self,
        file_name: &str,
        instrument_id: &str,
        date: NaiveDate,
    ) -> Result<RowScan<TransactionRow>, SnapdbError> {
        let rows = self
            .ids(file_name)?
            .iter()
            .filter(|id| id.as_str() == instrument_id)
            .map(|id| make_row(date, id, 1.0))
            .collect();
        Ok(RowScan { rows, dropped: 0 })
    }
}

pub fn make_row(date: NaiveDate, id: &str, price: f64) -> TransactionRow {
    TransactionRow {
        date,
        instrument_id: id.to_string(),
        update_time: "09:30:00".into(),
        update_millisec: Some(0),
        last_price: price,
        volume: Some(100),
        open_interest: 2000.0,
        bid_price1: price,
        bid_volume1: Some(3),
        ask_price1: price,
        ask_volume1: Some(4),
        upper_limit_price: 1.0,
        lower_limit_price: 0.0001,
        open_price: price,
        close_price: price,
        highest_price: price,
        lowest_price: price,
        second_of_day: Some(34200),
        turnover: price * 100.0,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
