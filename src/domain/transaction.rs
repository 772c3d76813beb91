//! Transaction row representation.

use crate::domain::naming::format_iso_date;
use chrono::NaiveDate;

pub const DATE_COLUMN: &str = "Date";
pub const INSTRUMENT_ID_COLUMN: &str = "InstrumentID";

/// Columns every snapshot file must carry, in canonical order.
pub const SNAPSHOT_COLUMNS: [&str; 18] = [
    INSTRUMENT_ID_COLUMN,
    "UpdateTime",
    "UpdateMillisec",
    "LastPrice",
    "Volume",
    "OpenInterest",
    "BidPrice1",
    "BidVolume1",
    "AskPrice1",
    "AskVolume1",
    "UpperLimitPrice",
    "LowerLimitPrice",
    "OpenPrice",
    "ClosePrice",
    "HighestPrice",
    "LowestPrice",
    "SecondOfDay",
    "Turnover",
];

/// One instrument's snapshot line, stamped with the date of the file it came from.
///
/// Blank cells are kept: prices as NaN, counts as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRow {
    pub date: NaiveDate,
    pub instrument_id: String,
    pub update_time: String,
    pub update_millisec: Option<i64>,
    pub last_price: f64,
    pub volume: Option<i64>,
    pub open_interest: f64,
    pub bid_price1: f64,
    pub bid_volume1: Option<i64>,
    pub ask_price1: f64,
    pub ask_volume1: Option<i64>,
    pub upper_limit_price: f64,
    pub lower_limit_price: f64,
    pub open_price: f64,
    pub close_price: f64,
    pub highest_price: f64,
    pub lowest_price: f64,
    pub second_of_day: Option<i64>,
    pub turnover: f64,
}

impl TransactionRow {
    /// Output header: `Date` followed by [`SNAPSHOT_COLUMNS`].
    pub fn header() -> Vec<&'static str> {
        std::iter::once(DATE_COLUMN)
            .chain(SNAPSHOT_COLUMNS)
            .collect()
    }

    /// Field values in [`TransactionRow::header`] order.
    pub fn to_fields(&self) -> Vec<String> {
        vec![
            format_iso_date(self.date),
            self.instrument_id.clone(),
            self.update_time.clone(),
            format_count(self.update_millisec),
            format_price(self.last_price),
            format_count(self.volume),
            format_price(self.open_interest),
            format_price(self.bid_price1),
            format_count(self.bid_volume1),
            format_price(self.ask_price1),
            format_count(self.ask_volume1),
            format_price(self.upper_limit_price),
            format_price(self.lower_limit_price),
            format_price(self.open_price),
            format_price(self.close_price),
            format_price(self.highest_price),
            format_price(self.lowest_price),
            format_count(self.second_of_day),
            format_price(self.turnover),
        ]
    }
}

// Blank cells come back out blank.
fn format_price(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

fn format_count(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
