//! Daily snapshot file naming convention: `<name>_<YYYYMMDD>.csv`.

use crate::domain::error::ParseError;
use chrono::NaiveDate;

pub const COMPACT_DATE_FORMAT: &str = "%Y%m%d";
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
pub const SNAPSHOT_EXTENSION: &str = ".csv";

/// Parse an 8-digit `YYYYMMDD` date.
pub fn parse_compact_date(input: &str) -> Result<NaiveDate, ParseError> {
    if input.len() != 8 || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::new(input, "expected an 8-digit YYYYMMDD date"));
    }
    NaiveDate::parse_from_str(input, COMPACT_DATE_FORMAT)
        .map_err(|e| ParseError::new(input, format!("invalid calendar date: {e}")))
}

pub fn format_compact_date(date: NaiveDate) -> String {
    date.format(COMPACT_DATE_FORMAT).to_string()
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Filename of the snapshot for `date`. The name is always lowercased.
pub fn snapshot_file_name(name: &str, date: NaiveDate) -> String {
    format!(
        "{}_{}{}",
        name.to_lowercase(),
        format_compact_date(date),
        SNAPSHOT_EXTENSION
    )
}

/// True when the first `len(name)` characters of `entry` equal the lowercased name.
pub fn belongs_to(name: &str, entry: &str) -> bool {
    let wanted = name.to_lowercase();
    let prefix_len = name.chars().count();
    let prefix: String = entry.chars().take(prefix_len).collect();
    prefix.chars().count() == prefix_len && prefix == wanted
}

/// Date embedded in a snapshot filename: the text after `<name>_` and before `.csv`.
pub fn parse_file_date(name: &str, file_name: &str) -> Result<NaiveDate, ParseError> {
    let segment = file_name
        .chars()
        .skip(name.chars().count() + 1)
        .collect::<String>();
    let segment = segment
        .strip_suffix(SNAPSHOT_EXTENSION)
        .ok_or_else(|| ParseError::new(file_name, "snapshot file must end in .csv"))?;
    parse_compact_date(segment)
        .map_err(|e| ParseError::new(file_name, format!("bad date segment: {}", e.reason)))
}
