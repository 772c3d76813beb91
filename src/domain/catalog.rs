//! File catalog: the sorted list of snapshot files belonging to a database,
//! and resolution of a date or date range into filenames.

use crate::domain::error::SnapdbError;
use crate::domain::naming::{belongs_to, format_compact_date, snapshot_file_name};
use crate::ports::snapshot_port::SnapshotPort;
use chrono::NaiveDate;

/// A single day (`end` is `None`) or an inclusive day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl DateSpan {
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: None,
        }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }
}

pub struct FileCatalog<'a> {
    name: &'a str,
    port: &'a dyn SnapshotPort,
}

impl<'a> FileCatalog<'a> {
    pub fn new(name: &'a str, port: &'a dyn SnapshotPort) -> Self {
        Self { name, port }
    }

    /// Folder entries whose prefix matches the database name, sorted ascending.
    pub fn list_files(&self) -> Result<Vec<String>, SnapdbError> {
        let mut files: Vec<String> = self
            .port
            .list_entries()?
            .into_iter()
            .filter(|entry| belongs_to(self.name, entry))
            .collect();
        files.sort();
        log::debug!("{}: {} catalog files", self.name, files.len());
        Ok(files)
    }

    /// Filenames covering `start..=end`.
    ///
    /// A single date (no `end`, or `end == start`) yields the expected filename
    /// without checking that it exists. A wider range yields the contiguous
    /// catalog slice between the two boundary files, both of which must exist.
    pub fn resolve_date_range(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<Vec<String>, SnapdbError> {
        let end = match end {
            None => return Ok(vec![snapshot_file_name(self.name, start)]),
            Some(end) if end == start => return Ok(vec![snapshot_file_name(self.name, start)]),
            Some(end) if start > end => {
                return Err(SnapdbError::Range {
                    start: format_compact_date(start),
                    end: format_compact_date(end),
                });
            }
            Some(end) => end,
        };

        let files = self.list_files()?;
        slice_between(
            &files,
            &snapshot_file_name(self.name, start),
            &snapshot_file_name(self.name, end),
        )
    }
}

fn slice_between(
    files: &[String],
    first: &str,
    last: &str,
) -> Result<Vec<String>, SnapdbError> {
    let start_index = files
        .iter()
        .position(|f| f == first)
        .ok_or_else(|| SnapdbError::not_found(format!("snapshot file {first}")))?;
    let end_index = files[start_index..]
        .iter()
        .position(|f| f == last)
        .map(|offset| start_index + offset)
        .ok_or_else(|| SnapdbError::not_found(format!("snapshot file {last}")))?;
    Ok(files[start_index..=end_index].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction::TransactionRow;
    use crate::ports::snapshot_port::RowScan;

    struct ListingPort(Vec<&'static str>);

    impl SnapshotPort for ListingPort {
        fn list_entries(&self) -> Result<Vec<String>, SnapdbError> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }

        fn read_instrument_ids(&self, _file_name: &str) -> Result<RowScan<String>, SnapdbError> {
            unreachable!("catalog never reads files")
        }

        fn read_transactions(
            &self,
            _file_name: &str,
            _instrument_id: &str,
            _date: NaiveDate,
        ) -> Result<RowScan<TransactionRow>, SnapdbError> {
            unreachable!("catalog never reads files")
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn port() -> ListingPort {
        ListingPort(vec![
            "demo_20200605.csv",
            "._demo_20200601.csv",
            "demo_20200601.csv",
            "other_20200601.csv",
            "demo_20200602.csv",
            "DEMO_20200603.csv",
            "demo_20200604.csv",
        ])
    }

    #[test]
    fn list_files_filters_and_sorts() {
        let port = port();
        let catalog = FileCatalog::new("demo", &port);
        assert_eq!(
            catalog.list_files().unwrap(),
            vec![
                "demo_20200601.csv",
                "demo_20200602.csv",
                "demo_20200604.csv",
                "demo_20200605.csv",
            ]
        );
    }

    #[test]
    fn list_files_lowercases_database_name() {
        let port = port();
        let catalog = FileCatalog::new("DEMO", &port);
        assert_eq!(catalog.list_files().unwrap().len(), 4);
    }

    #[test]
    fn single_date_is_not_checked_against_listing() {
        let port = port();
        let catalog = FileCatalog::new("demo", &port);
        let expected = vec!["demo_20991231.csv".to_string()];
        assert_eq!(
            catalog.resolve_date_range(date(2099, 12, 31), None).unwrap(),
            expected
        );
        assert_eq!(
            catalog
                .resolve_date_range(date(2099, 12, 31), Some(date(2099, 12, 31)))
                .unwrap(),
            expected
        );
    }

    #[test]
    fn reversed_range_is_an_error() {
        let port = port();
        let catalog = FileCatalog::new("demo", &port);
        let err = catalog
            .resolve_date_range(date(2020, 6, 2), Some(date(2020, 6, 1)))
            .unwrap_err();
        assert!(matches!(err, SnapdbError::Range { ref start, ref end }
            if start == "20200602" && end == "20200601"));
    }

    #[test]
    fn range_includes_files_across_gaps() {
        let port = port();
        let catalog = FileCatalog::new("demo", &port);
        let files = catalog
            .resolve_date_range(date(2020, 6, 2), Some(date(2020, 6, 5)))
            .unwrap();
        assert_eq!(
            files,
            vec![
                "demo_20200602.csv",
                "demo_20200604.csv",
                "demo_20200605.csv",
            ]
        );
    }

    #[test]
    fn range_boundary_must_exist() {
        let port = port();
        let catalog = FileCatalog::new("demo", &port);
        // 20200603 only exists under an upper-case name
        let err = catalog
            .resolve_date_range(date(2020, 6, 1), Some(date(2020, 6, 3)))
            .unwrap_err();
        assert!(matches!(err, SnapdbError::NotFound { ref what } if what.contains("demo_20200603.csv")));

        let err = catalog
            .resolve_date_range(date(2020, 5, 31), Some(date(2020, 6, 2)))
            .unwrap_err();
        assert!(matches!(err, SnapdbError::NotFound { .. }));
    }
}
