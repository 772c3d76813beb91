//! One-glance summary of a database folder.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderReport {
    pub name: String,
    pub file_count: usize,
    pub first_file: Option<String>,
    pub last_file: Option<String>,
}

impl FolderReport {
    /// Build from a sorted catalog listing.
    pub fn from_catalog(name: &str, files: &[String]) -> Self {
        Self {
            name: name.to_string(),
            file_count: files.len(),
            first_file: files.first().cloned(),
            last_file: files.last().cloned(),
        }
    }
}

impl fmt::Display for FolderReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.name)?;
        writeln!(f, "# of files: {}", self.file_count)?;
        writeln!(f, "First file: {}", self.first_file.as_deref().unwrap_or("-"))?;
        write!(f, "Last file: {}", self.last_file.as_deref().unwrap_or("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_from_listing() {
        let files = vec![
            "sseo_20200601.csv".to_string(),
            "sseo_20200602.csv".to_string(),
            "sseo_20200609.csv".to_string(),
        ];
        let report = FolderReport::from_catalog("sseo", &files);
        assert_eq!(report.file_count, 3);
        assert_eq!(report.first_file.as_deref(), Some("sseo_20200601.csv"));
        assert_eq!(report.last_file.as_deref(), Some("sseo_20200609.csv"));
        assert_eq!(
            report.to_string(),
            "sseo:\n# of files: 3\nFirst file: sseo_20200601.csv\nLast file: sseo_20200609.csv"
        );
    }

    #[test]
    fn empty_folder_reports_dashes() {
        let report = FolderReport::from_catalog("sseo", &[]);
        assert_eq!(report.file_count, 0);
        assert!(report.first_file.is_none());
        assert!(report.to_string().ends_with("Last file: -"));
    }
}
