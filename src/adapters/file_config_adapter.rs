//! INI file configuration adapter.

use crate::ports::config_port::{ConfigPort, parse_bool};
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[database]
name = sseo
path = /data/sseo

[record]
skip_bad_file_dates = yes
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("database", "name"),
            Some("sseo".to_string())
        );
        assert_eq!(
            adapter.get_string("database", "path"),
            Some("/data/sseo".to_string())
        );
        assert!(adapter.get_bool("record", "skip_bad_file_dates", false));
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[database]\nname = sseo\n").unwrap();
        assert_eq!(adapter.get_string("database", "path"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_bool_returns_true_values() {
        let adapter =
            FileConfigAdapter::from_string("[record]\na = true\nb = yes\nc = 1\n").unwrap();
        assert!(adapter.get_bool("record", "a", false));
        assert!(adapter.get_bool("record", "b", false));
        assert!(adapter.get_bool("record", "c", false));
    }

    #[test]
    fn get_bool_returns_false_values() {
        let adapter =
            FileConfigAdapter::from_string("[record]\na = false\nb = no\nc = 0\n").unwrap();
        assert!(!adapter.get_bool("record", "a", true));
        assert!(!adapter.get_bool("record", "b", true));
        assert!(!adapter.get_bool("record", "c", true));
    }

    #[test]
    fn get_bool_returns_default_for_missing_or_garbage() {
        let adapter = FileConfigAdapter::from_string("[record]\nx = maybe\n").unwrap();
        assert!(adapter.get_bool("record", "missing", true));
        assert!(!adapter.get_bool("record", "missing", false));
        assert!(adapter.get_bool("record", "x", true));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[database]\npath = /srv/snapshots\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("database", "path"),
            Some("/srv/snapshots".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(result.is_err());
    }
}
