//! Configuration validation.
//!
//! Checks the `[database]` and `[record]` sections before any folder is read.

use crate::domain::assembler::FileDatePolicy;
use crate::domain::error::SnapdbError;
use crate::ports::config_port::{ConfigPort, parse_bool};
use std::path::PathBuf;

/// Everything needed to open a database, taken from validated config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub name: String,
    pub path: PathBuf,
    pub file_date_policy: FileDatePolicy,
}

pub fn validate_database_config(config: &dyn ConfigPort) -> Result<(), SnapdbError> {
    validate_name(config)?;
    validate_path(config)?;
    validate_file_date_policy(config)?;
    Ok(())
}

pub fn build_database_settings(config: &dyn ConfigPort) -> Result<DatabaseSettings, SnapdbError> {
    validate_database_config(config)?;
    let name = required(config, "database", "name")?;
    let path = required(config, "database", "path")?;
    let file_date_policy = if config.get_bool("record", "skip_bad_file_dates", false) {
        FileDatePolicy::Skip
    } else {
        FileDatePolicy::Abort
    };
    Ok(DatabaseSettings {
        name: name.trim().to_string(),
        path: PathBuf::from(path.trim()),
        file_date_policy,
    })
}

fn required(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, SnapdbError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(SnapdbError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn validate_name(config: &dyn ConfigPort) -> Result<(), SnapdbError> {
    let name = required(config, "database", "name")?;
    if name.contains('/') || name.contains('\\') {
        return Err(SnapdbError::ConfigInvalid {
            section: "database".to_string(),
            key: "name".to_string(),
            reason: "name is a filename prefix and cannot contain path separators".to_string(),
        });
    }
    Ok(())
}

fn validate_path(config: &dyn ConfigPort) -> Result<(), SnapdbError> {
    required(config, "database", "path").map(|_| ())
}

fn validate_file_date_policy(config: &dyn ConfigPort) -> Result<(), SnapdbError> {
    match config.get_string("record", "skip_bad_file_dates") {
        Some(value) if parse_bool(&value).is_none() => Err(SnapdbError::ConfigInvalid {
            section: "record".to_string(),
            key: "skip_bad_file_dates".to_string(),
            reason: format!("expected true or false, got {:?}", value),
        }),
        _ => Ok(()),
    }
}
