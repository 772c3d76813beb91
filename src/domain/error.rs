//! Domain error types.

/// Text that should have been a date (or a filename carrying one) but was not.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot parse {input:?}: {reason}")]
pub struct ParseError {
    pub input: String,
    pub reason: String,
}

impl ParseError {
    pub fn new(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Top-level error type for snapdb.
#[derive(Debug, thiserror::Error)]
pub enum SnapdbError {
    #[error("not found: {what}")]
    NotFound { what: String },

    #[error("{file}: missing required column {column}")]
    MissingColumn { file: String, column: String },

    #[error("start date {start} is after end date {end}")]
    Range { start: String, end: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("CSV error in {file}: {reason}")]
    Csv { file: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SnapdbError {
    pub fn not_found(what: impl Into<String>) -> Self {
        SnapdbError::NotFound { what: what.into() }
    }
}

impl From<&SnapdbError> for std::process::ExitCode {
    fn from(err: &SnapdbError) -> Self {
        let code: u8 = match err {
            SnapdbError::Io(_) | SnapdbError::Csv { .. } => 1,
            SnapdbError::ConfigParse { .. }
            | SnapdbError::ConfigMissing { .. }
            | SnapdbError::ConfigInvalid { .. } => 2,
            SnapdbError::NotFound { .. } | SnapdbError::MissingColumn { .. } => 3,
            SnapdbError::Range { .. } => 4,
            SnapdbError::Parse(_) => 5,
        };
        std::process::ExitCode::from(code)
    }
}
