//! Domain error types.

/// A rejected trade submission. Reported to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field: {field}")]
    Missing { field: &'static str },

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("unknown direction '{0}' (expected long or short)")]
    Direction(String),

    #[error("unknown category '{0}' (expected strategy, impulse or unknown)")]
    Category(String),
}

/// Top-level error type for tradelog.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A stored row breaks the trade data-model invariants.
    #[error("inconsistent journal data: {reason}")]
    Consistency { reason: String },

    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

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

    #[error("row {row}: {source}")]
    ImportRow {
        row: usize,
        #[source]
        source: ValidationError,
    },

    #[error("csv error: {reason}")]
    Csv { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl JournalError {
    pub fn consistency(reason: impl Into<String>) -> Self {
        JournalError::Consistency {
            reason: reason.into(),
        }
    }
}

impl From<&JournalError> for std::process::ExitCode {
    fn from(err: &JournalError) -> Self {
        let code: u8 = match err {
            JournalError::Io(_) | JournalError::Csv { .. } => 1,
            JournalError::ConfigParse { .. }
            | JournalError::ConfigMissing { .. }
            | JournalError::ConfigInvalid { .. } => 2,
            JournalError::Database { .. } | JournalError::DatabaseQuery { .. } => 3,
            JournalError::Validation(_) | JournalError::ImportRow { .. } => 4,
            JournalError::Consistency { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
