use thiserror::Error;

pub type Result<T> = std::result::Result<T, TallyError>;

#[derive(Error, Debug)]
pub enum TallyError {
    /// git could not be spawned, or exited with a failure status.
    #[error("`{command}` failed: {detail}")]
    StreamUnavailable { command: String, detail: String },

    #[error("malformed blame output for '{path}' at line {line}: {reason}")]
    MalformedStream { path: String, line: usize, reason: String },

    #[error("commit {commit} has attributed lines in '{path}' but no recorded identity")]
    AttributionInconsistency { path: String, commit: String },

    #[error("unsupported ordering: \"{0}\". Expected one of: \"lines\", \"commits\", \"files\"")]
    UnsupportedRankingKey(String),

    #[error("unsupported output format: \"{0}\". Expected one of: \"tabular\", \"csv\", \"json\", \"json-lines\"")]
    UnsupportedFormat(String),

    #[error("{0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl TallyError {
    pub(crate) fn malformed(path: &str, line: usize, reason: impl Into<String>) -> Self {
        TallyError::MalformedStream {
            path: path.to_string(),
            line,
            reason: reason.into(),
        }
    }
}
