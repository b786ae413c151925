//! Error types and Result aliases for mosaicsh
//!
//! Nothing in here is fatal to an interactive session: the shell reports an
//! error as a single `name: message` line and carries on with the next
//! command. Only the `exit` builtin ends a session.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for mosaicsh operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for mosaicsh
#[derive(Debug, Error)]
pub enum Error {
    // === Execution errors ===
    /// Program not found as a builtin, by path or on `PATH`
    #[error("{command}: command not found")]
    CommandNotFound { command: String },

    /// A redirection target or source could not be opened
    #[error("{command}: {}: {reason}", .path.display())]
    RedirectionFailed {
        command: String,
        path: PathBuf,
        reason: String,
    },

    /// A redirection operator without a filename
    #[error("{command}: syntax error: missing redirection target")]
    MissingRedirectionTarget { command: String },

    /// The OS refused to create a process
    #[error("{command}: {reason}")]
    SpawnFailed { command: String, reason: String },

    /// Waiting on or signalling a child failed
    #[error("failed to {action} process {pid}: {reason}")]
    ProcessControlFailed {
        action: String,
        pid: i32,
        reason: String,
    },

    // === Job errors ===
    /// No job matches the given job spec
    #[error("{builtin}: {spec}: no such job")]
    JobNotFound { builtin: String, spec: String },

    /// The job exists but has already finished
    #[error("{builtin}: job {id} has terminated")]
    JobTerminated { builtin: String, id: usize },

    // === Configuration errors ===
    /// Failed to load configuration file
    #[error("Failed to load config from '{}': {reason}", .path.display())]
    ConfigLoadFailed { path: PathBuf, reason: String },

    /// Failed to parse configuration
    #[error("Failed to parse {format} config: {reason}")]
    ConfigParseFailed { format: String, reason: String },

    /// Failed to serialize configuration
    #[error("Failed to serialize config as {format}: {reason}")]
    ConfigSerializationFailed { format: String, reason: String },

    /// Configuration validation failed
    #[error("Configuration validation failed for '{field}': {reason}")]
    ConfigValidationFailed { field: String, reason: String },

    // === Collaborator errors ===
    /// History file could not be read or written
    #[error("history: {}: {reason}", .path.display())]
    History { path: PathBuf, reason: String },

    /// Line editor failure
    #[error("Line editor error: {0}")]
    Readline(String),

    // === I/O and serialization errors ===
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Regex compilation errors
    #[error("Regex compilation error: {0}")]
    Regex(#[from] regex::Error),

    // === Generic fallback (use sparingly) ===
    /// Generic errors (for cases not yet categorized)
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Exit status a command reports when it fails with this error
    pub fn exit_status(&self) -> i32 {
        match self {
            Error::CommandNotFound { .. } => 127,
            _ => 1,
        }
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Other(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for Error {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        Error::Readline(err.to_string())
    }
}

/// Render an I/O error the way shells print them, without the
/// `(os error N)` suffix std appends.
pub fn describe_io_error(err: &std::io::Error) -> String {
    let text = err.to_string();
    match text.find(" (os error") {
        Some(idx) => text[..idx].to_string(),
        None => text,
    }
}
