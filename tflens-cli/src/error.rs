//! CLI-specific error types and exit code mapping

use tflens_core::error::TflensError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The parse run aborted before producing any section.
    #[error("{0}")]
    Parse(String),

    /// Lines were skipped and `--fail-on-line-errors` was given.
    #[error("{0} line(s) could not be parsed")]
    LineErrors(usize),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from tflens-core.
    #[error("{0}")]
    Core(#[from] TflensError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                              |
    /// |------|--------------------------------------|
    /// | 0    | Success                              |
    /// | 1    | General / command error               |
    /// | 2    | Configuration error                   |
    /// | 3    | Parse run aborted                     |
    /// | 10   | IO error                              |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(TflensError::Config(_)) => 2,
            Self::Parse(_) => 3,
            Self::Io(_) | Self::Core(TflensError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::LineErrors(_) | Self::Core(_) => 1,
        }
    }
}

impl From<tflens_log_pipeline::LogPipelineError> for CliError {
    fn from(e: tflens_log_pipeline::LogPipelineError) -> Self {
        Self::Core(e.into())
    }
}
