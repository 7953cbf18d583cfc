#![forbid(unsafe_code)]

use sortviz_runtime::SortvizError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Runtime(#[from] SortvizError),

    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to install log subscriber: {message}")]
    Logging { message: String },
}

impl CliError {
    /// Process exit code: 2 for bad input, 1 for everything else.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Runtime(
                SortvizError::InvalidConfig { .. } | SortvizError::Toml(_) | SortvizError::Json(_),
            ) => 2,
            _ => 1,
        }
    }
}
