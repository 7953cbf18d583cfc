#![forbid(unsafe_code)]

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SortvizError>;

#[derive(Debug, Error)]
pub enum SortvizError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {}", .problems.join("; "))]
    InvalidConfig { problems: Vec<String> },

    #[error("sort worker panicked")]
    WorkerPanicked,
}

impl SortvizError {
    #[must_use]
    pub fn invalid_config(problems: Vec<String>) -> Self {
        Self::InvalidConfig { problems }
    }
}

#[cfg(test)]
mod tests {
    use super::SortvizError;

    #[test]
    fn invalid_config_lists_every_problem() {
        let error = SortvizError::invalid_config(vec!["a".into(), "b".into()]);
        assert_eq!(error.to_string(), "invalid configuration: a; b");
    }
}
