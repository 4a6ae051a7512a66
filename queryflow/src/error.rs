//! Error types for agent execution and workflow construction.
//!
//! [`AgentError`] is returned by agents and LLM clients; branch tools turn it into
//! error records. [`ConfigError`] is raised at construction time (dataset discovery,
//! missing credentials) and is fatal.

use std::path::PathBuf;

use thiserror::Error;

/// Agent execution error.
///
/// Display is the bare message so branch tools can format it as
/// `Error processing query: {message}`.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Execution failed with a message (e.g. LLM call failed, agent returned garbage).
    #[error("{0}")]
    ExecutionFailed(String),

    /// A generated SQL statement failed to prepare or run.
    #[error("{0}")]
    Sql(#[from] rusqlite::Error),

    /// Data returned by an agent could not be turned into a table.
    #[error("{0}")]
    InvalidData(String),
}

/// Construction-time configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The data directory does not hold exactly one CSV file.
    #[error("Expected exactly one CSV file in {} directory, found {found}", dir.display())]
    CsvFileCount { dir: PathBuf, found: usize },

    /// The CSV file exists but could not be read.
    #[error("failed to load {}: {message}", path.display())]
    CsvLoad { path: PathBuf, message: String },

    /// A required environment variable is unset or empty.
    #[error("{0} is not set; please configure it in .env")]
    MissingEnv(&'static str),

    /// The state store could not be opened.
    #[error("failed to open state store: {0}")]
    StateStore(#[from] crate::memory::StoreError),
}

impl From<csv::Error> for AgentError {
    fn from(e: csv::Error) -> Self {
        AgentError::InvalidData(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: ExecutionFailed displays only the message.
    #[test]
    fn agent_error_display_is_bare_message() {
        let err = AgentError::ExecutionFailed("Test error".to_string());
        assert_eq!(err.to_string(), "Test error");
    }

    /// **Scenario**: Debug format includes variant name and message.
    #[test]
    fn agent_error_debug_format() {
        let err = AgentError::InvalidData("test".to_string());
        let s = format!("{:?}", err);
        assert!(s.contains("InvalidData"), "Debug should contain variant name: {}", s);
        assert!(s.contains("test"), "Debug should contain message: {}", s);
    }

    /// **Scenario**: CsvFileCount names the directory and the count.
    #[test]
    fn config_error_csv_count_mentions_dir_and_count() {
        let err = ConfigError::CsvFileCount {
            dir: PathBuf::from("./data"),
            found: 2,
        };
        let s = err.to_string();
        assert!(s.contains("exactly one CSV"), "{}", s);
        assert!(s.contains("./data"), "{}", s);
        assert!(s.contains('2'), "{}", s);
    }
}
