//! Error types for basket-core

use thiserror::Error;

/// Result type alias for basket operations
pub type Result<T> = std::result::Result<T, MiningError>;

/// Main error type for dataset loading and configuration
#[derive(Error, Debug)]
pub enum MiningError {
    /// Dataset file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Transaction log is not valid JSON or has the wrong shape
    #[error("Invalid transaction log: {0}")]
    InvalidFormat(#[from] serde_json::Error),

    /// A transaction carries a date none of the accepted formats can parse
    #[error("Invalid date {date:?} in transaction {index}")]
    InvalidDate { index: usize, date: String },

    /// More distinct users than the dense code space holds
    #[error("Too many distinct users: {0}")]
    TooManyUsers(usize),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Analysis stopped before finishing
    #[error("Compute budget exhausted")]
    BudgetExhausted,

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(String),
}

impl From<toml::de::Error> for MiningError {
    fn from(err: toml::de::Error) -> Self {
        MiningError::ConfigParse(err.to_string())
    }
}
