//! Error types for ChainTrace
//!
//! Ledger operations are total over well-typed inputs and return plain
//! values; these errors cover the process boundary (configuration, io) only.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
