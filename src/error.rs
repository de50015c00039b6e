use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating the mint configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode config for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failure reported by a transaction issuer
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IssueError {
    /// The signer or network refused the transaction
    #[error("transaction rejected: {0}")]
    Rejected(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PurchaseError {
    #[error("no account connected")]
    NoAccount,
}
