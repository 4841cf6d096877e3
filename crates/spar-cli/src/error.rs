//! CLI error types

use spar_model::ModelError;
use spar_primitives::LedgerSeq;
use spar_types::TypesError;
use std::path::PathBuf;
use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Ledger file does not exist in the data directory
    #[error("Ledger {seq} not found at {}", path.display())]
    LedgerNotFound {
        /// Requested ledger
        seq: LedgerSeq,
        /// Path that was tried
        path: PathBuf,
    },

    /// Ledger file carries another sequence number
    #[error("Ledger file for {expected} contains ledger {found}")]
    SequenceMismatch {
        /// Requested ledger
        expected: LedgerSeq,
        /// Sequence found in the file
        found: LedgerSeq,
    },

    /// Ledger file is not a valid decoded ledger
    #[error("Ledger {seq} is malformed: {source}")]
    Decode {
        /// Ledger being decoded
        seq: LedgerSeq,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Record could not be turned into a transaction
    #[error("Ledger {seq}: {source}")]
    Types {
        /// Ledger being converted
        seq: LedgerSeq,
        /// Underlying conversion error
        #[source]
        source: TypesError,
    },

    /// Replay failed
    #[error("Ledger {seq}: {source}")]
    Analysis {
        /// Ledger being analyzed
        seq: LedgerSeq,
        /// Underlying model error
        #[source]
        source: ModelError,
    },

    /// Empty or inverted ledger range
    #[error("Invalid range: --from {from} must be below --to {to}")]
    InvalidRange {
        /// First ledger
        from: LedgerSeq,
        /// One past the last ledger
        to: LedgerSeq,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Worker task failed to complete
    #[error("Worker error: {0}")]
    Worker(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config error
    #[error("Config error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_ledger() {
        let err = CliError::LedgerNotFound {
            seq: 42,
            path: PathBuf::from("/data/42.json"),
        };
        assert_eq!(err.to_string(), "Ledger 42 not found at /data/42.json");

        let err = CliError::SequenceMismatch {
            expected: 7,
            found: 8,
        };
        assert!(err.to_string().contains("contains ledger 8"));
    }

    #[test]
    fn test_range_message() {
        let err = CliError::InvalidRange { from: 10, to: 10 };
        assert_eq!(err.to_string(), "Invalid range: --from 10 must be below --to 10");
    }
}
