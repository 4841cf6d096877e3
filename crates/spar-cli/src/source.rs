//! Ledger data sources
//!
//! The analyzer consumes ledgers that are already decoded into
//! [`LedgerTransactions`]. Fetching and XDR decoding happen upstream.

use crate::CliError;
use spar_primitives::LedgerSeq;
use spar_types::LedgerTransactions;
use std::path::PathBuf;

/// Supplies the ordered transaction records of a ledger
pub trait LedgerSource: Send + Sync {
    /// Load one ledger
    fn load(&self, seq: LedgerSeq) -> Result<LedgerTransactions, CliError>;
}

/// Directory of `<seq>.json` files
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    /// Read ledgers from `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File that holds ledger `seq`
    pub fn path_for(&self, seq: LedgerSeq) -> PathBuf {
        self.dir.join(format!("{}.json", seq))
    }
}

impl LedgerSource for JsonDirSource {
    fn load(&self, seq: LedgerSeq) -> Result<LedgerTransactions, CliError> {
        let path = self.path_for(seq);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CliError::LedgerNotFound { seq, path });
            }
            Err(e) => return Err(CliError::Io(e)),
        };

        let ledger: LedgerTransactions =
            serde_json::from_str(&content).map_err(|source| CliError::Decode { seq, source })?;
        if ledger.sequence != seq {
            return Err(CliError::SequenceMismatch {
                expected: seq,
                found: ledger.sequence,
            });
        }

        tracing::debug!(
            ledger = seq,
            transactions = ledger.transactions.len(),
            "ledger loaded"
        );
        Ok(ledger)
    }
}
