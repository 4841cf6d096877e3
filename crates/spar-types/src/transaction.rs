//! Transactions, decoded envelopes and ledger records

use crate::error::TypesResult;
use crate::operation::Operation;
use serde::{Deserialize, Serialize};
use spar_primitives::{AccountId, LedgerSeq, MuxedAccount};

/// Transaction as replayed by the conflict model
///
/// `fee_account` is already resolved through any fee-bump wrapper.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction source account
    pub source_account: AccountId,
    /// Account paying the fee
    pub fee_account: AccountId,
    /// Operations in execution order
    pub operations: Vec<Operation>,
}

impl Transaction {
    /// Create a transaction whose source also pays the fee
    pub fn new(source_account: AccountId, operations: Vec<Operation>) -> Self {
        Self {
            source_account,
            fee_account: source_account,
            operations,
        }
    }

    /// Override the fee-paying account
    pub fn with_fee_account(mut self, fee_account: AccountId) -> Self {
        self.fee_account = fee_account;
        self
    }

    /// Number of operations
    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }
}

/// Inner transaction of a fee-bump envelope
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerTransaction {
    /// Operations of the wrapped transaction
    pub operations: Vec<Operation>,
}

/// Decoded transaction envelope
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Envelope {
    /// Legacy v0 envelope
    TxV0 {
        /// Operations in execution order
        operations: Vec<Operation>,
    },
    /// v1 envelope
    Tx {
        /// Operations in execution order
        operations: Vec<Operation>,
    },
    /// Fee-bump wrapper around a v1 envelope
    FeeBump {
        /// Account paying the bumped fee
        fee_source: MuxedAccount,
        /// Wrapped transaction
        inner: InnerTransaction,
    },
}

/// One transaction record as supplied by the ledger data source
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction hash, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Transaction source account
    pub source_account: AccountId,
    /// Fee account as reported by the data source
    pub fee_account: AccountId,
    /// Decoded envelope
    pub envelope: Envelope,
}

impl TransactionRecord {
    /// Resolve the record into a replayable transaction
    ///
    /// For fee-bump envelopes the fee account is the bump's fee source and
    /// the operations are those of the inner transaction.
    pub fn into_transaction(self) -> TypesResult<Transaction> {
        let (fee_account, operations) = match self.envelope {
            Envelope::TxV0 { operations } | Envelope::Tx { operations } => {
                (self.fee_account, operations)
            }
            Envelope::FeeBump { fee_source, inner } => (fee_source.demux()?, inner.operations),
        };

        Ok(Transaction {
            source_account: self.source_account,
            fee_account,
            operations,
        })
    }
}

/// Ordered transaction records of one ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTransactions {
    /// Ledger sequence number
    pub sequence: LedgerSeq,
    /// Records in application order
    pub transactions: Vec<TransactionRecord>,
}

impl LedgerTransactions {
    /// Resolve every record, failing on the first unresolvable one
    pub fn into_transactions(self) -> TypesResult<Vec<Transaction>> {
        self.transactions
            .into_iter()
            .map(TransactionRecord::into_transaction)
            .collect()
    }
}
