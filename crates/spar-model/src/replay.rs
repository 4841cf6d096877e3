//! Transaction replay protocol and batch aggregation
//!
//! Transactions are replayed in committed order. Checks model a
//! hypothetical parallel schedule; commits model what actually happened,
//! so a transaction's footprint is committed whether or not it conflicted.

use crate::access::ResolvedOperation;
use crate::conflict::{Conflict, ConflictReason, ConflictStats};
use crate::error::{ModelError, ModelResult};
use crate::resource::BalanceKey;
use crate::tracker::ConflictModel;
use serde::Serialize;
use spar_primitives::{AccountId, IdentityError};
use spar_types::Transaction;

/// Outcome of replaying one transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxOutcome {
    /// No access collided with the batch footprint
    Free,
    /// First collision found
    Conflicted(Conflict),
}

impl TxOutcome {
    /// Check if the transaction conflicted
    pub fn is_conflicted(&self) -> bool {
        matches!(self, TxOutcome::Conflicted(_))
    }

    /// The recorded conflict, if any
    pub fn conflict(&self) -> Option<Conflict> {
        match self {
            TxOutcome::Free => None,
            TxOutcome::Conflicted(conflict) => Some(*conflict),
        }
    }
}

/// Check then commit one transaction
///
/// All operations are resolved before the footprint is touched, so an
/// unresolvable transaction leaves `model` unchanged.
pub fn replay_transaction(
    model: &mut ConflictModel,
    tx: &Transaction,
) -> Result<TxOutcome, IdentityError> {
    let operations = tx
        .operations
        .iter()
        .map(|op| ResolvedOperation::resolve(op, tx.source_account))
        .collect::<Result<Vec<_>, _>>()?;

    let outcome = match check_transaction(model, tx.fee_account, &operations) {
        Some(conflict) => TxOutcome::Conflicted(conflict),
        None => TxOutcome::Free,
    };
    commit_transaction(model, tx.fee_account, &operations);

    Ok(outcome)
}

/// First conflict of a transaction; the fee check takes precedence
fn check_transaction(
    model: &ConflictModel,
    fee_account: AccountId,
    operations: &[ResolvedOperation],
) -> Option<Conflict> {
    if !model.check_balance_down(&BalanceKey::native(fee_account)) {
        return Some(Conflict::transaction(ConflictReason::AccountBalance));
    }
    operations.iter().find_map(|op| op.check(model))
}

fn commit_transaction(
    model: &mut ConflictModel,
    fee_account: AccountId,
    operations: &[ResolvedOperation],
) {
    model.commit_balance_down(BalanceKey::native(fee_account));
    for op in operations {
        op.commit(model);
    }
}

/// Conflict counts for one batch (or several merged batches)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Transactions without a conflict
    pub free: u64,
    /// Transactions with a conflict
    pub conflicted: u64,
    /// Conflict breakdown
    pub stats: ConflictStats,
}

impl BatchReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of transactions
    pub fn total(&self) -> u64 {
        self.free + self.conflicted
    }

    /// Share of conflict-free transactions, `None` for an empty batch
    pub fn free_fraction(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        Some(self.free as f64 / total as f64)
    }

    /// Tally one transaction outcome
    pub fn record(&mut self, outcome: TxOutcome) {
        match outcome {
            TxOutcome::Free => self.free += 1,
            TxOutcome::Conflicted(conflict) => {
                self.conflicted += 1;
                self.stats.record(conflict);
            }
        }
    }

    /// Add another report into this one
    pub fn merge(&mut self, other: &BatchReport) {
        self.free += other.free;
        self.conflicted += other.conflicted;
        self.stats.merge(&other.stats);
    }
}

/// Replays one batch against its own footprint
///
/// Each analyzer owns a fresh [`ConflictModel`]; batches never share one.
#[derive(Debug, Default)]
pub struct ConflictAnalyzer {
    model: ConflictModel,
    report: BatchReport,
    index: usize,
}

impl ConflictAnalyzer {
    /// Create an analyzer with an empty footprint
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyze a whole batch in order
    pub fn analyze(transactions: &[Transaction]) -> ModelResult<BatchReport> {
        let mut analyzer = Self::new();
        for tx in transactions {
            analyzer.replay(tx)?;
        }
        Ok(analyzer.finish())
    }

    /// Replay the next transaction of the batch
    pub fn replay(&mut self, tx: &Transaction) -> ModelResult<TxOutcome> {
        let index = self.index;
        let outcome = replay_transaction(&mut self.model, tx)
            .map_err(|source| ModelError::Identity { index, source })?;

        match outcome {
            TxOutcome::Free => tracing::trace!(index, "transaction free"),
            TxOutcome::Conflicted(conflict) => tracing::debug!(
                index,
                key = %conflict.key,
                reason = %conflict.reason,
                "transaction conflicted"
            ),
        }

        self.report.record(outcome);
        self.index += 1;
        Ok(outcome)
    }

    /// Footprint accumulated so far
    pub fn model(&self) -> &ConflictModel {
        &self.model
    }

    /// Counts accumulated so far
    pub fn report(&self) -> &BatchReport {
        &self.report
    }

    /// Number of transactions replayed
    pub fn replayed(&self) -> usize {
        self.index
    }

    /// Consume the analyzer and return its report
    pub fn finish(self) -> BatchReport {
        self.report
    }
}

/// Analyze one batch on a fresh footprint
pub fn analyze_batch(transactions: &[Transaction]) -> ModelResult<BatchReport> {
    ConflictAnalyzer::analyze(transactions)
}
