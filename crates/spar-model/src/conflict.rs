//! Conflict outcomes and mergeable statistics

use serde::{Serialize, Serializer};
use spar_types::OperationKind;
use std::collections::BTreeMap;
use std::fmt;
use std::iter::Sum;

/// Coarse classification of why a conflict was raised
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictReason {
    /// Market already traded in
    Market,
    /// Balance already credited or debited
    AccountBalance,
    /// Data entry already written
    Data,
    /// Account identity or data entry already modified
    Account,
    /// Operation kind without an access pattern
    Unknown,
}

impl ConflictReason {
    /// Report name of the reason
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictReason::Market => "MARKET",
            ConflictReason::AccountBalance => "ACCOUNT_BALANCE",
            ConflictReason::Data => "DATA",
            ConflictReason::Account => "ACCOUNT",
            ConflictReason::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a conflict is attributed to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConflictKey {
    /// The transaction as a whole (fee payment)
    Transaction,
    /// A single operation of the given kind
    Operation(OperationKind),
}

impl ConflictKey {
    /// Report name of the key
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictKey::Transaction => "TRANSACTION",
            ConflictKey::Operation(kind) => kind.as_str(),
        }
    }
}

impl fmt::Display for ConflictKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<OperationKind> for ConflictKey {
    fn from(kind: OperationKind) -> Self {
        ConflictKey::Operation(kind)
    }
}

// Serialized as a plain string so it can key JSON maps.
impl Serialize for ConflictKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// A single detected conflict
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Conflict {
    /// Operation kind or whole transaction
    pub key: ConflictKey,
    /// Why the conflict was raised
    pub reason: ConflictReason,
}

impl Conflict {
    /// Conflict raised by an operation
    pub fn operation(kind: OperationKind, reason: ConflictReason) -> Self {
        Self {
            key: ConflictKey::Operation(kind),
            reason,
        }
    }

    /// Conflict raised at the transaction level
    pub fn transaction(reason: ConflictReason) -> Self {
        Self {
            key: ConflictKey::Transaction,
            reason,
        }
    }
}

/// Conflict counts per key and per reason
///
/// Merging sums counts over the union of keys, so merge is associative and
/// commutative with the empty value as identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConflictStats {
    /// Counts per operation kind (or whole transaction)
    pub conflicts: BTreeMap<ConflictKey, u64>,
    /// Counts per reason
    pub reasons: BTreeMap<ConflictReason, u64>,
}

impl ConflictStats {
    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more conflict
    pub fn record(&mut self, conflict: Conflict) {
        *self.conflicts.entry(conflict.key).or_insert(0) += 1;
        *self.reasons.entry(conflict.reason).or_insert(0) += 1;
    }

    /// Add another set of statistics into this one
    pub fn merge(&mut self, other: &ConflictStats) {
        for (key, count) in &other.conflicts {
            *self.conflicts.entry(*key).or_insert(0) += count;
        }
        for (reason, count) in &other.reasons {
            *self.reasons.entry(*reason).or_insert(0) += count;
        }
    }

    /// Merge by value
    pub fn merged(mut self, other: &ConflictStats) -> Self {
        self.merge(other);
        self
    }

    /// Total number of conflicts recorded
    pub fn total(&self) -> u64 {
        self.reasons.values().sum()
    }

    /// Count for an operation kind or the whole-transaction key
    pub fn count_for_key(&self, key: ConflictKey) -> u64 {
        self.conflicts.get(&key).copied().unwrap_or(0)
    }

    /// Count for an operation kind
    pub fn count_for_kind(&self, kind: OperationKind) -> u64 {
        self.count_for_key(ConflictKey::Operation(kind))
    }

    /// Count for a reason
    pub fn count_for_reason(&self, reason: ConflictReason) -> u64 {
        self.reasons.get(&reason).copied().unwrap_or(0)
    }

    /// Check if no conflict was recorded
    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty() && self.reasons.is_empty()
    }
}

impl From<Conflict> for ConflictStats {
    fn from(conflict: Conflict) -> Self {
        let mut stats = ConflictStats::new();
        stats.record(conflict);
        stats
    }
}

impl<'a> Sum<&'a ConflictStats> for ConflictStats {
    fn sum<I: Iterator<Item = &'a ConflictStats>>(iter: I) -> Self {
        iter.fold(ConflictStats::new(), |acc, stats| acc.merged(stats))
    }
}

impl Sum for ConflictStats {
    fn sum<I: Iterator<Item = ConflictStats>>(iter: I) -> Self {
        iter.fold(ConflictStats::new(), |acc, stats| acc.merged(&stats))
    }
}
