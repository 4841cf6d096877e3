//! Per-transaction outcomes of a single ledger

use clap::Args;
use serde_json::json;
use spar_model::{ConflictAnalyzer, TxOutcome};
use spar_primitives::LedgerSeq;
use std::path::PathBuf;

use crate::output::{self, Output};
use crate::source::{JsonDirSource, LedgerSource};
use crate::{config::Config, CliError};

/// Show how each transaction of one ledger replays
#[derive(Debug, Args)]
pub struct LedgerCommand {
    /// Ledger sequence number
    pub seq: LedgerSeq,
    /// Directory holding `<seq>.json` ledger files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

/// Replay result of one transaction
#[derive(Debug, Clone, PartialEq)]
pub struct TxLine {
    /// Position in the ledger
    pub index: usize,
    /// Hash when the source supplied one
    pub hash: Option<String>,
    /// Number of operations
    pub operations: usize,
    /// Replay outcome
    pub outcome: TxOutcome,
}

impl LedgerCommand {
    pub async fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let source = JsonDirSource::new(super::data_dir(self.data_dir, config)?);
        let seq = self.seq;

        let lines = tokio::task::spawn_blocking(move || replay_ledger(&source, seq))
            .await
            .map_err(|e| CliError::Worker(e.to_string()))??;

        print_lines(seq, &lines, json);
        Ok(())
    }
}

/// Replay every transaction of ledger `seq` in order
pub fn replay_ledger<S>(source: &S, seq: LedgerSeq) -> Result<Vec<TxLine>, CliError>
where
    S: LedgerSource + ?Sized,
{
    let ledger = source.load(seq)?;
    let mut analyzer = ConflictAnalyzer::new();
    let mut lines = Vec::with_capacity(ledger.transactions.len());

    for (index, record) in ledger.transactions.into_iter().enumerate() {
        let hash = record.hash.clone();
        let tx = record
            .into_transaction()
            .map_err(|source| CliError::Types { seq, source })?;
        let outcome = analyzer
            .replay(&tx)
            .map_err(|source| CliError::Analysis { seq, source })?;

        lines.push(TxLine {
            index,
            hash,
            operations: tx.operation_count(),
            outcome,
        });
    }

    Ok(lines)
}

fn outcome_label(outcome: &TxOutcome) -> String {
    match outcome.conflict() {
        None => "free".to_string(),
        Some(conflict) => format!("{} {}", conflict.key, conflict.reason),
    }
}

/// Free and conflicted counts of a replayed ledger
fn tally(lines: &[TxLine]) -> (u64, u64) {
    let free = lines.iter().filter(|l| !l.outcome.is_conflicted()).count() as u64;
    (free, lines.len() as u64 - free)
}

/// Human-readable table of a replayed ledger
fn render_lines(seq: LedgerSeq, lines: &[TxLine]) -> String {
    let (free, conflicted) = tally(lines);
    let fraction = (!lines.is_empty()).then(|| free as f64 / lines.len() as f64);

    let mut text = vec![
        format!("ledger {}", seq),
        format!("{:>5}  {:<64}  {:>3}  outcome", "index", "hash", "ops"),
    ];
    text.extend(lines.iter().map(|line| {
        format!(
            "{:>5}  {:<64}  {:>3}  {}",
            line.index,
            line.hash.as_deref().unwrap_or("-"),
            line.operations,
            outcome_label(&line.outcome)
        )
    }));
    text.push(format!(
        "{} free, {} conflicted ({} conflict free)",
        free,
        conflicted,
        output::percent(fraction)
    ));
    text.join("\n")
}

fn print_lines(seq: LedgerSeq, lines: &[TxLine], json: bool) {
    let (free, conflicted) = tally(lines);

    let transactions: Vec<_> = lines
        .iter()
        .map(|line| {
            let conflict = line.outcome.conflict();
            json!({
                "index": line.index,
                "hash": line.hash,
                "operations": line.operations,
                "conflicted": line.outcome.is_conflicted(),
                "key": conflict.map(|c| c.key.to_string()),
                "reason": conflict.map(|c| c.reason.to_string()),
            })
        })
        .collect();

    Output::new(json)
        .field_u64("sequence", u64::from(seq))
        .field_u64("free", free)
        .field_u64("conflicted", conflicted)
        .field_value("transactions", json!(transactions))
        .message(&render_lines(seq, lines))
        .print();
}

#[cfg(test)]
mod tests {
    use super::*;
    use spar_model::{Conflict, ConflictReason};
    use spar_primitives::AccountId;
    use spar_types::{
        Envelope, InnerTransaction, LedgerTransactions, MuxedAccount, Operation, OperationBody,
        OperationKind, TransactionRecord,
    };

    struct OneLedger(LedgerTransactions);

    impl LedgerSource for OneLedger {
        fn load(&self, _seq: LedgerSeq) -> Result<LedgerTransactions, CliError> {
            Ok(self.0.clone())
        }
    }

    fn account(id: u8) -> AccountId {
        AccountId::from_bytes([id; 32])
    }

    fn data(name: &str) -> Operation {
        Operation::new(OperationBody::ManageData {
            name: name.to_string(),
        })
    }

    #[test]
    fn test_replay_ledger_outcomes() {
        let ledger = LedgerTransactions {
            sequence: 9,
            transactions: vec![
                TransactionRecord {
                    hash: Some("aa".to_string()),
                    source_account: account(1),
                    fee_account: account(1),
                    envelope: Envelope::Tx {
                        operations: vec![data("K")],
                    },
                },
                // fee-bumped by the same payer
                TransactionRecord {
                    hash: None,
                    source_account: account(2),
                    fee_account: account(2),
                    envelope: Envelope::FeeBump {
                        fee_source: MuxedAccount::Ed25519(account(1)),
                        inner: InnerTransaction {
                            operations: vec![data("K"), data("L")],
                        },
                    },
                },
            ],
        };

        let lines = replay_ledger(&OneLedger(ledger), 9).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].outcome, TxOutcome::Free);
        assert_eq!(lines[0].hash.as_deref(), Some("aa"));
        assert_eq!(lines[1].operations, 2);
        assert_eq!(
            lines[1].outcome,
            TxOutcome::Conflicted(Conflict::transaction(ConflictReason::AccountBalance))
        );
    }

    #[test]
    fn test_render_lines() {
        let lines = vec![
            TxLine {
                index: 0,
                hash: Some("aa".to_string()),
                operations: 1,
                outcome: TxOutcome::Free,
            },
            TxLine {
                index: 1,
                hash: None,
                operations: 3,
                outcome: TxOutcome::Conflicted(Conflict::transaction(
                    ConflictReason::AccountBalance,
                )),
            },
        ];

        let text = render_lines(12, &lines);
        let rows: Vec<_> = text.lines().collect();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0], "ledger 12");
        assert!(rows[2].ends_with("free"));
        assert!(rows[3].ends_with("TRANSACTION ACCOUNT_BALANCE"));
        assert_eq!(rows[4], "1 free, 1 conflicted (50.0% conflict free)");
    }

    #[test]
    fn test_render_lines_empty_ledger() {
        let text = render_lines(3, &[]);
        assert!(text.ends_with("0 free, 0 conflicted (- conflict free)"));
    }

    #[test]
    fn test_outcome_label() {
        assert_eq!(outcome_label(&TxOutcome::Free), "free");
        let outcome = TxOutcome::Conflicted(Conflict::operation(
            OperationKind::ManageData,
            ConflictReason::Account,
        ));
        assert_eq!(outcome_label(&outcome), "MANAGE_DATA ACCOUNT");
    }
}
