//! Operation access patterns
//!
//! Each modeled operation kind resolves into a [`ResolvedOperation`] whose
//! `check` and `commit` describe which resources it reads and writes. Every
//! pattern over-approximates: it may report conflicts that would not occur
//! in practice, but never misses one.

use crate::conflict::{Conflict, ConflictReason};
use crate::resource::{BalanceKey, DataKey, Direction, MarketKey};
use crate::tracker::ConflictModel;
use spar_primitives::{AccountId, AssetCode, IdentityError};
use spar_types::{Operation, OperationBody, OperationKind};

/// Operation with all identities and asset codes resolved
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedOperation {
    /// Account creation
    CreateAccount {
        /// Funding account
        source: AccountId,
        /// New account
        destination: AccountId,
    },
    /// Payment of one asset
    Payment {
        /// Paying account
        source: AccountId,
        /// Receiving account
        destination: AccountId,
        /// Asset paid
        asset: AssetCode,
    },
    /// Strict-receive or strict-send path payment
    PathPayment {
        /// Which path payment flavour
        kind: OperationKind,
        /// Paying account
        source: AccountId,
        /// Receiving account
        destination: AccountId,
        /// Asset debited from the source
        send_asset: AssetCode,
        /// Intermediate assets
        path: Vec<AssetCode>,
        /// Asset credited to the destination
        dest_asset: AssetCode,
    },
    /// Sell or buy offer management
    Offer {
        /// Which offer flavour
        kind: OperationKind,
        /// Offering account
        source: AccountId,
        /// Asset offered
        selling: AssetCode,
        /// Asset wanted
        buying: AssetCode,
    },
    /// Change-trust or allow-trust on the source's own balance
    TrustLine {
        /// Which trust operation
        kind: OperationKind,
        /// Account whose balance is touched
        source: AccountId,
        /// Asset code of the trust line
        asset: AssetCode,
    },
    /// Data entry write
    ManageData {
        /// Entry written
        key: DataKey,
    },
    /// Account merge
    AccountMerge {
        /// Account being merged away
        source: AccountId,
        /// Account receiving the balance
        destination: AccountId,
    },
    /// Operation kind without an access pattern
    Unmodeled {
        /// Protocol kind
        kind: OperationKind,
    },
}

impl ResolvedOperation {
    /// Resolve an operation of a transaction sourced by `tx_source`
    pub fn resolve(op: &Operation, tx_source: AccountId) -> Result<Self, IdentityError> {
        let resolved = match &op.body {
            OperationBody::CreateAccount { destination } => ResolvedOperation::CreateAccount {
                source: op.resolve_source(tx_source)?,
                destination: *destination,
            },
            OperationBody::Payment { destination, asset } => ResolvedOperation::Payment {
                source: op.resolve_source(tx_source)?,
                destination: destination.demux()?,
                asset: asset.code(),
            },
            OperationBody::PathPaymentStrictReceive {
                send_asset,
                destination,
                dest_asset,
                path,
            }
            | OperationBody::PathPaymentStrictSend {
                send_asset,
                destination,
                dest_asset,
                path,
            } => ResolvedOperation::PathPayment {
                kind: op.kind(),
                source: op.resolve_source(tx_source)?,
                destination: destination.demux()?,
                send_asset: send_asset.code(),
                path: path.iter().map(|asset| asset.code()).collect(),
                dest_asset: dest_asset.code(),
            },
            OperationBody::ManageSellOffer {
                selling, buying, ..
            }
            | OperationBody::ManageBuyOffer {
                selling, buying, ..
            } => ResolvedOperation::Offer {
                kind: op.kind(),
                source: op.resolve_source(tx_source)?,
                selling: selling.code(),
                buying: buying.code(),
            },
            OperationBody::ChangeTrust { line } => ResolvedOperation::TrustLine {
                kind: OperationKind::ChangeTrust,
                source: op.resolve_source(tx_source)?,
                asset: line.code(),
            },
            OperationBody::AllowTrust { asset_code, .. } => ResolvedOperation::TrustLine {
                kind: OperationKind::AllowTrust,
                source: op.resolve_source(tx_source)?,
                asset: asset_code.clone(),
            },
            OperationBody::ManageData { name } => ResolvedOperation::ManageData {
                key: DataKey::new(op.resolve_source(tx_source)?, name.clone()),
            },
            OperationBody::AccountMerge { destination } => ResolvedOperation::AccountMerge {
                source: op.resolve_source(tx_source)?,
                destination: destination.demux()?,
            },
            OperationBody::Unmodeled { kind } => ResolvedOperation::Unmodeled { kind: *kind },
        };
        Ok(resolved)
    }

    /// Protocol kind the conflict is attributed to
    pub fn kind(&self) -> OperationKind {
        match self {
            ResolvedOperation::CreateAccount { .. } => OperationKind::CreateAccount,
            ResolvedOperation::Payment { .. } => OperationKind::Payment,
            ResolvedOperation::ManageData { .. } => OperationKind::ManageData,
            ResolvedOperation::AccountMerge { .. } => OperationKind::AccountMerge,
            ResolvedOperation::PathPayment { kind, .. }
            | ResolvedOperation::Offer { kind, .. }
            | ResolvedOperation::TrustLine { kind, .. }
            | ResolvedOperation::Unmodeled { kind } => *kind,
        }
    }

    /// Check the operation against the batch footprint
    ///
    /// Returns the first conflicting access, in the same order `commit`
    /// applies them.
    pub fn check(&self, model: &ConflictModel) -> Option<Conflict> {
        self.first_conflict(model)
            .map(|reason| Conflict::operation(self.kind(), reason))
    }

    fn first_conflict(&self, model: &ConflictModel) -> Option<ConflictReason> {
        match self {
            ResolvedOperation::CreateAccount {
                source,
                destination,
            } => {
                if !model.check_identity_modify(destination) {
                    return Some(ConflictReason::Account);
                }
                if !model.check_balance_down(&BalanceKey::native(*source)) {
                    return Some(ConflictReason::AccountBalance);
                }
                None
            }
            ResolvedOperation::Payment {
                source,
                destination,
                asset,
            } => {
                let debit = BalanceKey::new(*source, asset.clone());
                let credit = BalanceKey::new(*destination, asset.clone());
                if !(model.check_balance_down(&debit) && model.check_balance_up(&credit)) {
                    return Some(ConflictReason::AccountBalance);
                }
                None
            }
            ResolvedOperation::PathPayment {
                source,
                destination,
                send_asset,
                path,
                dest_asset,
                ..
            } => {
                if !model.check_balance_down(&BalanceKey::new(*source, send_asset.clone())) {
                    return Some(ConflictReason::AccountBalance);
                }
                if markets_along(send_asset, path, dest_asset)
                    .any(|market| !model.check_market(&market))
                {
                    return Some(ConflictReason::Market);
                }
                // destination credit is reported as a market conflict
                if !model.check_balance_up(&BalanceKey::new(*destination, dest_asset.clone())) {
                    return Some(ConflictReason::Market);
                }
                None
            }
            ResolvedOperation::Offer {
                source,
                selling,
                buying,
                ..
            } => {
                if !model.check_market(&MarketKey::new(selling.clone(), buying.clone())) {
                    return Some(ConflictReason::Market);
                }
                // an offer can move either balance in either direction
                let blocked = offer_balances(*source, selling, buying)
                    .any(|(_, key)| !model.check_balance(&key));
                if blocked {
                    return Some(ConflictReason::AccountBalance);
                }
                None
            }
            ResolvedOperation::TrustLine { source, asset, .. } => {
                let key = BalanceKey::new(*source, asset.clone());
                if !(model.check_balance_down(&key) && model.check_balance_up(&key)) {
                    return Some(ConflictReason::AccountBalance);
                }
                None
            }
            ResolvedOperation::ManageData { key } => {
                if !model.check_data(key) {
                    return Some(ConflictReason::Account);
                }
                None
            }
            ResolvedOperation::AccountMerge {
                source,
                destination,
            } => {
                if !(model.check_identity_modify(source)
                    && model.check_identity_modify(destination))
                {
                    return Some(ConflictReason::Account);
                }
                None
            }
            ResolvedOperation::Unmodeled { kind } => {
                tracing::debug!(kind = %kind, "unmodeled operation counted as conflict");
                Some(ConflictReason::Unknown)
            }
        }
    }

    /// Apply the operation's full footprint
    pub fn commit(&self, model: &mut ConflictModel) {
        match self {
            ResolvedOperation::CreateAccount {
                source,
                destination,
            } => {
                model.commit_identity_modify(*destination);
                model.commit_balance_up(BalanceKey::native(*destination));
                model.commit_balance_down(BalanceKey::native(*source));
            }
            ResolvedOperation::Payment {
                source,
                destination,
                asset,
            } => {
                model.commit_balance_down(BalanceKey::new(*source, asset.clone()));
                model.commit_balance_up(BalanceKey::new(*destination, asset.clone()));
            }
            ResolvedOperation::PathPayment {
                source,
                destination,
                send_asset,
                path,
                dest_asset,
                ..
            } => {
                model.commit_balance_down(BalanceKey::new(*source, send_asset.clone()));
                for market in markets_along(send_asset, path, dest_asset) {
                    model.commit_market(market);
                }
                model.commit_balance_up(BalanceKey::new(*destination, dest_asset.clone()));
            }
            ResolvedOperation::Offer {
                source,
                selling,
                buying,
                ..
            } => {
                model.commit_market(MarketKey::new(selling.clone(), buying.clone()));
                for (direction, key) in offer_balances(*source, selling, buying) {
                    model.commit_balance(direction, key);
                }
            }
            ResolvedOperation::TrustLine { source, asset, .. } => {
                model.commit_balance_down(BalanceKey::new(*source, asset.clone()));
                model.commit_balance_up(BalanceKey::new(*source, asset.clone()));
            }
            ResolvedOperation::ManageData { key } => {
                model.commit_data(key.clone());
            }
            ResolvedOperation::AccountMerge {
                source,
                destination,
            } => {
                model.commit_identity_modify(*source);
                model.commit_identity_modify(*destination);
            }
            ResolvedOperation::Unmodeled { .. } => {}
        }
    }
}

/// Consecutive asset pairs along `[send, path.., dest]`
fn markets_along<'a>(
    send_asset: &'a AssetCode,
    path: &'a [AssetCode],
    dest_asset: &'a AssetCode,
) -> impl Iterator<Item = MarketKey> + 'a {
    let hops = std::iter::once(send_asset)
        .chain(path.iter())
        .chain(std::iter::once(dest_asset));
    hops.clone()
        .zip(hops.skip(1))
        .map(|(from, to)| MarketKey::new(from.clone(), to.clone()))
}

/// Both directions of both offer assets, selling asset first
fn offer_balances(
    source: AccountId,
    selling: &AssetCode,
    buying: &AssetCode,
) -> impl Iterator<Item = (Direction, BalanceKey)> {
    [
        (Direction::Down, BalanceKey::new(source, selling.clone())),
        (Direction::Up, BalanceKey::new(source, selling.clone())),
        (Direction::Down, BalanceKey::new(source, buying.clone())),
        (Direction::Up, BalanceKey::new(source, buying.clone())),
    ]
    .into_iter()
}
