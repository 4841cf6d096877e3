//! Decoded operations

use crate::asset::{Asset, ChangeTrustAsset};
use serde::{Deserialize, Serialize};
use spar_primitives::{AccountId, AssetCode, IdentityError, MuxedAccount};
use std::fmt;

/// Ledger operation type
///
/// Covers the full protocol, including kinds the conflict model does not
/// give an access pattern to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    /// Create and fund a new account
    CreateAccount,
    /// Send an asset
    Payment,
    /// Path payment fixing the received amount
    PathPaymentStrictReceive,
    /// Create, update or delete a sell offer
    ManageSellOffer,
    /// Passive sell offer
    CreatePassiveSellOffer,
    /// Account options
    SetOptions,
    /// Create, update or delete a trust line
    ChangeTrust,
    /// Authorize a trust line (legacy)
    AllowTrust,
    /// Merge an account into another
    AccountMerge,
    /// Inflation (retired)
    Inflation,
    /// Set, modify or delete a data entry
    ManageData,
    /// Bump the sequence number
    BumpSequence,
    /// Create, update or delete a buy offer
    ManageBuyOffer,
    /// Path payment fixing the sent amount
    PathPaymentStrictSend,
    /// Create a claimable balance
    CreateClaimableBalance,
    /// Claim a claimable balance
    ClaimClaimableBalance,
    /// Begin sponsoring reserves
    BeginSponsoringFutureReserves,
    /// End sponsoring reserves
    EndSponsoringFutureReserves,
    /// Revoke a sponsorship
    RevokeSponsorship,
    /// Claw back an asset
    Clawback,
    /// Claw back a claimable balance
    ClawbackClaimableBalance,
    /// Set trust line flags
    SetTrustLineFlags,
    /// Deposit into a liquidity pool
    LiquidityPoolDeposit,
    /// Withdraw from a liquidity pool
    LiquidityPoolWithdraw,
    /// Invoke a smart contract host function
    InvokeHostFunction,
    /// Extend contract data TTL
    ExtendFootprintTtl,
    /// Restore archived contract data
    RestoreFootprint,
}

impl OperationKind {
    /// Protocol name of the operation kind
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::CreateAccount => "CREATE_ACCOUNT",
            OperationKind::Payment => "PAYMENT",
            OperationKind::PathPaymentStrictReceive => "PATH_PAYMENT_STRICT_RECEIVE",
            OperationKind::ManageSellOffer => "MANAGE_SELL_OFFER",
            OperationKind::CreatePassiveSellOffer => "CREATE_PASSIVE_SELL_OFFER",
            OperationKind::SetOptions => "SET_OPTIONS",
            OperationKind::ChangeTrust => "CHANGE_TRUST",
            OperationKind::AllowTrust => "ALLOW_TRUST",
            OperationKind::AccountMerge => "ACCOUNT_MERGE",
            OperationKind::Inflation => "INFLATION",
            OperationKind::ManageData => "MANAGE_DATA",
            OperationKind::BumpSequence => "BUMP_SEQUENCE",
            OperationKind::ManageBuyOffer => "MANAGE_BUY_OFFER",
            OperationKind::PathPaymentStrictSend => "PATH_PAYMENT_STRICT_SEND",
            OperationKind::CreateClaimableBalance => "CREATE_CLAIMABLE_BALANCE",
            OperationKind::ClaimClaimableBalance => "CLAIM_CLAIMABLE_BALANCE",
            OperationKind::BeginSponsoringFutureReserves => "BEGIN_SPONSORING_FUTURE_RESERVES",
            OperationKind::EndSponsoringFutureReserves => "END_SPONSORING_FUTURE_RESERVES",
            OperationKind::RevokeSponsorship => "REVOKE_SPONSORSHIP",
            OperationKind::Clawback => "CLAWBACK",
            OperationKind::ClawbackClaimableBalance => "CLAWBACK_CLAIMABLE_BALANCE",
            OperationKind::SetTrustLineFlags => "SET_TRUST_LINE_FLAGS",
            OperationKind::LiquidityPoolDeposit => "LIQUIDITY_POOL_DEPOSIT",
            OperationKind::LiquidityPoolWithdraw => "LIQUIDITY_POOL_WITHDRAW",
            OperationKind::InvokeHostFunction => "INVOKE_HOST_FUNCTION",
            OperationKind::ExtendFootprintTtl => "EXTEND_FOOTPRINT_TTL",
            OperationKind::RestoreFootprint => "RESTORE_FOOTPRINT",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific operation fields
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OperationBody {
    /// Create and fund `destination`
    CreateAccount {
        /// New account
        destination: AccountId,
    },
    /// Send `asset` to `destination`
    Payment {
        /// Receiving account
        destination: MuxedAccount,
        /// Asset sent
        asset: Asset,
    },
    /// Path payment with a fixed received amount
    PathPaymentStrictReceive {
        /// Asset debited from the source
        send_asset: Asset,
        /// Receiving account
        destination: MuxedAccount,
        /// Asset credited to the destination
        dest_asset: Asset,
        /// Intermediate assets
        #[serde(default)]
        path: Vec<Asset>,
    },
    /// Path payment with a fixed sent amount
    PathPaymentStrictSend {
        /// Asset debited from the source
        send_asset: Asset,
        /// Receiving account
        destination: MuxedAccount,
        /// Asset credited to the destination
        dest_asset: Asset,
        /// Intermediate assets
        #[serde(default)]
        path: Vec<Asset>,
    },
    /// Sell offer placement, update or removal
    ManageSellOffer {
        /// Asset offered
        selling: Asset,
        /// Asset wanted
        buying: Asset,
        /// Existing offer id, 0 for a new offer
        #[serde(default)]
        offer_id: i64,
    },
    /// Buy offer placement, update or removal
    ManageBuyOffer {
        /// Asset offered
        selling: Asset,
        /// Asset wanted
        buying: Asset,
        /// Existing offer id, 0 for a new offer
        #[serde(default)]
        offer_id: i64,
    },
    /// Trust line change
    ChangeTrust {
        /// Trust line asset
        line: ChangeTrustAsset,
    },
    /// Data entry change on the source account
    ManageData {
        /// Data entry name
        name: String,
    },
    /// Merge the source account into `destination`
    AccountMerge {
        /// Account receiving the merged balance
        destination: MuxedAccount,
    },
    /// Trust line authorization
    AllowTrust {
        /// Account holding the trust line
        trustor: AccountId,
        /// Code of the authorized asset
        asset_code: AssetCode,
    },
    /// Any operation kind without an access pattern
    Unmodeled {
        /// Protocol kind of the operation
        kind: OperationKind,
    },
}

impl OperationBody {
    /// Protocol kind of this body
    pub fn kind(&self) -> OperationKind {
        match self {
            OperationBody::CreateAccount { .. } => OperationKind::CreateAccount,
            OperationBody::Payment { .. } => OperationKind::Payment,
            OperationBody::PathPaymentStrictReceive { .. } => {
                OperationKind::PathPaymentStrictReceive
            }
            OperationBody::PathPaymentStrictSend { .. } => OperationKind::PathPaymentStrictSend,
            OperationBody::ManageSellOffer { .. } => OperationKind::ManageSellOffer,
            OperationBody::ManageBuyOffer { .. } => OperationKind::ManageBuyOffer,
            OperationBody::ChangeTrust { .. } => OperationKind::ChangeTrust,
            OperationBody::ManageData { .. } => OperationKind::ManageData,
            OperationBody::AccountMerge { .. } => OperationKind::AccountMerge,
            OperationBody::AllowTrust { .. } => OperationKind::AllowTrust,
            OperationBody::Unmodeled { kind } => *kind,
        }
    }
}

/// One operation of a transaction
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Operation-level source, overriding the transaction source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_account: Option<MuxedAccount>,
    /// Kind-specific fields
    pub body: OperationBody,
}

impl Operation {
    /// Create an operation sourced from its transaction
    pub fn new(body: OperationBody) -> Self {
        Self {
            source_account: None,
            body,
        }
    }

    /// Set an explicit operation source
    pub fn with_source(mut self, source: impl Into<MuxedAccount>) -> Self {
        self.source_account = Some(source.into());
        self
    }

    /// Protocol kind of this operation
    pub fn kind(&self) -> OperationKind {
        self.body.kind()
    }

    /// Account the operation acts on behalf of
    ///
    /// Falls back to `tx_source` when no explicit source is set. Fails for
    /// multiplexed sources.
    pub fn resolve_source(&self, tx_source: AccountId) -> Result<AccountId, IdentityError> {
        match &self.source_account {
            None => Ok(tx_source),
            Some(source) => source.demux(),
        }
    }
}
