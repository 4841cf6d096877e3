//! # spar-types
//!
//! Decoded ledger transactions as consumed by the conflict model.
//!
//! Decoding the chain's binary envelope happens upstream; this crate
//! defines the typed result of that step and the fee-bump resolution
//! that turns a ledger record into a [`Transaction`].

#![warn(missing_docs)]
#![warn(clippy::all)]

mod asset;
mod error;
mod operation;
mod transaction;

pub use asset::{Asset, ChangeTrustAsset};
pub use error::{TypesError, TypesResult};
pub use operation::{Operation, OperationBody, OperationKind};
pub use transaction::{
    Envelope, InnerTransaction, LedgerTransactions, Transaction, TransactionRecord,
};

pub use spar_primitives::{AccountId, AssetCode, IdentityError, LedgerSeq, MuxedAccount};
