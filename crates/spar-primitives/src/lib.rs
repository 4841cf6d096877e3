//! # spar-primitives
//!
//! Primitive ledger identifiers used by the spar conflict analyzer.
//!
//! This crate provides account identities and asset codes, the two
//! components every resource key is built from.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod account;
mod asset_code;

pub use account::{AccountError, AccountId, IdentityError, MuxedAccount};
pub use asset_code::AssetCode;

/// Ledger sequence number type
pub type LedgerSeq = u32;
