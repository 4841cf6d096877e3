//! Ledger account identities (32-byte ed25519 public keys)
//!
//! Accounts are written as `G...` strkeys. Hex is accepted on input.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use stellar_strkey::ed25519::PublicKey as StrkeyPublicKey;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Account id parsing error
#[derive(Debug, Error)]
pub enum AccountError {
    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    /// Invalid length
    #[error("invalid account id length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
    /// Not a valid `G...` public key strkey
    #[error("invalid account strkey: {0}")]
    InvalidStrkey(String),
}

/// Identity resolution error
///
/// Raised when an account address form is not understood by the model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// Multiplexed account that is not a plain ed25519 key
    #[error("unsupported multiplexed account (id {id})")]
    UnsupportedMuxedAccount {
        /// Multiplexing id carried by the address
        id: u64,
    },
}

/// Ed25519 public key identifying a ledger account
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountId([u8; 32]);

impl AccountId {
    /// Size of an account id in bytes
    pub const LEN: usize = 32;

    /// Create account id from bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        AccountId(bytes)
    }

    /// Create account id from slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, AccountError> {
        if slice.len() != Self::LEN {
            return Err(AccountError::InvalidLength(slice.len()));
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);
        Ok(AccountId(bytes))
    }

    /// Parse account id from hex string (with or without 0x prefix)
    pub fn from_hex(s: &str) -> Result<Self, AccountError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| AccountError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Parse a `G...` public key strkey
    pub fn from_strkey(s: &str) -> Result<Self, AccountError> {
        let key = StrkeyPublicKey::from_string(s)
            .map_err(|_| AccountError::InvalidStrkey(s.to_string()))?;
        Ok(AccountId(key.0))
    }

    /// Encode as a `G...` public key strkey
    pub fn to_strkey(&self) -> String {
        StrkeyPublicKey(self.0).to_string()
    }
}

impl FromStr for AccountId {
    type Err = AccountError;

    /// Accepts a `G...` strkey or 64 hex digits
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with('G') {
            Self::from_strkey(s)
        } else {
            Self::from_hex(s)
        }
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_strkey())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_strkey())
    }
}

impl Serialize for AccountId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_strkey())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Account address as it appears in a decoded envelope
///
/// Only the plain ed25519 form maps onto an [`AccountId`]; multiplexed
/// sub-accounts are rejected by [`MuxedAccount::demux`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuxedAccount {
    /// Plain ed25519 key
    Ed25519(AccountId),
    /// Multiplexed sub-account of an ed25519 key
    MuxedEd25519 {
        /// Multiplexing id
        id: u64,
        /// Underlying key
        ed25519: AccountId,
    },
}

impl MuxedAccount {
    /// Resolve to the account identity the model keys resources on
    pub fn demux(&self) -> Result<AccountId, IdentityError> {
        match self {
            MuxedAccount::Ed25519(account) => Ok(*account),
            MuxedAccount::MuxedEd25519 { id, .. } => {
                Err(IdentityError::UnsupportedMuxedAccount { id: *id })
            }
        }
    }
}

impl From<AccountId> for MuxedAccount {
    fn from(account: AccountId) -> Self {
        MuxedAccount::Ed25519(account)
    }
}
