//! Error types for decoded transaction handling

use spar_primitives::IdentityError;
use thiserror::Error;

/// Errors raised while turning ledger records into transactions
#[derive(Debug, Error)]
pub enum TypesError {
    /// Account address could not be resolved to an identity
    #[error("identity resolution failed: {0}")]
    Identity(#[from] IdentityError),
}

/// Result type for transaction decoding
pub type TypesResult<T> = Result<T, TypesError>;
