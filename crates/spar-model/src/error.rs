//! Error types for the conflict model

use spar_primitives::IdentityError;
use thiserror::Error;

/// Conflict model errors
///
/// Conflicts themselves are outcomes, not errors. Only inputs the model
/// cannot interpret end a replay.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Account address the model cannot key resources on
    #[error("transaction {index}: {source}")]
    Identity {
        /// Position of the transaction in the batch
        index: usize,
        /// Underlying resolution failure
        #[source]
        source: IdentityError,
    },
}

/// Result type for conflict model operations
pub type ModelResult<T> = Result<T, ModelError>;
