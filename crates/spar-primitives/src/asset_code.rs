//! Asset codes used as balance and market keys

use serde::{Deserialize, Serialize};
use std::fmt;

/// Asset code string keyed on by the conflict model
///
/// Issuers are not part of the code, so two credit assets with the same
/// code share balance and market keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetCode(String);

impl AssetCode {
    /// Code of the native asset
    pub const NATIVE: &'static str = "XLM";

    /// Code reported for liquidity pool share trust lines
    pub const POOL_SHARE: &'static str = "LIQUIDITY_POOL_SHARE";

    /// Native asset code
    pub fn native() -> Self {
        AssetCode(Self::NATIVE.to_string())
    }

    /// Liquidity pool share code
    pub fn pool_share() -> Self {
        AssetCode(Self::POOL_SHARE.to_string())
    }

    /// Get the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetCode {
    fn from(code: &str) -> Self {
        AssetCode(code.to_string())
    }
}
