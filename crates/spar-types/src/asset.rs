//! Asset descriptors carried by decoded operations

use serde::{Deserialize, Serialize};
use spar_primitives::{AccountId, AssetCode};

/// Asset referenced by payments, offers and path payments
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Asset {
    /// The native lumen
    Native,
    /// Credit asset with a code of up to 4 characters
    CreditAlphanum4 {
        /// Asset code
        code: AssetCode,
        /// Issuing account
        issuer: AccountId,
    },
    /// Credit asset with a code of 5 to 12 characters
    CreditAlphanum12 {
        /// Asset code
        code: AssetCode,
        /// Issuing account
        issuer: AccountId,
    },
}

impl Asset {
    /// Code used as the balance/market key
    pub fn code(&self) -> AssetCode {
        match self {
            Asset::Native => AssetCode::native(),
            Asset::CreditAlphanum4 { code, .. } | Asset::CreditAlphanum12 { code, .. } => {
                code.clone()
            }
        }
    }

    /// Shorthand for a 4-character credit asset
    pub fn credit(code: &str, issuer: AccountId) -> Self {
        if code.len() <= 4 {
            Asset::CreditAlphanum4 {
                code: AssetCode::from(code),
                issuer,
            }
        } else {
            Asset::CreditAlphanum12 {
                code: AssetCode::from(code),
                issuer,
            }
        }
    }
}

/// Asset named by a change-trust operation's trust line
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeTrustAsset {
    /// The native lumen
    Native,
    /// Credit asset with a code of up to 4 characters
    CreditAlphanum4 {
        /// Asset code
        code: AssetCode,
        /// Issuing account
        issuer: AccountId,
    },
    /// Credit asset with a code of 5 to 12 characters
    CreditAlphanum12 {
        /// Asset code
        code: AssetCode,
        /// Issuing account
        issuer: AccountId,
    },
    /// Liquidity pool share
    PoolShare,
}

impl ChangeTrustAsset {
    /// Code used as the balance key
    pub fn code(&self) -> AssetCode {
        match self {
            ChangeTrustAsset::Native => AssetCode::native(),
            ChangeTrustAsset::CreditAlphanum4 { code, .. }
            | ChangeTrustAsset::CreditAlphanum12 { code, .. } => code.clone(),
            ChangeTrustAsset::PoolShare => AssetCode::pool_share(),
        }
    }
}

impl From<Asset> for ChangeTrustAsset {
    fn from(asset: Asset) -> Self {
        match asset {
            Asset::Native => ChangeTrustAsset::Native,
            Asset::CreditAlphanum4 { code, issuer } => {
                ChangeTrustAsset::CreditAlphanum4 { code, issuer }
            }
            Asset::CreditAlphanum12 { code, issuer } => {
                ChangeTrustAsset::CreditAlphanum12 { code, issuer }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> AccountId {
        AccountId::from_bytes([0x11; 32])
    }

    #[test]
    fn test_asset_codes() {
        assert_eq!(Asset::Native.code().as_str(), "XLM");
        assert_eq!(Asset::credit("USD", issuer()).code().as_str(), "USD");
        assert_eq!(Asset::credit("LONGCODE", issuer()).code().as_str(), "LONGCODE");
    }

    #[test]
    fn test_credit_picks_variant_by_length() {
        assert!(matches!(
            Asset::credit("USDC", issuer()),
            Asset::CreditAlphanum4 { .. }
        ));
        assert!(matches!(
            Asset::credit("USDCX", issuer()),
            Asset::CreditAlphanum12 { .. }
        ));
    }

    #[test]
    fn test_issuer_not_part_of_code() {
        let a = Asset::credit("USD", AccountId::from_bytes([1; 32]));
        let b = Asset::credit("USD", AccountId::from_bytes([2; 32]));
        assert_ne!(a, b);
        assert_eq!(a.code(), b.code());
    }

    #[test]
    fn test_change_trust_codes() {
        assert_eq!(ChangeTrustAsset::PoolShare.code().as_str(), "LIQUIDITY_POOL_SHARE");
        assert_eq!(ChangeTrustAsset::Native.code().as_str(), "XLM");
        let line: ChangeTrustAsset = Asset::credit("EUR", issuer()).into();
        assert_eq!(line.code().as_str(), "EUR");
    }

    #[test]
    fn test_asset_json_shape() {
        let json = serde_json::to_value(Asset::Native).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "native" }));

        let parsed: Asset = serde_json::from_value(serde_json::json!({
            "type": "credit_alphanum4",
            "code": "USD",
            "issuer": "11".repeat(32),
        }))
        .unwrap();
        assert_eq!(parsed, Asset::credit("USD", issuer()));
    }
}
