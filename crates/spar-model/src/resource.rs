//! Resource keys tracked by the conflict model

use spar_primitives::{AccountId, AssetCode};

/// Direction of a balance change
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Balance increases
    Up,
    /// Balance decreases
    Down,
}

/// Balance of one asset held by one account
///
/// The direction is not part of the key; the model keeps one set per
/// direction and checks both.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BalanceKey {
    /// Holding account
    pub account: AccountId,
    /// Asset code
    pub asset: AssetCode,
}

impl BalanceKey {
    /// Create a new balance key
    pub fn new(account: AccountId, asset: AssetCode) -> Self {
        Self { account, asset }
    }

    /// Native balance of an account
    pub fn native(account: AccountId) -> Self {
        Self {
            account,
            asset: AssetCode::native(),
        }
    }
}

/// Unordered pair of asset codes traded against each other
///
/// Constructed in canonical order so `(A, B)` and `(B, A)` are the same key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MarketKey {
    low: AssetCode,
    high: AssetCode,
}

impl MarketKey {
    /// Create a market key from either ordering of the pair
    pub fn new(a: AssetCode, b: AssetCode) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }
}

/// Named data entry of an account
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DataKey {
    /// Owning account
    pub account: AccountId,
    /// Entry name
    pub name: String,
}

impl DataKey {
    /// Create a new data key
    pub fn new(account: AccountId, name: impl Into<String>) -> Self {
        Self {
            account,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn code(s: &str) -> AssetCode {
        AssetCode::from(s)
    }

    #[test]
    fn test_market_key_is_unordered() {
        let ab = MarketKey::new(code("USD"), code("XLM"));
        let ba = MarketKey::new(code("XLM"), code("USD"));
        assert_eq!(ab, ba);

        let mut set = HashSet::new();
        set.insert(ab);
        assert!(set.contains(&ba));
    }

    #[test]
    fn test_market_key_assets_canonical() {
        let key = MarketKey::new(code("XLM"), code("EUR"));
        assert_eq!(key.low.as_str(), "EUR");
        assert_eq!(key.high.as_str(), "XLM");
    }

    #[test]
    fn test_market_key_same_asset() {
        let key = MarketKey::new(code("XLM"), code("XLM"));
        assert_eq!(key.low, key.high);
    }

    #[test]
    fn test_balance_key_native() {
        let account = AccountId::from_bytes([1; 32]);
        assert_eq!(
            BalanceKey::native(account),
            BalanceKey::new(account, code("XLM"))
        );
        assert_ne!(
            BalanceKey::native(account),
            BalanceKey::new(AccountId::from_bytes([2; 32]), code("XLM"))
        );
    }

    #[test]
    fn test_data_key_equality() {
        let account = AccountId::from_bytes([1; 32]);
        assert_eq!(DataKey::new(account, "K"), DataKey::new(account, "K".to_string()));
        assert_ne!(DataKey::new(account, "K"), DataKey::new(account, "K2"));
    }
}
