use alloy_primitives::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Token metadata read from the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    /// Total supply in whole tokens (scaled down by 10^18).
    pub total_supply: Decimal,
    pub owner: Address,
}

/// Token metadata together with the caller's relation to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSnapshot {
    pub info: TokenInfo,
    /// Whether the caller address is the token owner.
    pub is_owner: bool,
}

impl TokenInfo {
    /// Whether `caller` is the owner reported by the contract.
    pub fn is_owned_by(&self, caller: Address) -> bool {
        self.owner == caller
    }
}
