use alloy_primitives::{Address, Bytes, B256, U64};
use serde::{Deserialize, Serialize};

/// Call or transaction parameters for `eth_call` / `eth_sendTransaction`.
///
/// Gas, fees and nonce are left to the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    pub to: Address,
    #[serde(alias = "input")]
    pub data: Bytes,
}

/// Receipt as returned by `eth_getTransactionReceipt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    #[serde(default)]
    pub block_number: Option<U64>,
    #[serde(default)]
    pub gas_used: Option<U64>,
    /// `0x1` on success, `0x0` when execution reverted.
    #[serde(default)]
    pub status: Option<U64>,
}

impl TransactionReceipt {
    /// Whether execution succeeded. Receipts without a status field are
    /// treated as successful.
    pub fn succeeded(&self) -> bool {
        self.status.map_or(true, |s| !s.is_zero())
    }
}

/// Outcome of a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: B256,
    pub block_number: u64,
    pub gas_used: u64,
}

impl From<&TransactionReceipt> for TxReceipt {
    fn from(r: &TransactionReceipt) -> Self {
        Self {
            tx_hash: r.transaction_hash,
            block_number: r.block_number.map(|n| n.to::<u64>()).unwrap_or_default(),
            gas_used: r.gas_used.map(|g| g.to::<u64>()).unwrap_or_default(),
        }
    }
}
