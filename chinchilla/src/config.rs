use std::time::Duration;

use alloy_primitives::{address, Address};

/// Address of the deployed ChinchillaCoin contract.
pub const DEFAULT_CONTRACT_ADDRESS: Address = address!("655FBaA8D93BeedaC9317EfFC574a37096FCe403");

/// Default interval between `eth_getTransactionReceipt` polls.
pub const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(1_000);

/// Configuration for the token gateway.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// JSON-RPC endpoint of the injected wallet (e.g. `http://127.0.0.1:1248`).
    /// `None` means no wallet is installed.
    pub wallet_rpc_url: Option<String>,
    /// Token contract address.
    pub contract_address: Address,
    /// Interval between receipt polls while waiting for a transaction to be mined.
    pub receipt_poll_interval: Duration,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            wallet_rpc_url: None,
            contract_address: DEFAULT_CONTRACT_ADDRESS,
            receipt_poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
        }
    }
}
