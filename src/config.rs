//! Resolve [`ChainConfig`] from CLI flags and the environment.

use std::time::Duration;

use chinchilla::{Address, ChainConfig};
use tracing::debug;

use crate::cli::ChainArgs;
use crate::error::BankError;

pub const ENV_WALLET_RPC_URL: &str = "WALLET_RPC_URL";
pub const ENV_CONTRACT_ADDRESS: &str = "CONTRACT_ADDRESS";
pub const ENV_RECEIPT_POLL_MS: &str = "RECEIPT_POLL_MS";

/// Build the chain config. Flags win over `env`; anything unset keeps its default.
///
/// `env` is a lookup so callers can pass `std::env::var` or a fixed map.
pub fn chain_config(
    args: &ChainArgs,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ChainConfig, BankError> {
    let mut config = ChainConfig::default();

    let rpc_url = args.rpc_url.clone().or_else(|| env(ENV_WALLET_RPC_URL));
    config.wallet_rpc_url = rpc_url.filter(|u| !u.trim().is_empty());

    if let Some(raw) = args.contract.clone().or_else(|| env(ENV_CONTRACT_ADDRESS)) {
        config.contract_address = raw
            .trim()
            .parse::<Address>()
            .map_err(|e| BankError::Config(format!("invalid contract address {raw:?}: {e}")))?;
    }

    let poll_ms = match args.poll_ms {
        Some(ms) => Some(ms),
        None => env(ENV_RECEIPT_POLL_MS)
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|e| {
                    BankError::Config(format!("invalid {ENV_RECEIPT_POLL_MS} {raw:?}: {e}"))
                })
            })
            .transpose()?,
    };
    if let Some(ms) = poll_ms {
        if ms == 0 {
            return Err(BankError::Config("receipt poll interval must be > 0".into()));
        }
        config.receipt_poll_interval = Duration::from_millis(ms);
    }

    debug!(
        wallet_rpc_url = ?config.wallet_rpc_url,
        contract = %config.contract_address,
        poll_ms = config.receipt_poll_interval.as_millis() as u64,
        "chain config resolved"
    );
    Ok(config)
}
