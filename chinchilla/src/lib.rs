pub mod config;
pub mod contract;
pub mod error;
pub mod gateway;
pub mod provider;
pub mod rpc;
pub mod types;
pub mod units;

// ---- Top-level re-exports for ergonomic usage ----

// Gateway
pub use gateway::{ChainGateway, TokenGateway};

// Wallet provider + transport
pub use provider::{InjectedProvider, WalletProvider};
pub use rpc::RpcClient;

// Contract binding
pub use contract::{IChinchillaCoin, PendingTransaction, TokenContract};

// Config + errors
pub use config::ChainConfig;
pub use error::{ChinchillaError, Result};

// Token + transaction types
pub use types::{TokenInfo, TokenSnapshot, TransactionReceipt, TransactionRequest, TxReceipt};

// Unit conversion
pub use units::{format_units, parse_units, TOKEN_DECIMALS};

// Primitive types that appear in the public API
pub use alloy_primitives::{Address, B256, U256};
