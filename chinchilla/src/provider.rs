//! The wallet capability the gateway talks to.
//!
//! [`WalletProvider`] is the narrow surface of an injected EIP-1193 wallet
//! that this crate needs: account access, read-only calls, and signing plus
//! broadcasting of transactions. [`InjectedProvider`] implements it over the
//! wallet's JSON-RPC endpoint.

use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use tracing::debug;

use crate::config::ChainConfig;
use crate::error::{ChinchillaError, Result};
use crate::rpc::RpcClient;
use crate::types::{TransactionReceipt, TransactionRequest};

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Request account access. The wallet may prompt the user.
    async fn request_accounts(&self) -> Result<Vec<Address>>;

    /// Accounts the wallet has already exposed, without prompting.
    async fn accounts(&self) -> Result<Vec<Address>>;

    /// Execute a read-only call.
    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes>;

    /// Sign and broadcast a transaction, returning its hash.
    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256>;

    /// Receipt for `hash`, or `None` while the transaction is pending.
    async fn transaction_receipt(&self, hash: B256) -> Result<Option<TransactionReceipt>>;

    /// The account transactions are signed with: the first exposed account.
    async fn signer(&self) -> Result<Address> {
        self.accounts()
            .await?
            .first()
            .copied()
            .ok_or_else(|| ChinchillaError::UserRejected("wallet exposed no accounts".into()))
    }
}

/// A wallet reachable through its JSON-RPC endpoint.
#[derive(Debug)]
pub struct InjectedProvider {
    rpc: RpcClient,
}

impl InjectedProvider {
    pub fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }

    /// Detect the wallet configured in `config`.
    ///
    /// Returns `Ok(None)` when no wallet endpoint is configured.
    ///
    /// # Errors
    ///
    /// Returns `ChinchillaError::Validation` if the configured URL is malformed.
    pub fn detect(config: &ChainConfig) -> Result<Option<Self>> {
        match config.wallet_rpc_url.as_deref().map(str::trim) {
            None | Some("") => {
                debug!("no wallet endpoint configured");
                Ok(None)
            }
            Some(url) => Ok(Some(Self::new(RpcClient::new(url)?))),
        }
    }

    /// Get the underlying RPC client.
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }
}

#[async_trait]
impl WalletProvider for InjectedProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        self.rpc.eth_request_accounts().await
    }

    async fn accounts(&self) -> Result<Vec<Address>> {
        self.rpc.eth_accounts().await
    }

    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes> {
        self.rpc.eth_call(tx).await
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256> {
        self.rpc.eth_send_transaction(tx).await
    }

    async fn transaction_receipt(&self, hash: B256) -> Result<Option<TransactionReceipt>> {
        self.rpc.eth_get_transaction_receipt(hash).await
    }
}
