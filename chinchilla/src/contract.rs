//! Typed binding for the ChinchillaCoin token contract.

use std::time::Duration;

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{sol, SolCall};
use tracing::{debug, info};

use crate::error::{ChinchillaError, Result};
use crate::provider::WalletProvider;
use crate::types::{TransactionRequest, TxReceipt};

sol! {
    interface IChinchillaCoin {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function owner() external view returns (address);
        function totalSupply() external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function burn(uint256 amount) external;
        function mint(address to, uint256 amount) external;
    }
}

/// A token contract bound to a wallet provider.
///
/// Reads go through `eth_call`. Writes are signed by `signer` through the
/// wallet and return a [`PendingTransaction`].
#[derive(Debug)]
pub struct TokenContract<'a, P> {
    provider: &'a P,
    address: Address,
    signer: Option<Address>,
    poll_interval: Duration,
}

impl<'a, P: WalletProvider> TokenContract<'a, P> {
    pub fn new(provider: &'a P, address: Address, poll_interval: Duration) -> Self {
        Self {
            provider,
            address,
            signer: None,
            poll_interval,
        }
    }

    /// Bind writes (and reads) to `signer`.
    pub fn with_signer(mut self, signer: Address) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    fn request<C: SolCall>(&self, call: &C) -> TransactionRequest {
        TransactionRequest {
            from: self.signer,
            to: self.address,
            data: Bytes::from(call.abi_encode()),
        }
    }

    async fn read<C: SolCall>(&self, call: C) -> Result<C::Return> {
        let output = self.provider.call(&self.request(&call)).await?;
        Ok(C::abi_decode_returns(&output)?)
    }

    async fn write<C: SolCall>(&self, call: C) -> Result<PendingTransaction<'a, P>> {
        if self.signer.is_none() {
            return Err(ChinchillaError::Validation(format!(
                "{} requires a signer",
                C::SIGNATURE
            )));
        }
        let tx_hash = self.provider.send_transaction(&self.request(&call)).await?;
        debug!(%tx_hash, call = C::SIGNATURE, "transaction submitted");
        Ok(PendingTransaction {
            provider: self.provider,
            tx_hash,
            poll_interval: self.poll_interval,
        })
    }

    // --- Reads ---

    pub async fn name(&self) -> Result<String> {
        self.read(IChinchillaCoin::nameCall {}).await
    }

    pub async fn symbol(&self) -> Result<String> {
        self.read(IChinchillaCoin::symbolCall {}).await
    }

    pub async fn owner(&self) -> Result<Address> {
        self.read(IChinchillaCoin::ownerCall {}).await
    }

    /// Total supply in smallest units.
    pub async fn total_supply(&self) -> Result<U256> {
        self.read(IChinchillaCoin::totalSupplyCall {}).await
    }

    // --- Writes ---

    pub async fn transfer(&self, to: Address, amount: U256) -> Result<PendingTransaction<'a, P>> {
        self.write(IChinchillaCoin::transferCall { to, amount }).await
    }

    pub async fn burn(&self, amount: U256) -> Result<PendingTransaction<'a, P>> {
        self.write(IChinchillaCoin::burnCall { amount }).await
    }

    pub async fn mint(&self, to: Address, amount: U256) -> Result<PendingTransaction<'a, P>> {
        self.write(IChinchillaCoin::mintCall { to, amount }).await
    }
}

/// A submitted transaction that has not been observed in a block yet.
#[derive(Debug)]
pub struct PendingTransaction<'a, P> {
    provider: &'a P,
    tx_hash: B256,
    poll_interval: Duration,
}

impl<P: WalletProvider> PendingTransaction<'_, P> {
    pub fn tx_hash(&self) -> B256 {
        self.tx_hash
    }

    /// Poll for the receipt until the transaction is mined (one confirmation).
    ///
    /// There is no timeout: a transaction that never lands keeps this future
    /// pending.
    ///
    /// # Errors
    ///
    /// Returns `ChinchillaError::Reverted` if execution failed.
    pub async fn wait(self) -> Result<TxReceipt> {
        loop {
            if let Some(receipt) = self.provider.transaction_receipt(self.tx_hash).await? {
                if !receipt.succeeded() {
                    return Err(ChinchillaError::Reverted(self.tx_hash));
                }
                let mined = TxReceipt::from(&receipt);
                info!(
                    tx_hash = %mined.tx_hash,
                    block = mined.block_number,
                    gas_used = mined.gas_used,
                    "transaction mined"
                );
                return Ok(mined);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
