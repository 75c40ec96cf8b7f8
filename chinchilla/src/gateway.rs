//! Narrow async interface over the wallet and the token contract.
//!
//! Every operation builds a fresh [`TokenContract`] binding, so nothing is
//! cached between calls. Failures come back classified by operation:
//! `connect` yields `ProviderMissing` or `UserRejected`, reads yield
//! `ProviderMissing` or `ContractRead`, and writes yield `ProviderMissing` or
//! `Transaction`.

use std::time::Duration;

use alloy_primitives::Address;
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::ChainConfig;
use crate::contract::TokenContract;
use crate::error::{ChinchillaError, Result};
use crate::provider::{InjectedProvider, WalletProvider};
use crate::types::{TokenInfo, TokenSnapshot, TxReceipt};
use crate::units::{format_units, parse_units};

#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Request account access and return the primary account.
    async fn connect(&self) -> Result<Address>;

    /// Read token metadata and whether `caller` owns the token.
    async fn fetch_token_info(&self, caller: Address) -> Result<TokenSnapshot>;

    /// Transfer `amount` whole tokens to `to` and wait for the transaction to be mined.
    async fn transfer(&self, amount: Decimal, to: Address) -> Result<TxReceipt>;

    /// Burn `amount` whole tokens and return the new total supply.
    ///
    /// The caller must already be known to be the owner.
    async fn burn(&self, amount: Decimal) -> Result<Decimal>;

    /// Mint `amount` whole tokens to the current owner and return the new total supply.
    ///
    /// The caller must already be known to be the owner.
    async fn mint(&self, amount: Decimal) -> Result<Decimal>;
}

/// [`ChainGateway`] backed by a [`WalletProvider`].
#[derive(Debug)]
pub struct TokenGateway<P> {
    provider: Option<P>,
    contract_address: Address,
    poll_interval: Duration,
}

impl TokenGateway<InjectedProvider> {
    /// Build a gateway for the wallet endpoint in `config`, if any.
    ///
    /// # Errors
    ///
    /// Returns `ChinchillaError::Validation` if the configured URL is malformed.
    pub fn from_config(config: &ChainConfig) -> Result<Self> {
        let provider = InjectedProvider::detect(config)?;
        Ok(Self::new(provider, config))
    }
}

impl<P: WalletProvider> TokenGateway<P> {
    pub fn new(provider: Option<P>, config: &ChainConfig) -> Self {
        Self {
            provider,
            contract_address: config.contract_address,
            poll_interval: config.receipt_poll_interval,
        }
    }

    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    fn provider(&self) -> Result<&P> {
        self.provider.as_ref().ok_or(ChinchillaError::ProviderMissing)
    }

    fn contract(&self) -> Result<TokenContract<'_, P>> {
        Ok(TokenContract::new(
            self.provider()?,
            self.contract_address,
            self.poll_interval,
        ))
    }

    /// Contract bound to the wallet's signing account.
    async fn signing_contract(&self) -> Result<TokenContract<'_, P>> {
        let signer = self.provider()?.signer().await?;
        Ok(self.contract()?.with_signer(signer))
    }

    async fn read_token_info(&self) -> Result<TokenInfo> {
        let contract = self.contract()?;
        let name = contract.name().await?;
        let symbol = contract.symbol().await?;
        let owner = contract.owner().await?;
        let total_supply = format_units(contract.total_supply().await?)?;

        Ok(TokenInfo {
            name,
            symbol,
            total_supply,
            owner,
        })
    }

    async fn read_total_supply(contract: &TokenContract<'_, P>) -> Result<Decimal> {
        format_units(contract.total_supply().await?)
    }

    async fn submit_transfer(&self, amount: Decimal, to: Address) -> Result<TxReceipt> {
        let raw = parse_units(amount)?;
        let contract = self.signing_contract().await?;
        info!(%amount, %to, contract = %contract.address(), "transferring tokens");
        let pending = contract.transfer(to, raw).await?;
        info!(tx_hash = %pending.tx_hash(), "transfer submitted, waiting for receipt");
        let receipt = pending.wait().await?;
        info!(tx_hash = %receipt.tx_hash, "tokens transferred");
        Ok(receipt)
    }

    async fn submit_burn(&self, amount: Decimal) -> Result<Decimal> {
        let raw = parse_units(amount)?;
        let contract = self.signing_contract().await?;
        info!(%amount, contract = %contract.address(), "burning tokens");
        let pending = contract.burn(raw).await?;
        info!(tx_hash = %pending.tx_hash(), "burn submitted, waiting for receipt");
        let receipt = pending.wait().await?;
        info!(tx_hash = %receipt.tx_hash, "tokens burned");
        Self::read_total_supply(&contract).await
    }

    async fn submit_mint(&self, amount: Decimal) -> Result<Decimal> {
        let raw = parse_units(amount)?;
        let contract = self.signing_contract().await?;
        // Recipient is whoever owns the token right now, not a cached owner.
        let owner = contract.owner().await?;
        info!(%amount, %owner, contract = %contract.address(), "minting tokens");
        let pending = contract.mint(owner, raw).await?;
        info!(tx_hash = %pending.tx_hash(), "mint submitted, waiting for receipt");
        let receipt = pending.wait().await?;
        info!(tx_hash = %receipt.tx_hash, "tokens minted");
        Self::read_total_supply(&contract).await
    }
}

#[async_trait]
impl<P: WalletProvider> ChainGateway for TokenGateway<P> {
    async fn connect(&self) -> Result<Address> {
        let result: Result<Address> = async {
            self.provider()?
                .request_accounts()
                .await?
                .first()
                .copied()
                .ok_or_else(|| ChinchillaError::UserRejected("wallet returned no accounts".into()))
        }
        .await;

        match result {
            Ok(account) => {
                info!(%account, "account connected");
                Ok(account)
            }
            Err(e) => {
                let e = e.into_connect_error();
                warn!(error = %e, "wallet connection failed");
                Err(e)
            }
        }
    }

    async fn fetch_token_info(&self, caller: Address) -> Result<TokenSnapshot> {
        let info = self
            .read_token_info()
            .await
            .map_err(ChinchillaError::into_read_error)?;
        let is_owner = info.is_owned_by(caller);
        Ok(TokenSnapshot { info, is_owner })
    }

    async fn transfer(&self, amount: Decimal, to: Address) -> Result<TxReceipt> {
        self.submit_transfer(amount, to)
            .await
            .map_err(ChinchillaError::into_transaction_error)
    }

    async fn burn(&self, amount: Decimal) -> Result<Decimal> {
        self.submit_burn(amount)
            .await
            .map_err(ChinchillaError::into_transaction_error)
    }

    async fn mint(&self, amount: Decimal) -> Result<Decimal> {
        self.submit_mint(amount)
            .await
            .map_err(ChinchillaError::into_transaction_error)
    }
}
