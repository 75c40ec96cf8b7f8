use alloy_primitives::{Address, Bytes, B256};

use crate::error::Result;
use crate::rpc::RpcClient;
use crate::types::{TransactionReceipt, TransactionRequest};

impl RpcClient {
    // --- Accounts ---

    /// eth_requestAccounts - Ask the wallet for account access (may prompt the user).
    pub async fn eth_request_accounts(&self) -> Result<Vec<Address>> {
        self.request("eth_requestAccounts", [(); 0]).await
    }

    /// eth_accounts - Accounts already authorised for this origin.
    pub async fn eth_accounts(&self) -> Result<Vec<Address>> {
        self.request("eth_accounts", [(); 0]).await
    }

    // --- State ---

    /// eth_call - Execute a read-only call against the latest block.
    pub async fn eth_call(&self, tx: &TransactionRequest) -> Result<Bytes> {
        self.request("eth_call", (tx, "latest")).await
    }

    // --- Transactions ---

    /// eth_sendTransaction - Have the wallet sign and broadcast a transaction.
    pub async fn eth_send_transaction(&self, tx: &TransactionRequest) -> Result<B256> {
        self.request("eth_sendTransaction", [tx]).await
    }

    /// eth_getTransactionReceipt - Receipt of a mined transaction, `None` while pending.
    pub async fn eth_get_transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<TransactionReceipt>> {
        self.request("eth_getTransactionReceipt", [hash]).await
    }
}
