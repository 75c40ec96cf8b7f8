use alloy_primitives::B256;
use thiserror::Error;

/// JSON-RPC error code an EIP-1193 wallet returns when the user dismisses a prompt.
pub const USER_REJECTED_CODE: i64 = 4001;

#[derive(Error, Debug)]
pub enum ChinchillaError {
    #[error("no wallet provider available")]
    ProviderMissing,

    #[error("wallet request rejected: {0}")]
    UserRejected(String),

    #[error("contract read failed: {0}")]
    ContractRead(String),

    #[error("transaction failed: {0}")]
    Transaction(String),

    #[error("transaction {0} reverted")]
    Reverted(B256),

    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ABI error: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    #[error("overflow: {0}")]
    Overflow(String),

    #[error("validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, ChinchillaError>;

impl ChinchillaError {
    /// Whether the wallet endpoint could not be reached at all.
    fn is_unreachable(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_connect())
    }

    /// Classify a failure raised while requesting account access.
    pub fn into_connect_error(self) -> Self {
        if self.is_unreachable() {
            return Self::ProviderMissing;
        }
        match self {
            Self::ProviderMissing | Self::UserRejected(_) => self,
            ref e if e.is_user_rejection() => {
                Self::UserRejected("user dismissed the wallet prompt".into())
            }
            other => Self::UserRejected(format!("wallet error: {other}")),
        }
    }

    /// Classify a failure raised while reading contract state.
    pub fn into_read_error(self) -> Self {
        if self.is_unreachable() {
            return Self::ProviderMissing;
        }
        match self {
            Self::ProviderMissing | Self::ContractRead(_) => self,
            other => Self::ContractRead(other.to_string()),
        }
    }

    /// Classify a failure raised while submitting or awaiting a transaction.
    pub fn into_transaction_error(self) -> Self {
        if self.is_unreachable() {
            return Self::ProviderMissing;
        }
        match self {
            Self::ProviderMissing | Self::Transaction(_) => self,
            other => Self::Transaction(other.to_string()),
        }
    }

    /// True for the EIP-1193 "user rejected request" error.
    pub fn is_user_rejection(&self) -> bool {
        match self {
            Self::UserRejected(_) => true,
            Self::Rpc { code, .. } => *code == USER_REJECTED_CODE,
            _ => false,
        }
    }
}
