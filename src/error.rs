use thiserror::Error;

use crate::session::Operation;
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum BankError {
    #[error(transparent)]
    Chain(#[from] chinchilla::ChinchillaError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("wallet is not connected")]
    NotConnected,

    #[error("a {0} is already in progress")]
    OperationInProgress(Operation),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
