mod token;
mod transaction;

pub use token::{TokenInfo, TokenSnapshot};
pub use transaction::{TransactionReceipt, TransactionRequest, TxReceipt};
