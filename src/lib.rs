pub mod client;
pub mod config;
pub mod domains;
pub mod error;
pub mod interfaces;
pub mod services;

pub use crate::client::WalletClient;
pub use crate::config::Config;
pub use crate::domains::account::{
    AccountInfo, CurrencyInfo, SendTransactionParams, SendTransactionResult, TransactionFilters,
};
pub use crate::domains::envelope::{CallOutcome, RequestEnvelope, ResponseEnvelope};
pub use crate::error::{Result, WalletBridgeError};
