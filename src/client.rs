use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use crate::domains::account::{
    AccountInfo, CurrencyInfo, SendTransactionParams, SendTransactionResult, TransactionFilters,
};
use crate::domains::envelope::{CallOutcome, ResolvedResponse, ResponseEnvelope};
use crate::error::{Result, WalletBridgeError};
use crate::interfaces::transport::{BoxedStream, Transport};
use crate::services::correlator::Correlator;
use crate::services::transport::StreamTransport;

/// Typed surface over the backend message contract: one method per remote
/// operation, each a single request/response exchange.
pub struct WalletClient {
    correlator: Arc<Correlator>,
}

impl WalletClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        inbound: mpsc::Receiver<ResponseEnvelope>,
    ) -> Self {
        Self {
            correlator: Correlator::start(transport, inbound),
        }
    }

    pub fn with_timeout(
        transport: Arc<dyn Transport>,
        inbound: mpsc::Receiver<ResponseEnvelope>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            correlator: Correlator::start_with_timeout(transport, inbound, request_timeout),
        }
    }

    /// Frame a raw byte stream and build a client on top of it.
    pub fn from_stream(stream: BoxedStream, request_timeout: Duration) -> Self {
        let (transport, inbound) = StreamTransport::start(stream);
        Self::with_timeout(Arc::new(transport), inbound, request_timeout)
    }

    pub async fn set_secret_key(&self, password: &str) -> Result<CallOutcome<bool>> {
        self.call("account.setSecretKey", Some(json!({ "password": password })))
            .await
    }

    pub async fn add_account(
        &self,
        json_raw: &str,
        password: &str,
        name: &str,
    ) -> Result<CallOutcome<AccountInfo>> {
        self.call(
            "account.add",
            Some(json!({ "json": json_raw, "password": password, "name": name })),
        )
        .await
    }

    pub async fn remove_account(&self, address: &str) -> Result<CallOutcome<bool>> {
        self.call("account.remove", Some(json!({ "address": address })))
            .await
    }

    pub async fn rename_account(&self, address: &str, name: &str) -> Result<CallOutcome<bool>> {
        self.call(
            "account.rename",
            Some(json!({ "address": address, "name": name })),
        )
        .await
    }

    pub async fn account_list(&self) -> Result<CallOutcome<Vec<AccountInfo>>> {
        self.call("account.list", None).await
    }

    pub async fn ping(&self) -> Result<CallOutcome<Value>> {
        self.call("ping", Some(json!({ "ping": true }))).await
    }

    pub async fn currency_list(&self) -> Result<CallOutcome<Vec<CurrencyInfo>>> {
        self.call("account.getCurrencies", None).await
    }

    pub async fn send(
        &self,
        params: &SendTransactionParams,
    ) -> Result<CallOutcome<SendTransactionResult>> {
        let payload = serde_json::to_value(params)
            .map_err(|e| WalletBridgeError::Serialization(e.to_string()))?;
        self.call("account.send", Some(payload)).await
    }

    pub async fn transaction_list(
        &self,
        filters: Option<&TransactionFilters>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<CallOutcome<Vec<SendTransactionResult>>> {
        let filters = match filters {
            Some(filters) => serde_json::to_value(filters)
                .map_err(|e| WalletBridgeError::Serialization(e.to_string()))?,
            None => Value::Null,
        };
        self.call(
            "transaction.list",
            Some(json!({ "filters": filters, "limit": limit, "offset": offset })),
        )
        .await
    }

    pub async fn gas_price(&self) -> Result<CallOutcome<String>> {
        self.call("account.getGasPrice", None).await
    }

    async fn call<T: DeserializeOwned>(
        &self,
        operation: &str,
        payload: Option<Value>,
    ) -> Result<CallOutcome<T>> {
        let resolved = self.correlator.call(operation, payload, None).await?;
        decode(resolved)
    }
}

fn decode<T: DeserializeOwned>(resolved: ResolvedResponse) -> Result<CallOutcome<T>> {
    let data = match resolved.data {
        Some(value) => Some(
            serde_json::from_value(value)
                .map_err(|e| WalletBridgeError::Serialization(e.to_string()))?,
        ),
        None => None,
    };
    Ok(CallOutcome {
        data,
        validation: resolved.validation,
    })
}
