use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::time::timeout;
use tracing::debug;

use crate::domains::envelope::{RequestEnvelope, ResolvedResponse, ResponseEnvelope};
use crate::error::{Result, WalletBridgeError};
use crate::interfaces::transport::Transport;
use crate::services::validation;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

type PendingMap = Arc<Mutex<HashMap<String, oneshot::Sender<ResponseEnvelope>>>>;

/// Pairs each outbound request with exactly one inbound response by request
/// id. Any number of calls may be outstanding at once; responses resolve
/// their own caller regardless of arrival order.
pub struct Correlator {
    transport: Arc<dyn Transport>,
    pending: PendingMap,
    next_id: AtomicU64,
    default_timeout: Duration,
}

impl Correlator {
    pub fn start(
        transport: Arc<dyn Transport>,
        inbound: mpsc::Receiver<ResponseEnvelope>,
    ) -> Arc<Self> {
        Self::start_with_timeout(transport, inbound, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn start_with_timeout(
        transport: Arc<dyn Transport>,
        mut inbound: mpsc::Receiver<ResponseEnvelope>,
        default_timeout: Duration,
    ) -> Arc<Self> {
        let correlator = Arc::new(Self {
            transport,
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
            default_timeout,
        });

        let pending = correlator.pending.clone();
        tokio::spawn(async move {
            while let Some(envelope) = inbound.recv().await {
                let sender = pending.lock().await.remove(&envelope.request_id);
                match sender {
                    Some(sender) => {
                        // The receiver may be gone if the caller timed out or
                        // dropped its future; either way the slot is consumed.
                        let _ = sender.send(envelope);
                    }
                    None => {
                        debug!(
                            request_id = envelope.request_id.as_str(),
                            "dropping response with no pending request"
                        );
                    }
                }
            }
            debug!("inbound channel closed, correlator dispatch stopped");
        });

        correlator
    }

    fn next_request_id(&self) -> String {
        format!("request{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Send one request and await its matching response. `max_delay` falls
    /// back to the correlator default; on expiry the pending slot is evicted
    /// and the call fails with `Timeout`.
    pub async fn call(
        &self,
        operation: &str,
        payload: Option<Value>,
        max_delay: Option<Duration>,
    ) -> Result<ResolvedResponse> {
        let request_id = self.next_request_id();
        let (reply_tx, reply_rx) = oneshot::channel();
        self.pending
            .lock()
            .await
            .insert(request_id.clone(), reply_tx);

        let request = RequestEnvelope {
            request_id: request_id.clone(),
            operation: operation.to_string(),
            payload,
        };
        debug!(request_id = request_id.as_str(), operation, "sending request");
        if let Err(err) = self.transport.send(&request).await {
            self.pending.lock().await.remove(&request_id);
            return Err(err);
        }

        let max_delay = max_delay.unwrap_or(self.default_timeout);
        let envelope = match timeout(max_delay, reply_rx).await {
            Ok(Ok(envelope)) => envelope,
            Ok(Err(_)) => {
                self.pending.lock().await.remove(&request_id);
                return Err(WalletBridgeError::ChannelClosed);
            }
            Err(_) => {
                self.pending.lock().await.remove(&request_id);
                debug!(request_id = request_id.as_str(), operation, "request timed out");
                return Err(WalletBridgeError::Timeout(max_delay.as_millis() as u64));
            }
        };

        let validation = envelope.validation.as_ref().map(validation::translate);
        if envelope.success {
            Ok(ResolvedResponse {
                data: envelope.data,
                validation,
            })
        } else {
            // Callers get the backend's error payload, not the envelope.
            Err(WalletBridgeError::Backend(
                envelope.error.unwrap_or(Value::Null),
            ))
        }
    }

    /// Number of requests still waiting for a response.
    pub async fn pending_len(&self) -> usize {
        self.pending.lock().await.len()
    }
}
