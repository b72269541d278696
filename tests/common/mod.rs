#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, Mutex};

use wallet_bridge::domains::envelope::{RequestEnvelope, ResponseEnvelope};
use wallet_bridge::error::Result;
use wallet_bridge::interfaces::transport::{BoxedStream, Transport};

/// One scripted backend response for a given operation.
#[derive(Debug, Clone)]
pub struct StubReply {
    pub success: bool,
    pub error: Option<Value>,
    pub validation: Option<HashMap<String, u32>>,
    pub data: Option<Value>,
    pub respond: bool,
    pub delay: Option<Duration>,
}

impl StubReply {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            error: None,
            validation: None,
            data: Some(data),
            respond: true,
            delay: None,
        }
    }

    pub fn ok_with_validation(validation: HashMap<String, u32>) -> Self {
        Self {
            success: true,
            error: None,
            validation: Some(validation),
            data: None,
            respond: true,
            delay: None,
        }
    }

    pub fn err(error: Value) -> Self {
        Self {
            success: false,
            error: Some(error),
            validation: None,
            data: None,
            respond: true,
            delay: None,
        }
    }

    pub fn silent() -> Self {
        Self {
            success: true,
            error: None,
            validation: None,
            data: None,
            respond: false,
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

pub struct StubBackendHandle {
    pub received: Arc<Mutex<Vec<RequestEnvelope>>>,
}

/// Spawn a backend stand-in speaking the newline-delimited JSON protocol over
/// an in-process duplex stream. Replies are consumed per operation in script
/// order; a delayed reply is written from its own task so responses can
/// arrive out of order.
pub fn start_stub(replies: Vec<(&str, StubReply)>) -> (BoxedStream, StubBackendHandle) {
    let mut scripted: HashMap<String, VecDeque<StubReply>> = HashMap::new();
    for (operation, reply) in replies {
        scripted.entry(operation.to_string()).or_default().push_back(reply);
    }

    let (client_io, server_io) = tokio::io::duplex(4096);
    let (read_half, mut write_half) = tokio::io::split(server_io);
    let (line_tx, mut line_rx) = mpsc::channel::<String>(32);
    let received = Arc::new(Mutex::new(Vec::new()));
    let received_for_task = received.clone();

    tokio::spawn(async move {
        while let Some(line) = line_rx.recv().await {
            if write_half.write_all(line.as_bytes()).await.is_err() {
                break;
            }
        }
    });

    tokio::spawn(async move {
        let mut scripted = scripted;
        let mut lines = BufReader::new(read_half).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let request: RequestEnvelope = match serde_json::from_str(&line) {
                Ok(request) => request,
                Err(_) => continue,
            };
            received_for_task.lock().await.push(request.clone());

            let reply = scripted
                .get_mut(&request.operation)
                .and_then(|queue| queue.pop_front());
            let Some(reply) = reply else { continue };
            if !reply.respond {
                continue;
            }

            let envelope = ResponseEnvelope {
                request_id: request.request_id.clone(),
                success: reply.success,
                error: reply.error,
                validation: reply.validation,
                data: reply.data,
            };
            let mut frame = serde_json::to_string(&envelope).unwrap();
            frame.push('\n');
            match reply.delay {
                Some(delay) => {
                    let line_tx = line_tx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = line_tx.send(frame).await;
                    });
                }
                None => {
                    let _ = line_tx.send(frame).await;
                }
            }
        }
    });

    (Box::new(client_io), StubBackendHandle { received })
}

/// Transport that records every envelope instead of sending it; the test
/// injects responses directly into the correlator's inbound channel.
pub struct CaptureTransport {
    pub sent: Arc<Mutex<Vec<RequestEnvelope>>>,
}

impl CaptureTransport {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn sent_len(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub async fn wait_for_sent(&self, count: usize) -> Vec<RequestEnvelope> {
        loop {
            {
                let sent = self.sent.lock().await;
                if sent.len() >= count {
                    return sent.clone();
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

#[async_trait]
impl Transport for CaptureTransport {
    async fn send(&self, request: &RequestEnvelope) -> Result<()> {
        self.sent.lock().await.push(request.clone());
        Ok(())
    }
}

/// Transport whose send always fails.
pub struct FailingTransport;

#[async_trait]
impl Transport for FailingTransport {
    async fn send(&self, _request: &RequestEnvelope) -> Result<()> {
        Err(wallet_bridge::WalletBridgeError::Transport(
            "connection refused".to_string(),
        ))
    }
}

pub fn response_ok(request_id: &str, data: Value) -> ResponseEnvelope {
    ResponseEnvelope {
        request_id: request_id.to_string(),
        success: true,
        error: None,
        validation: None,
        data: Some(data),
    }
}
