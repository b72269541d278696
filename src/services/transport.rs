use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domains::envelope::{RequestEnvelope, ResponseEnvelope};
use crate::error::{Result, WalletBridgeError};
use crate::interfaces::transport::{BoxedStream, Transport};

const CHANNEL_CAPACITY: usize = 64;

/// Newline-delimited JSON frames over any byte stream. The write half lives
/// behind an mpsc queue so `send` never holds the stream across an await;
/// the read half runs in its own task and feeds decoded response envelopes
/// to the returned receiver.
pub struct StreamTransport {
    outbound_tx: mpsc::Sender<Vec<u8>>,
}

impl StreamTransport {
    pub fn start(stream: BoxedStream) -> (Self, mpsc::Receiver<ResponseEnvelope>) {
        let (read_half, mut write_half) = tokio::io::split(stream);
        let (outbound_tx, mut outbound_rx) = mpsc::channel::<Vec<u8>>(CHANNEL_CAPACITY);
        let (inbound_tx, inbound_rx) = mpsc::channel::<ResponseEnvelope>(CHANNEL_CAPACITY);

        tokio::spawn(async move {
            while let Some(frame) = outbound_rx.recv().await {
                if let Err(err) = write_half.write_all(&frame).await {
                    warn!(error = %err, "transport write failed");
                    break;
                }
            }
            debug!("transport writer stopped");
        });

        tokio::spawn(async move {
            let mut lines = BufReader::new(read_half).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<ResponseEnvelope>(&line) {
                            Ok(envelope) => {
                                if inbound_tx.send(envelope).await.is_err() {
                                    break;
                                }
                            }
                            Err(err) => {
                                warn!(error = %err, "dropping malformed frame");
                            }
                        }
                    }
                    Ok(None) => break,
                    Err(err) => {
                        warn!(error = %err, "transport read failed");
                        break;
                    }
                }
            }
            debug!("transport reader stopped");
        });

        (Self { outbound_tx }, inbound_rx)
    }
}

#[async_trait]
impl Transport for StreamTransport {
    async fn send(&self, request: &RequestEnvelope) -> Result<()> {
        let mut frame = serde_json::to_vec(request)
            .map_err(|e| WalletBridgeError::Serialization(e.to_string()))?;
        frame.push(b'\n');
        self.outbound_tx
            .send(frame)
            .await
            .map_err(|_| WalletBridgeError::ChannelClosed)
    }
}

pub async fn connect_tcp(host: &str, port: u16) -> Result<BoxedStream> {
    let addr = format!("{host}:{port}");
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|e| WalletBridgeError::Transport(e.to_string()))?;
    Ok(Box::new(stream))
}
