use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::domains::envelope::RequestEnvelope;
use crate::error::Result;

pub trait AsyncReadWrite: AsyncRead + AsyncWrite {}

impl<T> AsyncReadWrite for T where T: AsyncRead + AsyncWrite {}

pub type BoxedStream = Box<dyn AsyncReadWrite + Unpin + Send>;

/// Fire-and-forget dispatch of one request envelope to the backend. Responses
/// come back on the inbound channel the concrete transport produces; pairing
/// them with requests is the correlator's job, not the transport's.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestEnvelope) -> Result<()>;
}
