//! HTTP transport abstraction used by the client.

use async_trait::async_trait;

/// Status and raw body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A request that never produced a response (DNS, connect, timeout, ...).
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues a single GET. Implementations must not retry.
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}
