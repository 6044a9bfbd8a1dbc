//! Transport seam for outbound notifications.
//!
//! A `Transport` opens one `Connection` per notification. The connection owns
//! every resource of the exchange and releases them when dropped, so callers
//! only have to let it go out of scope.

use super::error::NotifyResult;
use async_trait::async_trait;
use std::fmt;
use url::Url;

/// A fully prepared request body and its headers
pub struct OutboundRequest {
    pub headers: Vec<(&'static str, String)>,
    pub content_type: &'static str,
    pub body: String,
}

impl fmt::Debug for OutboundRequest {
    // Header values carry credentials
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.headers.iter().map(|(name, _)| *name).collect();
        f.debug_struct("OutboundRequest")
            .field("headers", &names)
            .field("content_type", &self.content_type)
            .field("body_len", &self.body.len())
            .finish()
    }
}

/// One outbound exchange with the chat service
#[async_trait]
pub trait Connection: Send {
    /// Writes the request and waits for the response head.
    ///
    /// # Returns
    /// The HTTP status code
    async fn send(&mut self, request: OutboundRequest) -> NotifyResult<u16>;

    /// Reads the rest of the response body and discards it.
    ///
    /// # Returns
    /// Number of bytes drained
    async fn drain(&mut self) -> NotifyResult<u64>;
}

/// Factory for connections (HTTP client, test fakes)
#[async_trait]
pub trait Transport: Send + Sync {
    /// Opens a connection configured for a POST with a body to `endpoint`
    async fn open(&self, endpoint: &Url) -> NotifyResult<Box<dyn Connection>>;

    /// Returns the transport name for logging
    fn name(&self) -> &'static str;
}
