//! ChatWork notification provider implementation.
//!
//! Posts a message to a room through the ChatWork REST API:
//! `POST {api_base_url}/rooms/{room_id}/messages` with the API token in the
//! `X-ChatWorkToken` header and a form-encoded `body` field.
//!
//! Delivery is best-effort. A chat service outage must never fail the build
//! that triggered it, so `notify` logs every failure and returns normally.

use super::error::{NotifyError, NotifyResult};
use super::transport::{OutboundRequest, Transport};
use crate::models::NotificationConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;
use url::form_urlencoded;

/// Header carrying the API token
pub const TOKEN_HEADER: &str = "X-ChatWorkToken";

/// Default ChatWork API root
pub const DEFAULT_API_BASE_URL: &str = "https://api.chatwork.com/v1";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Outcome of a delivered notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// HTTP status returned by ChatWork
    pub status: u16,
    /// Response bytes read and discarded
    pub bytes_drained: u64,
    /// Time taken for the exchange in milliseconds
    pub elapsed_ms: u64,
}

/// ChatWork message sender
///
/// # Example
/// ```ignore
/// let transport = Arc::new(ReqwestTransport::new(&settings.http)?);
/// let notifier = ChatWorkNotifier::new(transport, &settings.notifier.api_base_url)?;
/// notifier.notify(&config, "Build demo #42: SUCCESS").await;
/// ```
#[derive(Clone)]
pub struct ChatWorkNotifier {
    transport: Arc<dyn Transport>,
    api_base_url: Url,
}

impl ChatWorkNotifier {
    /// Creates a notifier posting through `transport`
    ///
    /// # Arguments
    /// * `transport` - Connection factory
    /// * `api_base_url` - API root, e.g. `https://api.chatwork.com/v1`
    pub fn new(transport: Arc<dyn Transport>, api_base_url: &str) -> NotifyResult<Self> {
        let api_base_url = Url::parse(api_base_url).map_err(|e| NotifyError::Endpoint {
            room_id: String::new(),
            reason: format!("invalid API base URL '{}': {}", api_base_url, e),
        })?;

        if api_base_url.cannot_be_a_base() {
            return Err(NotifyError::Endpoint {
                room_id: String::new(),
                reason: format!("API base URL '{}' cannot carry a path", api_base_url),
            });
        }

        Ok(Self {
            transport,
            api_base_url,
        })
    }

    /// Builds the message-creation endpoint for a room
    ///
    /// The room id becomes one percent-encoded path segment.
    pub fn endpoint(&self, room_id: &str) -> NotifyResult<Url> {
        let mut url = self.api_base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| NotifyError::Endpoint {
                room_id: room_id.to_string(),
                reason: "API base URL cannot carry a path".to_string(),
            })?;
            segments.pop_if_empty().extend(["rooms", room_id, "messages"]);
        }
        Ok(url)
    }

    /// Encodes the message as the single form field `body`
    pub fn encode_body(message: &str) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("body", message)
            .finish()
    }

    /// Sends `message` to the configured room, logging instead of failing.
    ///
    /// Every error is logged once at `error` level and discarded; the caller
    /// cannot observe whether delivery succeeded.
    pub async fn notify(&self, config: &NotificationConfig, message: &str) {
        match self.try_notify(config, message).await {
            Ok(receipt) => {
                tracing::info!(
                    room_id = %config.room_id,
                    status = receipt.status,
                    bytes_drained = receipt.bytes_drained,
                    elapsed_ms = receipt.elapsed_ms,
                    "ChatWork notification sent"
                );
            }
            Err(e) => {
                tracing::error!(
                    room_id = %config.room_id,
                    transport = self.transport.name(),
                    error = %e.report(),
                    "Failed to send ChatWork notification"
                );
            }
        }
    }

    /// Performs the delivery and reports its outcome.
    ///
    /// The connection is scoped to this call and is dropped on every path,
    /// including early returns.
    pub async fn try_notify(
        &self,
        config: &NotificationConfig,
        message: &str,
    ) -> NotifyResult<DeliveryReceipt> {
        if config.room_id.trim().is_empty() {
            return Err(NotifyError::MissingSetting { field: "room_id" });
        }
        if config.api_token.is_empty() {
            return Err(NotifyError::MissingSetting { field: "api_token" });
        }

        let endpoint = self.endpoint(&config.room_id)?;
        let request = OutboundRequest {
            headers: vec![(TOKEN_HEADER, config.api_token.expose().to_string())],
            content_type: FORM_CONTENT_TYPE,
            body: Self::encode_body(message),
        };

        tracing::debug!(
            endpoint = %endpoint,
            body_len = request.body.len(),
            "Posting ChatWork message"
        );

        let start = Instant::now();
        let mut connection = self.transport.open(&endpoint).await?;
        let status = connection.send(request).await?;
        let bytes_drained = connection.drain().await?;
        drop(connection);

        let elapsed_ms = elapsed_millis(start.elapsed());

        if !(200..300).contains(&status) {
            return Err(NotifyError::Rejected { status });
        }

        Ok(DeliveryReceipt {
            status,
            bytes_drained,
            elapsed_ms,
        })
    }
}

fn elapsed_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
