//! HTTP transport backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::config::settings::HttpSettings;
use crate::services::notifications::{
    Connection, NotifyError, NotifyResult, OutboundRequest, Stage, Transport,
};

/// Builds the HTTP client used for ChatWork calls
///
/// # Features
/// - **Timeouts**: bounded connect and whole-request timeouts from `[http]`
/// - **User-Agent**: `chatwork-notifier/<version>` unless overridden
/// - **Security**: Uses Rustls for TLS (no OpenSSL dependency)
pub fn build_http_client(settings: &HttpSettings) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_seconds))
        .connect_timeout(Duration::from_secs(settings.connect_timeout_seconds))
        .pool_max_idle_per_host(0)
        .user_agent(settings.user_agent.clone())
        .build()
}

/// `Transport` that performs real HTTP requests
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport from `[http]` settings
    pub fn new(settings: &HttpSettings) -> NotifyResult<Self> {
        let client =
            build_http_client(settings).map_err(|e| NotifyError::transport(Stage::Connect, e))?;
        Ok(Self { client })
    }

    /// Wraps an already configured client
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn open(&self, endpoint: &Url) -> NotifyResult<Box<dyn Connection>> {
        Ok(Box::new(ReqwestConnection {
            client: self.client.clone(),
            endpoint: endpoint.clone(),
            response: None,
        }))
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

/// One POST exchange; dropping it closes the response stream
struct ReqwestConnection {
    client: reqwest::Client,
    endpoint: Url,
    response: Option<reqwest::Response>,
}

#[async_trait]
impl Connection for ReqwestConnection {
    async fn send(&mut self, request: OutboundRequest) -> NotifyResult<u16> {
        let mut builder = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, request.content_type)
            .body(request.body);

        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| classify(e, Stage::Request))?;
        let status = response.status().as_u16();
        self.response = Some(response);

        Ok(status)
    }

    async fn drain(&mut self) -> NotifyResult<u64> {
        let Some(mut response) = self.response.take() else {
            return Ok(0);
        };

        let mut drained = 0u64;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| classify(e, Stage::Response))?
        {
            drained += chunk.len() as u64;
        }

        Ok(drained)
    }
}

/// Maps a reqwest failure onto the delivery stage it belongs to
fn classify(error: reqwest::Error, stage: Stage) -> NotifyError {
    if error.is_timeout() {
        NotifyError::Timeout { stage }
    } else if error.is_connect() {
        NotifyError::transport(Stage::Connect, error)
    } else {
        NotifyError::transport(stage, error)
    }
}
