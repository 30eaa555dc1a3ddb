use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::FailureReason;
use crate::signing::Signer;
use crate::types::CanonicalEvent;

/// Destination for converted events.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn forward(&self, event: &CanonicalEvent) -> Result<(), FailureReason>;
}

/// Posts each event as JSON to a single webhook URL.
///
/// One attempt per event. The request is bounded by `timeout`.
#[derive(Debug, Clone)]
pub struct WebhookForwarder {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
    signer: Option<Signer>,
}

impl WebhookForwarder {
    /// Defaults:
    /// - timeout: 10 seconds
    /// - unsigned requests
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            timeout: Duration::from_secs(10),
            signer: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sign every request body with `signer`.
    pub fn with_signer(mut self, signer: Signer) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Reuse an existing client (connection pool, proxy settings).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl EventSink for WebhookForwarder {
    async fn forward(&self, event: &CanonicalEvent) -> Result<(), FailureReason> {
        let body = serde_json::to_vec(event).map_err(|_| FailureReason::Serialization)?;

        let mut request = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if let Some(signer) = &self.signer {
            let headers = signer.sign(&body);
            request = request
                .header(headers.signature.0, headers.signature.1)
                .header(headers.timestamp.0, headers.timestamp.1);
        }

        match request.body(body).send().await {
            Ok(resp) if resp.status().is_success() => Ok(()),
            Ok(resp) => Err(FailureReason::RemoteStatus(resp.status().as_u16())),
            Err(err) if err.is_timeout() => Err(FailureReason::Timeout),
            Err(_) => Err(FailureReason::Network),
        }
    }
}

/// Records events in memory instead of sending them.
#[derive(Debug, Default)]
pub struct InMemorySink {
    events: Mutex<Vec<CanonicalEvent>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far, in forwarding order.
    pub async fn events(&self) -> Vec<CanonicalEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl EventSink for InMemorySink {
    async fn forward(&self, event: &CanonicalEvent) -> Result<(), FailureReason> {
        self.events.lock().await.push(event.clone());
        Ok(())
    }
}
