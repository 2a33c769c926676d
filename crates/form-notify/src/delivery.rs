//! Delivery of rendered webhooks to the event-ingest service.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::NotifyConfig;
use crate::error::DeliveryError;
use crate::renderers::Webhook;

/// Retry delay assumed when a 429 response carries no `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

/// Everything a sender needs to deliver one webhook.
#[derive(Debug, Clone, Copy)]
pub struct DeliveryRequest<'a> {
    pub webhook: &'a Webhook,
    pub project: &'a str,
    pub endpoint_id: &'a str,
    pub event_kind: &'a str,
}

/// Trait for webhook delivery backends.
#[async_trait]
pub trait WebhookSender: Send + Sync {
    /// Get the name of this sender.
    fn name(&self) -> &'static str;

    /// Deliver a rendered webhook.
    async fn send(&self, request: DeliveryRequest<'_>) -> Result<(), DeliveryError>;
}

/// Body posted to the event-ingest service.
#[derive(Debug, Serialize)]
struct Envelope<'a> {
    data: &'a serde_json::Value,
    event_type: &'a str,
    endpoint_id: &'a str,
}

/// Delivers webhooks over HTTP with bearer authentication.
pub struct HttpWebhookSender {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpWebhookSender {
    /// Create a sender from configuration.
    ///
    /// # Errors
    /// Returns [`DeliveryError::NotConfigured`] when the URL or API key is
    /// missing, and [`DeliveryError::Http`] when the client cannot be built.
    pub fn from_config(config: &NotifyConfig) -> Result<Self, DeliveryError> {
        let base_url = config
            .base_url
            .clone()
            .ok_or_else(|| DeliveryError::NotConfigured(crate::config::ENV_NOTIFY_URL.to_string()))?;
        let api_key = config.api_key.clone().ok_or_else(|| {
            DeliveryError::NotConfigured(crate::config::ENV_NOTIFY_API_KEY.to_string())
        })?;

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    /// Endpoint receiving events for a project.
    #[must_use]
    pub fn events_url(&self, project: &str) -> String {
        format!("{}/api/v1/projects/{project}/events", self.base_url)
    }

    /// Provider headers first, then authentication and content type, so a
    /// provider cannot replace either.
    fn headers(&self, webhook: &Webhook) -> Result<HeaderMap, DeliveryError> {
        let mut headers = HeaderMap::new();

        for (name, values) in &webhook.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| DeliveryError::InvalidHeader(format!("{name}: {e}")))?;
            for value in values {
                let value = HeaderValue::from_str(value)
                    .map_err(|e| DeliveryError::InvalidHeader(format!("{name}: {e}")))?;
                headers.append(name.clone(), value);
            }
        }

        let auth = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| DeliveryError::InvalidHeader(format!("{AUTHORIZATION}: {e}")))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(headers)
    }
}

#[async_trait]
impl WebhookSender for HttpWebhookSender {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn send(&self, request: DeliveryRequest<'_>) -> Result<(), DeliveryError> {
        let body = serde_json::to_vec(&Envelope {
            data: &request.webhook.data,
            event_type: request.event_kind,
            endpoint_id: request.endpoint_id,
        })?;
        let url = self.events_url(request.project);

        debug!(
            url = %url,
            endpoint_id = request.endpoint_id,
            event_type = request.event_kind,
            "Sending webhook"
        );

        let response = self
            .client
            .post(&url)
            .headers(self.headers(request.webhook)?)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(status = %status, "Webhook delivered");
            Ok(())
        } else if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);

            warn!(retry_after_secs = retry_after, "Rate limited by event service");

            Err(DeliveryError::RateLimited {
                retry_after_secs: retry_after,
            })
        } else if status.as_u16() >= 400 {
            let body = response.text().await.unwrap_or_default();

            warn!(
                status = %status,
                body = %body,
                "Webhook delivery failed"
            );

            Err(DeliveryError::Status {
                status: status.as_u16(),
                body,
            })
        } else {
            debug!(status = %status, "Webhook accepted with non-success status");
            Ok(())
        }
    }
}
