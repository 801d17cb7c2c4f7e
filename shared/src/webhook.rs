use crate::error::ClientError;
use crate::model::{Label, PredictionResult};
use crate::notice::Notice;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// JSON body posted to the user's webhook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookPayload {
    pub timestamp: String,
    pub filename: String,
    pub prediction: Label,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<f64>,
}

impl WebhookPayload {
    pub fn new(result: &PredictionResult, filename: &str, at: DateTime<Utc>) -> Self {
        Self {
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            filename: filename.to_string(),
            prediction: result.label(),
            confidence: result.confidence().value(),
            processing_time_ms: result.processing_time_ms(),
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait WebhookTransport {
    /// A single POST with `Content-Type: application/json`. Non-success
    /// statuses must come back as `ClientError::Status`.
    async fn post_json(&self, url: &str, payload: &WebhookPayload) -> Result<(), ClientError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForwardOutcome {
    Skipped,
    Delivered,
    Failed(ClientError),
}

impl ForwardOutcome {
    pub fn notice(&self) -> Notice {
        match self {
            ForwardOutcome::Skipped => {
                Notice::warning("Webhook URL not configured. Open 'Webhook Config' to set it up.")
            }
            ForwardOutcome::Delivered => Notice::success("Results sent to webhook"),
            ForwardOutcome::Failed(e) => Notice::error(format!("Failed to send results to webhook: {e}")),
        }
    }
}

pub struct WebhookForwarder<T> {
    transport: T,
}

impl<T: WebhookTransport> WebhookForwarder<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Best effort: one attempt, no retry. The caller decides what to do with
    /// the outcome; it is never fed back into the analysis state.
    pub async fn forward(&self, result: &PredictionResult, filename: &str, url: &str) -> ForwardOutcome {
        let url = url.trim();
        if url.is_empty() {
            log::warn!("Webhook URL not configured. Skipping forward of {}", filename);
            return ForwardOutcome::Skipped;
        }

        let payload = WebhookPayload::new(result, filename, Utc::now());
        match self.transport.post_json(url, &payload).await {
            Ok(()) => {
                log::info!("Results for {} sent to webhook", filename);
                ForwardOutcome::Delivered
            }
            Err(e) => {
                log::error!("Error sending data to webhook: {}", e);
                ForwardOutcome::Failed(e)
            }
        }
    }
}

/// A forward scheduled by the workflow after a successful analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardJob {
    pub url: String,
    pub filename: String,
    pub result: PredictionResult,
}

impl ForwardJob {
    pub async fn run<T: WebhookTransport>(&self, forwarder: &WebhookForwarder<T>) -> ForwardOutcome {
        forwarder.forward(&self.result, &self.filename, &self.url).await
    }
}
