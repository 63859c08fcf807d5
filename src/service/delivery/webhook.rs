//! HTTP webhook implementation of the delivery client.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::{base::config::Config, base::types::Res, wizard::submit::SubmissionRecord};

use super::{DeliveryClient, DeliveryError, GenericDeliveryClient};

/// Transport-boundary timeout; a slow endpoint surfaces as a delivery
/// failure rather than hanging the interaction.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// Extra methods on `DeliveryClient` applied by the webhook implementation.

impl DeliveryClient {
    /// Creates the webhook delivery client from configuration.
    pub fn webhook(config: &Config) -> Res<Self> {
        let client = WebhookDeliveryClient::new(&config.webhook_url)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Structs.

/// Posts each record as a JSON body to the configured endpoint.
struct WebhookDeliveryClient {
    url: String,
    http: reqwest::Client,
}

impl WebhookDeliveryClient {
    fn new(url: &str) -> Res<Self> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { url: url.to_string(), http })
    }
}

#[async_trait]
impl GenericDeliveryClient for WebhookDeliveryClient {
    #[instrument(skip_all)]
    async fn deliver(&self, record: &SubmissionRecord) -> Result<(), DeliveryError> {
        let response = self
            .http
            .post(&self.url)
            .json(record)
            .send()
            .await
            .map_err(|e| DeliveryError { status: None, detail: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DeliveryError { status: Some(status.as_u16()), detail });
        }

        info!("Delivered submission to webhook.");

        Ok(())
    }
}
