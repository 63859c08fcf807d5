//! Delivery of assembled submissions to the workflow endpoint.
//!
//! A single synchronous attempt per submission: no retry and no
//! queueing. A failed record is lost; resilience, if wanted, belongs
//! behind this interface, not in the wizard engine.

pub mod webhook;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use thiserror::Error;

use crate::wizard::submit::SubmissionRecord;

// Traits.

/// Generic submission sink that delivery backends must implement.
#[async_trait]
pub trait GenericDeliveryClient: Send + Sync + 'static {
    /// Deliver one record. Success is any 2xx from the endpoint.
    async fn deliver(&self, record: &SubmissionRecord) -> Result<(), DeliveryError>;
}

// Structs.

/// A non-2xx response or transport failure from the delivery endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("delivery failed (status {status:?}): {detail}")]
pub struct DeliveryError {
    /// HTTP status, when the endpoint answered at all.
    pub status: Option<u16>,
    pub detail: String,
}

/// Delivery client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed
/// around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct DeliveryClient {
    inner: Arc<dyn GenericDeliveryClient>,
}

impl Deref for DeliveryClient {
    type Target = dyn GenericDeliveryClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl DeliveryClient {
    pub fn new(inner: Arc<dyn GenericDeliveryClient>) -> Self {
        Self { inner }
    }
}
