//! Runtime services and shared state for the opslog-bot.

use std::sync::Arc;

use tracing::instrument;

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    service::{auth::AuthClient, chat::ChatClient, delivery::DeliveryClient},
    wizard::step::StepTable,
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the validated step table, the authorization,
/// delivery, and chat clients, and the configuration. It is designed
/// to be trivially cloneable, allowing it to be passed around without
/// the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The validated, immutable wizard step table.
    pub table: Arc<StepTable>,
    /// The authorization client instance.
    pub auth: AuthClient,
    /// The delivery client instance.
    pub delivery: DeliveryClient,
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance.
    ///
    /// Step table validation happens here; an invalid table (including
    /// one whose tokens would overflow the ceiling) refuses to start.
    #[instrument(skip_all)]
    pub fn new(config: Config) -> Res<Self> {
        // Validate and freeze the step table.
        let table = Arc::new(StepTable::new(config.steps.clone())?);

        // Initialize the authorization client.
        let auth = AuthClient::role_allow_list(&config);

        // Initialize the delivery client.
        let delivery = DeliveryClient::webhook(&config)?;

        // Initialize the Discord client.
        let chat = ChatClient::discord(&config, table.clone(), auth.clone(), delivery.clone())?;

        Ok(Self { config, table, auth, delivery, chat })
    }

    pub async fn start(&self) -> Void {
        self.chat.start().await
    }
}
