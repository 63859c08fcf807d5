//! Chat platform integration.
//!
//! The wizard core only produces data ([`crate::interaction::WizardReply`]);
//! how a menu, form, or error looks on screen is entirely the chat
//! implementation's business. The default implementation drives a
//! Discord gateway connection.

pub mod discord;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::Void;

// Traits.

/// Generic "chat" trait that platform clients must implement.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Connect to the platform, post the wizard panel, and process
    /// interaction events until shutdown.
    async fn start(&self) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed
/// around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
