//! Library root for `opslog-bot`.
//!
//! Opslog-bot is a Discord task-logging assistant for staff teams designed to:
//! - Walk a staff member through a guided wizard (department → task → details)
//! - Carry all wizard progress inside the interaction token, with no session store
//! - Forward each completed log to a workflow-automation webhook
//!
//! The bot integrates with Discord for chat and an HTTP webhook for
//! delivery. The architecture is built around extensible traits that
//! allow for different implementations of each service.

#[deny(missing_docs)]
pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;
pub mod wizard;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the opslog-bot runtime:
/// - Initializes the crypto provider
/// - Validates the step table and creates the runtime context
/// - Starts the gateway event loop for processing interactions
pub async fn start(config: Config) -> Void {
    info!("Starting opslog-bot ...");

    // Start the crypto provider.
    crypto::ring::default_provider().install_default().unwrap();

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config)?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
