//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;
use serde_with::{StringWithSeparator, formats::CommaSeparator, serde_as};

use crate::{base::defaults, wizard::step::StepDefinition};

use super::types::Res;

/// Default step table: the stock department/task/details wizard.
fn default_steps() -> Vec<StepDefinition> {
    defaults::default_steps()
}

/// Configuration for the opslog-bot application.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Shared inner configuration values.
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// The configuration values backing [`Config`].
#[serde_as]
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// Discord bot token (`DISCORD_BOT_TOKEN`).
    pub discord_bot_token: String,
    /// Workflow-automation webhook receiving submissions (`WEBHOOK_URL`).
    pub webhook_url: String,
    /// Channel the wizard panel is posted in (`PANEL_CHANNEL_ID`).
    pub panel_channel_id: String,
    /// Comma-separated role ids allowed to use the wizard
    /// (`ALLOWED_ROLE_IDS`).
    #[serde_as(as = "StringWithSeparator::<CommaSeparator, String>")]
    pub allowed_role_ids: Vec<String>,
    /// The wizard step table; defaults to the built-in flow. Only
    /// overridable via the config file, not the environment.
    #[serde(default = "default_steps")]
    pub steps: Vec<StepDefinition>,
}

impl Config {
    /// Load configuration from the environment and an optional config file.
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("OPSLOG_BOT"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        if result.discord_bot_token.is_empty() {
            return Err(anyhow::anyhow!("Discord bot token must not be empty."));
        }

        if result.webhook_url.is_empty() {
            return Err(anyhow::anyhow!("Webhook URL must not be empty."));
        }

        if result.panel_channel_id.is_empty() {
            return Err(anyhow::anyhow!("Panel channel id must not be empty."));
        }

        if result.allowed_role_ids.is_empty() {
            return Err(anyhow::anyhow!("At least one allowed role id must be configured."));
        }

        Ok(result)
    }
}
