use crate::error::{BotError, Result};
use clap::Parser;
use std::fmt;
use std::time::Duration;

/// Process settings, read from flags or the environment.
#[derive(Parser, Clone)]
#[command(author, version, about = "Telegram front-end for the backend bot API", long_about = None)]
pub struct Settings {
    /// Telegram bot token
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    pub bot_token: String,

    /// Backend endpoint receiving every gateway action
    #[arg(long, env = "API_URL")]
    pub api_url: String,

    /// Shared secret sent in the x-bot-secret header
    #[arg(long, env = "BOT_SECRET", hide_env_values = true)]
    pub bot_secret: String,

    /// Seconds before a gateway call is reported as failed
    #[arg(long, env = "GATEWAY_TIMEOUT_SECS", default_value_t = 30)]
    pub gateway_timeout_secs: u64,

    /// Brand name shown in onboarding and welcome texts
    #[arg(long, env = "BOT_BRAND", default_value = "Blood Family")]
    pub brand: String,

    /// Site where users obtain their connection code
    #[arg(long, env = "BOT_SITE_URL", default_value = "bloodfamily.vercel.app")]
    pub site_url: String,
}

impl Settings {
    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway_timeout_secs)
    }

    /// Rejects settings that are present but unusable, such as empty values.
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            return Err(BotError::Config("BOT_TOKEN is empty".to_string()));
        }
        if self.bot_secret.trim().is_empty() {
            return Err(BotError::Config("BOT_SECRET is empty".to_string()));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(BotError::Config(format!(
                "API_URL must be an http(s) URL, got {:?}",
                self.api_url
            )));
        }
        if self.gateway_timeout_secs == 0 {
            return Err(BotError::Config(
                "GATEWAY_TIMEOUT_SECS must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("bot_token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("bot_secret", &"<redacted>")
            .field("gateway_timeout_secs", &self.gateway_timeout_secs)
            .field("brand", &self.brand)
            .field("site_url", &self.site_url)
            .finish()
    }
}
