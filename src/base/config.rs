//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;

use crate::base::{prompts, types::Persona};

use super::types::{Res, Void};

/// Default OpenAI chat model to use.
fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

/// Default max output tokens for a completion.
fn default_openai_max_tokens() -> u32 {
    200
}

/// Default OpenAI speech model to use.
fn default_openai_speech_model() -> String {
    "tts-1".to_string()
}

/// Default OpenAI speech voice to use.
fn default_openai_speech_voice() -> String {
    "nova".to_string()
}

/// Default trigger name.
fn default_persona_name() -> String {
    prompts::PERSONA_NAME.to_string()
}

/// Default persona directive.
fn default_persona_directive() -> String {
    prompts::PERSONA_DIRECTIVE.to_string()
}

fn default_admin_delete_enabled() -> bool {
    true
}

/// Configuration for the betty-bot application.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// Telegram bot token (`TELEGRAM_BOT_TOKEN`).
    #[serde(default)]
    pub telegram_bot_token: String,
    /// OpenAI API key (`OPENAI_API_KEY`).
    #[serde(default)]
    pub openai_api_key: String,
    /// OpenAI chat model to use (`OPENAI_MODEL`).
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    /// Max output tokens for each completion (`OPENAI_MAX_TOKENS`).
    #[serde(default = "default_openai_max_tokens")]
    pub openai_max_tokens: u32,
    /// OpenAI speech model (`OPENAI_SPEECH_MODEL`).
    #[serde(default = "default_openai_speech_model")]
    pub openai_speech_model: String,
    /// OpenAI speech voice (`OPENAI_SPEECH_VOICE`).
    #[serde(default = "default_openai_speech_voice")]
    pub openai_speech_voice: String,
    /// Trigger name the bot answers to (`PERSONA_NAME`).
    #[serde(default = "default_persona_name")]
    pub persona_name: String,
    /// System preamble sent with every completion (`PERSONA_DIRECTIVE`).
    #[serde(default = "default_persona_directive")]
    pub persona_directive: String,
    /// Also answer triggered messages with a voice note (`VOICE_REPLY_ENABLED`).
    #[serde(default)]
    pub voice_reply_enabled: bool,
    /// Enable the admin-only `/delete` command (`ADMIN_DELETE_ENABLED`).
    #[serde(default = "default_admin_delete_enabled")]
    pub admin_delete_enabled: bool,
}

impl ConfigInner {
    /// Check required secrets and value ranges.
    pub fn validate(&self) -> Void {
        if self.telegram_bot_token.trim().is_empty() {
            return Err(anyhow::anyhow!("Missing Telegram bot token: set `TELEGRAM_BOT_TOKEN`."));
        }

        if self.openai_api_key.trim().is_empty() {
            return Err(anyhow::anyhow!("Missing OpenAI API key: set `OPENAI_API_KEY`."));
        }

        if self.openai_max_tokens < 1 || self.openai_max_tokens > 128000 {
            return Err(anyhow::anyhow!("OpenAI max tokens must be between 1 and 128000."));
        }

        if self.persona_name.trim().is_empty() {
            return Err(anyhow::anyhow!("Persona name must not be empty."));
        }

        Ok(())
    }
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder();

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        // Environment wins over the file.
        cfg = cfg.add_source(config::Environment::default());

        Self::new(cfg.build()?.try_deserialize()?)
    }

    /// Wrap an already-built configuration, validating it first.
    pub fn new(inner: ConfigInner) -> Res<Self> {
        inner.validate()?;

        Ok(Config { inner: Arc::new(inner) })
    }

    /// The persona defined by this configuration.
    pub fn persona(&self) -> Persona {
        Persona::new(&self.persona_name, &self.persona_directive)
    }
}
