//! Runtime services and shared state for the betty-bot.

use tracing::instrument;

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    service::{chat::ChatClient, llm::LlmClient},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the LLM client, chat client, and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The LLM client instance.
    pub llm: LlmClient,
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the LLM client.
        let llm = LlmClient::openai(&config);

        // Initialize the telegram client.
        let chat = ChatClient::telegram(&config, llm.clone()).await?;

        Ok(Self { config, llm, chat })
    }

    pub async fn start(&self) -> Void {
        self.chat.start().await
    }
}
