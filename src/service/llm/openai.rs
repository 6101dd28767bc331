//! OpenAI implementation of the completion gateway.
//!
//! Text goes through the chat-completions endpoint with a two-message exchange
//! (persona preamble, then the user prompt). Speech goes through the audio
//! speech endpoint and comes back as OGG/Opus, which Telegram accepts as a
//! voice note.

use std::sync::Arc;

use crate::base::{
    config::Config,
    types::{Persona, Res},
};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage, ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage, ChatCompletionRequestUserMessageContent,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs, CreateSpeechRequest, CreateSpeechRequestArgs, SpeechModel, SpeechResponseFormat, Voice,
    },
};
use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{GenericLlmClient, LlmClient};

// Extra methods on `LlmClient` applied by the openai implementation.

impl LlmClient {
    pub fn openai(config: &Config) -> Self {
        let client = OpenAiLlmClient::new(config);
        Self { inner: Arc::new(client) }
    }
}

// Specific implementations.

/// OpenAI LLM client implementation.
#[derive(Clone)]
pub struct OpenAiLlmClient {
    client: Client<OpenAIConfig>,
    persona: Persona,
    config: Config,
}

impl OpenAiLlmClient {
    /// Create a new OpenAI LLM client.
    #[instrument(name = "OpenAiLlmClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        let cfg = OpenAIConfig::new().with_api_key(config.openai_api_key.clone());

        Self {
            client: Client::with_config(cfg),
            persona: config.persona(),
            config: config.clone(),
        }
    }

    /// Build the chat completion request for a single prompt.
    fn build_chat_request(&self, prompt: &str) -> Res<CreateChatCompletionRequest> {
        if prompt.trim().is_empty() {
            return Err(anyhow::anyhow!("Refusing to request a completion for an empty prompt."));
        }

        let messages = vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(self.persona.directive().to_string()),
                name: None,
            }),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(prompt.to_string()),
                name: None,
            }),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.openai_model)
            .messages(messages)
            .max_completion_tokens(self.config.openai_max_tokens)
            .build()?;

        Ok(request)
    }

    /// Build the speech request for a piece of text.
    fn build_speech_request(&self, text: &str) -> Res<CreateSpeechRequest> {
        if text.trim().is_empty() {
            return Err(anyhow::anyhow!("Refusing to synthesize speech for empty text."));
        }

        let request = CreateSpeechRequestArgs::default()
            .model(parse_openai_speech_model(&self.config.openai_speech_model)?)
            .voice(parse_openai_voice(&self.config.openai_speech_voice)?)
            .response_format(SpeechResponseFormat::Opus)
            .input(text)
            .build()?;

        Ok(request)
    }
}

#[async_trait]
impl GenericLlmClient for OpenAiLlmClient {
    #[instrument(name = "OpenAiLlmClient::complete_text", skip_all)]
    async fn complete_text(&self, prompt: &str) -> Res<String> {
        let request = self.build_chat_request(prompt)?;

        let response = self.client.chat().create(request).await?;

        let choice = response.choices.into_iter().next().ok_or_else(|| anyhow::anyhow!("OpenAI returned no choices."))?;
        let content = choice.message.content.ok_or_else(|| anyhow::anyhow!("OpenAI returned a choice without content."))?;

        debug!("Completion returned {} characters.", content.len());

        Ok(content)
    }

    #[instrument(name = "OpenAiLlmClient::synthesize_speech", skip_all)]
    async fn synthesize_speech(&self, text: &str) -> Res<Vec<u8>> {
        let request = self.build_speech_request(text)?;

        let response = self.client.audio().speech(request).await?;

        if response.bytes.is_empty() {
            return Err(anyhow::anyhow!("OpenAI returned an empty audio stream."));
        }

        debug!("Speech returned {} bytes.", response.bytes.len());

        Ok(response.bytes.to_vec())
    }
}

// Helpers.

fn parse_openai_speech_model(model: &str) -> Res<SpeechModel> {
    match model.to_lowercase().as_str() {
        "tts-1" => Ok(SpeechModel::Tts1),
        "tts-1-hd" => Ok(SpeechModel::Tts1Hd),
        _ => Err(crate::base::types::Err::msg(format!("Invalid speech model: {model}. Must be one of: tts-1, tts-1-hd"))),
    }
}

fn parse_openai_voice(voice: &str) -> Res<Voice> {
    match voice.to_lowercase().as_str() {
        "alloy" => Ok(Voice::Alloy),
        "echo" => Ok(Voice::Echo),
        "fable" => Ok(Voice::Fable),
        "onyx" => Ok(Voice::Onyx),
        "nova" => Ok(Voice::Nova),
        "shimmer" => Ok(Voice::Shimmer),
        _ => Err(crate::base::types::Err::msg(format!("Invalid speech voice: {voice}. Must be one of: alloy, echo, fable, onyx, nova, shimmer"))),
    }
}

// Tests.
