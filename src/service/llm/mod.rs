pub mod openai;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::Res;

// Traits.

/// Generic LLM client trait that clients must implement.
///
/// This is the completion gateway: every prompt is sent on its own, prefixed
/// by the persona preamble, with no history carried between calls.
#[async_trait]
pub trait GenericLlmClient: Send + Sync + 'static {
    /// Request a bounded-length text completion for `prompt`.
    ///
    /// Fails if the provider call fails or yields no usable choice.
    async fn complete_text(&self, prompt: &str) -> Res<String>;

    /// Render `text` as speech and return the raw audio bytes.
    async fn synthesize_speech(&self, text: &str) -> Res<Vec<u8>>;
}

// Structs.

/// LLM client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct LlmClient {
    inner: Arc<dyn GenericLlmClient>,
}

impl Deref for LlmClient {
    type Target = dyn GenericLlmClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl LlmClient {
    pub fn new(inner: Arc<dyn GenericLlmClient>) -> Self {
        Self { inner }
    }
}
