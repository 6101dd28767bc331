pub mod telegram;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{MemberRole, Res, Void};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines the core functionality for interacting with chat platforms
/// like Telegram. Implementing this trait allows different chat services to be used
/// with the betty-bot.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Start the chat client listener.
    ///
    /// This sets up event listeners for the chat platform and begins processing
    /// incoming messages and events until shutdown.
    async fn start(&self) -> Void;

    /// Send a text message to a chat, optionally as a reply to another message.
    async fn send_message(&self, chat_id: i64, reply_to: Option<i32>, text: &str) -> Void;

    /// Send a voice note to a chat, optionally as a reply to another message.
    async fn send_voice(&self, chat_id: i64, reply_to: Option<i32>, audio: Vec<u8>) -> Void;

    /// Look up a user's membership role in a chat.
    async fn get_member_role(&self, chat_id: i64, user_id: u64) -> Res<MemberRole>;

    /// Delete a message from a chat.
    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
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
