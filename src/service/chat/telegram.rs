//! Telegram service integration for betty-bot.
//!
//! This module provides functionality for interacting with Telegram:
//! - Receiving messages and membership changes via long polling
//! - Sending text replies and voice notes
//! - Looking up member roles and deleting messages
//!
//! Raw updates are validated here and turned into [`InboundEvent`]s; anything
//! the handlers cannot act on is dropped at this boundary.

use crate::{
    base::{
        config::Config,
        types::{Command, InboundEvent, Member, MemberRole, Res, Void},
    },
    interaction,
    runtime::Runtime,
    service::llm::LlmClient,
};
use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{BotCommand, ChatMemberKind, InputFile, MessageEntityKind, MessageId, ReplyParameters, User},
};
use tracing::{debug, info, instrument};

use std::sync::Arc;

use super::{ChatClient, GenericChatClient};

// Extra methods on `ChatClient` applied by the telegram implementation.

impl ChatClient {
    /// Creates a new Telegram chat client.
    pub async fn telegram(config: &Config, llm: LlmClient) -> Res<Self> {
        let client = TelegramChatClient::new(config, llm).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<TelegramChatClient> for ChatClient {
    fn from(client: TelegramChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Structs.

/// Dispatcher state shared by every update.
struct TelegramState {
    runtime: Runtime,
    bot_username: String,
}

/// Telegram client implementation.
#[derive(Clone)]
struct TelegramChatClient {
    bot: Bot,
    bot_username: String,
    config: Config,
    llm: LlmClient,
}

impl TelegramChatClient {
    /// Create a new Telegram chat client.
    #[instrument(name = "TelegramChatClient::new", skip_all)]
    pub async fn new(config: &Config, llm: LlmClient) -> Res<Self> {
        let bot = Bot::new(config.telegram_bot_token.clone());

        // Get the bot's username, needed to accept `/command@bot` invocations.

        let me = bot.get_me().await.map_err(|e| anyhow::anyhow!("Failed to reach Telegram: {}", e))?;
        let bot_username = me.user.username.clone().unwrap_or_default();

        info!("Telegram bot username: @{}", bot_username);

        Ok(Self {
            bot,
            bot_username,
            config: config.clone(),
            llm,
        })
    }

    /// The command menu shown by Telegram clients.
    fn bot_commands(&self) -> Vec<BotCommand> {
        Command::ALL
            .into_iter()
            .filter(|command| *command != Command::Delete || self.config.admin_delete_enabled)
            .map(|command| BotCommand::new(command.name(), command.description()))
            .collect()
    }
}

#[async_trait]
impl GenericChatClient for TelegramChatClient {
    async fn start(&self) -> Void {
        // Register the command menu.

        self.bot.set_my_commands(self.bot_commands()).await.map_err(|e| anyhow::anyhow!("Failed to register commands: {}", e))?;

        // Initialize the dispatcher state.

        let state = Arc::new(TelegramState {
            runtime: Runtime {
                config: self.config.clone(),
                llm: self.llm.clone(),
                chat: ChatClient::from(self.clone()),
            },
            bot_username: self.bot_username.clone(),
        });

        let handler = Update::filter_message().endpoint(handle_message);

        info!("Betty is alive! 💖");

        // Long-poll until Ctrl-C.
        Dispatcher::builder(self.bot.clone(), handler)
            .dependencies(dptree::deps![state])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }

    #[instrument(skip(self, text))]
    async fn send_message(&self, chat_id: i64, reply_to: Option<i32>, text: &str) -> Void {
        let mut request = self.bot.send_message(ChatId(chat_id), text);

        if let Some(message_id) = reply_to {
            request = request.reply_parameters(ReplyParameters::new(MessageId(message_id)));
        }

        request.await.map_err(|e| anyhow::anyhow!("Failed to send message: {}", e))?;

        Ok(())
    }

    #[instrument(skip(self, audio))]
    async fn send_voice(&self, chat_id: i64, reply_to: Option<i32>, audio: Vec<u8>) -> Void {
        let input_file = InputFile::memory(audio).file_name("voice.ogg");

        let mut request = self.bot.send_voice(ChatId(chat_id), input_file);

        if let Some(message_id) = reply_to {
            request = request.reply_parameters(ReplyParameters::new(MessageId(message_id)));
        }

        request.await.map_err(|e| anyhow::anyhow!("Failed to send voice: {}", e))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_member_role(&self, chat_id: i64, user_id: u64) -> Res<MemberRole> {
        let member = self
            .bot
            .get_chat_member(ChatId(chat_id), UserId(user_id))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to get chat member: {}", e))?;

        let role = match member.kind {
            ChatMemberKind::Owner(_) => MemberRole::Owner,
            ChatMemberKind::Administrator(_) => MemberRole::Administrator,
            ChatMemberKind::Member(_) => MemberRole::Member,
            ChatMemberKind::Restricted(_) => MemberRole::Restricted,
            ChatMemberKind::Left => MemberRole::Left,
            ChatMemberKind::Banned(_) => MemberRole::Banned,
        };

        Ok(role)
    }

    #[instrument(skip(self))]
    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Void {
        self.bot
            .delete_message(ChatId(chat_id), MessageId(message_id))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to delete message: {}", e))?;

        Ok(())
    }
}

// Dispatcher endpoints.

/// Handles every message update from Telegram.
///
/// Handler failures are logged by the interaction layer and never bubble up to
/// the dispatcher, so one bad update cannot stall the ones behind it.
async fn handle_message(msg: Message, state: Arc<TelegramState>) -> ResponseResult<()> {
    match inbound_event_from_message(&msg, &state.bot_username) {
        Some(event) => interaction::handle_event(event, &state.runtime).await,
        None => debug!("Ignoring message {} in chat {}.", msg.id.0, msg.chat.id.0),
    }

    Ok(())
}

// Boundary conversion.

fn member_from_user(user: &User) -> Member {
    Member {
        user_id: user.id.0,
        display_name: user.full_name(),
    }
}

/// Whether Telegram marked the message as starting with a `/command`.
fn starts_with_bot_command(msg: &Message) -> bool {
    msg.entities()
        .and_then(|entities| entities.first())
        .is_some_and(|entity| matches!(entity.kind, MessageEntityKind::BotCommand) && entity.offset == 0)
}

/// Turn a Telegram message into an [`InboundEvent`], or `None` if it is not one we handle.
fn inbound_event_from_message(msg: &Message, bot_username: &str) -> Option<InboundEvent> {
    let chat_id = msg.chat.id.0;

    if let Some(users) = msg.new_chat_members() {
        let members: Vec<Member> = users.iter().filter(|user| !user.is_bot).map(member_from_user).collect();

        if members.is_empty() {
            return None;
        }

        return Some(InboundEvent::MembershipChange { chat_id, members });
    }

    let text = msg.text()?;
    let sender = member_from_user(msg.from.as_ref()?);
    let message_id = msg.id.0;

    // Real commands (a leading bot_command entity) never fall through to the name trigger, even unknown ones.
    if starts_with_bot_command(msg) {
        let command = Command::parse_invocation(text, bot_username)?;
        let reply_to = msg.reply_to_message().map(|reply| reply.id.0);

        return Some(InboundEvent::Command {
            chat_id,
            message_id,
            sender,
            command,
            reply_to,
        });
    }

    Some(InboundEvent::PlainText {
        chat_id,
        message_id,
        sender,
        text: text.to_string(),
    })
}

// Tests.
