//! Slash-command handlers.

use tracing::{debug, instrument};

use crate::{
    base::{
        prompts,
        types::{Command, Member, Void},
    },
    runtime::Runtime,
};

use super::delete;

/// Handles a `/command` invocation.
///
/// Completion-backed commands always send their fixed instruction as the
/// prompt; nothing from the invoking message reaches the provider.
#[instrument(skip(sender, runtime))]
pub async fn handle_command(command: Command, chat_id: i64, message_id: i32, sender: &Member, reply_to: Option<i32>, runtime: &Runtime) -> Void {
    match command {
        Command::Start => runtime.chat.send_message(chat_id, Some(message_id), prompts::START_GREETING).await,
        Command::Delete => {
            if !runtime.config.admin_delete_enabled {
                debug!("Admin delete is disabled, ignoring.");
                return Ok(());
            }

            delete::handle_delete(chat_id, message_id, sender, reply_to, runtime).await
        }
        Command::Joke => reply_with_completion(prompts::JOKE_INSTRUCTION, chat_id, message_id, runtime).await,
        Command::Advice => reply_with_completion(prompts::ADVICE_INSTRUCTION, chat_id, message_id, runtime).await,
        Command::Mood => reply_with_completion(prompts::MOOD_INSTRUCTION, chat_id, message_id, runtime).await,
    }
}

/// Completes a fixed instruction and replies with the result.
async fn reply_with_completion(instruction: &str, chat_id: i64, message_id: i32, runtime: &Runtime) -> Void {
    let reply = runtime.llm.complete_text(instruction).await?;
    runtime.chat.send_message(chat_id, Some(message_id), &reply).await
}
