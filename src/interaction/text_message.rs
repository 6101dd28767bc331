//! Name-triggered conversation.

use tracing::{debug, info, instrument};

use crate::{base::types::Void, runtime::Runtime};

/// Replies to a plain text message if it mentions the persona's name.
///
/// The original (not lowercased) text is the prompt. With voice replies
/// enabled, the same reply is also sent as a voice note.
#[instrument(skip(text, runtime))]
pub async fn handle_text_message(chat_id: i64, message_id: i32, text: &str, runtime: &Runtime) -> Void {
    if !runtime.config.persona().is_mentioned_in(text) {
        debug!("No trigger in message.");
        return Ok(());
    }

    info!("Triggered, asking for a reply ...");

    let reply = runtime.llm.complete_text(text).await?;
    runtime.chat.send_message(chat_id, Some(message_id), &reply).await?;

    if runtime.config.voice_reply_enabled {
        let audio = runtime.llm.synthesize_speech(&reply).await?;
        runtime.chat.send_voice(chat_id, Some(message_id), audio).await?;
    }

    Ok(())
}
