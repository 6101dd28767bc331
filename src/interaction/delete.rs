//! Admin-only message deletion.

use tracing::{info, instrument, warn};

use crate::{
    base::{
        prompts,
        types::{Member, Void},
    },
    runtime::Runtime,
};

/// Deletes the message that `/delete` replies to.
///
/// Two preconditions, checked in order: the sender must be an owner or
/// administrator, and the command must reply to a message. A failed check
/// gets its own explanatory reply and nothing is deleted.
#[instrument(skip(sender, runtime), fields(user_id = sender.user_id))]
pub async fn handle_delete(chat_id: i64, message_id: i32, sender: &Member, reply_to: Option<i32>, runtime: &Runtime) -> Void {
    let role = runtime.chat.get_member_role(chat_id, sender.user_id).await?;

    if !role.is_admin() {
        warn!("Refusing delete for non-admin ({:?}).", role);
        return runtime.chat.send_message(chat_id, Some(message_id), prompts::DELETE_REFUSAL).await;
    }

    let Some(target) = reply_to else {
        return runtime.chat.send_message(chat_id, Some(message_id), prompts::DELETE_USAGE).await;
    };

    info!("Deleting message {} ...", target);

    runtime.chat.delete_message(chat_id, target).await?;
    runtime.chat.send_message(chat_id, Some(message_id), prompts::DELETE_CONFIRMATION).await
}
