//! Welcome messages for new members.

use tracing::{info, instrument};

use crate::{
    base::{
        prompts,
        types::{Member, Void},
    },
    runtime::Runtime,
};

/// Welcomes each joining member with their own completion and message, in order.
#[instrument(skip_all, fields(chat_id = chat_id, joined = members.len()))]
pub async fn handle_membership_change(chat_id: i64, members: &[Member], runtime: &Runtime) -> Void {
    for member in members {
        info!("Welcoming {} ...", member.display_name);

        let prompt = prompts::welcome_instruction(&member.display_name);
        let reply = runtime.llm.complete_text(&prompt).await?;

        runtime.chat.send_message(chat_id, None, &reply).await?;
    }

    Ok(())
}
