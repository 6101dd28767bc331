//! Event handling and user interactions for betty-bot.
//!
//! This module is the dispatcher: every validated [`InboundEvent`] is routed to
//! exactly one handler, which produces at most one reply (plus an optional
//! voice note for triggered text messages).

pub mod command;
pub mod delete;
pub mod membership;
pub mod text_message;

use tracing::{Instrument, error, info_span, instrument};

use crate::{
    base::types::{InboundEvent, Void},
    runtime::Runtime,
};

/// Handles an inbound event to completion.
///
/// Errors are logged and swallowed: a failed handler sends nothing for its
/// event and the caller moves on to the next one.
pub async fn handle_event(event: InboundEvent, runtime: &Runtime) {
    let span = info_span!("event", kind = event.kind(), chat_id = event.chat_id());

    // Process the event.
    let result = dispatch_event(event, runtime).instrument(span).await;

    // Log any errors.
    if let Err(err) = &result {
        error!("Error while handling: {:#}", err);
    }
}

/// Routes an event to its handler.
#[instrument(skip_all)]
pub async fn dispatch_event(event: InboundEvent, runtime: &Runtime) -> Void {
    match event {
        InboundEvent::PlainText { chat_id, message_id, text, .. } => text_message::handle_text_message(chat_id, message_id, &text, runtime).await,
        InboundEvent::Command {
            chat_id,
            message_id,
            sender,
            command,
            reply_to,
        } => command::handle_command(command, chat_id, message_id, &sender, reply_to, runtime).await,
        InboundEvent::MembershipChange { chat_id, members } => membership::handle_membership_change(chat_id, &members, runtime).await,
    }
}
