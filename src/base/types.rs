//! Shared types for the betty-bot.

use std::{fmt, str::FromStr};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

// Persona.

/// The persona the bot speaks as.
///
/// Built once from the configuration and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    /// The trigger name, stored lowercased.
    name: String,
    /// The system preamble sent ahead of every prompt.
    directive: String,
}

impl Persona {
    pub fn new(name: &str, directive: &str) -> Self {
        Self {
            name: name.trim().to_lowercase(),
            directive: directive.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directive(&self) -> &str {
        &self.directive
    }

    /// Whether the (case-insensitive) trigger name appears anywhere in `text`.
    pub fn is_mentioned_in(&self, text: &str) -> bool {
        !self.name.is_empty() && text.to_lowercase().contains(&self.name)
    }
}

// Commands.

/// The fixed command surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Joke,
    Advice,
    Mood,
    Delete,
}

impl Command {
    /// Every command, in menu order.
    pub const ALL: [Command; 5] = [Command::Start, Command::Joke, Command::Advice, Command::Mood, Command::Delete];

    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Joke => "joke",
            Command::Advice => "advice",
            Command::Mood => "mood",
            Command::Delete => "delete",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Command::Start => "Say hi to Betty.",
            Command::Joke => "Hear a short joke.",
            Command::Advice => "Get some friendly life advice.",
            Command::Mood => "Ask Betty how she is feeling.",
            Command::Delete => "Delete the replied-to message (admins only).",
        }
    }

    /// Parse a `/command` (optionally `/command@bot_username`) invocation.
    ///
    /// Anything after the first whitespace is ignored. Commands addressed to a
    /// different bot yield `None`.
    pub fn parse_invocation(text: &str, bot_username: &str) -> Option<Self> {
        let head = text.trim_start().split_whitespace().next()?;
        let head = head.strip_prefix('/')?;

        let name = match head.split_once('@') {
            Some((name, target)) => {
                if !target.eq_ignore_ascii_case(bot_username) {
                    return None;
                }
                name
            }
            None => head,
        };

        name.parse().ok()
    }
}

impl FromStr for Command {
    type Err = Err;

    fn from_str(s: &str) -> Res<Self> {
        Command::ALL
            .into_iter()
            .find(|command| command.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("Unknown command: `{s}`."))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.name())
    }
}

// Chat members.

/// A chat participant as seen by the handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub user_id: u64,
    pub display_name: String,
}

/// A user's membership role in a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRole {
    Owner,
    Administrator,
    Member,
    Restricted,
    Left,
    Banned,
}

impl MemberRole {
    /// Owners and administrators may moderate the chat.
    pub fn is_admin(&self) -> bool {
        matches!(self, MemberRole::Owner | MemberRole::Administrator)
    }
}

// Inbound events.

/// A validated inbound update.
///
/// Each variant carries everything its handler needs; malformed updates never
/// become an `InboundEvent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A plain text message (not a command).
    PlainText { chat_id: i64, message_id: i32, sender: Member, text: String },
    /// A `/command` invocation, with the id of the message it replies to (if any).
    Command {
        chat_id: i64,
        message_id: i32,
        sender: Member,
        command: Command,
        reply_to: Option<i32>,
    },
    /// One or more members joined the chat.
    MembershipChange { chat_id: i64, members: Vec<Member> },
}

impl InboundEvent {
    pub fn chat_id(&self) -> i64 {
        match self {
            InboundEvent::PlainText { chat_id, .. } | InboundEvent::Command { chat_id, .. } | InboundEvent::MembershipChange { chat_id, .. } => *chat_id,
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::PlainText { .. } => "text",
            InboundEvent::Command { .. } => "command",
            InboundEvent::MembershipChange { .. } => "membership",
        }
    }
}

// Tests.
