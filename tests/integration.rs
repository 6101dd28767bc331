#![cfg(test)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use betty_bot::{
    base::{
        config::{Config, ConfigInner},
        prompts,
        types::{Command, InboundEvent, Member, MemberRole, Res, Void},
    },
    interaction::{dispatch_event, handle_event},
    runtime::Runtime,
    service::{
        chat::{ChatClient, GenericChatClient},
        llm::{GenericLlmClient, LlmClient},
    },
};
use mockall::{Sequence, mock};

// Mocks.

mock! {
    pub Chat {}

    #[async_trait]
    impl GenericChatClient for Chat {
        async fn start(&self) -> Void;
        async fn send_message(&self, chat_id: i64, reply_to: Option<i32>, text: &str) -> Void;
        async fn send_voice(&self, chat_id: i64, reply_to: Option<i32>, audio: Vec<u8>) -> Void;
        async fn get_member_role(&self, chat_id: i64, user_id: u64) -> Res<MemberRole>;
        async fn delete_message(&self, chat_id: i64, message_id: i32) -> Void;
    }
}

mock! {
    pub Llm {}

    #[async_trait]
    impl GenericLlmClient for Llm {
        async fn complete_text(&self, prompt: &str) -> Res<String>;
        async fn synthesize_speech(&self, text: &str) -> Res<Vec<u8>>;
    }
}

// Helpers.

const CHAT_ID: i64 = -100123;

struct Options {
    voice_reply_enabled: bool,
    admin_delete_enabled: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            voice_reply_enabled: false,
            admin_delete_enabled: true,
        }
    }
}

fn build_runtime(chat: MockChat, llm: MockLlm, options: Options) -> Runtime {
    let config = Config {
        inner: Arc::new(ConfigInner {
            telegram_bot_token: "123:abc".to_string(),
            openai_api_key: "sk-test".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            openai_max_tokens: 200u32,
            persona_name: "betty".to_string(),
            persona_directive: prompts::PERSONA_DIRECTIVE.to_string(),
            voice_reply_enabled: options.voice_reply_enabled,
            admin_delete_enabled: options.admin_delete_enabled,
            ..Default::default()
        }),
    };

    Runtime {
        config,
        llm: LlmClient::new(Arc::new(llm)),
        chat: ChatClient::new(Arc::new(chat)),
    }
}

fn sender() -> Member {
    Member {
        user_id: 4242,
        display_name: "Sam".to_string(),
    }
}

fn text_event(message_id: i32, text: &str) -> InboundEvent {
    InboundEvent::PlainText {
        chat_id: CHAT_ID,
        message_id,
        sender: sender(),
        text: text.to_string(),
    }
}

fn command_event(command: Command, reply_to: Option<i32>) -> InboundEvent {
    InboundEvent::Command {
        chat_id: CHAT_ID,
        message_id: 10,
        sender: sender(),
        command,
        reply_to,
    }
}

// Text trigger.

#[tokio::test]
async fn test_text_without_trigger_is_ignored() {
    let mut chat = MockChat::new();
    let mut llm = MockLlm::new();

    llm.expect_complete_text().never();
    chat.expect_send_message().never();

    let runtime = build_runtime(chat, llm, Options::default());

    handle_event(text_event(1, "hello everyone, how is it going?"), &runtime).await;
    handle_event(text_event(2, "bet you can't guess"), &runtime).await;
}

#[tokio::test]
async fn test_text_with_trigger_replies_once_with_original_text() {
    let mut chat = MockChat::new();
    let mut llm = MockLlm::new();

    llm.expect_complete_text()
        .withf(|prompt| prompt.to_string() == "Hey BETTY, how are you?")
        .times(1)
        .returning(|_| Ok("I'm great, thanks for asking! 💖".to_string()));

    chat.expect_send_message()
        .withf(|chat_id, reply_to, text| *chat_id == CHAT_ID && *reply_to == Some(7) && text.to_string() == "I'm great, thanks for asking! 💖")
        .times(1)
        .returning(|_, _, _| Ok(()));

    chat.expect_send_voice().never();

    let runtime = build_runtime(chat, llm, Options::default());

    handle_event(text_event(7, "Hey BETTY, how are you?"), &runtime).await;
}

#[tokio::test]
async fn test_text_with_trigger_and_voice_sends_speech_of_reply() {
    let mut chat = MockChat::new();
    let mut llm = MockLlm::new();

    llm.expect_complete_text().times(1).returning(|_| Ok("Hiii 😘".to_string()));

    llm.expect_synthesize_speech()
        .withf(|text| text.to_string() == "Hiii 😘")
        .times(1)
        .returning(|_| Ok(vec![0x4f, 0x67, 0x67, 0x53]));

    chat.expect_send_message().times(1).returning(|_, _, _| Ok(()));

    chat.expect_send_voice()
        .withf(|chat_id, reply_to, audio| *chat_id == CHAT_ID && *reply_to == Some(3) && *audio == vec![0x4f, 0x67, 0x67, 0x53])
        .times(1)
        .returning(|_, _, _| Ok(()));

    let runtime = build_runtime(
        chat,
        llm,
        Options {
            voice_reply_enabled: true,
            ..Default::default()
        },
    );

    handle_event(text_event(3, "betty say hi"), &runtime).await;
}

#[tokio::test]
async fn test_speech_failure_keeps_text_reply() {
    let mut chat = MockChat::new();
    let mut llm = MockLlm::new();

    llm.expect_complete_text().times(1).returning(|_| Ok("Hiii".to_string()));
    llm.expect_synthesize_speech().times(1).returning(|_| Err(anyhow::anyhow!("empty audio stream")));

    chat.expect_send_message().times(1).returning(|_, _, _| Ok(()));
    chat.expect_send_voice().never();

    let runtime = build_runtime(
        chat,
        llm,
        Options {
            voice_reply_enabled: true,
            ..Default::default()
        },
    );

    let result = dispatch_event(text_event(3, "betty say hi"), &runtime).await;
    assert!(result.is_err());
}

// Commands.

#[tokio::test]
async fn test_completion_commands_use_fixed_instructions() {
    let cases = [
        (Command::Joke, prompts::JOKE_INSTRUCTION),
        (Command::Advice, prompts::ADVICE_INSTRUCTION),
        (Command::Mood, prompts::MOOD_INSTRUCTION),
    ];

    for (command, instruction) in cases {
        let mut chat = MockChat::new();
        let mut llm = MockLlm::new();

        llm.expect_complete_text()
            .withf(move |prompt| prompt.to_string() == instruction)
            .times(1)
            .returning(move |_| Ok(format!("reply for {command}")));

        let expected = format!("reply for {command}");
        chat.expect_send_message()
            .withf(move |chat_id, reply_to, text| *chat_id == CHAT_ID && *reply_to == Some(10) && text.to_string() == expected)
            .times(1)
            .returning(|_, _, _| Ok(()));

        let runtime = build_runtime(chat, llm, Options::default());

        // A reply target on the command message must not leak into the prompt.
        handle_event(command_event(command, Some(99)), &runtime).await;
    }
}

#[tokio::test]
async fn test_start_sends_greeting_without_completion() {
    let mut chat = MockChat::new();
    let mut llm = MockLlm::new();

    llm.expect_complete_text().never();

    chat.expect_send_message()
        .withf(|_, _, text| text.to_string() == prompts::START_GREETING)
        .times(1)
        .returning(|_, _, _| Ok(()));

    let runtime = build_runtime(chat, llm, Options::default());

    handle_event(command_event(Command::Start, None), &runtime).await;
}

#[tokio::test]
async fn test_provider_failure_sends_nothing_and_next_event_is_handled() {
    let mut chat = MockChat::new();
    let mut llm = MockLlm::new();
    let mut seq = Sequence::new();

    llm.expect_complete_text()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(anyhow::anyhow!("quota exceeded")));

    llm.expect_complete_text()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok("Why did the crab never share? Because it was shellfish 🦀".to_string()));

    // Only the second event gets a reply.
    chat.expect_send_message().times(1).returning(|_, _, _| Ok(()));

    let runtime = build_runtime(chat, llm, Options::default());

    handle_event(command_event(Command::Joke, None), &runtime).await;
    handle_event(command_event(Command::Joke, None), &runtime).await;
}

#[tokio::test]
async fn test_provider_failure_propagates_from_dispatch() {
    let mut chat = MockChat::new();
    let mut llm = MockLlm::new();

    llm.expect_complete_text().times(1).returning(|_| Err(anyhow::anyhow!("invalid api key")));
    chat.expect_send_message().never();

    let runtime = build_runtime(chat, llm, Options::default());

    let result = dispatch_event(command_event(Command::Advice, None), &runtime).await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("invalid api key"));
}

// Delete.

#[tokio::test]
async fn test_delete_by_non_admin_is_refused() {
    let mut chat = MockChat::new();
    let llm = MockLlm::new();

    chat.expect_get_member_role()
        .withf(|chat_id, user_id| *chat_id == CHAT_ID && *user_id == 4242)
        .times(1)
        .returning(|_, _| Ok(MemberRole::Member));

    chat.expect_delete_message().never();

    chat.expect_send_message()
        .withf(|_, reply_to, text| *reply_to == Some(10) && text.to_string() == prompts::DELETE_REFUSAL)
        .times(1)
        .returning(|_, _, _| Ok(()));

    let runtime = build_runtime(chat, llm, Options::default());

    handle_event(command_event(Command::Delete, Some(5)), &runtime).await;
}

#[tokio::test]
async fn test_delete_by_admin_without_reply_sends_usage() {
    let mut chat = MockChat::new();
    let llm = MockLlm::new();

    chat.expect_get_member_role().times(1).returning(|_, _| Ok(MemberRole::Administrator));
    chat.expect_delete_message().never();

    chat.expect_send_message()
        .withf(|_, _, text| text.to_string() == prompts::DELETE_USAGE)
        .times(1)
        .returning(|_, _, _| Ok(()));

    let runtime = build_runtime(chat, llm, Options::default());

    handle_event(command_event(Command::Delete, None), &runtime).await;
}

#[tokio::test]
async fn test_delete_by_admin_with_reply_deletes_target() {
    for role in [MemberRole::Administrator, MemberRole::Owner] {
        let mut chat = MockChat::new();
        let llm = MockLlm::new();

        chat.expect_get_member_role().times(1).returning(move |_, _| Ok(role));

        chat.expect_delete_message()
            .withf(|chat_id, message_id| *chat_id == CHAT_ID && *message_id == 5)
            .times(1)
            .returning(|_, _| Ok(()));

        chat.expect_send_message()
            .withf(|_, _, text| text.to_string() == prompts::DELETE_CONFIRMATION)
            .times(1)
            .returning(|_, _, _| Ok(()));

        let runtime = build_runtime(chat, llm, Options::default());

        handle_event(command_event(Command::Delete, Some(5)), &runtime).await;
    }
}

#[tokio::test]
async fn test_delete_role_lookup_failure_sends_nothing() {
    let mut chat = MockChat::new();
    let llm = MockLlm::new();

    chat.expect_get_member_role().times(1).returning(|_, _| Err(anyhow::anyhow!("chat not found")));
    chat.expect_delete_message().never();
    chat.expect_send_message().never();

    let runtime = build_runtime(chat, llm, Options::default());

    handle_event(command_event(Command::Delete, Some(5)), &runtime).await;
}

#[tokio::test]
async fn test_delete_disabled_is_ignored() {
    let mut chat = MockChat::new();
    let llm = MockLlm::new();

    chat.expect_get_member_role().never();
    chat.expect_delete_message().never();
    chat.expect_send_message().never();

    let runtime = build_runtime(
        chat,
        llm,
        Options {
            admin_delete_enabled: false,
            ..Default::default()
        },
    );

    handle_event(command_event(Command::Delete, Some(5)), &runtime).await;
}

// Membership.

#[tokio::test]
async fn test_membership_change_welcomes_each_joiner_in_order() {
    let mut chat = MockChat::new();
    let mut llm = MockLlm::new();

    let names = ["Ada Lovelace", "Grace", "Linus"];

    llm.expect_complete_text().times(3).returning(|prompt| Ok(format!("welcome: {prompt}")));

    let sent = Arc::new(Mutex::new(Vec::new()));
    let sent_clone = sent.clone();

    chat.expect_send_message()
        .withf(|chat_id, reply_to, _| *chat_id == CHAT_ID && reply_to.is_none())
        .times(3)
        .returning(move |_, _, text| {
            sent_clone.lock().unwrap().push(text.to_string());
            Ok(())
        });

    let runtime = build_runtime(chat, llm, Options::default());

    let members = names
        .iter()
        .enumerate()
        .map(|(i, name)| Member {
            user_id: i as u64 + 1,
            display_name: name.to_string(),
        })
        .collect();

    handle_event(InboundEvent::MembershipChange { chat_id: CHAT_ID, members }, &runtime).await;

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 3);

    for (message, name) in sent.iter().zip(names) {
        assert!(message.starts_with("welcome: "));
        assert!(message.contains(name), "`{message}` should mention `{name}`");
    }
}
