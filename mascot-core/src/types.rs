use crate::prompts::{FREEFORM_SYSTEM_PROMPT, GRAMMAR_CHECK_SYSTEM_PROMPT};
use serde::{Deserialize, Serialize};

pub const FREEFORM_MAX_TOKENS: u32 = 300;
pub const GRAMMAR_CHECK_MAX_TOKENS: u32 = 500;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

/// One entry of the visible transcript.
///
/// Messages are immutable once created; the transcript is append-only and
/// insertion order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Assistant,
        }
    }
}

/// Outcome of a grammar-check call.
///
/// Free-text fields are already display-converted when a client hands this out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarCheckResult {
    pub is_correct: bool,
    pub is_question: bool,
    pub corrected_sentence: String,
    pub comment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionMode {
    Freeform,
    GrammarCheckJson,
}

/// Per-call descriptor for an outbound completion. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_text: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub mode: CompletionMode,
}

impl CompletionRequest {
    pub fn freeform(user_text: impl Into<String>) -> Self {
        Self {
            system_prompt: FREEFORM_SYSTEM_PROMPT.to_string(),
            user_text: user_text.into(),
            max_tokens: FREEFORM_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            mode: CompletionMode::Freeform,
        }
    }

    pub fn grammar_check(user_text: impl Into<String>) -> Self {
        Self {
            system_prompt: GRAMMAR_CHECK_SYSTEM_PROMPT.to_string(),
            user_text: user_text.into(),
            max_tokens: GRAMMAR_CHECK_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            mode: CompletionMode::GrammarCheckJson,
        }
    }

    pub fn expects_json(&self) -> bool {
        self.mode == CompletionMode::GrammarCheckJson
    }
}

/// Which pipeline a submission runs through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationMode {
    /// Grammar check first, then a persona reply to the (corrected) sentence.
    #[default]
    GrammarTutor,
    /// Persona reply only.
    Freeform,
}

impl ConversationMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "grammar" | "grammar_tutor" | "tutor" => Some(Self::GrammarTutor),
            "freeform" | "chat" => Some(Self::Freeform),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grammar_check_request_uses_json_mode_and_larger_budget() {
        let req = CompletionRequest::grammar_check("I goes home.");
        assert!(req.expects_json());
        assert_eq!(req.max_tokens, GRAMMAR_CHECK_MAX_TOKENS);
        assert!(req.system_prompt.contains("corrected_sentence"));

        let free = CompletionRequest::freeform("hi");
        assert!(!free.expects_json());
        assert!(free.max_tokens < req.max_tokens);
    }

    #[test]
    fn message_serializes_sender_in_snake_case() {
        let json = serde_json::to_string(&Message::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"text":"hi","sender":"assistant"}"#);
    }

    #[test]
    fn conversation_mode_parses_aliases() {
        assert_eq!(
            ConversationMode::parse(" Grammar "),
            Some(ConversationMode::GrammarTutor)
        );
        assert_eq!(
            ConversationMode::parse("freeform"),
            Some(ConversationMode::Freeform)
        );
        assert_eq!(ConversationMode::parse("other"), None);
    }
}
