use mascot_core::error::CompletionError;
use mascot_core::types::Message;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where a single submission is in its pipeline.
///
/// `Idle -> AwaitingGrammarCheck -> (GrammarCheckFailed | GrammarCheckSucceeded)
///  -> AwaitingFollowupReply -> (FollowupFailed | Completed)`.
/// Freeform submissions skip the grammar-check states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStage {
    Idle,
    AwaitingGrammarCheck,
    GrammarCheckFailed,
    GrammarCheckSucceeded,
    AwaitingFollowupReply,
    FollowupFailed,
    Completed,
}

impl PipelineStage {
    // Stable string labels for UI display and IPC.
    // Intentionally not derived from `Debug`.
    pub fn label(self) -> &'static str {
        match self {
            PipelineStage::Idle => "idle",
            PipelineStage::AwaitingGrammarCheck => "checking_grammar",
            PipelineStage::GrammarCheckFailed => "grammar_check_failed",
            PipelineStage::GrammarCheckSucceeded => "grammar_checked",
            PipelineStage::AwaitingFollowupReply => "replying",
            PipelineStage::FollowupFailed => "reply_failed",
            PipelineStage::Completed => "done",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PipelineStage::GrammarCheckFailed
                | PipelineStage::FollowupFailed
                | PipelineStage::Completed
        )
    }

    pub fn is_failure(self) -> bool {
        matches!(
            self,
            PipelineStage::GrammarCheckFailed | PipelineStage::FollowupFailed
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionTimings {
    pub grammar_check_ms: Option<u64>,
    pub followup_ms: Option<u64>,
}

/// Everything one submission did, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReport {
    pub stage: PipelineStage,
    pub user_text: String,

    // Text handed to the follow-up call; `None` if the pipeline stopped before it.
    pub forwarded_text: Option<String>,

    // Every display event emitted for this submission, user message first.
    pub messages: Vec<Message>,
    pub error: Option<CompletionError>,
    pub timings: SubmissionTimings,
}

impl SubmissionReport {
    pub fn started(user_message: Message) -> Self {
        Self {
            stage: PipelineStage::Idle,
            user_text: user_message.text.clone(),
            forwarded_text: None,
            messages: vec![user_message],
            error: None,
            timings: SubmissionTimings::default(),
        }
    }

    pub fn assistant_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages
            .iter()
            .filter(|m| m.sender == mascot_core::types::Sender::Assistant)
    }
}

pub fn ms(d: Duration) -> u64 {
    d.as_millis().try_into().unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_failure_and_completion_are_terminal() {
        use PipelineStage::*;
        for stage in [Idle, AwaitingGrammarCheck, GrammarCheckSucceeded, AwaitingFollowupReply] {
            assert!(!stage.is_terminal(), "{stage:?}");
        }
        for stage in [GrammarCheckFailed, FollowupFailed, Completed] {
            assert!(stage.is_terminal(), "{stage:?}");
        }
        assert!(!Completed.is_failure());
    }

    #[test]
    fn started_report_holds_user_message_only() {
        let r = SubmissionReport::started(Message::user("Hello"));
        assert_eq!(r.stage, PipelineStage::Idle);
        assert_eq!(r.user_text, "Hello");
        assert_eq!(r.messages.len(), 1);
        assert_eq!(r.assistant_messages().count(), 0);
    }
}
