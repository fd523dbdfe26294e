use crate::session::{PipelineStage, SubmissionReport, ms};
use crate::traits::{CompletionClient, CredentialStore, DisplaySurface};
use log::{debug, error, info, warn};
use mascot_core::error::CompletionError;
use mascot_core::text::escape_text;
use mascot_core::types::{ConversationMode, GrammarCheckResult, Message};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

pub const ERROR_INDICATOR: &str = "⚠️";
pub const NOT_CONFIGURED_MESSAGE: &str = "API key is not set. Please set it in the settings.";
pub const FAILED_RESPONSE_MESSAGE: &str = "Failed to get a response";
pub const CORRECTED_SENTENCE_LABEL: &str = "Corrected Sentence:";

/// The assistant-side text shown for a failed stage.
pub fn user_facing_error(e: &CompletionError) -> String {
    match e {
        CompletionError::NotInitialized => format!("{ERROR_INDICATOR} {NOT_CONFIGURED_MESSAGE}"),
        other => format!(
            "{ERROR_INDICATOR} {FAILED_RESPONSE_MESSAGE}: {}",
            escape_text(&other.to_string())
        ),
    }
}

/// What the grammar-check stage hands to the follow-up stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarResolution {
    pub forward_text: String,
    pub display_events: Vec<Message>,
}

/// Decide what to show and what to forward once a grammar check succeeded.
///
/// A correct sentence is forwarded verbatim so the persona never sees a reworded
/// copy of it; an incorrect one is replaced by the correction.
pub fn resolve_grammar_check(original: &str, check: &GrammarCheckResult) -> GrammarResolution {
    if check.is_correct {
        GrammarResolution {
            forward_text: original.to_string(),
            display_events: vec![Message::assistant(check.comment.clone())],
        }
    } else {
        GrammarResolution {
            forward_text: check.corrected_sentence.clone(),
            display_events: vec![
                Message::assistant(format!(
                    "{CORRECTED_SENTENCE_LABEL}\n{}",
                    check.corrected_sentence
                )),
                Message::assistant(check.comment.clone()),
            ],
        }
    }
}

fn accept_user_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Turns one user utterance into transcript events and remote calls.
///
/// The client, credential store, and display are injected so the composing
/// application owns them and tests can swap in fakes.
pub struct Conversation {
    mode: ConversationMode,
    client: Arc<dyn CompletionClient>,
    credentials: Arc<dyn CredentialStore>,
    display: Arc<dyn DisplaySurface>,
}

impl Conversation {
    pub fn new(
        mode: ConversationMode,
        client: Arc<dyn CompletionClient>,
        credentials: Arc<dyn CredentialStore>,
        display: Arc<dyn DisplaySurface>,
    ) -> Self {
        Self {
            mode,
            client,
            credentials,
            display,
        }
    }

    pub fn mode(&self) -> ConversationMode {
        self.mode
    }

    /// Fire-and-forget entry point for the UI.
    ///
    /// Blank input is ignored. Otherwise the user's message is displayed before this
    /// returns and the remote pipeline runs on a spawned task; callers may drop the
    /// handle. Overlapping submissions are not cancelled or serialized.
    pub fn submit_user_message(self: &Arc<Self>, text: &str) -> Option<JoinHandle<SubmissionReport>> {
        let text = accept_user_text(text)?;
        let report = SubmissionReport::started(self.display_user_message(&text));

        let this = Arc::clone(self);
        Some(tokio::spawn(async move {
            this.run_pipeline(report, |_stage| async {}).await
        }))
    }

    /// Runs the whole pipeline inline. `None` for blank input.
    pub async fn run_submission(&self, text: &str) -> Option<SubmissionReport> {
        self.run_submission_with_hook(text, |_stage| async {}).await
    }

    /// Same as `run_submission`, but reports every stage transition to `on_stage`.
    ///
    /// The hook is intended for UI progress and must be fast.
    pub async fn run_submission_with_hook<F, Fut>(
        &self,
        text: &str,
        on_stage: F,
    ) -> Option<SubmissionReport>
    where
        F: Fn(PipelineStage) -> Fut,
        Fut: Future<Output = ()>,
    {
        let text = accept_user_text(text)?;
        let report = SubmissionReport::started(self.display_user_message(&text));
        Some(self.run_pipeline(report, on_stage).await)
    }

    fn display_user_message(&self, text: &str) -> Message {
        let message = Message::user(text);
        self.display(message.clone());
        message
    }

    fn display(&self, message: Message) {
        if !self.display.is_visible() {
            self.display.show();
        }
        self.display.add_message(message);
    }

    fn emit(&self, report: &mut SubmissionReport, message: Message) {
        self.display(message.clone());
        report.messages.push(message);
    }

    async fn enter<F, Fut>(&self, report: &mut SubmissionReport, stage: PipelineStage, on_stage: &F)
    where
        F: Fn(PipelineStage) -> Fut,
        Fut: Future<Output = ()>,
    {
        debug!("submission stage: {}", stage.label());
        report.stage = stage;
        on_stage(stage).await;
    }

    async fn fail<F, Fut>(
        &self,
        mut report: SubmissionReport,
        stage: PipelineStage,
        e: CompletionError,
        on_stage: &F,
    ) -> SubmissionReport
    where
        F: Fn(PipelineStage) -> Fut,
        Fut: Future<Output = ()>,
    {
        self.emit(&mut report, Message::assistant(user_facing_error(&e)));
        report.error = Some(e);
        self.enter(&mut report, stage, on_stage).await;
        report
    }

    async fn run_pipeline<F, Fut>(
        &self,
        mut report: SubmissionReport,
        on_stage: F,
    ) -> SubmissionReport
    where
        F: Fn(PipelineStage) -> Fut,
        Fut: Future<Output = ()>,
    {
        info!(
            "submission started (mode={:?}, chars={})",
            self.mode,
            report.user_text.chars().count()
        );

        // The first stage that would have called out is the one that fails.
        let first_failure = match self.mode {
            ConversationMode::GrammarTutor => PipelineStage::GrammarCheckFailed,
            ConversationMode::Freeform => PipelineStage::FollowupFailed,
        };

        // Re-read the key for every submission; it may have changed in settings.
        let api_key = self.credentials.api_key();
        if api_key.trim().is_empty() {
            warn!("API key is not set");
            return self
                .fail(report, first_failure, CompletionError::NotInitialized, &on_stage)
                .await;
        }
        if let Err(e) = self.client.initialize(&api_key) {
            error!("completion client initialization failed: {e}");
            return self.fail(report, first_failure, e, &on_stage).await;
        }

        let forward_text = match self.mode {
            ConversationMode::GrammarTutor => {
                self.enter(&mut report, PipelineStage::AwaitingGrammarCheck, &on_stage)
                    .await;

                let t0 = Instant::now();
                let checked = self.client.request_grammar_check(&report.user_text).await;
                report.timings.grammar_check_ms = Some(ms(t0.elapsed()));

                let check = match checked {
                    Ok(check) => check,
                    Err(e) => {
                        error!("grammar check failed ({}): {e}", e.kind());
                        return self
                            .fail(report, PipelineStage::GrammarCheckFailed, e, &on_stage)
                            .await;
                    }
                };

                self.enter(&mut report, PipelineStage::GrammarCheckSucceeded, &on_stage)
                    .await;
                let resolution = resolve_grammar_check(&report.user_text, &check);
                for message in resolution.display_events {
                    self.emit(&mut report, message);
                }
                resolution.forward_text
            }
            ConversationMode::Freeform => report.user_text.clone(),
        };

        debug!("forwarding to follow-up: {forward_text:?}");
        report.forwarded_text = Some(forward_text.clone());
        self.enter(&mut report, PipelineStage::AwaitingFollowupReply, &on_stage)
            .await;

        let t0 = Instant::now();
        let replied = self.client.request_freeform_reply(&forward_text).await;
        report.timings.followup_ms = Some(ms(t0.elapsed()));

        match replied {
            Ok(reply) => {
                self.emit(&mut report, Message::assistant(reply));
                self.enter(&mut report, PipelineStage::Completed, &on_stage)
                    .await;
                info!("submission completed");
                report
            }
            Err(e) => {
                error!("follow-up reply failed ({}): {e}", e.kind());
                self.fail(report, PipelineStage::FollowupFailed, e, &on_stage)
                    .await
            }
        }
    }
}
