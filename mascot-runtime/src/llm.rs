use std::sync::RwLock;

use log::{debug, warn};
use mascot_core::error::CompletionError;
use mascot_core::prompts::FREEFORM_FALLBACK_REPLY;
use mascot_core::text::{markdown_to_display, strip_reasoning_blocks};
use mascot_core::types::{CompletionRequest, GrammarCheckResult};
use mascot_providers::openai_compatible::{
    OpenAiCompatibleChatConfig, build_chat_completions_request,
};
use mascot_providers::parse::{
    parse_grammar_check, parse_openai_chat_completion, parse_openai_error_message,
};
use mascot_providers::runtime::{ChatTransport, HttpResponse};

/// Remote completion client for any OpenAI-compatible chat endpoint.
///
/// Holds the API key between `initialize` calls. Each request reads the key once
/// when it starts, so a concurrent re-initialization only affects later requests.
/// The HTTP connection pool lives as long as the client.
pub struct OpenAiCompletionClient {
    base_url: String,
    model: String,
    api_key: RwLock<Option<String>>,
    transport: ChatTransport,
}

impl std::fmt::Debug for OpenAiCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompletionClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl OpenAiCompletionClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key: RwLock::new(None),
            transport: ChatTransport::new()?,
        })
    }

    fn current_key(&self) -> Result<String, CompletionError> {
        self.api_key
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
            .ok_or(CompletionError::NotInitialized)
    }

    /// One outbound call. `Ok(None)` means the service answered without content.
    async fn complete(
        &self,
        completion: &CompletionRequest,
    ) -> Result<Option<String>, CompletionError> {
        let cfg = OpenAiCompatibleChatConfig {
            base_url: self.base_url.clone(),
            api_key: self.current_key()?,
            model: self.model.clone(),
        };

        let req = build_chat_completions_request(&cfg, completion);
        debug!("completion request: {req:?}");

        let resp = self
            .transport
            .send(&req)
            .await
            .map_err(|e| CompletionError::network(format!("{e:#}")))?;

        if !resp.is_success() {
            let e = classify_failure(&resp);
            warn!("completion request rejected: {e}");
            return Err(e);
        }

        parse_openai_chat_completion(&resp.body)
            .map_err(|e| CompletionError::MalformedResponse(format!("{e:#}")))
    }
}

/// Map a non-2xx response onto the error taxonomy.
pub fn classify_failure(resp: &HttpResponse) -> CompletionError {
    let message =
        parse_openai_error_message(&resp.body).unwrap_or_else(|| "Unknown error".to_string());
    match resp.status {
        401 | 403 => CompletionError::InvalidCredential(message),
        status => CompletionError::service(status, message),
    }
}

#[async_trait::async_trait]
impl mascot_engine::traits::CompletionClient for OpenAiCompletionClient {
    fn initialize(&self, api_key: &str) -> Result<(), CompletionError> {
        if api_key.trim().is_empty() {
            return Err(CompletionError::InvalidCredential(
                "API key is required".into(),
            ));
        }
        let mut held = self
            .api_key
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *held = Some(api_key.trim().to_string());
        Ok(())
    }

    async fn request_freeform_reply(&self, user_text: &str) -> Result<String, CompletionError> {
        let content = self
            .complete(&CompletionRequest::freeform(user_text))
            .await?
            .map(|c| strip_reasoning_blocks(&c))
            .filter(|c| !c.is_empty());

        let reply = match content {
            Some(c) => c,
            None => {
                warn!("completion returned no content; using fallback reply");
                FREEFORM_FALLBACK_REPLY.to_string()
            }
        };
        Ok(markdown_to_display(&reply))
    }

    async fn request_grammar_check(
        &self,
        user_text: &str,
    ) -> Result<GrammarCheckResult, CompletionError> {
        let content = self
            .complete(&CompletionRequest::grammar_check(user_text))
            .await?
            .ok_or_else(|| {
                CompletionError::MalformedResponse("no content in grammar check response".into())
            })?;

        let raw = parse_grammar_check(&content)
            .map_err(|e| CompletionError::MalformedResponse(format!("{e:#}")))?;

        Ok(GrammarCheckResult {
            corrected_sentence: markdown_to_display(&raw.corrected_sentence),
            comment: markdown_to_display(&raw.comment),
            ..raw
        })
    }
}
