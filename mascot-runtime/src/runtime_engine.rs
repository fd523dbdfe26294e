use std::sync::Arc;

use mascot_core::config::AppConfig;
use mascot_engine::conversation::Conversation;
use mascot_engine::traits::{CompletionClient, CredentialStore, DisplaySurface};

use crate::llm::OpenAiCompletionClient;

/// Build a runnable conversation from settings + shell-provided collaborators.
///
/// This keeps the UI layer thin.
pub fn build_conversation_from_config(
    cfg: &AppConfig,
    credentials: Arc<dyn CredentialStore>,
    display: Arc<dyn DisplaySurface>,
) -> anyhow::Result<Conversation> {
    let client: Arc<dyn CompletionClient> = Arc::new(OpenAiCompletionClient::new(
        cfg.llm_base_url.clone(),
        cfg.llm_model.clone(),
    )?);

    Ok(Conversation::new(
        cfg.conversation_mode,
        client,
        credentials,
        display,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryCredentialStore, MemoryDisplay};
    use mascot_core::types::ConversationMode;
    use mascot_engine::session::PipelineStage;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn built_conversation_uses_configured_endpoint_and_mode() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"choices":[{"message":{"content":"Purr."}}]}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let cfg = AppConfig {
            llm_base_url: format!("{}/v1", server.uri()),
            conversation_mode: ConversationMode::Freeform,
            ..AppConfig::default()
        };
        let display = Arc::new(MemoryDisplay::default());
        let conv = build_conversation_from_config(
            &cfg,
            MemoryCredentialStore::new("k").boxed(),
            display.clone(),
        )
        .unwrap();

        let report = conv.run_submission("hello").await.unwrap();
        assert_eq!(report.stage, PipelineStage::Completed);
        assert_eq!(display.messages().last().unwrap().text, "Purr.");
        assert!(display.is_visible());
    }
}
