use mascot_core::types::CompletionRequest;
use serde_json::{Value, json};

#[derive(Clone, PartialEq, Eq)]
pub struct OpenAiCompatibleChatConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl std::fmt::Debug for OpenAiCompatibleChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleChatConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

/// A ready-to-send `POST {base_url}/chat/completions` call.
#[derive(Clone, PartialEq)]
pub struct ChatCompletionRequest {
    pub url: String,
    pub api_key: String,
    pub payload: Value,
}

impl std::fmt::Debug for ChatCompletionRequest {
    // Prompts can carry user text; log the shape only.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionRequest")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.payload["model"])
            .field("max_tokens", &self.payload["max_tokens"])
            .field("json_mode", &self.payload.get("response_format").is_some())
            .finish()
    }
}

pub fn build_chat_completions_request(
    cfg: &OpenAiCompatibleChatConfig,
    completion: &CompletionRequest,
) -> ChatCompletionRequest {
    let mut payload = json!({
        "model": cfg.model,
        "messages": [
            {"role": "system", "content": completion.system_prompt},
            {"role": "user", "content": completion.user_text},
        ],
        "max_tokens": completion.max_tokens,
        "temperature": completion.temperature,
    });
    if completion.expects_json() {
        payload["response_format"] = json!({"type": "json_object"});
    }

    ChatCompletionRequest {
        url: chat_completions_url(&cfg.base_url),
        api_key: cfg.api_key.clone(),
        payload,
    }
}

fn chat_completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}
