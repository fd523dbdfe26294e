use crate::openai_compatible::ChatCompletionRequest;
use anyhow::Context;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Pooled HTTP client for chat-completion calls. Build once, reuse per call.
#[derive(Debug, Clone)]
pub struct ChatTransport {
    http: reqwest::Client,
}

impl ChatTransport {
    pub fn new() -> anyhow::Result<Self> {
        // The conversation layer has no timeout of its own.
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .context("build http client")?;
        Ok(Self { http })
    }

    /// Any status is returned as-is; only transport failures are errors.
    pub async fn send(&self, req: &ChatCompletionRequest) -> anyhow::Result<HttpResponse> {
        let resp = self
            .http
            .post(&req.url)
            .bearer_auth(&req.api_key)
            .json(&req.payload)
            .send()
            .await
            .with_context(|| format!("POST {}", req.url))?;

        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .context("read response body")?
            .to_vec();
        Ok(HttpResponse { status, body })
    }
}
