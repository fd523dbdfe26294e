mod display;

use std::sync::Arc;

use anyhow::Context;
use log::info;
use mascot_core::config::{AppConfig, DEFAULT_LLM_BASE_URL, DEFAULT_LLM_MODEL};
use mascot_core::types::ConversationMode;
use mascot_engine::traits::CredentialStore;
use mascot_runtime::memory::MemoryCredentialStore;
use mascot_runtime::runtime_engine::build_conversation_from_config;
use mascot_runtime::secrets::KeyringCredentialStore;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::display::StdoutDisplay;

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Chat with the mascot from a terminal, one line per message.
    // LLM_API_KEY overrides the key saved in the OS keyring.
    let mode = match std::env::var("MASCOT_MODE") {
        Ok(raw) => ConversationMode::parse(&raw)
            .with_context(|| format!("unknown MASCOT_MODE: {raw}"))?,
        Err(_) => ConversationMode::default(),
    };

    let cfg = AppConfig {
        llm_base_url: env_or("LLM_BASE_URL", DEFAULT_LLM_BASE_URL),
        llm_model: env_or("LLM_MODEL", DEFAULT_LLM_MODEL),
        conversation_mode: mode,
        ..AppConfig::default()
    };

    let credentials: Arc<dyn CredentialStore> = match std::env::var("LLM_API_KEY") {
        Ok(key) if !key.trim().is_empty() => MemoryCredentialStore::new(key).boxed(),
        _ => Arc::new(KeyringCredentialStore),
    };

    let conversation = build_conversation_from_config(&cfg, credentials, Arc::new(StdoutDisplay))
        .context("build conversation")?;
    info!(
        "mascot ready: mode={:?} model={} base_url={}",
        conversation.mode(),
        cfg.llm_model,
        cfg.llm_base_url
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("read stdin")? {
        if let Some(report) = conversation.run_submission(&line).await {
            info!(
                "stage={} grammar={:?}ms reply={:?}ms",
                report.stage.label(),
                report.timings.grammar_check_ms,
                report.timings.followup_ms
            );
        }
    }

    Ok(())
}
