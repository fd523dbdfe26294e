use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use log::info;
use tokio::task::JoinHandle;

use mascot_core::config::{AppConfig, MascotPosition};
use mascot_engine::conversation::Conversation;
use mascot_engine::session::SubmissionReport;
use mascot_engine::traits::{CredentialStore, DisplaySurface};
use mascot_runtime::config_store::ConfigStore;
use mascot_runtime::ipc::{SaveMascotPositionRequest, SubmitMessageRequest, SubmitMessageResponse};
use mascot_runtime::runtime_engine::build_conversation_from_config;
use mascot_runtime::secrets::KeyringCredentialStore;

/// Everything a shell (tray app, chat bubble, CLI) needs from the mascot.
#[derive(Clone)]
pub struct AppService {
    config_store: ConfigStore,
    credentials: Arc<dyn CredentialStore>,
    display: Arc<dyn DisplaySurface>,
}

impl AppService {
    pub fn new(
        config_path: PathBuf,
        credentials: Arc<dyn CredentialStore>,
        display: Arc<dyn DisplaySurface>,
    ) -> Self {
        Self {
            config_store: ConfigStore::at_path(config_path),
            credentials,
            display,
        }
    }

    pub fn load_config(&self) -> anyhow::Result<AppConfig> {
        self.config_store.load_or_default()
    }

    pub fn save_config(&self, cfg: &AppConfig) -> anyhow::Result<()> {
        self.config_store.save(cfg)
    }

    pub fn set_api_key(&self, value: &str) -> anyhow::Result<()> {
        let value = value.trim();
        if value.is_empty() {
            bail!("API key is required");
        }
        KeyringCredentialStore.store(value)?;
        self.update_config(|cfg| cfg.llm_api_key_present = true)
    }

    pub fn api_key_present(&self) -> bool {
        !self.credentials.api_key().trim().is_empty()
    }

    pub fn clear_api_key(&self) -> anyhow::Result<()> {
        KeyringCredentialStore.clear()?;
        self.update_config(|cfg| cfg.llm_api_key_present = false)
    }

    pub fn save_mascot_position(&self, req: SaveMascotPositionRequest) -> anyhow::Result<()> {
        self.update_config(|cfg| {
            cfg.mascot_position = MascotPosition { x: req.x, y: req.y };
        })
    }

    fn update_config(&self, f: impl FnOnce(&mut AppConfig)) -> anyhow::Result<()> {
        let mut cfg = self.load_config()?;
        f(&mut cfg);
        self.save_config(&cfg)
    }

    /// Builds a fresh conversation from the current settings, so edits to the
    /// endpoint, model or mode apply to the next submission.
    pub fn conversation(&self) -> anyhow::Result<Arc<Conversation>> {
        let cfg = self.load_config()?;
        let conversation =
            build_conversation_from_config(&cfg, self.credentials.clone(), self.display.clone())?;
        Ok(Arc::new(conversation))
    }

    /// Runs one submission to completion and reports what was shown.
    pub async fn submit_user_message(
        &self,
        req: SubmitMessageRequest,
    ) -> anyhow::Result<SubmitMessageResponse> {
        let conversation = self.conversation()?;
        let resp = match conversation.run_submission(&req.text).await {
            Some(report) => SubmitMessageResponse::from(report),
            None => SubmitMessageResponse::ignored(),
        };
        info!(
            "submission finished: stage={}",
            resp.stage.as_deref().unwrap_or("ignored")
        );
        Ok(resp)
    }

    /// Fire-and-forget variant for UI event handlers; results arrive on the display.
    pub fn submit_user_message_detached(
        &self,
        text: &str,
    ) -> anyhow::Result<Option<JoinHandle<SubmissionReport>>> {
        Ok(self.conversation()?.submit_user_message(text))
    }
}
