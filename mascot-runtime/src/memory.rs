use std::sync::{Arc, Mutex, RwLock};

use mascot_core::types::Message;
use mascot_engine::traits::{CredentialStore, DisplaySurface};

/// Credential store backed by a value in memory (env-provided keys, tests).
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    api_key: RwLock<String>,
}

impl MemoryCredentialStore {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: RwLock::new(api_key.into()),
        }
    }

    pub fn boxed(self) -> Arc<dyn CredentialStore> {
        Arc::new(self)
    }

    pub fn set(&self, api_key: impl Into<String>) {
        *self
            .api_key
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = api_key.into();
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn api_key(&self) -> String {
        self.api_key
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// Records the transcript instead of drawing it; starts hidden.
#[derive(Debug, Default)]
pub struct MemoryDisplay {
    messages: Mutex<Vec<Message>>,
    visible: Mutex<bool>,
}

impl MemoryDisplay {
    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

impl DisplaySurface for MemoryDisplay {
    fn add_message(&self, message: Message) {
        self.messages
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(message);
    }

    fn is_visible(&self) -> bool {
        *self.visible.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn show(&self) {
        *self.visible.lock().unwrap_or_else(|p| p.into_inner()) = true;
    }
}
