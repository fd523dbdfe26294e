use async_trait::async_trait;
use mascot_core::error::CompletionError;
use mascot_core::types::{GrammarCheckResult, Message};

/// Outbound calls to the language-model service.
///
/// Implementations must be initialized with a non-blank key before any request;
/// a request made before that fails with [`CompletionError::NotInitialized`]
/// without touching the network. Re-initializing replaces the held key.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    fn initialize(&self, api_key: &str) -> Result<(), CompletionError>;

    /// Persona reply, already display-converted.
    async fn request_freeform_reply(&self, user_text: &str) -> Result<String, CompletionError>;

    /// Structured grammar check with display-converted free-text fields.
    async fn request_grammar_check(
        &self,
        user_text: &str,
    ) -> Result<GrammarCheckResult, CompletionError>;
}

/// The chat bubble (or any other transcript view).
pub trait DisplaySurface: Send + Sync {
    fn add_message(&self, message: Message);
    fn is_visible(&self) -> bool;
    fn show(&self);
}

/// Read-only view of the persisted API key. An empty string means "not configured".
pub trait CredentialStore: Send + Sync {
    fn api_key(&self) -> String;
}
