use anyhow::{Context, bail};
use log::warn;
use mascot_engine::traits::CredentialStore;

/// Keyring service name. Renaming it orphans every stored key.
const SERVICE: &str = "desktop-mascot";
const API_KEY_ACCOUNT: &str = "llm_api_key";

/// The chat endpoint's API key, kept in the OS keyring.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyringCredentialStore;

impl KeyringCredentialStore {
    fn entry() -> anyhow::Result<keyring::Entry> {
        keyring::Entry::new(SERVICE, API_KEY_ACCOUNT).context("open keyring entry")
    }

    /// `Ok(None)` when no key was ever saved.
    pub fn read(&self) -> anyhow::Result<Option<String>> {
        match Self::entry()?.get_password() {
            Ok(key) => Ok(Some(key)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("read API key"),
        }
    }

    pub fn store(&self, api_key: &str) -> anyhow::Result<()> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            bail!("API key is required");
        }
        Self::entry()?
            .set_password(api_key)
            .context("save API key")
    }

    /// Clearing an absent key is not an error.
    pub fn clear(&self) -> anyhow::Result<()> {
        match Self::entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("delete API key"),
        }
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn api_key(&self) -> String {
        match self.read() {
            Ok(key) => key.unwrap_or_default(),
            Err(e) => {
                // Reported to the user as "not configured" by the conversation.
                warn!("failed to read API key from keyring: {e:#}");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tests never reach the real keyring.
    #[test]
    fn blank_key_is_rejected_before_keyring_access() {
        let err = KeyringCredentialStore.store(" \t ").unwrap_err();
        assert_eq!(err.to_string(), "API key is required");
    }
}
