use thiserror::Error;

/// Every way a remote completion can fail.
///
/// Clients map all transport and decoding problems into one of these before
/// returning; nothing escapes unclassified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    #[error("completion client is not initialized")]
    NotInitialized,

    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    #[error("request failed{}: {message}", status_suffix(.status))]
    NetworkOrService {
        status: Option<u16>,
        message: String,
    },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl CompletionError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkOrService {
            status: None,
            message: message.into(),
        }
    }

    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self::NetworkOrService {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Stable label for logs and IPC payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotInitialized => "not_initialized",
            Self::InvalidCredential(_) => "invalid_credential",
            Self::NetworkOrService { .. } => "network_or_service",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}
