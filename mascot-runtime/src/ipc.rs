use mascot_core::types::Message;
use mascot_engine::session::SubmissionReport;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitMessageRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitMessageResponse {
    // `None` when the input was blank and nothing ran.
    pub stage: Option<String>,
    pub messages: Vec<Message>,
    pub forwarded_text: Option<String>,
    pub error: Option<String>,
    #[serde(default)]
    pub error_kind: Option<String>,
}

impl SubmitMessageResponse {
    pub fn ignored() -> Self {
        Self {
            stage: None,
            messages: vec![],
            forwarded_text: None,
            error: None,
            error_kind: None,
        }
    }
}

impl From<SubmissionReport> for SubmitMessageResponse {
    fn from(report: SubmissionReport) -> Self {
        Self {
            stage: Some(report.stage.label().to_string()),
            messages: report.messages,
            forwarded_text: report.forwarded_text,
            error_kind: report.error.as_ref().map(|e| e.kind().to_string()),
            error: report.error.map(|e| e.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveMascotPositionRequest {
    pub x: i32,
    pub y: i32,
}
