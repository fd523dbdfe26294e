use crate::types::ConversationMode;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MascotPosition {
    pub x: i32,
    pub y: i32,
}

impl Default for MascotPosition {
    fn default() -> Self {
        Self { x: 100, y: 100 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mascot_size: f64,
    pub mascot_position: MascotPosition,
    pub always_on_top: bool,

    pub llm_base_url: String,
    pub llm_model: String,
    pub conversation_mode: ConversationMode,

    // Secrets are stored outside this struct at rest.
    pub llm_api_key_present: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mascot_size: 1.0,
            mascot_position: MascotPosition::default(),
            always_on_top: true,
            llm_base_url: DEFAULT_LLM_BASE_URL.into(),
            llm_model: DEFAULT_LLM_MODEL.into(),
            conversation_mode: ConversationMode::default(),
            llm_api_key_present: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: AppConfig = serde_json::from_str(r#"{"always_on_top": false}"#).unwrap();
        assert!(!cfg.always_on_top);
        assert_eq!(cfg.mascot_size, 1.0);
        assert_eq!(cfg.mascot_position, MascotPosition { x: 100, y: 100 });
        assert_eq!(cfg.conversation_mode, ConversationMode::GrammarTutor);
        assert_eq!(cfg.llm_model, DEFAULT_LLM_MODEL);
    }
}
