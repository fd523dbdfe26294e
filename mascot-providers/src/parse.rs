use anyhow::Context;
use mascot_core::text::strip_code_fence;
use mascot_core::types::GrammarCheckResult;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

/// Extract the first choice's content.
///
/// Errors only when the body is not a chat-completion object; a well-formed
/// response without usable content yields `Ok(None)`.
pub fn parse_openai_chat_completion(body: &[u8]) -> anyhow::Result<Option<String>> {
    let resp: OpenAiChatResponse = serde_json::from_slice(body).context("decode chat JSON")?;
    Ok(resp
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|s| !s.trim().is_empty()))
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorEnvelope {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: Option<String>,
}

/// Upstream `error.message` from a non-2xx body, if the service sent one.
pub fn parse_openai_error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<OpenAiErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error.message)
        .filter(|m| !m.trim().is_empty())
}

#[derive(Debug, Deserialize)]
struct GrammarCheckWire {
    is_correct: bool,
    is_question: bool,
    corrected_sentence: String,
    comment: String,
}

/// Decode the tutor's JSON reply. Fields are returned raw (not display-converted).
pub fn parse_grammar_check(content: &str) -> anyhow::Result<GrammarCheckResult> {
    let wire: GrammarCheckWire =
        serde_json::from_str(strip_code_fence(content)).context("decode grammar check JSON")?;
    Ok(GrammarCheckResult {
        is_correct: wire.is_correct,
        is_question: wire.is_question,
        corrected_sentence: wire.corrected_sentence,
        comment: wire.comment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_openai_chat_content() {
        let body = br#"{"choices":[{"message":{"content":"hi"}}]}"#;
        assert_eq!(
            parse_openai_chat_completion(body).unwrap().as_deref(),
            Some("hi")
        );
    }

    #[test]
    fn missing_or_blank_content_is_none() {
        let body = br#"{"choices":[{"message":{}}]}"#;
        assert_eq!(parse_openai_chat_completion(body).unwrap(), None);

        let body = br#"{"choices":[{"message":{"content":"  "}}]}"#;
        assert_eq!(parse_openai_chat_completion(body).unwrap(), None);

        let body = br#"{"choices":[]}"#;
        assert_eq!(parse_openai_chat_completion(body).unwrap(), None);
    }

    #[test]
    fn non_chat_body_errors() {
        assert!(parse_openai_chat_completion(b"<html>oops</html>").is_err());
        assert!(parse_openai_chat_completion(br#"{"id":"x"}"#).is_err());
    }

    #[test]
    fn extracts_upstream_error_message() {
        let body = br#"{"error":{"message":"Invalid API key","type":"invalid_request_error"}}"#;
        assert_eq!(
            parse_openai_error_message(body).as_deref(),
            Some("Invalid API key")
        );
        assert_eq!(parse_openai_error_message(b"bad gateway"), None);
    }

    #[test]
    fn parses_grammar_check_object() {
        let content = r#"{"is_correct": false, "is_question": false,
            "corrected_sentence": "I went to the store yesterday.",
            "comment": "Changed 'goes' to 'went' for past tense."}"#;
        let r = parse_grammar_check(content).unwrap();
        assert!(!r.is_correct);
        assert!(!r.is_question);
        assert_eq!(r.corrected_sentence, "I went to the store yesterday.");
    }

    #[test]
    fn parses_fenced_grammar_check_object() {
        let content = "```json\n{\"is_correct\": true, \"is_question\": true, \"corrected_sentence\": \"Is it?\", \"comment\": \"Great!\"}\n```";
        let r = parse_grammar_check(content).unwrap();
        assert!(r.is_correct);
        assert!(r.is_question);
    }

    #[test]
    fn grammar_check_with_missing_key_or_wrong_type_errors() {
        assert!(parse_grammar_check(r#"{"is_correct": true, "comment": "ok"}"#).is_err());
        assert!(
            parse_grammar_check(
                r#"{"is_correct": "yes", "is_question": false, "corrected_sentence": "", "comment": ""}"#
            )
            .is_err()
        );
        assert!(parse_grammar_check("Your sentence is correct!").is_err());
    }
}
