//! Completion response handling: envelope, fence stripping, schema check.

use serde::Deserialize;

use crate::error::SynthError;
use crate::record::DossierBody;
use crate::Result;

const FENCE: &str = "```";

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Pull `choices[0].message.content` out of a chat-completions body, trimmed.
pub fn message_content(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body).map_err(|e| {
        SynthError::MalformedResponse(format!("response body is not a chat completion: {e}"))
    })?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| {
            SynthError::MalformedResponse("response has no choices[0].message.content".to_string())
        })
}

/// Remove a markdown fence wrapper.
///
/// When the trimmed content starts with a fence marker the first and last
/// lines are dropped; anything else is returned trimmed and unchanged.
pub fn strip_fence(content: &str) -> String {
    let trimmed = content.trim();
    if !trimmed.starts_with(FENCE) {
        return trimmed.to_string();
    }
    let lines: Vec<&str> = trimmed.split('\n').collect();
    if lines.len() <= 2 {
        return String::new();
    }
    lines[1..lines.len() - 1].join("\n")
}

/// Parse model output into a schema-checked [`DossierBody`].
pub fn parse_dossier(content: &str) -> Result<DossierBody> {
    let stripped = strip_fence(content);

    let value: serde_json::Value = serde_json::from_str(&stripped).map_err(|e| {
        SynthError::MalformedResponse(format!("model output is not valid JSON: {e}"))
    })?;
    if !value.is_object() {
        return Err(SynthError::MalformedResponse(
            "model output is not a JSON object".to_string(),
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| SynthError::MalformedResponse(format!("dossier schema violation: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fence_json_block() {
        let content = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_fence(content), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_fence_bare_block_multiline() {
        let content = "  ```\n{\n  \"a\": 1\n}\n```  \n";
        assert_eq!(strip_fence(content), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_unfenced_content_untouched() {
        assert_eq!(strip_fence("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_fence_only_is_empty() {
        assert_eq!(strip_fence("```"), "");
        assert_eq!(strip_fence("```json\n```"), "");
    }

    #[test]
    fn test_message_content_extracts_first_choice() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": "  hi \n"}}, {"message": {"content": "no"}}]}"#;
        assert_eq!(message_content(body).unwrap(), "hi");
    }

    #[test]
    fn test_message_content_without_choices_is_malformed() {
        let err = message_content(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, SynthError::MalformedResponse(_)));

        let err = message_content("<html>oops</html>").unwrap_err();
        assert!(matches!(err, SynthError::MalformedResponse(_)));

        let err = message_content(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap_err();
        assert!(matches!(err, SynthError::MalformedResponse(_)));
    }

    #[test]
    fn test_non_object_is_malformed() {
        let err = parse_dossier("[1, 2, 3]").unwrap_err();
        assert!(err.to_string().contains("not a JSON object"));
    }

    #[test]
    fn test_prose_is_malformed() {
        let err = parse_dossier("Sure! Here is your dossier.").unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }
}
