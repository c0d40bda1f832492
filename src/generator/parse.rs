//! Extraction of a JSON document from free-form model output.
//!
//! The assistant is asked for pure JSON but may wrap it in a Markdown code
//! fence or surround it with prose. Extraction strips fences, slices from the
//! first `{` to the last `}` and parses the slice. There is no partial
//! recovery: anything that does not parse is `MalformedContent`.

use serde_json::Value;

use crate::types::{GeneratedContent, TrainingType};
use crate::{ForgeError, Result};

/// Remove a leading ```` ``` ```` / ```` ```json ```` line and a trailing fence.
fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        // Drop the info string ("json", "JSON", ...) up to the end of the line.
        text = match rest.find('\n') {
            Some(pos) => &rest[pos + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Parse model output into a JSON object.
pub fn extract_json(raw: &str) -> Result<Value> {
    let text = strip_code_fence(raw);

    let start = text
        .find('{')
        .ok_or_else(|| ForgeError::MalformedContent("no JSON object found".to_string()))?;
    let end = text
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| ForgeError::MalformedContent("unterminated JSON object".to_string()))?;

    serde_json::from_str(&text[start..=end]).map_err(|e| ForgeError::MalformedContent(e.to_string()))
}

/// Parse and validate model output for a training type.
pub fn parse_content(raw: &str, training_type: TrainingType) -> Result<GeneratedContent> {
    let content = GeneratedContent::new(extract_json(raw)?);
    content.validate(training_type)?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_json() {
        let v = extract_json(r#"{"questions":[1]}"#).unwrap();
        assert_eq!(v["questions"][0], 1);
    }

    #[test]
    fn fenced_json() {
        let raw = "```json\n{\"questions\": [\"a\"]}\n```";
        let v = extract_json(raw).unwrap();
        assert_eq!(v["questions"][0], "a");
    }

    #[test]
    fn bare_fence_without_info_string() {
        let raw = "```\n{\"steps\": [1, 2]}\n```\n";
        let v = extract_json(raw).unwrap();
        assert_eq!(v["steps"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn surrounding_prose_is_ignored() {
        let raw = "Voici le questionnaire :\n{\"questions\": [{\"q\": \"x\"}]}\nBon courage !";
        let v = extract_json(raw).unwrap();
        assert_eq!(v["questions"][0]["q"], "x");
    }

    #[test]
    fn nested_braces_use_last_closing_brace() {
        let raw = r#"note {"a": {"b": {"c": 1}}} end"#;
        let v = extract_json(raw).unwrap();
        assert_eq!(v["a"]["b"]["c"], 1);
    }

    #[test]
    fn no_object_is_malformed() {
        assert!(matches!(
            extract_json("Désolé, je ne peux pas."),
            Err(ForgeError::MalformedContent(_))
        ));
        assert!(matches!(
            extract_json("} backwards {"),
            Err(ForgeError::MalformedContent(_))
        ));
    }

    #[test]
    fn invalid_json_is_malformed() {
        assert!(matches!(
            extract_json("{\"questions\": [1, 2,]}"),
            Err(ForgeError::MalformedContent(_))
        ));
    }

    #[test]
    fn parse_content_validates_required_field() {
        let ok = parse_content(r#"{"steps":[{"step":1}]}"#, TrainingType::CasPratique);
        assert!(ok.is_ok());

        let missing = parse_content(r#"{"questions":[1]}"#, TrainingType::CasPratique);
        assert!(matches!(
            missing,
            Err(ForgeError::MissingField { field: "steps" })
        ));
    }
}
