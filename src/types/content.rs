//! Generated content and provenance metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::training::{Domain, GenerationRequest, Level, TrainingType};
use crate::{ForgeError, Result};

/// A generated exercise document.
///
/// The shape depends on the training type; the only structural guarantee is
/// the non-empty required array checked by [`validate`](Self::validate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratedContent(Value);

impl GeneratedContent {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Number of items in the training type's required array, if present.
    pub fn item_count(&self, training_type: TrainingType) -> Option<usize> {
        self.0
            .get(training_type.required_field())
            .and_then(Value::as_array)
            .map(Vec::len)
    }

    /// Check that the required field exists and is a non-empty array.
    pub fn validate(&self, training_type: TrainingType) -> Result<()> {
        match self.item_count(training_type) {
            Some(n) if n > 0 => Ok(()),
            _ => Err(ForgeError::MissingField {
                field: training_type.required_field(),
            }),
        }
    }
}

/// Where the content of a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    /// Freshly generated by the assistant
    Ai,
    /// Served from the in-memory cache
    Cache,
    /// Static template substituted after a generation failure
    Fallback,
}

impl ContentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentSource::Ai => "ai",
            ContentSource::Cache => "cache",
            ContentSource::Fallback => "fallback",
        }
    }
}

/// Outcome flag exposed alongside the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GenerationStatus {
    Ok,
    Error,
}

/// Provenance attached to every response, whatever its origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    pub id: String,
    pub source: ContentSource,
    pub training_type: TrainingType,
    pub level: Level,
    pub domain: Domain,
    pub created_at: DateTime<Utc>,
    pub status: GenerationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SessionMetadata {
    pub(crate) fn for_request(request: &GenerationRequest, source: ContentSource) -> Self {
        Self {
            id: request.session_id().to_owned(),
            source,
            training_type: request.training_type(),
            level: request.level(),
            domain: request.domain(),
            created_at: Utc::now(),
            status: GenerationStatus::Ok,
            error: None,
        }
    }

    pub(crate) fn failed(request: &GenerationRequest, error: &ForgeError) -> Self {
        Self {
            status: GenerationStatus::Error,
            error: Some(error.to_string()),
            ..Self::for_request(request, ContentSource::Fallback)
        }
    }
}

/// Content plus its metadata, as returned by the training content service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationOutcome {
    pub content: GeneratedContent,
    pub meta: SessionMetadata,
}

impl GenerationOutcome {
    pub fn source(&self) -> ContentSource {
        self.meta.source
    }

    pub fn session_id(&self) -> &str {
        &self.meta.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.meta.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validate_accepts_non_empty_required_array() {
        let content = GeneratedContent::new(json!({ "questions": [{ "q": 1 }] }));
        assert!(content.validate(TrainingType::Qcm).is_ok());
        assert_eq!(content.item_count(TrainingType::Qcm), Some(1));
    }

    #[test]
    fn validate_rejects_empty_or_missing_array() {
        let empty = GeneratedContent::new(json!({ "questions": [] }));
        assert!(matches!(
            empty.validate(TrainingType::VraiFaux),
            Err(ForgeError::MissingField { field: "questions" })
        ));

        let wrong_field = GeneratedContent::new(json!({ "questions": [1, 2] }));
        assert!(matches!(
            wrong_field.validate(TrainingType::CasPratique),
            Err(ForgeError::MissingField { field: "steps" })
        ));

        let not_array = GeneratedContent::new(json!({ "steps": "first do this" }));
        assert!(not_array.validate(TrainingType::CasPratique).is_err());
    }

    #[test]
    fn metadata_serializes_camel_case() {
        let request = GenerationRequest::new(
            TrainingType::VraiFaux,
            Level::Avance,
            Domain::LibertesPubliques,
        )
        .with_session_id("s-1");
        let meta = SessionMetadata::for_request(&request, ContentSource::Cache);
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value["id"], "s-1");
        assert_eq!(value["source"], "cache");
        assert_eq!(value["trainingType"], "vrai_faux");
        assert_eq!(value["status"], "OK");
        assert!(value.get("error").is_none());
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn failed_metadata_carries_error() {
        let request =
            GenerationRequest::new(TrainingType::Qcm, Level::Debutant, Domain::Deontologie);
        let meta = SessionMetadata::failed(&request, &ForgeError::MalformedContent("x".into()));
        assert_eq!(meta.source, ContentSource::Fallback);
        assert_eq!(meta.status, GenerationStatus::Error);
        assert!(meta.error.unwrap().contains("malformed"));
    }
}
