//! Tests for [`ContentGenerator`]: prompt delivery, queueing and parsing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use examforge::assistant::AssistantClient;
use examforge::generator::ContentGenerator;
use examforge::queue::{QueueConfig, RequestQueue};
use examforge::{Domain, ForgeError, GenerationRequest, Level, Result, TrainingType};
use tokio::sync::Mutex;

/// Records every prompt it receives and answers with a fixed reply.
struct RecordingAssistant {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl RecordingAssistant {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl AssistantClient for RecordingAssistant {
    fn name(&self) -> &str {
        "recording"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().await.push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

fn generator(assistant: Arc<dyn AssistantClient>) -> ContentGenerator {
    let queue = RequestQueue::new(&QueueConfig::new().drain_delay(Duration::ZERO));
    ContentGenerator::new(assistant, Arc::new(queue))
}

#[tokio::test]
async fn prompt_carries_request_parameters() {
    let assistant = RecordingAssistant::new(r#"{"questions":[{"statement":"x","answer":true}]}"#);
    let generator = generator(assistant.clone());

    let request = GenerationRequest::new(
        TrainingType::VraiFaux,
        Level::Avance,
        Domain::PouvoirsDePoliceDuMaire,
    );
    generator.generate(&request).await.unwrap();

    let prompts = assistant.prompts.lock().await;
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("avancé"));
    assert!(prompts[0].contains("pouvoirs de police du maire"));
    assert!(prompts[0].contains("vrai ou faux"));
}

#[tokio::test]
async fn fenced_reply_with_prose_is_parsed() {
    let reply = "Bien sûr ! Voici le contenu :\n```json\n{\"title\":\"Q\",\"questions\":[{\"question\":\"a\"},{\"question\":\"b\"}]}\n```\nBon courage.";
    let generator = generator(RecordingAssistant::new(reply));

    let content = generator
        .generate(&GenerationRequest::new(
            TrainingType::QuestionsOuvertes,
            Level::Debutant,
            Domain::LibertesPubliques,
        ))
        .await
        .unwrap();

    assert_eq!(content.item_count(TrainingType::QuestionsOuvertes), Some(2));
    assert_eq!(content.as_value()["title"], "Q");
}

#[tokio::test]
async fn reply_without_json_is_malformed() {
    let generator = generator(RecordingAssistant::new("Je ne peux pas."));

    let err = generator
        .generate(&GenerationRequest::new(
            TrainingType::Qcm,
            Level::Debutant,
            Domain::DroitPenal,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::MalformedContent(_)));
}

#[tokio::test]
async fn wrong_shape_for_training_type_is_rejected() {
    // A quiz answer to a case-study request lacks "steps".
    let generator = generator(RecordingAssistant::new(r#"{"questions":[{"question":"a"}]}"#));

    let err = generator
        .generate(&GenerationRequest::new(
            TrainingType::CasPratique,
            Level::Debutant,
            Domain::CodeDeLaRoute,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::MissingField { field: "steps" }));
}

#[tokio::test]
async fn closed_queue_surfaces_as_error() {
    let generator = generator(RecordingAssistant::new("{}"));
    generator.queue().close();

    let err = generator
        .generate(&GenerationRequest::new(
            TrainingType::Qcm,
            Level::Debutant,
            Domain::Deontologie,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::QueueClosed));
}
