//! examforge - Training-content generation for police exam preparation
//!
//! This crate generates exam-preparation exercises (quizzes, true/false
//! sets, case studies, open questions) through a remote LLM assistant,
//! with an in-memory TTL cache, a bounded-concurrency request queue, retry
//! with exponential backoff, and templated fallback content when generation
//! fails.
//!
//! # Example
//!
//! ```rust,no_run
//! use examforge::{Domain, ExamForge, GenerationRequest, Level, TrainingType};
//!
//! #[tokio::main]
//! async fn main() -> examforge::Result<()> {
//!     // Reads OPENAI_API_KEY and OPENAI_ASSISTANT_ID on every call.
//!     let service = ExamForge::builder().build()?;
//!
//!     let request = GenerationRequest::new(
//!         TrainingType::Qcm,
//!         Level::Debutant,
//!         Domain::DroitAdministratif,
//!     );
//!     let outcome = service.generate_content(&request).await?;
//!
//!     println!("{:?}: {}", outcome.source(), outcome.content.as_value());
//!     Ok(())
//! }
//! ```

pub mod assistant;
pub mod cache;
pub mod error;
pub mod generator;
pub mod queue;
#[cfg(feature = "server")]
pub mod server;
pub mod service;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use error::{ForgeError, Result};
pub use service::{ExamForge, ServiceBuilder, TrainingContentService};

pub use types::{
    ContentSource, Domain, GeneratedContent, GenerationOutcome, GenerationRequest,
    GenerationStatus, Level, SessionMetadata, TrainingType,
};

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
