//! Public types for the examforge API.

mod content;
mod training;

pub use content::{
    ContentSource, GeneratedContent, GenerationOutcome, GenerationStatus, SessionMetadata,
};
pub use training::{Domain, GenerationRequest, Level, TrainingType};
