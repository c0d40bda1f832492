//! Training content service: cache, generation and fallback orchestration.
//!
//! Per request:
//!
//! ```text
//! Requested -> CacheCheck -> CacheHit -> Done
//!                         -> CacheMiss -> Generating -> Success -> Cached -> Done
//!                                                    -> Failure -> FallbackSynthesis -> Done
//! ```
//!
//! Only configuration errors are returned to the caller. Every other
//! failure (network, retries exhausted, malformed or incomplete content) is
//! absorbed into a fallback exercise whose metadata says `source: fallback`
//! and `status: ERROR`. Fallback content is never cached.

mod builder;
pub mod fallback;

use std::time::Duration;

use tracing::{info, warn};

use crate::Result;
use crate::cache::{CacheConfig, ContentCache};
use crate::generator::ContentGenerator;
use crate::queue::RequestQueue;
use crate::telemetry;
use crate::types::{
    ContentSource, GeneratedContent, GenerationOutcome, GenerationRequest, SessionMetadata,
};

pub use builder::{ExamForge, ServiceBuilder};
pub use fallback::fallback_content;

/// Orchestrates cache lookups, generation and fallback. See module docs.
///
/// Constructed explicitly (see [`ExamForge::builder`]) and shared by
/// reference; independent instances have independent caches and queues.
pub struct TrainingContentService {
    cache: ContentCache,
    cache_ttl: Duration,
    generator: ContentGenerator,
}

impl TrainingContentService {
    pub fn new(generator: ContentGenerator, cache_config: &CacheConfig) -> Self {
        Self {
            cache: ContentCache::new(cache_config),
            cache_ttl: cache_config.ttl,
            generator,
        }
    }

    /// Produce content for `request`, from cache, the assistant, or fallback.
    pub async fn generate_content(&self, request: &GenerationRequest) -> Result<GenerationOutcome> {
        self.generator.preflight()?;

        let key = request.cache_key();
        if let Some(content) = self.cache.get(&key).await {
            return Ok(self.finish(request, content, ContentSource::Cache));
        }

        match self.generator.generate(request).await {
            Ok(content) => {
                self.cache.set(&key, content.clone(), self.cache_ttl).await;
                info!(
                    key,
                    session_id = request.session_id(),
                    items = content.item_count(request.training_type()),
                    "generated content cached"
                );
                Ok(self.finish(request, content, ContentSource::Ai))
            }
            Err(e) if e.is_configuration() => Err(e),
            Err(e) => {
                warn!(
                    key,
                    session_id = request.session_id(),
                    error = %e,
                    "generation failed, serving fallback content"
                );
                record(request, ContentSource::Fallback);
                Ok(GenerationOutcome {
                    content: fallback_content(request),
                    meta: SessionMetadata::failed(request, &e),
                })
            }
        }
    }

    fn finish(
        &self,
        request: &GenerationRequest,
        content: GeneratedContent,
        source: ContentSource,
    ) -> GenerationOutcome {
        record(request, source);
        GenerationOutcome {
            content,
            meta: SessionMetadata::for_request(request, source),
        }
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    pub fn queue(&self) -> &RequestQueue {
        self.generator.queue()
    }
}

fn record(request: &GenerationRequest, source: ContentSource) {
    metrics::counter!(telemetry::GENERATIONS_TOTAL,
        "training_type" => request.training_type().as_str(),
        "source" => source.as_str(),
    )
    .increment(1);
}
