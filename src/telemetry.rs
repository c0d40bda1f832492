//! Telemetry metric name constants.
//!
//! Centralised metric names for examforge operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `examforge_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `training_type` — e.g. "qcm", "cas_pratique"
//! - `source` — content provenance: "ai", "cache" or "fallback"
//! - `step` — thread protocol step (e.g. "create_thread", "poll")
//! - `status` — outcome: "ok" or "error"

/// Total generation requests answered by the training content service.
///
/// Labels: `training_type`, `source` ("ai" | "cache" | "fallback").
pub const GENERATIONS_TOTAL: &str = "examforge_generations_total";

/// Total cache hits.
pub const CACHE_HITS_TOTAL: &str = "examforge_cache_hits_total";

/// Total cache misses, including lazily evicted expired entries.
pub const CACHE_MISSES_TOTAL: &str = "examforge_cache_misses_total";

/// Total retry attempts (not counting the initial attempt).
///
/// Labels: `assistant`.
pub const RETRIES_TOTAL: &str = "examforge_retries_total";

/// Time spent waiting for a request queue slot, in seconds.
pub const QUEUE_WAIT_SECONDS: &str = "examforge_queue_wait_seconds";

/// Duration of one full thread protocol attempt, in seconds.
///
/// Labels: `status` ("ok" | "error").
pub const ASSISTANT_ATTEMPT_DURATION_SECONDS: &str = "examforge_assistant_attempt_duration_seconds";

/// Total upstream HTTP calls to the assistant API.
///
/// Labels: `step`, `status` ("ok" | "error").
pub const UPSTREAM_CALLS_TOTAL: &str = "examforge_upstream_calls_total";
