//! Caching subsystem.
//!
//! [`ContentCache`] stores the last successful generation per
//! (training type, level, domain) key with a per-entry TTL and a bounded
//! capacity. See [`content`] module docs.

pub mod content;

pub use content::{CacheConfig, ContentCache};
