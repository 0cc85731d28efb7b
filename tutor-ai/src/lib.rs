//! Generative AI abstraction layer for the tutoring workflows.
//!
//! This crate provides trait-based abstractions for the AI services the
//! session assistant delegates to:
//! - Single-turn text generation (suggestions, summaries, tutor chat)
//! - Image annotation (labels, objects, text found in a picture)
//! - Diarized speech-to-text output shaping
//!
//! It also owns the rate-limit aware retry loop used around every generation
//! call, so each provider only has to classify its own failures.

pub mod error;
pub mod retry;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::Error;
pub use retry::{generate_with_retry, DEFAULT_MAX_ATTEMPTS};
