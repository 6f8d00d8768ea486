// Upstream AI provider: shared HTTP client and request pacing.

pub mod client;
pub mod rate_limiter;

pub use client::{GeminiClient, GeminiError, GenerationConfig};
