// Content moderation: trait-based abstraction over the external classifier.
//
// ModerationClassifier is the fallible seam (GeminiClassifier in production,
// fakes in tests). ModerationClient wraps it with a timeout and the B2
// fail-safe so callers never see an error.

pub mod client;
pub mod gemini;
pub mod traits;

pub use client::{ModerationClient, DEFAULT_MODERATION_TIMEOUT};
pub use traits::{
    DisabledClassifier, Grade, ModerationClassifier, ModerationError, ModerationResult, RawVerdict,
};
