// Tone rewriting: AI paraphrase of a draft into a chosen register.

pub mod gemini;
pub mod rewriter;
pub mod traits;

pub use rewriter::{error_placeholder, ToneRewriter, DEFAULT_REWRITE_TIMEOUT};
pub use traits::{DisabledToneModel, ToneError, ToneModel};
