// WhisperVault: anonymous confessions with AI moderation.
//
// This is the library root. Each module corresponds to a major subsystem
// of the submission → moderation → feed → retention lifecycle.

pub mod clock;
pub mod config;
pub mod confession;
pub mod demo;
pub mod gemini;
pub mod moderation;
pub mod output;
pub mod retention;
pub mod service;
pub mod store;
pub mod tone;

#[cfg(feature = "web")]
pub mod web;
