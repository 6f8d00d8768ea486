// Confession domain: models, lifecycle policy and emoji sanitizing.

pub mod emoji;
pub mod models;
pub mod policy;

pub use models::{
    AdminFilter, AdminSettings, Comment, Confession, ConfessionDraft, ConfessionStatus, PostType,
    Tone,
};
