pub mod admin;
pub mod confessions;
pub mod feed;
pub mod tone;
