pub mod config;
pub mod document;

pub use config::Config;
pub use document::{word_count, Document};
