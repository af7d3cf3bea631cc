//! Infrastructure layer - External I/O and persistence

pub mod config;
pub mod crypto;
pub mod render;
pub mod store;
pub mod transcription;

pub use config::Config;
pub use store::{EntryStore, FileEntryStore};
