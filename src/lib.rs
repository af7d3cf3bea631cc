//! moodlog - Encrypted mood journal for the terminal
//!
//! Entries carry a mood rating, tags and free text, are written by typing or
//! dictation, and live in one password-encrypted file per user. Journals can
//! be searched, edited and exported to Markdown or PDF.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::JournalError;
