//! Error types for moodlog

use crate::infrastructure::transcription::TranscriptionError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for moodlog
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("User already exists: {0}")]
    UserExists(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid username: '{0}'")]
    InvalidUsername(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Mood rating must be between 1 and 10, got {0}")]
    InvalidMoodRating(i64),

    #[error("Entry not found: #{0}")]
    EntryNotFound(usize),

    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    #[error("Transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Cannot create data directory {path}: {source}")]
    DataDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl JournalError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            JournalError::Authentication(_) => 2,
            JournalError::UserNotFound(_) | JournalError::EntryNotFound(_) => 3,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            JournalError::Authentication(_) => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Check the password (it is case-sensitive)\n\
                    • If the journal file was damaged, restore the newest\n  \
                    journal_<user>.<timestamp>.bak file over journal_<user>.enc",
                    self
                )
            }
            JournalError::UserNotFound(user) => {
                format!(
                    "User not found: '{}'\n\n\
                    Suggestions:\n\
                    • Choose 'Create account' to start a new journal\n\
                    • Check --data-dir or MOODLOG_DIR points at your journal directory",
                    user
                )
            }
            JournalError::InvalidUsername(name) => {
                format!(
                    "Invalid username: '{}'\n\n\
                    Usernames are 1-32 characters of letters, digits, '-' and '_'",
                    name
                )
            }
            JournalError::InvalidDate(input) => {
                format!(
                    "Invalid date: '{}'\n\n\
                    Expected format: YYYY-MM-DD\n\
                    Example: 2025-01-17",
                    input
                )
            }
            JournalError::InvalidQuery(msg) => {
                format!(
                    "Invalid search query: {}\n\n\
                    Examples:\n\
                    • work\n\
                    • work AND NOT meeting\n\
                    • family OR friends",
                    msg
                )
            }
            JournalError::Transcription(TranscriptionError::MissingApiKey) => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Set GEMINI_API_KEY in your environment\n\
                    • Or add api_key under [transcription] in moodlog.toml",
                    self
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using JournalError
pub type Result<T> = std::result::Result<T, JournalError>;
