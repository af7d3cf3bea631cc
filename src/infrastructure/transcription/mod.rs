//! Speech-to-text port and adapters

pub mod audio;
pub mod gemini;
#[cfg(feature = "microphone")]
pub mod microphone;

pub use audio::{AudioData, AudioMimeType};
pub use gemini::GeminiTranscriber;

use thiserror::Error;

/// Transcription and audio capture errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TranscriptionError {
    #[error("no API key configured for the speech service")]
    MissingApiKey,

    #[error("invalid API key")]
    InvalidApiKey,

    #[error("rate limit exceeded, please try again later")]
    RateLimited,

    #[error("no speech detected")]
    NoSpeech,

    #[error("voice entry cancelled")]
    Cancelled,

    #[error("could not reach the speech service: {0}")]
    RequestFailed(String),

    #[error("unexpected response from the speech service: {0}")]
    ParseError(String),

    #[error("speech service error: {0}")]
    ApiError(String),

    #[error("unsupported audio file: {0}")]
    UnsupportedAudio(String),

    #[error("cannot read audio file: {0}")]
    AudioRead(String),

    #[error("no audio input device available")]
    NoAudioDevice,

    #[error("recording failed: {0}")]
    Recording(String),

    #[error("this build has no microphone support (enable the `microphone` feature)")]
    MicrophoneUnavailable,
}

/// Port for speech recognition
pub trait Transcriber {
    /// Turn recorded speech into text. Blocks until the service answers.
    fn transcribe(&self, audio: &AudioData) -> Result<String, TranscriptionError>;
}
