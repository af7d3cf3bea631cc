//! Capture use cases: turning typed text or speech into entries

use crate::domain::{Entry, EntryDraft};
use crate::error::Result;
use crate::infrastructure::transcription::{AudioData, Transcriber, TranscriptionError};
use chrono::Utc;
use std::path::PathBuf;

/// Where spoken audio comes from
#[derive(Debug, Clone)]
pub enum AudioSource {
    /// An audio file on disk
    File(PathBuf),
    /// Audio already captured, e.g. from the microphone
    Recorded(AudioData),
}

/// Build an entry from typed input, stamped with the current time.
///
/// Inline `#hashtags` in the body are added to the entry's tags.
pub fn capture_text(draft: EntryDraft) -> Result<Entry> {
    Entry::from_draft(draft.with_inline_hashtags(), Utc::now())
}

/// Transcribe spoken audio into entry text.
///
/// Saying only the stop word cancels the entry; an empty transcript is an error,
/// so a voice entry is never created empty.
pub fn capture_voice(
    transcriber: &dyn Transcriber,
    source: AudioSource,
    stop_word: &str,
) -> std::result::Result<String, TranscriptionError> {
    let audio = match source {
        AudioSource::File(path) => AudioData::from_file(&path)?,
        AudioSource::Recorded(audio) => audio,
    };

    let transcript = transcriber.transcribe(&audio)?;
    let transcript = transcript.trim();
    if transcript.is_empty() {
        return Err(TranscriptionError::NoSpeech);
    }

    let spoken = transcript
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .trim();
    if !stop_word.is_empty() && spoken.eq_ignore_ascii_case(stop_word.trim()) {
        tracing::info!("voice entry cancelled by stop word");
        return Err(TranscriptionError::Cancelled);
    }

    Ok(transcript.to_string())
}
