//! Audio payloads sent to the speech service

use super::TranscriptionError;
use base64::Engine;
use std::fmt;
use std::fs;
use std::path::Path;

/// Supported audio MIME types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioMimeType {
    Flac,
    Wav,
    Mp3,
    Ogg,
    Webm,
    Mp4,
}

impl AudioMimeType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Flac => "audio/flac",
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mp3",
            Self::Ogg => "audio/ogg",
            Self::Webm => "audio/webm",
            Self::Mp4 => "audio/mp4",
        }
    }

    /// Guess the type from a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "flac" => Some(Self::Flac),
            "wav" => Some(Self::Wav),
            "mp3" => Some(Self::Mp3),
            "ogg" | "oga" | "opus" => Some(Self::Ogg),
            "webm" => Some(Self::Webm),
            "m4a" | "mp4" => Some(Self::Mp4),
            _ => None,
        }
    }
}

impl fmt::Display for AudioMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw audio bytes together with their MIME type
#[derive(Debug, Clone)]
pub struct AudioData {
    data: Vec<u8>,
    mime_type: AudioMimeType,
}

impl AudioData {
    pub fn new(data: Vec<u8>, mime_type: AudioMimeType) -> Self {
        Self { data, mime_type }
    }

    /// Read an audio file, picking the MIME type from its extension
    pub fn from_file(path: &Path) -> Result<Self, TranscriptionError> {
        let mime_type = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(AudioMimeType::from_extension)
            .ok_or_else(|| TranscriptionError::UnsupportedAudio(path.display().to_string()))?;

        let data = fs::read(path)
            .map_err(|e| TranscriptionError::AudioRead(format!("{}: {}", path.display(), e)))?;
        if data.is_empty() {
            return Err(TranscriptionError::AudioRead(format!(
                "{}: file is empty",
                path.display()
            )));
        }

        Ok(Self { data, mime_type })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn mime_type(&self) -> AudioMimeType {
        self.mime_type
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(AudioMimeType::from_extension("FLAC"), Some(AudioMimeType::Flac));
        assert_eq!(AudioMimeType::from_extension("m4a"), Some(AudioMimeType::Mp4));
        assert_eq!(AudioMimeType::from_extension("opus"), Some(AudioMimeType::Ogg));
        assert_eq!(AudioMimeType::from_extension("txt"), None);
    }

    #[test]
    fn test_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("note.wav");
        fs::write(&path, [1u8, 2, 3]).unwrap();

        let audio = AudioData::from_file(&path).unwrap();
        assert_eq!(audio.mime_type(), AudioMimeType::Wav);
        assert_eq!(audio.size_bytes(), 3);
        assert_eq!(audio.to_base64(), "AQID");
    }

    #[test]
    fn test_from_file_errors() {
        let temp = TempDir::new().unwrap();

        let unknown = temp.path().join("note.txt");
        fs::write(&unknown, b"x").unwrap();
        assert!(matches!(
            AudioData::from_file(&unknown),
            Err(TranscriptionError::UnsupportedAudio(_))
        ));

        let empty = temp.path().join("empty.mp3");
        fs::write(&empty, b"").unwrap();
        assert!(matches!(
            AudioData::from_file(&empty),
            Err(TranscriptionError::AudioRead(_))
        ));

        assert!(matches!(
            AudioData::from_file(&temp.path().join("missing.flac")),
            Err(TranscriptionError::AudioRead(_))
        ));
    }
}
