//! Configuration management

use crate::error::{JournalError, Result};
use crate::infrastructure::crypto::KdfParams;
use crate::infrastructure::store::FileEntryStore;
use crate::infrastructure::transcription::{GeminiTranscriber, TranscriptionError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "moodlog.toml";

const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub transcription: TranscriptionConfig,
    pub voice: VoiceConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Number of backups kept per user (0 keeps all)
    pub backup_retention: usize,
    pub kdf: KdfParams,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            backup_retention: 10,
            kdf: KdfParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        TranscriptionConfig {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            base_url: None,
        }
    }
}

impl TranscriptionConfig {
    /// API key, checking GEMINI_API_KEY before the config file
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var("GEMINI_API_KEY")
            .ok()
            .or_else(|| self.api_key.clone())
            .filter(|key| !key.trim().is_empty())
    }

    /// Build the speech client; fails when no API key is available
    pub fn transcriber(&self) -> std::result::Result<GeminiTranscriber, TranscriptionError> {
        let key = self
            .resolve_api_key()
            .ok_or(TranscriptionError::MissingApiKey)?;
        let transcriber = GeminiTranscriber::new(key, self.model.clone());
        Ok(match &self.base_url {
            Some(url) => transcriber.with_base_url(url.clone()),
            None => transcriber,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Transcript that cancels a voice entry
    pub stop_word: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        VoiceConfig {
            stop_word: "stop".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Export directory; relative paths resolve against the data directory
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Load moodlog.toml from the data directory, falling back to defaults when absent
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(CONFIG_FILE);

        let contents = match fs::read_to_string(&config_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %config_path.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            Err(e) => return Err(JournalError::Io(e)),
        };

        let config: Config = toml::from_str(&contents).map_err(|e| {
            JournalError::Config(format!("Failed to parse {}: {}", CONFIG_FILE, e))
        })?;
        config.store.kdf.validate()?;
        Ok(config)
    }

    /// Encrypted store rooted at the data directory
    pub fn entry_store(&self, data_dir: &Path) -> FileEntryStore {
        FileEntryStore::new(data_dir.to_path_buf())
            .with_kdf(self.store.kdf)
            .with_backup_retention(self.store.backup_retention)
    }

    /// Directory exports are written to
    pub fn export_dir(&self, data_dir: &Path) -> PathBuf {
        match &self.export.dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => data_dir.join(dir),
            None => data_dir.to_path_buf(),
        }
    }
}
