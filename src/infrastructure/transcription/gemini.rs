//! Gemini API transcriber adapter

use serde::{Deserialize, Serialize};

use super::{AudioData, Transcriber, TranscriptionError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const INSTRUCTION: &str = "Transcribe the spoken journal entry in this recording verbatim. \
Return only the transcript as plain text with normal punctuation. \
If the recording contains no intelligible speech, return an empty response.";

// Request types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: SystemInstruction,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    inline_data: InlineData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
struct TextPart {
    text: String,
}

// Response types

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Blocking client for the Gemini `generateContent` endpoint
pub struct GeminiTranscriber {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::blocking::Client,
}

impl GeminiTranscriber {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Point the client at a different endpoint (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn api_url(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    fn build_request(audio: &AudioData) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    inline_data: InlineData {
                        mime_type: audio.mime_type().to_string(),
                        data: audio.to_base64(),
                    },
                }],
            }],
            system_instruction: SystemInstruction {
                parts: vec![TextPart {
                    text: INSTRUCTION.to_string(),
                }],
            },
        }
    }

    fn extract_text(response: &GenerateContentResponse) -> Option<String> {
        let parts: Vec<&str> = response
            .candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(""))
        }
    }
}

impl Transcriber for GeminiTranscriber {
    fn transcribe(&self, audio: &AudioData) -> Result<String, TranscriptionError> {
        tracing::info!(
            model = %self.model,
            bytes = audio.size_bytes(),
            mime = %audio.mime_type(),
            "sending audio for transcription"
        );

        let response = self
            .client
            .post(self.api_url())
            .json(&Self::build_request(audio))
            .send()
            .map_err(|e| TranscriptionError::RequestFailed(e.without_url().to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(TranscriptionError::InvalidApiKey);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TranscriptionError::RateLimited);
        }
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TranscriptionError::ApiError(format!("HTTP {}: {}", status, body)));
        }

        let response: GenerateContentResponse = response
            .json()
            .map_err(|e| TranscriptionError::ParseError(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(TranscriptionError::ApiError(error.message));
        }

        let text = Self::extract_text(&response).unwrap_or_default();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(TranscriptionError::NoSpeech);
        }

        tracing::debug!(chars = trimmed.len(), "transcription received");
        Ok(trimmed.to_string())
    }
}
