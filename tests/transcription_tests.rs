//! Gemini adapter against a mock HTTP server

use moodlog::infrastructure::transcription::{
    AudioData, AudioMimeType, GeminiTranscriber, Transcriber, TranscriptionError,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-test";

fn reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ] } }
        ]
    })
}

/// The blocking client must not run on the async runtime's threads
async fn transcribe(server: &MockServer) -> Result<String, TranscriptionError> {
    let base_url = format!("{}/v1beta/models", server.uri());
    tokio::task::spawn_blocking(move || {
        let audio = AudioData::new(vec![1, 2, 3], AudioMimeType::Flac);
        GeminiTranscriber::new("test-key", MODEL)
            .with_base_url(base_url)
            .transcribe(&audio)
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn test_sends_inline_audio_and_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/v1beta/models/{}:generateContent", MODEL)))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [
                { "parts": [ { "inlineData": { "mimeType": "audio/flac", "data": "AQID" } } ] }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply(" Felt great today. ")))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(transcribe(&server).await.unwrap(), "Felt great today.");
}

#[tokio::test]
async fn test_status_codes_are_mapped() {
    let cases: [(u16, TranscriptionError); 3] = [
        (401, TranscriptionError::InvalidApiKey),
        (403, TranscriptionError::InvalidApiKey),
        (429, TranscriptionError::RateLimited),
    ];

    for (status, expected) in cases {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        assert_eq!(transcribe(&server).await.unwrap_err(), expected);
    }
}

#[tokio::test]
async fn test_server_error_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    match transcribe(&server).await {
        Err(TranscriptionError::ApiError(msg)) => assert!(msg.contains("boom")),
        other => panic!("Expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_transcript_is_no_speech() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("   ")))
        .mount(&server)
        .await;

    assert_eq!(
        transcribe(&server).await.unwrap_err(),
        TranscriptionError::NoSpeech
    );
}

#[tokio::test]
async fn test_garbage_response_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    assert!(matches!(
        transcribe(&server).await,
        Err(TranscriptionError::ParseError(_))
    ));
}
