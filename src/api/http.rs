//! HTTP implementation of [`ModelClient`] against a generative-language API.
//!
//! All four operations go through the same `generateContent` endpoint; the
//! request body decides whether the model sees text, inlined audio, or a
//! conversation, and whether it answers with text or synthesized speech.

use crate::audio::codec::encode_base64;
use crate::config::ApiConfig;
use crate::defaults::{SUMMARY_PROMPT, TRANSCRIBE_PROMPT};
use crate::error::{Result, VocapError};
use crate::session::{ChatTurn, Role};
use async_trait::async_trait;
use serde_json::{Value, json};

use super::model::{ModelClient, SynthesizedSpeech};

/// Longest error body echoed back to the user.
const ERROR_BODY_LIMIT: usize = 300;

/// Client for a hosted generative-language REST API.
pub struct HttpModelClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    text_model: String,
    tts_model: String,
    voice: String,
}

impl HttpModelClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    /// Returns `VocapError::ApiKeyMissing` if no API key is configured.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let api_key = config.key.clone().ok_or(VocapError::ApiKeyMissing)?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            text_model: config.text_model.clone(),
            tts_model: config.tts_model.clone(),
            voice: config.voice.clone(),
        })
    }

    /// POST a `generateContent` request and return the parsed response body.
    async fn generate(&self, model: &str, body: Value) -> Result<Value> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| VocapError::Api {
                message: format!("request to {} failed: {}", model, e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message: String = body.chars().take(ERROR_BODY_LIMIT).collect();
            return Err(VocapError::ApiStatus {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<Value>().await.map_err(|e| VocapError::Api {
            message: format!("failed to parse response from {}: {}", model, e),
        })
    }
}

#[async_trait]
impl ModelClient for HttpModelClient {
    async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String> {
        let body = transcribe_body(audio, mime_type);
        let response = self.generate(&self.text_model, body).await?;
        extract_text(&response)
    }

    async fn summarize(&self, transcript: &str) -> Result<String> {
        let body = summarize_body(transcript);
        let response = self.generate(&self.text_model, body).await?;
        extract_text(&response)
    }

    async fn synthesize(&self, text: &str) -> Result<SynthesizedSpeech> {
        let body = synthesize_body(text, &self.voice);
        let response = self.generate(&self.tts_model, body).await?;
        extract_inline_data(&response)
    }

    async fn chat(&self, history: &[ChatTurn], message: &str) -> Result<String> {
        let body = chat_body(history, message);
        let response = self.generate(&self.text_model, body).await?;
        extract_text(&response)
    }
}

/// Request body for transcription: instruction plus the recording inlined
/// as base64.
fn transcribe_body(audio: &[u8], mime_type: &str) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [
                { "text": TRANSCRIBE_PROMPT },
                { "inlineData": { "mimeType": mime_type, "data": encode_base64(audio) } }
            ]
        }]
    })
}

/// Request body for summarization.
fn summarize_body(transcript: &str) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": format!("{}\n\n{}", SUMMARY_PROMPT, transcript) }]
        }]
    })
}

/// Request body for speech synthesis: audio response modality with a
/// prebuilt voice.
fn synthesize_body(text: &str, voice: &str) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": text }]
        }],
        "generationConfig": {
            "responseModalities": ["AUDIO"],
            "speechConfig": {
                "voiceConfig": {
                    "prebuiltVoiceConfig": { "voiceName": voice }
                }
            }
        }
    })
}

/// Request body for a chat exchange: full history plus the new message.
fn chat_body(history: &[ChatTurn], message: &str) -> Value {
    let mut contents: Vec<Value> = history
        .iter()
        .map(|turn| {
            json!({
                "role": match turn.role {
                    Role::User => "user",
                    Role::Model => "model",
                },
                "parts": [{ "text": turn.text }]
            })
        })
        .collect();
    contents.push(json!({
        "role": "user",
        "parts": [{ "text": message }]
    }));

    json!({ "contents": contents })
}

/// Pull the concatenated text parts out of the first candidate.
fn extract_text(response: &Value) -> Result<String> {
    let parts = candidate_parts(response)?;

    let mut text = String::new();
    for part in parts {
        if let Some(piece) = part.get("text").and_then(|v| v.as_str()) {
            text.push_str(piece);
        }
    }

    if text.is_empty() {
        return Err(VocapError::Api {
            message: "response contained no text".to_string(),
        });
    }
    Ok(text.trim().to_string())
}

/// Pull the base64 audio payload out of the first candidate.
fn extract_inline_data(response: &Value) -> Result<SynthesizedSpeech> {
    let parts = candidate_parts(response)?;

    for part in parts {
        if let Some(inline) = part.get("inlineData") {
            let data = inline
                .get("data")
                .and_then(|v| v.as_str())
                .ok_or_else(|| VocapError::Api {
                    message: "audio part missing data field".to_string(),
                })?;
            let mime_type = inline
                .get("mimeType")
                .and_then(|v| v.as_str())
                .unwrap_or("audio/L16;codec=pcm;rate=24000");
            return Ok(SynthesizedSpeech {
                data: data.to_string(),
                mime_type: mime_type.to_string(),
            });
        }
    }

    Err(VocapError::Api {
        message: "response contained no audio payload".to_string(),
    })
}

fn candidate_parts(response: &Value) -> Result<&Vec<Value>> {
    response
        .get("candidates")
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("content"))
        .and_then(|v| v.get("parts"))
        .and_then(|v| v.as_array())
        .ok_or_else(|| VocapError::Api {
            message: "unexpected response shape (no candidates/content/parts)".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcribe_body_inlines_audio_as_base64() {
        let body = transcribe_body(&[0x00, 0x00, 0x01, 0xFF], "audio/mpeg");
        let parts = &body["contents"][0]["parts"];

        assert_eq!(parts[0]["text"], TRANSCRIBE_PROMPT);
        assert_eq!(parts[1]["inlineData"]["mimeType"], "audio/mpeg");
        assert_eq!(parts[1]["inlineData"]["data"], "AAAB/w==");
    }

    #[test]
    fn summarize_body_carries_prompt_and_transcript() {
        let body = summarize_body("the transcript");
        let text = body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(text.starts_with(SUMMARY_PROMPT));
        assert!(text.ends_with("the transcript"));
    }

    #[test]
    fn synthesize_body_requests_audio_modality() {
        let body = synthesize_body("read this", "Kore");
        assert_eq!(body["generationConfig"]["responseModalities"][0], "AUDIO");
        assert_eq!(
            body["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]
                ["voiceName"],
            "Kore"
        );
    }

    #[test]
    fn chat_body_threads_history_then_message() {
        let history = vec![
            ChatTurn {
                role: Role::User,
                text: "context".to_string(),
            },
            ChatTurn {
                role: Role::Model,
                text: "noted".to_string(),
            },
        ];
        let body = chat_body(&history, "and now?");
        let contents = body["contents"].as_array().unwrap();

        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["role"], "user");
        assert_eq!(contents[2]["parts"][0]["text"], "and now?");
    }

    #[test]
    fn extract_text_joins_parts() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hello " }, { "text": "world" }] }
            }]
        });
        assert_eq!(extract_text(&response).unwrap(), "Hello world");
    }

    #[test]
    fn extract_text_rejects_empty_candidates() {
        let response = json!({ "candidates": [] });
        match extract_text(&response) {
            Err(VocapError::Api { message }) => {
                assert!(message.contains("unexpected response shape"));
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn extract_text_rejects_audio_only_response() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{ "inlineData": { "data": "AAAA" } }] }
            }]
        });
        assert!(extract_text(&response).is_err());
    }

    #[test]
    fn extract_inline_data_returns_payload_and_mime() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{
                    "inlineData": {
                        "mimeType": "audio/L16;codec=pcm;rate=24000",
                        "data": "AAAB/w=="
                    }
                }] }
            }]
        });
        let speech = extract_inline_data(&response).unwrap();
        assert_eq!(speech.data, "AAAB/w==");
        assert_eq!(speech.mime_type, "audio/L16;codec=pcm;rate=24000");
    }

    #[test]
    fn extract_inline_data_defaults_missing_mime() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{ "inlineData": { "data": "AAAA" } }] }
            }]
        });
        let speech = extract_inline_data(&response).unwrap();
        assert!(speech.mime_type.contains("rate=24000"));
    }

    #[test]
    fn extract_inline_data_rejects_text_only_response() {
        let response = json!({
            "candidates": [{ "content": { "parts": [{ "text": "no audio" }] } }]
        });
        assert!(extract_inline_data(&response).is_err());
    }

    #[test]
    fn client_requires_api_key() {
        let config = ApiConfig {
            key: None,
            ..ApiConfig::default()
        };
        assert!(matches!(
            HttpModelClient::new(&config),
            Err(VocapError::ApiKeyMissing)
        ));
    }

    #[test]
    fn client_trims_trailing_slash_from_base_url() {
        let config = ApiConfig {
            key: Some("k".to_string()),
            base_url: "https://example.test/v1/".to_string(),
            ..ApiConfig::default()
        };
        let client = HttpModelClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://example.test/v1");
    }
}
