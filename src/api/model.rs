//! Client trait for the remote language-model API.

use crate::error::{Result, VocapError};
use crate::session::ChatTurn;
use async_trait::async_trait;
use std::sync::Arc;

/// Speech audio returned by the synthesis endpoint.
///
/// `data` is the base64-encoded raw PCM payload exactly as the API sent it.
/// `mime_type` is the API's label for it (e.g. `audio/L16;codec=pcm;rate=24000`);
/// the 24kHz/mono/16-bit interpretation is a fixed contract, not negotiated.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedSpeech {
    pub data: String,
    pub mime_type: String,
}

/// Trait for the remote model operations vocap delegates.
///
/// This trait allows swapping implementations (real HTTP client vs mock).
/// All operations are opaque round trips: no retries, no local fallbacks —
/// errors surface to the caller.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Transcribe an audio recording to text.
    ///
    /// # Arguments
    /// * `audio` - Raw file bytes of the recording
    /// * `mime_type` - MIME label for the bytes (e.g. "audio/mpeg")
    async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String>;

    /// Summarize a transcript.
    async fn summarize(&self, transcript: &str) -> Result<String>;

    /// Synthesize speech audio for the given text.
    async fn synthesize(&self, text: &str) -> Result<SynthesizedSpeech>;

    /// Continue a conversation: full history plus the user's new message.
    async fn chat(&self, history: &[ChatTurn], message: &str) -> Result<String>;
}

/// Implement ModelClient for Arc<T> to allow sharing across tasks.
#[async_trait]
impl<T: ModelClient> ModelClient for Arc<T> {
    async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String> {
        (**self).transcribe(audio, mime_type).await
    }

    async fn summarize(&self, transcript: &str) -> Result<String> {
        (**self).summarize(transcript).await
    }

    async fn synthesize(&self, text: &str) -> Result<SynthesizedSpeech> {
        (**self).synthesize(text).await
    }

    async fn chat(&self, history: &[ChatTurn], message: &str) -> Result<String> {
        (**self).chat(history, message).await
    }
}

/// Mock model client for testing
#[derive(Debug, Clone)]
pub struct MockModelClient {
    transcription: String,
    summary: String,
    speech: SynthesizedSpeech,
    reply: String,
    should_fail_transcribe: bool,
    should_fail_summarize: bool,
    should_fail_synthesize: bool,
    should_fail_chat: bool,
}

impl Default for MockModelClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockModelClient {
    /// Create a new mock client with default responses
    pub fn new() -> Self {
        Self {
            transcription: "mock transcription".to_string(),
            summary: "mock summary".to_string(),
            speech: SynthesizedSpeech {
                // Two frames of near-silence
                data: "AAAB/w==".to_string(),
                mime_type: "audio/L16;codec=pcm;rate=24000".to_string(),
            },
            reply: "mock reply".to_string(),
            should_fail_transcribe: false,
            should_fail_summarize: false,
            should_fail_synthesize: false,
            should_fail_chat: false,
        }
    }

    /// Configure the mock to return a specific transcription
    pub fn with_transcription(mut self, text: &str) -> Self {
        self.transcription = text.to_string();
        self
    }

    /// Configure the mock to return a specific summary
    pub fn with_summary(mut self, text: &str) -> Self {
        self.summary = text.to_string();
        self
    }

    /// Configure the mock to return specific synthesized speech
    pub fn with_speech(mut self, base64_data: &str) -> Self {
        self.speech.data = base64_data.to_string();
        self
    }

    /// Configure the mock to return a specific chat reply
    pub fn with_reply(mut self, text: &str) -> Self {
        self.reply = text.to_string();
        self
    }

    /// Configure the mock to fail on transcribe
    pub fn with_transcribe_failure(mut self) -> Self {
        self.should_fail_transcribe = true;
        self
    }

    /// Configure the mock to fail on summarize
    pub fn with_summarize_failure(mut self) -> Self {
        self.should_fail_summarize = true;
        self
    }

    /// Configure the mock to fail on synthesize
    pub fn with_synthesize_failure(mut self) -> Self {
        self.should_fail_synthesize = true;
        self
    }

    /// Configure the mock to fail on chat
    pub fn with_chat_failure(mut self) -> Self {
        self.should_fail_chat = true;
        self
    }

    fn fail(stage: &str) -> VocapError {
        VocapError::Api {
            message: format!("mock {} failure", stage),
        }
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    async fn transcribe(&self, _audio: &[u8], _mime_type: &str) -> Result<String> {
        if self.should_fail_transcribe {
            return Err(Self::fail("transcribe"));
        }
        Ok(self.transcription.clone())
    }

    async fn summarize(&self, _transcript: &str) -> Result<String> {
        if self.should_fail_summarize {
            return Err(Self::fail("summarize"));
        }
        Ok(self.summary.clone())
    }

    async fn synthesize(&self, _text: &str) -> Result<SynthesizedSpeech> {
        if self.should_fail_synthesize {
            return Err(Self::fail("synthesize"));
        }
        Ok(self.speech.clone())
    }

    async fn chat(&self, _history: &[ChatTurn], _message: &str) -> Result<String> {
        if self.should_fail_chat {
            return Err(Self::fail("chat"));
        }
        Ok(self.reply.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_returns_configured_responses() {
        let client = MockModelClient::new()
            .with_transcription("hello world")
            .with_summary("hello")
            .with_reply("sure");

        assert_eq!(client.transcribe(&[0u8], "audio/wav").await.unwrap(), "hello world");
        assert_eq!(client.summarize("hello world").await.unwrap(), "hello");
        assert_eq!(client.chat(&[], "ok?").await.unwrap(), "sure");
    }

    #[tokio::test]
    async fn mock_speech_is_decodable_pcm() {
        let client = MockModelClient::new();
        let speech = client.synthesize("hi").await.unwrap();
        let pcm = crate::audio::codec::decode_base64(&speech.data).unwrap();
        assert_eq!(pcm.len() % 2, 0);
    }

    #[tokio::test]
    async fn mock_failures_are_stage_specific() {
        let client = MockModelClient::new().with_synthesize_failure();

        assert!(client.transcribe(&[], "audio/wav").await.is_ok());
        assert!(client.summarize("x").await.is_ok());
        assert!(client.synthesize("x").await.is_err());
    }

    #[tokio::test]
    async fn arc_wrapper_delegates() {
        let client = Arc::new(MockModelClient::new().with_transcription("via arc"));
        assert_eq!(client.transcribe(&[], "audio/wav").await.unwrap(), "via arc");
    }
}
