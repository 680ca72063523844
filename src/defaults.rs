//! Default configuration constants for vocap.
//!
//! This module provides shared constants used across different configuration types
//! to ensure consistency and eliminate duplication.

/// Sample rate of synthesized speech audio in Hz.
///
/// The remote speech-synthesis API returns raw 16-bit PCM at 24kHz mono.
/// The payload does not describe itself, so this value is a fixed contract
/// between vocap and the API — it is not negotiated or detected.
pub const SAMPLE_RATE: u32 = 24_000;

/// Channel count of synthesized speech audio.
pub const CHANNELS: u16 = 1;

/// Bits per sample of synthesized speech audio.
pub const BITS_PER_SAMPLE: u16 = 16;

/// Size of the RIFF/WAV header produced by the container writer, in bytes.
pub const WAV_HEADER_LEN: usize = 44;

/// Default file name for a saved spoken summary.
pub const DOWNLOAD_FILE_NAME: &str = "summary.wav";

/// Default base URL of the generative-language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for transcription and summarization.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

/// Default model for speech synthesis.
pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Default voice for speech synthesis.
pub const DEFAULT_VOICE: &str = "Kore";

/// Instruction sent with an audio recording to obtain a transcript.
pub const TRANSCRIBE_PROMPT: &str =
    "Transcribe this recording. Return only the spoken text, nothing else.";

/// Instruction sent with the transcript to obtain a summary.
pub const SUMMARY_PROMPT: &str =
    "Summarize the following transcript in a few short paragraphs. \
     Keep the key points and drop filler.";

/// Instruction prefixed to a transcript when seeding a chat session.
pub const CHAT_CONTEXT_PROMPT: &str =
    "You are discussing an audio recording with the user. \
     This is its transcript:";
