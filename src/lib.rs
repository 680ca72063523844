//! vocap - Summarize audio recordings with a remote language model
//!
//! Upload a recording, get a transcription and summary back, optionally
//! listen to the summary or save it as a WAV file, and chat about the content.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod api;
pub mod audio;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod media;
pub mod session;

// Composition root - needs everything
#[cfg(all(feature = "cpal-audio", feature = "cli"))]
pub mod app;

// Core traits (remote model → audio pipeline → output sink)
pub use api::model::{ModelClient, SynthesizedSpeech};
pub use audio::playback::{AudioSink, PlaybackController};

// Audio pipeline
pub use audio::codec::{decode_base64, encode_base64};
pub use audio::pcm::{AudioBuffer, decode_pcm};
pub use audio::wav::{create_wav_file, write_wav_file};

// Error handling
pub use error::{Result, VocapError};

// Config
pub use config::Config;

// Session
pub use session::{ChatSession, ChatTurn, Role};

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.2+abc1234"` when git hash is available, `"0.1.2"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
