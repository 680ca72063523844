//! Audio data pipeline: base64 payloads → raw PCM → playable buffers and WAV files.

pub mod codec;
#[cfg(feature = "cpal-audio")]
pub mod output;
pub mod pcm;
pub mod playback;
pub mod wav;
