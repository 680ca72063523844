//! WAV container writer for synthesized speech.
//!
//! Produces a minimal RIFF/WAV file: a fixed 44-byte header followed by the
//! raw PCM payload copied verbatim. The header describes 16-bit PCM mono at
//! 24kHz, matching the speech-synthesis contract. Output is byte-for-byte
//! reproducible for identical input.

use crate::defaults::{BITS_PER_SAMPLE, CHANNELS, SAMPLE_RATE, WAV_HEADER_LEN};
use crate::error::{Result, VocapError};
use std::path::Path;

/// Build a complete WAV file from raw 16-bit little-endian PCM bytes.
///
/// The returned buffer is exactly `44 + pcm.len()` bytes. The payload is
/// copied, never shared — the caller keeps ownership of `pcm`.
///
/// # Errors
/// Returns `VocapError::Allocation` if the output buffer cannot be
/// allocated (very large payloads on constrained systems).
pub fn create_wav_file(pcm: &[u8]) -> Result<Vec<u8>> {
    let data_size = pcm.len() as u32;
    let block_align = CHANNELS * BITS_PER_SAMPLE / 8;
    let byte_rate = SAMPLE_RATE * block_align as u32;

    let mut out = Vec::new();
    out.try_reserve_exact(WAV_HEADER_LEN + pcm.len())
        .map_err(|e| VocapError::Allocation {
            message: format!("WAV buffer of {} bytes: {}", WAV_HEADER_LEN + pcm.len(), e),
        })?;

    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_size).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes()); // format sub-chunk length
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM format tag
    out.extend_from_slice(&CHANNELS.to_le_bytes());
    out.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_size.to_le_bytes());
    out.extend_from_slice(pcm);

    Ok(out)
}

/// Build a WAV file and write it to `path`.
///
/// The in-memory blob is dropped as soon as the write completes.
pub fn write_wav_file(pcm: &[u8], path: &Path) -> Result<()> {
    let wav = create_wav_file(pcm)?;
    std::fs::write(path, wav)?;
    Ok(())
}
