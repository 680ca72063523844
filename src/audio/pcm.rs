//! PCM decoding into an in-memory playback buffer.

use crate::defaults::{CHANNELS, SAMPLE_RATE};
use crate::error::{Result, VocapError};

/// Decoded audio ready for an output device.
///
/// Samples are interleaved per frame (mono here, so one sample per frame)
/// and normalized to [-1.0, 1.0]. The buffer is owned by the playback side
/// and never shared with the WAV writer, which works from the raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    pub channels: u16,
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl AudioBuffer {
    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Playback duration in seconds.
    pub fn duration_secs(&self) -> f32 {
        self.frames() as f32 / self.sample_rate as f32
    }
}

/// Decode raw 16-bit little-endian PCM bytes into an [`AudioBuffer`].
///
/// Each sample is normalized as `s / 32768.0`, so -32768 maps to exactly
/// -1.0 while 32767 maps to just under 1.0. The asymmetry is the standard
/// 16-bit PCM convention and is deliberate — do not rescale.
///
/// # Errors
/// Returns `VocapError::Decode` if `pcm` has odd length (incomplete final
/// sample). Returns `VocapError::Allocation` if the sample buffer cannot
/// be allocated.
pub fn decode_pcm(pcm: &[u8]) -> Result<AudioBuffer> {
    if pcm.len() % 2 != 0 {
        return Err(VocapError::Decode {
            message: format!("PCM byte length {} is odd (incomplete sample)", pcm.len()),
        });
    }

    let mut samples = Vec::new();
    samples
        .try_reserve_exact(pcm.len() / 2)
        .map_err(|e| VocapError::Allocation {
            message: format!("sample buffer of {} frames: {}", pcm.len() / 2, e),
        })?;
    samples.extend(
        pcm.chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0),
    );

    Ok(AudioBuffer {
        channels: CHANNELS,
        sample_rate: SAMPLE_RATE,
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_extreme_maps_to_exactly_minus_one() {
        // 0x8000 little-endian = -32768
        let buffer = decode_pcm(&[0x00, 0x80]).unwrap();
        assert_eq!(buffer.samples, vec![-1.0]);
    }

    #[test]
    fn positive_extreme_maps_just_under_one() {
        // 0x7FFF little-endian = 32767
        let buffer = decode_pcm(&[0xFF, 0x7F]).unwrap();
        assert_eq!(buffer.samples, vec![32767.0 / 32768.0]);
        assert!(buffer.samples[0] < 1.0);
    }

    #[test]
    fn zero_bytes_map_to_silence() {
        let buffer = decode_pcm(&[0x00, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(buffer.samples, vec![0.0, 0.0]);
    }

    #[test]
    fn bytes_are_interpreted_little_endian() {
        // 0x01FF = 511
        let buffer = decode_pcm(&[0xFF, 0x01]).unwrap();
        assert_eq!(buffer.samples, vec![511.0 / 32768.0]);
    }

    #[test]
    fn odd_length_is_rejected() {
        let result = decode_pcm(&[0x00, 0x00, 0x01]);
        match result {
            Err(VocapError::Decode { message }) => {
                assert!(message.contains("odd"), "got: {}", message);
            }
            other => panic!("Expected Decode error, got {:?}", other),
        }
    }

    #[test]
    fn empty_input_yields_zero_frames() {
        let buffer = decode_pcm(&[]).unwrap();
        assert_eq!(buffer.frames(), 0);
        assert_eq!(buffer.duration_secs(), 0.0);
    }

    #[test]
    fn buffer_shape_is_mono_24khz() {
        let buffer = decode_pcm(&[0x00, 0x00, 0x01, 0xFF]).unwrap();
        assert_eq!(buffer.channels, 1);
        assert_eq!(buffer.sample_rate, 24_000);
        assert_eq!(buffer.frames(), 2);
    }

    #[test]
    fn all_samples_stay_in_unit_range() {
        let pcm: Vec<u8> = (0u16..2048).flat_map(|i| (i.wrapping_mul(31991)).to_le_bytes()).collect();
        let buffer = decode_pcm(&pcm).unwrap();
        assert!(buffer.samples.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn one_second_of_audio_has_expected_duration() {
        let pcm = vec![0u8; 48_000]; // 24000 frames * 2 bytes
        let buffer = decode_pcm(&pcm).unwrap();
        assert_eq!(buffer.frames(), 24_000);
        assert!((buffer.duration_secs() - 1.0).abs() < f32::EPSILON);
    }
}
