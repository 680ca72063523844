//! Input recording loader: file bytes plus a MIME label for the API.

use crate::error::{Result, VocapError};
use std::path::Path;

/// Extension → MIME label for the audio formats the API accepts.
const MIME_TYPES: &[(&str, &str)] = &[
    ("wav", "audio/wav"),
    ("mp3", "audio/mpeg"),
    ("m4a", "audio/mp4"),
    ("aac", "audio/aac"),
    ("flac", "audio/flac"),
    ("ogg", "audio/ogg"),
    ("opus", "audio/opus"),
    ("aiff", "audio/aiff"),
    ("aif", "audio/aiff"),
    ("webm", "audio/webm"),
];

/// A loaded input recording.
#[derive(Debug, Clone)]
pub struct InputAudio {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    /// Known only for WAV inputs; used for status output.
    pub duration_secs: Option<f32>,
}

/// Map a file extension to its MIME label.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    let lower = ext.to_lowercase();
    MIME_TYPES
        .iter()
        .find(|(e, _)| *e == lower)
        .map(|(_, mime)| *mime)
}

/// Read an audio file and label it for the API.
///
/// The bytes are passed through untouched — the remote API does its own
/// decoding. WAV inputs additionally get a duration probe for status
/// output; other formats are not inspected.
///
/// # Errors
/// Returns `VocapError::UnsupportedMedia` for unknown extensions and
/// `VocapError::Io` if the file cannot be read.
pub fn read_audio_file(path: &Path) -> Result<InputAudio> {
    let mime_type = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(mime_for_extension)
        .ok_or_else(|| VocapError::UnsupportedMedia {
            path: path.display().to_string(),
        })?;

    let bytes = std::fs::read(path)?;
    let duration_secs = if mime_type == "audio/wav" {
        wav_duration(&bytes)
    } else {
        None
    };

    Ok(InputAudio {
        bytes,
        mime_type,
        duration_secs,
    })
}

/// Probe a WAV payload for its duration. Returns None on anything malformed
/// — the file still goes to the API as-is.
fn wav_duration(bytes: &[u8]) -> Option<f32> {
    let reader = hound::WavReader::new(std::io::Cursor::new(bytes)).ok()?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return None;
    }
    Some(reader.duration() as f32 / spec.sample_rate as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn make_wav_data(sample_rate: u32, samples: &[i16]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
        cursor.into_inner()
    }

    #[test]
    fn known_extensions_map_to_mime_labels() {
        assert_eq!(mime_for_extension("mp3"), Some("audio/mpeg"));
        assert_eq!(mime_for_extension("WAV"), Some("audio/wav"));
        assert_eq!(mime_for_extension("M4A"), Some("audio/mp4"));
        assert_eq!(mime_for_extension("txt"), None);
    }

    #[test]
    fn read_audio_file_returns_bytes_and_label() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp3");
        std::fs::write(&path, [0xFFu8, 0xFB, 0x90, 0x00]).unwrap();

        let input = read_audio_file(&path).unwrap();

        assert_eq!(input.bytes, vec![0xFF, 0xFB, 0x90, 0x00]);
        assert_eq!(input.mime_type, "audio/mpeg");
        assert!(input.duration_secs.is_none());
    }

    #[test]
    fn read_audio_file_probes_wav_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        std::fs::write(&path, make_wav_data(16_000, &vec![0i16; 16_000])).unwrap();

        let input = read_audio_file(&path).unwrap();

        let duration = input.duration_secs.unwrap();
        assert!((duration - 1.0).abs() < 0.01, "got {}", duration);
    }

    #[test]
    fn read_audio_file_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"not audio").unwrap();

        assert!(matches!(
            read_audio_file(&path),
            Err(VocapError::UnsupportedMedia { .. })
        ));
    }

    #[test]
    fn read_audio_file_missing_file_is_io_error() {
        let result = read_audio_file(Path::new("/nonexistent/clip.wav"));
        assert!(matches!(result, Err(VocapError::Io(_))));
    }

    #[test]
    fn malformed_wav_still_loads_without_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.wav");
        std::fs::write(&path, b"RIFFnope").unwrap();

        let input = read_audio_file(&path).unwrap();
        assert!(input.duration_secs.is_none());
    }
}
