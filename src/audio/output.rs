//! Real audio playback using CPAL (Cross-Platform Audio Library).

use crate::audio::pcm::AudioBuffer;
use crate::audio::playback::{AudioSink, CompletionHandler};
use crate::error::{Result, VocapError};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::{Arc, Mutex};
use std::thread;

/// Run a closure with stderr temporarily redirected to /dev/null.
///
/// This suppresses noisy ALSA/JACK/PipeWire messages that CPAL triggers
/// when probing audio backends. The messages are harmless but confusing to users.
///
/// # Safety
/// Uses `libc::dup`/`libc::dup2` to save and restore file descriptor 2 (stderr).
/// Safe as long as no other thread is concurrently manipulating fd 2.
fn with_suppressed_stderr<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    unsafe {
        let saved_fd = libc::dup(2);
        let devnull = libc::open(c"/dev/null".as_ptr(), libc::O_WRONLY);
        if saved_fd >= 0 && devnull >= 0 {
            libc::dup2(devnull, 2);
            libc::close(devnull);
        }

        let result = f();

        if saved_fd >= 0 {
            libc::dup2(saved_fd, 2);
            libc::close(saved_fd);
        }

        result
    }
}

/// Preferred device names for GNOME/PipeWire environments.
const PREFERRED_DEVICES: &[&str] = &["pipewire", "pulse", "PulseAudio"];

/// Device name patterns to filter out (not useful for speech playback).
const FILTERED_PATTERNS: &[&str] = &["surround", "front:", "rear:", "center:", "side:", "iec958"];

/// Check if a device name should be filtered out.
fn should_filter_device(name: &str) -> bool {
    let lower = name.to_lowercase();
    FILTERED_PATTERNS
        .iter()
        .any(|pattern| lower.contains(&pattern.to_lowercase()))
}

/// Check if a device is a preferred device.
fn is_preferred_device(name: &str) -> bool {
    let lower = name.to_lowercase();
    PREFERRED_DEVICES
        .iter()
        .any(|pref| lower.contains(&pref.to_lowercase()))
}

/// List all available audio output devices with filtering and recommendations.
///
/// # Returns
/// A vector of device names, with preferred devices marked with "\[recommended\]".
/// Filters out obviously unusable devices (surround channels, raw IEC958 ports).
///
/// # Errors
/// Returns `VocapError::AudioOutput` if device enumeration fails.
pub fn list_devices() -> Result<Vec<String>> {
    let (host, devices) = with_suppressed_stderr(|| {
        let host = cpal::default_host();
        let devices = host.output_devices();
        (host, devices)
    });
    let _ = host; // keep host alive while iterating devices
    let devices = devices.map_err(|e| VocapError::AudioOutput {
        message: format!("Failed to enumerate output devices: {}", e),
    })?;

    let mut device_names = Vec::new();
    for device in devices {
        if let Ok(name) = device.name() {
            if should_filter_device(&name) {
                continue;
            }

            if is_preferred_device(&name) {
                device_names.push(format!("{} [recommended]", name));
            } else {
                device_names.push(name);
            }
        }
    }

    Ok(device_names)
}

/// Get the best default output device, preferring PipeWire/PulseAudio.
///
/// This ensures we respect the desktop's audio device selection.
///
/// # Errors
/// Returns `VocapError::AudioDeviceNotFound` if no output device is available.
fn get_best_default_device() -> Result<cpal::Device> {
    let host = cpal::default_host();

    if let Ok(devices) = host.output_devices() {
        for device in devices {
            if let Ok(name) = device.name()
                && is_preferred_device(&name)
            {
                return Ok(device);
            }
        }
    }

    host.default_output_device()
        .ok_or_else(|| VocapError::AudioDeviceNotFound {
            device: "default".to_string(),
        })
}

/// Look up an output device by exact name.
fn find_device_by_name(name: &str) -> Result<cpal::Device> {
    let host = cpal::default_host();
    let devices = host.output_devices().map_err(|e| VocapError::AudioOutput {
        message: format!("Failed to enumerate output devices: {}", e),
    })?;

    for device in devices {
        if let Ok(dev_name) = device.name()
            && dev_name == name
        {
            return Ok(device);
        }
    }

    Err(VocapError::AudioDeviceNotFound {
        device: name.to_string(),
    })
}

/// Wrapper for cpal::Stream to make it Send.
///
/// SAFETY: We ensure that the stream is only accessed from a single thread at a time
/// through the Mutex wrapper around the session slot. The stream is created on the
/// calling thread, then only ever dropped — by `stop` or by the completion monitor.
struct SendableStream(cpal::Stream);

unsafe impl Send for SendableStream {}

/// One live playback stream plus the slot the completion monitor releases it through.
struct ActiveSession {
    slot: Arc<Mutex<Option<SendableStream>>>,
}

/// Real audio playback implementation using CPAL.
///
/// Renders mono f32 buffers through the system output device. The device
/// handle is acquired lazily on first play and reused for every later
/// session; each `start` builds a fresh stream for its buffer.
///
/// Tries the buffer's native format first (f32 at the buffer's sample
/// rate, mono), then falls back to the device's default config with
/// software conversion (channel upmix + linear resampling).
pub struct CpalSink {
    device_name: Option<String>,
    device: Option<cpal::Device>,
    session: Option<ActiveSession>,
}

impl CpalSink {
    /// Create a new CPAL playback sink.
    ///
    /// # Arguments
    /// * `device_name` - Optional device name. If None, uses the best default
    ///   output device (preferring PipeWire/PulseAudio).
    ///
    /// Device lookup is deferred until the first play, so constructing a
    /// sink never touches the audio backend.
    pub fn new(device_name: Option<&str>) -> Self {
        Self {
            device_name: device_name.map(|s| s.to_string()),
            device: None,
            session: None,
        }
    }

    /// Acquire the output device, reusing the handle from a previous play.
    fn acquire_device(&mut self) -> Result<&cpal::Device> {
        if self.device.is_none() {
            let device = with_suppressed_stderr(|| match self.device_name.as_deref() {
                Some(name) => find_device_by_name(name),
                None => get_best_default_device(),
            })?;
            self.device = Some(device);
        }
        self.device
            .as_ref()
            .ok_or_else(|| VocapError::AudioDeviceNotFound {
                device: "default".to_string(),
            })
    }

    /// Build an output stream rendering `buffer`, with a completion channel.
    ///
    /// The stream's data callback feeds frames from the buffer and sends one
    /// message on the returned channel after handing the final frame to the
    /// device. Dropping the stream severs the channel.
    fn build_stream(
        device: &cpal::Device,
        buffer: &AudioBuffer,
    ) -> Result<(cpal::Stream, Receiver<()>)> {
        let (done_tx, done_rx) = bounded(1);

        let err_callback = |err| {
            eprintln!("Audio stream error: {}", err);
        };

        // Try f32 at the buffer's own rate and channel count — PipeWire and
        // PulseAudio convert transparently
        let preferred_config = cpal::StreamConfig {
            channels: buffer.channels,
            sample_rate: buffer.sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };
        let mut render = render_f32(buffer.samples.clone(), done_tx.clone());
        if let Ok(stream) = device.build_output_stream(
            &preferred_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| render(data),
            err_callback,
            None,
        ) {
            return Ok((stream, done_rx));
        }

        // Fallback: render at the device's native config, converting in software
        let supported = device
            .default_output_config()
            .map_err(|e| VocapError::AudioOutput {
                message: format!("Failed to get device output config: {}", e),
            })?;
        let config: cpal::StreamConfig = supported.config();
        let adapted = adapt_samples(&buffer.samples, buffer.sample_rate, &config);

        let stream = match supported.sample_format() {
            cpal::SampleFormat::F32 => {
                let mut render = render_f32(adapted, done_tx);
                device.build_output_stream(
                    &config,
                    move |data: &mut [f32], _: &cpal::OutputCallbackInfo| render(data),
                    err_callback,
                    None,
                )
            }
            cpal::SampleFormat::I16 => {
                let mut render = render_i16(adapted, done_tx);
                device.build_output_stream(
                    &config,
                    move |data: &mut [i16], _: &cpal::OutputCallbackInfo| render(data),
                    err_callback,
                    None,
                )
            }
            other => {
                return Err(VocapError::AudioOutput {
                    message: format!("Unsupported output sample format: {:?}", other),
                });
            }
        }
        .map_err(|e| VocapError::AudioOutput {
            message: format!("Failed to build output stream: {}", e),
        })?;

        Ok((stream, done_rx))
    }
}

impl AudioSink for CpalSink {
    fn start(&mut self, buffer: AudioBuffer, on_complete: CompletionHandler) -> Result<()> {
        // Replace semantics: any live stream is released before the new one starts
        self.stop()?;

        let device = self.acquire_device()?;
        let (stream, done_rx) = Self::build_stream(device, &buffer)?;
        stream.play().map_err(|e| VocapError::AudioOutput {
            message: format!("Failed to start output stream: {}", e),
        })?;

        let slot = Arc::new(Mutex::new(Some(SendableStream(stream))));

        // Completion monitor: fires on_complete only for natural end-of-buffer.
        // An explicit stop drops the stream, which disconnects the channel and
        // the recv below returns Err — no callback.
        let monitor_slot = Arc::clone(&slot);
        thread::spawn(move || {
            if done_rx.recv().is_ok() {
                if let Ok(mut held) = monitor_slot.lock() {
                    held.take();
                }
                on_complete();
            }
        });

        self.session = Some(ActiveSession { slot });
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(session) = self.session.take()
            && let Ok(mut held) = session.slot.lock()
        {
            held.take();
        }
        Ok(())
    }
}

/// Fill function feeding `samples` into an f32 output stream.
fn render_f32(samples: Vec<f32>, done_tx: Sender<()>) -> impl FnMut(&mut [f32]) {
    let mut position = 0usize;
    let mut done_sent = false;
    move |data| {
        for out in data.iter_mut() {
            *out = if position < samples.len() {
                let s = samples[position];
                position += 1;
                s
            } else {
                0.0
            };
        }
        if position >= samples.len() && !done_sent {
            done_sent = true;
            done_tx.try_send(()).ok();
        }
    }
}

/// Fill function feeding `samples` into an i16 output stream.
fn render_i16(samples: Vec<f32>, done_tx: Sender<()>) -> impl FnMut(&mut [i16]) {
    let mut position = 0usize;
    let mut done_sent = false;
    move |data| {
        for out in data.iter_mut() {
            *out = if position < samples.len() {
                let s = samples[position];
                position += 1;
                (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
            } else {
                0
            };
        }
        if position >= samples.len() && !done_sent {
            done_sent = true;
            done_tx.try_send(()).ok();
        }
    }
}

/// Convert mono samples to the device's native rate and channel count.
///
/// Linear-interpolation resampling, then the mono signal duplicated across
/// all output channels. Good enough for speech; this path only runs when
/// the device refused the buffer's native config.
fn adapt_samples(samples: &[f32], from_rate: u32, config: &cpal::StreamConfig) -> Vec<f32> {
    let resampled = resample(samples, from_rate, config.sample_rate);
    let channels = config.channels as usize;
    if channels <= 1 {
        return resampled;
    }

    let mut interleaved = Vec::with_capacity(resampled.len() * channels);
    for s in resampled {
        for _ in 0..channels {
            interleaved.push(s);
        }
    }
    interleaved
}

/// Simple linear interpolation resampling.
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[samples.len() - 1]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as f32
            }
        })
        .collect()
}
