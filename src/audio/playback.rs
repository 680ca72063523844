//! Playback state machine for synthesized speech.
//!
//! [`PlaybackController`] owns at most one live output session at a time.
//! `play` on a busy controller stops the old session before the new one
//! starts; `stop` is idempotent; natural completion returns the controller
//! to idle. Completions are generation-counted so a callback from a
//! stopped or replaced session can never flip the state machine.

use crate::audio::pcm::AudioBuffer;
use crate::error::Result;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

/// Callback invoked once when a session renders its final frame.
///
/// Must not fire after the session was explicitly stopped.
pub type CompletionHandler = Box<dyn FnOnce() + Send + 'static>;

/// Trait for audio output devices.
///
/// This trait allows swapping implementations (real cpal device vs mock).
pub trait AudioSink: Send {
    /// Begin rendering `buffer` from frame 0.
    ///
    /// `on_complete` fires once when all frames have been rendered, unless
    /// [`AudioSink::stop`] is called first.
    fn start(&mut self, buffer: AudioBuffer, on_complete: CompletionHandler) -> Result<()>;

    /// Halt the current session immediately. No-op if none is live.
    fn stop(&mut self) -> Result<()>;
}

#[derive(Debug)]
struct ControllerState {
    playing: bool,
    /// Bumped on every play and stop; a completion handler only acts if the
    /// generation it captured is still current.
    generation: u64,
}

/// Mediates start/stop/replace transitions over a single output sink.
pub struct PlaybackController {
    sink: Box<dyn AudioSink>,
    shared: Arc<(Mutex<ControllerState>, Condvar)>,
}

impl PlaybackController {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            shared: Arc::new((
                Mutex::new(ControllerState {
                    playing: false,
                    generation: 0,
                }),
                Condvar::new(),
            )),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        // A poisoned lock only means a completion handler panicked; the
        // state itself (two plain fields) is still coherent.
        self.shared.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start playback of `buffer` from frame 0.
    ///
    /// If a session is already live it is fully stopped first — at most one
    /// session ever exists. On error the controller is left idle.
    pub fn play(&mut self, buffer: AudioBuffer) -> Result<()> {
        let generation;
        let was_playing;
        {
            let mut state = self.lock();
            was_playing = state.playing;
            state.playing = false;
            state.generation += 1;
            generation = state.generation;
        }
        if was_playing {
            self.sink.stop()?;
        }

        let shared = Arc::clone(&self.shared);
        let on_complete: CompletionHandler = Box::new(move || {
            let (lock, cvar) = &*shared;
            let mut state = lock.lock().unwrap_or_else(PoisonError::into_inner);
            if state.generation == generation && state.playing {
                state.playing = false;
                cvar.notify_all();
            }
        });

        self.lock().playing = true;
        if let Err(e) = self.sink.start(buffer, on_complete) {
            let mut state = self.lock();
            state.playing = false;
            state.generation += 1;
            self.shared.1.notify_all();
            return Err(e);
        }
        Ok(())
    }

    /// Halt playback. Calling this while idle is a no-op.
    pub fn stop(&mut self) -> Result<()> {
        {
            let mut state = self.lock();
            if !state.playing {
                return Ok(());
            }
            state.playing = false;
            state.generation += 1;
        }
        self.shared.1.notify_all();
        self.sink.stop()
    }

    /// Start playback if idle, stop if playing.
    ///
    /// Returns true if the controller is playing after the call.
    pub fn toggle(&mut self, buffer: AudioBuffer) -> Result<bool> {
        if self.is_playing() {
            self.stop()?;
            Ok(false)
        } else {
            self.play(buffer)?;
            Ok(true)
        }
    }

    pub fn is_playing(&self) -> bool {
        self.lock().playing
    }

    /// Block until the current session ends (completion or stop).
    ///
    /// Returns immediately if the controller is idle.
    pub fn wait_until_idle(&self) {
        let (lock, cvar) = &*self.shared;
        let mut state = lock.lock().unwrap_or_else(PoisonError::into_inner);
        while state.playing {
            state = cvar.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
    }
}

/// Observable state of a [`MockAudioSink`], shared with tests.
#[derive(Default)]
pub struct MockSinkState {
    pub starts: usize,
    pub stops: usize,
    pub active: Option<AudioBuffer>,
    completions: Vec<CompletionHandler>,
}

/// Mock audio sink for testing.
#[derive(Clone, Default)]
pub struct MockAudioSink {
    state: Arc<Mutex<MockSinkState>>,
    fail_start: bool,
    fail_stop: bool,
}

impl MockAudioSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to fail on start
    pub fn with_start_failure(mut self) -> Self {
        self.fail_start = true;
        self
    }

    /// Configure the mock to fail on stop
    pub fn with_stop_failure(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    /// Handle for inspecting the sink after it has been moved into a controller.
    pub fn handle(&self) -> MockSinkHandle {
        MockSinkHandle {
            state: Arc::clone(&self.state),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockSinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AudioSink for MockAudioSink {
    fn start(&mut self, buffer: AudioBuffer, on_complete: CompletionHandler) -> Result<()> {
        if self.fail_start {
            return Err(crate::error::VocapError::AudioOutput {
                message: "mock start failure".to_string(),
            });
        }
        let mut state = self.lock();
        state.starts += 1;
        state.active = Some(buffer);
        state.completions.push(on_complete);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if self.fail_stop {
            return Err(crate::error::VocapError::AudioOutput {
                message: "mock stop failure".to_string(),
            });
        }
        let mut state = self.lock();
        state.stops += 1;
        state.active = None;
        // Cancellation severs the completion path
        state.completions.clear();
        Ok(())
    }
}

/// Test-side view of a [`MockAudioSink`].
pub struct MockSinkHandle {
    state: Arc<Mutex<MockSinkState>>,
}

impl MockSinkHandle {
    fn lock(&self) -> MutexGuard<'_, MockSinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn starts(&self) -> usize {
        self.lock().starts
    }

    pub fn stops(&self) -> usize {
        self.lock().stops
    }

    pub fn active_buffer(&self) -> Option<AudioBuffer> {
        self.lock().active.clone()
    }

    /// Fire the oldest pending completion handler, simulating the output
    /// device reaching the end of the buffer. Returns false if none is
    /// pending.
    pub fn fire_completion(&self) -> bool {
        let handler = {
            let mut state = self.lock();
            if state.completions.is_empty() {
                return false;
            }
            state.active = None;
            state.completions.remove(0)
        };
        handler();
        true
    }

    /// Remove and return the oldest pending completion handler without
    /// firing it, so tests can hold a stale callback across later calls.
    pub fn take_completion(&self) -> Option<CompletionHandler> {
        let mut state = self.lock();
        if state.completions.is_empty() {
            None
        } else {
            Some(state.completions.remove(0))
        }
    }
}
