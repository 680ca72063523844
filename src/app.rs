//! Application entry points.
//!
//! Orchestrates the complete flow:
//! read recording → transcribe → summarize → speak/save → chat

use crate::api::http::HttpModelClient;
use crate::api::model::ModelClient;
use crate::audio::codec::decode_base64;
use crate::audio::output::CpalSink;
use crate::audio::pcm::decode_pcm;
use crate::audio::playback::PlaybackController;
use crate::audio::wav::write_wav_file;
use crate::config::Config;
use crate::error::Result;
use crate::media::read_audio_file;
use crate::session::ChatSession;
use owo_colors::OwoColorize;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Result of the transcribe → summarize sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryOutcome {
    pub transcription: String,
    pub summary: String,
}

/// Transcribe a recording and summarize the transcript.
///
/// The two remote calls run in order; an error in either surfaces
/// immediately and nothing partial is returned.
pub async fn summarize_audio(
    client: &dyn ModelClient,
    audio: &[u8],
    mime_type: &str,
) -> Result<SummaryOutcome> {
    let transcription = client.transcribe(audio, mime_type).await?;
    let summary = client.summarize(&transcription).await?;
    Ok(SummaryOutcome {
        transcription,
        summary,
    })
}

/// Synthesize speech for a summary and decode it to raw PCM bytes.
pub async fn synthesize_summary(client: &dyn ModelClient, summary: &str) -> Result<Vec<u8>> {
    let speech = client.synthesize(summary).await?;
    decode_base64(&speech.data)
}

/// Run the summarize command: transcribe → summarize → optionally speak/save.
///
/// # Arguments
/// * `config` - Base configuration (can be overridden by CLI args)
/// * `file` - Path to the input recording
/// * `speak` - Play the spoken summary through the output device
/// * `save` - Write the spoken summary as a WAV file (None = don't save)
/// * `device` - Optional output device override from CLI
/// * `model` - Optional text model override from CLI
/// * `voice` - Optional synthesis voice override from CLI
/// * `quiet` - Suppress status messages
/// * `verbosity` - Verbosity level (0=summary only, 1=+transcription, 2=full)
#[allow(clippy::too_many_arguments)]
pub async fn run_summarize_command(
    mut config: Config,
    file: &Path,
    speak: bool,
    save: Option<PathBuf>,
    device: Option<String>,
    model: Option<String>,
    voice: Option<String>,
    quiet: bool,
    verbosity: u8,
) -> Result<()> {
    // Apply CLI overrides
    if let Some(d) = device {
        config.audio.device = Some(d);
    }
    if let Some(m) = model {
        config.api.text_model = m;
    }
    if let Some(v) = voice {
        config.api.voice = v;
    }

    let client = HttpModelClient::new(&config.api)?;
    let input = read_audio_file(file)?;

    if !quiet {
        match input.duration_secs {
            Some(secs) => eprintln!("Transcribing {} ({:.1}s)...", file.display(), secs),
            None => eprintln!("Transcribing {}...", file.display()),
        }
    }
    let outcome = summarize_audio(&client, &input.bytes, input.mime_type).await?;

    if verbosity >= 1 {
        eprintln!("{}", "Transcription".bold());
        eprintln!("{}", outcome.transcription.dimmed());
        eprintln!();
    }
    println!("{}", outcome.summary);

    if !speak && save.is_none() {
        return Ok(());
    }

    // The summary is already printed; a synthesis or playback failure
    // below must not take it down with it.
    if !quiet {
        eprintln!("Synthesizing speech...");
    }
    let speech = client.synthesize(&outcome.summary).await?;
    if verbosity >= 2 {
        eprintln!("Speech payload type: {}", speech.mime_type);
    }
    let pcm = decode_base64(&speech.data)?;

    if let Some(path) = save {
        write_wav_file(&pcm, &path)?;
        if !quiet {
            eprintln!("Saved spoken summary to {}", path.display());
        }
    }

    if speak {
        let buffer = decode_pcm(&pcm)?;
        let sink = CpalSink::new(config.audio.device.as_deref());
        let mut controller = PlaybackController::new(Box::new(sink));

        if !quiet {
            eprintln!("Playing summary ({:.1}s)...", buffer.duration_secs());
        }
        controller.play(buffer)?;
        controller.wait_until_idle();
    }

    Ok(())
}

/// Run the chat command: summarize the recording, then converse about it.
///
/// Reads user messages line by line from stdin until EOF or `/quit`.
/// A failed exchange is reported and the session keeps going — the
/// transcript only ever records completed exchanges.
pub async fn run_chat_command(
    mut config: Config,
    file: &Path,
    model: Option<String>,
    quiet: bool,
    verbosity: u8,
) -> Result<()> {
    if let Some(m) = model {
        config.api.text_model = m;
    }

    let client = HttpModelClient::new(&config.api)?;
    let input = read_audio_file(file)?;

    if !quiet {
        eprintln!("Transcribing {}...", file.display());
    }
    let outcome = summarize_audio(&client, &input.bytes, input.mime_type).await?;

    if verbosity >= 1 {
        eprintln!("{}", "Transcription".bold());
        eprintln!("{}", outcome.transcription.dimmed());
        eprintln!();
    }
    eprintln!("{}", "Summary".bold());
    eprintln!("{}", outcome.summary);
    eprintln!();
    if !quiet {
        eprintln!("Ask about the recording. /quit to exit.");
    }

    let mut session = ChatSession::new(&outcome.transcription);
    let stdin = std::io::stdin();
    loop {
        eprint!("{} ", ">".bold());
        std::io::stderr().flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => return Err(e.into()),
        }

        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message == "/quit" || message == "/exit" {
            break;
        }

        match session.ask(&client, message).await {
            Ok(reply) => {
                println!("{}", reply);
                println!();
            }
            Err(e) => eprintln!("vocap: {}", e),
        }
    }

    Ok(())
}
