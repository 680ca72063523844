//! Command-line interface for vocap
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Summarize audio recordings with a remote language model
#[derive(Parser, Debug)]
#[command(
    name = "vocap",
    version,
    about = "Summarize audio recordings with a remote language model"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress status output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: show transcription, -vv: full diagnostics)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transcribe and summarize a recording
    Summarize {
        /// Audio file to summarize (wav, mp3, m4a, flac, ogg, ...)
        file: PathBuf,

        /// Play the summary through the audio output device
        #[arg(long)]
        speak: bool,

        /// Save the spoken summary as a WAV file (default: summary.wav)
        #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = crate::defaults::DOWNLOAD_FILE_NAME)]
        save: Option<PathBuf>,

        /// Audio output device (see `vocap devices`)
        #[arg(long, value_name = "DEVICE")]
        device: Option<String>,

        /// Model for transcription and summarization
        #[arg(long, value_name = "MODEL")]
        model: Option<String>,

        /// Voice for speech synthesis
        #[arg(long, value_name = "VOICE")]
        voice: Option<String>,
    },

    /// Summarize a recording, then chat about its content
    Chat {
        /// Audio file to discuss
        file: PathBuf,

        /// Model for transcription, summarization and chat
        #[arg(long, value_name = "MODEL")]
        model: Option<String>,
    },

    /// List available audio output devices
    Devices,

    /// Manage configuration
    Config {
        /// Action to perform
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the configuration file path
    Path,
    /// Show the effective configuration
    Show,
    /// Write a default configuration file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn summarize_parses_file_and_flags() {
        let cli = Cli::parse_from(["vocap", "summarize", "talk.mp3", "--speak", "-v"]);
        match cli.command {
            Commands::Summarize {
                file, speak, save, ..
            } => {
                assert_eq!(file, PathBuf::from("talk.mp3"));
                assert!(speak);
                assert!(save.is_none());
            }
            _ => panic!("expected summarize"),
        }
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn save_flag_without_value_uses_default_name() {
        let cli = Cli::parse_from(["vocap", "summarize", "talk.mp3", "--save"]);
        match cli.command {
            Commands::Summarize { save, .. } => {
                assert_eq!(save, Some(PathBuf::from("summary.wav")));
            }
            _ => panic!("expected summarize"),
        }
    }

    #[test]
    fn save_flag_with_value_keeps_it() {
        let cli = Cli::parse_from(["vocap", "summarize", "talk.mp3", "--save", "out/recap.wav"]);
        match cli.command {
            Commands::Summarize { save, .. } => {
                assert_eq!(save, Some(PathBuf::from("out/recap.wav")));
            }
            _ => panic!("expected summarize"),
        }
    }

    #[test]
    fn chat_parses_model_override() {
        let cli = Cli::parse_from(["vocap", "chat", "talk.wav", "--model", "other-model"]);
        match cli.command {
            Commands::Chat { file, model } => {
                assert_eq!(file, PathBuf::from("talk.wav"));
                assert_eq!(model.as_deref(), Some("other-model"));
            }
            _ => panic!("expected chat"),
        }
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::parse_from(["vocap", "devices", "--quiet"]);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Devices));
    }
}
