use anyhow::Result;
use clap::{CommandFactory, Parser};
use owo_colors::OwoColorize;
use vocap::app::{run_chat_command, run_summarize_command};
use vocap::audio::output::list_devices;
use vocap::cli::{Cli, Commands, ConfigAction};
use vocap::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize {
            file,
            speak,
            save,
            device,
            model,
            voice,
        } => {
            let config = load_config(cli.config.as_deref())?;
            run_summarize_command(
                config,
                &file,
                speak,
                save,
                device,
                model,
                voice,
                cli.quiet,
                cli.verbose,
            )
            .await?;
        }
        Commands::Chat { file, model } => {
            let config = load_config(cli.config.as_deref())?;
            run_chat_command(config, &file, model, cli.quiet, cli.verbose).await?;
        }
        Commands::Devices => {
            list_audio_devices()?;
        }
        Commands::Config { action } => {
            handle_config_command(action, cli.config.as_deref())?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "vocap",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/vocap/config.toml)
/// 3. Built-in defaults with environment variable overrides
fn load_config(custom_path: Option<&std::path::Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        // Load from custom path
        Config::load(path)?
    } else {
        // Try default path, fall back to defaults
        let default_path = Config::default_path();
        Config::load_or_default(&default_path)
    };

    // Apply environment variable overrides
    Ok(config.with_env_overrides())
}

/// List available audio output devices.
fn list_audio_devices() -> Result<()> {
    let devices = list_devices()?;

    if devices.is_empty() {
        eprintln!("No audio output devices found");
        std::process::exit(1);
    }

    println!("Available audio output devices:");
    for (idx, device) in devices.iter().enumerate() {
        println!("  [{}] {}", idx, device);
    }

    Ok(())
}

/// Handle configuration management commands.
fn handle_config_command(action: ConfigAction, custom_path: Option<&std::path::Path>) -> Result<()> {
    let path = custom_path
        .map(|p| p.to_path_buf())
        .unwrap_or_else(Config::default_path);

    match action {
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Show => {
            let config = Config::load_or_default(&path).with_env_overrides();
            // Never echo the key itself
            let key_state = if config.api.key.is_some() { "set" } else { "unset" };
            println!("{} {}", "config file:".dimmed(), path.display());
            println!("api.base_url   = {}", config.api.base_url);
            println!("api.key        = {}", key_state);
            println!("api.text_model = {}", config.api.text_model);
            println!("api.tts_model  = {}", config.api.tts_model);
            println!("api.voice      = {}", config.api.voice);
            println!(
                "audio.device   = {}",
                config.audio.device.as_deref().unwrap_or("(default)")
            );
            println!("output.file_name = {}", config.output.file_name);
        }
        ConfigAction::Init => {
            if path.exists() {
                eprintln!("Config file already exists at {}", path.display());
                std::process::exit(1);
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let rendered = toml::to_string_pretty(&Config::default())?;
            std::fs::write(&path, rendered)?;
            println!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}
