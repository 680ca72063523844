use crate::defaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
#[cfg(feature = "cli")]
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub audio: AudioConfig,
    pub output: OutputConfig,
}

/// Remote model API configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// API key; usually supplied via VOCAP_API_KEY instead of the file.
    pub key: Option<String>,
    pub text_model: String,
    pub tts_model: String,
    pub voice: String,
}

/// Audio playback configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AudioConfig {
    pub device: Option<String>,
}

/// Saved-summary configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub file_name: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::DEFAULT_BASE_URL.to_string(),
            key: None,
            text_model: defaults::DEFAULT_TEXT_MODEL.to_string(),
            tts_model: defaults::DEFAULT_TTS_MODEL.to_string(),
            voice: defaults::DEFAULT_VOICE.to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: defaults::DOWNLOAD_FILE_NAME.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Self::default()
                } else {
                    // Re-panic on invalid TOML or other errors
                    panic!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - VOCAP_API_KEY (or GEMINI_API_KEY) → api.key
    /// - VOCAP_MODEL → api.text_model
    /// - VOCAP_TTS_MODEL → api.tts_model
    /// - VOCAP_VOICE → api.voice
    /// - VOCAP_AUDIO_DEVICE → audio.device
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("VOCAP_API_KEY")
            && !key.is_empty()
        {
            self.api.key = Some(key);
        } else if let Ok(key) = std::env::var("GEMINI_API_KEY")
            && !key.is_empty()
        {
            self.api.key = Some(key);
        }

        if let Ok(model) = std::env::var("VOCAP_MODEL")
            && !model.is_empty()
        {
            self.api.text_model = model;
        }

        if let Ok(model) = std::env::var("VOCAP_TTS_MODEL")
            && !model.is_empty()
        {
            self.api.tts_model = model;
        }

        if let Ok(voice) = std::env::var("VOCAP_VOICE")
            && !voice.is_empty()
        {
            self.api.voice = voice;
        }

        if let Ok(device) = std::env::var("VOCAP_AUDIO_DEVICE")
            && !device.is_empty()
        {
            self.audio.device = Some(device);
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/vocap/config.toml on Linux
    #[cfg(feature = "cli")]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vocap")
            .join("config.toml")
    }
}
