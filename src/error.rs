//! Error types for vocap.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VocapError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Audio pipeline errors
    #[error("Audio decode failed: {message}")]
    Decode { message: String },

    #[error("Audio buffer allocation failed: {message}")]
    Allocation { message: String },

    // Playback (resource) errors
    #[error("Audio output device not found: {device}")]
    AudioDeviceNotFound { device: String },

    #[error("Audio output failed: {message}")]
    AudioOutput { message: String },

    // Remote API errors
    #[error("API key not set (use VOCAP_API_KEY or [api] key in config)")]
    ApiKeyMissing,

    #[error("API request failed: {message}")]
    Api { message: String },

    #[error("API returned status {status}: {message}")]
    ApiStatus { status: u16, message: String },

    // Input media errors
    #[error("Unsupported audio file type: {path}")]
    UnsupportedMedia { path: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, VocapError>;
