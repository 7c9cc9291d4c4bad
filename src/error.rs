//! Error types for the typewriter sound emulator.
//!
//! This module defines the custom error types used throughout the application.
//! It uses the `thiserror` crate to derive error implementations and provides
//! convenient conversions from common error types.

use std::path::PathBuf;

use thiserror::Error;

/// Custom error type for the typewriter sound emulator.
///
/// Every variant is a startup failure: once the bank is loaded and the key hook
/// is running, playback problems are logged and dropped instead.
#[derive(Error, Debug)]
pub enum Error {
    /// A required sample file does not exist
    #[error("Sample file not found: {}", .0.display())]
    MissingSample(PathBuf),

    /// A sample file exists but cannot be decoded or converted
    #[error("Sample decode error: {0}")]
    SampleDecode(String),

    /// Error related to audio device initialization or configuration
    #[error("Audio device error: {0}")]
    AudioDevice(String),

    /// Error related to audio stream operation
    #[error("Audio stream error: {0}")]
    AudioStream(String),

    /// The global key hook could not be installed
    #[error("Keyboard event source error: {0}")]
    EventSource(String),

    /// Error related to file system operations
    #[error("File system error: {0}")]
    FileSystem(String),

    /// Error related to application configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catch-all for unexpected errors
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Unknown(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::FileSystem(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sample_message() {
        let err = Error::MissingSample(PathBuf::from("samples/manual_key.wav"));
        assert_eq!(err.to_string(), "Sample file not found: samples/manual_key.wav");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(Error::from(io), Error::FileSystem(msg) if msg == "denied"));
    }
}
