use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors detected before a capture session is started.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid capture duration {0}: must be a positive number of seconds")]
    InvalidDuration(i64),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Failed to open output file {}: {source}", .path.display())]
    Sink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors raised while creating or running a capture session.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Network interface not found: {0}")]
    InterfaceNotFound(String),

    #[error("Insufficient permissions for packet capture. Try running as root or with CAP_NET_RAW.")]
    InsufficientPermissions,

    #[error("Failed to create datalink channel: {0}")]
    ChannelCreation(String),

    #[error("Unsupported datalink channel type on interface {0}")]
    UnsupportedChannel(String),

    #[error("Failed to write capture record: {0}")]
    Sink(#[source] io::Error),

    #[error("Failed to arm capture deadline: {0}")]
    Timer(#[source] io::Error),

    #[error("Capture session has already run")]
    SessionFinished,
}
