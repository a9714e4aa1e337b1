use std::path::PathBuf;

/// Central error type for obspad.
#[derive(Debug, thiserror::Error)]
pub enum PadError {
    #[error("backend unreachable: {0}")]
    Connection(String),

    #[error("backend rejected call: {0}")]
    Protocol(String),

    #[error("invalid action: {0}")]
    Validation(String),

    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("failed to launch '{command}': {message}")]
    LocalExec { command: String, message: String },

    #[error("unknown key: {0}")]
    UnknownKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PadError>;
