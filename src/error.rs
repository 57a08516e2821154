//! Error types
//!
//! Only configuration and wiring can fail. Gameplay itself never errors:
//! rejected requests are logged and ignored.

use thiserror::Error;

/// Settings or level data could not be read
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// The game could not be assembled
#[derive(Debug, Error)]
pub enum GameError {
    /// A state-critical collaborator was never wired in
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("no levels were registered")]
    NoLevels,

    #[error(transparent)]
    Config(#[from] ConfigError),
}
