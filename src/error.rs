use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid scenario: {0}")]
  InvalidScenario(String),

  #[error("unknown device: {0}")]
  UnknownDevice(String),

  #[error("failed to access {}: {source}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("GPIO{channel} holds invalid value {value:?}")]
  InvalidValue { channel: u8, value: String },

  #[error("GPIO error: {0}")]
  Gpio(#[from] rppal::gpio::Error),

  #[error("failed to parse device profile: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("invalid device profile: {0}")]
  InvalidConfig(String),
}

impl Error {
  pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
    let path = path.into();
    move |source| Self::Io { path, source }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
