mod error;
pub use error::{Error, Result};

mod blind;
pub use blind::{BlindPins, Direction};

pub mod gpio;
pub use gpio::{RelayChannels, SysfsGpio};

mod waveshare_relay;
pub use waveshare_relay::WaveshareRelay;

mod command;
pub use command::Command;

mod scenario;
pub use scenario::Scenario;

pub mod config;
pub use config::DeviceConfig;

mod registry;
pub use registry::{Action, Outcome, Registry};

#[cfg(test)]
mod mock;
