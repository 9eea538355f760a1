use std::{
  collections::{BTreeMap, BTreeSet},
  time::Duration,
};

use serde::Deserialize;

use crate::{BlindPins, Direction, Error, Result};

/// Action names handled by the dispatcher itself, never by a scenario.
pub const RESERVED_ACTIONS: [&str; 2] = ["off", "status"];

pub const DEFAULT_DEVICE: &str = "living-room";

/// Device profiles compiled into the binary, one per deployment.
const DEVICES: &[(&str, &str)] = &[
  ("living-room", include_str!("../devices/living-room.json")),
  ("living-room-swapped", include_str!("../devices/living-room-swapped.json")),
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
  pub blinds: BTreeMap<String, BlindPins>,
  pub commands: BTreeMap<String, CommandConfig>,
  pub scenarios: BTreeMap<String, ScenarioConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandConfig {
  pub direction: Direction,
  /// Seconds.
  pub enable_duration: f64,
}

impl CommandConfig {
  /// The drive time, or `None` if it is negative, not finite or too large to represent.
  pub fn duration(&self) -> Option<Duration> {
    Duration::try_from_secs_f64(self.enable_duration).ok()
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
  pub blind: String,
  pub commands: Vec<String>,
}

impl DeviceConfig {
  pub fn device_names() -> impl Iterator<Item = &'static str> {
    DEVICES.iter().map(|(name, _)| *name)
  }

  pub fn builtin(name: &str) -> Result<Self> {
    let (_, json) =
      DEVICES.iter().find(|(device, _)| *device == name).ok_or_else(|| Error::UnknownDevice(name.to_owned()))?;
    Self::from_json(json)
  }

  pub fn from_json(json: &str) -> Result<Self> {
    let config: Self = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<()> {
    let mut channels = BTreeSet::new();
    for (name, pins) in &self.blinds {
      for channel in pins.channels() {
        if !channels.insert(channel) {
          return Err(invalid(format!("GPIO{channel} of blind {name} is used more than once")));
        }
      }
    }

    for (name, command) in &self.commands {
      if command.duration().is_none() {
        return Err(invalid(format!("command {name} has invalid duration {}", command.enable_duration)));
      }
    }

    for (name, scenario) in &self.scenarios {
      if RESERVED_ACTIONS.contains(&name.as_str()) {
        return Err(invalid(format!("scenario name {name} is reserved")));
      }

      if !self.blinds.contains_key(&scenario.blind) {
        return Err(invalid(format!("scenario {name} refers to unknown blind {}", scenario.blind)));
      }

      if let Some(command) = scenario.commands.iter().find(|command| !self.commands.contains_key(*command)) {
        return Err(invalid(format!("scenario {name} refers to unknown command {command}")));
      }
    }

    Ok(())
  }
}

fn invalid(message: String) -> Error {
  Error::InvalidConfig(message)
}
