use std::collections::BTreeMap;

use embedded_hal::delay::DelayNs;

use crate::{BlindPins, Command, DeviceConfig, Error, RelayChannels, Result, Scenario};

/// What a single invocation asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
  /// Disable every channel.
  Off,
  /// Report whether any channel is enabled.
  Status,
  Run(&'a Scenario),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Done,
  Status(bool),
}

/// Immutable blind, command and scenario tables of one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
  blinds: BTreeMap<String, BlindPins>,
  commands: BTreeMap<String, Command>,
  scenarios: BTreeMap<String, Scenario>,
}

impl Registry {
  pub fn from_config(config: &DeviceConfig) -> Result<Self> {
    config.validate()?;

    let commands = config
      .commands
      .iter()
      .map(|(name, command)| -> Result<(String, Command)> {
        let duration = command.duration().ok_or_else(|| {
          Error::InvalidConfig(format!("command {name} has invalid duration {}", command.enable_duration))
        })?;
        Ok((name.clone(), Command::new(command.direction, duration)))
      })
      .collect::<Result<BTreeMap<_, _>>>()?;

    let scenarios = config
      .scenarios
      .iter()
      .map(|(name, scenario)| -> Result<(String, Scenario)> {
        let blind = config.blinds.get(&scenario.blind).copied().ok_or_else(|| {
          Error::InvalidConfig(format!("scenario {name} refers to unknown blind {}", scenario.blind))
        })?;
        let sequence = scenario
          .commands
          .iter()
          .map(|command| {
            commands.get(command).copied().ok_or_else(|| {
              Error::InvalidConfig(format!("scenario {name} refers to unknown command {command}"))
            })
          })
          .collect::<Result<Vec<_>>>()?;
        Ok((name.clone(), Scenario::new(blind, sequence)))
      })
      .collect::<Result<BTreeMap<_, _>>>()?;

    Ok(Self { blinds: config.blinds.clone(), commands, scenarios })
  }

  pub fn blinds(&self) -> &BTreeMap<String, BlindPins> {
    &self.blinds
  }

  pub fn commands(&self) -> &BTreeMap<String, Command> {
    &self.commands
  }

  pub fn scenarios(&self) -> &BTreeMap<String, Scenario> {
    &self.scenarios
  }

  /// Every channel of every blind.
  pub fn channels(&self) -> impl Iterator<Item = u8> + '_ {
    self.blinds.values().flat_map(|pins| pins.channels())
  }

  /// Resolves an invocation argument without touching any relay.
  pub fn resolve(&self, token: &str) -> Result<Action<'_>> {
    match token {
      "off" => Ok(Action::Off),
      "status" => Ok(Action::Status),
      name => self.scenarios.get(name).map(Action::Run).ok_or_else(|| Error::InvalidScenario(name.to_owned())),
    }
  }

  /// Exports and configures every channel that is not yet available.
  pub fn initialize(&self, gpio: &mut impl RelayChannels, delay: &mut impl DelayNs) -> Result<()> {
    for channel in self.channels() {
      gpio.initialize_channel(channel, delay)?;
    }
    Ok(())
  }

  pub fn dispatch(&self, action: Action<'_>, gpio: &mut impl RelayChannels, delay: &mut impl DelayNs) -> Result<Outcome> {
    match action {
      Action::Off => {
        self.all_off(gpio)?;
        Ok(Outcome::Done)
      },
      Action::Status => Ok(Outcome::Status(self.any_enabled(gpio)?)),
      Action::Run(scenario) => {
        scenario.run(gpio, delay)?;
        Ok(Outcome::Done)
      },
    }
  }

  /// Resolves `token`, initializes all channels and dispatches the resulting action.
  pub fn execute(&self, token: &str, gpio: &mut impl RelayChannels, delay: &mut impl DelayNs) -> Result<Outcome> {
    let action = self.resolve(token)?;
    self.initialize(gpio, delay)?;
    self.dispatch(action, gpio, delay)
  }

  /// Disables every channel, even if disabling an earlier one fails.
  fn all_off(&self, gpio: &mut impl RelayChannels) -> Result<()> {
    let mut result = Ok(());

    for channel in self.channels() {
      log::debug!("Disabling GPIO{channel}.");
      if let Err(err) = gpio.disable(channel) {
        log::error!("Failed to disable GPIO{channel}: {err}");
        if result.is_ok() {
          result = Err(err);
        }
      }
    }

    result
  }

  fn any_enabled(&self, gpio: &mut impl RelayChannels) -> Result<bool> {
    for channel in self.channels() {
      if gpio.is_enabled(channel)? {
        log::debug!("GPIO{channel} is enabled.");
        return Ok(true);
      }
    }
    Ok(false)
  }
}
