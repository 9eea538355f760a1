use std::time::Duration;

use embedded_hal::delay::DelayNs;

use crate::{command::sleep, BlindPins, Command, RelayChannels, Result};

/// Pause between two consecutive commands of a scenario.
pub const COMMAND_PAUSE: Duration = Duration::from_secs(1);

/// An ordered sequence of commands applied to one blind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
  blind: BlindPins,
  commands: Vec<Command>,
}

impl Scenario {
  pub fn new(blind: BlindPins, commands: Vec<Command>) -> Self {
    Self { blind, commands }
  }

  pub fn blind(&self) -> &BlindPins {
    &self.blind
  }

  pub fn commands(&self) -> &[Command] {
    &self.commands
  }

  /// Runs every command in order.
  ///
  /// The first failure aborts the remaining commands. Before the error is returned both channels of this
  /// scenario's blind are disabled on a best-effort basis, so a failure never leaves this blind's motor energized
  /// if the hardware still accepts writes.
  pub fn run(&self, gpio: &mut impl RelayChannels, delay: &mut impl DelayNs) -> Result<()> {
    for (i, command) in self.commands.iter().enumerate() {
      if i > 0 {
        sleep(delay, COMMAND_PAUSE);
      }

      if let Err(err) = command.run(gpio, &self.blind, delay) {
        self.release(gpio);
        return Err(err);
      }
    }

    Ok(())
  }

  fn release(&self, gpio: &mut impl RelayChannels) {
    for channel in self.blind.channels() {
      if let Err(err) = gpio.disable(channel) {
        log::error!("Failed to release GPIO{channel}: {err}");
      }
    }
  }
}
