use std::time::Duration;

use embedded_hal::delay::DelayNs;

use crate::{BlindPins, Direction, RelayChannels, Result};

/// How long the opposite relay is pulsed after every move to reset the motor direction latch.
pub const RELEASE_PULSE: Duration = Duration::from_millis(500);

/// A single timed drive of one blind in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
  pub direction: Direction,
  pub enable_duration: Duration,
}

impl Command {
  pub fn new(direction: Direction, enable_duration: Duration) -> Self {
    Self { direction, enable_duration }
  }

  pub fn run(&self, gpio: &mut impl RelayChannels, blind: &BlindPins, delay: &mut impl DelayNs) -> Result<()> {
    let channel = blind.channel(self.direction);
    let opposite_channel = blind.channel(self.direction.opposite());

    log::info!("Moving {} on GPIO{channel} for {:?}.", self.direction, self.enable_duration);
    pulse(gpio, channel, self.enable_duration, delay)?;

    log::debug!("Releasing GPIO{opposite_channel}.");
    pulse(gpio, opposite_channel, RELEASE_PULSE, delay)
  }
}

fn pulse(gpio: &mut impl RelayChannels, channel: u8, duration: Duration, delay: &mut impl DelayNs) -> Result<()> {
  gpio.enable(channel)?;
  sleep(delay, duration);
  gpio.disable(channel)
}

/// Waits for the whole of `duration`, in as many `delay_ms` steps as needed plus any sub-millisecond rest.
pub(crate) fn sleep(delay: &mut impl DelayNs, duration: Duration) {
  let mut ms = duration.as_millis();
  while ms > 0 {
    let step = u32::try_from(ms).unwrap_or(u32::MAX);
    delay.delay_ms(step);
    ms -= u128::from(step);
  }

  let rest = duration.subsec_nanos() % 1_000_000;
  if rest % 1_000 == 0 {
    if rest > 0 {
      delay.delay_us(rest / 1_000);
    }
  } else {
    delay.delay_ns(rest);
  }
}
