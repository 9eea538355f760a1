use std::collections::BTreeMap;

use embedded_hal::delay::DelayNs;
use rppal::gpio::{self, Gpio, Mode, OutputPin, Pin};

use crate::{RelayChannels, Result};

/// GPIO numbers of the board's relays, printed next to its jumpers.
pub const CHANNELS: [u8; 8] = [
  5,  // CH1
  6,  // CH2
  13, // CH3
  16, // CH4
  19, // CH5
  20, // CH6
  21, // CH7
  26, // CH8
];

/// Waveshare RPi Relay Board driven directly through the GPIO registers.
///
/// The relays are active-low: a pin driven low energizes its relay. Claimed pins keep their level when dropped so a
/// released relay stays released after the process exits.
pub struct WaveshareRelay {
  gpio: Gpio,
  pins: BTreeMap<u8, OutputPin>,
}

impl WaveshareRelay {
  pub fn new() -> Result<Self> {
    Ok(Self { gpio: Gpio::new()?, pins: BTreeMap::new() })
  }

  fn claim(&self, channel: u8, into_output: impl FnOnce(Pin) -> OutputPin) -> Result<OutputPin> {
    if !CHANNELS.contains(&channel) {
      return Err(gpio::Error::PinNotAvailable(channel).into());
    }

    let mut pin = into_output(self.gpio.get(channel)?);
    pin.set_reset_on_drop(false);
    Ok(pin)
  }

  fn pin(&mut self, channel: u8) -> Result<&mut OutputPin> {
    let pin = match self.pins.remove(&channel) {
      Some(pin) => pin,
      // An output configured by an earlier run keeps its level.
      None => self.claim(channel, Pin::into_output)?,
    };
    Ok(self.pins.entry(channel).or_insert(pin))
  }
}

impl RelayChannels for WaveshareRelay {
  fn channel_exists(&self, channel: u8) -> Result<bool> {
    if self.pins.contains_key(&channel) {
      return Ok(true);
    }

    Ok(self.gpio.get(channel)?.mode() == Mode::Output)
  }

  fn initialize_channel(&mut self, channel: u8, _delay: &mut impl DelayNs) -> Result<()> {
    if self.channel_exists(channel)? {
      log::debug!("GPIO{channel} is already an output.");
      return Ok(());
    }

    log::info!("Configuring GPIO{channel} as output.");
    let pin = self.claim(channel, Pin::into_output_high)?;
    self.pins.insert(channel, pin);
    Ok(())
  }

  fn enable(&mut self, channel: u8) -> Result<()> {
    self.pin(channel)?.set_low();
    Ok(())
  }

  fn disable(&mut self, channel: u8) -> Result<()> {
    self.pin(channel)?.set_high();
    Ok(())
  }

  fn is_enabled(&mut self, channel: u8) -> Result<bool> {
    Ok(self.pin(channel)?.is_set_low())
  }
}
