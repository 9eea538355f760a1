//! Recording stand-ins for relay hardware and timing.

use std::{cell::RefCell, collections::BTreeSet, io, rc::Rc, time::Duration};

use embedded_hal::delay::DelayNs;

use crate::{Error, RelayChannels, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
  Export(u8),
  Enable(u8),
  Disable(u8),
  Read(u8),
  Delay(Duration),
}

type Log = Rc<RefCell<Vec<Event>>>;

#[derive(Debug, Default)]
pub struct RecordingDelay {
  log: Log,
}

impl RecordingDelay {
  pub fn events(&self) -> Vec<Event> {
    self.log.borrow().clone()
  }

  pub fn total(&self) -> Duration {
    self.log.borrow().iter().filter_map(|event| if let Event::Delay(d) = event { Some(*d) } else { None }).sum()
  }

  fn record(&mut self, duration: Duration) {
    self.log.borrow_mut().push(Event::Delay(duration));
  }
}

impl DelayNs for RecordingDelay {
  fn delay_ns(&mut self, ns: u32) {
    self.record(Duration::from_nanos(ns.into()))
  }

  fn delay_us(&mut self, us: u32) {
    self.record(Duration::from_micros(us.into()))
  }

  fn delay_ms(&mut self, ms: u32) {
    self.record(Duration::from_millis(ms.into()))
  }
}

/// In-memory relay board that records every operation.
///
/// Exporting a channel twice is an error, like on a real GPIO pseudo-filesystem.
#[derive(Debug, Default)]
pub struct MockGpio {
  log: Log,
  exported: BTreeSet<u8>,
  enabled: BTreeSet<u8>,
  broken: BTreeSet<u8>,
}

impl MockGpio {
  pub fn with_exported(channels: impl IntoIterator<Item = u8>) -> Self {
    Self { exported: channels.into_iter().collect(), ..Default::default() }
  }

  /// A delay sharing this board's event log.
  pub fn delay(&self) -> RecordingDelay {
    RecordingDelay { log: self.log.clone() }
  }

  /// Makes every write to `channel` fail.
  pub fn break_channel(&mut self, channel: u8) {
    self.broken.insert(channel);
  }

  pub fn set_enabled(&mut self, channel: u8) {
    self.enabled.insert(channel);
  }

  pub fn enabled(&self) -> &BTreeSet<u8> {
    &self.enabled
  }

  pub fn events(&self) -> Vec<Event> {
    self.log.borrow().clone()
  }

  pub fn clear_events(&self) {
    self.log.borrow_mut().clear();
  }

  fn export(&mut self, channel: u8) -> Result<()> {
    if !self.exported.insert(channel) {
      return Err(Error::Io {
        path: format!("gpio{channel}").into(),
        source: io::Error::new(io::ErrorKind::AlreadyExists, "channel already exported"),
      });
    }
    self.log.borrow_mut().push(Event::Export(channel));
    Ok(())
  }

  fn check(&self, channel: u8) -> Result<()> {
    if self.broken.contains(&channel) || !self.exported.contains(&channel) {
      return Err(Error::Io {
        path: format!("gpio{channel}/value").into(),
        source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
      });
    }
    Ok(())
  }
}

impl RelayChannels for MockGpio {
  fn channel_exists(&self, channel: u8) -> Result<bool> {
    Ok(self.exported.contains(&channel))
  }

  fn initialize_channel(&mut self, channel: u8, delay: &mut impl DelayNs) -> Result<()> {
    if self.channel_exists(channel)? {
      return Ok(());
    }
    self.export(channel)?;
    delay.delay_ms(500);
    self.disable(channel)
  }

  fn enable(&mut self, channel: u8) -> Result<()> {
    self.check(channel)?;
    self.log.borrow_mut().push(Event::Enable(channel));
    self.enabled.insert(channel);
    Ok(())
  }

  fn disable(&mut self, channel: u8) -> Result<()> {
    self.check(channel)?;
    self.log.borrow_mut().push(Event::Disable(channel));
    self.enabled.remove(&channel);
    Ok(())
  }

  fn is_enabled(&mut self, channel: u8) -> Result<bool> {
    self.check(channel)?;
    self.log.borrow_mut().push(Event::Read(channel));
    Ok(self.enabled.contains(&channel))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn double_export_fails() {
    let mut gpio = MockGpio::default();
    gpio.export(13).unwrap();
    assert!(matches!(gpio.export(13), Err(Error::Io { .. })));
  }

  #[test]
  fn initialize_is_idempotent() {
    let mut gpio = MockGpio::default();
    let mut delay = gpio.delay();
    gpio.initialize_channel(13, &mut delay).unwrap();
    gpio.initialize_channel(13, &mut delay).unwrap();

    assert_eq!(gpio.events(), [Event::Export(13), Event::Delay(Duration::from_millis(500)), Event::Disable(13)]);
  }
}
