use std::{
  fs::{self, OpenOptions},
  io::Write,
  path::PathBuf,
  time::Duration,
};

use embedded_hal::delay::DelayNs;

use crate::{Error, Result};

/// Time the kernel needs after an export to create the channel's control files.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/gpio";

/// A set of relay channels addressed by GPIO number.
///
/// Implementations never retry: every error leaves the affected relay in an unknown state and must be treated as
/// fatal by the caller.
pub trait RelayChannels {
  /// Whether the channel has already been made available for control.
  fn channel_exists(&self, channel: u8) -> Result<bool>;

  /// Prepares the channel for use and leaves it disabled. Does nothing if the channel already exists.
  fn initialize_channel(&mut self, channel: u8, delay: &mut impl DelayNs) -> Result<()>;

  fn enable(&mut self, channel: u8) -> Result<()>;

  fn disable(&mut self, channel: u8) -> Result<()>;

  fn is_enabled(&mut self, channel: u8) -> Result<bool>;
}

/// Relay channels driven through the kernel's GPIO pseudo-filesystem.
#[derive(Debug, Clone)]
pub struct SysfsGpio {
  root: PathBuf,
}

impl SysfsGpio {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  fn channel_root(&self, channel: u8) -> PathBuf {
    self.root.join(format!("gpio{channel}"))
  }

  /// Writes to an existing control file. A missing file is an error, never created.
  fn write(&self, path: PathBuf, contents: &str) -> Result<()> {
    log::trace!("Writing {contents:?} to {}.", path.display());
    OpenOptions::new()
      .write(true)
      .truncate(true)
      .open(&path)
      .and_then(|mut file| file.write_all(contents.as_bytes()))
      .map_err(Error::io(path))
  }

  fn set_value(&self, channel: u8, enabled: bool) -> Result<()> {
    self.write(self.channel_root(channel).join("value"), if enabled { "1" } else { "0" })
  }
}

impl Default for SysfsGpio {
  fn default() -> Self {
    Self::new(DEFAULT_SYSFS_ROOT)
  }
}

impl RelayChannels for SysfsGpio {
  fn channel_exists(&self, channel: u8) -> Result<bool> {
    Ok(self.channel_root(channel).is_dir())
  }

  fn initialize_channel(&mut self, channel: u8, delay: &mut impl DelayNs) -> Result<()> {
    if self.channel_exists(channel)? {
      log::debug!("GPIO{channel} is already exported.");
      return Ok(());
    }

    log::info!("Exporting GPIO{channel}.");
    self.write(self.root.join("export"), &channel.to_string())?;
    delay.delay_ms(SETTLE_DELAY.as_millis() as u32);

    let channel_root = self.channel_root(channel);
    self.write(channel_root.join("active_low"), "1")?;
    self.write(channel_root.join("direction"), "out")?;
    self.disable(channel)
  }

  fn enable(&mut self, channel: u8) -> Result<()> {
    self.set_value(channel, true)
  }

  fn disable(&mut self, channel: u8) -> Result<()> {
    self.set_value(channel, false)
  }

  fn is_enabled(&mut self, channel: u8) -> Result<bool> {
    let path = self.channel_root(channel).join("value");
    let value = fs::read_to_string(&path).map_err(Error::io(path))?;

    match value.trim() {
      "1" => Ok(true),
      "0" => Ok(false),
      other => Err(Error::InvalidValue { channel, value: other.to_owned() }),
    }
  }
}
