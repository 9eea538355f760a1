use std::{fmt, str::FromStr};

use serde::Deserialize;

/// Travel direction of a blind motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  Up,
  Down,
}

impl Direction {
  pub fn opposite(self) -> Self {
    match self {
      Self::Up => Self::Down,
      Self::Down => Self::Up,
    }
  }
}

impl fmt::Display for Direction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Up => "up",
      Self::Down => "down",
    })
  }
}

impl FromStr for Direction {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "up" => Ok(Self::Up),
      "down" => Ok(Self::Down),
      other => Err(format!("invalid direction: {other}")),
    }
  }
}

/// The two relay channels wired to one blind motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BlindPins {
  pub up: u8,
  pub down: u8,
}

impl BlindPins {
  pub fn channel(&self, direction: Direction) -> u8 {
    match direction {
      Direction::Up => self.up,
      Direction::Down => self.down,
    }
  }

  pub fn channels(&self) -> [u8; 2] {
    [self.up, self.down]
  }
}
