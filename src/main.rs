use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, ValueEnum};
use rppal::hal::Delay;

use blinds_relay::{
  config::DEFAULT_DEVICE, gpio::DEFAULT_SYSFS_ROOT, DeviceConfig, Outcome, Registry, RelayChannels, SysfsGpio,
  WaveshareRelay,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Backend {
  /// GPIO pseudo-filesystem
  Sysfs,
  /// Direct register access
  Rppal,
}

#[derive(Parser)]
#[command(name = "blinds-relay", version, about = "Drive motorized blinds through a relay board")]
struct Cli {
  /// Device profile with the pin mapping and scenarios of this deployment
  #[arg(long, env = "BLINDS_DEVICE", default_value = DEFAULT_DEVICE)]
  device: String,

  /// How the relays are driven
  #[arg(long, env = "BLINDS_BACKEND", value_enum, default_value_t = Backend::Sysfs)]
  backend: Backend,

  /// Root of the GPIO pseudo-filesystem
  #[arg(long, env = "BLINDS_GPIO_ROOT", default_value = DEFAULT_SYSFS_ROOT)]
  gpio_root: PathBuf,

  /// Print the scenarios of the device and exit
  #[arg(long)]
  list: bool,

  /// `off`, `status` or a scenario name
  #[arg(required_unless_present = "list")]
  action: Option<String>,
}

fn run(cli: Cli) -> blinds_relay::Result<()> {
  let config = DeviceConfig::builtin(&cli.device)?;
  let registry = Registry::from_config(&config)?;

  if cli.list {
    for name in registry.scenarios().keys() {
      println!("{name}");
    }
    return Ok(());
  }

  let Some(action) = cli.action else { return Ok(()) };

  // Fail on an unknown action before any relay is touched.
  registry.resolve(&action)?;

  let outcome = match cli.backend {
    Backend::Sysfs => execute(&registry, &action, SysfsGpio::new(cli.gpio_root))?,
    Backend::Rppal => execute(&registry, &action, WaveshareRelay::new()?)?,
  };

  if let Outcome::Status(enabled) = outcome {
    println!("{enabled}");
  }

  Ok(())
}

fn execute(registry: &Registry, action: &str, mut gpio: impl RelayChannels) -> blinds_relay::Result<Outcome> {
  let mut delay = Delay::new();
  log::info!("Running {action}.");
  registry.execute(action, &mut gpio, &mut delay)
}

fn main() -> ExitCode {
  env_logger::init();

  let cli = Cli::parse();

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      log::error!("{err}");
      eprintln!("Error: {err}");
      ExitCode::FAILURE
    },
  }
}
