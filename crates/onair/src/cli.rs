//! Clap derive structures for the `onair` daemon.

use std::path::PathBuf;

use clap::Parser;

/// onair -- light up while the camera is rolling
#[derive(Debug, Parser)]
#[command(
    name = "onair",
    version,
    about = "Turn a Hue light into an on-air sign while your webcam is in use",
    long_about = "Watches for webcam activity and switches the configured light to a fixed\n\
        on-air look while the camera is in use, restoring its previous color and\n\
        brightness afterwards.\n\n\
        Runs until interrupted (Ctrl-C / SIGTERM)."
)]
pub struct Cli {
    /// Config file path (defaults to the platform config directory)
    #[arg(long, short = 'c', env = "ONAIR_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Name of the light to drive (overrides light.name)
    #[arg(long, short = 'l', value_name = "NAME")]
    pub light: Option<String>,

    /// Poll interval in milliseconds (overrides poll_interval_ms)
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: Option<u64>,
}
