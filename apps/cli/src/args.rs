//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};

/// devprobe - audio output device inspector
///
/// Lists the audio output devices of this machine with their type,
/// connection and default status. Run `devprobe monitor` on Windows to
/// watch the level of the default output device.
#[derive(Parser, Debug)]
#[command(name = "devprobe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print the device list as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Stop after this many devices
    #[arg(long, value_name = "N")]
    pub max_devices: Option<usize>,

    /// Log per-device detail on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a live level bar for the default output device
    Monitor(MonitorArgs),
}

#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// Milliseconds between two meter readings [default: 100]
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: Option<u64>,
}
