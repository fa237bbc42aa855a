mod args;
mod monitor;
mod output;
mod platform;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use devprobe_audio_core::EnumerationOptions;

use args::{Cli, Commands};

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    // stdout carries the device list; logs go to stderr.
    #[cfg(debug_assertions)]
    {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(io::stderr)
            .with_file(true)
            .with_line_number(true)
            .with_thread_ids(true)
            .init();
        tracing::debug!("Debug mode logging enabled");
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(io::stderr)
            .compact()
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Monitor(args)) => monitor::run(args.interval_ms.map(Duration::from_millis)),
        None => list(&cli),
    }
}

/// Print the device list; enumeration failures still exit with status 0
fn list(cli: &Cli) -> Result<()> {
    let options = EnumerationOptions {
        max_devices: cli.max_devices,
    };

    let enumerator = platform::enumerator();
    tracing::debug!(backend = enumerator.name(), "Enumerating output devices");
    let list = enumerator.enumerate_or_empty(&options);

    let mut stdout = io::stdout().lock();
    if cli.json {
        output::write_json(&mut stdout, &list.devices)?;
    } else {
        output::write_text(&mut stdout, &list.devices).context("Failed to write device list")?;
    }
    Ok(())
}
