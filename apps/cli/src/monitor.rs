//! Live level bar for the default output device

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use devprobe_audio_core::{AudioDevice, LevelReading};
use futures::StreamExt;

use crate::platform;

/// Width of the level bar in characters
const BAR_WIDTH: usize = 50;

// Save the cursor after the header, then restore and clear below it on
// every redraw.
const SAVE_CURSOR: &str = "\x1b[s";
const REDRAW: &str = "\x1b[u\x1b[J";

pub fn run(interval: Option<Duration>) -> Result<()> {
    let mut stream = platform::start_monitor(interval).context("Failed to start level monitor")?;

    let stop = stream.stop_handle();
    ctrlc::set_handler(move || stop.stop()).context("Failed to set Ctrl+C handler")?;

    let device = match platform::default_output_device() {
        Ok(device) => Some(device),
        Err(e) => {
            tracing::warn!("Could not describe the default output device: {}", e);
            None
        }
    };

    let mut stdout = io::stdout();
    write!(stdout, "{}{}", render_header(device.as_ref()), SAVE_CURSOR)?;
    stdout.flush()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build runtime")?;

    runtime.block_on(async {
        while let Some(reading) = stream.next().await {
            write!(stdout, "{}{}", REDRAW, render_frame(&reading))?;
            stdout.flush()?;
        }
        Ok::<_, io::Error>(())
    })?;

    writeln!(stdout, "\nMonitoring stopped.")?;
    Ok(())
}

fn render_header(device: Option<&AudioDevice>) -> String {
    let mut header = String::from("=== AUDIO OUTPUT LEVEL MONITOR ===\n");
    match device {
        Some(device) => {
            header.push_str(&format!("Device: {}\n", device.name));
            header.push_str(&format!("ID: {}\n", device.id));
            header.push_str(&format!(
                "Type: {} ({})\n",
                device.device_type, device.connection
            ));
        }
        None => header.push_str("Device: default output\n"),
    }
    header.push_str("Press Ctrl+C to stop monitoring...\n\n");
    header
}

fn render_frame(reading: &LevelReading) -> String {
    let status = if reading.is_audible() {
        "Audio is playing!"
    } else {
        "No audio detected."
    };
    format!(
        "Current audio level: {:.2}%\n{}\n\nAudio Level: [{}] {:.1}%\n",
        reading.percent(),
        status,
        reading.bar(BAR_WIDTH),
        reading.percent()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use devprobe_audio_core::{ConnectionType, DeviceType};

    #[test]
    fn test_frame_silent() {
        let frame = render_frame(&LevelReading::new(0.0));
        assert!(frame.starts_with("Current audio level: 0.00%\nNo audio detected.\n"));
        assert!(frame.contains(&format!("[{}] 0.0%", "-".repeat(BAR_WIDTH))));
    }

    #[test]
    fn test_frame_playing() {
        let frame = render_frame(&LevelReading::new(0.5));
        assert!(frame.contains("Current audio level: 50.00%"));
        assert!(frame.contains("Audio is playing!"));
        let bar = format!("[{}{}] 50.0%", "#".repeat(25), "-".repeat(25));
        assert!(frame.contains(&bar));
    }

    #[test]
    fn test_frame_threshold() {
        assert!(render_frame(&LevelReading::new(0.01)).contains("No audio detected."));
        assert!(render_frame(&LevelReading::new(0.02)).contains("Audio is playing!"));
    }

    #[test]
    fn test_header() {
        let device = AudioDevice {
            device_type: DeviceType::Headphones,
            connection: ConnectionType::Wireless,
            ..AudioDevice::new("WH-1000XM4".to_string(), "{0.0.0}.{bt}".to_string())
        };
        let header = render_header(Some(&device));
        assert!(header.starts_with("=== AUDIO OUTPUT LEVEL MONITOR ===\n"));
        assert!(header.contains("Device: WH-1000XM4\n"));
        assert!(header.contains("Type: Headphones (Wireless)\n"));
        assert!(header.ends_with("Press Ctrl+C to stop monitoring...\n\n"));

        assert!(render_header(None).contains("Device: default output\n"));
    }
}
