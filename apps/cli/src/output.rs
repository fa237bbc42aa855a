//! Text and JSON renderings of a device list
//!
//! Both renderers write to any `io::Write` so they can be exercised
//! against an in-memory buffer.

use std::io::{self, Write};

use devprobe_audio_core::{
    connection_type_to_string, device_type_to_string, AudioDevice, CoreAudioDetails,
};
use serde::Serialize;

/// JSON document consumed by front ends
#[derive(Debug, Serialize)]
pub struct DeviceReport<'a> {
    pub devices: &'a [AudioDevice],
    pub count: usize,
}

impl<'a> DeviceReport<'a> {
    pub fn new(devices: &'a [AudioDevice]) -> Self {
        Self {
            devices,
            count: devices.len(),
        }
    }
}

pub fn write_json<W: Write>(out: &mut W, devices: &[AudioDevice]) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, &DeviceReport::new(devices))?;
    writeln!(out)?;
    Ok(())
}

pub fn write_text<W: Write>(out: &mut W, devices: &[AudioDevice]) -> io::Result<()> {
    writeln!(out, "Found {} audio output device(s):", devices.len())?;
    writeln!(out)?;

    for (i, device) in devices.iter().enumerate() {
        writeln!(out, "Device {}:", i + 1)?;
        writeln!(out, "  Name: {}", device.name)?;
        writeln!(out, "  ID: {}", device.id)?;
        writeln!(out, "  Type: {}", device_type_to_string(device.device_type))?;
        writeln!(out, "  Connection: {}", connection_type_to_string(device.connection))?;
        if device.is_default {
            writeln!(out, "  [DEFAULT DEVICE]")?;
        }
        if let Some(details) = &device.details {
            write_details(out, details)?;
        }
        writeln!(out)?;
    }

    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn write_details<W: Write>(out: &mut W, details: &CoreAudioDetails) -> io::Result<()> {
    writeln!(out, "  Manufacturer: {}", details.manufacturer)?;
    writeln!(out, "  Model: {}", details.model)?;
    writeln!(out, "  Serial Number: {}", details.serial_number)?;
    writeln!(out, "  Transport: {}", details.transport_type)?;
    writeln!(out, "  Device Handle: {}", details.device_id_numeric)?;
    writeln!(out, "  Sample Rate: {} Hz", details.sample_rate)?;
    writeln!(
        out,
        "  Channels: {} out / {} in",
        details.output_channels, details.input_channels
    )?;
    writeln!(out, "  Volume: {:.0}%", details.volume * 100.0)?;
    writeln!(out, "  Muted: {}", yes_no(details.is_muted))?;
    writeln!(out, "  Alive: {}", yes_no(details.is_alive))?;
    writeln!(out, "  Running: {}", yes_no(details.is_running))?;
    writeln!(out, "  Data Source: {}", details.data_source)?;
    writeln!(out, "  Clock Source: {}", details.clock_source)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use devprobe_audio_core::{ConnectionType, DeviceType};

    fn speakers() -> AudioDevice {
        AudioDevice {
            device_type: DeviceType::Speakers,
            connection: ConnectionType::BuiltIn,
            is_default: true,
            ..AudioDevice::new("Speakers (Realtek)".to_string(), "{0.0.0}.{abc}".to_string())
        }
    }

    fn render_text(devices: &[AudioDevice]) -> String {
        let mut buf = Vec::new();
        write_text(&mut buf, devices).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn render_json(devices: &[AudioDevice]) -> serde_json::Value {
        let mut buf = Vec::new();
        write_json(&mut buf, devices).unwrap();
        serde_json::from_slice(&buf).unwrap()
    }

    #[test]
    fn test_text_layout() {
        let text = render_text(&[speakers()]);
        assert!(text.starts_with("Found 1 audio output device(s):\n\nDevice 1:\n"));
        assert!(text.contains("  Name: Speakers (Realtek)\n"));
        assert!(text.contains("  ID: {0.0.0}.{abc}\n"));
        assert!(text.contains("  Type: Speakers\n"));
        assert!(text.contains("  Connection: Built-in\n"));
        assert!(text.contains("  [DEFAULT DEVICE]\n"));
        assert!(!text.contains("Manufacturer"));
    }

    #[test]
    fn test_text_empty() {
        assert_eq!(render_text(&[]), "Found 0 audio output device(s):\n\n");
    }

    #[test]
    fn test_text_details() {
        let device = AudioDevice {
            details: Some(CoreAudioDetails {
                manufacturer: "Apple Inc.".to_string(),
                sample_rate: 48000,
                output_channels: 2,
                volume: 0.5,
                ..CoreAudioDetails::default()
            }),
            ..speakers()
        };
        let text = render_text(&[device]);
        assert!(text.contains("  Manufacturer: Apple Inc.\n"));
        assert!(text.contains("  Sample Rate: 48000 Hz\n"));
        assert!(text.contains("  Channels: 2 out / 0 in\n"));
        assert!(text.contains("  Volume: 50%\n"));
        assert!(text.contains("  Muted: no\n"));
    }

    #[test]
    fn test_json_empty() {
        let value = render_json(&[]);
        assert_eq!(value, serde_json::json!({ "devices": [], "count": 0 }));
    }

    struct UnavailableBackend;

    impl devprobe_audio_core::DeviceEnumerator for UnavailableBackend {
        fn name(&self) -> &'static str {
            "unavailable"
        }

        fn enumerate(
            &self,
            _options: &devprobe_audio_core::EnumerationOptions,
        ) -> Result<devprobe_audio_core::DeviceList, devprobe_audio_core::AudioError> {
            Err(devprobe_audio_core::AudioError::SubsystemInit(
                "audio service not running".to_string(),
            ))
        }
    }

    #[test]
    fn test_failed_enumeration_reports_empty_json() {
        use devprobe_audio_core::{DeviceEnumerator, EnumerationOptions};

        let list = UnavailableBackend.enumerate_or_empty(&EnumerationOptions::default());
        assert_eq!(render_json(&list.devices), serde_json::json!({ "devices": [], "count": 0 }));
        assert_eq!(render_text(&list.devices), "Found 0 audio output device(s):\n\n");
    }

    #[test]
    fn test_json_fields() {
        let other = AudioDevice {
            device_type: DeviceType::Usb,
            connection: ConnectionType::Wired,
            ..AudioDevice::new("USB DAC".to_string(), "hw:1,0".to_string())
        };
        let value = render_json(&[speakers(), other]);

        assert_eq!(value["count"], 2);
        assert_eq!(value["devices"][0]["type"], "Speakers");
        assert_eq!(value["devices"][0]["connection"], "Built-in");
        assert_eq!(value["devices"][0]["is_default"], true);
        assert_eq!(value["devices"][1]["type"], "USB Audio");
        assert_eq!(value["devices"][1]["is_default"], false);
        assert!(value["devices"][1].get("manufacturer").is_none());
    }

    #[test]
    fn test_json_escaping() {
        let name = "Quote \" back\\slash\nnew\rret\ttab \u{1}";
        let device = AudioDevice::new(name.to_string(), "id".to_string());

        let mut buf = Vec::new();
        write_json(&mut buf, &[device]).unwrap();
        let raw = String::from_utf8(buf.clone()).unwrap();
        assert!(raw.contains(r#"Quote \" back\\slash\nnew\rret\ttab \u0001"#));

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["devices"][0]["name"], name);
    }
}
