use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of an output device, as far as the OS and its name let us tell
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DeviceType {
    #[default]
    #[serde(rename = "Unknown")]
    Unknown,
    #[serde(rename = "Speakers")]
    Speakers,
    #[serde(rename = "Headphones")]
    Headphones,
    #[serde(rename = "HDMI")]
    Hdmi,
    #[serde(rename = "USB Audio")]
    Usb,
    #[serde(rename = "Bluetooth")]
    Bluetooth,
    #[serde(rename = "Virtual")]
    Virtual,
}

impl DeviceType {
    pub fn label(self) -> &'static str {
        match self {
            DeviceType::Speakers => "Speakers",
            DeviceType::Headphones => "Headphones",
            DeviceType::Hdmi => "HDMI",
            DeviceType::Usb => "USB Audio",
            DeviceType::Bluetooth => "Bluetooth",
            DeviceType::Virtual => "Virtual",
            DeviceType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Physical connection medium of an output device
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ConnectionType {
    #[default]
    #[serde(rename = "Unknown")]
    Unknown,
    #[serde(rename = "Built-in")]
    BuiltIn,
    #[serde(rename = "Wired")]
    Wired,
    #[serde(rename = "Wireless")]
    Wireless,
}

impl ConnectionType {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionType::BuiltIn => "Built-in",
            ConnectionType::Wired => "Wired",
            ConnectionType::Wireless => "Wireless",
            ConnectionType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Human-readable label for a device type
pub fn device_type_to_string(device_type: DeviceType) -> &'static str {
    device_type.label()
}

/// Human-readable label for a connection type
pub fn connection_type_to_string(connection: ConnectionType) -> &'static str {
    connection.label()
}

/// Extended telemetry only CoreAudio reports
///
/// String fields hold `"Unknown"` when the property could not be read;
/// numeric and boolean fields hold zero/false.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoreAudioDetails {
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub is_alive: bool,
    pub is_running: bool,
    pub input_channels: u32,
    pub output_channels: u32,
    pub sample_rate: u32,
    pub volume: f32,
    pub is_muted: bool,
    pub device_id_numeric: u32,
    pub transport_type: String,
    pub data_source: String,
    pub clock_source: String,
}

impl Default for CoreAudioDetails {
    fn default() -> Self {
        let unknown = || "Unknown".to_string();
        Self {
            manufacturer: unknown(),
            model: unknown(),
            serial_number: unknown(),
            is_alive: false,
            is_running: false,
            input_channels: 0,
            output_channels: 0,
            sample_rate: 0,
            volume: 0.0,
            is_muted: false,
            device_id_numeric: 0,
            transport_type: unknown(),
            data_source: unknown(),
            clock_source: unknown(),
        }
    }
}

/// One audio output device as reported by the platform enumerator
///
/// `name` and `id` are empty when the OS query for them failed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AudioDevice {
    pub name: String,
    pub id: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub connection: ConnectionType,
    pub is_default: bool,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub details: Option<CoreAudioDetails>,
}

impl AudioDevice {
    pub fn new(name: String, id: String) -> Self {
        Self {
            name,
            id,
            ..Self::default()
        }
    }

    pub fn with_classification(mut self, classification: crate::Classification) -> Self {
        self.device_type = classification.device_type;
        self.connection = classification.connection;
        self
    }
}
