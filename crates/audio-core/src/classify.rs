//! Device type and connection classification
//!
//! Each platform reports a different structured hint about how a device is
//! attached: an endpoint form factor on Windows, a transport type on macOS,
//! and nothing but driver and device names on Linux. The tables here turn
//! those hints into a [`Classification`], and [`apply_name_heuristics`]
//! refines the result from the device's display name.

use crate::device::{ConnectionType, DeviceType};

const HEADPHONE_KEYWORDS: &[&str] = &["headphone", "headset", "earphone", "earbuds"];
const BLUETOOTH_KEYWORDS: &[&str] = &["bluetooth", "airpods"];

/// Bluetooth enumerator tag found in Windows device instance paths
const WINDOWS_BLUETOOTH_TAG: &str = "bthenum";
const USB_TAG: &str = "usb";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    pub device_type: DeviceType,
    pub connection: ConnectionType,
}

impl Classification {
    pub const fn new(device_type: DeviceType, connection: ConnectionType) -> Self {
        Self {
            device_type,
            connection,
        }
    }
}

/// Map a Windows `EndpointFormFactor` value
pub fn from_form_factor(form_factor: u32) -> Classification {
    use ConnectionType::*;
    use DeviceType::*;

    match form_factor {
        // RemoteNetworkDevice
        0 => Classification::new(Speakers, Wireless),
        1 => Classification::new(Speakers, BuiltIn),
        // LineLevel
        2 => Classification::new(Speakers, Wired),
        3 => Classification::new(Headphones, Wired),
        // Microphone
        4 => Classification::new(Speakers, Wired),
        // Headset, Handset
        5 | 6 => Classification::new(Headphones, Wired),
        // UnknownDigitalPassthrough
        7 => Classification::new(DeviceType::Unknown, Wired),
        // SPDIF
        8 => Classification::new(Speakers, Wired),
        // DigitalAudioDisplayDevice
        9 => Classification::new(Hdmi, Wired),
        _ => Classification::default(),
    }
}

const fn fourcc(code: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*code)
}

pub const TRANSPORT_BUILT_IN: u32 = fourcc(b"bltn");
pub const TRANSPORT_BLUETOOTH: u32 = fourcc(b"blue");
pub const TRANSPORT_USB: u32 = fourcc(b"usb ");
pub const TRANSPORT_THUNDERBOLT: u32 = fourcc(b"thun");
pub const TRANSPORT_AIRPLAY: u32 = fourcc(b"airp");
pub const TRANSPORT_VIRTUAL: u32 = fourcc(b"virt");
pub const TRANSPORT_DISPLAYPORT: u32 = fourcc(b"dprt");
pub const TRANSPORT_HDMI: u32 = fourcc(b"hdmi");

/// Map a CoreAudio `kAudioDevicePropertyTransportType` value
///
/// Also returns the label reported in the device's extended details.
pub fn from_transport_type(transport: u32) -> (Classification, String) {
    use ConnectionType::*;
    use DeviceType::*;

    let (classification, label) = match transport {
        TRANSPORT_BUILT_IN => (Classification::new(Speakers, BuiltIn), "Built-in"),
        TRANSPORT_BLUETOOTH => (Classification::new(Bluetooth, Wireless), "Bluetooth"),
        TRANSPORT_USB => (Classification::new(Usb, Wired), "USB"),
        TRANSPORT_THUNDERBOLT => (Classification::new(Speakers, Wired), "Thunderbolt"),
        TRANSPORT_AIRPLAY => (Classification::new(Speakers, Wireless), "AirPlay"),
        TRANSPORT_VIRTUAL => (
            Classification::new(Virtual, ConnectionType::Unknown),
            "Virtual",
        ),
        TRANSPORT_DISPLAYPORT => (Classification::new(Hdmi, Wired), "DisplayPort"),
        TRANSPORT_HDMI => (Classification::new(Hdmi, Wired), "HDMI"),
        other => return (Classification::default(), format!("Unknown ({})", other)),
    };

    (classification, label.to_string())
}

/// Classify an ALSA PCM device from its card driver and display name
///
/// First match wins; there is no structured hint on this path. Driver tags
/// are matched case-sensitively ("USB", "HDA"), names case-insensitively.
pub fn from_alsa(driver: &str, name: &str) -> Classification {
    use ConnectionType::*;
    use DeviceType::*;

    let name = name.to_lowercase();

    if name.contains("hdmi") {
        Classification::new(Hdmi, Wired)
    } else if driver.contains("USB") || name.contains(USB_TAG) {
        Classification::new(Usb, Wired)
    } else if name.contains("bluetooth") {
        Classification::new(Bluetooth, Wireless)
    } else if name.contains("headphone") {
        Classification::new(Headphones, Wired)
    } else if driver.contains("HDA") {
        Classification::new(Speakers, BuiltIn)
    } else {
        Classification::new(Speakers, ConnectionType::Unknown)
    }
}

/// Refine a structured classification from the device name and, on
/// Windows, its identifier
///
/// Order matters and the last match wins: headphone keywords, then
/// Bluetooth keywords, then USB. A USB device whose name also carries a
/// headphone keyword stays headphones.
pub fn apply_name_heuristics(base: Classification, name: &str, id: Option<&str>) -> Classification {
    let name = name.to_lowercase();
    let id = id.map(str::to_lowercase).unwrap_or_default();
    let mut result = base;

    let is_headphone = contains_any(&name, HEADPHONE_KEYWORDS);
    if is_headphone {
        result.device_type = DeviceType::Headphones;
        if result.connection == ConnectionType::Unknown {
            result.connection = ConnectionType::Wired;
        }
    }

    if contains_any(&name, BLUETOOTH_KEYWORDS) || id.contains(WINDOWS_BLUETOOTH_TAG) {
        result.device_type = DeviceType::Bluetooth;
        result.connection = ConnectionType::Wireless;
    } else if name.contains(USB_TAG) || id.contains(USB_TAG) {
        result.device_type = if is_headphone {
            DeviceType::Headphones
        } else {
            DeviceType::Usb
        };
        result.connection = ConnectionType::Wired;
    }

    result
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unknown() -> Classification {
        Classification::default()
    }

    #[test]
    fn test_form_factor_table() {
        assert_eq!(
            from_form_factor(1),
            Classification::new(DeviceType::Speakers, ConnectionType::BuiltIn)
        );
        assert_eq!(
            from_form_factor(3),
            Classification::new(DeviceType::Headphones, ConnectionType::Wired)
        );
        assert_eq!(
            from_form_factor(9),
            Classification::new(DeviceType::Hdmi, ConnectionType::Wired)
        );
        assert_eq!(
            from_form_factor(0),
            Classification::new(DeviceType::Speakers, ConnectionType::Wireless)
        );
        assert_eq!(
            from_form_factor(7),
            Classification::new(DeviceType::Unknown, ConnectionType::Wired)
        );
        assert_eq!(from_form_factor(10), unknown());
        assert_eq!(from_form_factor(4242), unknown());
    }

    #[test]
    fn test_transport_type_table() {
        let (class, label) = from_transport_type(TRANSPORT_BUILT_IN);
        assert_eq!(class, Classification::new(DeviceType::Speakers, ConnectionType::BuiltIn));
        assert_eq!(label, "Built-in");

        let (class, label) = from_transport_type(TRANSPORT_VIRTUAL);
        assert_eq!(class, Classification::new(DeviceType::Virtual, ConnectionType::Unknown));
        assert_eq!(label, "Virtual");

        let (class, label) = from_transport_type(TRANSPORT_DISPLAYPORT);
        assert_eq!(class.device_type, DeviceType::Hdmi);
        assert_eq!(label, "DisplayPort");
    }

    #[test]
    fn test_transport_type_unknown_label_carries_value() {
        let (class, label) = from_transport_type(7);
        assert_eq!(class, unknown());
        assert_eq!(label, "Unknown (7)");
    }

    #[test]
    fn test_transport_fourcc_values() {
        // kAudioDeviceTransportTypeBuiltIn = 'bltn'
        assert_eq!(TRANSPORT_BUILT_IN, 0x626C_746E);
        assert_eq!(TRANSPORT_USB, 0x7573_6220);
    }

    #[test]
    fn test_usb_headphones_stay_headphones() {
        let result = apply_name_heuristics(unknown(), "USB Headphones", None);
        assert_eq!(result.device_type, DeviceType::Headphones);
        assert_eq!(result.connection, ConnectionType::Wired);
    }

    #[test]
    fn test_airpods_override_structured_transport() {
        let wired_usb = Classification::new(DeviceType::Usb, ConnectionType::Wired);
        let result = apply_name_heuristics(wired_usb, "AirPods Pro", None);
        assert_eq!(result.device_type, DeviceType::Bluetooth);
        assert_eq!(result.connection, ConnectionType::Wireless);

        let built_in = Classification::new(DeviceType::Speakers, ConnectionType::BuiltIn);
        let result = apply_name_heuristics(built_in, "AirPods Pro", None);
        assert_eq!(result, Classification::new(DeviceType::Bluetooth, ConnectionType::Wireless));
    }

    #[test]
    fn test_bluetooth_headphones_end_up_bluetooth() {
        let result = apply_name_heuristics(unknown(), "Bluetooth Headphones", None);
        assert_eq!(result, Classification::new(DeviceType::Bluetooth, ConnectionType::Wireless));
    }

    #[test]
    fn test_headphone_keeps_known_connection() {
        let wireless = Classification::new(DeviceType::Speakers, ConnectionType::Wireless);
        let result = apply_name_heuristics(wireless, "Studio Headset", None);
        assert_eq!(result, Classification::new(DeviceType::Headphones, ConnectionType::Wireless));
    }

    #[test]
    fn test_windows_id_tags() {
        let result = apply_name_heuristics(
            unknown(),
            "Speakers",
            Some(r"{0.0.0.00000000}.BTHENUM\{0000110B}"),
        );
        assert_eq!(result.device_type, DeviceType::Bluetooth);

        let result = apply_name_heuristics(unknown(), "Speakers", Some(r"SWD\MMDEVAPI\USB#VID_046D"));
        assert_eq!(result, Classification::new(DeviceType::Usb, ConnectionType::Wired));
    }

    #[test]
    fn test_plain_name_leaves_structured_value() {
        let hdmi = Classification::new(DeviceType::Hdmi, ConnectionType::Wired);
        assert_eq!(apply_name_heuristics(hdmi, "LG ULTRAFINE", Some("{0.0.0.00000000}.{1234}")), hdmi);
    }

    #[test]
    fn test_alsa_hda_without_keywords_is_builtin_speakers() {
        let result = from_alsa("HDA-Intel", "HDA Intel PCH - ALC257 Analog");
        assert_eq!(result, Classification::new(DeviceType::Speakers, ConnectionType::BuiltIn));
    }

    #[test]
    fn test_alsa_first_match_wins() {
        assert_eq!(from_alsa("HDA-Intel", "HDA Intel PCH - HDMI 0").device_type, DeviceType::Hdmi);
        assert_eq!(from_alsa("USB-Audio", "Scarlett 2i2 - USB Audio").device_type, DeviceType::Usb);
        assert_eq!(
            from_alsa("snd_soc", "Bluetooth Speaker - PCM"),
            Classification::new(DeviceType::Bluetooth, ConnectionType::Wireless)
        );
        assert_eq!(
            from_alsa("snd_soc", "Board - Headphone Out"),
            Classification::new(DeviceType::Headphones, ConnectionType::Wired)
        );
        assert_eq!(
            from_alsa("Loopback", "Loopback - Loopback PCM"),
            Classification::new(DeviceType::Speakers, ConnectionType::Unknown)
        );
    }

    #[test]
    fn test_alsa_driver_tags_are_case_sensitive() {
        assert_eq!(
            from_alsa("sof-hda-dsp", "sof-hda-dsp - Analog Analog (*)"),
            Classification::new(DeviceType::Speakers, ConnectionType::Unknown)
        );
        assert_eq!(
            from_alsa("snd-usb-caiaq", "Traktor Audio - PCM"),
            Classification::new(DeviceType::Speakers, ConnectionType::Unknown)
        );
        assert_eq!(from_alsa("USB-Audio", "Scarlett 2i2 - PCM").device_type, DeviceType::Usb);
        assert_eq!(from_alsa("snd_soc", "Dock - usb out").device_type, DeviceType::Usb);
    }
}
