use coreaudio_sys::*;
use devprobe_audio_core::classify;
use devprobe_audio_core::{
    AudioDevice, AudioError, CoreAudioDetails, DeviceEnumerator, DeviceList, EnumerationOptions,
};

use crate::property::{address, address_at, channel_count, get_object_list, get_string, get_value};

const GLOBAL: u32 = kAudioObjectPropertyScopeGlobal;
const OUTPUT: u32 = kAudioDevicePropertyScopeOutput;
const INPUT: u32 = kAudioDevicePropertyScopeInput;

/// Enumerates output-capable devices through the CoreAudio HAL
#[derive(Debug, Default, Clone, Copy)]
pub struct CoreAudioEnumerator;

impl DeviceEnumerator for CoreAudioEnumerator {
    fn name(&self) -> &'static str {
        "coreaudio"
    }

    fn enumerate(&self, options: &EnumerationOptions) -> Result<DeviceList, AudioError> {
        let ids = get_object_list(
            kAudioObjectSystemObject,
            &address(kAudioHardwarePropertyDevices, GLOBAL),
        )
        .map_err(|e| AudioError::EnumerationFailed(format!("Failed to list devices: {}", e)))?;

        tracing::debug!(count = ids.len(), "CoreAudio devices");

        let mut warnings = Vec::new();
        let default_id = match default_output_id() {
            Ok(id) => id,
            Err(e) => {
                warnings.push(format!("No default output device: {}", e));
                kAudioObjectUnknown
            }
        };

        let mut devices = Vec::new();
        for id in ids {
            if options.is_full(devices.len()) {
                break;
            }
            if let Some(device) = read_device(id, default_id, &mut warnings) {
                devices.push(device);
            }
        }

        for warning in &warnings {
            tracing::warn!("{}", warning);
        }

        Ok(DeviceList::finish(devices, warnings, options))
    }
}

fn default_output_id() -> Result<AudioObjectID, AudioError> {
    let id: AudioObjectID = get_value(
        kAudioObjectSystemObject,
        &address(kAudioHardwarePropertyDefaultOutputDevice, GLOBAL),
    )?;
    if id == kAudioObjectUnknown {
        return Err(AudioError::NoDeviceFound);
    }
    Ok(id)
}

/// Properties many devices simply do not implement; absence is not a warning
fn optional<T>(result: Result<T, AudioError>, device: AudioObjectID, what: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::trace!(device, "No {}: {}", what, e);
            None
        }
    }
}

fn required<T>(
    result: Result<T, AudioError>,
    device: AudioObjectID,
    what: &str,
    warnings: &mut Vec<String>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warnings.push(format!("Device {}: failed to read {}: {}", device, what, e));
            None
        }
    }
}

/// Read one device, or `None` if it has no output channels
fn read_device(
    id: AudioObjectID,
    default_id: AudioObjectID,
    warnings: &mut Vec<String>,
) -> Option<AudioDevice> {
    let output_channels = match channel_count(id, OUTPUT) {
        Ok(channels) => channels,
        Err(e) => {
            tracing::debug!(device = id, "Skipping device without output configuration: {}", e);
            return None;
        }
    };
    if output_channels == 0 {
        tracing::debug!(device = id, "Skipping capture-only device");
        return None;
    }

    let mut device = AudioDevice::default();
    let mut details = CoreAudioDetails {
        device_id_numeric: id,
        output_channels,
        ..CoreAudioDetails::default()
    };
    device.is_default = id == default_id;

    if let Some(name) = required(
        get_string(id, &address(kAudioDevicePropertyDeviceNameCFString, GLOBAL)),
        id,
        "name",
        warnings,
    ) {
        device.name = name;
    }
    if let Some(uid) = required(
        get_string(id, &address(kAudioDevicePropertyDeviceUID, GLOBAL)),
        id,
        "UID",
        warnings,
    ) {
        device.id = uid;
    }

    if let Some(manufacturer) = optional(
        get_string(id, &address(kAudioDevicePropertyDeviceManufacturerCFString, GLOBAL)),
        id,
        "manufacturer",
    ) {
        details.manufacturer = manufacturer;
    }
    if let Some(model) = optional(get_string(id, &address(kAudioDevicePropertyModelUID, GLOBAL)), id, "model") {
        details.model = model;
    }
    if let Some(serial) = optional(
        get_string(id, &address(kAudioObjectPropertySerialNumber, GLOBAL)),
        id,
        "serial number",
    ) {
        details.serial_number = serial;
    }

    if let Some(alive) = required(
        get_value::<u32>(id, &address(kAudioDevicePropertyDeviceIsAlive, GLOBAL)),
        id,
        "alive state",
        warnings,
    ) {
        details.is_alive = alive != 0;
    }
    if let Some(running) = optional(
        get_value::<u32>(id, &address(kAudioDevicePropertyDeviceIsRunning, GLOBAL)),
        id,
        "running state",
    ) {
        details.is_running = running != 0;
    }
    if let Some(rate) = required(
        get_value::<f64>(id, &address(kAudioDevicePropertyNominalSampleRate, GLOBAL)),
        id,
        "sample rate",
        warnings,
    ) {
        details.sample_rate = rate as u32;
    }

    // Devices without a master volume control expose it per channel.
    let volume = get_value::<f32>(id, &address(kAudioDevicePropertyVolumeScalar, OUTPUT))
        .or_else(|_| get_value::<f32>(id, &address_at(kAudioDevicePropertyVolumeScalar, OUTPUT, 1)));
    if let Some(volume) = optional(volume, id, "volume") {
        details.volume = volume;
    }
    if let Some(muted) = optional(get_value::<u32>(id, &address(kAudioDevicePropertyMute, OUTPUT)), id, "mute") {
        details.is_muted = muted != 0;
    }

    if let Some(inputs) = optional(channel_count(id, INPUT), id, "input configuration") {
        details.input_channels = inputs;
    }
    if let Some(source) = optional(
        get_value::<u32>(id, &address(kAudioDevicePropertyDataSource, OUTPUT)),
        id,
        "data source",
    ) {
        details.data_source = source.to_string();
    }
    if let Some(clock) = optional(
        get_value::<u32>(id, &address(kAudioDevicePropertyClockSource, OUTPUT)),
        id,
        "clock source",
    ) {
        details.clock_source = clock.to_string();
    }

    let mut structured = classify::Classification::default();
    if let Some(transport) = required(
        get_value::<u32>(id, &address(kAudioDevicePropertyTransportType, GLOBAL)),
        id,
        "transport type",
        warnings,
    ) {
        let (classification, label) = classify::from_transport_type(transport);
        structured = classification;
        details.transport_type = label;
    }

    let classification = classify::apply_name_heuristics(structured, &device.name, None);
    tracing::debug!(
        device = id,
        name = %device.name,
        transport = %details.transport_type,
        device_type = %classification.device_type,
        connection = %classification.connection,
        "Output device"
    );

    device.details = Some(details);
    Some(device.with_classification(classification))
}

/// List output-capable devices on macOS
pub fn list_devices() -> Result<DeviceList, AudioError> {
    CoreAudioEnumerator.enumerate(&EnumerationOptions::default())
}

/// List output-capable devices, or nothing if the HAL query failed
pub fn list_audio_output_devices() -> Vec<AudioDevice> {
    CoreAudioEnumerator
        .enumerate_or_empty(&EnumerationOptions::default())
        .into_devices()
}

/// The current default output device
pub fn default_output_device() -> Result<AudioDevice, AudioError> {
    let id = default_output_id()?;
    let mut warnings = Vec::new();
    let device = read_device(id, id, &mut warnings).ok_or(AudioError::NoDeviceFound)?;
    for warning in warnings {
        tracing::warn!("{}", warning);
    }
    Ok(device)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumeration_invariants() {
        let list = CoreAudioEnumerator.enumerate_or_empty(&EnumerationOptions::default());
        assert!(list.devices.iter().filter(|d| d.is_default).count() <= 1);
        for device in &list.devices {
            let details = device.details.as_ref().expect("CoreAudio devices carry details");
            assert!(details.output_channels > 0);
        }
    }
}
