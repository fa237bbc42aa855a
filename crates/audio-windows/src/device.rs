use devprobe_audio_core::classify::{self, Classification};
use devprobe_audio_core::{AudioDevice, AudioError, DeviceEnumerator, DeviceList, EnumerationOptions};
use windows::core::GUID;
use windows::Win32::Media::Audio::{
    eConsole, eRender, IMMDevice, IMMDeviceEnumerator, DEVICE_STATE_ACTIVE,
};
use windows::Win32::System::Com::STGM_READ;
use windows::Win32::UI::Shell::PropertiesSystem::{IPropertyStore, PROPERTYKEY};

use crate::com::{create_enumerator, take_pwstr, ComGuard};

// PKEY_Device_FriendlyName = {a45c254e-df1c-4efd-8020-67d146a850e0}, 14
const PKEY_DEVICE_FRIENDLYNAME: PROPERTYKEY = PROPERTYKEY {
    fmtid: GUID::from_u128(0xa45c254e_df1c_4efd_8020_67d146a850e0),
    pid: 14,
};

// PKEY_AudioEndpoint_FormFactor = {1da5d803-d492-4edd-8c23-e0c0ffee7f0e}, 0
const PKEY_AUDIOENDPOINT_FORMFACTOR: PROPERTYKEY = PROPERTYKEY {
    fmtid: GUID::from_u128(0x1da5d803_d492_4edd_8c23_e0c0ffee7f0e),
    pid: 0,
};

/// Enumerates active render endpoints through the MMDevice API
#[derive(Debug, Default, Clone, Copy)]
pub struct WasapiEnumerator;

impl DeviceEnumerator for WasapiEnumerator {
    fn name(&self) -> &'static str {
        "wasapi"
    }

    fn enumerate(&self, options: &EnumerationOptions) -> Result<DeviceList, AudioError> {
        let _com = ComGuard::init()?;
        let enumerator = create_enumerator()?;
        let mut warnings = Vec::new();

        let default_id = match default_render_id(&enumerator) {
            Ok(id) => Some(id),
            Err(e) => {
                warnings.push(format!("No default output endpoint: {}", e));
                None
            }
        };

        let collection = unsafe { enumerator.EnumAudioEndpoints(eRender, DEVICE_STATE_ACTIVE) }
            .map_err(|e| AudioError::EnumerationFailed(format!("EnumAudioEndpoints failed: {}", e)))?;
        let count = unsafe { collection.GetCount() }
            .map_err(|e| AudioError::EnumerationFailed(format!("GetCount failed: {}", e)))?;

        tracing::debug!(count, "Active render endpoints");

        let mut devices = Vec::with_capacity(count as usize);
        for index in 0..count {
            if options.is_full(devices.len()) {
                break;
            }

            match unsafe { collection.Item(index) } {
                Ok(endpoint) => {
                    devices.push(read_endpoint(&endpoint, index, default_id.as_deref(), &mut warnings));
                }
                Err(e) => warnings.push(format!("Endpoint {}: unavailable: {}", index, e)),
            }
        }

        for warning in &warnings {
            tracing::warn!("{}", warning);
        }

        Ok(DeviceList::finish(devices, warnings, options))
    }
}

fn default_render_id(enumerator: &IMMDeviceEnumerator) -> Result<String, AudioError> {
    let endpoint = unsafe { enumerator.GetDefaultAudioEndpoint(eRender, eConsole) }
        .map_err(|e| AudioError::DeviceError(e.to_string()))?;
    endpoint_id(&endpoint)
}

fn endpoint_id(endpoint: &IMMDevice) -> Result<String, AudioError> {
    let raw = unsafe { endpoint.GetId() }.map_err(|e| AudioError::DeviceError(e.to_string()))?;
    unsafe { take_pwstr(raw) }
}

/// Read one endpoint, leaving any field that cannot be queried at its default
fn read_endpoint(
    endpoint: &IMMDevice,
    index: u32,
    default_id: Option<&str>,
    warnings: &mut Vec<String>,
) -> AudioDevice {
    let mut device = AudioDevice::default();
    let mut structured = Classification::default();

    match endpoint_id(endpoint) {
        Ok(id) => device.id = id,
        Err(e) => warnings.push(format!("Endpoint {}: failed to read id: {}", index, e)),
    }
    device.is_default = !device.id.is_empty() && default_id == Some(device.id.as_str());

    match unsafe { endpoint.OpenPropertyStore(STGM_READ) } {
        Ok(store) => {
            match read_string(&store, &PKEY_DEVICE_FRIENDLYNAME) {
                Ok(name) => device.name = name,
                Err(e) => warnings.push(format!("Endpoint {}: failed to read name: {}", index, e)),
            }
            match read_u32(&store, &PKEY_AUDIOENDPOINT_FORMFACTOR) {
                Ok(form_factor) => structured = classify::from_form_factor(form_factor),
                Err(e) => {
                    warnings.push(format!("Endpoint {}: failed to read form factor: {}", index, e))
                }
            }
        }
        Err(e) => warnings.push(format!("Endpoint {}: failed to open property store: {}", index, e)),
    }

    let classification = classify::apply_name_heuristics(structured, &device.name, Some(&device.id));
    tracing::debug!(
        name = %device.name,
        id = %device.id,
        device_type = %classification.device_type,
        connection = %classification.connection,
        "Render endpoint"
    );

    device.with_classification(classification)
}

fn read_string(store: &IPropertyStore, key: &PROPERTYKEY) -> Result<String, AudioError> {
    let value = unsafe { store.GetValue(key) }.map_err(|e| AudioError::DeviceError(e.to_string()))?;
    Ok(value.to_string())
}

fn read_u32(store: &IPropertyStore, key: &PROPERTYKEY) -> Result<u32, AudioError> {
    let value = unsafe { store.GetValue(key) }.map_err(|e| AudioError::DeviceError(e.to_string()))?;
    u32::try_from(&value).map_err(|e| AudioError::DeviceError(e.to_string()))
}

/// List active output endpoints on Windows
pub fn list_devices() -> Result<DeviceList, AudioError> {
    WasapiEnumerator.enumerate(&EnumerationOptions::default())
}

/// List active output endpoints, or nothing if the audio subsystem failed
pub fn list_audio_output_devices() -> Vec<AudioDevice> {
    WasapiEnumerator
        .enumerate_or_empty(&EnumerationOptions::default())
        .into_devices()
}

/// The current default render endpoint
pub fn default_output_device() -> Result<AudioDevice, AudioError> {
    let _com = ComGuard::init()?;
    let enumerator = create_enumerator()?;
    let endpoint = unsafe { enumerator.GetDefaultAudioEndpoint(eRender, eConsole) }
        .map_err(|_| AudioError::NoDeviceFound)?;

    let mut warnings = Vec::new();
    let mut device = read_endpoint(&endpoint, 0, None, &mut warnings);
    device.is_default = true;
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
        let list = WasapiEnumerator.enumerate_or_empty(&EnumerationOptions::default());
        assert!(list.devices.iter().filter(|d| d.is_default).count() <= 1);
    }

    #[test]
    fn test_cap_is_honored() {
        let list = WasapiEnumerator.enumerate_or_empty(&EnumerationOptions::with_max_devices(1));
        assert!(list.count() <= 1);
    }
}
