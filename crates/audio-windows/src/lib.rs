//! Windows audio device enumeration
//!
//! Lists active render endpoints through the MMDevice API, classifies them
//! from their endpoint form factor and names, and exposes the endpoint
//! peak meter used by the level monitor.

#[cfg(target_os = "windows")]
mod com;
#[cfg(target_os = "windows")]
mod device;
#[cfg(target_os = "windows")]
mod meter;

pub use devprobe_audio_core::{AudioDevice, AudioError, DeviceEnumerator, DeviceList, PeakMeter};

#[cfg(target_os = "windows")]
pub use device::{default_output_device, list_audio_output_devices, list_devices, WasapiEnumerator};
#[cfg(target_os = "windows")]
pub use meter::{open_default_meter, WasapiPeakMeter};
