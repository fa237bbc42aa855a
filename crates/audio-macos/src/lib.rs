//! macOS audio device enumeration
//!
//! Walks the CoreAudio HAL device list, keeps devices with output channels
//! and reports the extended telemetry CoreAudio exposes for each of them.

#[cfg(target_os = "macos")]
mod device;
#[cfg(target_os = "macos")]
mod property;

pub use devprobe_audio_core::{AudioDevice, AudioError, DeviceEnumerator, DeviceList};

#[cfg(target_os = "macos")]
pub use device::{default_output_device, list_audio_output_devices, list_devices, CoreAudioEnumerator};
