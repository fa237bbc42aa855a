//! Linux audio device enumeration
//!
//! Lists playback PCM devices of every ALSA sound card. ALSA reports no
//! structured form factor, so devices are classified from their driver and
//! display names only.

#[cfg(target_os = "linux")]
mod config;
#[cfg(target_os = "linux")]
mod device;

pub use devprobe_audio_core::{AudioDevice, AudioError, DeviceEnumerator, DeviceList};

#[cfg(target_os = "linux")]
pub use device::{list_audio_output_devices, list_devices, AlsaEnumerator};
