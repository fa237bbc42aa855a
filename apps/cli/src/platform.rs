//! Compile-time selection of the native audio backend

use std::time::Duration;

use devprobe_audio_core::{AudioDevice, AudioError, DeviceEnumerator, LevelStream};

#[cfg(target_os = "windows")]
pub fn enumerator() -> Box<dyn DeviceEnumerator> {
    Box::new(devprobe_audio_windows::WasapiEnumerator)
}

#[cfg(target_os = "macos")]
pub fn enumerator() -> Box<dyn DeviceEnumerator> {
    Box::new(devprobe_audio_macos::CoreAudioEnumerator)
}

#[cfg(target_os = "linux")]
pub fn enumerator() -> Box<dyn DeviceEnumerator> {
    Box::new(devprobe_audio_linux::AlsaEnumerator)
}

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
pub fn enumerator() -> Box<dyn DeviceEnumerator> {
    Box::new(Unsupported)
}

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
struct Unsupported;

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
impl DeviceEnumerator for Unsupported {
    fn name(&self) -> &'static str {
        "none"
    }

    fn enumerate(
        &self,
        _options: &devprobe_audio_core::EnumerationOptions,
    ) -> Result<devprobe_audio_core::DeviceList, AudioError> {
        Err(AudioError::PlatformNotSupported(
            std::env::consts::OS.to_string(),
        ))
    }
}

/// The device whose output the level monitor watches
pub fn default_output_device() -> Result<AudioDevice, AudioError> {
    #[cfg(target_os = "windows")]
    {
        devprobe_audio_windows::default_output_device()
    }

    #[cfg(target_os = "macos")]
    {
        devprobe_audio_macos::default_output_device()
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        enumerator()
            .enumerate(&Default::default())?
            .into_devices()
            .into_iter()
            .find(|d| d.is_default)
            .ok_or(AudioError::NoDeviceFound)
    }
}

/// Start polling the default output device's peak meter
///
/// `None` polls at the monitor's default interval.
#[cfg(target_os = "windows")]
pub fn start_monitor(interval: Option<Duration>) -> Result<LevelStream, AudioError> {
    use devprobe_audio_core::LevelMonitor;
    use devprobe_audio_windows::open_default_meter;

    match interval {
        Some(interval) => LevelMonitor::start_with_interval(open_default_meter, interval),
        None => LevelMonitor::start(open_default_meter),
    }
}

#[cfg(not(target_os = "windows"))]
pub fn start_monitor(_interval: Option<Duration>) -> Result<LevelStream, AudioError> {
    Err(AudioError::PlatformNotSupported(format!(
        "level monitoring is not available on {}",
        std::env::consts::OS
    )))
}
