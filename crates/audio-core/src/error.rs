use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Audio subsystem initialization failed: {0}")]
    SubsystemInit(String),

    #[error("Device enumeration failed: {0}")]
    EnumerationFailed(String),

    #[error("No audio device found")]
    NoDeviceFound,

    #[error("Device error: {0}")]
    DeviceError(String),

    #[error("Peak meter error: {0}")]
    MeterError(String),

    #[error("Platform not supported: {0}")]
    PlatformNotSupported(String),
}
