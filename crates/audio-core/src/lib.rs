mod error;
mod device;
mod list;
mod traits;
pub mod classify;
pub mod level;

pub use error::AudioError;
pub use device::{
    connection_type_to_string, device_type_to_string, AudioDevice, ConnectionType,
    CoreAudioDetails, DeviceType,
};
pub use classify::Classification;
pub use list::{DeviceList, EnumerationOptions};
pub use traits::{DeviceEnumerator, PeakMeter};
pub use level::{LevelMonitor, LevelReading, LevelStream, StopHandle};
