use crate::error::AudioError;
use crate::list::{DeviceList, EnumerationOptions};

/// Trait for platform device enumerators (MMDevice, CoreAudio, ALSA)
pub trait DeviceEnumerator {
    /// Short name of the backing audio API, for logs
    fn name(&self) -> &'static str;

    /// List the active output devices
    ///
    /// Returns `Err` only when the audio subsystem itself cannot be
    /// reached. A device whose properties cannot be read is still listed
    /// with default fields, and a warning is added to the result.
    fn enumerate(&self, options: &EnumerationOptions) -> Result<DeviceList, AudioError>;

    /// Enumerate and fold any failure into an empty list
    ///
    /// Callers of this method cannot tell "no devices" from "enumeration
    /// failed"; the error is only logged.
    fn enumerate_or_empty(&self, options: &EnumerationOptions) -> DeviceList {
        match self.enumerate(options) {
            Ok(list) => list,
            Err(e) => {
                tracing::error!(backend = self.name(), "Device enumeration failed: {}", e);
                DeviceList::default()
            }
        }
    }
}

/// Trait for instantaneous output level measurement
pub trait PeakMeter {
    /// Current peak sample value in [0.0, 1.0]
    fn peak(&mut self) -> Result<f32, AudioError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::AudioDevice;

    struct FailingEnumerator;

    impl DeviceEnumerator for FailingEnumerator {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn enumerate(&self, _options: &EnumerationOptions) -> Result<DeviceList, AudioError> {
            Err(AudioError::SubsystemInit("CoInitializeEx failed".to_string()))
        }
    }

    struct FixedEnumerator(Vec<AudioDevice>);

    impl DeviceEnumerator for FixedEnumerator {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn enumerate(&self, options: &EnumerationOptions) -> Result<DeviceList, AudioError> {
            Ok(DeviceList::finish(self.0.clone(), Vec::new(), options))
        }
    }

    #[test]
    fn test_enumerate_or_empty_folds_failure() {
        let options = EnumerationOptions::default();
        assert!(FailingEnumerator.enumerate(&options).is_err());

        let list = FailingEnumerator.enumerate_or_empty(&options);
        assert_eq!(list.count(), 0);
        assert!(list.is_empty());
        assert!(list.warnings.is_empty());
        assert!(list.default_device().is_none());
    }

    #[test]
    fn test_enumerate_or_empty_passes_success_through() {
        let enumerator = FixedEnumerator(vec![
            AudioDevice::new("Speakers".to_string(), "a".to_string()),
            AudioDevice::new("HDMI".to_string(), "b".to_string()),
        ]);
        let list = enumerator.enumerate_or_empty(&EnumerationOptions::with_max_devices(1));
        assert_eq!(list.count(), 1);
        assert_eq!(list.devices[0].name, "Speakers");
    }
}
