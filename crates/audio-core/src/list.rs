use crate::device::AudioDevice;

/// Knobs shared by every platform enumerator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnumerationOptions {
    /// Stop after this many devices. `None` lists everything.
    pub max_devices: Option<usize>,
}

impl EnumerationOptions {
    pub fn with_max_devices(max_devices: usize) -> Self {
        Self {
            max_devices: Some(max_devices),
        }
    }

    /// Whether an enumerator holding `count` devices must stop
    pub fn is_full(&self, count: usize) -> bool {
        self.max_devices.is_some_and(|max| count >= max)
    }
}

/// Result of one enumeration call
///
/// Per-device query failures never abort an enumeration; they are collected
/// in `warnings` so callers can tell a partial result from a clean one.
#[derive(Debug, Clone, Default)]
pub struct DeviceList {
    pub devices: Vec<AudioDevice>,
    pub warnings: Vec<String>,
}

impl DeviceList {
    /// Apply the device cap and make sure at most one device is the default
    pub fn finish(
        mut devices: Vec<AudioDevice>,
        mut warnings: Vec<String>,
        options: &EnumerationOptions,
    ) -> Self {
        if let Some(max) = options.max_devices {
            if devices.len() > max {
                tracing::debug!(dropped = devices.len() - max, max, "Device cap reached");
                devices.truncate(max);
            }
        }

        let mut seen_default = false;
        for device in devices.iter_mut().filter(|d| d.is_default) {
            if seen_default {
                let warning = format!(
                    "More than one default device reported, clearing flag on '{}'",
                    device.name
                );
                tracing::warn!("{}", warning);
                warnings.push(warning);
                device.is_default = false;
            }
            seen_default = true;
        }

        Self { devices, warnings }
    }

    pub fn count(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn default_device(&self) -> Option<&AudioDevice> {
        self.devices.iter().find(|d| d.is_default)
    }

    pub fn into_devices(self) -> Vec<AudioDevice> {
        self.devices
    }
}
