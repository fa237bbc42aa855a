//! Default card lookup in ALSA's global configuration

use std::ffi::CString;
use std::os::raw::c_long;
use std::ptr;

use devprobe_audio_core::{AudioDevice, AudioError};

const DEFAULT_CARD_KEY: &str = "defaults.pcm.card";

// Global configuration tree exported by libasound; not bound by alsa-sys
extern "C" {
    static mut snd_config: *mut alsa_sys::snd_config_t;
}

/// Read `defaults.pcm.card` from the global configuration tree
pub(crate) fn default_card() -> Result<i64, AudioError> {
    let key = CString::new(DEFAULT_CARD_KEY)
        .map_err(|e| AudioError::DeviceError(e.to_string()))?;

    unsafe {
        let err = alsa_sys::snd_config_update();
        if err < 0 {
            return Err(AudioError::DeviceError(format!(
                "snd_config_update failed: {}",
                err
            )));
        }

        let mut node: *mut alsa_sys::snd_config_t = ptr::null_mut();
        let err = alsa_sys::snd_config_search(snd_config, key.as_ptr(), &mut node);
        if err < 0 {
            return Err(AudioError::DeviceError(format!(
                "{} not found: {}",
                DEFAULT_CARD_KEY, err
            )));
        }

        let mut value: c_long = 0;
        let err = alsa_sys::snd_config_get_integer(node, &mut value);
        if err < 0 {
            return Err(AudioError::DeviceError(format!(
                "{} is not an integer: {}",
                DEFAULT_CARD_KEY, err
            )));
        }

        Ok(value as i64)
    }
}

/// Identifier of the first playback device on `card`
pub(crate) fn default_device_id(card: i64) -> String {
    format!("hw:{},0", card)
}

/// Flag the device at sub-device 0 of `card` as the default
pub(crate) fn mark_default(devices: &mut [AudioDevice], card: i64) -> bool {
    let id = default_device_id(card);
    match devices.iter_mut().find(|d| d.id == id) {
        Some(device) => {
            device.is_default = true;
            true
        }
        None => false,
    }
}
