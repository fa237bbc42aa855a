//! COM apartment and allocation helpers

use std::ffi::c_void;

use devprobe_audio_core::AudioError;
use windows::core::PWSTR;
use windows::Win32::Foundation::RPC_E_CHANGED_MODE;
use windows::Win32::Media::Audio::{IMMDeviceEnumerator, MMDeviceEnumerator};
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoTaskMemFree, CoUninitialize, CLSCTX_ALL,
    COINIT_APARTMENTTHREADED,
};

/// Keeps COM initialized on the current thread for its lifetime
///
/// Declare it before any COM interface so it is dropped after them.
pub(crate) struct ComGuard {
    owns_apartment: bool,
}

impl ComGuard {
    pub(crate) fn init() -> Result<Self, AudioError> {
        let hr = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) };

        // S_OK and S_FALSE both need a matching CoUninitialize.
        if hr.is_ok() {
            return Ok(Self {
                owns_apartment: true,
            });
        }

        // Already initialized with another threading model; usable as is.
        if hr == RPC_E_CHANGED_MODE {
            tracing::debug!("COM already initialized in a different apartment mode");
            return Ok(Self {
                owns_apartment: false,
            });
        }

        Err(AudioError::SubsystemInit(format!(
            "CoInitializeEx failed: HRESULT {:#010x}",
            hr.0
        )))
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        if self.owns_apartment {
            unsafe { CoUninitialize() };
        }
    }
}

pub(crate) fn create_enumerator() -> Result<IMMDeviceEnumerator, AudioError> {
    unsafe { CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL) }
        .map_err(|e| AudioError::SubsystemInit(format!("Failed to create device enumerator: {}", e)))
}

/// Convert a COM-allocated wide string and free it
///
/// # Safety
///
/// `ptr` must be null or a NUL-terminated string allocated with
/// `CoTaskMemAlloc` that the caller owns.
pub(crate) unsafe fn take_pwstr(ptr: PWSTR) -> Result<String, AudioError> {
    if ptr.is_null() {
        return Ok(String::new());
    }

    let value = ptr
        .to_string()
        .map_err(|e| AudioError::DeviceError(format!("Invalid UTF-16 in device string: {}", e)));
    CoTaskMemFree(Some(ptr.0 as *const c_void));
    value
}
