//! Typed reads of CoreAudio HAL object properties
//!
//! Every helper maps a non-zero `OSStatus` to [`AudioError::DeviceError`]
//! and owns whatever the HAL hands back, so nothing leaks on early return.

use std::ffi::c_void;
use std::{mem, ptr};

use core_foundation::base::TCFType;
use core_foundation::string::{CFString, CFStringRef};
use coreaudio_sys::*;
use devprobe_audio_core::AudioError;

pub(crate) fn address(selector: u32, scope: u32) -> AudioObjectPropertyAddress {
    address_at(selector, scope, kAudioObjectPropertyElementMain)
}

pub(crate) fn address_at(selector: u32, scope: u32, element: u32) -> AudioObjectPropertyAddress {
    AudioObjectPropertyAddress {
        mSelector: selector,
        mScope: scope,
        mElement: element,
    }
}

fn status_error(address: &AudioObjectPropertyAddress, status: OSStatus) -> AudioError {
    AudioError::DeviceError(format!(
        "property {:#010x} returned OSStatus {}",
        address.mSelector, status
    ))
}

/// Read a fixed-size value such as `u32`, `f32` or `f64`
pub(crate) fn get_value<T: Copy + Default>(
    object: AudioObjectID,
    address: &AudioObjectPropertyAddress,
) -> Result<T, AudioError> {
    let mut value = T::default();
    let mut size = mem::size_of::<T>() as u32;

    let status = unsafe {
        AudioObjectGetPropertyData(
            object,
            address,
            0,
            ptr::null(),
            &mut size,
            &mut value as *mut T as *mut c_void,
        )
    };

    if status != 0 {
        return Err(status_error(address, status));
    }
    Ok(value)
}

/// Read a `CFString` property into an owned `String`
pub(crate) fn get_string(
    object: AudioObjectID,
    address: &AudioObjectPropertyAddress,
) -> Result<String, AudioError> {
    let mut raw: CFStringRef = ptr::null();
    let mut size = mem::size_of::<CFStringRef>() as u32;

    let status = unsafe {
        AudioObjectGetPropertyData(
            object,
            address,
            0,
            ptr::null(),
            &mut size,
            &mut raw as *mut CFStringRef as *mut c_void,
        )
    };

    if status != 0 {
        return Err(status_error(address, status));
    }
    if raw.is_null() {
        return Err(AudioError::DeviceError(format!(
            "property {:#010x} returned no string",
            address.mSelector
        )));
    }

    // The HAL returns a +1 reference; the wrapper releases it when dropped.
    let string = unsafe { CFString::wrap_under_create_rule(raw) };
    Ok(string.to_string())
}

/// Read a variable-length list of object ids
pub(crate) fn get_object_list(
    object: AudioObjectID,
    address: &AudioObjectPropertyAddress,
) -> Result<Vec<AudioObjectID>, AudioError> {
    let mut size: u32 = 0;
    let status =
        unsafe { AudioObjectGetPropertyDataSize(object, address, 0, ptr::null(), &mut size) };
    if status != 0 {
        return Err(status_error(address, status));
    }

    let count = size as usize / mem::size_of::<AudioObjectID>();
    let mut ids: Vec<AudioObjectID> = vec![0; count];
    if count == 0 {
        return Ok(ids);
    }

    let status = unsafe {
        AudioObjectGetPropertyData(
            object,
            address,
            0,
            ptr::null(),
            &mut size,
            ids.as_mut_ptr() as *mut c_void,
        )
    };
    if status != 0 {
        return Err(status_error(address, status));
    }

    // The list can shrink between the two calls.
    ids.truncate(size as usize / mem::size_of::<AudioObjectID>());
    Ok(ids)
}

/// Total channels across all streams of `device` in `scope`
pub(crate) fn channel_count(device: AudioObjectID, scope: u32) -> Result<u32, AudioError> {
    let address = address(kAudioDevicePropertyStreamConfiguration, scope);

    let mut size: u32 = 0;
    let status =
        unsafe { AudioObjectGetPropertyDataSize(device, &address, 0, ptr::null(), &mut size) };
    if status != 0 {
        return Err(status_error(&address, status));
    }
    if (size as usize) < mem::size_of::<u32>() {
        return Ok(0);
    }

    // u64 storage keeps the pointer-carrying AudioBuffer entries aligned.
    let mut storage = vec![0u64; (size as usize).div_ceil(mem::size_of::<u64>())];
    let list = storage.as_mut_ptr() as *mut AudioBufferList;

    let status = unsafe {
        AudioObjectGetPropertyData(
            device,
            &address,
            0,
            ptr::null(),
            &mut size,
            list as *mut c_void,
        )
    };
    if status != 0 {
        return Err(status_error(&address, status));
    }

    let channels = unsafe {
        let buffer_count = (*list).mNumberBuffers as usize;
        let buffers = std::slice::from_raw_parts((*list).mBuffers.as_ptr(), buffer_count);
        buffers.iter().map(|buffer| buffer.mNumberChannels).sum()
    };
    Ok(channels)
}
