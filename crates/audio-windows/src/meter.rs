//! Peak level of the default render endpoint

use devprobe_audio_core::{AudioError, PeakMeter};
use windows::Win32::Media::Audio::Endpoints::IAudioMeterInformation;
use windows::Win32::Media::Audio::{eConsole, eRender};
use windows::Win32::System::Com::CLSCTX_ALL;

use crate::com::{create_enumerator, ComGuard};

/// `IAudioMeterInformation` bound to the thread that opened it
pub struct WasapiPeakMeter {
    meter: IAudioMeterInformation,
    // Dropped after `meter`.
    _com: ComGuard,
}

/// Open a peak meter on the current default output endpoint
///
/// Initializes COM on the calling thread; the meter must be used and
/// dropped on that same thread.
pub fn open_default_meter() -> Result<WasapiPeakMeter, AudioError> {
    let com = ComGuard::init()?;
    let enumerator = create_enumerator()?;
    let endpoint = unsafe { enumerator.GetDefaultAudioEndpoint(eRender, eConsole) }
        .map_err(|_| AudioError::NoDeviceFound)?;

    let meter: IAudioMeterInformation = unsafe { endpoint.Activate(CLSCTX_ALL, None) }
        .map_err(|e| AudioError::MeterError(format!("Failed to activate meter: {}", e)))?;

    Ok(WasapiPeakMeter { meter, _com: com })
}

impl PeakMeter for WasapiPeakMeter {
    fn peak(&mut self) -> Result<f32, AudioError> {
        unsafe { self.meter.GetPeakValue() }.map_err(|e| AudioError::MeterError(e.to_string()))
    }
}
