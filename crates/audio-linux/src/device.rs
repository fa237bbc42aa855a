use alsa::card;
use alsa::ctl::{Ctl, DeviceIter};
use alsa::Direction;
use devprobe_audio_core::classify;
use devprobe_audio_core::{AudioDevice, AudioError, DeviceEnumerator, DeviceList, EnumerationOptions};

use crate::config::{default_card, mark_default};

/// Enumerates playback PCM devices of every ALSA sound card
#[derive(Debug, Default, Clone, Copy)]
pub struct AlsaEnumerator;

impl DeviceEnumerator for AlsaEnumerator {
    fn name(&self) -> &'static str {
        "alsa"
    }

    fn enumerate(&self, options: &EnumerationOptions) -> Result<DeviceList, AudioError> {
        let mut devices = Vec::new();
        let mut warnings = Vec::new();
        let mut cards_seen = 0usize;

        'cards: for card in card::Iter::new() {
            let card = match card {
                Ok(card) => card,
                Err(e) if cards_seen == 0 => {
                    return Err(AudioError::EnumerationFailed(format!(
                        "Failed to iterate sound cards: {}",
                        e
                    )));
                }
                Err(e) => {
                    warnings.push(format!("Sound card iteration stopped early: {}", e));
                    break;
                }
            };
            cards_seen += 1;

            let index = card.get_index();
            // The control handle is closed when `ctl` goes out of scope.
            let ctl = match Ctl::from_card(&card, false) {
                Ok(ctl) => ctl,
                Err(e) => {
                    warnings.push(format!("Card {}: failed to open control: {}", index, e));
                    continue;
                }
            };
            let info = match ctl.card_info() {
                Ok(info) => info,
                Err(e) => {
                    warnings.push(format!("Card {}: failed to read card info: {}", index, e));
                    continue;
                }
            };
            let card_name = info.get_name().unwrap_or_default().to_string();
            let driver = info.get_driver().unwrap_or_default().to_string();

            tracing::debug!(card = index, name = %card_name, driver = %driver, "Sound card");

            for pcm_device in DeviceIter::new(&ctl) {
                if options.is_full(devices.len()) {
                    break 'cards;
                }

                let pcm_info = match ctl.pcm_info(pcm_device as u32, 0, Direction::Playback) {
                    Ok(pcm_info) => pcm_info,
                    Err(e) => {
                        tracing::trace!(card = index, device = pcm_device, "No playback stream: {}", e);
                        continue;
                    }
                };

                let name = format!("{} - {}", card_name, pcm_info.get_name().unwrap_or_default());
                let id = format!("hw:{},{}", index, pcm_device);
                let classification = classify::from_alsa(&driver, &name);

                tracing::debug!(
                    id = %id,
                    name = %name,
                    device_type = %classification.device_type,
                    connection = %classification.connection,
                    "Playback device"
                );

                devices.push(AudioDevice::new(name, id).with_classification(classification));
            }
        }

        if !devices.is_empty() {
            match default_card() {
                Ok(card) => {
                    if !mark_default(&mut devices, card) {
                        tracing::debug!(card, "Default card has no playback device 0");
                    }
                }
                Err(e) => tracing::debug!("No default card configured: {}", e),
            }
        }

        for warning in &warnings {
            tracing::warn!("{}", warning);
        }

        Ok(DeviceList::finish(devices, warnings, options))
    }
}

/// List playback devices on Linux
pub fn list_devices() -> Result<DeviceList, AudioError> {
    AlsaEnumerator.enumerate(&EnumerationOptions::default())
}

/// List playback devices, or nothing if ALSA could not be queried
pub fn list_audio_output_devices() -> Vec<AudioDevice> {
    AlsaEnumerator
        .enumerate_or_empty(&EnumerationOptions::default())
        .into_devices()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumeration_invariants() {
        let list = AlsaEnumerator.enumerate_or_empty(&EnumerationOptions::default());
        assert!(list.devices.iter().filter(|d| d.is_default).count() <= 1);
        for device in &list.devices {
            assert!(device.id.starts_with("hw:"));
            assert!(device.name.contains(" - "));
        }
    }

    #[test]
    fn test_cap_is_honored() {
        let list = AlsaEnumerator.enumerate_or_empty(&EnumerationOptions::with_max_devices(1));
        assert!(list.count() <= 1);
    }
}
