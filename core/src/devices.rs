//! Audio devices as reported by `system_profiler SPAudioDataType -json`.

use crate::Result;
use serde::{Deserialize, Serialize};

pub const PROFILER_PROGRAM: &str = "system_profiler";
pub const PROFILER_ARGS: [&str; 2] = ["SPAudioDataType", "-json"];

const YES: &str = "spaudio_yes";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioDevice {
    pub name: String,
    pub manufacturer: Option<String>,
    pub has_input: bool,
    pub has_output: bool,
    pub is_default_input: bool,
    pub is_default_output: bool,
}

#[derive(Deserialize)]
struct ProfilerReport {
    #[serde(rename = "SPAudioDataType", default)]
    sections: Vec<ProfilerSection>,
}

#[derive(Deserialize)]
struct ProfilerSection {
    #[serde(rename = "_items", default)]
    items: Vec<ProfilerDevice>,
}

#[derive(Deserialize)]
struct ProfilerDevice {
    #[serde(rename = "_name")]
    name: String,
    coreaudio_device_manufacturer: Option<String>,
    coreaudio_device_input: Option<serde_json::Value>,
    coreaudio_device_output: Option<serde_json::Value>,
    coreaudio_default_audio_input_device: Option<String>,
    coreaudio_default_audio_output_device: Option<String>,
}

impl From<ProfilerDevice> for AudioDevice {
    fn from(d: ProfilerDevice) -> Self {
        Self {
            name: d.name,
            manufacturer: d.coreaudio_device_manufacturer,
            has_input: d.coreaudio_device_input.is_some(),
            has_output: d.coreaudio_device_output.is_some(),
            is_default_input: d.coreaudio_default_audio_input_device.as_deref() == Some(YES),
            is_default_output: d.coreaudio_default_audio_output_device.as_deref() == Some(YES),
        }
    }
}

/// Parse the JSON report into a flat device list, in report order.
pub fn parse_audio_devices(json: &str) -> Result<Vec<AudioDevice>> {
    let report: ProfilerReport = serde_json::from_str(json)?;
    Ok(report
        .sections
        .into_iter()
        .flat_map(|s| s.items)
        .map(AudioDevice::from)
        .collect())
}
