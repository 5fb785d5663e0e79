//! Output device selection and platform parameter probing.
//!
//! Thin wrappers around CPAL for:
//! - listing available output devices
//! - selecting either the default device or a device by substring match
//! - answering the engine's [`PlatformProbe`] queries from the device's
//!   default output config

use anyhow::{Context, Result, anyhow};
use cpal::traits::{DeviceTrait, HostTrait};

use audio_feeder::params::PlatformProbe;

/// Pick the first output device matching `needle` (case-insensitive), or the
/// default device.
///
/// Returns an error if no suitable device is found.
pub fn pick_device(host: &cpal::Host, needle: Option<&str>) -> Result<cpal::Device> {
    let mut devices: Vec<cpal::Device> = host
        .output_devices()
        .context("No output devices")?
        .collect();

    if let Some(needle) = needle {
        if let Some(d) = devices.drain(..).find(|d| {
            d.description()
                .ok()
                .map(|n| matches_device_name(&n.name(), needle))
                .unwrap_or(false)
        }) {
            return Ok(d);
        }
        return Err(anyhow!("No output device matched: {needle}"));
    }

    host.default_output_device()
        .ok_or_else(|| anyhow!("No default output device"))
}

/// Print available output devices to stdout.
///
/// This is intended for CLI UX (`devices`) rather than structured output.
pub fn list_devices(host: &cpal::Host) -> Result<()> {
    let devices = host.output_devices().context("No output devices")?;
    for (i, d) in devices.enumerate() {
        println!("#{i}: {}", d.description()?);
    }
    Ok(())
}

/// Platform answers derived from a CPAL device's default output config.
///
/// Missing or out-of-range device reports become `None`, which the resolver
/// replaces with its own defaults.
pub struct CpalProbe {
    sample_rate_hz: Option<u32>,
    frames_per_buffer: Option<u32>,
    low_latency: bool,
}

impl CpalProbe {
    /// Build a probe from the device's supported config.
    ///
    /// `frames_override` wins over the device-derived chunk size when set.
    pub fn new(config: &cpal::SupportedStreamConfig, frames_override: Option<u32>) -> Self {
        let (frames, low_latency) = match config.buffer_size() {
            cpal::SupportedBufferSize::Range { min, max } => {
                (Some(preferred_frames(*min, *max)), true)
            }
            cpal::SupportedBufferSize::Unknown => (None, false),
        };

        Self {
            sample_rate_hz: Some(config.sample_rate()),
            frames_per_buffer: frames_override.or(frames),
            low_latency,
        }
    }
}

impl PlatformProbe for CpalProbe {
    fn has_low_latency_feature(&self) -> bool {
        self.low_latency
    }

    fn output_frames_per_buffer(&self) -> Option<u32> {
        self.frames_per_buffer
    }

    fn native_sample_rate(&self) -> Option<u32> {
        self.sample_rate_hz
    }
}

/// Clamp the engine's preferred chunk size into the device's supported range.
fn preferred_frames(min: u32, max: u32) -> u32 {
    audio_feeder::params::DEFAULT_FRAMES_PER_BUFFER.clamp(min, max.max(min))
}

fn matches_device_name(name: &str, needle: &str) -> bool {
    let needle = needle.trim();
    if needle.is_empty() {
        return false;
    }
    name.to_lowercase().contains(&needle.to_lowercase())
}
