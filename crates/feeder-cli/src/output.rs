//! CPAL output stream driving the feeder engine.
//!
//! The device callback is the engine's hardware cadence: for each data
//! request it repeatedly invokes [`FeederEngine::on_underflow`] with the
//! remaining frame count and lets the engine enqueue directly into the
//! device buffer through a slice-backed [`OutputSink`]. The engine caps each
//! chunk at its preferred frames-per-buffer, so one device request may span
//! several engine requests.
//!
//! The engine is mono; samples are duplicated across the device's output
//! channels and converted to the device sample format.

use anyhow::{Result, anyhow};
use cpal::traits::DeviceTrait;

use audio_feeder::engine::{FeederEngine, OutputSink};

/// Build a CPAL output stream fed by `engine`.
///
/// The engine moves into the callback thread; keep a [`ControlHandle`] from
/// before the move to talk to it.
///
/// [`ControlHandle`]: audio_feeder::signal::ControlHandle
pub fn build_output_stream(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    sample_format: cpal::SampleFormat,
    engine: FeederEngine,
) -> Result<cpal::Stream> {
    match sample_format {
        cpal::SampleFormat::F32 => build_stream::<f32>(device, config, engine),
        cpal::SampleFormat::I16 => build_stream::<i16>(device, config, engine),
        cpal::SampleFormat::I32 => build_stream::<i32>(device, config, engine),
        cpal::SampleFormat::U16 => build_stream::<u16>(device, config, engine),
        other => Err(anyhow!("Unsupported sample format: {other:?}")),
    }
}

/// Type-specialized stream builder for CPAL sample formats.
fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut engine: FeederEngine,
) -> Result<cpal::Stream>
where
    T: cpal::Sample + cpal::SizedSample + cpal::FromSample<i16>,
{
    let channels_out = (config.channels as usize).max(1);

    let err_fn = |err| tracing::warn!("stream error: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _| {
            let frames = data.len() / channels_out;
            let mut sink = DeviceBufferSink {
                data,
                channels: channels_out,
                frame: 0,
            };

            while sink.frame < frames {
                let before = sink.frame;
                engine.on_underflow(frames - sink.frame, &mut sink);
                if sink.frame == before {
                    break;
                }
            }
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}

/// Writes engine output into the device buffer, fanning each mono sample out
/// to every output channel.
struct DeviceBufferSink<'a, T> {
    data: &'a mut [T],
    channels: usize,
    frame: usize,
}

impl<T> OutputSink for DeviceBufferSink<'_, T>
where
    T: cpal::Sample + cpal::SizedSample + cpal::FromSample<i16>,
{
    fn enqueue(&mut self, samples: &[i16]) {
        let frames = self.data.len() / self.channels;
        for &s in samples {
            if self.frame >= frames {
                break;
            }
            let base = self.frame * self.channels;
            for ch in 0..self.channels {
                self.data[base + ch] = <T as cpal::Sample>::from_sample::<i16>(s);
            }
            self.frame += 1;
        }
    }
}
