//! Feeder — a small CLI that keeps a CPAL output stream perpetually fed with
//! PCM and retriggers a fading test tone on demand.
//!
//! ## Wiring
//! 1. **Resolve**: query the output device's native rate and preferred
//!    buffer size; fall back to safe defaults when the device reports
//!    nothing usable.
//! 2. **Feed**: the CPAL callback drives the engine's prepare-then-enqueue
//!    cycle, so the stream is never starved and a start request is audible
//!    on the very next hardware request.
//! 3. **Control**: stdin lines raise the lock-free start/stop signals from
//!    the control thread; Ctrl-C exits.

mod cli;
mod device;
mod output;

use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use cpal::traits::{DeviceTrait, StreamTrait};
use tracing_subscriber::EnvFilter;

use audio_feeder::config::{CyclePolicy, ToneConfig};
use audio_feeder::engine::FeederEngine;
use audio_feeder::params;
use audio_feeder::source::ToneSource;
use audio_feeder::status::FeederCounters;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let host = cpal::default_host();

    match &args.cmd {
        cli::Command::Devices => device::list_devices(&host),
        cli::Command::Tone {
            freq,
            cycle_seconds,
            amplitude,
            looped,
        } => {
            let tone = ToneConfig {
                frequency_hz: *freq,
                cycle_seconds: *cycle_seconds,
                amplitude: *amplitude,
                policy: if *looped {
                    CyclePolicy::Loop
                } else {
                    CyclePolicy::Stop
                },
            };
            run_tone(&host, &args, tone)
        }
    }
}

fn run_tone(host: &cpal::Host, args: &cli::Args, tone: ToneConfig) -> Result<()> {
    let device = device::pick_device(host, args.device.as_deref())?;
    tracing::info!(device = %device.description()?, "output device");

    let supported = device
        .default_output_config()
        .context("No default output config")?;
    let probe = device::CpalProbe::new(&supported, args.frames_per_buffer);
    let params = params::resolve(&probe);

    let mut stream_config: cpal::StreamConfig = supported.clone().into();
    if matches!(
        supported.buffer_size(),
        cpal::SupportedBufferSize::Range { .. }
    ) {
        stream_config.buffer_size = cpal::BufferSize::Fixed(params.frames_per_buffer);
    }
    tracing::info!(
        channels = stream_config.channels,
        buffer_size = ?stream_config.buffer_size,
        "device output config"
    );

    let counters = FeederCounters {
        callbacks: Some(Arc::new(AtomicU64::new(0))),
        played_samples: Some(Arc::new(AtomicU64::new(0))),
        silent_samples: Some(Arc::new(AtomicU64::new(0))),
    };

    let source = ToneSource::new(&tone, &params);
    let engine = FeederEngine::new(params, Box::new(source), counters.clone());
    let control = engine.control();

    let stream =
        output::build_output_stream(&device, &stream_config, supported.sample_format(), engine)?;
    stream.play()?;

    // Control thread: each stdin line is a one-shot request toward the
    // callback thread; `s` stops, anything else retriggers.
    let stdin_control = control.clone();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().eq_ignore_ascii_case("s") {
                stdin_control.request_stop();
            } else {
                stdin_control.request_start();
            }
        }
    });

    let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded::<()>(1);
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.try_send(());
    })
    .context("install Ctrl-C handler")?;

    tracing::info!("press Enter to (re)trigger the tone, `s` + Enter to stop, Ctrl-C to exit");
    control.request_start();

    let _ = shutdown_rx.recv();

    if let (Some(played), Some(silent)) = (&counters.played_samples, &counters.silent_samples) {
        tracing::info!(
            played_samples = played.load(Ordering::Relaxed),
            silent_samples = silent.load(Ordering::Relaxed),
            "session totals"
        );
    }
    Ok(())
}
