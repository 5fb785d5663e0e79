//! Sample producers for the callback thread.
//!
//! A source is the engine's polymorphic "what plays next" capability: it
//! fills a requested slice with mono `i16` samples and tracks its own
//! silent/playing state. Implementations must be allocation-free and
//! bounded-time inside [`AudioSource::fill`]; the callback thread has a hard
//! deadline of one buffer period.

use std::f32::consts::TAU;
use std::sync::Arc;

use crate::config::{CyclePolicy, ToneConfig};
use crate::params::PlaybackParams;
use crate::queue::SampleQueue;

/// A swappable producer of mono PCM.
///
/// State transitions are driven by the engine on the callback thread only,
/// so implementations need no internal synchronization.
pub trait AudioSource: Send {
    /// Fill `out` completely. Inactive sources write silence.
    ///
    /// Must not block, allocate, or perform I/O.
    fn fill(&mut self, out: &mut [i16]);

    /// Begin (or restart) a play-through from the beginning.
    fn start(&mut self);

    /// Return to silence immediately.
    fn stop(&mut self);

    /// Whether the source is currently producing audible content.
    fn is_active(&self) -> bool;
}

/// Sine tone with a linear fade-to-zero envelope over one cycle.
pub struct ToneSource {
    sample_rate_hz: u32,
    total_cycle_samples: u64,
    frequency_hz: f32,
    amplitude: f32,
    policy: CyclePolicy,
    /// Samples emitted into the current play-through. Reset to 0 exactly on
    /// the silent-to-playing transition.
    cursor: u64,
    playing: bool,
}

impl ToneSource {
    pub fn new(tone: &ToneConfig, params: &PlaybackParams) -> Self {
        let cycle_seconds = if tone.cycle_seconds.is_finite() && tone.cycle_seconds > 0.0 {
            tone.cycle_seconds
        } else {
            1.0
        };
        let total_cycle_samples =
            ((params.sample_rate_hz as f64) * (cycle_seconds as f64)).ceil() as u64;

        Self {
            sample_rate_hz: params.sample_rate_hz,
            total_cycle_samples: total_cycle_samples.max(1),
            frequency_hz: tone.frequency_hz,
            amplitude: tone.amplitude.clamp(0.0, 1.0),
            policy: tone.policy,
            cursor: 0,
            playing: false,
        }
    }

    /// Samples emitted into the current play-through.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Instantaneous fade multiplier at the current cursor, in `0.0..=1.0`.
    pub fn envelope(&self) -> f32 {
        let remaining = self.total_cycle_samples.saturating_sub(self.cursor);
        remaining as f32 / self.total_cycle_samples as f32
    }

    fn sample_at_cursor(&self) -> i16 {
        let t = self.cursor as f32 / self.sample_rate_hz as f32;
        let v = self.envelope();
        let s = (TAU * self.frequency_hz * t).sin() * v * self.amplitude;
        (s * i16::MAX as f32) as i16
    }
}

impl AudioSource for ToneSource {
    fn fill(&mut self, out: &mut [i16]) {
        if !self.playing {
            out.fill(0);
            return;
        }

        for slot in out.iter_mut() {
            if self.cursor >= self.total_cycle_samples {
                match self.policy {
                    CyclePolicy::Loop => self.cursor = 0,
                    CyclePolicy::Stop => self.playing = false,
                }
            }
            if !self.playing {
                *slot = 0;
                continue;
            }
            *slot = self.sample_at_cursor();
            self.cursor += 1;
        }

        // Exact-boundary fills end the cycle here rather than one call late.
        if self.cursor >= self.total_cycle_samples && self.policy == CyclePolicy::Stop {
            self.playing = false;
        }
    }

    fn start(&mut self) {
        self.cursor = 0;
        self.playing = true;
    }

    fn stop(&mut self) {
        self.playing = false;
    }

    fn is_active(&self) -> bool {
        self.playing
    }
}

/// Adapter for externally produced audio (for example a decoder thread).
///
/// Pulls from a [`SampleQueue`] without waiting; any shortfall is padded with
/// silence, so a starved producer degrades to quiet output instead of a
/// missed deadline. Deactivates once the queue is closed and drained.
pub struct QueueSource {
    queue: Arc<SampleQueue>,
    active: bool,
}

impl QueueSource {
    pub fn new(queue: Arc<SampleQueue>) -> Self {
        Self {
            queue,
            active: false,
        }
    }
}

impl AudioSource for QueueSource {
    fn fill(&mut self, out: &mut [i16]) {
        if !self.active {
            out.fill(0);
            return;
        }

        let pop = self.queue.pop_into(out);
        out[pop.taken..].fill(0);

        if pop.taken == 0 && pop.drained {
            self.active = false;
        }
    }

    fn start(&mut self) {
        self.active = true;
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_params(rate: u32) -> PlaybackParams {
        PlaybackParams {
            sample_rate_hz: rate,
            frames_per_buffer: 256,
            low_latency: false,
        }
    }

    fn one_second_tone(rate: u32, policy: CyclePolicy) -> ToneSource {
        ToneSource::new(
            &ToneConfig {
                frequency_hz: 440.0,
                cycle_seconds: 1.0,
                amplitude: 0.8,
                policy,
            },
            &test_params(rate),
        )
    }

    #[test]
    fn inactive_tone_fills_silence() {
        let mut tone = one_second_tone(44_100, CyclePolicy::Stop);
        let mut out = [123i16; 64];
        tone.fill(&mut out);
        assert!(out.iter().all(|&s| s == 0));
        assert_eq!(tone.cursor(), 0);
    }

    #[test]
    fn envelope_is_one_at_cycle_start() {
        let mut tone = one_second_tone(44_100, CyclePolicy::Stop);
        tone.start();
        assert!((tone.envelope() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn envelope_is_near_zero_at_cycle_end() {
        let mut tone = one_second_tone(44_100, CyclePolicy::Stop);
        tone.start();
        let mut out = [0i16; 4410];
        for _ in 0..9 {
            tone.fill(&mut out);
        }
        let mut last = [0i16; 4409];
        tone.fill(&mut last);
        // cursor == total - 1
        assert!(tone.is_active());
        assert!(tone.envelope() < 1e-4);
    }

    #[test]
    fn tone_deactivates_after_one_cycle() {
        let mut tone = one_second_tone(44_100, CyclePolicy::Stop);
        tone.start();
        let mut out = [0i16; 441];
        for _ in 0..100 {
            tone.fill(&mut out);
        }
        assert_eq!(tone.cursor(), 44_100);
        assert!(!tone.is_active());

        out.fill(123);
        tone.fill(&mut out);
        assert!(out.iter().all(|&s| s == 0));
    }

    #[test]
    fn tone_deactivates_mid_buffer_and_zero_pads_the_tail() {
        let mut tone = one_second_tone(100, CyclePolicy::Stop);
        tone.start();
        let mut out = [0i16; 150];
        tone.fill(&mut out);
        assert!(!tone.is_active());
        assert!(out[100..].iter().all(|&s| s == 0));
    }

    #[test]
    fn loop_policy_wraps_without_deactivating() {
        let mut tone = one_second_tone(100, CyclePolicy::Loop);
        tone.start();
        let mut out = [0i16; 150];
        tone.fill(&mut out);
        assert!(tone.is_active());
        assert_eq!(tone.cursor(), 50);
        // The wrapped region restarts at full envelope; sample 101 matches
        // sample 1 of a fresh cycle.
        let mut fresh = one_second_tone(100, CyclePolicy::Loop);
        fresh.start();
        let mut first = [0i16; 2];
        fresh.fill(&mut first);
        assert_eq!(out[101], first[1]);
    }

    #[test]
    fn start_resets_cursor() {
        let mut tone = one_second_tone(44_100, CyclePolicy::Stop);
        tone.start();
        let mut out = [0i16; 441];
        tone.fill(&mut out);
        assert_eq!(tone.cursor(), 441);
        tone.start();
        assert_eq!(tone.cursor(), 0);
        assert!(tone.is_active());
    }

    #[test]
    fn stop_silences_immediately() {
        let mut tone = one_second_tone(44_100, CyclePolicy::Loop);
        tone.start();
        tone.stop();
        assert!(!tone.is_active());
        let mut out = [123i16; 16];
        tone.fill(&mut out);
        assert!(out.iter().all(|&s| s == 0));
    }

    #[test]
    fn queue_source_pads_starvation_with_silence() {
        let queue = Arc::new(SampleQueue::new(64));
        let mut src = QueueSource::new(queue.clone());
        src.start();

        queue.push_blocking(&[10, 20, 30]);
        let mut out = [99i16; 8];
        src.fill(&mut out);
        assert_eq!(&out[..3], &[10, 20, 30]);
        assert!(out[3..].iter().all(|&s| s == 0));
        assert!(src.is_active());
    }

    #[test]
    fn queue_source_resumes_when_samples_arrive() {
        let queue = Arc::new(SampleQueue::new(64));
        let mut src = QueueSource::new(queue.clone());
        src.start();

        let mut out = [99i16; 4];
        src.fill(&mut out);
        assert!(out.iter().all(|&s| s == 0));
        assert!(src.is_active());

        queue.push_blocking(&[7, 8]);
        src.fill(&mut out);
        assert_eq!(&out[..2], &[7, 8]);
    }

    #[test]
    fn queue_source_deactivates_after_close_and_drain() {
        let queue = Arc::new(SampleQueue::new(64));
        let mut src = QueueSource::new(queue.clone());
        src.start();

        queue.push_blocking(&[1, 2]);
        queue.close();

        let mut out = [0i16; 4];
        src.fill(&mut out);
        assert!(src.is_active());
        src.fill(&mut out);
        assert!(!src.is_active());
    }
}
