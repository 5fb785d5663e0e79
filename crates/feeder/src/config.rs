/// What the tone does when its fade cycle reaches zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CyclePolicy {
    /// Fall back to silence; a new start request retriggers the tone.
    Stop,
    /// Wrap the cursor and replay the cycle seamlessly.
    Loop,
}

/// Tone generator settings.
#[derive(Clone, Debug)]
pub struct ToneConfig {
    /// Oscillator frequency in Hz.
    pub frequency_hz: f32,
    /// Duration of one fade-to-zero cycle in seconds.
    pub cycle_seconds: f32,
    /// Peak amplitude in `0.0..=1.0` of full scale.
    pub amplitude: f32,
    /// End-of-cycle behavior.
    pub policy: CyclePolicy,
}

impl Default for ToneConfig {
    /// A4 with a one-second fade, played once per start request.
    fn default() -> Self {
        Self {
            frequency_hz: 440.0,
            cycle_seconds: 1.0,
            amplitude: 0.8,
            policy: CyclePolicy::Stop,
        }
    }
}
