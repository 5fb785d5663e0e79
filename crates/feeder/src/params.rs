//! Output parameter resolution.
//!
//! Runs once at startup, never on the real-time path. Platform answers that
//! are missing or zero are replaced with conservative defaults, so resolution
//! always succeeds with best-effort values.

/// Fallback output sample rate when the platform reports nothing usable.
pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 44_100;

/// Fallback hardware chunk size, safe for generic output devices.
pub const DEFAULT_FRAMES_PER_BUFFER: u32 = 256;

/// Bytes per mono sample (16-bit signed PCM).
pub const BYTES_PER_SAMPLE: usize = size_of::<i16>();

/// Platform-side queries the resolver consumes.
///
/// `None` means the platform could not answer; a `Some(0)` answer is treated
/// the same way.
pub trait PlatformProbe {
    /// Whether the device advertises a low-latency audio path.
    fn has_low_latency_feature(&self) -> bool;
    /// Preferred output chunk size in frames.
    fn output_frames_per_buffer(&self) -> Option<u32>;
    /// Native output sample rate in Hz.
    fn native_sample_rate(&self) -> Option<u32>;
}

/// Resolved output parameters, immutable after startup.
///
/// Both numeric fields are strictly positive by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackParams {
    pub sample_rate_hz: u32,
    pub frames_per_buffer: u32,
    pub low_latency: bool,
}

/// Resolve output parameters from a platform probe.
///
/// Never errors: unusable answers get defaults and a log line.
pub fn resolve(probe: &dyn PlatformProbe) -> PlaybackParams {
    let sample_rate_hz = match probe.native_sample_rate() {
        Some(rate) if rate > 0 => rate,
        _ => {
            tracing::info!(
                fallback_hz = DEFAULT_SAMPLE_RATE_HZ,
                "platform reported no native sample rate"
            );
            DEFAULT_SAMPLE_RATE_HZ
        }
    };

    let frames_per_buffer = match probe.output_frames_per_buffer() {
        Some(frames) if frames > 0 => frames,
        _ => {
            tracing::info!(
                fallback_frames = DEFAULT_FRAMES_PER_BUFFER,
                "platform reported no preferred buffer size"
            );
            DEFAULT_FRAMES_PER_BUFFER
        }
    };

    let params = PlaybackParams {
        sample_rate_hz,
        frames_per_buffer,
        low_latency: probe.has_low_latency_feature(),
    };
    tracing::info!(
        rate_hz = params.sample_rate_hz,
        frames_per_buffer = params.frames_per_buffer,
        low_latency = params.low_latency,
        "resolved output params"
    );
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProbe {
        low_latency: bool,
        frames: Option<u32>,
        rate: Option<u32>,
    }

    impl PlatformProbe for FixedProbe {
        fn has_low_latency_feature(&self) -> bool {
            self.low_latency
        }
        fn output_frames_per_buffer(&self) -> Option<u32> {
            self.frames
        }
        fn native_sample_rate(&self) -> Option<u32> {
            self.rate
        }
    }

    #[test]
    fn resolve_passes_through_valid_answers() {
        let probe = FixedProbe {
            low_latency: true,
            frames: Some(192),
            rate: Some(48_000),
        };
        let params = resolve(&probe);
        assert_eq!(params.sample_rate_hz, 48_000);
        assert_eq!(params.frames_per_buffer, 192);
        assert!(params.low_latency);
    }

    #[test]
    fn resolve_defaults_unavailable_rate() {
        let probe = FixedProbe {
            low_latency: false,
            frames: Some(192),
            rate: None,
        };
        assert_eq!(resolve(&probe).sample_rate_hz, DEFAULT_SAMPLE_RATE_HZ);
    }

    #[test]
    fn resolve_defaults_zero_rate() {
        let probe = FixedProbe {
            low_latency: false,
            frames: Some(192),
            rate: Some(0),
        };
        assert_eq!(resolve(&probe).sample_rate_hz, DEFAULT_SAMPLE_RATE_HZ);
    }

    #[test]
    fn resolve_defaults_unavailable_frames() {
        let probe = FixedProbe {
            low_latency: false,
            frames: None,
            rate: Some(44_100),
        };
        let params = resolve(&probe);
        assert_eq!(params.frames_per_buffer, DEFAULT_FRAMES_PER_BUFFER);
        assert_ne!(params.frames_per_buffer, 0);
    }

    #[test]
    fn resolve_defaults_zero_frames() {
        let probe = FixedProbe {
            low_latency: false,
            frames: Some(0),
            rate: Some(44_100),
        };
        assert_eq!(resolve(&probe).frames_per_buffer, DEFAULT_FRAMES_PER_BUFFER);
    }
}
