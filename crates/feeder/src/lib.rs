//! Continuous low-latency PCM feeder.
//!
//! Keeps an audio output perpetually fed with mono 16-bit PCM at the
//! hardware's preferred cadence, switching between silence and generated
//! audio with one-buffer-cycle response time.
//!
//! ## Structure
//! - [`params`]: resolve output sample rate / frames-per-buffer from a
//!   platform probe, with safe fallbacks.
//! - [`signal`]: lock-free single-bit handoff between the control thread and
//!   the callback thread.
//! - [`source`]: sample producers (fading tone, queue-backed stream).
//! - [`engine`]: the underflow callback and double-buffer feeder.
//!
//! The real-time entry point is [`engine::FeederEngine::on_underflow`]; it
//! never blocks, never allocates in steady state, and always produces a
//! buffer (silence is the fallback content).

pub mod config;
pub mod engine;
pub mod params;
pub mod queue;
pub mod signal;
pub mod source;
pub mod status;
