//! Underflow callback and double-buffer feeder.
//!
//! ## Ordering
//! The feeder is prepare-then-enqueue: each hardware request first consumes
//! pending control signals and renders matching content into the writable
//! slot, then hands exactly that slot to the output. A start request raised
//! before request *k* is therefore audible in the buffer enqueued at request
//! *k*, not one request later. The swap-then-prepare variant re-enqueues the
//! previously prepared (stale) slot first and only then renders, which delays
//! every state change by a full buffer period.
//!
//! ## Real-time constraints
//! `on_underflow` takes no locks and performs no allocation; both slots are
//! sized once at construction. There is no error path: the fallback content
//! is silence, never a missing buffer.

use std::sync::Arc;

use crate::params::PlaybackParams;
use crate::signal::{ControlHandle, Signal};
use crate::source::AudioSource;
use crate::status::FeederCounters;

/// Destination for prepared buffers.
///
/// Implementations must be callable from the callback thread without
/// blocking; the slice is only valid for the duration of the call.
pub trait OutputSink {
    fn enqueue(&mut self, samples: &[i16]);
}

/// Two fixed slots: one in flight to the output, one writable.
///
/// The producer only ever touches the writable slot; ownership flips at each
/// enqueue via [`DoubleBuffer::swap`].
struct DoubleBuffer {
    slots: [Vec<i16>; 2],
    writable: usize,
}

impl DoubleBuffer {
    fn new(frames: usize) -> Self {
        Self {
            slots: [vec![0; frames], vec![0; frames]],
            writable: 0,
        }
    }

    fn writable_mut(&mut self) -> &mut [i16] {
        &mut self.slots[self.writable]
    }

    fn swap(&mut self) {
        self.writable ^= 1;
    }
}

/// The session-long feeder: owns the source, the double buffer, and the
/// callback-thread side of the control signals.
///
/// Everything here is single-writer (callback thread) once playback begins;
/// the control thread reaches in only through the atomic [`Signal`] bits.
pub struct FeederEngine {
    params: PlaybackParams,
    source: Box<dyn AudioSource>,
    start: Arc<Signal>,
    stop: Arc<Signal>,
    buffers: DoubleBuffer,
    counters: FeederCounters,
}

impl FeederEngine {
    pub fn new(
        params: PlaybackParams,
        source: Box<dyn AudioSource>,
        counters: FeederCounters,
    ) -> Self {
        Self {
            buffers: DoubleBuffer::new(params.frames_per_buffer as usize),
            params,
            source,
            start: Arc::new(Signal::new()),
            stop: Arc::new(Signal::new()),
            counters,
        }
    }

    pub fn params(&self) -> &PlaybackParams {
        &self.params
    }

    /// Control-side handle for start/stop requests. Cloneable, any thread.
    pub fn control(&self) -> ControlHandle {
        ControlHandle::new(self.start.clone(), self.stop.clone())
    }

    /// Enqueue one silent buffer so the output starts with data in flight
    /// and never pays warm-up latency on the first real request.
    pub fn warm_up(&mut self, sink: &mut dyn OutputSink) {
        let buf = self.buffers.writable_mut();
        buf.fill(0);
        sink.enqueue(buf);
        self.buffers.swap();
    }

    /// Service one hardware request for `samples_needed` more samples.
    ///
    /// Emits exactly `min(frames_per_buffer, samples_needed)` samples:
    /// 1. consume a pending stop, then a pending start (a start while
    ///    already active is ignored, so repeated requests never reset the
    ///    play-through)
    /// 2. render into the writable slot
    /// 3. enqueue that exact slot and flip ownership
    pub fn on_underflow(&mut self, samples_needed: usize, sink: &mut dyn OutputSink) {
        if self.stop.take() {
            self.source.stop();
        }
        if self.start.take() && !self.source.is_active() {
            self.source.start();
        }

        let count = samples_needed.min(self.params.frames_per_buffer as usize);
        let active = self.source.is_active();

        let buf = &mut self.buffers.writable_mut()[..count];
        self.source.fill(buf);
        sink.enqueue(buf);
        self.buffers.swap();

        self.counters.record(count, active);
    }
}
