//! Bounded queue carrying externally produced mono samples.
//!
//! The hand-off between a non-real-time producer (for example a decoder
//! thread) and the callback-thread [`crate::source::QueueSource`]:
//! - the producer pushes with blocking back-pressure
//! - the callback side drains with a `try_lock` pop that never waits; a
//!   contended or empty queue simply yields fewer samples and the source
//!   pads with silence
//!
//! `close()` gives the consumer a deterministic end-of-stream marker.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

/// Compute a queue capacity in samples for a `(rate, seconds)` target.
///
/// Non-finite or non-positive `buffer_seconds` falls back to a safe value.
pub fn calc_max_buffered_samples(rate_hz: u32, buffer_seconds: f32) -> usize {
    let secs = if buffer_seconds.is_finite() && buffer_seconds > 0.0 {
        buffer_seconds
    } else {
        2.0
    };
    (rate_hz as f32 * secs).ceil() as usize
}

/// Thread-safe bounded queue of mono `i16` samples.
pub struct SampleQueue {
    inner: Mutex<Inner>,
    cv: Condvar,
    max_buffered_samples: usize,
}

struct Inner {
    queue: VecDeque<i16>,
    done: bool,
}

impl SampleQueue {
    pub fn new(max_buffered_samples: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                queue: VecDeque::new(),
                done: false,
            }),
            cv: Condvar::new(),
            max_buffered_samples: max_buffered_samples.max(1),
        }
    }

    /// Current buffered samples (best-effort snapshot).
    pub fn len(&self) -> usize {
        let g = self.inner.lock().unwrap();
        g.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the producer has closed the queue.
    ///
    /// A closed queue may still contain samples until drained.
    pub fn is_closed(&self) -> bool {
        let g = self.inner.lock().unwrap();
        g.done
    }

    /// Mark end-of-stream and wake blocked producers. Idempotent.
    pub fn close(&self) {
        let mut g = self.inner.lock().unwrap();
        g.done = true;
        drop(g);
        self.cv.notify_all();
    }

    /// Push samples, blocking while the queue is full.
    ///
    /// Returns early, dropping the remainder, if the queue is closed while
    /// waiting. Producer threads only; never call from the callback thread.
    pub fn push_blocking(&self, samples: &[i16]) {
        let mut offset = 0;

        while offset < samples.len() {
            let mut g = self.inner.lock().unwrap();

            while g.queue.len() >= self.max_buffered_samples && !g.done {
                g = self.cv.wait(g).unwrap();
            }
            if g.done {
                return;
            }

            while offset < samples.len() && g.queue.len() < self.max_buffered_samples {
                g.queue.push_back(samples[offset]);
                offset += 1;
            }

            drop(g);
            self.cv.notify_all();
        }
    }

    /// Pop up to `out.len()` samples without waiting.
    ///
    /// Uses `try_lock` so a contended queue costs the callback nothing; the
    /// caller pads the unwritten tail. `drained` is only reported while the
    /// lock is held, so the consumer never needs a second (blocking) query.
    pub fn pop_into(&self, out: &mut [i16]) -> Pop {
        let Ok(mut g) = self.inner.try_lock() else {
            return Pop {
                taken: 0,
                drained: false,
            };
        };

        let take = g.queue.len().min(out.len());
        for slot in out.iter_mut().take(take) {
            *slot = g.queue.pop_front().unwrap_or(0);
        }
        let drained = g.done && g.queue.is_empty();

        drop(g);
        if take > 0 {
            self.cv.notify_all();
        }
        Pop {
            taken: take,
            drained,
        }
    }
}

/// Outcome of a non-blocking pop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pop {
    /// Samples written into the caller's slice.
    pub taken: usize,
    /// Queue is closed and empty; no more samples will ever arrive.
    pub drained: bool,
}
