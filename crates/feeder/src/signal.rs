//! Lock-free single-bit handoff between control thread and callback thread.
//!
//! The only mutable state shared across threads in this crate. The control
//! side raises the bit (`Release` store); the callback side consumes it with
//! an atomic test-and-clear (`AcqRel` swap), so each raise is observed
//! exactly once and a raise is visible to the very next callback.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A latched one-shot request bit.
#[derive(Debug, Default)]
pub struct Signal {
    flag: AtomicBool,
}

impl Signal {
    pub fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    /// Mark the request pending. Any thread, O(1), non-blocking.
    pub fn raise(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Atomically observe-and-reset. Returns `true` if a request was pending.
    ///
    /// Callback thread only; consuming twice for one raise is impossible.
    pub fn take(&self) -> bool {
        self.flag.swap(false, Ordering::AcqRel)
    }
}

/// Cloneable control-side handle to the engine's start/stop bits.
///
/// Both operations are a single atomic store and safe from any
/// non-real-time thread.
#[derive(Clone, Debug)]
pub struct ControlHandle {
    start: Arc<Signal>,
    stop: Arc<Signal>,
}

impl ControlHandle {
    pub(crate) fn new(start: Arc<Signal>, stop: Arc<Signal>) -> Self {
        Self { start, stop }
    }

    /// Request playback to begin on the next hardware request.
    pub fn request_start(&self) {
        self.start.raise();
    }

    /// Request the source to fall silent on the next hardware request.
    pub fn request_stop(&self) {
        self.stop.raise();
    }
}
