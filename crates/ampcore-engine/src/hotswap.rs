//! Lock-free-publish hot-swap slot for the neural model and cabinet
//! convolver.
//!
//! Swapping the pointer itself never blocks the audio thread. The
//! control-thread publisher still needs to know when it's safe to drop the
//! old value, since the audio thread may be mid-inference on it when the
//! swap happens; that's what `in_use` tracks. The guard around the actual
//! value is a `parking_lot::Mutex`, but since only the audio thread ever
//! locks it, it's never contended in practice.

use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

const PREWARM_SAMPLES: usize = 2048;
const SPIN_SLEEP: Duration = Duration::from_millis(1);
const SPIN_TIMEOUT: Duration = Duration::from_millis(50);

/// Something that can run itself once on a throwaway silent buffer to pay
/// for any first-call allocation or cache-warming cost off the audio thread.
pub trait Prewarm {
    fn prewarm(&mut self);
}

/// A hot-swappable slot for one audio-thread resource (model or convolver).
pub struct HotSwap<T> {
    slot: ArcSwapOption<Mutex<T>>,
    in_use: AtomicBool,
}

impl<T> HotSwap<T> {
    pub fn empty() -> Self {
        Self { slot: ArcSwapOption::empty(), in_use: AtomicBool::new(false) }
    }

    /// Build, pre-warm, and publish `value`, replacing whatever was
    /// published before. Blocks the calling (control) thread, never the
    /// audio thread: waits up to [`SPIN_TIMEOUT`] for the audio thread to
    /// finish with the outgoing value before dropping it.
    pub fn publish(&self, mut value: T, kind: &'static str)
    where
        T: Prewarm,
    {
        value.prewarm();
        let new_arc = Arc::new(Mutex::new(value));
        let old = self.slot.swap(Some(new_arc));

        if let Some(old_arc) = old {
            let start = Instant::now();
            while self.in_use.load(Ordering::SeqCst) && start.elapsed() < SPIN_TIMEOUT {
                thread::sleep(SPIN_SLEEP);
            }
            drop(old_arc);
        }

        tracing::info!(kind, "published");
    }

    /// Clear the slot, dropping whatever was published (after the same
    /// bounded wait for the audio thread to finish with it).
    pub fn clear(&self) {
        let old = self.slot.swap(None);
        if let Some(old_arc) = old {
            let start = Instant::now();
            while self.in_use.load(Ordering::SeqCst) && start.elapsed() < SPIN_TIMEOUT {
                thread::sleep(SPIN_SLEEP);
            }
            drop(old_arc);
        }
    }

    /// `true` if a value is currently published.
    pub fn is_loaded(&self) -> bool {
        self.slot.load().is_some()
    }

    /// Run `f` against the published value, if any. Called from the audio
    /// thread once per buffer (or per sample); marks `in_use` for the
    /// duration so a concurrent [`Self::publish`] knows to wait.
    #[inline]
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let guard = self.slot.load();
        let arc = guard.as_ref()?;
        self.in_use.store(true, Ordering::Release);
        let mut locked = arc.lock();
        let result = f(&mut locked);
        drop(locked);
        self.in_use.store(false, Ordering::Release);
        Some(result)
    }
}

impl<T> Default for HotSwap<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Run `process_zero` `PREWARM_SAMPLES` times to prime any lazily-computed
/// state before a value is published to the audio thread.
pub fn run_prewarm_samples(mut process_zero: impl FnMut()) {
    for _ in 0..PREWARM_SAMPLES {
        process_zero();
    }
}
