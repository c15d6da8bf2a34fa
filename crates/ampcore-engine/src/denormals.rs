//! Scoped denormal flush-to-zero for the audio-processing hot path.
//!
//! Denormal floating point numbers (values far enough below normal range that
//! the FPU falls back to slow microcode) show up naturally in filter and
//! convolution tails decaying toward silence, and can measurably slow down
//! the audio thread. [`DenormalGuard`] sets the SSE flush-to-zero and
//! denormals-are-zero flags for its lifetime and restores the previous flags
//! on drop.
//!
//! On non-x86 targets this is a no-op; the guard still exists so call sites
//! don't need `#[cfg]`.

#[cfg(target_arch = "x86_64")]
#[allow(unsafe_code)]
mod imp {
    use std::arch::x86_64::{_MM_FLUSH_ZERO_ON, _mm_getcsr, _mm_setcsr};

    pub(crate) const FLUSH_ZERO_MASK: u32 = _MM_FLUSH_ZERO_ON as u32;
    // `_MM_DENORMALS_ZERO_ON` was removed from `std::arch::x86_64`; this is
    // the MXCSR DAZ bit (bit 6), matching the value the constant used to have.
    pub(crate) const DENORMALS_ZERO_MASK: u32 = 0x0040;

    pub struct Guard {
        previous: u32,
    }

    impl Guard {
        pub fn enter() -> Self {
            // SAFETY: MXCSR read/modify/write is always valid on x86_64; the
            // mask only touches the flush-to-zero and denormals-are-zero
            // bits, leaving rounding mode and exception masks untouched.
            let previous = unsafe { _mm_getcsr() };
            let next = previous | FLUSH_ZERO_MASK | DENORMALS_ZERO_MASK;
            unsafe { _mm_setcsr(next) };
            Self { previous }
        }
    }

    impl Drop for Guard {
        fn drop(&mut self) {
            unsafe { _mm_setcsr(self.previous) };
        }
    }
}

#[cfg(not(target_arch = "x86_64"))]
mod imp {
    pub struct Guard;

    impl Guard {
        pub fn enter() -> Self {
            Self
        }
    }
}

/// RAII guard that disables denormal slowdowns for its scope. Construct at
/// the top of a per-buffer `process` call; drop at the end of it.
pub struct DenormalGuard(imp::Guard);

impl DenormalGuard {
    /// Enter the denormal-safe scope, capturing the previous FPU state.
    pub fn enter() -> Self {
        Self(imp::Guard::enter())
    }
}
