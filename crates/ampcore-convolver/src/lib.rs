//! Two-stage threaded FFT convolution for cabinet impulse responses.
//!
//! [`Convolver`] splits an impulse response into a short head segment
//! processed synchronously on the audio thread and, for IRs longer than
//! `2 * TAIL_BLOCK` samples, a long tail segment processed on a background
//! worker thread. The worker handoff is a pair of binary semaphores
//! ([`semaphore::BinarySemaphore`]) so the audio thread never does anything
//! but a single bounded wait.

mod convolver;
mod partition;
mod semaphore;
mod tail;

pub use convolver::{Convolver, HEAD_BLOCK, TAIL_BLOCK};
pub use partition::PartitionedConvolver;
