//! Background worker that runs the large-block tail convolution off the
//! audio thread.
//!
//! Exactly one "work token" circulates between the audio thread and the
//! worker: `start` (initial count 1, so the worker's first pass runs
//! immediately on a silent block) and `finished` (initial count 0). The
//! audio thread's [`TailWorker::exchange`] waits on `finished` before using a
//! result and reusing its buffer, then posts `start` to hand off the next
//! block — by construction the worker has a full tail-block period to run
//! before that wait is reached again, so the wait is effectively
//! non-blocking in steady state.

use crate::partition::PartitionedConvolver;
use crate::semaphore::BinarySemaphore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

const JOIN_TIMEOUT: Duration = Duration::from_secs(5);

pub struct TailWorker {
    start: Arc<BinarySemaphore>,
    finished: Arc<BinarySemaphore>,
    should_exit: Arc<AtomicBool>,
    input: Arc<Mutex<Vec<f32>>>,
    output: Arc<Mutex<Vec<f32>>>,
    handle: Option<JoinHandle<()>>,
    block: usize,
}

impl TailWorker {
    pub fn new(block: usize, ir: Vec<f32>) -> Self {
        let start = Arc::new(BinarySemaphore::new(true));
        let finished = Arc::new(BinarySemaphore::new(false));
        let should_exit = Arc::new(AtomicBool::new(false));
        let input = Arc::new(Mutex::new(vec![0.0; block]));
        let output = Arc::new(Mutex::new(vec![0.0; block]));

        let worker_start = start.clone();
        let worker_finished = finished.clone();
        let worker_exit = should_exit.clone();
        let worker_input = input.clone();
        let worker_output = output.clone();

        let handle = std::thread::Builder::new()
            .name("ampcore-convolver-tail".into())
            .spawn(move || {
                let mut convolver = PartitionedConvolver::new(block, &ir);
                loop {
                    worker_start.wait();
                    if worker_exit.load(Ordering::Acquire) {
                        break;
                    }
                    let input = worker_input.lock().expect("tail input poisoned");
                    let mut output = worker_output.lock().expect("tail output poisoned");
                    convolver.process_block(&input, &mut output);
                    drop(input);
                    drop(output);
                    worker_finished.post();
                }
            })
            .expect("failed to spawn cabinet convolution worker thread");

        Self { start, finished, should_exit, input, output, handle: Some(handle), block }
    }

    pub fn block_size(&self) -> usize {
        self.block
    }

    /// Retrieve the output of the block handed over on the previous call
    /// (or silence, on the first call), then hand `new_block` to the worker
    /// to process while the audio thread continues.
    pub fn exchange(&self, new_block: &[f32], out: &mut [f32]) {
        debug_assert_eq!(new_block.len(), self.block);
        debug_assert_eq!(out.len(), self.block);

        self.finished.wait();
        {
            let output = self.output.lock().expect("tail output poisoned");
            out.copy_from_slice(&output);
        }
        {
            let mut input = self.input.lock().expect("tail input poisoned");
            input.copy_from_slice(new_block);
        }
        self.start.post();
    }

    /// Total latency this stage adds: one full block to accumulate input
    /// plus one full block for the worker round-trip.
    pub fn latency_samples(&self) -> usize {
        self.block * 2
    }
}

impl Drop for TailWorker {
    fn drop(&mut self) {
        self.should_exit.store(true, Ordering::Release);
        self.start.post();
        if let Some(handle) = self.handle.take() {
            let (tx, rx) = std::sync::mpsc::channel();
            std::thread::spawn(move || {
                let _ = handle.join();
                let _ = tx.send(());
            });
            let _ = rx.recv_timeout(JOIN_TIMEOUT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_exchange_returns_silence() {
        let worker = TailWorker::new(16, vec![1.0; 16]);
        let input = vec![0.5; 16];
        let mut output = vec![9.0; 16];
        worker.exchange(&input, &mut output);
        assert!(output.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn second_exchange_reflects_first_blocks_convolution() {
        let worker = TailWorker::new(8, vec![1.0, 0.5]);
        let block_a = vec![1.0; 8];
        let mut out_a = vec![0.0; 8];
        worker.exchange(&block_a, &mut out_a);
        assert!(out_a.iter().all(|&s| s == 0.0));

        let block_b = vec![0.0; 8];
        let mut out_b = vec![0.0; 8];
        worker.exchange(&block_b, &mut out_b);
        assert!(out_b.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn drop_joins_worker_thread_promptly() {
        let worker = TailWorker::new(32, vec![0.0; 32]);
        drop(worker);
    }
}
