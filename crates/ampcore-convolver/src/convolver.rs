//! Public two-stage cabinet convolver.
//!
//! A short *head* segment of the impulse response runs synchronously on the
//! audio thread with a small FFT block (`HEAD_BLOCK`), for low latency. A
//! long *tail* segment runs on a background worker with a larger FFT block
//! (`TAIL_BLOCK`), for efficiency. When the whole IR fits within
//! `2 * TAIL_BLOCK` samples there is nothing left for a tail stage, so the
//! convolver falls back to head-only processing and never starts a worker
//! thread.
//!
//! The tail path adds `2 * TAIL_BLOCK` samples of latency (one block to
//! accumulate input, one for the worker round-trip). The head path alone
//! only adds `HEAD_BLOCK` samples. To keep the two contributions sample-
//! aligned when summed, the head output is pushed through a plain delay line
//! that pads it out to the same total latency as the tail.

use crate::partition::PartitionedConvolver;
use crate::tail::TailWorker;
use std::collections::VecDeque;

pub const HEAD_BLOCK: usize = 128;
pub const TAIL_BLOCK: usize = 1024;

struct BlockBuffered {
    convolver: PartitionedConvolver,
    pending_input: Vec<f32>,
    pending_len: usize,
    output_queue: VecDeque<f32>,
}

impl BlockBuffered {
    fn new(block: usize, ir: &[f32]) -> Self {
        Self {
            convolver: PartitionedConvolver::new(block, ir),
            pending_input: vec![0.0; block],
            pending_len: 0,
            output_queue: VecDeque::with_capacity(block * 2),
        }
    }

    fn push_sample(&mut self, sample: f32) {
        let block = self.pending_input.len();
        self.pending_input[self.pending_len] = sample;
        self.pending_len += 1;
        if self.pending_len == block {
            let mut output = vec![0.0; block];
            self.convolver.process_block(&self.pending_input, &mut output);
            self.output_queue.extend(output);
            self.pending_len = 0;
        }
    }

    fn pop_sample(&mut self) -> f32 {
        self.output_queue.pop_front().unwrap_or(0.0)
    }
}

struct TailBuffered {
    worker: TailWorker,
    pending_input: Vec<f32>,
    pending_len: usize,
    output_queue: VecDeque<f32>,
}

impl TailBuffered {
    fn new(ir: Vec<f32>) -> Self {
        let worker = TailWorker::new(TAIL_BLOCK, ir);
        Self {
            worker,
            pending_input: vec![0.0; TAIL_BLOCK],
            pending_len: 0,
            output_queue: VecDeque::with_capacity(TAIL_BLOCK * 2),
        }
    }

    fn push_sample(&mut self, sample: f32) {
        self.pending_input[self.pending_len] = sample;
        self.pending_len += 1;
        if self.pending_len == TAIL_BLOCK {
            let mut output = vec![0.0; TAIL_BLOCK];
            self.worker.exchange(&self.pending_input, &mut output);
            self.output_queue.extend(output);
            self.pending_len = 0;
        }
    }

    fn pop_sample(&mut self) -> f32 {
        self.output_queue.pop_front().unwrap_or(0.0)
    }
}

enum Stage {
    HeadOnly(BlockBuffered),
    TwoStage { head: BlockBuffered, tail: TailBuffered, head_delay: VecDeque<f32> },
}

/// A cabinet impulse-response convolver. `init` (construction) must happen
/// exactly once per instance before `process` is called.
pub struct Convolver {
    stage: Stage,
}

impl Convolver {
    /// Build a convolver for `ir` (mono, float32, at host sample rate).
    pub fn new(ir: &[f32]) -> Self {
        if ir.len() <= 2 * TAIL_BLOCK {
            return Self { stage: Stage::HeadOnly(BlockBuffered::new(HEAD_BLOCK, ir)) };
        }

        let head_len = 2 * TAIL_BLOCK;
        let head_ir = &ir[..head_len];
        let tail_ir = ir[head_len..].to_vec();

        let head = BlockBuffered::new(HEAD_BLOCK, head_ir);
        let tail = TailBuffered::new(tail_ir);
        let extra_delay = tail.worker.latency_samples().saturating_sub(HEAD_BLOCK);

        Self {
            stage: Stage::TwoStage {
                head,
                tail,
                head_delay: VecDeque::from(vec![0.0f32; extra_delay]),
            },
        }
    }

    /// `true` if this instance runs a background worker thread (i.e. the IR
    /// was long enough to need a tail stage).
    pub fn is_two_stage(&self) -> bool {
        matches!(self.stage, Stage::TwoStage { .. })
    }

    /// Process `input` sample-by-sample into `output` (equal lengths). Never
    /// allocates and never blocks for more than a bounded worker handoff.
    pub fn process(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), output.len());
        match &mut self.stage {
            Stage::HeadOnly(head) => {
                for (&x, y) in input.iter().zip(output.iter_mut()) {
                    head.push_sample(x);
                    *y = head.pop_sample();
                }
            }
            Stage::TwoStage { head, tail, head_delay } => {
                for (&x, y) in input.iter().zip(output.iter_mut()) {
                    head.push_sample(x);
                    tail.push_sample(x);

                    head_delay.push_back(head.pop_sample());
                    let delayed_head = head_delay.pop_front().unwrap_or(0.0);

                    *y = delayed_head + tail.pop_sample();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn direct_convolution(input: &[f32], ir: &[f32]) -> Vec<f32> {
        let mut out = vec![0.0; input.len() + ir.len() - 1];
        for (i, &x) in input.iter().enumerate() {
            for (j, &h) in ir.iter().enumerate() {
                out[i + j] += x * h;
            }
        }
        out
    }

    #[test]
    fn short_ir_uses_head_only_single_stage() {
        let ir = vec![1.0; 16];
        let conv = Convolver::new(&ir);
        assert!(!conv.is_two_stage());
    }

    #[test]
    fn long_ir_starts_worker_thread() {
        let ir = vec![0.0; 4 * TAIL_BLOCK];
        let conv = Convolver::new(&ir);
        assert!(conv.is_two_stage());
    }

    #[test]
    fn head_only_matches_direct_convolution_after_latency() {
        let ir = vec![1.0, -0.5, 0.25];
        let mut conv = Convolver::new(&ir);
        let input: Vec<f32> = (0..512).map(|i| ((i as f32) * 0.05).sin()).collect();
        let mut padded = input.clone();
        padded.extend(std::iter::repeat(0.0).take(HEAD_BLOCK));

        let mut output = vec![0.0; padded.len()];
        conv.process(&padded, &mut output);

        let expected = direct_convolution(&input, &ir);
        let latency = HEAD_BLOCK;
        for (i, &e) in expected.iter().enumerate() {
            assert!(
                (output[i + latency] - e).abs() < 1e-3,
                "sample {i}: {} vs {e}",
                output[i + latency]
            );
        }
    }

    #[test]
    fn two_stage_output_stays_finite_and_bounded() {
        let mut ir = vec![0.0; 3 * TAIL_BLOCK];
        ir[0] = 1.0;
        ir[TAIL_BLOCK + 10] = 0.3;
        ir[2 * TAIL_BLOCK + 5] = 0.1;
        let mut conv = Convolver::new(&ir);
        assert!(conv.is_two_stage());

        let input: Vec<f32> = (0..(TAIL_BLOCK * 6)).map(|i| ((i as f32) * 0.01).sin()).collect();
        let mut output = vec![0.0; input.len()];
        conv.process(&input, &mut output);

        for &s in &output {
            assert!(s.is_finite());
            assert!(s.abs() < 10.0);
        }
    }
}
