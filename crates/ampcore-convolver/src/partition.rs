//! Uniform-partitioned overlap-add FFT convolution for a single block size.
//!
//! The impulse response is chopped into consecutive `block`-sample segments,
//! each zero-padded to `2 * block` and transformed once at construction.
//! Every call to [`PartitionedConvolver::process_block`] transforms one new
//! `block`-sample input chunk, multiplies it against every IR partition at
//! its matching delay, sums the products in the frequency domain, and
//! inverse-transforms the sum. Each inverse-FFT produces `2 * block` samples
//! of which the first `block` overlap the previous call's tail; the two are
//! added together (overlap-add) to produce the linear convolution output.

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::collections::VecDeque;
use std::sync::Arc;

pub struct PartitionedConvolver {
    block: usize,
    fft: Arc<dyn Fft<f32>>,
    ifft: Arc<dyn Fft<f32>>,
    ir_partitions: Vec<Vec<Complex<f32>>>,
    input_history: VecDeque<Vec<Complex<f32>>>,
    overlap: Vec<f32>,
    forward_scratch: Vec<Complex<f32>>,
    accumulator: Vec<Complex<f32>>,
}

impl PartitionedConvolver {
    /// Build a convolver for `ir`, partitioned into `block`-sample segments.
    /// `ir` may be any length, including zero (a convolver with no
    /// partitions that always outputs silence).
    pub fn new(block: usize, ir: &[f32]) -> Self {
        assert!(block > 0, "block size must be positive");
        let fft_size = block * 2;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let ifft = planner.plan_fft_inverse(fft_size);

        let ir_partitions = if ir.is_empty() {
            Vec::new()
        } else {
            ir.chunks(block)
                .map(|chunk| {
                    let mut buf = vec![Complex::new(0.0, 0.0); fft_size];
                    for (slot, &sample) in buf.iter_mut().zip(chunk.iter()) {
                        *slot = Complex::new(sample, 0.0);
                    }
                    fft.process(&mut buf);
                    buf
                })
                .collect()
        };

        Self {
            block,
            fft,
            ifft,
            ir_partitions,
            input_history: VecDeque::new(),
            overlap: vec![0.0; block],
            forward_scratch: vec![Complex::new(0.0, 0.0); fft_size],
            accumulator: vec![Complex::new(0.0, 0.0); fft_size],
        }
    }

    pub fn block_size(&self) -> usize {
        self.block
    }

    pub fn num_partitions(&self) -> usize {
        self.ir_partitions.len()
    }

    /// Process exactly `block_size()` input samples, writing exactly
    /// `block_size()` output samples.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), self.block);
        debug_assert_eq!(output.len(), self.block);

        if self.ir_partitions.is_empty() {
            output.copy_from_slice(&self.overlap);
            self.overlap.iter_mut().for_each(|s| *s = 0.0);
            return;
        }

        for slot in self.forward_scratch.iter_mut() {
            *slot = Complex::new(0.0, 0.0);
        }
        for (slot, &sample) in self.forward_scratch.iter_mut().zip(input.iter()) {
            *slot = Complex::new(sample, 0.0);
        }
        self.fft.process(&mut self.forward_scratch);

        self.input_history.push_front(self.forward_scratch.clone());
        if self.input_history.len() > self.ir_partitions.len() {
            self.input_history.pop_back();
        }

        for slot in self.accumulator.iter_mut() {
            *slot = Complex::new(0.0, 0.0);
        }
        for (delayed, ir_partition) in self.input_history.iter().zip(self.ir_partitions.iter()) {
            for (acc, (x, h)) in
                self.accumulator.iter_mut().zip(delayed.iter().zip(ir_partition.iter()))
            {
                *acc += x * h;
            }
        }

        self.ifft.process(&mut self.accumulator);
        let scale = 1.0 / (self.block * 2) as f32;

        for i in 0..self.block {
            output[i] = self.accumulator[i].re * scale + self.overlap[i];
        }
        for i in 0..self.block {
            self.overlap[i] = self.accumulator[self.block + i].re * scale;
        }
    }

    /// Total algorithmic latency introduced by this single block stage.
    pub fn latency_samples(&self) -> usize {
        self.block
    }
}
