//! Recurrent cell math: GRU and LSTM gated updates.
//!
//! Weight layout matches the RTNeural JSON convention: `w_ih` is
//! `[gates * HIDDEN, INPUT]` (input-to-hidden), `w_hh` is
//! `[gates * HIDDEN, HIDDEN]` (hidden-to-hidden), and `bias` is
//! `[gates * HIDDEN]` — the input-side and recurrent-side bias vectors the
//! JSON stores separately are summed once at load time since the cell always
//! uses them additively. Gate order is `[z, r, n]` for GRU and `[i, f, g, o]`
//! for LSTM.

use ampcore_dsp::flush_denormal;
use libm::{expf, tanhf};

/// Which recurrent cell type a model variant's weights were trained for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Gated recurrent unit: 3 gates per hidden unit, no separate cell state.
    Gru,
    /// Long short-term memory: 4 gates per hidden unit, plus a cell state.
    Lstm,
}

impl CellKind {
    /// Number of gates this cell type computes per hidden unit.
    pub const fn gate_count(self) -> usize {
        match self {
            CellKind::Gru => 3,
            CellKind::Lstm => 4,
        }
    }
}

#[inline]
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + expf(-x))
}

/// A recurrent cell with `HIDDEN` hidden units and `INPUT`-dimensional input,
/// owning its own weights and running state.
#[derive(Debug, Clone)]
pub struct RecurrentCell<const INPUT: usize, const HIDDEN: usize> {
    kind: CellKind,
    /// `[gates * HIDDEN, INPUT]`, row-major.
    w_ih: Vec<f32>,
    /// `[gates * HIDDEN, HIDDEN]`, row-major.
    w_hh: Vec<f32>,
    /// `[gates * HIDDEN]`, input-side and recurrent-side biases pre-summed.
    bias: Vec<f32>,
    hidden: [f32; HIDDEN],
    cell_state: [f32; HIDDEN],
}

impl<const INPUT: usize, const HIDDEN: usize> RecurrentCell<INPUT, HIDDEN> {
    /// Build a cell from flattened weight matrices. Panics if the slice
    /// lengths don't match `kind`'s expected gate count — this is a load-time
    /// validation, never hit on the audio thread.
    pub fn new(kind: CellKind, w_ih: Vec<f32>, w_hh: Vec<f32>, bias: Vec<f32>) -> Self {
        let gates = kind.gate_count();
        assert_eq!(w_ih.len(), gates * HIDDEN * INPUT, "w_ih size mismatch");
        assert_eq!(w_hh.len(), gates * HIDDEN * HIDDEN, "w_hh size mismatch");
        assert_eq!(bias.len(), gates * HIDDEN, "bias size mismatch");
        Self {
            kind,
            w_ih,
            w_hh,
            bias,
            hidden: [0.0; HIDDEN],
            cell_state: [0.0; HIDDEN],
        }
    }

    /// Reset hidden and cell state to zero.
    pub fn reset(&mut self) {
        self.hidden = [0.0; HIDDEN];
        self.cell_state = [0.0; HIDDEN];
    }

    /// Current hidden state.
    pub fn hidden(&self) -> &[f32; HIDDEN] {
        &self.hidden
    }

    /// Compute the pre-activation for gate `g`, hidden unit `h`: one row of
    /// `w_ih · x + w_hh · hidden + bias`.
    #[inline]
    fn gate_preactivation(&self, g: usize, h: usize, input: &[f32; INPUT]) -> f32 {
        let row = g * HIDDEN + h;
        let mut acc = self.bias[row];
        let ih_row = &self.w_ih[row * INPUT..row * INPUT + INPUT];
        for (w, x) in ih_row.iter().zip(input.iter()) {
            acc += w * x;
        }
        let hh_row = &self.w_hh[row * HIDDEN..row * HIDDEN + HIDDEN];
        for (w, h_prev) in hh_row.iter().zip(self.hidden.iter()) {
            acc += w * h_prev;
        }
        acc
    }

    /// Advance the cell by one timestep, updating `hidden` (and `cell_state`
    /// for LSTM) in place.
    pub fn step(&mut self, input: &[f32; INPUT]) {
        match self.kind {
            CellKind::Gru => self.step_gru(input),
            CellKind::Lstm => self.step_lstm(input),
        }
    }

    fn step_gru(&mut self, input: &[f32; INPUT]) {
        let mut new_hidden = [0.0f32; HIDDEN];
        for h in 0..HIDDEN {
            let z = sigmoid(self.gate_preactivation(0, h, input));
            let r = sigmoid(self.gate_preactivation(1, h, input));

            // n = tanh(Wn·x + r * (Un·h + bn)); bias for gate n is already
            // folded into the preactivation, so recompute the Un·h term alone
            // to apply r only to the recurrent contribution, matching the
            // standard GRU update (not the "reset before matmul" variant).
            let row = 2 * HIDDEN + h;
            let wn_x: f32 = self.w_ih[row * INPUT..row * INPUT + INPUT]
                .iter()
                .zip(input.iter())
                .map(|(w, x)| w * x)
                .sum();
            let un_h: f32 = self.w_hh[row * HIDDEN..row * HIDDEN + HIDDEN]
                .iter()
                .zip(self.hidden.iter())
                .map(|(w, hp)| w * hp)
                .sum();
            let n = tanhf(wn_x + r * (un_h + self.bias[row]));

            new_hidden[h] = flush_denormal((1.0 - z) * n + z * self.hidden[h]);
        }
        self.hidden = new_hidden;
    }

    fn step_lstm(&mut self, input: &[f32; INPUT]) {
        let mut new_hidden = [0.0f32; HIDDEN];
        let mut new_cell = [0.0f32; HIDDEN];
        for h in 0..HIDDEN {
            let i = sigmoid(self.gate_preactivation(0, h, input));
            let f = sigmoid(self.gate_preactivation(1, h, input));
            let g = tanhf(self.gate_preactivation(2, h, input));
            let o = sigmoid(self.gate_preactivation(3, h, input));

            new_cell[h] = flush_denormal(f * self.cell_state[h] + i * g);
            new_hidden[h] = flush_denormal(o * tanhf(new_cell[h]));
        }
        self.hidden = new_hidden;
        self.cell_state = new_cell;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gru_zero_weights_holds_hidden_at_zero() {
        let mut cell: RecurrentCell<1, 4> = RecurrentCell::new(
            CellKind::Gru,
            vec![0.0; 3 * 4 * 1],
            vec![0.0; 3 * 4 * 4],
            vec![0.0; 3 * 4],
        );
        cell.step(&[1.0]);
        assert_eq!(*cell.hidden(), [0.0; 4]);
    }

    #[test]
    fn lstm_zero_weights_holds_hidden_at_zero() {
        let mut cell: RecurrentCell<1, 4> = RecurrentCell::new(
            CellKind::Lstm,
            vec![0.0; 4 * 4 * 1],
            vec![0.0; 4 * 4 * 4],
            vec![0.0; 4 * 4],
        );
        cell.step(&[1.0]);
        assert_eq!(*cell.hidden(), [0.0; 4]);
    }

    #[test]
    fn gru_reset_clears_state() {
        let mut cell: RecurrentCell<1, 2> = RecurrentCell::new(
            CellKind::Gru,
            vec![1.0; 3 * 2 * 1],
            vec![0.1; 3 * 2 * 2],
            vec![0.0; 3 * 2],
        );
        cell.step(&[1.0]);
        assert_ne!(*cell.hidden(), [0.0; 2]);
        cell.reset();
        assert_eq!(*cell.hidden(), [0.0; 2]);
    }

    #[test]
    fn step_produces_finite_output_for_nonzero_weights() {
        let mut cell: RecurrentCell<2, 8> = RecurrentCell::new(
            CellKind::Lstm,
            (0..4 * 8 * 2).map(|i| (i as f32 * 0.01).sin()).collect(),
            (0..4 * 8 * 8).map(|i| (i as f32 * 0.02).cos() * 0.1).collect(),
            vec![0.0; 4 * 8],
        );
        for n in 0..100 {
            cell.step(&[(n as f32 * 0.1).sin(), 0.5]);
            for &h in cell.hidden() {
                assert!(h.is_finite());
            }
        }
    }
}
