//! Monomorphized model variants and the runtime-dispatched wrapper around
//! them.
//!
//! The model's `(input_size, hidden_size)` pair is fixed once a model file
//! loads, so each combination gets its own const-generic
//! [`RecurrentModel`] instance rather than paying for dynamic shape checks on
//! every sample. Cell type (GRU/LSTM) and the output sigmoid flag stay as
//! runtime fields on [`RecurrentModel`] since they don't affect memory
//! layout.

use crate::cell::{CellKind, RecurrentCell};
use crate::descriptor::ModelDescriptor;
use crate::error::ModelLoadError;
use libm::expf;

#[inline]
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + expf(-x))
}

/// A recurrent cell plus its output projection: `hidden -> 1`, optionally
/// squashed through a sigmoid.
#[derive(Debug, Clone)]
pub struct RecurrentModel<const INPUT: usize, const HIDDEN: usize> {
    cell: RecurrentCell<INPUT, HIDDEN>,
    out_weight: [f32; HIDDEN],
    out_bias: f32,
    sigmoid: bool,
}

impl<const INPUT: usize, const HIDDEN: usize> RecurrentModel<INPUT, HIDDEN> {
    fn new(
        cell_kind: CellKind,
        w_ih: Vec<f32>,
        w_hh: Vec<f32>,
        bias: Vec<f32>,
        out_weight: Vec<f32>,
        out_bias: f32,
        sigmoid: bool,
    ) -> Self {
        let mut out = [0.0f32; HIDDEN];
        out.copy_from_slice(&out_weight);
        Self {
            cell: RecurrentCell::new(cell_kind, w_ih, w_hh, bias),
            out_weight: out,
            out_bias,
            sigmoid,
        }
    }

    fn forward(&mut self, input: &[f32; INPUT]) -> f32 {
        self.cell.step(input);
        let mut y = self.out_bias;
        for (w, h) in self.out_weight.iter().zip(self.cell.hidden().iter()) {
            y += w * h;
        }
        if self.sigmoid { sigmoid(y) } else { y }
    }

    fn reset(&mut self) {
        self.cell.reset();
    }
}

macro_rules! variants {
    ($($name:ident($input:literal, $hidden:literal)),+ $(,)?) => {
        /// A loaded amplifier model, dispatched by `(input_size, hidden_size)`.
        #[derive(Debug, Clone)]
        pub enum ModelVariant {
            /// No model loaded; the engine should route around the model stage.
            Null,
            $(
                #[doc = concat!("input_size = ", stringify!($input), ", hidden_size = ", stringify!($hidden))]
                $name(RecurrentModel<$input, $hidden>),
            )+
        }

        impl ModelVariant {
            /// Build the variant matching `desc`'s `(input_size, hidden)` pair.
            pub fn from_descriptor(desc: ModelDescriptor) -> Result<Self, ModelLoadError> {
                match (desc.input_size, desc.hidden) {
                    $(
                        ($input, $hidden) => Ok(ModelVariant::$name(RecurrentModel::new(
                            desc.cell,
                            desc.w_ih,
                            desc.w_hh,
                            desc.bias,
                            desc.out_weight,
                            desc.out_bias,
                            desc.sigmoid,
                        ))),
                    )+
                    (input_size, hidden) => Err(ModelLoadError::UnrecognizedArchitecture {
                        layer_type: None,
                        hidden: Some(hidden),
                        input_size: Some(input_size),
                    }),
                }
            }

            /// Run one timestep. `param1`/`param2` are ignored by variants whose
            /// `input_size` doesn't use them.
            pub fn forward(&mut self, sample: f32, param1: f32, param2: f32) -> f32 {
                match self {
                    ModelVariant::Null => sample,
                    $(
                        ModelVariant::$name(m) => {
                            let input = Self::build_input::<$input>(sample, param1, param2);
                            m.forward(&input)
                        }
                    )+
                }
            }

            /// Reset recurrent state (e.g. on model hot-swap or transport stop).
            pub fn reset(&mut self) {
                match self {
                    ModelVariant::Null => {}
                    $(ModelVariant::$name(m) => m.reset(),)+
                }
            }

            /// `true` for any model variant other than [`ModelVariant::Null`].
            pub fn is_loaded(&self) -> bool {
                !matches!(self, ModelVariant::Null)
            }

            /// The model's input width (1, 2, or 3), or 0 when no model is loaded.
            pub fn input_size(&self) -> usize {
                match self {
                    ModelVariant::Null => 0,
                    $(ModelVariant::$name(_) => $input,)+
                }
            }
        }
    };
}

impl ModelVariant {
    fn build_input<const N: usize>(sample: f32, param1: f32, param2: f32) -> [f32; N] {
        let mut input = [0.0f32; N];
        input[0] = sample;
        if N > 1 {
            input[1] = param1;
        }
        if N > 2 {
            input[2] = param2;
        }
        input
    }
}

variants! {
    Io1H8(1, 8), Io1H12(1, 12), Io1H16(1, 16), Io1H20(1, 20), Io1H32(1, 32), Io1H40(1, 40),
    Io2H8(2, 8), Io2H12(2, 12), Io2H16(2, 16), Io2H20(2, 20), Io2H32(2, 32), Io2H40(2, 40),
    Io3H8(3, 8), Io3H12(3, 12), Io3H16(3, 16), Io3H20(3, 20), Io3H32(3, 32), Io3H40(3, 40),
}

/// The published, hot-swappable amplifier model: a [`ModelVariant`] plus the
/// input/output gain staging and skip-connection flag that apply around it.
#[derive(Debug, Clone)]
pub struct DynamicModel {
    variant: ModelVariant,
    /// When set, the model's output is added to a scaled copy of the input
    /// rather than replacing it (a residual/skip connection some
    /// architectures are trained with).
    pub input_skip: bool,
    pub input_gain: f32,
    pub output_gain: f32,
}

impl DynamicModel {
    /// The silent default: no model loaded, unity gains, no skip connection.
    pub fn null() -> Self {
        Self {
            variant: ModelVariant::Null,
            input_skip: false,
            input_gain: 1.0,
            output_gain: 1.0,
        }
    }

    pub fn new(variant: ModelVariant, input_skip: bool, input_gain: f32, output_gain: f32) -> Self {
        Self { variant, input_skip, input_gain, output_gain }
    }

    pub fn is_loaded(&self) -> bool {
        self.variant.is_loaded()
    }

    /// The model's input width (1, 2, or 3), or 0 when no model is loaded.
    pub fn input_size(&self) -> usize {
        self.variant.input_size()
    }

    pub fn reset(&mut self) {
        self.variant.reset();
    }

    /// Process one sample through the model stage.
    ///
    /// In skip mode the input is scaled by `input_gain` *before* it reaches
    /// the recurrent cell, not just on the residual term added back in — the
    /// cell sees the same gain-staged signal the residual carries.
    pub fn process(&mut self, sample: f32, param1: f32, param2: f32) -> f32 {
        if !self.variant.is_loaded() {
            return sample;
        }
        if self.input_skip {
            let scaled = sample * self.input_gain;
            let modeled = self.variant.forward(scaled, param1, param2) * self.output_gain;
            scaled + modeled
        } else {
            self.variant.forward(sample, param1, param2) * self.output_gain
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ModelDescriptor;

    fn zero_descriptor(cell: CellKind, input_size: usize, hidden: usize) -> ModelDescriptor {
        let gates = cell.gate_count();
        ModelDescriptor {
            cell,
            hidden,
            input_size,
            sigmoid: false,
            w_ih: vec![0.0; gates * hidden * input_size],
            w_hh: vec![0.0; gates * hidden * hidden],
            bias: vec![0.0; gates * hidden],
            out_weight: vec![0.0; hidden],
            out_bias: 0.0,
            input_skip: false,
            input_gain: 1.0,
            output_gain: 1.0,
        }
    }

    #[test]
    fn null_variant_passes_through() {
        let mut m = ModelVariant::Null;
        assert_eq!(m.forward(0.42, 0.0, 0.0), 0.42);
    }

    #[test]
    fn from_descriptor_dispatches_to_matching_variant() {
        let desc = zero_descriptor(CellKind::Gru, 2, 16);
        let variant = ModelVariant::from_descriptor(desc).unwrap();
        assert!(matches!(variant, ModelVariant::Io2H16(_)));
    }

    #[test]
    fn from_descriptor_rejects_unknown_shape() {
        let desc = zero_descriptor(CellKind::Gru, 2, 17);
        assert!(ModelVariant::from_descriptor(desc).is_err());
    }

    #[test]
    fn dynamic_model_null_is_passthrough_regardless_of_gains() {
        let mut m = DynamicModel::new(ModelVariant::Null, true, 2.0, 5.0);
        assert_eq!(m.process(0.3, 0.0, 0.0), 0.3);
    }

    #[test]
    fn dynamic_model_skip_mode_adds_scaled_input() {
        let desc = zero_descriptor(CellKind::Gru, 1, 8);
        let variant = ModelVariant::from_descriptor(desc).unwrap();
        // zero weights => modeled output is always 0, so skip mode should
        // reduce to `sample * input_gain`.
        let mut m = DynamicModel::new(variant, true, 0.5, 1.0);
        assert_eq!(m.process(1.0, 0.0, 0.0), 0.5);
    }
}
