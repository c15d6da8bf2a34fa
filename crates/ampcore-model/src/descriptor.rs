//! Parsing and architecture identification for RTNeural-style model JSON.

use crate::cell::CellKind;
use crate::error::ModelLoadError;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const KNOWN_HIDDEN: [usize; 6] = [8, 12, 16, 20, 32, 40];
const KNOWN_INPUT: [usize; 3] = [1, 2, 3];

#[derive(Debug, Deserialize)]
struct RawModel {
    in_shape: Vec<Value>,
    #[serde(default)]
    in_skip: u32,
    #[serde(default)]
    in_gain: f32,
    #[serde(default)]
    out_gain: f32,
    layers: Vec<RawLayer>,
}

#[derive(Debug, Deserialize)]
struct RawLayer {
    #[serde(rename = "type")]
    layer_type: String,
    shape: Vec<Value>,
    #[serde(default)]
    activation: Option<String>,
    #[serde(default)]
    weights: Vec<Vec<f32>>,
    #[serde(default)]
    recurrent_weights: Vec<Vec<f32>>,
    #[serde(default)]
    biases: Vec<Vec<f32>>,
}

fn last_dim(shape: &[Value]) -> Option<usize> {
    shape.iter().rev().find_map(Value::as_u64).map(|v| v as usize)
}

fn flatten(rows: &[Vec<f32>]) -> Vec<f32> {
    rows.iter().flatten().copied().collect()
}

fn sum_bias_rows(rows: &[Vec<f32>], len: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; len];
    for row in rows {
        for (acc, v) in out.iter_mut().zip(row.iter()) {
            *acc += v;
        }
    }
    out
}

/// Everything needed to build a [`crate::variant::ModelVariant`]: identified
/// architecture plus flattened, load-ready weight buffers.
#[derive(Debug, Clone)]
pub struct ModelDescriptor {
    pub cell: CellKind,
    pub hidden: usize,
    pub input_size: usize,
    pub sigmoid: bool,
    pub w_ih: Vec<f32>,
    pub w_hh: Vec<f32>,
    pub bias: Vec<f32>,
    pub out_weight: Vec<f32>,
    pub out_bias: f32,
    pub input_skip: bool,
    pub input_gain: f32,
    pub output_gain: f32,
}

impl ModelDescriptor {
    /// Load and identify a model from a JSON file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ModelLoadError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: RawModel = serde_json::from_str(&text)
            .map_err(|source| ModelLoadError::Parse { path: path.to_path_buf(), source })?;
        Self::from_raw(raw)
    }

    /// Identify and flatten a model from already-parsed JSON text. Exposed
    /// separately from [`Self::load`] so tests can exercise the
    /// identification algorithm without touching the filesystem.
    pub fn from_json_str(text: &str) -> Result<Self, ModelLoadError> {
        let raw: RawModel = serde_json::from_str(text).map_err(|source| ModelLoadError::Parse {
            path: Path::new("<memory>").to_path_buf(),
            source,
        })?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawModel) -> Result<Self, ModelLoadError> {
        let recognized_error = |layer: Option<&RawLayer>, hidden, input_size| {
            ModelLoadError::UnrecognizedArchitecture {
                layer_type: layer.map(|l| l.layer_type.clone()),
                hidden,
                input_size,
            }
        };

        let layer0 = raw.layers.first();
        let cell = match layer0.map(|l| l.layer_type.as_str()) {
            Some("gru") => CellKind::Gru,
            Some("lstm") => CellKind::Lstm,
            _ => return Err(recognized_error(layer0, None, None)),
        };

        let hidden = layer0
            .and_then(|l| last_dim(&l.shape))
            .filter(|h| KNOWN_HIDDEN.contains(h))
            .ok_or_else(|| recognized_error(layer0, layer0.and_then(|l| last_dim(&l.shape)), None))?;

        let input_size = last_dim(&raw.in_shape)
            .filter(|i| KNOWN_INPUT.contains(i))
            .ok_or_else(|| recognized_error(layer0, Some(hidden), last_dim(&raw.in_shape)))?;

        let sigmoid = raw.layers.len() == 3
            && raw.layers[1].activation.as_deref() == Some("sigmoid");

        let layer0 = layer0.expect("checked above");
        let gates = cell.gate_count();

        let w_ih = flatten(&layer0.weights);
        let w_hh = flatten(&layer0.recurrent_weights);
        let bias = sum_bias_rows(&layer0.biases, gates * hidden);

        let expected_ih = gates * hidden * input_size;
        if w_ih.len() != expected_ih {
            return Err(ModelLoadError::MalformedWeights {
                index: 0,
                expected: expected_ih,
                found: w_ih.len(),
            });
        }
        let expected_hh = gates * hidden * hidden;
        if w_hh.len() != expected_hh {
            return Err(ModelLoadError::MalformedWeights {
                index: 0,
                expected: expected_hh,
                found: w_hh.len(),
            });
        }

        let out_layer = raw.layers.last().expect("checked above");
        let out_weight = flatten(&out_layer.weights);
        if out_weight.len() != hidden {
            return Err(ModelLoadError::MalformedWeights {
                index: raw.layers.len() - 1,
                expected: hidden,
                found: out_weight.len(),
            });
        }
        let out_bias = out_layer.biases.first().and_then(|b| b.first()).copied().unwrap_or(0.0);

        if raw.in_skip > 1 {
            return Err(ModelLoadError::UnsupportedInputSkip { value: raw.in_skip });
        }

        Ok(ModelDescriptor {
            cell,
            hidden,
            input_size,
            sigmoid,
            w_ih,
            w_hh,
            bias,
            out_weight,
            out_bias,
            input_skip: raw.in_skip == 1,
            input_gain: ampcore_dsp::math::db_to_linear(raw.in_gain),
            output_gain: ampcore_dsp::math::db_to_linear(raw.out_gain),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_gru_json(hidden: usize, input_size: usize) -> String {
        let gates = 3;
        let w_ih = vec![vec![0.0f32; input_size]; gates * hidden];
        let w_hh = vec![vec![0.0f32; hidden]; gates * hidden];
        let bias = vec![vec![0.0f32; gates * hidden]];
        let out_w = vec![vec![0.0f32; hidden]];
        let out_b = vec![vec![0.0f32]];
        serde_json::json!({
            "in_shape": [null, input_size],
            "layers": [
                {
                    "type": "gru",
                    "shape": [null, hidden],
                    "weights": w_ih,
                    "recurrent_weights": w_hh,
                    "biases": bias,
                },
                {
                    "type": "dense",
                    "shape": [null, 1],
                    "weights": out_w,
                    "biases": out_b,
                },
            ],
        })
        .to_string()
    }

    #[test]
    fn identifies_two_layer_gru_model() {
        let json = sample_gru_json(16, 2);
        let desc = ModelDescriptor::from_json_str(&json).unwrap();
        assert_eq!(desc.cell, CellKind::Gru);
        assert_eq!(desc.hidden, 16);
        assert_eq!(desc.input_size, 2);
        assert!(!desc.sigmoid);
    }

    #[test]
    fn three_layer_model_with_sigmoid_activation_sets_flag() {
        let gates = 3;
        let hidden = 8;
        let input_size = 1;
        let w_ih = vec![vec![0.0f32; input_size]; gates * hidden];
        let w_hh = vec![vec![0.0f32; hidden]; gates * hidden];
        let bias = vec![vec![0.0f32; gates * hidden]];
        let out_w = vec![vec![0.0f32; hidden]];
        let out_b = vec![vec![0.0f32]];
        let json = serde_json::json!({
            "in_shape": [null, input_size],
            "layers": [
                { "type": "gru", "shape": [null, hidden], "weights": w_ih, "recurrent_weights": w_hh, "biases": bias },
                { "type": "activation", "shape": [null, hidden], "activation": "sigmoid" },
                { "type": "dense", "shape": [null, 1], "weights": out_w, "biases": out_b },
            ],
        })
        .to_string();
        let desc = ModelDescriptor::from_json_str(&json).unwrap();
        assert!(desc.sigmoid);
    }

    #[test]
    fn rejects_unknown_hidden_size() {
        let json = sample_gru_json(17, 1);
        assert!(ModelDescriptor::from_json_str(&json).is_err());
    }

    #[test]
    fn rejects_unknown_layer_type() {
        let json = serde_json::json!({
            "in_shape": [null, 1],
            "layers": [ { "type": "conv1d", "shape": [null, 8] } ],
        })
        .to_string();
        assert!(ModelDescriptor::from_json_str(&json).is_err());
    }
}
