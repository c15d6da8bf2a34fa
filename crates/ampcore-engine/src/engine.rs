//! The `Engine`: owns the tone stack, the hot-swappable model and cabinet
//! slots, and the per-buffer `process` pipeline that ties them together.
//!
//! Everything reachable from `process` is either a plain field (written
//! directly by [`ParameterInfo::set_param`], no synchronization needed
//! since the caller owns the engine) or a [`HotSwap`] slot (written from a
//! different thread than `process` runs on, so it needs the lock-free
//! publish protocol). Mixing the two in one struct is deliberate: most
//! amp parameters are ordinary knobs, only the model and cabinet are big
//! enough to need an out-of-band swap.

use crate::error::EngineError;
use crate::hotswap::{HotSwap, Prewarm, run_prewarm_samples};
use crate::meters::Meters;
use crate::params::{self, ParamIndex};
use crate::state::{self, StateKey, StateValue};
use crate::tone::{EqPosition, MidType, ToneStack};
use crate::{assets, audiofile::AudioFilePlayer, denormals::DenormalGuard};

use ampcore_config::Preset;
use ampcore_convolver::Convolver;
use ampcore_dsp::{ParamDescriptor, ParameterInfo, SmoothedParam, wet_dry_mix};
use ampcore_model::DynamicModel;

use std::path::Path;

/// Linear gain applied to the cabinet's wet signal at full engagement
/// (~-12 dB), compensating for the gain a convolution with a real speaker
/// IR adds relative to the dry, unfiltered signal.
const K_MAX_CABINET_GAIN: f32 = 0.251;

const PARAM_SMOOTHING_MS: f32 = 100.0;
const CABSIM_SMOOTHING_MS: f32 = 100.0;
const BYPASS_SMOOTHING_MS: f32 = 250.0;

impl Prewarm for DynamicModel {
    fn prewarm(&mut self) {
        run_prewarm_samples(|| {
            self.process(0.0, 0.0, 0.0);
        });
    }
}

impl Prewarm for Convolver {
    fn prewarm(&mut self) {
        let mut scratch = [0.0f32; 1];
        run_prewarm_samples(|| {
            self.process(&[0.0], &mut scratch);
        });
    }
}

/// The real-time amplifier engine.
pub struct Engine {
    sample_rate: f32,
    max_buffer_size: usize,

    tone: ToneStack,

    model: HotSwap<DynamicModel>,

    convolver: HotSwap<Convolver>,
    cabinet_source: Option<StateValue>,
    cabsim_bypass: bool,
    cabsim_gain: SmoothedParam,

    bypass: bool,
    bypass_gain: SmoothedParam,

    param1: SmoothedParam,
    param2: SmoothedParam,

    meters: Meters,

    bypass_buf: Vec<f32>,
    cab_buf: Vec<f32>,

    audiofile: Option<AudioFilePlayer>,
}

impl Engine {
    pub fn new(sample_rate: f32, max_buffer_size: usize) -> Self {
        let mut cabsim_gain = SmoothedParam::with_config(0.0, sample_rate, CABSIM_SMOOTHING_MS);
        cabsim_gain.snap_to_target();
        let mut bypass_gain = SmoothedParam::with_config(1.0, sample_rate, BYPASS_SMOOTHING_MS);
        bypass_gain.snap_to_target();

        Self {
            sample_rate,
            max_buffer_size,
            tone: ToneStack::new(sample_rate),
            model: HotSwap::empty(),
            convolver: HotSwap::empty(),
            cabinet_source: None,
            cabsim_bypass: true,
            cabsim_gain,
            bypass: false,
            bypass_gain,
            param1: SmoothedParam::with_config(0.0, sample_rate, PARAM_SMOOTHING_MS),
            param2: SmoothedParam::with_config(0.0, sample_rate, PARAM_SMOOTHING_MS),
            meters: Meters::new(sample_rate),
            bypass_buf: vec![0.0; max_buffer_size],
            cab_buf: vec![0.0; max_buffer_size],
            audiofile: None,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn meters(&self) -> &Meters {
        &self.meters
    }

    /// Reallocate per-buffer scratch space. Call before `process` is ever
    /// invoked with the new size.
    pub fn on_buffer_size_change(&mut self, max_buffer_size: usize) {
        self.max_buffer_size = max_buffer_size;
        self.bypass_buf = vec![0.0; max_buffer_size];
        self.cab_buf = vec![0.0; max_buffer_size];
    }

    /// Recompute every sample-rate-dependent coefficient and reload the
    /// currently-active cabinet IR at the new rate. Resets the meters since
    /// their publish cadence is itself sample-rate dependent.
    pub fn on_sample_rate_change(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.tone.set_sample_rate(sample_rate);
        self.param1.set_sample_rate(sample_rate);
        self.param2.set_sample_rate(sample_rate);
        self.cabsim_gain.set_sample_rate(sample_rate);
        self.bypass_gain.set_sample_rate(sample_rate);
        self.meters.set_sample_rate(sample_rate);
        self.meters.request_reset();
        self.meters.take_reset_pending();

        match self.cabinet_source.clone() {
            Some(StateValue::Default) => {
                if let Err(e) = self.load_cabinet_default() {
                    tracing::error!(error = %e, "default cabinet reload after sample rate change failed");
                }
            }
            Some(StateValue::Path(path)) => {
                if let Err(e) = self.load_cabinet(&path) {
                    tracing::error!(error = %e, path = %path.display(), "cabinet reload after sample rate change failed");
                }
            }
            None => {}
        }

        tracing::info!(sample_rate, "sample rate changed");
    }

    fn publish_cabinet(&mut self, ir: Vec<f32>) {
        self.convolver.publish(Convolver::new(&ir), "cabinet");
    }

    pub fn load_model(&mut self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let path = path.as_ref();
        match ampcore_model::load_model(path) {
            Ok(model) => {
                self.model.publish(model, "model");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, path = %path.display(), "model load failed");
                Err(e.into())
            }
        }
    }

    pub fn load_model_default(&mut self) -> Result<(), EngineError> {
        match assets::default_model() {
            Ok(model) => {
                self.model.publish(model, "model");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "default model load failed");
                Err(e.into())
            }
        }
    }

    pub fn load_cabinet(&mut self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let path = path.as_ref().to_path_buf();
        match state::load_cabinet_ir(&path, self.sample_rate as u32) {
            Ok(ir) => {
                self.publish_cabinet(ir);
                self.cabinet_source = Some(StateValue::Path(path));
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, path = %path.display(), "cabinet load failed");
                Err(e.into())
            }
        }
    }

    pub fn load_cabinet_default(&mut self) -> Result<(), EngineError> {
        match assets::default_cabinet_ir(self.sample_rate as u32) {
            Ok(ir) => {
                self.publish_cabinet(ir);
                self.cabinet_source = Some(StateValue::Default);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "default cabinet load failed");
                Err(e.into())
            }
        }
    }

    fn load_cabinet_state(&mut self, value: StateValue) -> Result<(), EngineError> {
        match value {
            StateValue::Default => self.load_cabinet_default(),
            StateValue::Path(path) => self.load_cabinet(path),
        }
    }

    fn load_model_state(&mut self, value: StateValue) -> Result<(), EngineError> {
        match value {
            StateValue::Default => self.load_model_default(),
            StateValue::Path(path) => self.load_model(path),
        }
    }

    pub fn set_audiofile(&mut self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let path = path.as_ref();
        match AudioFilePlayer::load(path, self.sample_rate as u32) {
            Ok(player) => {
                self.audiofile = Some(player);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, path = %path.display(), "audio file load failed");
                Err(e.into())
            }
        }
    }

    /// Apply one `(key, value)` string state pair, as received from the
    /// CLI's stdin surface or a preset file's `model_path`/`cabinet_path`
    /// fields. Unknown keys are logged and ignored.
    pub fn apply_state(&mut self, key: &str, value: &str) -> Result<(), EngineError> {
        match state::parse(key, value) {
            Some(StateKey::Model(v)) => self.load_model_state(v),
            Some(StateKey::Cabinet(v)) => self.load_cabinet_state(v),
            Some(StateKey::AudioFile(path)) => self.set_audiofile(path),
            Some(StateKey::ResetMeters) => {
                self.meters.request_reset();
                Ok(())
            }
            None => {
                tracing::warn!(key, "unknown state key");
                Ok(())
            }
        }
    }

    pub fn set_cabsim_bypass(&mut self, bypass: bool) {
        self.cabsim_bypass = bypass;
        self.cabsim_gain.set_target(if bypass { 0.0 } else { K_MAX_CABINET_GAIN });
    }

    pub fn set_bypass(&mut self, bypass: bool) {
        self.bypass = bypass;
        self.bypass_gain.set_target(if bypass { 0.0 } else { 1.0 });
    }

    /// Load every parameter and any `model_path`/`cabinet_path` a preset
    /// names, through the same [`ParameterInfo`] entry point a live host
    /// call would use. Unknown parameter names are skipped rather than
    /// failing the whole preset.
    pub fn load_preset(&mut self, preset: &Preset) -> Result<(), EngineError> {
        for (name, &value) in &preset.parameters {
            if let Some(index) = self.find_param_by_name(name) {
                self.set_param(index, value);
            } else {
                tracing::warn!(name, "unknown preset parameter, skipping");
            }
        }
        if let Some(path) = &preset.model_path {
            self.load_model(path)?;
        }
        if let Some(path) = &preset.cabinet_path {
            self.load_cabinet(path)?;
        }
        Ok(())
    }

    /// Snapshot the engine's current target values (not in-flight smoothed
    /// values) into a new preset.
    pub fn save_preset(&self, name: impl Into<String>) -> Preset {
        let mut preset = Preset::new(name);
        for (i, &index) in ParamIndex::ALL.iter().enumerate() {
            let desc = params::descriptor(index);
            preset = preset.with_parameter(desc.string_id, self.get_param(i));
        }
        match &self.cabinet_source {
            Some(StateValue::Path(path)) => {
                preset = preset.with_cabinet_path(path.to_string_lossy().into_owned());
            }
            Some(StateValue::Default) | None => {}
        }
        preset
    }

    pub fn save_preset_to_file(&self, name: impl Into<String>, path: impl AsRef<Path>) -> Result<(), EngineError> {
        self.save_preset(name).save(path).map_err(EngineError::from)
    }

    /// Run one buffer of mono audio through the full pipeline: antialias
    /// filter, pre-gain, tone stack, neural model, DC blocker, cabinet
    /// convolution, master gain, and bypass crossfade, in that order
    /// (tone stack position is configurable between the model stage).
    pub fn process(&mut self, input: &[f32], output: &mut [f32]) {
        let _guard = DenormalGuard::enter();
        let n = input.len();
        debug_assert_eq!(output.len(), n);

        self.meters.take_reset_pending();
        self.bypass_buf[..n].copy_from_slice(&input[..n]);

        for i in 0..n {
            let mut s = input[i];
            s = self.tone.input_lpf(s);
            s *= self.tone.pregain.next();

            if self.tone.eq_pos == EqPosition::Pre && !self.tone.eq_bypass {
                s = self.tone.apply_eq(s);
            }

            let p1 = self.param1.advance();
            let p2 = self.param2.advance();
            if !self.tone.net_bypass {
                s = self.model.with(|m| m.process(s, p1, p2)).unwrap_or(s);
            }

            s = self.tone.dc_block(s);
            output[i] = s;
        }

        self.meters.set_model_in_use(!self.tone.net_bypass && self.model.is_loaded());

        self.cab_buf[..n].copy_from_slice(&output[..n]);
        self.convolver.with(|c| c.process(&self.cab_buf[..n], &mut output[..n]));
        self.meters.set_cab_in_use(!self.cabsim_bypass && self.convolver.is_loaded());

        for i in 0..n {
            let b = self.cabsim_gain.advance();
            output[i] = output[i] * b + self.cab_buf[i] * ((K_MAX_CABINET_GAIN - b) / K_MAX_CABINET_GAIN);
        }

        for i in 0..n {
            let mut s = output[i];
            if self.tone.eq_pos == EqPosition::Post && !self.tone.eq_bypass {
                s = self.tone.apply_eq(s);
            }
            s *= self.tone.master.next();

            let a = self.bypass_gain.advance();
            let dry = self.bypass_buf[i];
            let final_sample = wet_dry_mix(dry, s, a);

            self.meters.observe(dry, final_sample);
            output[i] = final_sample;
        }
    }

    /// Run `process` against mono input and duplicate the result into both
    /// stereo output channels.
    pub fn process_stereo(&mut self, input: &[f32], left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(left.len(), right.len());
        debug_assert_eq!(input.len(), left.len());
        self.process(input, left);
        right.copy_from_slice(left);
    }

    /// Pull `n` samples from the looping standalone file player (if one is
    /// loaded) and process them into `output`. Used by the CLI harness,
    /// which supplies no live input of its own.
    pub fn process_standalone(&mut self, output: &mut [f32]) {
        let n = output.len();
        let mut input = vec![0.0f32; n];
        if let Some(player) = &mut self.audiofile {
            for sample in input.iter_mut() {
                *sample = player.next_sample();
            }
        }
        self.process(&input, output);
    }
}

impl ParameterInfo for Engine {
    fn param_count(&self) -> usize {
        ParamIndex::COUNT
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        ParamIndex::ALL.get(index).map(|&p| params::descriptor(p))
    }

    /// Also matches a descriptor's `string_id` (the preset/host key), not
    /// just its display name, since the two diverge for several parameters
    /// (e.g. `"NETBYPASS"` vs. the display name `"Model Bypass"`).
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|d| {
                d.name.eq_ignore_ascii_case(name)
                    || d.short_name.eq_ignore_ascii_case(name)
                    || d.string_id.eq_ignore_ascii_case(name)
            })
        })
    }

    fn get_param(&self, index: usize) -> f32 {
        let Some(&p) = ParamIndex::ALL.get(index) else { return 0.0 };
        match p {
            ParamIndex::Antialiasing => self.tone.input_lpf_amount(),
            ParamIndex::Pregain => self.tone.pregain.db(),
            ParamIndex::NetBypass => bool_to_f32(self.tone.net_bypass),
            ParamIndex::EqBypass => bool_to_f32(self.tone.eq_bypass),
            ParamIndex::EqPos => bool_to_f32(self.tone.eq_pos == EqPosition::Pre),
            ParamIndex::Bass => self.tone.bass_db(),
            ParamIndex::Bfreq => self.tone.bass_hz(),
            ParamIndex::Mid => self.tone.mid_db(),
            ParamIndex::Mfreq => self.tone.mid_hz(),
            ParamIndex::Midq => self.tone.mid_q(),
            ParamIndex::Mtype => bool_to_f32(self.tone.mid_type == MidType::Bandpass),
            ParamIndex::Treble => self.tone.treble_db(),
            ParamIndex::Tfreq => self.tone.treble_hz(),
            ParamIndex::Depth => self.tone.depth_db(),
            ParamIndex::Presence => self.tone.presence_db(),
            ParamIndex::Master => self.tone.master.db(),
            ParamIndex::CabsimBypass => bool_to_f32(self.cabsim_bypass),
            ParamIndex::Bypass => bool_to_f32(self.bypass),
            ParamIndex::Param1 => self.param1.target(),
            ParamIndex::Param2 => self.param2.target(),
            ParamIndex::ModelInputSize => self.model.with(|m| m.input_size()).unwrap_or(0) as f32,
            ParamIndex::MeterIn => self.meters.input_peak(),
            ParamIndex::MeterOut => self.meters.output_peak(),
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        let Some(&p) = ParamIndex::ALL.get(index) else { return };
        let value = params::descriptor(p).clamp(value);
        match p {
            ParamIndex::Antialiasing => self.tone.set_input_lpf_amount(value),
            ParamIndex::Pregain => self.tone.pregain.set_db(value),
            ParamIndex::NetBypass => self.tone.net_bypass = f32_to_bool(value),
            ParamIndex::EqBypass => self.tone.eq_bypass = f32_to_bool(value),
            ParamIndex::EqPos => {
                self.tone.eq_pos = if f32_to_bool(value) { EqPosition::Pre } else { EqPosition::Post };
            }
            ParamIndex::Bass => self.tone.set_bass(value, self.tone.bass_hz()),
            ParamIndex::Bfreq => self.tone.set_bass(self.tone.bass_db(), value),
            ParamIndex::Mid => self.tone.set_mid(value, self.tone.mid_hz(), self.tone.mid_q()),
            ParamIndex::Mfreq => self.tone.set_mid(self.tone.mid_db(), value, self.tone.mid_q()),
            ParamIndex::Midq => self.tone.set_mid(self.tone.mid_db(), self.tone.mid_hz(), value),
            ParamIndex::Mtype => {
                self.tone.set_mid_type(if f32_to_bool(value) { MidType::Bandpass } else { MidType::Peak });
            }
            ParamIndex::Treble => self.tone.set_treble(value, self.tone.treble_hz()),
            ParamIndex::Tfreq => self.tone.set_treble(self.tone.treble_db(), value),
            ParamIndex::Depth => self.tone.set_depth(value),
            ParamIndex::Presence => self.tone.set_presence(value),
            ParamIndex::Master => self.tone.master.set_db(value),
            ParamIndex::CabsimBypass => self.set_cabsim_bypass(f32_to_bool(value)),
            ParamIndex::Bypass => self.set_bypass(f32_to_bool(value)),
            ParamIndex::Param1 => self.param1.set_target(value),
            ParamIndex::Param2 => self.param2.set_target(value),
            ParamIndex::ModelInputSize | ParamIndex::MeterIn | ParamIndex::MeterOut => {}
        }
    }
}

fn bool_to_f32(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}

fn f32_to_bool(value: f32) -> bool {
    value >= 0.5
}
