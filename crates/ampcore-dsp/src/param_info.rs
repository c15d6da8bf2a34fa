//! Parameter introspection for the amp's fixed 23-entry parameter surface.
//!
//! [`ParameterInfo`] lets a host (the CLI's stdin commands, a preset loader)
//! discover and address parameters by index, by stable [`ParamId`], or by
//! name without knowing the concrete engine type. Each parameter is described
//! by a [`ParamDescriptor`] carrying its display name, range, unit, and the
//! flags a host needs (read-only meters vs. automatable controls).
//!
//! # Example
//!
//! ```rust
//! use ampcore_dsp::{ParameterInfo, ParamDescriptor, ParamId};
//!
//! struct SimpleGain {
//!     gain_db: f32,
//! }
//!
//! impl ParameterInfo for SimpleGain {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::gain_db("Gain", "Gain", -60.0, 12.0, 0.0)
//!                 .with_id(ParamId(100), "gain_level")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         match index {
//!             0 => self.gain_db,
//!             _ => 0.0,
//!         }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         match index {
//!             0 => self.gain_db = value.clamp(-60.0, 12.0),
//!             _ => {}
//!         }
//!     }
//! }
//! ```

/// Scaling curve for a parameter's descriptor.
///
/// Purely descriptive here — the amp's 23 parameters are all addressed by
/// their plain value, never normalized — but `Bfreq`/`Mfreq`/`Tfreq` are
/// tagged `Logarithmic` since a host control surface built on this
/// descriptor would want log-spaced resolution for a frequency knob.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ParamScale {
    /// Linear mapping (default). Equal resolution across the range.
    #[default]
    Linear,
    /// Logarithmic mapping. More resolution at low values; used for the
    /// tone stack's corner-frequency parameters.
    Logarithmic,
}

/// Stable parameter identifier that survives reordering.
///
/// Assigned once per parameter in [`crate`]'s descriptor table and never
/// reused, so a preset saved against one build keeps resolving the same
/// control after later parameters are added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Parameter capability flags.
///
/// Only two bits are in play: the default `AUTOMATABLE` for every
/// user-facing control, and `READ_ONLY` for the three meter/info params
/// (`ModelInputSize`, `MeterIn`, `MeterOut`) a host must never write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Host can automate this parameter (default for all params).
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Parameter is read-only (metering, display only).
    pub const READ_ONLY: Self = Self(1 << 1);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Trait for types that expose an introspectable parameter table.
///
/// Implemented by [`Engine`](../../ampcore_engine/struct.Engine.html) over
/// its fixed 23-entry surface. Parameters are accessed by zero-based index;
/// the index is stable for the lifetime of the instance.
pub trait ParameterInfo {
    /// Returns the number of parameters this instance exposes.
    ///
    /// Valid parameter indices are `0..param_count()`.
    fn param_count(&self) -> usize;

    /// Returns the descriptor for the parameter at the given index.
    ///
    /// Returns `None` if `index >= param_count()`.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Gets the current value of the parameter at the given index.
    ///
    /// Returns `0.0` if `index >= param_count()`.
    fn get_param(&self, index: usize) -> f32;

    /// Find a parameter index by name (case-insensitive).
    ///
    /// Matches against both [`ParamDescriptor::name`] and
    /// [`ParamDescriptor::short_name`].
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        for i in 0..self.param_count() {
            if let Some(desc) = self.param_info(i)
                && (desc.name.eq_ignore_ascii_case(name)
                    || desc.short_name.eq_ignore_ascii_case(name))
            {
                return Some(i);
            }
        }
        None
    }

    /// Sets the value of the parameter at the given index.
    ///
    /// Implementations should clamp to the descriptor's range and ignore
    /// out-of-bounds indices.
    fn set_param(&mut self, index: usize, value: f32);

    /// Returns the stable [`ParamId`] for the parameter at the given index.
    fn param_id(&self, index: usize) -> Option<ParamId> {
        self.param_info(index).map(|d| d.id)
    }

    /// Finds a parameter index by its stable [`ParamId`].
    ///
    /// Scans all parameters (O(n)) — suitable for setup paths, not audio.
    fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }
}

/// Describes a single parameter's metadata for display and validation.
///
/// # Short Name
///
/// `short_name` is kept to 8 characters or less, matching the amp's own
/// stdin command surface and any hardware LCD a host might drive from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g., "Pre Gain").
    pub name: &'static str,

    /// Short name for compact displays, max 8 characters (e.g., "PreGain").
    pub short_name: &'static str,

    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,

    /// Minimum allowed value for this parameter.
    pub min: f32,

    /// Maximum allowed value for this parameter.
    pub max: f32,

    /// Default value when the engine is initialized or reset.
    pub default: f32,

    /// Recommended step increment for encoder-based control.
    ///
    /// `1.0` for the boolean and discrete-mode parameters; a fraction of
    /// the range for everything else.
    pub step: f32,

    /// Stable numeric ID for preset persistence. Never changes once
    /// assigned to a given parameter.
    pub id: ParamId,

    /// Human-readable stable ID — doubles as the preset file key and the
    /// name the CLI's `json`/stdin commands match against.
    pub string_id: &'static str,

    /// Normalization curve. Default: [`ParamScale::Linear`].
    pub scale: ParamScale,

    /// Capability flags. Default: [`ParamFlags::AUTOMATABLE`].
    pub flags: ParamFlags,
}

impl ParamDescriptor {
    /// Standard mix-style parameter (0–100%, default 50%).
    ///
    /// Used as the base for `PARAM1`/`PARAM2`, the model's two free macro
    /// inputs — overridden to `ParamUnit::None` since they carry no fixed
    /// physical unit.
    pub fn mix() -> Self {
        Self {
            name: "Mix",
            short_name: "Mix",
            unit: ParamUnit::Percent,
            min: 0.0,
            max: 100.0,
            default: 50.0,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE,
        }
    }

    /// Gain parameter with custom name and range (decibels).
    ///
    /// The base descriptor for most of the amp's controls — tone stack
    /// bands, pregain, master — and then adjusted per-parameter via struct
    /// update syntax for the boolean/discrete ones (`step: 1.0`) and the
    /// read-only meters (`flags: ParamFlags::READ_ONLY`).
    pub fn gain_db(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Decibels,
            min,
            max,
            default,
            step: 0.5,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE,
        }
    }

    /// Corner-frequency parameter in Hz, logarithmically scaled.
    ///
    /// Backs `Bfreq`/`Mfreq`/`Tfreq`, the three tone stack band frequencies.
    pub fn rate_hz(min: f32, max: f32, default: f32) -> Self {
        Self {
            name: "Rate",
            short_name: "Rate",
            unit: ParamUnit::Hertz,
            min,
            max,
            default,
            step: 0.05,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Logarithmic,
            flags: ParamFlags::AUTOMATABLE,
        }
    }

    /// Sets the stable parameter ID and string ID.
    ///
    /// Builder pattern — call after a factory method or struct literal.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Clamps a value to this parameter's valid range.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }
}

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Decibels (dB) - for gain and level parameters.
    Decibels,

    /// Hertz (Hz) - for the tone stack's corner-frequency parameters.
    Hertz,

    /// Percentage (%) - for mix-style and meter parameters.
    Percent,

    /// No unit - for boolean/discrete-mode and free macro parameters.
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Hertz => " Hz",
            ParamUnit::Percent => "%",
            ParamUnit::None => "",
        }
    }
}
