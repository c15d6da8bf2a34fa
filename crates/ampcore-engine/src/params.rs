//! The engine's numeric parameter surface: stable indices, descriptors, and
//! the string IDs a host or preset file addresses them by.
//!
//! Kept separate from [`crate::engine::Engine`]'s `ParameterInfo` impl so the
//! descriptor table (names, ranges, units) can be tested on its own.

use ampcore_dsp::{ParamDescriptor, ParamId, ParamUnit};

const PARAM_ID_BASE: u32 = 4000;

macro_rules! param_index {
    ($($variant:ident),+ $(,)?) => {
        /// Stable index into the engine's parameter table. Order matches the
        /// host-facing enumeration; do not reorder once shipped.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(usize)]
        pub enum ParamIndex {
            $($variant,)+
        }

        impl ParamIndex {
            pub const COUNT: usize = param_index!(@count $($variant),+);

            pub const ALL: [ParamIndex; Self::COUNT] = [$(ParamIndex::$variant,)+];
        }
    };
    (@count $($variant:ident),+) => {
        <[()]>::len(&[$(param_index!(@unit $variant)),+])
    };
    (@unit $variant:ident) => { () };
}

param_index! {
    Antialiasing,
    Pregain,
    NetBypass,
    EqBypass,
    EqPos,
    Bass,
    Bfreq,
    Mid,
    Mfreq,
    Midq,
    Mtype,
    Treble,
    Tfreq,
    Depth,
    Presence,
    Master,
    CabsimBypass,
    Bypass,
    Param1,
    Param2,
    ModelInputSize,
    MeterIn,
    MeterOut,
}

/// Descriptor for each parameter, by [`ParamIndex`]. Mirrors the host
/// parameter surface: string IDs double as preset keys.
pub fn descriptor(index: ParamIndex) -> ParamDescriptor {
    let id = |offset: u32, string_id: &'static str, desc: ParamDescriptor| {
        desc.with_id(ParamId(PARAM_ID_BASE + offset), string_id)
    };

    match index {
        ParamIndex::Antialiasing => id(
            0,
            "ANTIALIASING",
            ParamDescriptor { unit: ParamUnit::Percent, ..ParamDescriptor::gain_db("Antialiasing", "AAFilt", 0.0, 100.0, 0.0) },
        ),
        ParamIndex::Pregain => id(1, "PREGAIN", ParamDescriptor::gain_db("Pre Gain", "PreGain", -12.0, 3.0, 0.0)),
        ParamIndex::NetBypass => id(
            2,
            "NETBYPASS",
            ParamDescriptor { step: 1.0, ..ParamDescriptor::gain_db("Model Bypass", "NetByp", 0.0, 1.0, 0.0) },
        ),
        ParamIndex::EqBypass => id(
            3,
            "EQBYPASS",
            ParamDescriptor { step: 1.0, ..ParamDescriptor::gain_db("Tone Stack Bypass", "EqByp", 0.0, 1.0, 0.0) },
        ),
        ParamIndex::EqPos => id(
            4,
            "EQPOS",
            ParamDescriptor { step: 1.0, ..ParamDescriptor::gain_db("Tone Stack Position", "EqPos", 0.0, 1.0, 0.0) },
        ),
        ParamIndex::Bass => id(5, "BASS", ParamDescriptor::gain_db("Bass", "Bass", -8.0, 8.0, 0.0)),
        ParamIndex::Bfreq => id(6, "BFREQ", ParamDescriptor::rate_hz(75.0, 600.0, 150.0)),
        ParamIndex::Mid => id(7, "MID", ParamDescriptor::gain_db("Mid", "Mid", -8.0, 8.0, 0.0)),
        ParamIndex::Mfreq => id(8, "MFREQ", ParamDescriptor::rate_hz(150.0, 5000.0, 800.0)),
        ParamIndex::Midq => id(
            9,
            "MIDQ",
            ParamDescriptor { unit: ParamUnit::None, ..ParamDescriptor::gain_db("Mid Q", "MidQ", 0.2, 5.0, 1.0) },
        ),
        ParamIndex::Mtype => id(
            10,
            "MTYPE",
            ParamDescriptor { step: 1.0, ..ParamDescriptor::gain_db("Mid Type", "MidType", 0.0, 1.0, 0.0) },
        ),
        ParamIndex::Treble => id(11, "TREBLE", ParamDescriptor::gain_db("Treble", "Treble", -8.0, 8.0, 0.0)),
        ParamIndex::Tfreq => id(12, "TFREQ", ParamDescriptor::rate_hz(1000.0, 4000.0, 2000.0)),
        ParamIndex::Depth => id(13, "DEPTH", ParamDescriptor::gain_db("Depth", "Depth", -8.0, 8.0, 0.0)),
        ParamIndex::Presence => id(14, "PRESENCE", ParamDescriptor::gain_db("Presence", "Presence", -8.0, 8.0, 0.0)),
        ParamIndex::Master => id(15, "MASTER", ParamDescriptor::gain_db("Master", "Master", -15.0, 15.0, 0.0)),
        ParamIndex::CabsimBypass => id(
            16,
            "CABSIMBYPASS",
            ParamDescriptor { step: 1.0, ..ParamDescriptor::gain_db("Cab Sim Bypass", "CabByp", 0.0, 1.0, 0.0) },
        ),
        ParamIndex::Bypass => id(
            17,
            "Bypass",
            ParamDescriptor { step: 1.0, ..ParamDescriptor::gain_db("Bypass", "Bypass", 0.0, 1.0, 0.0) },
        ),
        ParamIndex::Param1 => id(18, "PARAM1", ParamDescriptor { unit: ParamUnit::None, ..ParamDescriptor::mix() }),
        ParamIndex::Param2 => id(19, "PARAM2", ParamDescriptor { unit: ParamUnit::None, ..ParamDescriptor::mix() }),
        ParamIndex::ModelInputSize => id(
            20,
            "ModelInputSize",
            ParamDescriptor {
                unit: ParamUnit::None,
                flags: ampcore_dsp::ParamFlags::READ_ONLY,
                ..ParamDescriptor::gain_db("Model Input Size", "NetIO", 0.0, 3.0, 0.0)
            },
        ),
        ParamIndex::MeterIn => id(
            21,
            "MeterIn",
            ParamDescriptor {
                unit: ParamUnit::None,
                flags: ampcore_dsp::ParamFlags::READ_ONLY,
                ..ParamDescriptor::gain_db("Input Meter", "MeterIn", 0.0, 2.0, 0.0)
            },
        ),
        ParamIndex::MeterOut => id(
            22,
            "MeterOut",
            ParamDescriptor {
                unit: ParamUnit::None,
                flags: ampcore_dsp::ParamFlags::READ_ONLY,
                ..ParamDescriptor::gain_db("Output Meter", "MeterOut", 0.0, 2.0, 0.0)
            },
        ),
    }
}
