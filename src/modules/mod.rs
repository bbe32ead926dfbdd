//! Built-in rack modules.
//!
//! The core set of module type descriptors: oscillators, filter,
//! envelope, LFO, utilities, and the master output. The DSP engines
//! behind these types live outside this crate; the descriptors declare
//! the faces, ports, and parameters the rack needs.

use crate::graph::{
    ModuleCategory, ModuleDescriptor, ModuleRegistry, ParameterDefinition, ParameterDisplay,
};

/// Voltage-controlled oscillator: one pitch input, four waveform outputs.
pub static VCO: ModuleDescriptor = ModuleDescriptor {
    plugin_id: "core",
    module_id: "vco",
    name: "VCO",
    category: ModuleCategory::Source,
    width_hp: 8,
    inputs: &["pitch", "fm", "sync"],
    outputs: &["sine", "triangle", "saw", "square"],
    params: &[
        ParameterDefinition {
            id: "freq",
            name: "Frequency",
            min: 20.0,
            max: 20000.0,
            default: 261.63,
            display: ParameterDisplay::Logarithmic { unit: "Hz" },
        },
        ParameterDefinition {
            id: "fm_depth",
            name: "FM Depth",
            min: 0.0,
            max: 1.0,
            default: 0.0,
            display: ParameterDisplay::Linear { unit: "%" },
        },
    ],
};

/// Low-frequency oscillator for modulation duty.
pub static LFO: ModuleDescriptor = ModuleDescriptor {
    plugin_id: "core",
    module_id: "lfo",
    name: "LFO",
    category: ModuleCategory::Modulation,
    width_hp: 6,
    inputs: &["rate"],
    outputs: &["sine", "square"],
    params: &[ParameterDefinition {
        id: "rate",
        name: "Rate",
        min: 0.01,
        max: 20.0,
        default: 2.0,
        display: ParameterDisplay::Logarithmic { unit: "Hz" },
    }],
};

/// State-variable filter with lowpass, bandpass, and highpass outputs.
pub static VCF: ModuleDescriptor = ModuleDescriptor {
    plugin_id: "core",
    module_id: "vcf",
    name: "VCF",
    category: ModuleCategory::Filter,
    width_hp: 8,
    inputs: &["in", "cutoff_cv", "res_cv"],
    outputs: &["lowpass", "bandpass", "highpass"],
    params: &[
        ParameterDefinition {
            id: "cutoff",
            name: "Cutoff",
            min: 20.0,
            max: 20000.0,
            default: 1000.0,
            display: ParameterDisplay::Logarithmic { unit: "Hz" },
        },
        ParameterDefinition {
            id: "resonance",
            name: "Resonance",
            min: 0.0,
            max: 1.0,
            default: 0.1,
            display: ParameterDisplay::Linear { unit: "%" },
        },
    ],
};

/// Four-stage envelope generator.
pub static ADSR: ModuleDescriptor = ModuleDescriptor {
    plugin_id: "core",
    module_id: "adsr",
    name: "ADSR",
    category: ModuleCategory::Modulation,
    width_hp: 8,
    inputs: &["gate", "retrig"],
    outputs: &["env"],
    params: &[
        ParameterDefinition {
            id: "attack",
            name: "Attack",
            min: 0.001,
            max: 10.0,
            default: 0.01,
            display: ParameterDisplay::Logarithmic { unit: "s" },
        },
        ParameterDefinition {
            id: "decay",
            name: "Decay",
            min: 0.001,
            max: 10.0,
            default: 0.2,
            display: ParameterDisplay::Logarithmic { unit: "s" },
        },
        ParameterDefinition {
            id: "sustain",
            name: "Sustain",
            min: 0.0,
            max: 1.0,
            default: 0.7,
            display: ParameterDisplay::Linear { unit: "%" },
        },
        ParameterDefinition {
            id: "release",
            name: "Release",
            min: 0.001,
            max: 10.0,
            default: 0.3,
            display: ParameterDisplay::Logarithmic { unit: "s" },
        },
    ],
};

/// Voltage-controlled amplifier.
pub static VCA: ModuleDescriptor = ModuleDescriptor {
    plugin_id: "core",
    module_id: "vca",
    name: "VCA",
    category: ModuleCategory::Utility,
    width_hp: 4,
    inputs: &["in", "cv"],
    outputs: &["out"],
    params: &[ParameterDefinition {
        id: "gain",
        name: "Gain",
        min: 0.0,
        max: 1.0,
        default: 1.0,
        display: ParameterDisplay::Linear { unit: "%" },
    }],
};

/// Four-channel mixer.
pub static MIXER: ModuleDescriptor = ModuleDescriptor {
    plugin_id: "core",
    module_id: "mixer",
    name: "Mixer",
    category: ModuleCategory::Utility,
    width_hp: 10,
    inputs: &["ch1", "ch2", "ch3", "ch4"],
    outputs: &["mix"],
    params: &[
        ParameterDefinition {
            id: "level1",
            name: "Level 1",
            min: 0.0,
            max: 1.0,
            default: 0.8,
            display: ParameterDisplay::Linear { unit: "%" },
        },
        ParameterDefinition {
            id: "level2",
            name: "Level 2",
            min: 0.0,
            max: 1.0,
            default: 0.8,
            display: ParameterDisplay::Linear { unit: "%" },
        },
        ParameterDefinition {
            id: "level3",
            name: "Level 3",
            min: 0.0,
            max: 1.0,
            default: 0.8,
            display: ParameterDisplay::Linear { unit: "%" },
        },
        ParameterDefinition {
            id: "level4",
            name: "Level 4",
            min: 0.0,
            max: 1.0,
            default: 0.8,
            display: ParameterDisplay::Linear { unit: "%" },
        },
    ],
};

/// Master stereo output.
pub static OUTPUT: ModuleDescriptor = ModuleDescriptor {
    plugin_id: "core",
    module_id: "output",
    name: "Output",
    category: ModuleCategory::Output,
    width_hp: 6,
    inputs: &["left", "right"],
    outputs: &[],
    params: &[
        ParameterDefinition {
            id: "volume",
            name: "Volume",
            min: 0.0,
            max: 1.0,
            default: 0.5,
            display: ParameterDisplay::Linear { unit: "%" },
        },
        ParameterDefinition {
            id: "mute",
            name: "Mute",
            min: 0.0,
            max: 1.0,
            default: 0.0,
            display: ParameterDisplay::Toggle {
                off_label: "Off",
                on_label: "On",
            },
        },
    ],
};

/// Builds a registry containing the built-in core modules.
pub fn core_registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry.register(&VCO);
    registry.register(&LFO);
    registry.register(&VCF);
    registry.register(&ADSR);
    registry.register(&VCA);
    registry.register(&MIXER);
    registry.register(&OUTPUT);
    registry
}
