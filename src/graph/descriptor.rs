//! Static module type descriptions.
//!
//! A `ModuleDescriptor` declares everything the rack needs to know about a
//! module type before instantiating it: identity, category, face width,
//! ports, and parameters. Descriptors are plain static data; the DSP
//! engine behind a module lives outside this crate.

use egui::Color32;

/// Direction of a port on a module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PortDirection {
    /// An input terminal that receives a signal.
    Input,
    /// An output terminal that feeds a signal.
    Output,
}

impl PortDirection {
    /// Returns a human-readable name for the port direction.
    pub fn name(&self) -> &'static str {
        match self {
            PortDirection::Input => "Input",
            PortDirection::Output => "Output",
        }
    }

    /// Returns the opposite direction.
    ///
    /// A wire always joins one output to one input, so a drag anchored on
    /// one direction can only land on the other.
    pub fn opposite(&self) -> PortDirection {
        match self {
            PortDirection::Input => PortDirection::Output,
            PortDirection::Output => PortDirection::Input,
        }
    }
}

/// Category of a module, used for organization and UI coloring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModuleCategory {
    /// Sound sources (oscillators, noise generators, samplers).
    Source,
    /// Frequency-shaping modules (filters, EQs).
    Filter,
    /// Modulation sources (envelopes, LFOs).
    Modulation,
    /// Audio effects (delay, reverb, distortion).
    Effect,
    /// Utility modules (mixers, VCAs, math operations).
    Utility,
    /// Output modules (master output, scope, spectrum analyzer).
    Output,
}

impl ModuleCategory {
    /// Returns the color associated with this module category.
    pub fn color(&self) -> Color32 {
        match self {
            ModuleCategory::Source => Color32::from_rgb(66, 165, 245), // Blue #42A5F5
            ModuleCategory::Filter => Color32::from_rgb(38, 166, 154), // Teal #26A69A
            ModuleCategory::Modulation => Color32::from_rgb(255, 183, 77), // Orange #FFB74D
            ModuleCategory::Effect => Color32::from_rgb(77, 208, 225), // Cyan #4DD0E1
            ModuleCategory::Utility => Color32::from_rgb(158, 158, 158), // Gray #9E9E9E
            ModuleCategory::Output => Color32::from_rgb(126, 87, 194), // Purple #7E57C2
        }
    }

    /// Returns a human-readable name for the category.
    pub fn name(&self) -> &'static str {
        match self {
            ModuleCategory::Source => "Source",
            ModuleCategory::Filter => "Filter",
            ModuleCategory::Modulation => "Modulation",
            ModuleCategory::Effect => "Effect",
            ModuleCategory::Utility => "Utility",
            ModuleCategory::Output => "Output",
        }
    }
}

/// How a parameter value should be displayed and interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterDisplay {
    /// Linear scaling with a unit suffix (e.g., "Hz", "ms", "%").
    Linear { unit: &'static str },
    /// Logarithmic scaling, common for frequency and gain controls.
    Logarithmic { unit: &'static str },
    /// Discrete steps with named values.
    Discrete { labels: &'static [&'static str] },
    /// On/off toggle switch.
    Toggle {
        off_label: &'static str,
        on_label: &'static str,
    },
}

impl ParameterDisplay {
    /// Returns the unit string, if applicable.
    pub fn unit(&self) -> Option<&'static str> {
        match self {
            Self::Linear { unit } | Self::Logarithmic { unit } => Some(unit),
            _ => None,
        }
    }

    /// Returns true if this is a logarithmic parameter.
    pub fn is_logarithmic(&self) -> bool {
        matches!(self, Self::Logarithmic { .. })
    }
}

/// Definition of a parameter on a module type.
///
/// Parameters represent user-controllable values like knobs and switches.
/// Each parameter has a unique ID, display name, valid range, and default
/// value. A module instance stores one current value per definition.
#[derive(Clone, Debug)]
pub struct ParameterDefinition {
    /// Unique identifier for this parameter within the module.
    pub id: &'static str,
    /// Human-readable name displayed in the UI.
    pub name: &'static str,
    /// Minimum value of the parameter.
    pub min: f32,
    /// Maximum value of the parameter.
    pub max: f32,
    /// Default value when the module is created.
    pub default: f32,
    /// How to display and interpret the parameter value.
    pub display: ParameterDisplay,
}

impl ParameterDefinition {
    /// Clamps a value to this parameter's valid range.
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Normalizes a value from the parameter's range to 0.0-1.0.
    pub fn normalize(&self, value: f32) -> f32 {
        if (self.max - self.min).abs() < f32::EPSILON {
            0.0
        } else {
            (value - self.min) / (self.max - self.min)
        }
    }

    /// Denormalizes a 0.0-1.0 value to the parameter's range.
    pub fn denormalize(&self, normalized: f32) -> f32 {
        self.min + normalized * (self.max - self.min)
    }
}

/// Static description of a module type.
///
/// Descriptors are declared as `static` items and registered with the
/// [`ModuleRegistry`](super::ModuleRegistry). Port ids are the indices
/// into the `inputs` / `outputs` name slices; those indices are what
/// wires and patch documents reference.
#[derive(Debug)]
pub struct ModuleDescriptor {
    /// Identifier of the plugin providing this module (e.g., "core").
    pub plugin_id: &'static str,
    /// Identifier of the module type within its plugin (e.g., "vco").
    pub module_id: &'static str,
    /// Human-readable name (e.g., "Voltage Controlled Oscillator").
    pub name: &'static str,
    /// The category this module belongs to.
    pub category: ModuleCategory,
    /// Face width in horizontal rack units (1 unit = 15 px).
    pub width_hp: u32,
    /// Input port names; the local port id is the index.
    pub inputs: &'static [&'static str],
    /// Output port names; the local port id is the index.
    pub outputs: &'static [&'static str],
    /// Parameter definitions; the parameter index is the index.
    pub params: &'static [ParameterDefinition],
}

impl ModuleDescriptor {
    /// Returns the number of ports in the given direction.
    pub fn port_count(&self, direction: PortDirection) -> usize {
        match direction {
            PortDirection::Input => self.inputs.len(),
            PortDirection::Output => self.outputs.len(),
        }
    }

    /// Returns the display name of a port, if the local id is in range.
    pub fn port_name(&self, direction: PortDirection, port: usize) -> Option<&'static str> {
        match direction {
            PortDirection::Input => self.inputs.get(port).copied(),
            PortDirection::Output => self.outputs.get(port).copied(),
        }
    }

    /// Returns the default parameter values, index-aligned with `params`.
    pub fn default_params(&self) -> Vec<f32> {
        self.params.iter().map(|p| p.default).collect()
    }
}
