//! Module instances and port references.
//!
//! A `Module` is one placed processing unit: a static descriptor plus the
//! mutable per-instance state the rack owns (parameter values, position,
//! and an opaque engine state blob). Ports are not stored as objects;
//! a `PortRef` names a port by module id, local index, and direction,
//! so nothing in the graph holds owning pointers to anything else.

use egui::{pos2, vec2, Rect};

use super::descriptor::{ModuleDescriptor, ParameterDefinition, PortDirection};
use super::{ModuleId, PortId};
use crate::layout::{RackPos, GRID_WIDTH, MODULE_HEIGHT};

/// Reference to one port terminal on a module.
///
/// This is the arena-style handle used by wires, the drag controller, and
/// hit-testing. It carries the direction so a lookup result can be
/// validated without another descriptor round-trip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PortRef {
    /// The module owning the port.
    pub module: ModuleId,
    /// Local port id within the module (index into the descriptor's
    /// input or output name list, depending on `direction`).
    pub port: PortId,
    /// Whether this is an input or output terminal.
    pub direction: PortDirection,
}

impl PortRef {
    /// Creates an input port reference.
    pub fn input(module: ModuleId, port: PortId) -> Self {
        Self {
            module,
            port,
            direction: PortDirection::Input,
        }
    }

    /// Creates an output port reference.
    pub fn output(module: ModuleId, port: PortId) -> Self {
        Self {
            module,
            port,
            direction: PortDirection::Output,
        }
    }
}

/// One placed module instance in the patch graph.
pub struct Module {
    /// Stable identifier assigned by the graph.
    id: ModuleId,
    /// The static type description.
    descriptor: &'static ModuleDescriptor,
    /// Current parameter values, index-aligned with the descriptor.
    params: Vec<f32>,
    /// Position of the module face on the rack canvas, in pixels.
    position: RackPos,
    /// Opaque per-module engine state, round-tripped by the serializer.
    data: Option<serde_json::Value>,
}

impl Module {
    /// Creates a module at the given position with default parameters.
    pub(crate) fn new(
        id: ModuleId,
        descriptor: &'static ModuleDescriptor,
        position: RackPos,
    ) -> Self {
        Self {
            id,
            descriptor,
            params: descriptor.default_params(),
            position,
            data: None,
        }
    }

    /// Returns the module's stable identifier.
    pub fn id(&self) -> ModuleId {
        self.id
    }

    /// Returns the static descriptor for this module's type.
    pub fn descriptor(&self) -> &'static ModuleDescriptor {
        self.descriptor
    }

    /// Returns the module's position on the rack canvas.
    pub fn position(&self) -> RackPos {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: RackPos) {
        self.position = position;
    }

    /// Returns the rectangle covered by the module face, in pixels.
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(
            pos2(self.position.x as f32, self.position.y as f32),
            vec2(self.descriptor.width_hp as f32 * GRID_WIDTH, MODULE_HEIGHT),
        )
    }

    /// Returns the current parameter values.
    pub fn params(&self) -> &[f32] {
        &self.params
    }

    /// Returns one parameter value, if the index is in range.
    pub fn param(&self, index: usize) -> Option<f32> {
        self.params.get(index).copied()
    }

    /// Returns the definition for one parameter, if the index is in range.
    pub fn param_definition(&self, index: usize) -> Option<&'static ParameterDefinition> {
        self.descriptor.params.get(index)
    }

    /// Sets a parameter value, clamped to the definition's range.
    ///
    /// Returns false if the index is out of range.
    pub fn set_param(&mut self, index: usize, value: f32) -> bool {
        match (self.params.get_mut(index), self.descriptor.params.get(index)) {
            (Some(slot), Some(def)) => {
                *slot = def.clamp(value);
                true
            }
            _ => false,
        }
    }

    /// Restores every parameter to its default value.
    pub fn reset_params(&mut self) {
        self.params = self.descriptor.default_params();
    }

    /// Copies parameter values from another module of the same type.
    ///
    /// Returns false without copying if the source has a different
    /// descriptor.
    pub fn clone_params(&mut self, source: &Module) -> bool {
        if !std::ptr::eq(self.descriptor, source.descriptor) {
            return false;
        }
        self.params.copy_from_slice(&source.params);
        true
    }

    /// Replaces parameter values wholesale, clamping each to its range.
    ///
    /// Extra values are ignored; missing values keep their defaults.
    /// Used when restoring a module from a patch document.
    pub(crate) fn restore_params(&mut self, values: &[f32]) {
        for (index, &value) in values.iter().enumerate().take(self.params.len()) {
            self.params[index] = self.descriptor.params[index].clamp(value);
        }
    }

    /// Returns a gesture-ready view of one parameter.
    ///
    /// This is what knob and switch drag strategies operate on; writes
    /// through the view clamp to the parameter's range.
    pub fn param_value(&mut self, index: usize) -> Option<crate::params::ParamValue<'_>> {
        let def = self.descriptor.params.get(index)?;
        let value = self.params.get_mut(index)?;
        Some(crate::params::ParamValue::new(def, value))
    }

    /// Returns the opaque engine state blob, if any.
    pub fn data(&self) -> Option<&serde_json::Value> {
        self.data.as_ref()
    }

    /// Replaces the opaque engine state blob.
    pub fn set_data(&mut self, data: Option<serde_json::Value>) {
        self.data = data;
    }

    /// Returns a port reference if the local id is in range.
    pub fn port(&self, direction: PortDirection, port: PortId) -> Option<PortRef> {
        if port < self.descriptor.port_count(direction) {
            Some(PortRef {
                module: self.id,
                port,
                direction,
            })
        } else {
            None
        }
    }

    /// Iterates over this module's input port references.
    pub fn inputs(&self) -> impl Iterator<Item = PortRef> + '_ {
        (0..self.descriptor.inputs.len()).map(move |port| PortRef::input(self.id, port))
    }

    /// Iterates over this module's output port references.
    pub fn outputs(&self) -> impl Iterator<Item = PortRef> + '_ {
        (0..self.descriptor.outputs.len()).map(move |port| PortRef::output(self.id, port))
    }

    /// Iterates over all of this module's port references, inputs first.
    pub fn ports(&self) -> impl Iterator<Item = PortRef> + '_ {
        self.inputs().chain(self.outputs())
    }
}
