//! The patch graph: modules and the wires committed between them.
//!
//! The graph is the single owner of all placed modules and all committed
//! wires. It enforces the any-to-one cabling rule (an input port carries
//! at most one wire, an output port fans out freely) and keeps both
//! collections in insertion order so traversal is deterministic frame to
//! frame. Every mutation is visible to queries immediately; there is no
//! deferred commit.

use std::collections::HashMap;
use std::fmt;

use egui::Color32;

use super::descriptor::{ModuleDescriptor, PortDirection};
use super::module::{Module, PortRef};
use super::{ModuleId, PortId, WireId};
use crate::layout::{module_rect_at, rects_overlap, RackPos};

/// Errors that can occur when mutating the patch graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphError {
    /// The referenced module is not in the graph.
    UnknownModule(ModuleId),
    /// The referenced wire is not in the graph.
    UnknownWire(WireId),
    /// The referenced port id is out of range for its module.
    UnknownPort { module: ModuleId, port: PortId },
    /// The referenced parameter index is out of range for its module.
    UnknownParam { module: ModuleId, index: usize },
    /// A connection was attempted between two ports that are not one
    /// output and one input.
    TypeMismatch,
    /// The requested position overlaps another module's face.
    PlacementConflict,
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::UnknownModule(id) => write!(f, "Unknown module: {}", id),
            GraphError::UnknownWire(id) => write!(f, "Unknown wire: {}", id),
            GraphError::UnknownPort { module, port } => {
                write!(f, "Module {} has no port {}", module, port)
            }
            GraphError::UnknownParam { module, index } => {
                write!(f, "Module {} has no parameter {}", module, index)
            }
            GraphError::TypeMismatch => {
                write!(f, "A wire must join one output port to one input port")
            }
            GraphError::PlacementConflict => {
                write!(f, "The requested position overlaps another module")
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// A committed connection between one output port and one input port.
///
/// The display color is cosmetic, chosen when the wire is created and
/// persisted with the patch.
#[derive(Clone, Debug, PartialEq)]
pub struct Wire {
    /// Stable identifier assigned by the graph; never reused.
    id: WireId,
    /// Source module.
    pub output_module: ModuleId,
    /// Output port id on the source module.
    pub output_port: PortId,
    /// Destination module.
    pub input_module: ModuleId,
    /// Input port id on the destination module.
    pub input_port: PortId,
    /// Display color of the cable.
    pub color: Color32,
}

impl Wire {
    /// Returns the wire's stable identifier.
    pub fn id(&self) -> WireId {
        self.id
    }

    /// Returns the output endpoint as a port reference.
    pub fn output_ref(&self) -> PortRef {
        PortRef::output(self.output_module, self.output_port)
    }

    /// Returns the input endpoint as a port reference.
    pub fn input_ref(&self) -> PortRef {
        PortRef::input(self.input_module, self.input_port)
    }

    /// Returns true if the wire touches the given port.
    pub fn touches(&self, port: PortRef) -> bool {
        match port.direction {
            PortDirection::Output => {
                self.output_module == port.module && self.output_port == port.port
            }
            PortDirection::Input => {
                self.input_module == port.module && self.input_port == port.port
            }
        }
    }
}

/// The patch graph: the set of all placed modules and committed wires.
///
/// The graph maintains:
/// - Module instances, iterable in insertion order
/// - Committed wires, iterable in insertion order
/// - The one-wire-per-input invariant via replace-on-connect
pub struct PatchGraph {
    /// Modules indexed by their id.
    modules: HashMap<ModuleId, Module>,
    /// Module ids in insertion order, for stable traversal.
    module_order: Vec<ModuleId>,
    /// Committed wires in insertion order.
    wires: Vec<Wire>,
    /// Next module id to hand out.
    next_module_id: ModuleId,
    /// Next wire id to hand out. Monotonic; ids are never reused.
    next_wire_id: WireId,
}

impl PatchGraph {
    /// Creates a new empty patch graph.
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
            module_order: Vec::new(),
            wires: Vec::new(),
            next_module_id: 1,
            next_wire_id: 1,
        }
    }

    // ========================================================================
    // Module Management
    // ========================================================================

    /// Adds a module at the given position.
    ///
    /// Fails with `PlacementConflict` if the module face would overlap an
    /// existing module (exact edge contact is allowed).
    pub fn add_module(
        &mut self,
        descriptor: &'static ModuleDescriptor,
        position: RackPos,
    ) -> Result<ModuleId, GraphError> {
        let rect = module_rect_at(descriptor, position);
        if self
            .modules_in_order()
            .any(|other| rects_overlap(rect, other.rect()))
        {
            return Err(GraphError::PlacementConflict);
        }

        let id = self.next_module_id;
        self.next_module_id += 1;
        self.modules.insert(id, Module::new(id, descriptor, position));
        self.module_order.push(id);
        Ok(id)
    }

    /// Removes a module, disconnecting every wire touching its ports.
    pub fn remove_module(&mut self, id: ModuleId) -> Result<(), GraphError> {
        if self.modules.remove(&id).is_none() {
            return Err(GraphError::UnknownModule(id));
        }
        self.module_order.retain(|&m| m != id);
        self.wires
            .retain(|wire| wire.output_module != id && wire.input_module != id);
        Ok(())
    }

    /// Returns a module by id.
    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(&id)
    }

    /// Returns a mutable module by id.
    pub fn module_mut(&mut self, id: ModuleId) -> Option<&mut Module> {
        self.modules.get_mut(&id)
    }

    /// Iterates over modules in insertion order.
    pub fn modules_in_order(&self) -> impl Iterator<Item = &Module> {
        self.module_order.iter().filter_map(|id| self.modules.get(id))
    }

    /// Returns the module ids in insertion order.
    pub fn module_ids(&self) -> &[ModuleId] {
        &self.module_order
    }

    /// Returns the number of modules in the graph.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub(crate) fn set_module_position(&mut self, id: ModuleId, position: RackPos) {
        if let Some(module) = self.modules.get_mut(&id) {
            module.set_position(position);
        }
    }

    // ========================================================================
    // Wire Management
    // ========================================================================

    /// Connects an output port to an input port.
    ///
    /// If the input port already carries a wire, that wire is silently
    /// removed first; an input never holds two wires. The new wire gets a
    /// fresh identifier either way.
    pub fn connect(
        &mut self,
        output: PortRef,
        input: PortRef,
        color: Color32,
    ) -> Result<WireId, GraphError> {
        if output.direction != PortDirection::Output || input.direction != PortDirection::Input {
            return Err(GraphError::TypeMismatch);
        }
        self.check_port(output)?;
        self.check_port(input)?;

        // Replace-on-connect: drop any wire already feeding this input.
        if let Some(existing) = self.input_wire(input.module, input.port) {
            self.wires.retain(|wire| wire.id != existing);
        }

        let id = self.next_wire_id;
        self.next_wire_id += 1;
        self.wires.push(Wire {
            id,
            output_module: output.module,
            output_port: output.port,
            input_module: input.module,
            input_port: input.port,
            color,
        });
        Ok(id)
    }

    /// Removes a wire by id.
    pub fn disconnect(&mut self, id: WireId) -> Result<(), GraphError> {
        let before = self.wires.len();
        self.wires.retain(|wire| wire.id != id);
        if self.wires.len() == before {
            return Err(GraphError::UnknownWire(id));
        }
        Ok(())
    }

    /// Removes every wire touching the given port, in either direction.
    ///
    /// Returns the number of wires removed.
    pub fn disconnect_port(&mut self, port: PortRef) -> Result<usize, GraphError> {
        self.check_port(port)?;
        let before = self.wires.len();
        self.wires.retain(|wire| !wire.touches(port));
        Ok(before - self.wires.len())
    }

    /// Removes every wire touching any port of the given module.
    ///
    /// The module itself stays in the graph.
    pub fn disconnect_module(&mut self, id: ModuleId) -> Result<usize, GraphError> {
        if !self.modules.contains_key(&id) {
            return Err(GraphError::UnknownModule(id));
        }
        let before = self.wires.len();
        self.wires
            .retain(|wire| wire.output_module != id && wire.input_module != id);
        Ok(before - self.wires.len())
    }

    /// Returns a wire by id.
    pub fn wire(&self, id: WireId) -> Option<&Wire> {
        self.wires.iter().find(|wire| wire.id == id)
    }

    /// Iterates over committed wires in insertion order.
    pub fn wires_in_order(&self) -> impl Iterator<Item = &Wire> {
        self.wires.iter()
    }

    /// Returns the ids of all wires touching a port, in insertion order.
    pub fn wires_of(&self, port: PortRef) -> Vec<WireId> {
        self.wires
            .iter()
            .filter(|wire| wire.touches(port))
            .map(|wire| wire.id)
            .collect()
    }

    /// Returns the wire feeding an input port, if any.
    ///
    /// An input carries at most one wire, so this is the whole answer.
    pub fn input_wire(&self, module: ModuleId, port: PortId) -> Option<WireId> {
        self.wires
            .iter()
            .find(|wire| wire.input_module == module && wire.input_port == port)
            .map(|wire| wire.id)
    }

    /// Returns the number of committed wires in the graph.
    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    /// Sets a parameter value on a module, clamped to its range.
    pub fn set_parameter(
        &mut self,
        module: ModuleId,
        index: usize,
        value: f32,
    ) -> Result<(), GraphError> {
        let m = self
            .modules
            .get_mut(&module)
            .ok_or(GraphError::UnknownModule(module))?;
        if !m.set_param(index, value) {
            return Err(GraphError::UnknownParam { module, index });
        }
        Ok(())
    }

    /// Clears the entire graph.
    ///
    /// Identifier counters are not reset, so ids from before the clear
    /// are never reused.
    pub fn clear(&mut self) {
        self.modules.clear();
        self.module_order.clear();
        self.wires.clear();
    }

    /// Checks that a port reference names a live module and an in-range
    /// port id.
    fn check_port(&self, port: PortRef) -> Result<(), GraphError> {
        let module = self
            .modules
            .get(&port.module)
            .ok_or(GraphError::UnknownModule(port.module))?;
        if port.port >= module.descriptor().port_count(port.direction) {
            return Err(GraphError::UnknownPort {
                module: port.module,
                port: port.port,
            });
        }
        Ok(())
    }
}

impl Default for PatchGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::descriptor::ModuleCategory;

    const COLOR: Color32 = Color32::from_rgb(240, 80, 80);

    static SOURCE: ModuleDescriptor = ModuleDescriptor {
        plugin_id: "test",
        module_id: "source",
        name: "Source",
        category: ModuleCategory::Source,
        width_hp: 4,
        inputs: &[],
        outputs: &["out0", "out1"],
        params: &[],
    };

    static SINK: ModuleDescriptor = ModuleDescriptor {
        plugin_id: "test",
        module_id: "sink",
        name: "Sink",
        category: ModuleCategory::Output,
        width_hp: 4,
        inputs: &["in0", "in1"],
        outputs: &[],
        params: &[],
    };

    static BOTH: ModuleDescriptor = ModuleDescriptor {
        plugin_id: "test",
        module_id: "both",
        name: "Both",
        category: ModuleCategory::Filter,
        width_hp: 4,
        inputs: &["in"],
        outputs: &["out"],
        params: &[],
    };

    /// A source at x=0 and a sink at x=120, far enough apart to never
    /// conflict.
    fn two_modules() -> (PatchGraph, ModuleId, ModuleId) {
        let mut graph = PatchGraph::new();
        let source = graph.add_module(&SOURCE, RackPos::new(0, 0)).unwrap();
        let sink = graph.add_module(&SINK, RackPos::new(120, 0)).unwrap();
        (graph, source, sink)
    }

    #[test]
    fn test_add_module_assigns_sequential_ids() {
        let (graph, source, sink) = two_modules();
        assert_eq!(source, 1);
        assert_eq!(sink, 2);
        assert_eq!(graph.module_count(), 2);
        assert_eq!(graph.module_ids(), &[1, 2]);
    }

    #[test]
    fn test_add_module_placement_conflict() {
        let mut graph = PatchGraph::new();
        graph.add_module(&SOURCE, RackPos::new(0, 0)).unwrap();

        // Overlapping the first module's 60px-wide face is rejected.
        let result = graph.add_module(&SINK, RackPos::new(30, 0));
        assert_eq!(result, Err(GraphError::PlacementConflict));
        assert_eq!(graph.module_count(), 1);
    }

    #[test]
    fn test_add_module_edge_contact_allowed() {
        let mut graph = PatchGraph::new();
        graph.add_module(&SOURCE, RackPos::new(0, 0)).unwrap();

        // SOURCE is 4hp = 60px wide, so x=60 shares an edge exactly.
        assert!(graph.add_module(&SINK, RackPos::new(60, 0)).is_ok());
    }

    #[test]
    fn test_connect_creates_wire() {
        let (mut graph, source, sink) = two_modules();
        let wire = graph
            .connect(PortRef::output(source, 0), PortRef::input(sink, 0), COLOR)
            .unwrap();

        assert_eq!(graph.wire_count(), 1);
        let stored = graph.wire(wire).unwrap();
        assert_eq!(stored.output_module, source);
        assert_eq!(stored.input_module, sink);
        assert_eq!(stored.color, COLOR);
    }

    #[test]
    fn test_connect_type_mismatch() {
        let (mut graph, source, sink) = two_modules();

        // Two outputs.
        let result = graph.connect(PortRef::output(source, 0), PortRef::output(source, 1), COLOR);
        assert_eq!(result, Err(GraphError::TypeMismatch));

        // Two inputs.
        let result = graph.connect(PortRef::input(sink, 0), PortRef::input(sink, 1), COLOR);
        assert_eq!(result, Err(GraphError::TypeMismatch));

        // Swapped argument order is also a mismatch, not auto-corrected.
        let result = graph.connect(PortRef::input(sink, 0), PortRef::output(source, 0), COLOR);
        assert_eq!(result, Err(GraphError::TypeMismatch));
    }

    #[test]
    fn test_connect_unknown_module_and_port() {
        let (mut graph, source, sink) = two_modules();

        let result = graph.connect(PortRef::output(99, 0), PortRef::input(sink, 0), COLOR);
        assert_eq!(result, Err(GraphError::UnknownModule(99)));

        let result = graph.connect(PortRef::output(source, 7), PortRef::input(sink, 0), COLOR);
        assert_eq!(
            result,
            Err(GraphError::UnknownPort {
                module: source,
                port: 7
            })
        );
    }

    #[test]
    fn test_replace_on_connect() {
        let (mut graph, source, sink) = two_modules();
        let first = graph
            .connect(PortRef::output(source, 0), PortRef::input(sink, 0), COLOR)
            .unwrap();
        let second = graph
            .connect(PortRef::output(source, 1), PortRef::input(sink, 0), COLOR)
            .unwrap();

        // The input still carries exactly one wire, and the old id is gone.
        assert_eq!(graph.wire_count(), 1);
        assert_ne!(first, second);
        assert!(graph.wire(first).is_none());
        assert_eq!(graph.input_wire(sink, 0), Some(second));
    }

    #[test]
    fn test_wire_ids_never_reused() {
        let (mut graph, source, sink) = two_modules();
        let first = graph
            .connect(PortRef::output(source, 0), PortRef::input(sink, 0), COLOR)
            .unwrap();
        graph.disconnect(first).unwrap();
        let second = graph
            .connect(PortRef::output(source, 0), PortRef::input(sink, 0), COLOR)
            .unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_output_fans_out() {
        let (mut graph, source, sink) = two_modules();
        graph
            .connect(PortRef::output(source, 0), PortRef::input(sink, 0), COLOR)
            .unwrap();
        graph
            .connect(PortRef::output(source, 0), PortRef::input(sink, 1), COLOR)
            .unwrap();

        assert_eq!(graph.wire_count(), 2);
        assert_eq!(graph.wires_of(PortRef::output(source, 0)).len(), 2);
    }

    #[test]
    fn test_one_wire_per_input_over_sequences() {
        let (mut graph, source, sink) = two_modules();

        // An arbitrary connect/disconnect sequence never leaves an input
        // with two wires.
        for round in 0..8 {
            let out_port = round % 2;
            graph
                .connect(
                    PortRef::output(source, out_port),
                    PortRef::input(sink, 0),
                    COLOR,
                )
                .unwrap();
            assert_eq!(graph.wires_of(PortRef::input(sink, 0)).len(), 1);
        }
    }

    #[test]
    fn test_self_patching_module_allowed() {
        let mut graph = PatchGraph::new();
        let id = graph.add_module(&BOTH, RackPos::new(0, 0)).unwrap();

        // Feedback from a module's own output to its own input is legal.
        let wire = graph.connect(PortRef::output(id, 0), PortRef::input(id, 0), COLOR);
        assert!(wire.is_ok());
    }

    #[test]
    fn test_disconnect_unknown_wire() {
        let mut graph = PatchGraph::new();
        assert_eq!(graph.disconnect(42), Err(GraphError::UnknownWire(42)));
    }

    #[test]
    fn test_disconnect_port_both_directions() {
        let (mut graph, source, sink) = two_modules();
        graph
            .connect(PortRef::output(source, 0), PortRef::input(sink, 0), COLOR)
            .unwrap();
        graph
            .connect(PortRef::output(source, 0), PortRef::input(sink, 1), COLOR)
            .unwrap();

        // Disconnecting the output end removes both wires.
        let removed = graph.disconnect_port(PortRef::output(source, 0)).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(graph.wire_count(), 0);
    }

    #[test]
    fn test_disconnect_module_keeps_module() {
        let (mut graph, source, sink) = two_modules();
        graph
            .connect(PortRef::output(source, 0), PortRef::input(sink, 0), COLOR)
            .unwrap();
        graph
            .connect(PortRef::output(source, 1), PortRef::input(sink, 1), COLOR)
            .unwrap();

        let removed = graph.disconnect_module(source).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(graph.wire_count(), 0);
        assert!(graph.module(source).is_some());

        assert_eq!(
            graph.disconnect_module(99),
            Err(GraphError::UnknownModule(99))
        );
    }

    #[test]
    fn test_remove_module_cascades_exactly() {
        let mut graph = PatchGraph::new();
        let source = graph.add_module(&SOURCE, RackPos::new(0, 0)).unwrap();
        let sink = graph.add_module(&SINK, RackPos::new(120, 0)).unwrap();
        let other = graph.add_module(&BOTH, RackPos::new(240, 0)).unwrap();

        graph
            .connect(PortRef::output(source, 0), PortRef::input(sink, 0), COLOR)
            .unwrap();
        let survivor = graph
            .connect(PortRef::output(other, 0), PortRef::input(sink, 1), COLOR)
            .unwrap();

        graph.remove_module(source).unwrap();

        // Only the wire touching the removed module is gone.
        assert_eq!(graph.wire_count(), 1);
        assert!(graph.wire(survivor).is_some());
        assert!(graph.module(source).is_none());
    }

    #[test]
    fn test_remove_unknown_module() {
        let mut graph = PatchGraph::new();
        assert_eq!(graph.remove_module(7), Err(GraphError::UnknownModule(7)));
    }

    #[test]
    fn test_wires_of_insertion_order() {
        let (mut graph, source, sink) = two_modules();
        let a = graph
            .connect(PortRef::output(source, 0), PortRef::input(sink, 0), COLOR)
            .unwrap();
        let b = graph
            .connect(PortRef::output(source, 0), PortRef::input(sink, 1), COLOR)
            .unwrap();

        assert_eq!(graph.wires_of(PortRef::output(source, 0)), vec![a, b]);
    }

    #[test]
    fn test_set_parameter_errors() {
        let mut graph = PatchGraph::new();
        assert_eq!(
            graph.set_parameter(3, 0, 1.0),
            Err(GraphError::UnknownModule(3))
        );

        let id = graph.add_module(&SOURCE, RackPos::new(0, 0)).unwrap();
        assert_eq!(
            graph.set_parameter(id, 0, 1.0),
            Err(GraphError::UnknownParam { module: id, index: 0 })
        );
    }

    #[test]
    fn test_clear_keeps_id_counters() {
        let (mut graph, source, sink) = two_modules();
        graph
            .connect(PortRef::output(source, 0), PortRef::input(sink, 0), COLOR)
            .unwrap();
        graph.clear();

        assert_eq!(graph.module_count(), 0);
        assert_eq!(graph.wire_count(), 0);

        // New modules continue the id sequence.
        let next = graph.add_module(&SOURCE, RackPos::new(0, 0)).unwrap();
        assert_eq!(next, 3);
    }

    #[test]
    fn test_error_display() {
        assert!(GraphError::UnknownModule(4).to_string().contains("4"));
        assert!(GraphError::TypeMismatch.to_string().contains("output"));
        assert!(GraphError::PlacementConflict
            .to_string()
            .contains("overlaps"));
    }
}
