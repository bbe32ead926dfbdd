//! Per-frame traversal of the rack.
//!
//! Each frame runs a `step` pass over the whole patch before the `draw`
//! pass begins: `step` refreshes cached derived geometry (wire endpoint
//! positions), `draw` walks modules, then wires, then the in-progress
//! drag wire, all in insertion order, handing geometry to the external
//! renderer. Everything runs on the event thread, so graph mutations made
//! earlier in a frame are always reflected by that frame's `step` and
//! never appear torn mid-pass.

use std::collections::HashMap;

use egui::{Color32, Pos2, Rect};

use crate::controller::ConnectionController;
use crate::graph::{Module, PatchGraph, Wire, WireId};
use crate::layout::RackLayout;

/// Drawing seam implemented by the external renderer.
///
/// The scene resolves all geometry before calling in; implementations
/// only paint.
pub trait RackRenderer {
    /// Paints one module face.
    fn draw_module(&mut self, module: &Module, rect: Rect);

    /// Paints one committed wire between two port positions.
    fn draw_wire(&mut self, wire: &Wire, output_pos: Pos2, input_pos: Pos2);

    /// Paints the in-progress drag wire from its anchored port to the
    /// pointer.
    fn draw_dragged_wire(&mut self, fixed_pos: Pos2, free_pos: Pos2, color: Color32);
}

/// The per-frame step/draw traversal over the patch.
pub struct RackScene {
    /// Wire endpoint positions cached by the last `step`.
    wire_geometry: HashMap<WireId, (Pos2, Pos2)>,
}

impl RackScene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self {
            wire_geometry: HashMap::new(),
        }
    }

    /// Refreshes cached wire geometry from the current graph state.
    ///
    /// Must run before `draw` each frame; a wire created this frame is
    /// not painted until it has been stepped.
    pub fn step(&mut self, graph: &PatchGraph, layout: &RackLayout) {
        self.wire_geometry.clear();
        for wire in graph.wires_in_order() {
            let output_pos = layout.port_position(graph, wire.output_ref());
            let input_pos = layout.port_position(graph, wire.input_ref());
            if let (Some(output_pos), Some(input_pos)) = (output_pos, input_pos) {
                self.wire_geometry.insert(wire.id(), (output_pos, input_pos));
            }
        }
    }

    /// Walks the patch in insertion order and hands geometry to the
    /// renderer: modules first, then wires, then the drag wire on top.
    pub fn draw(
        &self,
        graph: &PatchGraph,
        layout: &RackLayout,
        controller: &ConnectionController,
        renderer: &mut dyn RackRenderer,
    ) {
        for module in graph.modules_in_order() {
            renderer.draw_module(module, module.rect());
        }

        for wire in graph.wires_in_order() {
            if let Some(&(output_pos, input_pos)) = self.wire_geometry.get(&wire.id()) {
                renderer.draw_wire(wire, output_pos, input_pos);
            }
        }

        if let Some(transient) = controller.transient() {
            if let Some(fixed_pos) = layout.port_position(graph, transient.origin) {
                renderer.draw_dragged_wire(fixed_pos, transient.free_end, transient.color);
            }
        }
    }

    /// Runs one full frame: `step`, then `draw`.
    pub fn frame(
        &mut self,
        graph: &PatchGraph,
        layout: &RackLayout,
        controller: &ConnectionController,
        renderer: &mut dyn RackRenderer,
    ) {
        self.step(graph, layout);
        self.draw(graph, layout, controller, renderer);
    }
}

impl Default for RackScene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::descriptor::ModuleCategory;
    use crate::graph::{ModuleDescriptor, PortRef};
    use crate::layout::RackPos;
    use egui::pos2;

    static SOURCE: ModuleDescriptor = ModuleDescriptor {
        plugin_id: "test",
        module_id: "source",
        name: "Source",
        category: ModuleCategory::Source,
        width_hp: 4,
        inputs: &[],
        outputs: &["out"],
        params: &[],
    };

    static SINK: ModuleDescriptor = ModuleDescriptor {
        plugin_id: "test",
        module_id: "sink",
        name: "Sink",
        category: ModuleCategory::Output,
        width_hp: 4,
        inputs: &["in"],
        outputs: &[],
        params: &[],
    };

    /// Records draw calls in order as coarse event strings.
    struct RecordingRenderer {
        events: Vec<String>,
    }

    impl RecordingRenderer {
        fn new() -> Self {
            Self { events: Vec::new() }
        }
    }

    impl RackRenderer for RecordingRenderer {
        fn draw_module(&mut self, module: &Module, _rect: Rect) {
            self.events.push(format!("module:{}", module.id()));
        }

        fn draw_wire(&mut self, wire: &Wire, _output_pos: Pos2, _input_pos: Pos2) {
            self.events.push(format!("wire:{}", wire.id()));
        }

        fn draw_dragged_wire(&mut self, _fixed_pos: Pos2, _free_pos: Pos2, _color: Color32) {
            self.events.push("dragged".to_string());
        }
    }

    fn rig() -> (PatchGraph, RackLayout, ConnectionController) {
        let mut graph = PatchGraph::new();
        graph.add_module(&SOURCE, RackPos::new(0, 0)).unwrap();
        graph.add_module(&SINK, RackPos::new(120, 0)).unwrap();
        (graph, RackLayout::new(), ConnectionController::new())
    }

    #[test]
    fn test_draw_order_modules_then_wires() {
        let (mut graph, layout, controller) = rig();
        graph
            .connect(
                PortRef::output(1, 0),
                PortRef::input(2, 0),
                Color32::WHITE,
            )
            .unwrap();

        let mut scene = RackScene::new();
        let mut renderer = RecordingRenderer::new();
        scene.frame(&graph, &layout, &controller, &mut renderer);

        assert_eq!(renderer.events, vec!["module:1", "module:2", "wire:1"]);
    }

    #[test]
    fn test_mutation_visible_in_same_frame_step() {
        let (mut graph, layout, controller) = rig();
        let mut scene = RackScene::new();

        // Geometry cached before the wire existed does not paint it...
        scene.step(&graph, &layout);
        graph
            .connect(
                PortRef::output(1, 0),
                PortRef::input(2, 0),
                Color32::WHITE,
            )
            .unwrap();
        let mut renderer = RecordingRenderer::new();
        scene.draw(&graph, &layout, &controller, &mut renderer);
        assert!(!renderer.events.iter().any(|e| e.starts_with("wire")));

        // ...but the next step picks it up before its draw.
        let mut renderer = RecordingRenderer::new();
        scene.frame(&graph, &layout, &controller, &mut renderer);
        assert!(renderer.events.iter().any(|e| e == "wire:1"));
    }

    #[test]
    fn test_transient_wire_draws_on_top() {
        let (mut graph, layout, mut controller) = rig();
        let out_pos = layout
            .port_position(&graph, PortRef::output(1, 0))
            .unwrap();
        controller.on_press(&mut graph, &layout, out_pos);
        controller.on_move(&graph, &layout, pos2(400.0, 40.0));

        let mut scene = RackScene::new();
        let mut renderer = RecordingRenderer::new();
        scene.frame(&graph, &layout, &controller, &mut renderer);

        assert_eq!(renderer.events.last().map(String::as_str), Some("dragged"));
    }

    #[test]
    fn test_wire_order_follows_insertion() {
        let (mut graph, layout, controller) = rig();
        let extra = graph.add_module(&SINK, RackPos::new(240, 0)).unwrap();
        let first = graph
            .connect(
                PortRef::output(1, 0),
                PortRef::input(extra, 0),
                Color32::WHITE,
            )
            .unwrap();
        let second = graph
            .connect(
                PortRef::output(1, 0),
                PortRef::input(2, 0),
                Color32::WHITE,
            )
            .unwrap();

        let mut scene = RackScene::new();
        let mut renderer = RecordingRenderer::new();
        scene.frame(&graph, &layout, &controller, &mut renderer);

        let wires: Vec<&String> = renderer
            .events
            .iter()
            .filter(|e| e.starts_with("wire"))
            .collect();
        assert_eq!(wires, vec![&format!("wire:{}", first), &format!("wire:{}", second)]);
    }
}
