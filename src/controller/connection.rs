//! The cable drag state machine.
//!
//! Pointer events arrive as discrete calls (`on_press`, `on_move`,
//! `on_release`, `on_abort`) with canvas coordinates; the controller
//! resolves them to port terminals and drives the patch graph. While a
//! drag is active the controller owns a single transient wire that is
//! invisible to the graph, the serializer, and the layout until it is
//! committed on release.
//!
//! Pressing an input that already carries a wire picks that wire up: the
//! wire leaves the graph immediately, its output end stays anchored, and
//! the input end follows the pointer. Releasing over a compatible port
//! recommits it; releasing anywhere else deletes it for good. An abort
//! behaves like an off-target release.

use egui::{Color32, Pos2};

use crate::graph::{PatchGraph, PortDirection, PortRef};
use crate::layout::{RackLayout, PORT_HOVER_RADIUS};

/// Cable colors, cycled through as new wires are started.
pub const WIRE_COLORS: [Color32; 6] = [
    Color32::from_rgb(244, 67, 54),  // Red #F44336
    Color32::from_rgb(255, 152, 0),  // Orange #FF9800
    Color32::from_rgb(255, 235, 59), // Yellow #FFEB3B
    Color32::from_rgb(76, 175, 80),  // Green #4CAF50
    Color32::from_rgb(33, 150, 243), // Blue #2196F3
    Color32::from_rgb(156, 39, 176), // Purple #9C27B0
];

/// Hands out cable colors in rotation.
///
/// The rotation advances once per started drag, so cancelled drags still
/// move the palette forward.
#[derive(Debug, Default)]
pub struct WirePalette {
    next_index: usize,
}

impl WirePalette {
    /// Creates a palette starting at the first color.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next color in rotation.
    pub fn next(&mut self) -> Color32 {
        let color = WIRE_COLORS[self.next_index];
        self.next_index = (self.next_index + 1) % WIRE_COLORS.len();
        color
    }
}

/// An in-progress, uncommitted wire owned by the drag controller.
///
/// One endpoint (`origin`) is fixed to a port; the other end follows the
/// pointer. A transient wire is never part of the committed graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransientWire {
    /// The fixed endpoint the drag is anchored on.
    pub origin: PortRef,
    /// Display color; kept when the wire is committed.
    pub color: Color32,
    /// Current pointer position of the free end.
    pub free_end: Pos2,
}

/// State of the drag machine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragState {
    /// No drag in progress.
    Idle,
    /// A drag has started from a port but the pointer has not moved yet.
    DraggingFromPort { wire: TransientWire },
    /// The pointer is moving; `candidate` is the compatible port it would
    /// land on, re-evaluated on every move.
    HoveringTarget {
        wire: TransientWire,
        candidate: Option<PortRef>,
    },
}

/// The interactive cabling controller.
///
/// Event-sequence errors (a move without a press, a release while idle)
/// are ignored: they reflect impossible input delivery, not user
/// mistakes, and must never corrupt the committed graph.
pub struct ConnectionController {
    state: DragState,
    palette: WirePalette,
}

impl ConnectionController {
    /// Creates an idle controller.
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
            palette: WirePalette::new(),
        }
    }

    /// Returns the current drag state.
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Returns the transient wire, if a drag is in progress.
    pub fn transient(&self) -> Option<&TransientWire> {
        match &self.state {
            DragState::Idle => None,
            DragState::DraggingFromPort { wire } => Some(wire),
            DragState::HoveringTarget { wire, .. } => Some(wire),
        }
    }

    /// Returns the current snap candidate, if any.
    pub fn candidate(&self) -> Option<PortRef> {
        match &self.state {
            DragState::HoveringTarget { candidate, .. } => *candidate,
            _ => None,
        }
    }

    /// Returns true while a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    /// Handles a pointer press on the canvas.
    ///
    /// A press over an output, or over an input with no wire, starts a
    /// fresh transient anchored there. A press over a wired input picks
    /// up the existing wire instead: the wire is removed from the graph
    /// and its output end becomes the anchor, so the user can redirect or
    /// delete it without an explicit disconnect step.
    pub fn on_press(&mut self, graph: &mut PatchGraph, layout: &RackLayout, pos: Pos2) {
        if !matches!(self.state, DragState::Idle) {
            return;
        }
        let Some(pressed) = layout.port_at(graph, pos) else {
            return;
        };

        let picked_up = match pressed.direction {
            PortDirection::Input => graph
                .input_wire(pressed.module, pressed.port)
                .and_then(|id| graph.wire(id).cloned()),
            PortDirection::Output => None,
        };

        let (origin, color) = match picked_up {
            Some(wire) => {
                // Detach now; an abort or off-target release leaves the
                // wire deleted.
                let _ = graph.disconnect(wire.id());
                (wire.output_ref(), wire.color)
            }
            None => (pressed, self.palette.next()),
        };

        self.state = DragState::DraggingFromPort {
            wire: TransientWire {
                origin,
                color,
                free_end: pos,
            },
        };
    }

    /// Handles a pointer move during a drag.
    ///
    /// The free end follows the pointer and the snap candidate is
    /// re-resolved: the nearest port within [`PORT_HOVER_RADIUS`] whose
    /// direction is opposite the anchor. Moves while idle are ignored.
    pub fn on_move(&mut self, graph: &PatchGraph, layout: &RackLayout, pos: Pos2) {
        let mut wire = match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle => return,
            DragState::DraggingFromPort { wire } => wire,
            DragState::HoveringTarget { wire, .. } => wire,
        };
        wire.free_end = pos;

        let candidate = layout.nearest_port(
            graph,
            pos,
            PORT_HOVER_RADIUS,
            Some(wire.origin.direction.opposite()),
            Some(wire.origin),
        );
        self.state = DragState::HoveringTarget { wire, candidate };
    }

    /// Handles a pointer release, ending the drag.
    ///
    /// With a snap candidate, the wire is committed through
    /// [`PatchGraph::connect`] with the endpoints normalized to
    /// (output, input) regardless of which end was dragged; any wire
    /// already on that input is replaced. Without a candidate the
    /// transient is discarded.
    pub fn on_release(&mut self, graph: &mut PatchGraph) {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle => {}
            DragState::DraggingFromPort { .. } => {}
            DragState::HoveringTarget { wire, candidate } => {
                if let Some(candidate) = candidate {
                    let (output, input) = match wire.origin.direction {
                        PortDirection::Output => (wire.origin, candidate),
                        PortDirection::Input => (candidate, wire.origin),
                    };
                    // A stale endpoint (module removed mid-drag) makes
                    // this fail; the drag simply ends with nothing
                    // committed.
                    let _ = graph.connect(output, input, wire.color);
                }
            }
        }
    }

    /// Aborts the drag (e.g., on lost pointer capture).
    ///
    /// Returns straight to idle and discards the transient wire. The
    /// committed graph is untouched, except that a picked-up wire stays
    /// removed.
    pub fn on_abort(&mut self) {
        self.state = DragState::Idle;
    }

    /// Idle hover lookup for port highlighting.
    ///
    /// Pure query; does not touch the drag state.
    pub fn hover_port(
        &self,
        graph: &PatchGraph,
        layout: &RackLayout,
        pos: Pos2,
    ) -> Option<PortRef> {
        layout.port_at(graph, pos)
    }
}

impl Default for ConnectionController {
    fn default() -> Self {
        Self::new()
    }
}
