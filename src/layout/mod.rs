//! Rack layout: grid placement and face geometry.
//!
//! Modules sit on a horizontal grid; a full-height module face is 380 px
//! tall and its width is a multiple of the 15 px rack unit. The layout
//! owns placement policy (snap, overlap accept/reject) and the face
//! geometry the renderer and the cable controller both query: module
//! rectangles, port positions, and nearest-port lookup.

use egui::{pos2, Pos2, Rect};

use crate::graph::{GraphError, ModuleDescriptor, ModuleId, PatchGraph, PortDirection, PortRef};

/// Width of one horizontal rack unit, in pixels.
pub const GRID_WIDTH: f32 = 15.0;

/// Height of a module face, in pixels. Module widths are multiples of
/// [`GRID_WIDTH`]; the height is fixed.
pub const MODULE_HEIGHT: f32 = 380.0;

/// Horizontal inset of the port columns from the module face edges.
pub const PORT_INSET: f32 = 10.0;

/// Radius within which a pointer position snaps to the nearest port.
///
/// Lookup is nearest-within-radius rather than exact hit-testing so that
/// small terminals are easy to target mid-drag.
pub const PORT_HOVER_RADIUS: f32 = 16.0;

/// A module position on the rack canvas, in integer pixels.
///
/// Positions are integers so persisted patches round-trip exactly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RackPos {
    pub x: i32,
    pub y: i32,
}

impl RackPos {
    /// Creates a position from pixel coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the position as a floating-point point.
    pub fn to_pos2(self) -> Pos2 {
        pos2(self.x as f32, self.y as f32)
    }
}

/// Vertical placement policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RowMode {
    /// Modules may sit at any vertical position.
    #[default]
    FreeVertical,
    /// Modules snap to fixed rows of [`MODULE_HEIGHT`].
    LockedRows,
}

/// Returns the rectangle a module face would cover at the given position.
pub fn module_rect_at(descriptor: &ModuleDescriptor, position: RackPos) -> Rect {
    Rect::from_min_size(
        position.to_pos2(),
        egui::vec2(descriptor.width_hp as f32 * GRID_WIDTH, MODULE_HEIGHT),
    )
}

/// Strict axis-aligned overlap test.
///
/// Exact edge contact does not count as overlap, so modules can sit
/// flush against each other.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.min.x < b.max.x && b.min.x < a.max.x && a.min.y < b.max.y && b.min.y < a.max.y
}

/// Placement and face-geometry policy for the rack canvas.
pub struct RackLayout {
    /// Vertical placement policy knob.
    pub row_mode: RowMode,
}

impl RackLayout {
    /// Creates a layout with free vertical placement.
    pub fn new() -> Self {
        Self {
            row_mode: RowMode::FreeVertical,
        }
    }

    /// Snaps a requested position to the grid.
    ///
    /// The horizontal coordinate always snaps to the rack unit; the
    /// vertical coordinate snaps to rows only under `RowMode::LockedRows`.
    pub fn snap(&self, requested: RackPos) -> RackPos {
        let x = snap_to(requested.x, GRID_WIDTH);
        let y = match self.row_mode {
            RowMode::FreeVertical => requested.y,
            RowMode::LockedRows => snap_to(requested.y, MODULE_HEIGHT),
        };
        RackPos::new(x, y)
    }

    /// Moves a module to a requested position, if the snapped position is
    /// free.
    ///
    /// On conflict the module keeps its last accepted position and
    /// `PlacementConflict` is returned; neighboring modules are never
    /// pushed aside.
    pub fn place(
        &self,
        graph: &mut PatchGraph,
        id: ModuleId,
        requested: RackPos,
    ) -> Result<RackPos, GraphError> {
        let descriptor = graph
            .module(id)
            .ok_or(GraphError::UnknownModule(id))?
            .descriptor();
        let position = self.snap(requested);
        let rect = module_rect_at(descriptor, position);

        let conflict = graph
            .modules_in_order()
            .any(|other| other.id() != id && rects_overlap(rect, other.rect()));
        if conflict {
            return Err(GraphError::PlacementConflict);
        }

        graph.set_module_position(id, position);
        Ok(position)
    }

    /// Returns the canvas position of a port terminal.
    ///
    /// Inputs run down the left edge of the module face, outputs down the
    /// right edge, evenly spaced. Returns `None` for a stale reference.
    pub fn port_position(&self, graph: &PatchGraph, port: PortRef) -> Option<Pos2> {
        let module = graph.module(port.module)?;
        let count = module.descriptor().port_count(port.direction);
        if port.port >= count {
            return None;
        }

        let rect = module.rect();
        let x = match port.direction {
            PortDirection::Input => rect.min.x + PORT_INSET,
            PortDirection::Output => rect.max.x - PORT_INSET,
        };
        let y = rect.min.y + rect.height() * (port.port as f32 + 1.0) / (count as f32 + 1.0);
        Some(pos2(x, y))
    }

    /// Finds the nearest port to a canvas position within `radius`.
    ///
    /// `direction` restricts the search to one port direction; `exclude`
    /// removes a single port from consideration (the drag origin). Ties
    /// resolve to the first port in module insertion order.
    pub fn nearest_port(
        &self,
        graph: &PatchGraph,
        pos: Pos2,
        radius: f32,
        direction: Option<PortDirection>,
        exclude: Option<PortRef>,
    ) -> Option<PortRef> {
        let mut best: Option<(PortRef, f32)> = None;

        for module in graph.modules_in_order() {
            for port in module.ports() {
                if let Some(wanted) = direction {
                    if port.direction != wanted {
                        continue;
                    }
                }
                if exclude == Some(port) {
                    continue;
                }
                let Some(port_pos) = self.port_position(graph, port) else {
                    continue;
                };
                let dist_sq = port_pos.distance_sq(pos);
                if dist_sq > radius * radius {
                    continue;
                }
                if best.map_or(true, |(_, best_sq)| dist_sq < best_sq) {
                    best = Some((port, dist_sq));
                }
            }
        }

        best.map(|(port, _)| port)
    }

    /// Finds the port under the pointer, any direction, default radius.
    pub fn port_at(&self, graph: &PatchGraph, pos: Pos2) -> Option<PortRef> {
        self.nearest_port(graph, pos, PORT_HOVER_RADIUS, None, None)
    }
}

impl Default for RackLayout {
    fn default() -> Self {
        Self::new()
    }
}

/// Rounds an integer pixel coordinate to the nearest multiple of `unit`.
fn snap_to(value: i32, unit: f32) -> i32 {
    ((value as f32 / unit).round() * unit) as i32
}
