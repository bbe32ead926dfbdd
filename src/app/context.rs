//! The rack application context.
//!
//! One `RackContext` owns every subsystem of the editor core: the module
//! registry, the patch graph, the layout, the cable controller, and the
//! scene traversal. It is constructed once at startup, passed explicitly
//! to whoever needs it, and torn down normally; there is no ambient
//! global state.

use std::path::Path;

use egui::Pos2;

use crate::controller::ConnectionController;
use crate::graph::{
    GraphError, ModuleDescriptor, ModuleId, ModuleRegistry, PatchGraph, PortRef,
};
use crate::layout::{RackLayout, RackPos};
use crate::persistence::{self, LoadWarning, PatchError};
use crate::scene::{RackRenderer, RackScene};

/// The editor core: all subsystems plus the event entry points the
/// windowing layer calls into.
pub struct RackContext {
    /// Catalog of available module types.
    pub registry: ModuleRegistry,
    /// The patch graph being edited.
    pub graph: PatchGraph,
    /// Placement policy and face geometry.
    pub layout: RackLayout,
    /// The cable drag state machine.
    pub controller: ConnectionController,
    /// The per-frame step/draw traversal.
    pub scene: RackScene,
}

impl RackContext {
    /// Creates a context with the given module registry and an empty
    /// patch.
    pub fn new(registry: ModuleRegistry) -> Self {
        Self {
            registry,
            graph: PatchGraph::new(),
            layout: RackLayout::new(),
            controller: ConnectionController::new(),
            scene: RackScene::new(),
        }
    }

    /// Creates a context preloaded with the built-in core modules.
    pub fn with_core_modules() -> Self {
        Self::new(crate::modules::core_registry())
    }

    // ========================================================================
    // Module Management
    // ========================================================================

    /// Adds a module near the requested position.
    ///
    /// The position is snapped to the grid first; the add fails with
    /// `PlacementConflict` if the snapped face overlaps another module.
    pub fn add_module(
        &mut self,
        descriptor: &'static ModuleDescriptor,
        requested: RackPos,
    ) -> Result<ModuleId, GraphError> {
        let position = self.layout.snap(requested);
        self.graph.add_module(descriptor, position)
    }

    /// Removes a module and every wire touching it.
    pub fn remove_module(&mut self, id: ModuleId) -> Result<(), GraphError> {
        self.graph.remove_module(id)
    }

    /// Moves a module, keeping it in place on conflict.
    pub fn move_module(
        &mut self,
        id: ModuleId,
        requested: RackPos,
    ) -> Result<RackPos, GraphError> {
        self.layout.place(&mut self.graph, id, requested)
    }

    // ========================================================================
    // Pointer Events
    // ========================================================================

    /// Routes a pointer press on the canvas to the cable controller.
    pub fn on_press(&mut self, pos: Pos2) {
        self.controller.on_press(&mut self.graph, &self.layout, pos);
    }

    /// Routes a pointer move to the cable controller.
    pub fn on_move(&mut self, pos: Pos2) {
        self.controller.on_move(&self.graph, &self.layout, pos);
    }

    /// Routes a pointer release to the cable controller.
    pub fn on_release(&mut self) {
        self.controller.on_release(&mut self.graph);
    }

    /// Aborts any in-progress drag (e.g., on lost pointer capture).
    pub fn on_abort(&mut self) {
        self.controller.on_abort();
    }

    /// Returns the port under the pointer for idle hover highlighting.
    pub fn hovered_port(&self, pos: Pos2) -> Option<PortRef> {
        self.controller.hover_port(&self.graph, &self.layout, pos)
    }

    // ========================================================================
    // Frame & Persistence
    // ========================================================================

    /// Runs one frame: step the scene, then draw through the renderer.
    pub fn frame(&mut self, renderer: &mut dyn RackRenderer) {
        self.scene
            .frame(&self.graph, &self.layout, &self.controller, renderer);
    }

    /// Saves the current patch to a JSON file.
    pub fn save_patch(&self, path: &Path) -> Result<(), PatchError> {
        let doc = persistence::to_document(&self.graph);
        persistence::save_to_file(&doc, path)
    }

    /// Loads a patch from a JSON file, replacing the current graph.
    ///
    /// The current graph is untouched unless the document parses
    /// structurally; per-entry problems are returned as warnings. Any
    /// in-progress drag is aborted.
    pub fn load_patch(&mut self, path: &Path) -> Result<Vec<LoadWarning>, PatchError> {
        let doc = persistence::load_from_file(path)?;
        let (graph, warnings) = persistence::from_document(&doc, &self.registry);
        self.controller.on_abort();
        self.graph = graph;
        Ok(warnings)
    }

    /// Clears the patch, aborting any in-progress drag.
    pub fn clear(&mut self) {
        self.controller.on_abort();
        self.graph.clear();
    }
}
