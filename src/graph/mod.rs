//! Graph module
//!
//! The patch graph data model: module type descriptors, the registry,
//! placed module instances, and the committed wires between them.

pub mod descriptor;
pub mod module;
pub mod patch_graph;
pub mod registry;

pub use descriptor::{
    ModuleCategory, ModuleDescriptor, ParameterDefinition, ParameterDisplay, PortDirection,
};
pub use module::{Module, PortRef};
pub use patch_graph::{GraphError, PatchGraph, Wire};
pub use registry::ModuleRegistry;

/// Unique identifier for a module instance in the patch graph.
///
/// Identifiers are process-local: a patch document stores them only to
/// tie wire entries to module entries, and loading assigns fresh ones.
pub type ModuleId = u64;

/// Unique identifier for a committed wire. Monotonic, never reused.
pub type WireId = u64;

/// Local index of a port within a module, per direction.
pub type PortId = usize;
