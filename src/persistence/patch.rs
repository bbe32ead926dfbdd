//! Patch serialization for save/load functionality.
//!
//! This module defines the data structures for serializing patches to
//! JSON files. A patch captures the complete state of the rack: every
//! module with its position, parameter values, and opaque engine state,
//! plus every committed wire with its cable color.
//!
//! Loading is two-phase. The document must first parse structurally
//! (both top-level arrays present); nothing is built until it does.
//! After that, recovery is per entry: a wire referencing a missing
//! module, an out-of-range port, an unknown module type, or a
//! conflicting position drops that entry with a warning rather than
//! failing the whole patch.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::controller::WIRE_COLORS;
use crate::graph::{ModuleId, ModuleRegistry, PatchGraph, PortRef};
use crate::layout::RackPos;

/// A complete persisted patch.
///
/// Array order is meaningful and preserved: modules and wires are written
/// in graph insertion order and rebuilt in document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchDocument {
    /// All modules in the patch.
    pub modules: Vec<ModuleEntry>,
    /// All wires between module ports.
    pub wires: Vec<WireEntry>,
}

/// Serialized data for a single module in the patch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleEntry {
    /// Document-local identifier, used by wire entries.
    ///
    /// This is not a runtime id; loading assigns fresh runtime
    /// identifiers and serializing renumbers from 1 in graph order.
    pub id: u64,
    /// Identifier of the plugin providing the module type.
    #[serde(rename = "pluginId")]
    pub plugin_id: String,
    /// Identifier of the module type within its plugin.
    #[serde(rename = "moduleId")]
    pub module_id: String,
    /// Horizontal position on the rack canvas, in pixels.
    pub x: i32,
    /// Vertical position on the rack canvas, in pixels.
    pub y: i32,
    /// Parameter values in descriptor order.
    pub params: Vec<f32>,
    /// Opaque engine state supplied by the module itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Serialized data for a wire between two module ports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireEntry {
    /// Document id of the source module.
    #[serde(rename = "outputModuleId")]
    pub output_module_id: u64,
    /// Output port id on the source module.
    #[serde(rename = "outputId")]
    pub output_id: usize,
    /// Document id of the destination module.
    #[serde(rename = "inputModuleId")]
    pub input_module_id: u64,
    /// Input port id on the destination module.
    #[serde(rename = "inputId")]
    pub input_id: usize,
    /// Cable color as "#RRGGBB".
    pub color: String,
}

/// Error type for patch load/save operations.
///
/// Only structural problems surface here; recoverable per-entry problems
/// become [`LoadWarning`]s instead.
#[derive(Debug)]
pub enum PatchError {
    /// File I/O error.
    Io(std::io::Error),
    /// The document is not structurally valid JSON for a patch.
    SchemaInvalid(serde_json::Error),
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchError::Io(e) => write!(f, "File error: {}", e),
            PatchError::SchemaInvalid(e) => write!(f, "Invalid patch document: {}", e),
        }
    }
}

impl std::error::Error for PatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PatchError::Io(e) => Some(e),
            PatchError::SchemaInvalid(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for PatchError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for PatchError {
    fn from(err: serde_json::Error) -> Self {
        Self::SchemaInvalid(err)
    }
}

/// A recoverable problem found while rebuilding a graph from a document.
///
/// The offending entry is dropped (or patched up, for colors); loading
/// continues with everything else.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadWarning {
    /// A module entry names a type that is not in the registry.
    UnknownModuleType {
        index: usize,
        plugin_id: String,
        module_id: String,
    },
    /// A module entry's position overlaps an already-loaded module.
    PlacementConflict { index: usize, id: u64 },
    /// A wire entry references a missing module or an out-of-range port.
    DanglingWire { index: usize },
    /// A wire entry's color string did not parse; a default was used.
    InvalidWireColor { index: usize },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::UnknownModuleType {
                index,
                plugin_id,
                module_id,
            } => write!(
                f,
                "Module entry {} has unknown type '{}/{}'",
                index, plugin_id, module_id
            ),
            LoadWarning::PlacementConflict { index, id } => write!(
                f,
                "Module entry {} (id {}) overlaps another module",
                index, id
            ),
            LoadWarning::DanglingWire { index } => write!(
                f,
                "Wire entry {} references a missing module or port",
                index
            ),
            LoadWarning::InvalidWireColor { index } => {
                write!(f, "Wire entry {} has an unparsable color", index)
            }
        }
    }
}

/// Formats a color as "#RRGGBB".
pub fn color_to_hex(color: Color32) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r(), color.g(), color.b())
}

/// Parses a "#RRGGBB" color string.
pub fn color_from_hex(hex: &str) -> Option<Color32> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    Some(Color32::from_rgb(
        (value >> 16) as u8,
        (value >> 8) as u8,
        value as u8,
    ))
}

/// Converts a patch graph into a document.
///
/// Modules are renumbered 1..n in insertion order so that an unchanged
/// patch serializes identically no matter what runtime ids the graph
/// happened to assign.
pub fn to_document(graph: &PatchGraph) -> PatchDocument {
    let mut doc_ids: HashMap<ModuleId, u64> = HashMap::new();

    let modules = graph
        .modules_in_order()
        .enumerate()
        .map(|(index, module)| {
            let doc_id = index as u64 + 1;
            doc_ids.insert(module.id(), doc_id);
            let descriptor = module.descriptor();
            let position = module.position();
            ModuleEntry {
                id: doc_id,
                plugin_id: descriptor.plugin_id.to_string(),
                module_id: descriptor.module_id.to_string(),
                x: position.x,
                y: position.y,
                params: module.params().to_vec(),
                data: module.data().cloned(),
            }
        })
        .collect();

    let wires = graph
        .wires_in_order()
        .filter_map(|wire| {
            Some(WireEntry {
                output_module_id: *doc_ids.get(&wire.output_module)?,
                output_id: wire.output_port,
                input_module_id: *doc_ids.get(&wire.input_module)?,
                input_id: wire.input_port,
                color: color_to_hex(wire.color),
            })
        })
        .collect();

    PatchDocument { modules, wires }
}

/// Rebuilds a patch graph from a document.
///
/// Modules are created first with fresh runtime identifiers, then wires
/// are resolved against them. Unrecoverable entries are dropped with a
/// warning; the rest of the patch loads normally.
pub fn from_document(
    doc: &PatchDocument,
    registry: &ModuleRegistry,
) -> (PatchGraph, Vec<LoadWarning>) {
    let mut graph = PatchGraph::new();
    let mut warnings = Vec::new();
    let mut runtime_ids: HashMap<u64, ModuleId> = HashMap::new();

    for (index, entry) in doc.modules.iter().enumerate() {
        let Some(descriptor) = registry.lookup(&entry.plugin_id, &entry.module_id) else {
            let warning = LoadWarning::UnknownModuleType {
                index,
                plugin_id: entry.plugin_id.clone(),
                module_id: entry.module_id.clone(),
            };
            log::warn!("{}", warning);
            warnings.push(warning);
            continue;
        };

        match graph.add_module(descriptor, RackPos::new(entry.x, entry.y)) {
            Ok(id) => {
                if let Some(module) = graph.module_mut(id) {
                    module.restore_params(&entry.params);
                    module.set_data(entry.data.clone());
                }
                runtime_ids.insert(entry.id, id);
            }
            Err(_) => {
                let warning = LoadWarning::PlacementConflict {
                    index,
                    id: entry.id,
                };
                log::warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }

    for (index, entry) in doc.wires.iter().enumerate() {
        let endpoints = runtime_ids
            .get(&entry.output_module_id)
            .zip(runtime_ids.get(&entry.input_module_id));
        let Some((&output_module, &input_module)) = endpoints else {
            let warning = LoadWarning::DanglingWire { index };
            log::warn!("{}", warning);
            warnings.push(warning);
            continue;
        };

        let color = match color_from_hex(&entry.color) {
            Some(color) => color,
            None => {
                let warning = LoadWarning::InvalidWireColor { index };
                log::warn!("{}", warning);
                warnings.push(warning);
                WIRE_COLORS[0]
            }
        };

        let connected = graph.connect(
            PortRef::output(output_module, entry.output_id),
            PortRef::input(input_module, entry.input_id),
            color,
        );
        if connected.is_err() {
            let warning = LoadWarning::DanglingWire { index };
            log::warn!("{}", warning);
            warnings.push(warning);
        }
    }

    (graph, warnings)
}

/// Parses a patch document from a JSON string.
///
/// This is the structural gate: a failure here means nothing was built.
pub fn load_from_str(json: &str) -> Result<PatchDocument, PatchError> {
    Ok(serde_json::from_str(json)?)
}

/// Saves a patch document to a JSON file.
pub fn save_to_file(doc: &PatchDocument, path: &Path) -> Result<(), PatchError> {
    let json = serde_json::to_string_pretty(doc)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Loads a patch document from a JSON file.
pub fn load_from_file(path: &Path) -> Result<PatchDocument, PatchError> {
    let json = std::fs::read_to_string(path)?;
    load_from_str(&json)
}
