//! Persistence module
//!
//! Patch save/load functionality using serde and JSON.

pub mod patch;

pub use patch::{
    color_from_hex, color_to_hex, from_document, load_from_file, load_from_str, save_to_file,
    to_document, LoadWarning, ModuleEntry, PatchDocument, PatchError, WireEntry,
};
