//! Patchbay Library
//!
//! Core library for a rack-style modular synthesizer editor: the patch
//! graph, the interactive cabling state machine, rack placement, and
//! patch persistence. Rendering and audio are external collaborators.

pub mod app;
pub mod controller;
pub mod graph;
pub mod layout;
pub mod modules;
pub mod params;
pub mod persistence;
pub mod scene;
