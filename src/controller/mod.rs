//! Controller module
//!
//! The interactive cabling state machine: pointer press/move/release
//! sequences become wire creation, rerouting, and deletion on the patch
//! graph.

pub mod connection;

pub use connection::{ConnectionController, DragState, TransientWire, WirePalette, WIRE_COLORS};
