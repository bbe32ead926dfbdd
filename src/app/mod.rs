//! Application module
//!
//! The explicit application context that ties the subsystems together
//! and routes canvas events into them.

pub mod context;

pub use context::RackContext;
