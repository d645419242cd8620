#![forbid(unsafe_code)]

//! Core: flow-band geometry and diagnostics shared by the diagram crates.

pub mod geometry;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, trace, warn};
