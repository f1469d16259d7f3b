#![forbid(unsafe_code)]

//! Core: geometry, layer model, placement engine, colors, and animation curves
//! for anchored popovers.

pub mod animation;
pub mod color;
pub mod geometry;
pub mod layer;
pub mod logging;
pub mod placement;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace, trace_span, warn};
