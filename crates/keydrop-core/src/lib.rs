#![forbid(unsafe_code)]

//! Core: geometry primitives, canonical key events, and logging shims.

pub mod config;
pub mod event;
pub mod geometry;
pub mod logging;

// Re-export tracing macros at crate root so call sites read the same with
// and without the `tracing` feature.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, trace_span};
