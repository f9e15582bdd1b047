//! Shared utilities for scopekit
//!
//! Small helpers used by the cleanup crates: tracing setup and structured
//! events for cleanup passes, and rendering of caught panic payloads.

pub mod panic;
pub mod tracing;

pub use panic::*;
