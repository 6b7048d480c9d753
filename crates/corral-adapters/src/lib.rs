//! Infrastructure adapters for Corral.
//!
//! This crate implements the ports defined in `corral-core::application::ports`.
//! It contains all filesystem and process I/O.

pub mod naming;
pub mod overlay;
pub mod process;

// Re-export commonly used adapters
pub use naming::{NameGenerator, SequentialNames, UuidNames};
pub use overlay::{LocalOverlay, Operation, RecordingOverlay};
