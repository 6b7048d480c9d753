//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `corral-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by generator steps, implemented by infrastructure
//!   - `Overlay`: file operations and external commands against one target root
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by `NewAppService`)

pub mod output;

pub use output::{CommandOutput, CommandSpec, Overlay, RunMode};
