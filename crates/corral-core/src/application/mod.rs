//! Application layer for Corral.
//!
//! This layer contains:
//! - **Engine**: the step trait, run context and fail-fast runner
//! - **Generators**: built-in steps and the assembler that orders them
//! - **Services**: use case orchestration (NewAppService)
//! - **Ports**: interface definitions (traits) for external dependencies
//! - **Errors**: application-specific error types
//!
//! Configuration rules live in `crate::domain`; this layer only sequences work.

pub mod engine;
pub mod error;
pub mod generators;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

pub use engine::{
    CancellationToken, PipelineReport, Plan, RunContext, Runner, Step, StepFailure, StepOutcome,
};
pub use generators::assemble;
pub use services::{GenerateOptions, NewAppService};

// Re-export port types (for adapter implementation)
pub use ports::{CommandOutput, CommandSpec, Overlay, RunMode};

pub use error::ApplicationError;
