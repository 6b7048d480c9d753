//! Step engine: the [`Step`] trait, the [`RunContext`] threaded through a
//! run, and the fail-fast [`Runner`].

pub mod context;
pub mod runner;
pub mod step;

pub use context::{CancellationToken, DEFAULT_COMMAND_TIMEOUT, RunContext};
pub use runner::{PipelineReport, Runner, StepFailure, StepOutcome};
pub use step::{Plan, Step};
