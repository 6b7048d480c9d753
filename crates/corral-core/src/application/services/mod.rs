//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer, the step engine and the overlay
//! port to accomplish "generate a new application".

pub mod new_app_service;

pub use new_app_service::{GenerateOptions, NewAppService};
