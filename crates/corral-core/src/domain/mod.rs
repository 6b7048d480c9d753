// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Corral.
//!
//! This module contains pure configuration logic with no I/O. Filesystem and
//! process concerns are handled via ports defined in the application layer.
//!
//! - **No async**: domain logic is synchronous
//! - **No I/O**: no filesystem, network, or process calls
//! - **Immutable values**: configuration is validated once and never mutated
pub mod entities;
pub mod error;
pub mod value_objects;

mod validation;

pub use entities::{
    AppName, FORBIDDEN_NAMES, NewAppConfig, NewAppConfigBuilder, PathEscapeError, RelativePath,
    RenderContext, Toolchain,
};

pub use error::DomainError;

pub use value_objects::{CiProvider, Dialect, DockerKind, VcsKind};

pub use validation::DomainValidator;
