//! Corral Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Corral
//! application generator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           corral-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (NewAppService, Runner, assemble)     │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │        (Driven: Overlay)                │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     corral-adapters (Infrastructure)    │
//! │   (RecordingOverlay, LocalOverlay)      │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │   (NewAppConfig, AppName, Dialect)      │
//! │        No External Dependencies         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use corral_core::prelude::*;
//!
//! // 1. Validate configuration
//! let config = NewAppConfig::builder("coke").db_type("sqlite3").build()?;
//!
//! // 2. Use application service (with injected overlays)
//! let service = NewAppService::new(dry_overlay, wet_overlay);
//! let report = service.generate(&config, &GenerateOptions::default())?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, CancellationToken, CommandOutput, CommandSpec, GenerateOptions,
        NewAppService, Overlay, PipelineReport, Plan, RunContext, RunMode, Runner, Step,
        StepFailure, StepOutcome, assemble,
        generators::{CreateRoot, DependencyVendoring, FileSet, ValidateName, VcsInit},
    };
    pub use crate::domain::{
        AppName, CiProvider, Dialect, DockerKind, DomainError, NewAppConfig, RelativePath,
        Toolchain, VcsKind,
    };
    pub use crate::error::{CorralError, CorralResult, ErrorCategory};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
