//! New-application service - main application orchestrator.
//!
//! This service coordinates the entire `new` workflow:
//! 1. Assemble the plan from the validated configuration
//! 2. Dry-run it against the recording overlay
//! 3. Wet-run it against the real overlay, unless only a preview was asked for
//!
//! It implements the driving port (incoming) and uses the overlay port (outgoing).

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{info, instrument};

use crate::{
    application::{
        engine::{CancellationToken, DEFAULT_COMMAND_TIMEOUT, PipelineReport, Plan, Runner},
        generators::assemble,
        ports::Overlay,
    },
    domain::NewAppConfig,
    error::CorralResult,
};

/// Per-invocation knobs that are not part of the application configuration.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Stop after the dry run and return its report.
    pub preview: bool,
    pub cancel: CancellationToken,
    pub command_timeout: Duration,
    /// Base environment for external commands.
    pub env: BTreeMap<String, String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            preview: false,
            cancel: CancellationToken::new(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            env: BTreeMap::new(),
        }
    }
}

/// Application generation service.
///
/// Holds one overlay per mode, both rooted at the same target directory.
pub struct NewAppService {
    dry: Box<dyn Overlay>,
    wet: Box<dyn Overlay>,
}

impl NewAppService {
    /// Create a new service with the given overlays.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use corral_adapters::{LocalOverlay, RecordingOverlay};
    /// use corral_core::application::NewAppService;
    ///
    /// let service = NewAppService::new(
    ///     Box::new(RecordingOverlay::new("./coke")),
    ///     Box::new(LocalOverlay::new("./coke")),
    /// );
    /// ```
    pub fn new(dry: Box<dyn Overlay>, wet: Box<dyn Overlay>) -> Self {
        Self { dry, wet }
    }

    /// The plan `generate` would execute.
    pub fn plan(&self, config: &NewAppConfig) -> CorralResult<Plan> {
        Ok(assemble(config)?)
    }

    /// Generate an application.
    ///
    /// Configuration errors surface before anything runs. The dry run always
    /// precedes the wet run, so a plan that fails in simulation never
    /// touches disk.
    #[instrument(
        skip_all,
        fields(
            app = %config.name(),
            root = %self.wet.root().display(),
            preview = options.preview
        )
    )]
    pub fn generate(
        &self,
        config: &NewAppConfig,
        options: &GenerateOptions,
    ) -> CorralResult<PipelineReport> {
        let plan = self.plan(config)?;
        info!(steps = plan.len(), "Generating application");

        let runner = Runner::new()
            .with_cancellation(options.cancel.clone())
            .with_command_timeout(options.command_timeout)
            .with_verbose(config.verbose())
            .with_env(options.env.clone());

        let dry = runner.run(&plan, self.dry.as_ref()).into_result()?;
        info!(artifacts = dry.artifacts().count(), "Dry run succeeded");

        if options.preview {
            return Ok(dry);
        }

        let wet = runner.run(&plan, self.wet.as_ref()).into_result()?;
        info!(
            elapsed_ms = wet.elapsed().as_millis() as u64,
            "Application generated successfully"
        );
        Ok(wet)
    }
}
