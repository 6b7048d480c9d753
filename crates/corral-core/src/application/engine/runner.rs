//! Sequential, fail-fast pipeline execution.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use crate::application::{
    ApplicationError,
    engine::{
        context::{CancellationToken, DEFAULT_COMMAND_TIMEOUT, RunContext},
        step::{Plan, Step},
    },
    ports::{Overlay, RunMode},
};
use crate::domain::RelativePath;
use crate::error::{CorralError, CorralResult};

/// What one successful step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub name: &'static str,
    pub artifacts: Vec<RelativePath>,
    pub commands: Vec<String>,
    pub elapsed: Duration,
}

/// The first step that failed, with its error unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub step: &'static str,
    pub error: CorralError,
}

/// Ordered aggregation of step results for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub mode: RunMode,
    pub outcomes: Vec<StepOutcome>,
    pub failure: Option<StepFailure>,
}

impl PipelineReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Names of the steps that completed, in execution order.
    pub fn completed(&self) -> Vec<&'static str> {
        self.outcomes.iter().map(|o| o.name).collect()
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &RelativePath> {
        self.outcomes.iter().flat_map(|o| o.artifacts.iter())
    }

    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .flat_map(|o| o.commands.iter().map(String::as_str))
    }

    pub fn elapsed(&self) -> Duration {
        self.outcomes.iter().map(|o| o.elapsed).sum()
    }

    /// `Ok(self)` on success, otherwise `StepFailed` naming the step.
    pub fn into_result(self) -> CorralResult<Self> {
        match self.failure {
            None => Ok(self),
            Some(StepFailure { step, error }) => Err(CorralError::StepFailed {
                step: step.to_string(),
                cause: Box::new(error),
            }),
        }
    }
}

/// Executes a [`Plan`] against one overlay.
///
/// Steps run strictly in order. The first failure stops the run; nothing is
/// rolled back. After each step, every artifact it recorded must exist.
#[derive(Debug, Clone)]
pub struct Runner {
    cancel: CancellationToken,
    command_timeout: Duration,
    verbose: bool,
    env: BTreeMap<String, String>,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            cancel: CancellationToken::new(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            verbose: false,
            env: BTreeMap::new(),
        }
    }
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Environment every command in the run starts from.
    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    #[instrument(skip_all, fields(mode = %overlay.mode(), steps = plan.len()))]
    pub fn run(&self, plan: &Plan, overlay: &dyn Overlay) -> PipelineReport {
        let mut ctx = RunContext::new(overlay)
            .with_cancellation(self.cancel.clone())
            .with_command_timeout(self.command_timeout)
            .with_verbose(self.verbose)
            .with_env(self.env.clone());

        let mut report = PipelineReport {
            mode: overlay.mode(),
            outcomes: Vec::with_capacity(plan.len()),
            failure: None,
        };

        for step in plan.iter() {
            match Self::run_step(step, &mut ctx) {
                Ok(outcome) => {
                    info!(
                        step = outcome.name,
                        artifacts = outcome.artifacts.len(),
                        elapsed_ms = outcome.elapsed.as_millis() as u64,
                        "step complete"
                    );
                    report.outcomes.push(outcome);
                }
                Err(error) => {
                    warn!(step = step.name(), %error, "step failed, stopping pipeline");
                    report.failure = Some(StepFailure {
                        step: step.name(),
                        error,
                    });
                    break;
                }
            }
        }

        report
    }

    fn run_step(step: &dyn Step, ctx: &mut RunContext<'_>) -> CorralResult<StepOutcome> {
        ctx.cancellation().check()?;
        ctx.begin_step();

        let started = Instant::now();
        let result = step.run(ctx);
        let record = ctx.finish_step();
        result?;

        for artifact in &record.artifacts {
            if !ctx.overlay().exists(artifact.as_path())? {
                return Err(ApplicationError::MissingArtifact {
                    path: artifact.clone().into_path_buf(),
                }
                .into());
            }
        }

        Ok(StepOutcome {
            name: step.name(),
            artifacts: record.artifacts,
            commands: record.commands,
            elapsed: started.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::application::test_support::FakeOverlay;

    struct WriteFile(&'static str, &'static str);

    impl Step for WriteFile {
        fn name(&self) -> &'static str {
            self.0
        }
        fn description(&self) -> String {
            format!("write {}", self.1)
        }
        fn run(&self, ctx: &mut RunContext<'_>) -> CorralResult<()> {
            ctx.write(self.1, "content")?;
            Ok(())
        }
    }

    struct Fails;

    impl Step for Fails {
        fn name(&self) -> &'static str {
            "fails"
        }
        fn description(&self) -> String {
            "always fails".into()
        }
        fn run(&self, _ctx: &mut RunContext<'_>) -> CorralResult<()> {
            Err(ApplicationError::EmptyWorkingTree.into())
        }
    }

    /// Declares an output its command never creates.
    struct Liar;

    impl Step for Liar {
        fn name(&self) -> &'static str {
            "liar"
        }
        fn description(&self) -> String {
            "claims a file".into()
        }
        fn run(&self, ctx: &mut RunContext<'_>) -> CorralResult<()> {
            let cmd = ctx
                .command("true")
                .produces(RelativePath::try_new("Gopkg.lock")?);
            ctx.run(cmd)?;
            Ok(())
        }
    }

    struct Counting<'a>(&'a Mutex<u32>);

    impl Step for Counting<'static> {
        fn name(&self) -> &'static str {
            "counting"
        }
        fn description(&self) -> String {
            String::new()
        }
        fn run(&self, _ctx: &mut RunContext<'_>) -> CorralResult<()> {
            *self.0.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn plan(steps: Vec<Box<dyn Step>>) -> Plan {
        steps.into_iter().collect()
    }

    #[test]
    fn runs_every_step_in_order() {
        let overlay = FakeOverlay::new();
        let report = Runner::new().run(
            &plan(vec![
                Box::new(WriteFile("a", "a.txt")),
                Box::new(WriteFile("b", "b.txt")),
            ]),
            &overlay,
        );
        assert!(report.is_success());
        assert_eq!(report.completed(), vec!["a", "b"]);
        assert_eq!(report.artifacts().count(), 2);
    }

    #[test]
    fn stops_at_first_failure_without_rollback() {
        static CALLS: Mutex<u32> = Mutex::new(0);
        let overlay = FakeOverlay::new();
        let report = Runner::new().run(
            &plan(vec![
                Box::new(WriteFile("a", "a.txt")),
                Box::new(Fails),
                Box::new(Counting(&CALLS)),
            ]),
            &overlay,
        );

        assert_eq!(report.completed(), vec!["a"]);
        assert_eq!(report.failure.as_ref().map(|f| f.step), Some("fails"));
        assert_eq!(*CALLS.lock().unwrap(), 0);
        assert!(overlay.files().contains_key(std::path::Path::new("a.txt")));
    }

    #[test]
    fn failure_converts_to_step_failed() {
        let overlay = FakeOverlay::new();
        let err = Runner::new()
            .run(&plan(vec![Box::new(Fails)]), &overlay)
            .into_result()
            .unwrap_err();
        assert_eq!(err.step(), Some("fails"));
        assert_eq!(
            err.root_cause(),
            &CorralError::Application(ApplicationError::EmptyWorkingTree)
        );
    }

    #[test]
    fn missing_declared_artifact_fails_the_step() {
        let overlay = FakeOverlay::new();
        let report = Runner::new().run(&plan(vec![Box::new(Liar)]), &overlay);
        let failure = report.failure.unwrap();
        assert_eq!(failure.step, "liar");
        assert!(matches!(
            failure.error,
            CorralError::Application(ApplicationError::MissingArtifact { .. })
        ));
    }

    #[test]
    fn cancelled_before_start_runs_nothing() {
        let overlay = FakeOverlay::new();
        let token = CancellationToken::new();
        token.cancel();
        let report = Runner::new()
            .with_cancellation(token)
            .run(&plan(vec![Box::new(WriteFile("a", "a.txt"))]), &overlay);
        assert!(report.outcomes.is_empty());
        assert_eq!(
            report.failure.map(|f| f.error),
            Some(CorralError::Application(ApplicationError::Cancelled))
        );
        assert!(overlay.files().is_empty());
    }
}
