//! Output management and formatting.

use std::io::{self, IsTerminal};
use std::path::Path;

use console::Term;
use owo_colors::OwoColorize;
use serde_json::json;

use corral_core::application::{PipelineReport, RunMode};

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // Resolve Auto → Human (TTY) or Plain (piped/redirected).
        let resolved_format = if args.output_format == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            args.output_format
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color || config.output.no_color,
            term: Term::stdout(),
        }
    }
    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.is_silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.is_silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.is_silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.is_silent() {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Print what a pipeline run did.
    ///
    /// JSON goes to stdout even in quiet mode so scripts can always parse it.
    pub fn report(&self, report: &PipelineReport, root: &Path) -> io::Result<()> {
        if self.resolved_format == OutputFormat::Json {
            return self.term.write_line(&report_json(report, root).to_string());
        }
        if self.quiet {
            return Ok(());
        }

        let status = match report.mode {
            RunMode::Dry => "planned",
            RunMode::Wet => "done",
        };
        for outcome in &report.outcomes {
            self.print(&format!("  {:<22} {status}", outcome.name))?;
            for command in &outcome.commands {
                let line = format!("      $ {command}");
                if self.no_color {
                    self.print(&line)?;
                } else {
                    self.print(&line.dimmed().to_string())?;
                }
            }
        }

        let files: Vec<_> = report.artifacts().filter(|a| !a.is_root()).collect();
        if report.mode == RunMode::Dry && !files.is_empty() {
            self.print("")?;
            self.header(&format!("Would create under {}:", root.display()))?;
            for artifact in files {
                self.print(&format!("  {artifact}"))?;
            }
        }
        Ok(())
    }

    /// Decorated status lines are dropped in quiet mode and for JSON output.
    fn is_silent(&self) -> bool {
        self.quiet || self.resolved_format == OutputFormat::Json
    }

    pub fn is_json(&self) -> bool {
        self.resolved_format == OutputFormat::Json
    }
}

fn report_json(report: &PipelineReport, root: &Path) -> serde_json::Value {
    json!({
        "mode": report.mode.as_str(),
        "root": root.display().to_string(),
        "success": report.is_success(),
        "elapsed_ms": report.elapsed().as_millis() as u64,
        "steps": report.outcomes.iter().map(|o| json!({
            "name": o.name,
            "artifacts": o.artifacts.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "commands": o.commands,
        })).collect::<Vec<_>>(),
        "failure": report.failure.as_ref().map(|f| json!({
            "step": f.step,
            "error": f.error.to_string(),
        })),
    })
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use corral_core::application::{StepFailure, StepOutcome};
    use corral_core::domain::RelativePath;
    use corral_core::error::CorralError;

    use super::*;

    fn make_manager(quiet: bool, no_color: bool, output_format: OutputFormat) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet,
            no_color,
            config: None,
            output_format,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    fn sample_report() -> PipelineReport {
        PipelineReport {
            mode: RunMode::Dry,
            outcomes: vec![StepOutcome {
                name: "core-files",
                artifacts: vec![RelativePath::try_new("main.go").unwrap()],
                commands: vec![],
                elapsed: Duration::from_millis(3),
            }],
            failure: Some(StepFailure {
                step: "vcs-init",
                error: CorralError::Internal {
                    message: "boom".into(),
                },
            }),
        }
    }

    #[test]
    fn quiet_suppresses_print() {
        let out = make_manager(true, true, OutputFormat::Plain);
        assert!(out.print("hello").is_ok());
        assert!(out.report(&sample_report(), Path::new("/tmp/coke")).is_ok());
    }

    #[test]
    fn color_is_off_by_flag_or_config() {
        assert!(!make_manager(false, false, OutputFormat::Plain).no_color);
        assert!(make_manager(false, true, OutputFormat::Plain).no_color);

        let mut config = AppConfig::default();
        config.output.no_color = true;
        let args = GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: false,
            config: None,
            output_format: OutputFormat::Plain,
        };
        assert!(OutputManager::new(&args, &config).no_color);
    }

    #[test]
    fn explicit_json_format_is_kept() {
        assert!(make_manager(false, false, OutputFormat::Json).is_json());
        assert!(!make_manager(false, false, OutputFormat::Human).is_json());
    }

    #[test]
    fn json_report_lists_steps_and_failure() {
        let value = report_json(&sample_report(), Path::new("/tmp/coke"));
        assert_eq!(value["mode"], "dry");
        assert_eq!(value["success"], false);
        assert_eq!(value["steps"][0]["name"], "core-files");
        assert_eq!(value["steps"][0]["artifacts"][0], "main.go");
        assert_eq!(value["failure"]["step"], "vcs-init");
    }
}
