//! Implementation of the `corral new` command.
//!
//! Responsibility: translate CLI arguments and configured defaults into a
//! [`NewAppConfig`], guard the target directory, run the generator and
//! display the report. No generation logic lives here.

use std::path::Path;

use tracing::{debug, info, instrument, warn};

use corral_adapters::{LocalOverlay, RecordingOverlay};
use corral_core::{
    application::{CancellationToken, GenerateOptions, NewAppService},
    domain::NewAppConfig,
};

use crate::{
    cli::{NewArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `corral new` command.
///
/// Dispatch sequence:
/// 1. Build and validate the configuration (nothing on disk is touched yet)
/// 2. Refuse an occupied target unless `--force`; skipped for `--dry-run`
/// 3. Dry-run, then wet-run unless `--dry-run`
/// 4. Print the report and next steps
#[instrument(skip_all, fields(app = args.name.as_deref().unwrap_or("")))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let app = build_config(&args, &global, &config)?;
    let root = std::env::current_dir()
        .with_cli_context(|| "Failed to read the current directory")?
        .join(app.name().as_str());

    debug!(
        root = %root.display(),
        database = app.database().map(|d| d.as_str()).unwrap_or("none"),
        vcs = %app.vcs(),
        with_dep = app.with_dep(),
        "Configuration resolved"
    );

    let local = LocalOverlay::new(&root);
    if !args.dry_run {
        prepare_target(&local, &root, args.force, &output)?;
    }

    let options = GenerateOptions {
        preview: args.dry_run,
        cancel: install_interrupt_handler(),
        command_timeout: config.command_timeout(),
        ..GenerateOptions::default()
    };
    let service = NewAppService::new(Box::new(RecordingOverlay::new(&root)), Box::new(local));

    if args.dry_run {
        output.header(&format!("Dry run: '{}' would be generated", app.name()))?;
    } else {
        output.header(&format!("Generating '{}'...", app.name()))?;
    }
    info!(app = %app.name(), path = %root.display(), "Generation started");

    let report = service.generate(&app, &options)?;
    output.report(&report, &root)?;

    if args.dry_run {
        output.info("Dry run complete; nothing was written")?;
        return Ok(());
    }

    info!(app = %app.name(), elapsed = ?report.elapsed(), "Generation completed");
    output.success(&format!("Application '{}' generated!", app.name()))?;

    if !global.quiet && !output.is_json() {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", app.name()))?;
        if app.database().is_some() {
            output.print("  buffalo db create -a")?;
        }
        output.print("  buffalo dev")?;
    }

    Ok(())
}

/// Merge flags over configured defaults and validate.
fn build_config(
    args: &NewArgs,
    global: &GlobalArgs,
    config: &AppConfig,
) -> CliResult<NewAppConfig> {
    let defaults = &config.defaults;
    let pick = |flag: &Option<String>, default: &str| {
        flag.clone().unwrap_or_else(|| default.to_owned())
    };

    let app = NewAppConfig::builder(args.name.clone().unwrap_or_default())
        .db_type(pick(&args.db_type, &defaults.db_type))
        .vcs(pick(&args.vcs, &defaults.vcs))
        .docker(pick(&args.docker, &defaults.docker))
        .ci_provider(pick(&args.ci_provider, &defaults.ci_provider))
        .api(args.api)
        .skip_database(args.skip_pop)
        .skip_assets(args.skip_webpack)
        .with_dep(args.with_dep)
        .verbose(global.verbose > 0)
        .toolchain(config.toolchain())
        .build()
        .map_err(|e| CliError::Core(e.into()))?;
    Ok(app)
}

/// Existing non-empty targets are refused; `--force` clears them first.
fn prepare_target(
    local: &LocalOverlay,
    root: &Path,
    force: bool,
    output: &OutputManager,
) -> CliResult<()> {
    if !local.root_is_occupied()? {
        return Ok(());
    }
    if !force {
        return Err(CliError::ProjectExists { path: root.to_path_buf() });
    }
    warn!(path = %root.display(), "Removing existing directory (--force)");
    output.warning(&format!("Replacing existing directory {}", root.display()))?;
    local.clear_root()?;
    Ok(())
}

/// Ctrl-C stops the run at the next step or command boundary.
fn install_interrupt_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let handle = token.clone();
    if let Err(e) = ctrlc::set_handler(move || handle.cancel()) {
        warn!("Could not install Ctrl-C handler: {e}");
    }
    token
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use corral_core::domain::{Dialect, DockerKind, VcsKind};

    fn global() -> GlobalArgs {
        GlobalArgs {
            verbose: 0,
            quiet: true,
            no_color: true,
            config: None,
            output_format: OutputFormat::Plain,
        }
    }

    fn args(name: Option<&str>) -> NewArgs {
        NewArgs {
            name: name.map(str::to_owned),
            db_type: None,
            vcs: None,
            docker: None,
            ci_provider: None,
            api: false,
            skip_pop: false,
            skip_webpack: false,
            with_dep: false,
            force: false,
            dry_run: false,
        }
    }

    #[test]
    fn configured_defaults_apply_when_flags_are_absent() {
        let mut config = AppConfig::default();
        config.defaults.db_type = "mysql".into();
        config.defaults.docker = "standard".into();

        let app = build_config(&args(Some("coke")), &global(), &config).unwrap();
        assert_eq!(app.database(), Some(Dialect::MySql));
        assert_eq!(app.docker(), DockerKind::Standard);
        assert_eq!(app.vcs(), VcsKind::Git);
    }

    #[test]
    fn flags_override_configured_defaults() {
        let mut config = AppConfig::default();
        config.defaults.vcs = "bzr".into();
        let mut a = args(Some("coke"));
        a.vcs = Some("none".into());

        let app = build_config(&a, &global(), &config).unwrap();
        assert_eq!(app.vcs(), VcsKind::None);
    }

    #[test]
    fn missing_name_is_a_user_error() {
        let err = build_config(&args(None), &global(), &AppConfig::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "you must enter a name for your new application"
        );
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn occupied_target_without_force_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("coke");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("keep.txt"), "x").unwrap();
        let output = OutputManager::new(&global(), &AppConfig::default());

        let err = prepare_target(&LocalOverlay::new(&root), &root, false, &output).unwrap_err();
        assert!(matches!(err, CliError::ProjectExists { .. }));
        assert!(root.join("keep.txt").exists());

        prepare_target(&LocalOverlay::new(&root), &root, true, &output).unwrap();
        assert!(!root.join("keep.txt").exists());
    }
}
