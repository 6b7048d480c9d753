use tracing::{debug, instrument};

use crate::application::{
    engine::Plan,
    generators::{
        steps::{
            ASSET_PIPELINE, CI, CORE_FILES, CreateRoot, DATABASE_CONFIG, DOCKER,
            DependencyVendoring, FileSet, VcsInit, ValidateName, WEB_VIEWS,
        },
        templates,
    },
};
use crate::domain::{
    CiProvider, DockerKind, DomainError, DomainValidator, NewAppConfig, RenderContext,
};

/// Build the ordered step list for a configuration.
///
/// Pure: nothing is touched. Structural steps come first, external commands
/// last, and version control after everything that writes files.
#[instrument(skip_all, fields(app = %config.name()))]
pub fn assemble(config: &NewAppConfig) -> Result<Plan, DomainError> {
    DomainValidator::validate_config(config)?;

    let ctx = RenderContext::new(config.name());
    let mut plan = Plan::new();

    plan.push(ValidateName::new(config.name().as_str()));
    plan.push(CreateRoot);
    plan.push(FileSet::new(
        CORE_FILES,
        "application entry point and actions",
        templates::core_files(config, &ctx),
    ));

    if !config.api() {
        plan.push(FileSet::new(WEB_VIEWS, "HTML views", templates::web_views(&ctx)));
    }

    if !config.skip_assets() {
        plan.push(FileSet::new(
            ASSET_PIPELINE,
            "webpack asset pipeline",
            templates::asset_pipeline(&ctx),
        ));
    }

    if let Some(dialect) = config.database() {
        plan.push(FileSet::new(
            DATABASE_CONFIG,
            "database configuration",
            templates::database_config(dialect, &ctx),
        ));
    }

    if config.docker() != DockerKind::None {
        plan.push(FileSet::new(
            DOCKER,
            "Dockerfile",
            templates::docker(config.docker(), &ctx),
        ));
    }

    if config.ci() != CiProvider::None {
        plan.push(FileSet::new(CI, "CI configuration", templates::ci(config.ci())));
    }

    if config.with_dep() {
        plan.push(DependencyVendoring::new(&config.toolchain().dep));
    }

    if let Some(program) = config.toolchain().vcs(config.vcs()) {
        plan.push(VcsInit::new(config.vcs(), program));
    }

    debug!(steps = ?plan.names(), "plan assembled");
    Ok(plan)
}
