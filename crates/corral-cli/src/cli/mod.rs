//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases
//! and help text. Values such as `--db-type` stay strings here so the domain
//! layer owns their validation and error messages.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "corral",
    bin_name = "corral",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Generate Go web applications",
    long_about = "Corral generates a complete Go web application: entry point, \
                  actions, views, asset pipeline, database configuration, \
                  Docker and CI files, then vendors dependencies and \
                  initialises version control.",
    after_help = "EXAMPLES:\n\
        \x20 corral new coke\n\
        \x20 corral new coke --db-type=sqlite3 --vcs=none\n\
        \x20 corral new coke-api --api --skip-pop\n\
        \x20 corral completions bash > /usr/share/bash-completion/completions/corral",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a new application.
    #[command(
        visible_alias = "n",
        about = "Generate a new application",
        after_help = "EXAMPLES:\n\
            \x20 corral new coke --skip-pop --skip-webpack --vcs=none\n\
            \x20 corral new coke --db-type=mysql --docker=standard --ci-provider=travis\n\
            \x20 corral new coke --with-dep --dry-run"
    )]
    New(NewArgs),

    /// Initialise a Corral configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 corral init           # default location\n\
            \x20 corral init --force   # overwrite an existing file"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 corral completions bash > ~/.local/share/bash-completion/completions/corral\n\
            \x20 corral completions zsh  > ~/.zfunc/_corral\n\
            \x20 corral completions fish > ~/.config/fish/completions/corral.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Corral configuration.
    #[command(
        about = "Configuration inspection",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 corral config get tools.dep\n\
            \x20 corral config list\n\
            \x20 corral config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `corral new`.
///
/// Enum-like flags are `Option<String>`: unset means "use the configured
/// default", and bad values are rejected by the domain with its own message.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Application name; the application is created in `./NAME`.
    #[arg(value_name = "NAME", help = "Application name")]
    pub name: Option<String>,

    #[arg(
        long = "db-type",
        value_name = "DIALECT",
        help = "Database dialect: postgres, mysql, cockroach, sqlite3 or none"
    )]
    pub db_type: Option<String>,

    /// Skip HTML views and the asset pipeline.
    #[arg(long = "api", help = "Generate an API-only application")]
    pub api: bool,

    #[arg(long = "skip-pop", help = "Skip the database configuration")]
    pub skip_pop: bool,

    #[arg(long = "skip-webpack", help = "Skip the webpack asset pipeline")]
    pub skip_webpack: bool,

    #[arg(
        long = "vcs",
        value_name = "VCS",
        help = "Version control to initialise: git, bzr or none"
    )]
    pub vcs: Option<String>,

    #[arg(long = "with-dep", help = "Vendor dependencies with dep")]
    pub with_dep: bool,

    #[arg(
        long = "docker",
        value_name = "KIND",
        help = "Dockerfile flavour: multi, standard or none"
    )]
    pub docker: Option<String>,

    #[arg(
        long = "ci-provider",
        value_name = "PROVIDER",
        help = "CI configuration: none, travis or gitlab-ci"
    )]
    pub ci_provider: Option<String>,

    /// Remove an existing target directory first (destructive).
    #[arg(long = "force", help = "Replace an existing directory")]
    pub force: bool,

    /// Run the pipeline against the recording overlay only.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `corral init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `corral completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `corral config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `tools.dep`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_new_command() {
        let cli = Cli::parse_from([
            "corral",
            "new",
            "coke",
            "--db-type=sqlite3",
            "--skip-webpack",
            "--vcs",
            "none",
        ]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert_eq!(args.name.as_deref(), Some("coke"));
        assert_eq!(args.db_type.as_deref(), Some("sqlite3"));
        assert_eq!(args.vcs.as_deref(), Some("none"));
        assert!(args.skip_webpack);
        assert!(!args.skip_pop);
    }

    #[test]
    fn name_is_optional_at_parse_time() {
        // the domain reports a missing name with its own message
        let cli = Cli::parse_from(["corral", "new"]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert!(args.name.is_none());
    }

    #[test]
    fn verbose_works_after_subcommand() {
        let cli = Cli::parse_from(["corral", "new", "coke", "-vv"]);
        assert_eq!(cli.global.verbose, 2);
    }

    #[test]
    fn no_color_flag_works_after_subcommand() {
        let cli = Cli::parse_from(["corral", "new", "coke", "--no-color"]);
        assert!(cli.global.no_color);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["corral", "--quiet", "--verbose", "config", "list"]);
        assert!(result.is_err());
    }
}
