//! CLI argument definitions for the `tzshift` binary.
//!
//! Kept apart from the entrypoint so the argument surface can be parsed and
//! tested without running any command.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use tzshift::TzShiftArgs;
use tzshift::config::CONFIG_FILE_NAME;

/// Inspect the time-zone and locale sweep a test would run under.
#[derive(Parser, Debug)]
#[command(name = "tzshift")]
#[command(version, about)]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  List the runs for an unannotated test:\n",
    "    $ tzshift plan\n\n",
    "  Override the locales for one test and cap the matrix:\n",
    "    $ tzshift plan --locales C,de_DE.UTF-8 --tzshift-max 4\n\n",
    "  Show which configured candidates this host supports:\n",
    "    $ tzshift check --json\n",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the runs generated for one test scope.
    Plan(PlanArgs),

    /// Validate the configured candidates against this host.
    Check(CheckArgs),
}

/// Configuration shared by every subcommand.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ConfigArgs {
    /// Project configuration file.
    #[arg(long, value_name = "PATH", default_value = CONFIG_FILE_NAME)]
    pub config: Utf8PathBuf,

    /// Session-wide overrides.
    #[command(flatten)]
    pub tzshift: TzShiftArgs,
}

/// Arguments for `tzshift plan`.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct PlanArgs {
    /// Configuration sources.
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Name reported for the planned test.
    #[arg(long, value_name = "NAME", default_value = "test")]
    pub name: String,

    /// Function-scope time-zone override (comma-separated).
    #[arg(id = "scope_timezones", long = "timezones", value_name = "CSV")]
    pub timezones: Option<String>,

    /// Function-scope locale override (comma-separated).
    #[arg(id = "scope_locales", long = "locales", value_name = "CSV")]
    pub locales: Option<String>,

    /// Disable parametrisation at function scope.
    #[arg(long)]
    pub disable: bool,

    /// Emit JSON instead of one identifier per line.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `tzshift check`.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct CheckArgs {
    /// Configuration sources.
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Emit JSON instead of human-readable text.
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
