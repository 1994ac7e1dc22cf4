//! Command implementations, generic over the host platform.
//!
//! [`run`] is the whole binary minus argument parsing: it executes the chosen
//! subcommand, writes the report to stdout and warnings or errors to stderr,
//! and returns the process exit code.

use std::fmt::Display;
use std::io::Write;

use log::debug;
use tzshift::config::{ProjectConfig, Settings, split_list};
use tzshift::diagnostics::WarningSink;
use tzshift::platform::Platform;
use tzshift::scope::{Directive, ScopeKind, TestNode};
use tzshift::validate::CandidateValidator;
use tzshift::{Planner, Result};

use crate::cli::{CheckArgs, Cli, Command, ConfigArgs, PlanArgs};
use crate::output::{CheckReport, Dimension, PlanReport, WriterSink};

/// Exit code for configuration errors.
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Loads the project file and layers the command-line flags over it.
///
/// # Errors
///
/// Returns a configuration error for an unreadable or invalid project file
/// or an invalid cap.
pub fn load_settings(config: &ConfigArgs) -> Result<Settings> {
    let project = ProjectConfig::load(&config.config)?;
    debug!(target: "tzshift::cli", "loaded project configuration from {}", config.config);
    Settings::from_sources(&config.tzshift, &project)
}

/// Builds the test node for `plan`, attaching the function-scope overrides.
#[must_use]
pub fn scope_node(args: &PlanArgs) -> TestNode {
    let node = TestNode::new(args.name.as_str());
    if args.timezones.is_none() && args.locales.is_none() && !args.disable {
        return node;
    }

    let mut directive = Directive::new().disable(args.disable);
    if let Some(raw) = args.timezones.as_deref() {
        directive = directive.timezones(split_list(raw));
    }
    if let Some(raw) = args.locales.as_deref() {
        directive = directive.locales(split_list(raw));
    }
    node.with_directive(ScopeKind::Function, directive)
}

/// Resolves the runs for the test described by `args`.
///
/// # Errors
///
/// Returns a configuration error when settings are invalid or a dimension
/// resolves empty.
pub fn plan<P: Platform + ?Sized>(
    args: &PlanArgs,
    platform: &P,
    sink: &dyn WarningSink,
) -> Result<PlanReport> {
    let settings = load_settings(&args.config)?;
    let node = scope_node(args);
    let planner = Planner::new(settings, platform, sink);
    let expanded = planner.expand(&node)?;
    Ok(PlanReport::new(node.name(), expanded))
}

/// Validates the configured candidates against `platform`.
///
/// # Errors
///
/// Returns a configuration error when settings are invalid.
pub fn check<P: Platform + ?Sized>(
    args: &CheckArgs,
    platform: &P,
    sink: &dyn WarningSink,
) -> Result<CheckReport> {
    let settings = load_settings(&args.config)?;
    let validator = CandidateValidator::new(platform, sink);
    let timezones = validator.validate_timezones(settings.timezones());
    let locales = validator.validate_locales(settings.locales());

    Ok(CheckReport {
        enabled: settings.is_enabled(),
        max_combinations: settings.max_combinations().to_string(),
        timezones: Dimension::from_validation(settings.timezones(), timezones),
        locales: Dimension::from_validation(settings.locales(), locales),
    })
}

/// Executes `cli`, returning the process exit code.
pub fn run<P: Platform + ?Sized>(
    cli: &Cli,
    platform: &P,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> i32 {
    let outcome = {
        let sink = WriterSink::new(&mut *stderr);
        render(cli, platform, &sink)
    };

    match outcome {
        Ok(text) => {
            write_line(stdout, text);
            0
        }
        Err(error) => {
            write_line(stderr, error);
            EXIT_CONFIG_ERROR
        }
    }
}

fn render<P: Platform + ?Sized>(
    cli: &Cli,
    platform: &P,
    sink: &dyn WarningSink,
) -> Result<String> {
    match &cli.command {
        Command::Plan(args) => {
            let report = plan(args, platform, sink)?;
            Ok(if args.json {
                report.format_json()
            } else {
                report.format_human()
            })
        }
        Command::Check(args) => {
            let report = check(args, platform, sink)?;
            Ok(if args.json {
                report.format_json()
            } else {
                report.format_human()
            })
        }
    }
}

fn write_line(writer: &mut dyn Write, message: impl Display) {
    if writeln!(writer, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
