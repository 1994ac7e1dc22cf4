//! Command-line front end for the tzshift engine.
//!
//! The `tzshift` binary inspects what the engine would do for a project
//! without running any tests: `plan` prints the run identifiers a test would
//! be expanded into, and `check` reports which configured time zones and
//! locales this host supports.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`commands`] - Subcommand execution and exit codes
//! - [`output`] - Human-readable and JSON report formatting

pub mod cli;
pub mod commands;
pub mod output;
