//! `tzshift` CLI entrypoint.
//!
//! Parses arguments and runs the chosen subcommand against the real host.

use clap::Parser;
use tzshift::SystemPlatform;
use tzshift_cli::cli::Cli;
use tzshift_cli::commands::run;

fn main() {
    let cli = Cli::parse();
    let exit_code = run(
        &cli,
        &SystemPlatform,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    );
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}
