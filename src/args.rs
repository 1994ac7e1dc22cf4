//! Command-line flags controlling the engine.
//!
//! [`TzShiftArgs`] derives [`clap::Args`] so a host binary can flatten it into
//! its own parser. Values stay raw here; [`crate::config::Settings`] does the
//! splitting, trimming and validation so that configuration errors surface
//! with the engine's own messages.

use clap::Args;

/// Flags overriding the project configuration for one session.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct TzShiftArgs {
    /// Comma-separated list of time zones to test with (overrides the
    /// project file).
    #[arg(long = "tz-timezones", value_name = "LIST")]
    pub timezones: Option<String>,

    /// Comma-separated list of locale identifiers to test with (overrides the
    /// project file).
    #[arg(long = "tz-locales", value_name = "LIST")]
    pub locales: Option<String>,

    /// Maximum number of (timezone, locale) combinations per test; 0 means
    /// unlimited.
    #[arg(long = "tzshift-max", value_name = "N", allow_hyphen_values = true)]
    pub max_combinations: Option<String>,

    /// Disable all timezone/locale parametrisation.
    #[arg(long = "no-tzshift")]
    pub disabled: bool,
}
