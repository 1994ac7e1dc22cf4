//! Session configuration merged from the project file and the command line.
//!
//! The project keeps its defaults in `tzshift.toml`:
//!
//! ```toml
//! timezones = ["UTC", "Europe/London", "SYSTEM"]
//! locales = ["C", "de_DE.UTF-8"]
//! max_combinations = 8
//! ```
//!
//! [`Settings::from_sources`] layers [`TzShiftArgs`] on top: a list given on
//! the command line replaces the project list, and a command-line cap wins
//! over the project cap. A cap of 0 means unlimited; negative or non-integer
//! caps are configuration errors raised before anything runs.

use std::fmt;
use std::io::ErrorKind;
use std::num::NonZeroUsize;
use std::str::FromStr;

use camino::Utf8Path;
use log::debug;
use serde::Deserialize;

use crate::args::TzShiftArgs;
use crate::error::{Result, TzShiftError};

/// File name looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "tzshift.toml";

/// Time zones swept when neither the project nor the command line says
/// otherwise.
pub const DEFAULT_TIMEZONES: &[&str] = &[
    "UTC",
    "America/New_York",
    "Europe/London",
    "Asia/Kolkata",
    "Australia/Sydney",
    "Asia/Tokyo",
];

/// Locales swept by default. `C` is always present; the others are common on
/// Linux and macOS and are filtered out where missing.
pub const DEFAULT_LOCALES: &[&str] = &[
    "C",
    "en_US.UTF-8",
    "de_DE.UTF-8",
    "fr_FR.UTF-8",
    "ja_JP.UTF-8",
];

/// Command-line flag carrying the combination cap.
pub const CAP_FLAG: &str = "--tzshift-max";

/// Project-file key carrying the combination cap.
pub const CAP_KEY: &str = "max_combinations";

/// Contents of `tzshift.toml`, with the cap already validated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectConfig {
    /// Time zones to sweep, one entry per element.
    pub timezones: Vec<String>,
    /// Locales to sweep, one entry per element.
    pub locales: Vec<String>,
    /// Cap on combinations per test.
    pub max_combinations: MaxCombinations,
    /// Set to `false` to switch parametrisation off for the project.
    pub enabled: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            timezones: owned(DEFAULT_TIMEZONES),
            locales: owned(DEFAULT_LOCALES),
            max_combinations: MaxCombinations::UNLIMITED,
            enabled: true,
        }
    }
}

/// `tzshift.toml` as written, with the cap still raw.
#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ProjectFile {
    timezones: Vec<String>,
    locales: Vec<String>,
    max_combinations: toml::Value,
    enabled: bool,
}

impl Default for ProjectFile {
    fn default() -> Self {
        let defaults = ProjectConfig::default();
        Self {
            timezones: defaults.timezones,
            locales: defaults.locales,
            max_combinations: toml::Value::Integer(0),
            enabled: defaults.enabled,
        }
    }
}

impl ProjectConfig {
    /// Parses configuration from TOML source; `path` is only used in errors.
    ///
    /// # Errors
    ///
    /// Returns [`TzShiftError::ConfigParse`] for malformed TOML, unknown keys
    /// or mistyped lists, and [`TzShiftError::InvalidMaxCombinations`] or
    /// [`TzShiftError::NegativeMaxCombinations`] for a bad cap.
    pub fn from_toml(source: &str, path: &Utf8Path) -> Result<Self> {
        let file: ProjectFile =
            toml::from_str(source).map_err(|error| TzShiftError::ConfigParse {
                path: path.to_owned(),
                reason: error.to_string(),
            })?;
        let setting = format!("{CAP_KEY} in {path}");
        let max_combinations = match &file.max_combinations {
            toml::Value::Integer(value) => MaxCombinations::from_signed(*value, &setting)?,
            toml::Value::String(raw) => MaxCombinations::parse_setting(raw, &setting)?,
            other => {
                return Err(TzShiftError::InvalidMaxCombinations {
                    setting,
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            timezones: file.timezones,
            locales: file.locales,
            max_combinations,
            enabled: file.enabled,
        })
    }

    /// Loads `path`, falling back to the defaults when the file is absent.
    ///
    /// # Errors
    ///
    /// Returns [`TzShiftError::ConfigRead`] when the file exists but cannot
    /// be read, or [`TzShiftError::ConfigParse`] when it is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use tzshift::config::ProjectConfig;
    ///
    /// let config = ProjectConfig::load(Utf8Path::new("does/not/exist.toml"))?;
    /// assert_eq!(config, ProjectConfig::default());
    /// # Ok::<(), tzshift::TzShiftError>(())
    /// ```
    pub fn load(path: &Utf8Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(source) => Self::from_toml(&source, path),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(target: "tzshift::config", "{path} not found; using defaults");
                Ok(Self::default())
            }
            Err(error) => Err(TzShiftError::ConfigRead {
                path: path.to_owned(),
                reason: error.to_string(),
            }),
        }
    }
}

/// Upper bound on the number of runs generated per test.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaxCombinations(Option<NonZeroUsize>);

impl MaxCombinations {
    /// No cap.
    pub const UNLIMITED: Self = Self(None);

    /// Caps the matrix at `limit` runs; `0` means unlimited.
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self(NonZeroUsize::new(limit))
    }

    /// Converts a signed value read from `setting`.
    ///
    /// # Errors
    ///
    /// Returns [`TzShiftError::NegativeMaxCombinations`] for values below 0.
    pub fn from_signed(value: i64, setting: &str) -> Result<Self> {
        if value < 0 {
            return Err(TzShiftError::NegativeMaxCombinations {
                setting: setting.to_owned(),
                value,
            });
        }
        Ok(Self::new(usize::try_from(value).unwrap_or(usize::MAX)))
    }

    /// Parses a textual value read from `setting`.
    ///
    /// # Errors
    ///
    /// Returns [`TzShiftError::InvalidMaxCombinations`] when `raw` is not an
    /// integer and [`TzShiftError::NegativeMaxCombinations`] when it is
    /// below 0.
    pub fn parse_setting(raw: &str, setting: &str) -> Result<Self> {
        let value = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| TzShiftError::InvalidMaxCombinations {
                setting: setting.to_owned(),
                value: raw.to_owned(),
            })?;
        Self::from_signed(value, setting)
    }

    /// Returns the cap, or `None` when unlimited.
    #[must_use]
    pub fn limit(self) -> Option<usize> {
        self.0.map(NonZeroUsize::get)
    }
}

impl FromStr for MaxCombinations {
    type Err = TzShiftError;

    fn from_str(raw: &str) -> Result<Self> {
        Self::parse_setting(raw, CAP_FLAG)
    }
}

impl fmt::Display for MaxCombinations {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.limit() {
            Some(limit) => write!(formatter, "{limit}"),
            None => formatter.write_str("unlimited"),
        }
    }
}

/// Effective configuration for a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    timezones: Vec<String>,
    locales: Vec<String>,
    max_combinations: MaxCombinations,
    enabled: bool,
}

impl Settings {
    /// Creates enabled settings with the given candidates and no cap.
    #[must_use]
    pub fn new<T, L>(timezones: T, locales: L) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        Self {
            timezones: dedup(timezones.into_iter().map(Into::into)),
            locales: dedup(locales.into_iter().map(Into::into)),
            max_combinations: MaxCombinations::UNLIMITED,
            enabled: true,
        }
    }

    /// Merges command-line flags over the project configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the command-line cap is negative
    /// or not an integer.
    ///
    /// # Examples
    ///
    /// ```
    /// use tzshift::args::TzShiftArgs;
    /// use tzshift::config::{ProjectConfig, Settings};
    ///
    /// let args = TzShiftArgs {
    ///     timezones: Some(" UTC, ,Asia/Tokyo,UTC".to_owned()),
    ///     ..TzShiftArgs::default()
    /// };
    /// let settings = Settings::from_sources(&args, &ProjectConfig::default())?;
    /// assert_eq!(settings.timezones(), ["UTC", "Asia/Tokyo"]);
    /// # Ok::<(), tzshift::TzShiftError>(())
    /// ```
    pub fn from_sources(args: &TzShiftArgs, project: &ProjectConfig) -> Result<Self> {
        let max_combinations = match args.max_combinations.as_deref() {
            Some(raw) => raw.parse()?,
            None => project.max_combinations,
        };

        Ok(Self {
            timezones: cli_or_project(args.timezones.as_deref(), &project.timezones),
            locales: cli_or_project(args.locales.as_deref(), &project.locales),
            max_combinations,
            enabled: project.enabled && !args.disabled,
        })
    }

    /// Sets the combination cap.
    #[must_use]
    pub const fn with_max_combinations(mut self, max_combinations: MaxCombinations) -> Self {
        self.max_combinations = max_combinations;
        self
    }

    /// Switches the engine off.
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Raw time-zone candidates, de-duplicated in first-seen order.
    #[must_use]
    pub fn timezones(&self) -> &[String] {
        &self.timezones
    }

    /// Raw locale candidates, de-duplicated in first-seen order.
    #[must_use]
    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    /// The combination cap.
    #[must_use]
    pub const fn max_combinations(&self) -> MaxCombinations {
        self.max_combinations
    }

    /// Whether parametrisation is active.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEZONES.iter().copied(), DEFAULT_LOCALES.iter().copied())
    }
}

/// Splits a comma-separated command-line list, trimming entries and dropping
/// empty ones.
#[must_use]
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect()
}

fn cli_or_project(cli: Option<&str>, project: &[String]) -> Vec<String> {
    match cli {
        Some(raw) => dedup(split_list(raw)),
        None => dedup(project.iter().cloned()),
    }
}

/// Removes duplicates while keeping first-seen order.
pub(crate) fn dedup<I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}
