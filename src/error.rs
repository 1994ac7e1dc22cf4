//! Error types for the tzshift engine.
//!
//! [`TzShiftError`] covers the fatal configuration failures that must stop a
//! session before any run executes. Recoverable problems (unknown candidates,
//! truncation) are reported as warnings instead, and a locale that fails to
//! apply at run time degrades that single run to an abstention
//! ([`crate::shift::Abstain`]).

use camino::Utf8PathBuf;
use thiserror::Error;

/// Fatal errors raised while configuring or planning a session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TzShiftError {
    /// The combination cap was not an integer.
    #[error("tzshift: {setting} must be an integer, got '{value}'")]
    InvalidMaxCombinations {
        /// Flag or project key the value came from.
        setting: String,
        /// The rejected raw value.
        value: String,
    },

    /// The combination cap was negative.
    #[error("tzshift: {setting} cannot be negative, got {value}")]
    NegativeMaxCombinations {
        /// Flag or project key the value came from.
        setting: String,
        /// The rejected value.
        value: i64,
    },

    /// No time zone survived validation for a test.
    #[error("tzshift: no valid time-zones to test with (test `{test}`)")]
    NoValidTimezones {
        /// Name of the test whose time-zone dimension resolved empty.
        test: String,
    },

    /// No locale survived validation for a test.
    #[error("tzshift: no valid locales to test with (test `{test}`)")]
    NoValidLocales {
        /// Name of the test whose locale dimension resolved empty.
        test: String,
    },

    /// The project configuration file could not be read.
    #[error("tzshift: failed to read {path}: {reason}")]
    ConfigRead {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Description of the I/O failure.
        reason: String,
    },

    /// The project configuration file could not be parsed.
    #[error("tzshift: invalid configuration in {path}: {reason}")]
    ConfigParse {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// A [`crate::TzShift`] pair was indexed outside `0..2`.
    #[error("tzshift: index {index} out of range for a (timezone, locale) pair")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
    },
}

/// Errors reported by a [`crate::platform::Platform`] implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The host refused to switch to the requested locale.
    #[error("locale '{locale}' is not supported by this host")]
    LocaleRejected {
        /// The rejected locale name.
        locale: String,
    },
}

/// Convenience alias for results carrying a [`TzShiftError`].
pub type Result<T> = std::result::Result<T, TzShiftError>;
