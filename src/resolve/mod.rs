//! Per-test resolution of the final candidate lists.
//!
//! The session-wide lists come from [`crate::config::Settings`] and are
//! validated lazily, at most once per dimension, the first time a test needs
//! them. Scope overrides replace (never merge with) the session list for their
//! dimension and are validated on their own. A dimension that ends up empty is
//! a configuration error: running zero combinations would hide the mistake.

use log::debug;
use once_cell::unsync::OnceCell;

use crate::error::{Result, TzShiftError};
use crate::platform::Platform;
use crate::scope::{TestNode, collect_overrides};
use crate::validate::CandidateValidator;

const LOG_TARGET: &str = "tzshift::resolve";

/// Outcome of resolving one test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// A scope disabled parametrisation; the test runs once with the
    /// sentinel pair.
    Disabled,
    /// The test is swept over these validated candidates.
    Parametrized {
        /// Validated time zones, in configuration order.
        timezones: Vec<String>,
        /// Validated locales, in configuration order.
        locales: Vec<String>,
    },
}

/// Merges session candidates with scope overrides for each test.
pub struct ConfigResolver<'a, P: Platform + ?Sized> {
    validator: CandidateValidator<'a, P>,
    raw_timezones: Vec<String>,
    raw_locales: Vec<String>,
    timezones: OnceCell<Vec<String>>,
    locales: OnceCell<Vec<String>>,
}

impl<'a, P: Platform + ?Sized> ConfigResolver<'a, P> {
    /// Creates a resolver over the raw session candidates.
    #[must_use]
    pub fn new(
        validator: CandidateValidator<'a, P>,
        raw_timezones: Vec<String>,
        raw_locales: Vec<String>,
    ) -> Self {
        Self {
            validator,
            raw_timezones,
            raw_locales,
            timezones: OnceCell::new(),
            locales: OnceCell::new(),
        }
    }

    /// The validator used for session lists and overrides.
    #[must_use]
    pub const fn validator(&self) -> &CandidateValidator<'a, P> {
        &self.validator
    }

    /// Validated session time zones.
    #[must_use]
    pub fn global_timezones(&self) -> &[String] {
        self.timezones
            .get_or_init(|| self.validator.validate_timezones(&self.raw_timezones))
    }

    /// Validated session locales.
    #[must_use]
    pub fn global_locales(&self) -> &[String] {
        self.locales
            .get_or_init(|| self.validator.validate_locales(&self.raw_locales))
    }

    /// Resolves the candidate lists for `node`.
    ///
    /// # Errors
    ///
    /// Returns [`TzShiftError::NoValidTimezones`] or
    /// [`TzShiftError::NoValidLocales`] when a dimension resolves empty.
    pub fn resolve(&self, node: &TestNode) -> Result<Resolution> {
        let overrides = collect_overrides(node.directives());
        if overrides.disable {
            debug!(target: LOG_TARGET, "`{}` opted out of parametrisation", node.name());
            return Ok(Resolution::Disabled);
        }

        let timezones = match overrides.timezones.as_deref() {
            Some(raw) => self.validator.validate_timezones(raw),
            None => self.global_timezones().to_vec(),
        };
        if timezones.is_empty() {
            return Err(TzShiftError::NoValidTimezones {
                test: node.name().to_owned(),
            });
        }

        let locales = match overrides.locales.as_deref() {
            Some(raw) => self.validator.validate_locales(raw),
            None => self.global_locales().to_vec(),
        };
        if locales.is_empty() {
            return Err(TzShiftError::NoValidLocales {
                test: node.name().to_owned(),
            });
        }

        debug!(
            target: LOG_TARGET,
            "`{}` resolved to {} time-zone(s) x {} locale(s)",
            node.name(),
            timezones.len(),
            locales.len(),
        );
        Ok(Resolution::Parametrized { timezones, locales })
    }
}
