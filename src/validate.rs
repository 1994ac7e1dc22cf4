//! Filtering of raw candidates against what the host supports.
//!
//! Time zones are checked with a database lookup. Locales need a real probe:
//! the validator switches the process locale to the candidate and immediately
//! switches back, so each distinct locale is probed at most once per
//! validator and the outcome is cached. The host is never left in a mutated
//! state by validation.

use std::cell::RefCell;
use std::collections::HashMap;

use log::{debug, warn};

use crate::diagnostics::{WarningSink, quoted_list};
use crate::platform::Platform;
use crate::sentinel::{SYSTEM, is_system};

const LOG_TARGET: &str = "tzshift::validate";

/// Partitions candidate lists into accepted and rejected values.
pub struct CandidateValidator<'a, P: Platform + ?Sized> {
    platform: &'a P,
    sink: &'a dyn WarningSink,
    locale_probes: RefCell<HashMap<String, bool>>,
}

impl<'a, P: Platform + ?Sized> CandidateValidator<'a, P> {
    /// Creates a validator that probes `platform` and reports to `sink`.
    #[must_use]
    pub fn new(platform: &'a P, sink: &'a dyn WarningSink) -> Self {
        Self {
            platform,
            sink,
            locale_probes: RefCell::new(HashMap::new()),
        }
    }

    /// Returns the platform the validator probes.
    #[must_use]
    pub const fn platform(&self) -> &'a P {
        self.platform
    }

    /// Returns the sink rejected candidates are reported to.
    #[must_use]
    pub fn sink(&self) -> &'a dyn WarningSink {
        self.sink
    }

    /// Keeps the time zones known to the host database.
    ///
    /// Sentinel spellings pass through as [`SYSTEM`]. Unknown names are
    /// dropped and named together in a single warning. Input order is kept;
    /// duplicates are left for the combination step to collapse.
    pub fn validate_timezones(&self, candidates: &[String]) -> Vec<String> {
        self.partition(candidates, "ignoring unknown time-zones", |name| {
            self.platform.has_time_zone(name)
        })
    }

    /// Keeps the locales the host can switch to.
    ///
    /// Same contract as [`Self::validate_timezones`], but acceptance is decided
    /// by [`Self::locale_is_available`].
    pub fn validate_locales(&self, candidates: &[String]) -> Vec<String> {
        self.partition(candidates, "ignoring unavailable locales", |name| {
            self.locale_is_available(name)
        })
    }

    /// Returns whether the host accepts `locale`, probing at most once per
    /// distinct value.
    pub fn locale_is_available(&self, locale: &str) -> bool {
        if is_system(locale) {
            return true;
        }
        if let Some(cached) = self.locale_probes.borrow().get(locale) {
            return *cached;
        }

        let available = self.probe_locale(locale);
        self.locale_probes
            .borrow_mut()
            .insert(locale.to_owned(), available);
        available
    }

    /// Number of distinct locales probed so far.
    #[must_use]
    pub fn probed_locales(&self) -> usize {
        self.locale_probes.borrow().len()
    }

    fn probe_locale(&self, locale: &str) -> bool {
        let original = self.platform.current_locale();
        let available = self.platform.set_locale(locale).is_ok();

        if let Err(error) = self.platform.set_locale(&original) {
            warn!(
                target: LOG_TARGET,
                "failed to restore locale `{original}` after probing `{locale}`: {error}",
            );
        }

        debug!(target: LOG_TARGET, "probed locale `{locale}`: available={available}");
        available
    }

    fn partition(
        &self,
        candidates: &[String],
        warning: &str,
        is_known: impl Fn(&str) -> bool,
    ) -> Vec<String> {
        let mut accepted = Vec::with_capacity(candidates.len());
        let mut rejected = Vec::new();

        for candidate in candidates {
            if is_system(candidate) {
                accepted.push(SYSTEM.to_owned());
            } else if is_known(candidate.as_str()) {
                accepted.push(candidate.clone());
            } else {
                rejected.push(candidate.clone());
            }
        }

        if !rejected.is_empty() {
            self.sink
                .warn(&format!("tzshift: {warning}: {}", quoted_list(&rejected)));
        }
        accepted
    }
}
