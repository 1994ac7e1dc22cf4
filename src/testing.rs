//! Test doubles for suites exercising tzshift without touching the host.
//!
//! Enabled for the crate's own tests and, for downstream suites, through the
//! `test-support` feature:
//!
//! ```toml
//! [dev-dependencies]
//! tzshift = { version = "0.1", features = ["test-support"] }
//! ```
//!
//! The test-support surface is not covered by semver guarantees.

use std::cell::RefCell;
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};

use crate::diagnostics::WarningSink;
use crate::error::PlatformError;
use crate::platform::Platform;

/// Sink recording warnings for later assertions.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: RefCell<Vec<String>>,
}

impl RecordingSink {
    /// Returns every warning recorded so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl WarningSink for RecordingSink {
    fn warn(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_owned());
    }
}

/// A host operation observed by [`FakePlatform`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlatformCall {
    /// `TZ` was set to the given value.
    SetTimeZoneVar(String),
    /// `TZ` was removed.
    RemoveTimeZoneVar,
    /// A locale switch was attempted.
    SetLocale(String),
    /// Time-dependent subsystems were told to re-read `TZ`.
    SyncTimeZone,
}

#[derive(Debug)]
struct FakeState {
    time_zone_var: Option<OsString>,
    locale: String,
    calls: Vec<PlatformCall>,
}

/// In-memory [`Platform`] with a configurable set of zones and locales.
///
/// Every mutating call is appended to [`FakePlatform::calls`] so tests can
/// assert on ordering as well as on the final state.
///
/// # Examples
///
/// ```
/// use tzshift::platform::Platform;
/// use tzshift::testing::FakePlatform;
///
/// let platform = FakePlatform::new(["UTC"], ["C", "de_DE.UTF-8"]);
/// assert!(platform.has_time_zone("UTC"));
/// assert!(platform.set_locale("fr_FR.UTF-8").is_err());
/// assert_eq!(platform.current_locale(), "C");
/// ```
#[derive(Debug)]
pub struct FakePlatform {
    zones: HashSet<String>,
    locales: RefCell<HashSet<String>>,
    state: RefCell<FakeState>,
}

impl FakePlatform {
    /// Builds a platform knowing `zones` and able to switch to `locales`.
    ///
    /// The platform starts with `TZ` unset and the `C` locale active; `C` is
    /// always installed.
    #[must_use]
    pub fn new<Z, L>(zones: Z, locales: L) -> Self
    where
        Z: IntoIterator,
        Z::Item: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        let mut installed: HashSet<String> = locales.into_iter().map(Into::into).collect();
        installed.insert("C".to_owned());
        Self {
            zones: zones.into_iter().map(Into::into).collect(),
            locales: RefCell::new(installed),
            state: RefCell::new(FakeState {
                time_zone_var: None,
                locale: "C".to_owned(),
                calls: Vec::new(),
            }),
        }
    }

    /// Sets `TZ` without recording a call, as if inherited from the parent
    /// process.
    #[must_use]
    pub fn with_time_zone_var(self, value: &str) -> Self {
        self.state.borrow_mut().time_zone_var = Some(OsString::from(value));
        self
    }

    /// Sets the active locale without recording a call.
    #[must_use]
    pub fn with_locale(self, locale: &str) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.locale = locale.to_owned();
        }
        self.locales.borrow_mut().insert(locale.to_owned());
        self
    }

    /// Removes `locale` from the installed set, simulating a host that
    /// changed between validation and execution.
    pub fn uninstall_locale(&self, locale: &str) {
        self.locales.borrow_mut().remove(locale);
    }

    /// Returns the recorded mutating calls, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.state.borrow().calls.clone()
    }

    /// Forgets the recorded calls.
    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Returns the current `TZ` value as a string, if set.
    #[must_use]
    pub fn time_zone(&self) -> Option<String> {
        self.state
            .borrow()
            .time_zone_var
            .as_ref()
            .map(|value| value.to_string_lossy().into_owned())
    }

    fn record(&self, call: PlatformCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl Platform for FakePlatform {
    fn has_time_zone(&self, name: &str) -> bool {
        self.zones.contains(name)
    }

    fn time_zone_var(&self) -> Option<OsString> {
        self.state.borrow().time_zone_var.clone()
    }

    fn set_time_zone_var(&self, value: &OsStr) {
        self.record(PlatformCall::SetTimeZoneVar(
            value.to_string_lossy().into_owned(),
        ));
        self.state.borrow_mut().time_zone_var = Some(value.to_owned());
    }

    fn remove_time_zone_var(&self) {
        self.record(PlatformCall::RemoveTimeZoneVar);
        self.state.borrow_mut().time_zone_var = None;
    }

    fn current_locale(&self) -> String {
        self.state.borrow().locale.clone()
    }

    fn set_locale(&self, locale: &str) -> Result<(), PlatformError> {
        self.record(PlatformCall::SetLocale(locale.to_owned()));
        if !self.locales.borrow().contains(locale) {
            return Err(PlatformError::LocaleRejected {
                locale: locale.to_owned(),
            });
        }
        self.state.borrow_mut().locale = locale.to_owned();
        Ok(())
    }

    fn sync_time_zone(&self) {
        self.record(PlatformCall::SyncTimeZone);
    }
}
