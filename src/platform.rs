//! Access to the process-wide time-zone and locale state.
//!
//! Everything tzshift reads or mutates on the host goes through the
//! [`Platform`] trait. [`SystemPlatform`] talks to the real process: the `TZ`
//! environment variable, `setlocale(LC_ALL, ..)` via `libc`, `tzset()`, and
//! the host's zoneinfo database (read through `jiff`, honouring `TZDIR`) for
//! name lookups. Tests substitute a
//! double so that ordering and failure paths can be observed without touching
//! global state.

use std::ffi::{CStr, CString, OsStr, OsString};

use jiff::tz::TimeZoneDatabase;

use crate::error::PlatformError;

/// Name of the environment variable consulted by libc for the local zone.
pub const TZ_VAR: &str = "TZ";

/// Locale reported when the host cannot describe its current setting.
const FALLBACK_LOCALE: &str = "C";

/// Host operations used to validate candidates and to shift the environment.
#[cfg_attr(test, mockall::automock)]
pub trait Platform {
    /// Returns `true` when `name` is a known time-zone identifier.
    fn has_time_zone(&self, name: &str) -> bool;

    /// Returns the current value of the `TZ` variable, if set.
    fn time_zone_var(&self) -> Option<OsString>;

    /// Sets the `TZ` variable.
    fn set_time_zone_var(&self, value: &OsStr);

    /// Removes the `TZ` variable.
    fn remove_time_zone_var(&self);

    /// Returns the active `LC_ALL` locale in a form accepted by
    /// [`Platform::set_locale`].
    fn current_locale(&self) -> String;

    /// Switches the process locale for every category.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::LocaleRejected`] when the host does not
    /// support `locale`.
    fn set_locale(&self, locale: &str) -> Result<(), PlatformError>;

    /// Makes time-dependent subsystems re-read the `TZ` variable.
    fn sync_time_zone(&self);
}

/// [`Platform`] backed by the running process.
///
/// Mutating methods change state shared by every thread in the process. The
/// caller must ensure no other thread reads or writes the environment or the
/// locale concurrently; test suites serialise on a lock for this reason.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemPlatform;

impl Platform for SystemPlatform {
    fn has_time_zone(&self, name: &str) -> bool {
        // Loaded per call so a changed `TZDIR` is observed, matching what
        // `tzset` will read.
        TimeZoneDatabase::from_env().get(name).is_ok()
    }

    fn time_zone_var(&self) -> Option<OsString> {
        std::env::var_os(TZ_VAR)
    }

    fn set_time_zone_var(&self, value: &OsStr) {
        // SAFETY: tzshift runs one shift at a time and callers serialise any
        // other environment access, so no thread reads the environment while
        // it is being written.
        unsafe {
            std::env::set_var(TZ_VAR, value);
        }
    }

    fn remove_time_zone_var(&self) {
        // SAFETY: see `set_time_zone_var`.
        unsafe {
            std::env::remove_var(TZ_VAR);
        }
    }

    fn current_locale(&self) -> String {
        // SAFETY: a null locale argument only queries the current setting.
        let raw = unsafe { libc::setlocale(libc::LC_ALL, std::ptr::null()) };
        if raw.is_null() {
            return FALLBACK_LOCALE.to_owned();
        }
        // SAFETY: `setlocale` returned a non-null, NUL-terminated string that
        // stays valid until the next call; it is copied before returning.
        unsafe { CStr::from_ptr(raw) }
            .to_string_lossy()
            .into_owned()
    }

    fn set_locale(&self, locale: &str) -> Result<(), PlatformError> {
        let rejected = || PlatformError::LocaleRejected {
            locale: locale.to_owned(),
        };
        let name = CString::new(locale).map_err(|_| rejected())?;
        // SAFETY: `name` is a valid NUL-terminated string for the duration of
        // the call, and callers serialise locale changes.
        let applied = unsafe { libc::setlocale(libc::LC_ALL, name.as_ptr()) };
        if applied.is_null() {
            Err(rejected())
        } else {
            Ok(())
        }
    }

    fn sync_time_zone(&self) {
        tzset();
    }
}

#[cfg(unix)]
mod ffi {
    // The `libc` crate only declares `tzset` for Windows targets.
    unsafe extern "C" {
        pub(super) fn tzset();
    }
}

#[cfg(unix)]
fn tzset() {
    // SAFETY: `tzset` only re-reads `TZ`; environment writes are serialised
    // by the caller.
    unsafe { ffi::tzset() }
}

#[cfg(not(unix))]
const fn tzset() {}
