//! Scoped application of a `(timezone, locale)` pair.
//!
//! An [`EnvironmentShifter`] serves exactly one run. [`EnvironmentShifter::enter`]
//! snapshots the `TZ` variable and the active locale, applies the locale
//! first and the time zone second (sentinel values are left alone), then
//! re-syncs time-dependent subsystems. The returned [`ShiftGuard`] restores
//! the snapshot when dropped, including during unwinding, so a failing or
//! panicking test body cannot leak its environment into the next run.
//!
//! If the locale cannot be applied the run abstains: [`Abstain`] is returned
//! and nothing has been changed, because the locale is the first mutation.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::ops::Deref;

use log::{debug, trace, warn};
use thiserror::Error;

use crate::platform::Platform;
use crate::sentinel::is_system;
use crate::value::TzShift;

const LOG_TARGET: &str = "tzshift::shift";

/// Lifecycle of a single shift.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Nothing applied.
    Idle,
    /// Snapshot taken, pair being applied.
    Applying,
    /// Pair applied; the test body owns the environment.
    Running,
    /// Snapshot being reinstated.
    Restoring,
}

impl fmt::Display for Phase {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Applying => "applying",
            Self::Running => "running",
            Self::Restoring => "restoring",
        };
        formatter.write_str(label)
    }
}

/// A run that cannot execute because the host rejected its locale.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Locale '{locale}' not installed on this platform")]
pub struct Abstain {
    /// The rejected locale.
    pub locale: String,
}

#[derive(Clone, Debug)]
struct Snapshot {
    time_zone_var: Option<OsString>,
    locale: String,
}

impl Snapshot {
    fn capture<P: Platform + ?Sized>(platform: &P) -> Self {
        Self {
            time_zone_var: platform.time_zone_var(),
            locale: platform.current_locale(),
        }
    }
}

/// Applies one pair for the lifetime of one run.
pub struct EnvironmentShifter<'p, P: Platform + ?Sized> {
    platform: &'p P,
    phase: Phase,
}

impl<'p, P: Platform + ?Sized> EnvironmentShifter<'p, P> {
    /// Creates an idle shifter over `platform`.
    #[must_use]
    pub const fn new(platform: &'p P) -> Self {
        Self {
            platform,
            phase: Phase::Idle,
        }
    }

    /// Current phase; always [`Phase::Idle`] before [`Self::enter`].
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Applies `pair`, returning a guard that restores the host on drop.
    ///
    /// Consuming `self` keeps a shifter to a single run.
    ///
    /// # Errors
    ///
    /// Returns [`Abstain`] when the locale cannot be applied. The host is
    /// unchanged in that case.
    pub fn enter(mut self, pair: TzShift) -> Result<ShiftGuard<'p, P>, Abstain> {
        self.transition(Phase::Applying);
        let snapshot = Snapshot::capture(self.platform);

        if !is_system(pair.locale()) {
            if let Err(error) = self.platform.set_locale(pair.locale()) {
                debug!(target: LOG_TARGET, "abstaining from {pair}: {error}");
                self.transition(Phase::Idle);
                return Err(Abstain {
                    locale: pair.locale().to_owned(),
                });
            }
        }

        if !is_system(pair.timezone()) {
            self.platform
                .set_time_zone_var(OsStr::new(pair.timezone()));
        }
        self.platform.sync_time_zone();
        self.transition(Phase::Running);

        Ok(ShiftGuard {
            platform: self.platform,
            snapshot,
            pair,
            phase: Phase::Running,
        })
    }

    fn transition(&mut self, next: Phase) {
        trace!(target: LOG_TARGET, "{} -> {next}", self.phase);
        self.phase = next;
    }
}

/// Holds an applied pair; dropping it restores the previous environment.
///
/// Dereferences to the active [`TzShift`].
#[must_use = "dropping the guard immediately restores the previous environment"]
pub struct ShiftGuard<'p, P: Platform + ?Sized> {
    platform: &'p P,
    snapshot: Snapshot,
    pair: TzShift,
    phase: Phase,
}

impl<P: Platform + ?Sized> ShiftGuard<'_, P> {
    /// The pair applied for this run.
    #[must_use]
    pub const fn pair(&self) -> &TzShift {
        &self.pair
    }

    /// Current phase: [`Phase::Running`] until the guard is dropped.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    fn restore(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.phase = Phase::Restoring;
        trace!(target: LOG_TARGET, "running -> restoring");

        if let Err(error) = self.platform.set_locale(&self.snapshot.locale) {
            warn!(
                target: LOG_TARGET,
                "failed to restore locale `{}`: {error}",
                self.snapshot.locale,
            );
        }
        match &self.snapshot.time_zone_var {
            Some(value) => self.platform.set_time_zone_var(value),
            None => self.platform.remove_time_zone_var(),
        }
        self.platform.sync_time_zone();

        self.phase = Phase::Idle;
        trace!(target: LOG_TARGET, "restoring -> idle");
    }
}

impl<P: Platform + ?Sized> Deref for ShiftGuard<'_, P> {
    type Target = TzShift;

    fn deref(&self) -> &Self::Target {
        &self.pair
    }
}

impl<P: Platform + ?Sized> Drop for ShiftGuard<'_, P> {
    fn drop(&mut self) {
        self.restore();
    }
}

/// Runs `body` with `pair` applied, restoring the host afterwards.
///
/// Restoration happens even if `body` panics; the panic then continues to
/// propagate.
///
/// # Errors
///
/// Returns [`Abstain`] without running `body` when the locale cannot be
/// applied.
///
/// # Examples
///
/// ```
/// use tzshift::TzShift;
/// use tzshift::platform::Platform;
/// use tzshift::shift::with_shift;
/// use tzshift::testing::FakePlatform;
///
/// let platform = FakePlatform::new(["Asia/Tokyo"], ["ja_JP.UTF-8"]);
///
/// let seen = with_shift(&platform, TzShift::new("Asia/Tokyo", "ja_JP.UTF-8"), |pair| {
///     assert_eq!(platform.current_locale(), "ja_JP.UTF-8");
///     pair.timezone().to_owned()
/// })?;
///
/// assert_eq!(seen, "Asia/Tokyo");
/// assert_eq!(platform.time_zone(), None);
/// assert_eq!(platform.current_locale(), "C");
/// # Ok::<(), tzshift::shift::Abstain>(())
/// ```
pub fn with_shift<P, R>(
    platform: &P,
    pair: TzShift,
    body: impl FnOnce(&TzShift) -> R,
) -> Result<R, Abstain>
where
    P: Platform + ?Sized,
{
    let guard = EnvironmentShifter::new(platform).enter(pair)?;
    Ok(body(guard.pair()))
}
