//! Shifts applied to the real process environment.
//!
//! These tests mutate `TZ` and the C locale, so they serialise on a lock and
//! always leave the host as they found it.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, MutexGuard};

use rstest::{fixture, rstest};
use tempfile::TempDir;
use tzshift::platform::{Platform, SystemPlatform};
use tzshift::testing::RecordingSink;
use tzshift::validate::CandidateValidator;
use tzshift::{TzShift, with_shift};

static ENVIRONMENT_LOCK: Mutex<()> = Mutex::new(());

#[fixture]
fn serialised() -> MutexGuard<'static, ()> {
    ENVIRONMENT_LOCK
        .lock()
        .unwrap_or_else(|error| panic!("environment lock poisoned: {error}"))
}

fn time_zone_var() -> Option<String> {
    std::env::var("TZ").ok()
}

/// Offset from UTC that libc reports for a fixed November 2023 instant.
fn libc_utc_offset() -> i64 {
    let instant: libc::time_t = 1_700_000_000;
    // SAFETY: `tm` is plain old data, so the all-zero pattern is valid.
    let mut broken_down: libc::tm = unsafe { std::mem::zeroed() };
    // SAFETY: both pointers are valid for the duration of the call, and the
    // environment lock keeps other tests from changing `TZ` meanwhile.
    let converted = unsafe { libc::localtime_r(&instant, &mut broken_down) };
    assert!(!converted.is_null(), "localtime_r failed");
    i64::from(broken_down.tm_gmtoff)
}

#[rstest]
fn inherited_time_zone_is_restored(serialised: MutexGuard<'static, ()>) {
    let _lock = serialised;
    temp_env::with_var("TZ", Some("Europe/Paris"), || {
        let before = SystemPlatform.current_locale();

        let seen = with_shift(&SystemPlatform, TzShift::new("Asia/Tokyo", "C"), |_| {
            time_zone_var()
        })
        .unwrap_or_else(|abstain| panic!("C locale is always installed: {abstain}"));

        assert_eq!(seen.as_deref(), Some("Asia/Tokyo"));
        assert_eq!(time_zone_var().as_deref(), Some("Europe/Paris"));
        assert_eq!(SystemPlatform.current_locale(), before);
    });
}

#[rstest]
fn absent_time_zone_is_removed_again(serialised: MutexGuard<'static, ()>) {
    let _lock = serialised;
    temp_env::with_var_unset("TZ", || {
        let seen = with_shift(&SystemPlatform, TzShift::new("UTC", "C"), |_| {
            time_zone_var()
        })
        .unwrap_or_else(|abstain| panic!("C locale is always installed: {abstain}"));

        assert_eq!(seen.as_deref(), Some("UTC"));
        assert!(time_zone_var().is_none());
    });
}

#[rstest]
fn panicking_body_still_restores(serialised: MutexGuard<'static, ()>) {
    let _lock = serialised;
    temp_env::with_var("TZ", Some("Europe/Paris"), || {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            with_shift(&SystemPlatform, TzShift::new("Asia/Tokyo", "C"), |_| {
                failing_body();
            })
        }));

        assert!(outcome.is_err());
        assert_eq!(time_zone_var().as_deref(), Some("Europe/Paris"));
    });
}

#[rstest]
fn uninstalled_locale_abstains_without_changes(serialised: MutexGuard<'static, ()>) {
    let _lock = serialised;
    temp_env::with_var("TZ", Some("Europe/Paris"), || {
        let before = SystemPlatform.current_locale();

        let outcome = with_shift(
            &SystemPlatform,
            TzShift::new("Asia/Tokyo", "xx_XX.NOPE"),
            |_| failing_body(),
        );

        let abstain = outcome.expect_err("unknown locale should abstain");
        assert_eq!(abstain.locale, "xx_XX.NOPE");
        assert_eq!(time_zone_var().as_deref(), Some("Europe/Paris"));
        assert_eq!(SystemPlatform.current_locale(), before);
    });
}

fn failing_body() {
    panic!("body failed");
}

#[rstest]
fn libc_sees_the_shifted_zone_and_then_the_original(serialised: MutexGuard<'static, ()>) {
    let _lock = serialised;
    temp_env::with_var("TZ", Some("Europe/Paris"), || {
        SystemPlatform.sync_time_zone();
        assert_eq!(libc_utc_offset(), 3_600);

        let during = with_shift(&SystemPlatform, TzShift::new("Asia/Tokyo", "C"), |_| {
            libc_utc_offset()
        })
        .unwrap_or_else(|abstain| panic!("C locale is always installed: {abstain}"));

        assert_eq!(during, 32_400);
        assert_eq!(libc_utc_offset(), 3_600);
    });
}

#[rstest]
fn zones_missing_from_the_host_database_are_rejected(serialised: MutexGuard<'static, ()>) {
    let _lock = serialised;
    let empty = TempDir::new().expect("create temp dir");

    temp_env::with_var("TZDIR", Some(empty.path()), || {
        let sink = RecordingSink::default();
        let validator = CandidateValidator::new(&SystemPlatform, &sink);

        assert!(!SystemPlatform.has_time_zone("Asia/Tokyo"));
        assert_eq!(
            validator.validate_timezones(&["Asia/Tokyo".to_owned(), "SYSTEM".to_owned()]),
            ["SYSTEM"]
        );
        assert_eq!(
            sink.messages(),
            ["tzshift: ignoring unknown time-zones: 'Asia/Tokyo'"]
        );
    });
}

#[rstest]
fn locale_probes_leave_the_host_locale_untouched(serialised: MutexGuard<'static, ()>) {
    let _lock = serialised;
    let before = SystemPlatform.current_locale();
    let sink = RecordingSink::default();
    let validator = CandidateValidator::new(&SystemPlatform, &sink);

    let accepted = validator.validate_locales(&["C".to_owned(), "xx_XX.NOPE".to_owned()]);

    assert_eq!(accepted, ["C"]);
    assert_eq!(SystemPlatform.current_locale(), before);
}
