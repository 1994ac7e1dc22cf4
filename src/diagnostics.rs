//! Warning channel for recoverable problems.
//!
//! Unknown candidates and truncated matrices are not fatal; they are reported
//! once through a [`WarningSink`] and planning carries on. [`LogSink`] routes
//! them to the `log` facade so any installed logger picks them up.

use log::warn;

/// Log target used for warnings emitted through [`LogSink`].
pub const WARNING_TARGET: &str = "tzshift::warnings";

/// Receives human-readable warnings produced while planning runs.
pub trait WarningSink {
    /// Reports one warning.
    fn warn(&self, message: &str);
}

/// [`WarningSink`] that forwards to [`log::warn!`].
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl WarningSink for LogSink {
    fn warn(&self, message: &str) {
        warn!(target: WARNING_TARGET, "{message}");
    }
}

impl<S: WarningSink + ?Sized> WarningSink for &S {
    fn warn(&self, message: &str) {
        (**self).warn(message);
    }
}

/// Formats a list of rejected candidates as `'a', 'b'`.
pub(crate) fn quoted_list(values: &[String]) -> String {
    values
        .iter()
        .map(|value| format!("'{value}'"))
        .collect::<Vec<_>>()
        .join(", ")
}
