//! Recognition of the "leave the host setting alone" marker.
//!
//! Candidate lists may contain the marker [`SYSTEM`] (in any case, with any
//! surrounding whitespace) or an empty entry. Both mean the run keeps whatever
//! time zone or locale the process already had.

/// Canonical spelling of the sentinel marker.
pub const SYSTEM: &str = "SYSTEM";

/// Short token used in place of the sentinel when rendering run identifiers.
pub const PRETTY_SYSTEM: &str = "sys";

/// Returns `true` when `value` denotes the sentinel `marker`.
///
/// The comparison trims surrounding whitespace and ignores case. An empty (or
/// whitespace-only) value also counts as the sentinel. A missing value does
/// not: `None` means nothing was supplied, which is a different state from
/// "use the system default".
///
/// # Examples
///
/// ```
/// use tzshift::sentinel::{SYSTEM, is_sentinel};
///
/// assert!(is_sentinel(Some(" system "), SYSTEM));
/// assert!(is_sentinel(Some(""), SYSTEM));
/// assert!(!is_sentinel(Some("UTC"), SYSTEM));
/// assert!(!is_sentinel(None, SYSTEM));
/// ```
#[must_use]
pub fn is_sentinel(value: Option<&str>, marker: &str) -> bool {
    value.is_some_and(|raw| {
        let trimmed = raw.trim();
        trimmed.is_empty() || trimmed.to_uppercase() == marker
    })
}

/// Shorthand for [`is_sentinel`] against the [`SYSTEM`] marker.
#[must_use]
pub fn is_system(value: &str) -> bool {
    is_sentinel(Some(value), SYSTEM)
}

/// Renders a candidate for a run identifier, collapsing the sentinel to
/// [`PRETTY_SYSTEM`].
#[must_use]
pub fn pretty(value: &str) -> &str {
    if is_system(value) {
        PRETTY_SYSTEM
    } else {
        value
    }
}
