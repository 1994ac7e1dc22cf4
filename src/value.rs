//! The `(timezone, locale)` pair handed to each run.

use std::fmt;
use std::ops::Index;

use crate::error::{Result, TzShiftError};
use crate::sentinel::SYSTEM;

/// Immutable `(timezone, locale)` pair active for one run.
///
/// Fields are private and there are no setters, so a pair cannot be altered
/// once built. It behaves like a two-element tuple: it has a length of 2, can
/// be indexed with `0` and `1`, iterated in order, and converted into a plain
/// tuple.
///
/// # Examples
///
/// ```
/// use tzshift::TzShift;
///
/// let pair = TzShift::new("UTC", "C");
/// let [timezone, locale]: [&str; 2] = pair.as_array();
/// assert_eq!((timezone, locale), ("UTC", "C"));
/// assert_eq!(pair.len(), 2);
/// assert_eq!(pair.get(1), Ok("C"));
/// assert!(pair.get(2).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TzShift {
    timezone: String,
    locale: String,
}

impl TzShift {
    /// Number of fields in the pair.
    pub const LEN: usize = 2;

    /// Creates a pair from a time zone and a locale.
    #[must_use]
    pub fn new(timezone: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            timezone: timezone.into(),
            locale: locale.into(),
        }
    }

    /// The pair used when no parametrisation applies: both dimensions keep the
    /// host's current setting.
    #[must_use]
    pub fn system() -> Self {
        Self::new(SYSTEM, SYSTEM)
    }

    /// Returns the time zone name (or the sentinel).
    #[must_use]
    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    /// Returns the locale name (or the sentinel).
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Always returns 2.
    #[must_use]
    pub const fn len(&self) -> usize {
        Self::LEN
    }

    /// Always returns `false`; a pair is never empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns the field at `index`: `0` is the time zone, `1` the locale.
    ///
    /// # Errors
    ///
    /// Returns [`TzShiftError::IndexOutOfRange`] for any other index.
    pub fn get(&self, index: usize) -> Result<&str> {
        match index {
            0 => Ok(&self.timezone),
            1 => Ok(&self.locale),
            _ => Err(TzShiftError::IndexOutOfRange { index }),
        }
    }

    /// Borrows both fields as an array, in positional order.
    #[must_use]
    pub fn as_array(&self) -> [&str; 2] {
        [&self.timezone, &self.locale]
    }

    /// Borrows both fields as a tuple.
    #[must_use]
    pub fn as_tuple(&self) -> (&str, &str) {
        (&self.timezone, &self.locale)
    }

    /// Iterates over the fields in positional order.
    pub fn iter(&self) -> std::array::IntoIter<&str, 2> {
        self.as_array().into_iter()
    }

    /// Consumes the pair, yielding an owned tuple.
    #[must_use]
    pub fn into_tuple(self) -> (String, String) {
        (self.timezone, self.locale)
    }
}

impl Index<usize> for TzShift {
    type Output = str;

    /// # Panics
    ///
    /// Panics when `index` is not `0` or `1`, as tuple access would fail to
    /// compile.
    fn index(&self, index: usize) -> &Self::Output {
        self.get(index).unwrap_or_else(|error| panic!("{error}"))
    }
}

impl<'a> IntoIterator for &'a TzShift {
    type Item = &'a str;
    type IntoIter = std::array::IntoIter<&'a str, 2>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<TzShift> for (String, String) {
    fn from(pair: TzShift) -> Self {
        pair.into_tuple()
    }
}

impl<T: Into<String>, L: Into<String>> From<(T, L)> for TzShift {
    fn from((timezone, locale): (T, L)) -> Self {
        Self::new(timezone, locale)
    }
}

impl fmt::Display for TzShift {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "({}, {})", self.timezone, self.locale)
    }
}
