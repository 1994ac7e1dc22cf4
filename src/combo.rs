//! Expansion of validated candidates into run descriptors.
//!
//! The matrix is the Cartesian product of time zones and locales in
//! timezone-major order. Exact duplicate pairs are dropped, an optional cap
//! truncates the list (with one warning), and every surviving pair receives a
//! stable identifier such as `0|UTC|C` or `07|sys|de_DE.UTF-8`.

use std::collections::HashSet;

use crate::config::MaxCombinations;
use crate::diagnostics::WarningSink;
use crate::sentinel::pretty;
use crate::value::TzShift;

/// Separator between the index, time zone and locale of an identifier.
pub const ID_SEPARATOR: char = '|';

/// One generated execution of a test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunDescriptor {
    id: String,
    pair: TzShift,
}

impl RunDescriptor {
    /// The run identifier, unique within its test.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The pair applied for this run.
    #[must_use]
    pub const fn pair(&self) -> &TzShift {
        &self.pair
    }

    /// Splits the descriptor into its identifier and pair.
    #[must_use]
    pub fn into_parts(self) -> (String, TzShift) {
        (self.id, self.pair)
    }
}

impl From<(String, TzShift)> for RunDescriptor {
    fn from((id, pair): (String, TzShift)) -> Self {
        Self { id, pair }
    }
}

/// Builds the run list for one test.
///
/// # Examples
///
/// ```
/// use tzshift::combo::generate;
/// use tzshift::config::MaxCombinations;
/// use tzshift::diagnostics::LogSink;
///
/// let timezones = vec!["UTC".to_owned(), "UTC".to_owned(), "SYSTEM".to_owned()];
/// let locales = vec!["C".to_owned()];
///
/// let runs = generate(&timezones, &locales, MaxCombinations::UNLIMITED, &LogSink);
/// let ids: Vec<&str> = runs.iter().map(|run| run.id()).collect();
/// assert_eq!(ids, ["0|UTC|C", "1|sys|C"]);
/// ```
pub fn generate(
    timezones: &[String],
    locales: &[String],
    cap: MaxCombinations,
    sink: &dyn WarningSink,
) -> Vec<RunDescriptor> {
    let mut seen = HashSet::new();
    let mut pairs: Vec<(&str, &str)> = timezones
        .iter()
        .flat_map(|timezone| {
            locales
                .iter()
                .map(move |locale| (timezone.as_str(), locale.as_str()))
        })
        .filter(|pair| seen.insert(*pair))
        .collect();

    if let Some(limit) = cap.limit() {
        let total = pairs.len();
        if total > limit {
            sink.warn(&format!(
                "tzshift: limiting parameterisation to first {limit} of {total} combinations \
                 (see --tzshift-max)"
            ));
            pairs.truncate(limit);
        }
    }

    let width = index_width(pairs.len());
    pairs
        .into_iter()
        .enumerate()
        .map(|(index, (timezone, locale))| RunDescriptor {
            id: format!(
                "{index:0width$}{ID_SEPARATOR}{}{ID_SEPARATOR}{}",
                pretty(timezone),
                pretty(locale),
            ),
            pair: TzShift::new(timezone, locale),
        })
        .collect()
}

/// Decimal digits needed for the largest index of a `count`-long list.
fn index_width(count: usize) -> usize {
    count.saturating_sub(1).to_string().len()
}
