//! Output formatting for `plan` and `check`.
//!
//! Each report renders either as plain text or as pretty-printed JSON.

use std::cell::RefCell;
use std::io::Write;

use serde::Serialize;
use tzshift::Plan;
use tzshift::diagnostics::WarningSink;
use tzshift::sentinel::is_system;

/// Runs planned for one test.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlanReport {
    /// Name of the planned test.
    pub test: String,
    /// Whether runs were registered; `false` means a single sentinel run.
    pub parametrized: bool,
    /// Runs in execution order.
    pub runs: Vec<RunEntry>,
}

/// One planned run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunEntry {
    /// Run identifier; absent for an unparametrised run.
    pub id: Option<String>,
    /// Time zone applied for the run.
    pub timezone: String,
    /// Locale applied for the run.
    pub locale: String,
}

impl PlanReport {
    /// Builds the report for `test` from its plan.
    #[must_use]
    pub fn new(test: &str, plan: Plan) -> Self {
        let parametrized = matches!(plan, Plan::Matrix(_));
        let runs = plan
            .into_runs()
            .into_iter()
            .map(|(id, pair)| {
                let (timezone, locale) = pair.into_tuple();
                RunEntry {
                    id,
                    timezone,
                    locale,
                }
            })
            .collect();
        Self {
            test: test.to_owned(),
            parametrized,
            runs,
        }
    }

    /// One identifier per line, or a note for an unparametrised test.
    ///
    /// # Examples
    ///
    /// ```
    /// use tzshift::Plan;
    /// use tzshift_cli::output::PlanReport;
    ///
    /// let report = PlanReport::new("formats_dates", Plan::Single);
    /// assert_eq!(report.format_human(), "formats_dates (not parametrised)");
    /// ```
    #[must_use]
    pub fn format_human(&self) -> String {
        if !self.parametrized {
            return format!("{} (not parametrised)", self.test);
        }
        self.runs
            .iter()
            .filter_map(|run| run.id.as_deref())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Pretty-printed JSON.
    #[must_use]
    pub fn format_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_owned())
    }
}

/// Candidates of one dimension split by host support.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Dimension {
    /// Candidates the host supports, sentinel included.
    pub accepted: Vec<String>,
    /// Candidates the host rejected.
    pub rejected: Vec<String>,
}

impl Dimension {
    /// Derives the rejected candidates from `raw` and the `accepted` subset.
    #[must_use]
    pub fn from_validation(raw: &[String], accepted: Vec<String>) -> Self {
        let rejected = raw
            .iter()
            .filter(|candidate| !is_system(candidate) && !accepted.contains(*candidate))
            .cloned()
            .collect();
        Self { accepted, rejected }
    }

    fn format_into(&self, heading: &str, output: &mut String) {
        output.push_str(heading);
        output.push_str(":\n");
        output.push_str(&format!("  accepted: {}\n", join_or_none(&self.accepted)));
        output.push_str(&format!("  rejected: {}\n", join_or_none(&self.rejected)));
    }
}

/// Candidates the host supports, as seen by `check`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Whether the engine is enabled.
    pub enabled: bool,
    /// Effective combination cap.
    pub max_combinations: String,
    /// Time-zone candidates.
    pub timezones: Dimension,
    /// Locale candidates.
    pub locales: Dimension,
}

impl CheckReport {
    /// Human-readable summary.
    #[must_use]
    pub fn format_human(&self) -> String {
        let mut output = String::new();
        self.timezones.format_into("time-zones", &mut output);
        self.locales.format_into("locales", &mut output);
        output.push_str(&format!("max combinations: {}\n", self.max_combinations));
        output.push_str(&format!(
            "enabled: {}",
            if self.enabled { "yes" } else { "no" }
        ));
        output
    }

    /// Pretty-printed JSON.
    #[must_use]
    pub fn format_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_owned())
    }
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_owned()
    } else {
        values.join(", ")
    }
}

/// [`WarningSink`] writing `warning: ...` lines to a writer such as stderr.
pub struct WriterSink<W: Write> {
    writer: RefCell<W>,
}

impl<W: Write> WriterSink<W> {
    /// Wraps `writer`.
    pub const fn new(writer: W) -> Self {
        Self {
            writer: RefCell::new(writer),
        }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write> WarningSink for WriterSink<W> {
    fn warn(&self, message: &str) {
        if writeln!(self.writer.borrow_mut(), "warning: {message}").is_err() {
            // Best-effort reporting; ignore write failures.
        }
    }
}
