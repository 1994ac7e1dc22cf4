//! Minimal host for running shifted tests from plain Rust code.
//!
//! [`Suite::run`] plans every case before executing anything, so a
//! configuration error aborts the session with no body run. Runs then execute
//! one at a time in generation order, each wrapped by the shifter. Panics in a
//! body are caught after the environment has been restored and reported as
//! failures; abstentions and [`BodyError::Skip`] are reported as skipped.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use log::{debug, info};
use thiserror::Error;

use crate::error::Result;
use crate::plan::Planner;
use crate::platform::Platform;
use crate::scope::TestNode;
use crate::shift::with_shift;
use crate::value::TzShift;

const LOG_TARGET: &str = "tzshift::harness";

/// Non-passing outcome reported by a test body.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BodyError {
    /// The body failed.
    #[error("{0}")]
    Fail(String),
    /// The body chose not to run under this pair.
    #[error("skipped: {0}")]
    Skip(String),
}

impl BodyError {
    /// Builds a failure.
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(message.into())
    }

    /// Builds a skip.
    pub fn skip(reason: impl Into<String>) -> Self {
        Self::Skip(reason.into())
    }
}

/// What a test body returns.
pub type BodyResult = std::result::Result<(), BodyError>;

type Body = Box<dyn Fn(&TzShift) -> BodyResult>;

/// A named test and its body.
pub struct TestCase {
    node: TestNode,
    body: Body,
}

impl TestCase {
    /// Wraps `body` for the test described by `node`.
    pub fn new<F>(node: TestNode, body: F) -> Self
    where
        F: Fn(&TzShift) -> BodyResult + 'static,
    {
        Self {
            node,
            body: Box::new(body),
        }
    }

    /// The test and its scopes.
    #[must_use]
    pub const fn node(&self) -> &TestNode {
        &self.node
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("TestCase")
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}

/// How one run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The body returned `Ok`.
    Passed,
    /// The body returned [`BodyError::Fail`] or panicked.
    Failed(String),
    /// The body skipped, or the run abstained.
    Skipped(String),
}

/// One executed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunRecord {
    /// Name of the test.
    pub test: String,
    /// Run identifier; `None` for an unparametrised run.
    pub id: Option<String>,
    /// Pair the body ran under.
    pub pair: TzShift,
    /// Result of the run.
    pub outcome: RunOutcome,
}

impl RunRecord {
    /// Display label such as `formats_dates[0|UTC|C]`.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => format!("{}[{id}]", self.test),
            None => self.test.clone(),
        }
    }
}

/// Records of a suite run, in execution order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    records: Vec<RunRecord>,
}

impl Report {
    /// Every run, in execution order.
    #[must_use]
    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    /// Number of passed runs.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(|outcome| matches!(outcome, RunOutcome::Passed))
    }

    /// Number of failed runs.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, RunOutcome::Failed(_)))
    }

    /// Number of skipped runs.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, RunOutcome::Skipped(_)))
    }

    /// Whether no run failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, predicate: impl Fn(&RunOutcome) -> bool) -> usize {
        self.records
            .iter()
            .filter(|record| predicate(&record.outcome))
            .count()
    }
}

/// An ordered collection of test cases.
///
/// # Examples
///
/// ```
/// use tzshift::config::Settings;
/// use tzshift::harness::{Suite, TestCase};
/// use tzshift::plan::Planner;
/// use tzshift::scope::TestNode;
/// use tzshift::testing::{FakePlatform, RecordingSink};
///
/// let platform = FakePlatform::new(["UTC", "Asia/Tokyo"], ["C"]);
/// let sink = RecordingSink::default();
/// let planner = Planner::new(Settings::new(["UTC", "Asia/Tokyo"], ["C"]), &platform, &sink);
///
/// let suite = Suite::new().with_case(TestCase::new(TestNode::new("formats_dates"), |_| Ok(())));
/// let report = suite.run(&planner)?;
///
/// assert_eq!(report.passed(), 2);
/// # Ok::<(), tzshift::TzShiftError>(())
/// ```
#[derive(Debug, Default)]
pub struct Suite {
    cases: Vec<TestCase>,
}

impl Suite {
    /// Creates an empty suite.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `case`.
    #[must_use]
    pub fn with_case(mut self, case: TestCase) -> Self {
        self.cases.push(case);
        self
    }

    /// Appends `case` in place.
    pub fn push(&mut self, case: TestCase) {
        self.cases.push(case);
    }

    /// The cases in declaration order.
    #[must_use]
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Plans and executes every case.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error met while planning; no body
    /// has run in that case.
    pub fn run<P: Platform + ?Sized>(&self, planner: &Planner<'_, P>) -> Result<Report> {
        let plans = self
            .cases
            .iter()
            .map(|case| planner.expand(case.node()).map(|plan| (case, plan)))
            .collect::<Result<Vec<_>>>()?;

        let platform = planner.resolver().validator().platform();
        let mut report = Report::default();
        for (case, plan) in plans {
            debug!(
                target: LOG_TARGET,
                "running `{}` {} time(s)",
                case.node.name(),
                plan.len(),
            );
            for (id, pair) in plan.into_runs() {
                let outcome = execute(platform, pair.clone(), case.body.as_ref());
                let record = RunRecord {
                    test: case.node.name().to_owned(),
                    id,
                    pair,
                    outcome,
                };
                info!(target: LOG_TARGET, "{} ... {:?}", record.label(), record.outcome);
                report.records.push(record);
            }
        }
        Ok(report)
    }
}

fn execute<P: Platform + ?Sized>(
    platform: &P,
    pair: TzShift,
    body: &dyn Fn(&TzShift) -> BodyResult,
) -> RunOutcome {
    match catch_unwind(AssertUnwindSafe(|| with_shift(platform, pair, body))) {
        Err(payload) => RunOutcome::Failed(panic_message(payload.as_ref())),
        Ok(Err(abstain)) => RunOutcome::Skipped(abstain.to_string()),
        Ok(Ok(Err(BodyError::Skip(reason)))) => RunOutcome::Skipped(reason),
        Ok(Ok(Err(BodyError::Fail(message)))) => RunOutcome::Failed(message),
        Ok(Ok(Ok(()))) => RunOutcome::Passed,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(|message| (*message).to_owned()))
        .unwrap_or_else(|| "test body panicked with a non-string payload".to_owned())
}
