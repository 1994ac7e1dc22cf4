//! Collection-time hook turning tests into registered runs.
//!
//! A [`Planner`] owns the session [`Settings`] and a [`ConfigResolver`]. For
//! each collected test it either leaves the test alone (the engine or a scope
//! is disabled, so the fixture falls back to the sentinel pair) or registers
//! the generated runs with the host under [`FIXTURE_NAME`].

use log::debug;

use crate::combo::{RunDescriptor, generate};
use crate::config::Settings;
use crate::diagnostics::WarningSink;
use crate::error::Result;
use crate::platform::Platform;
use crate::resolve::{ConfigResolver, Resolution};
use crate::scope::TestNode;
use crate::validate::CandidateValidator;
use crate::value::TzShift;

/// Fixture name under which runs are registered.
pub const FIXTURE_NAME: &str = "tzshift";

/// Host call materialising one execution per pair.
///
/// `pairs` and `ids` have equal length and matching order.
pub trait Parametrize {
    /// Registers `pairs` for `fixture`, labelled with `ids`.
    fn parametrize(&mut self, fixture: &str, pairs: Vec<TzShift>, ids: Vec<String>);
}

/// How a test will execute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Plan {
    /// Nothing registered; the test runs once with the sentinel pair.
    Single,
    /// One run per descriptor, in generation order.
    Matrix(Vec<RunDescriptor>),
}

impl Plan {
    /// Number of executions this plan produces.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single => 1,
            Self::Matrix(runs) => runs.len(),
        }
    }

    /// Always `false`: every plan runs the test at least once.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The pairs to execute, paired with their identifiers.
    ///
    /// A [`Plan::Single`] yields one unlabelled sentinel run.
    #[must_use]
    pub fn into_runs(self) -> Vec<(Option<String>, TzShift)> {
        match self {
            Self::Single => vec![(None, TzShift::system())],
            Self::Matrix(runs) => runs
                .into_iter()
                .map(|run| {
                    let (id, pair) = run.into_parts();
                    (Some(id), pair)
                })
                .collect(),
        }
    }
}

/// Plans every collected test of a session.
///
/// Session lists are validated lazily: a session whose tests are all
/// disabled never probes the host.
///
/// # Examples
///
/// ```
/// use tzshift::config::Settings;
/// use tzshift::plan::{Plan, Planner};
/// use tzshift::scope::TestNode;
/// use tzshift::testing::{FakePlatform, RecordingSink};
///
/// let platform = FakePlatform::new(["UTC", "Asia/Tokyo"], ["de_DE.UTF-8"]);
/// let sink = RecordingSink::default();
/// let planner = Planner::new(Settings::new(["UTC", "Asia/Tokyo"], ["C"]), &platform, &sink);
///
/// let Plan::Matrix(runs) = planner.expand(&TestNode::new("formats_dates"))? else {
///     panic!("expected a matrix");
/// };
/// let ids: Vec<&str> = runs.iter().map(|run| run.id()).collect();
/// assert_eq!(ids, ["0|UTC|C", "1|Asia/Tokyo|C"]);
/// # Ok::<(), tzshift::TzShiftError>(())
/// ```
pub struct Planner<'a, P: Platform + ?Sized> {
    settings: Settings,
    resolver: ConfigResolver<'a, P>,
}

impl<'a, P: Platform + ?Sized> Planner<'a, P> {
    /// Creates a planner validating against `platform` and warning to `sink`.
    #[must_use]
    pub fn new(settings: Settings, platform: &'a P, sink: &'a dyn WarningSink) -> Self {
        let resolver = ConfigResolver::new(
            CandidateValidator::new(platform, sink),
            settings.timezones().to_vec(),
            settings.locales().to_vec(),
        );
        Self { settings, resolver }
    }

    /// The session settings.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The resolver holding the validated session lists.
    #[must_use]
    pub const fn resolver(&self) -> &ConfigResolver<'a, P> {
        &self.resolver
    }

    /// Decides how `node` executes without registering anything.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a dimension resolves empty.
    pub fn expand(&self, node: &TestNode) -> Result<Plan> {
        if !self.settings.is_enabled() {
            debug!(target: "tzshift::plan", "engine disabled; `{}` runs once", node.name());
            return Ok(Plan::Single);
        }
        match self.resolver.resolve(node)? {
            Resolution::Disabled => Ok(Plan::Single),
            Resolution::Parametrized { timezones, locales } => Ok(Plan::Matrix(generate(
                &timezones,
                &locales,
                self.settings.max_combinations(),
                self.resolver.validator().sink(),
            ))),
        }
    }

    /// Plans `node` and registers its runs through `registrar`.
    ///
    /// Nothing is registered for a [`Plan::Single`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a dimension resolves empty.
    pub fn plan(&self, node: &TestNode, registrar: &mut dyn Parametrize) -> Result<Plan> {
        let plan = self.expand(node)?;
        if let Plan::Matrix(runs) = &plan {
            let (ids, pairs): (Vec<String>, Vec<TzShift>) = runs
                .iter()
                .map(|run| (run.id().to_owned(), run.pair().clone()))
                .unzip();
            registrar.parametrize(FIXTURE_NAME, pairs, ids);
        }
        Ok(plan)
    }
}
