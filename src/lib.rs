//! Run the same test logic under many time-zone and locale combinations.
//!
//! The engine resolves, for every collected test, the time zones and locales
//! it should be swept over, expands them into uniquely labelled runs, and
//! applies each `(timezone, locale)` pair to the process for exactly one run
//! before restoring the previous environment.
//!
//! Candidates come from `tzshift.toml` and command-line flags, may be
//! replaced per function, suite or module through [`scope::Directive`]s, and
//! are filtered against what the host actually supports. The marker `SYSTEM`
//! means "leave this setting alone".
//!
//! ```
//! use tzshift::config::Settings;
//! use tzshift::harness::{BodyError, Suite, TestCase};
//! use tzshift::plan::Planner;
//! use tzshift::scope::TestNode;
//! use tzshift::testing::{FakePlatform, RecordingSink};
//!
//! let platform = FakePlatform::new(["UTC", "Asia/Tokyo"], ["de_DE.UTF-8"]);
//! let sink = RecordingSink::default();
//! let planner = Planner::new(
//!     Settings::new(["UTC", "Asia/Tokyo"], ["C", "de_DE.UTF-8"]),
//!     &platform,
//!     &sink,
//! );
//!
//! let suite = Suite::new().with_case(TestCase::new(TestNode::new("formats_dates"), |pair| {
//!     let (timezone, locale) = pair.as_tuple();
//!     if timezone.is_empty() || locale.is_empty() {
//!         return Err(BodyError::fail("empty pair"));
//!     }
//!     Ok(())
//! }));
//!
//! let report = suite.run(&planner)?;
//! assert_eq!(report.passed(), 4);
//! # Ok::<(), tzshift::TzShiftError>(())
//! ```

pub mod args;
pub mod combo;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod harness;
pub mod plan;
pub mod platform;
pub mod resolve;
pub mod scope;
pub mod sentinel;
pub mod shift;
pub mod validate;
pub mod value;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use args::TzShiftArgs;
pub use config::{MaxCombinations, ProjectConfig, Settings};
pub use error::{PlatformError, Result, TzShiftError};
pub use plan::{FIXTURE_NAME, Parametrize, Plan, Planner};
pub use platform::{Platform, SystemPlatform};
pub use sentinel::{SYSTEM, is_sentinel};
pub use shift::{Abstain, EnvironmentShifter, ShiftGuard, with_shift};
pub use value::TzShift;
