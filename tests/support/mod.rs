//! Shared test support for behaviour-driven suites.
//!
//! Exposes the `values` helpers (`StepList`, `StepText`, `StepScope`) that
//! parse quoted step parameters so scenarios feed consistent values into the
//! planner.
pub mod values;
