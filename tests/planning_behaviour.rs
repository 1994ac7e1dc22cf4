//! Behaviour-driven tests covering matrix expansion and scope precedence.

use std::cell::{Cell, RefCell};

mod support;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use support::values::{StepList, StepScope, StepText};
use tzshift::config::{MaxCombinations, Settings};
use tzshift::plan::{Plan, Planner};
use tzshift::scope::{Directive, ScopeKind, TestNode};
use tzshift::testing::{FakePlatform, RecordingSink};
use tzshift::{TzShift, TzShiftError};

struct PlanningWorld {
    platform: FakePlatform,
    sink: RecordingSink,
    timezones: RefCell<Vec<String>>,
    locales: RefCell<Vec<String>>,
    cap: Cell<usize>,
    enabled: Cell<bool>,
    directives: RefCell<Vec<(ScopeKind, Directive)>>,
    outcome: RefCell<Option<Result<Plan, TzShiftError>>>,
}

impl Default for PlanningWorld {
    fn default() -> Self {
        Self {
            platform: FakePlatform::new(
                ["UTC", "Europe/London", "Asia/Tokyo", "America/New_York"],
                ["de_DE.UTF-8"],
            ),
            sink: RecordingSink::default(),
            timezones: RefCell::new(Vec::new()),
            locales: RefCell::new(Vec::new()),
            cap: Cell::new(0),
            enabled: Cell::new(true),
            directives: RefCell::new(Vec::new()),
            outcome: RefCell::new(None),
        }
    }
}

#[fixture]
fn world() -> PlanningWorld {
    PlanningWorld::default()
}

fn planned(world: &PlanningWorld) -> Plan {
    match world.outcome.borrow().as_ref() {
        Some(Ok(plan)) => plan.clone(),
        Some(Err(error)) => panic!("expected planning to succeed: {error}"),
        None => panic!("the test should have been planned"),
    }
}

#[given("the session time-zones {list}")]
fn session_timezones(world: &PlanningWorld, list: StepList) {
    world.timezones.replace(list.into_inner());
}

#[given("the session locales {list}")]
fn session_locales(world: &PlanningWorld, list: StepList) {
    world.locales.replace(list.into_inner());
}

#[given("a combination cap of {limit}")]
fn combination_cap(world: &PlanningWorld, limit: usize) {
    world.cap.set(limit);
}

#[given("the engine is disabled")]
fn engine_disabled(world: &PlanningWorld) {
    world.enabled.set(false);
}

#[given("a {scope} override of time-zones {list}")]
fn timezone_override(world: &PlanningWorld, scope: StepScope, list: StepList) {
    world.directives.borrow_mut().push((
        scope.into_inner(),
        Directive::new().timezones(list.into_inner()),
    ));
}

#[given("a {scope} override of locales {list}")]
fn locale_override(world: &PlanningWorld, scope: StepScope, list: StepList) {
    world.directives.borrow_mut().push((
        scope.into_inner(),
        Directive::new().locales(list.into_inner()),
    ));
}

#[given("a {scope} override disabling parametrisation")]
fn disable_override(world: &PlanningWorld, scope: StepScope) {
    world
        .directives
        .borrow_mut()
        .push((scope.into_inner(), Directive::disabled()));
}

#[when("the test {name} is planned")]
fn plan_test(world: &PlanningWorld, name: StepText) {
    let mut settings = Settings::new(
        world.timezones.borrow().clone(),
        world.locales.borrow().clone(),
    )
    .with_max_combinations(MaxCombinations::new(world.cap.get()));
    if !world.enabled.get() {
        settings = settings.disabled();
    }
    let node = world
        .directives
        .borrow()
        .iter()
        .cloned()
        .fold(TestNode::new(name.into_inner()), |test, (kind, directive)| {
            test.with_directive(kind, directive)
        });

    let planner = Planner::new(settings, &world.platform, &world.sink);
    world.outcome.replace(Some(planner.expand(&node)));
}

#[then("{count} runs are planned")]
fn run_count(world: &PlanningWorld, count: usize) {
    assert_eq!(planned(world).len(), count);
}

#[then("the run identifiers are {ids}")]
fn run_identifiers(world: &PlanningWorld, ids: StepList) {
    let Plan::Matrix(runs) = planned(world) else {
        panic!("expected the test to be parametrised");
    };
    let actual: Vec<&str> = runs.iter().map(|run| run.id()).collect();

    assert_eq!(actual, ids.into_inner());
}

#[then("the test runs once with the sentinel pair")]
fn runs_once(world: &PlanningWorld) {
    assert_eq!(planned(world).into_runs(), vec![(None, TzShift::system())]);
}

#[then("no warning is reported")]
fn no_warning(world: &PlanningWorld) {
    assert!(world.sink.messages().is_empty());
}

#[then("the warning {message} is reported")]
fn warning_reported(world: &PlanningWorld, message: StepText) {
    assert_eq!(world.sink.messages(), vec![message.into_inner()]);
}

#[then("planning fails with {message}")]
fn planning_fails(world: &PlanningWorld, message: StepText) {
    match world.outcome.borrow().as_ref() {
        Some(Err(error)) => assert_eq!(error.to_string(), message.into_inner()),
        Some(Ok(plan)) => panic!("expected planning to fail but got {plan:?}"),
        None => panic!("the test should have been planned"),
    }
}

#[scenario("tests/features/matrix_expansion.feature", index = 0)]
fn scenario_duplicates_collapse(world: PlanningWorld) {
    let _ = world;
}

#[scenario("tests/features/matrix_expansion.feature", index = 1)]
fn scenario_cap_truncates(world: PlanningWorld) {
    let _ = world;
}

#[scenario("tests/features/matrix_expansion.feature", index = 2)]
fn scenario_unavailable_locales(world: PlanningWorld) {
    let _ = world;
}

#[scenario("tests/features/matrix_expansion.feature", index = 3)]
fn scenario_empty_dimension(world: PlanningWorld) {
    let _ = world;
}

#[scenario("tests/features/scope_precedence.feature", index = 0)]
fn scenario_function_beats_module(world: PlanningWorld) {
    let _ = world;
}

#[scenario("tests/features/scope_precedence.feature", index = 1)]
fn scenario_overrides_replace(world: PlanningWorld) {
    let _ = world;
}

#[scenario("tests/features/scope_precedence.feature", index = 2)]
fn scenario_disable_inside_override(world: PlanningWorld) {
    let _ = world;
}

#[scenario("tests/features/scope_precedence.feature", index = 3)]
fn scenario_engine_switch(world: PlanningWorld) {
    let _ = world;
}
