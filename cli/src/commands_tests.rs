//! Tests for command execution against an in-memory platform.

use super::*;
use camino::Utf8PathBuf;
use clap::Parser;
use rstest::{fixture, rstest};
use tempfile::TempDir;
use tzshift::testing::{FakePlatform, RecordingSink};

#[fixture]
fn platform() -> FakePlatform {
    FakePlatform::new(["UTC", "Europe/London", "Asia/Tokyo"], ["de_DE.UTF-8"])
}

struct Project {
    _dir: TempDir,
    path: Utf8PathBuf,
}

fn project(contents: &str) -> Project {
    let dir = TempDir::new().expect("create temp dir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("tzshift.toml"))
        .unwrap_or_else(|path| panic!("non-UTF-8 temp path: {}", path.display()));
    std::fs::write(&path, contents).expect("write project file");
    Project { _dir: dir, path }
}

fn invoke(platform: &FakePlatform, args: &[&str]) -> (i32, String, String) {
    let cli = Cli::parse_from(std::iter::once("tzshift").chain(args.iter().copied()));
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = run(&cli, platform, &mut stdout, &mut stderr);
    (
        code,
        String::from_utf8(stdout).expect("UTF-8 stdout"),
        String::from_utf8(stderr).expect("UTF-8 stderr"),
    )
}

#[rstest]
fn plan_prints_identifiers_and_warnings(platform: FakePlatform) {
    let project = project("timezones = [\"UTC\", \"UTC\", \"SYSTEM\", \"Mars/Olympus\"]\nlocales = [\"C\"]\n");

    let (code, stdout, stderr) = invoke(&platform, &["plan", "--config", project.path.as_str()]);

    assert_eq!(code, 0);
    assert_eq!(stdout, "0|UTC|C\n1|sys|C\n");
    assert_eq!(
        stderr,
        "warning: tzshift: ignoring unknown time-zones: 'Mars/Olympus'\n"
    );
}

#[rstest]
fn plan_applies_function_scope_overrides(platform: FakePlatform) {
    let project = project("timezones = [\"UTC\"]\nlocales = [\"C\"]\n");

    let (code, stdout, _) = invoke(
        &platform,
        &[
            "plan",
            "--config",
            project.path.as_str(),
            "--timezones",
            "Europe/London,Asia/Tokyo",
            "--locales",
            "de_DE.UTF-8",
        ],
    );

    assert_eq!(code, 0);
    assert_eq!(
        stdout,
        "0|Europe/London|de_DE.UTF-8\n1|Asia/Tokyo|de_DE.UTF-8\n"
    );
}

#[rstest]
fn disabled_scope_plans_a_single_run(platform: FakePlatform) {
    let project = project("");

    let (code, stdout, stderr) = invoke(
        &platform,
        &["plan", "--config", project.path.as_str(), "--name", "opted_out", "--disable"],
    );

    assert_eq!(code, 0);
    assert_eq!(stdout, "opted_out (not parametrised)\n");
    assert!(stderr.is_empty());
}

#[rstest]
#[case::negative_cap(&["--tzshift-max", "-1"], "--tzshift-max cannot be negative")]
#[case::non_integer_cap(&["--tzshift-max", "lots"], "must be an integer, got 'lots'")]
#[case::empty_locales(&["--locales", "Nonexistent"], "no valid locales to test with (test `test`)")]
fn configuration_errors_exit_with_two(
    platform: FakePlatform,
    #[case] extra: &[&str],
    #[case] snippet: &str,
) {
    let project = project("timezones = [\"UTC\"]\nlocales = [\"C\"]\n");
    let mut args = vec!["plan", "--config", project.path.as_str()];
    args.extend_from_slice(extra);

    let (code, stdout, stderr) = invoke(&platform, &args);

    assert_eq!(code, EXIT_CONFIG_ERROR);
    assert!(stdout.is_empty());
    assert!(
        stderr.contains(snippet),
        "expected stderr '{stderr}' to mention '{snippet}'"
    );
}

#[rstest]
fn invalid_project_file_exits_with_two(platform: FakePlatform) {
    let project = project("max_combinations = \"a lot\"\n");

    let (code, _, stderr) = invoke(&platform, &["check", "--config", project.path.as_str()]);

    assert_eq!(code, EXIT_CONFIG_ERROR);
    assert!(stderr.contains(project.path.as_str()));
}

#[rstest]
fn check_reports_accepted_and_rejected_candidates(platform: FakePlatform) {
    let project = project(concat!(
        "timezones = [\"UTC\", \"Mars/Olympus\", \"system\"]\n",
        "locales = [\"C\", \"Nonexistent\"]\n",
        "max_combinations = 4\n",
    ));
    let args = CheckArgs {
        config: ConfigArgs {
            config: project.path.clone(),
            tzshift: tzshift::TzShiftArgs::default(),
        },
        json: false,
    };
    let sink = RecordingSink::default();

    let report = check(&args, &platform, &sink).expect("check succeeds");

    assert_eq!(report.timezones.accepted, ["UTC", "SYSTEM"]);
    assert_eq!(report.timezones.rejected, ["Mars/Olympus"]);
    assert_eq!(report.locales.accepted, ["C"]);
    assert_eq!(report.locales.rejected, ["Nonexistent"]);
    assert_eq!(report.max_combinations, "4");
    assert_eq!(sink.messages().len(), 2);
    assert_eq!(platform.current_locale(), "C");
}

#[rstest]
fn scope_node_without_overrides_has_no_directives() {
    let cli = Cli::parse_from(["tzshift", "plan", "--name", "plain"]);
    let Command::Plan(args) = cli.command else {
        panic!("expected plan command");
    };

    let node = scope_node(&args);

    assert_eq!(node.name(), "plain");
    assert_eq!(node.directives().count(), 0);
}

#[rstest]
fn scope_override_wins_over_session_flag(platform: FakePlatform) {
    let project = project("");

    let (code, stdout, stderr) = invoke(
        &platform,
        &[
            "plan",
            "--config",
            project.path.as_str(),
            "--tz-timezones",
            "Europe/London",
            "--tz-locales",
            "C",
            "--timezones",
            "Asia/Tokyo",
        ],
    );

    assert_eq!(code, 0, "stderr: {stderr}");
    assert_eq!(stdout, "0|Asia/Tokyo|C\n");
}

#[rstest]
fn negative_project_cap_names_the_project_key(platform: FakePlatform) {
    let project = project("max_combinations = -3\n");

    let (code, _, stderr) = invoke(&platform, &["plan", "--config", project.path.as_str()]);

    assert_eq!(code, EXIT_CONFIG_ERROR);
    assert!(
        stderr.contains(&format!("max_combinations in {} cannot be negative", project.path)),
        "unexpected stderr: {stderr}"
    );
    assert!(!stderr.contains("--tzshift-max"));
}
