//! Running a suite without hitting the time limit.

use crate::prelude::*;

/// > All tests pass: exit 0 with a summary line
#[test]
fn passing_suite_exits_zero() {
    let mut temp = Project::empty();
    temp.test("one", "true").test("two", "true");

    run()
        .pwd(temp.path())
        .passes()
        .stdout_has("2 passed")
        .stdout_lacks("FAIL");
}

/// > A failing test exits 1 and shows its message
#[test]
fn failing_test_exits_one() {
    let mut temp = Project::empty();
    temp.test("good", "true")
        .test("bad", "echo broken >&2; exit 3");

    run()
        .pwd(temp.path())
        .fails()
        .stdout_has("FAIL  bad")
        .stdout_has("exited with status 3")
        .stdout_has("broken")
        .stdout_has("1 passed, 1 failed");
}

/// > Passing tests are listed only with --verbose
#[test]
fn verbose_lists_passing_tests() {
    let mut temp = Project::empty();
    temp.test("quiet", "true");

    run().pwd(temp.path()).passes().stdout_lacks("PASS  quiet");
    run()
        .pwd(temp.path())
        .args(["--verbose"])
        .passes()
        .stdout_has("PASS  quiet");
}

/// > A single fast test under a generous limit passes with no timeout message
#[test]
fn single_test_under_limit_passes() {
    let mut temp = Project::empty();
    temp.config("timeout = 1").test("fast", "sleep 0.5");

    run()
        .pwd(temp.path())
        .passes()
        .stdout_has("1 passed")
        .stdout_lacks("exceeded timeout");
}

/// > --filter runs only matching tests
#[test]
fn filter_selects_tests_by_glob() {
    let mut temp = Project::empty();
    temp.test("unit_a", "true")
        .test("unit_b", "true")
        .test("slow_c", "false");

    run()
        .pwd(temp.path())
        .args(["--filter", "unit_*"])
        .passes()
        .stdout_has("2 passed");
}

/// > Tests run in the project directory, with a per-test cwd and env
#[test]
fn tests_see_configured_cwd_and_env() {
    let temp = Project::empty();
    temp.file("sub/marker", "");
    temp.raw_config(
        "version = 1\n\n[[test]]\nname = \"cwd\"\nrun = \"test -f marker\"\ncwd = \"sub\"\n\n[[test]]\nname = \"env\"\nrun = 'test \"$GREETING\" = hello'\nenv = { GREETING = \"hello\" }\n",
    );

    run().pwd(temp.path()).passes().stdout_has("2 passed");
}

/// > Config is discovered from a subdirectory
#[test]
fn config_found_from_subdirectory() {
    let mut temp = Project::empty();
    temp.test("one", "true");
    temp.file("nested/deeper/.keep", "");

    run()
        .pwd(temp.path().join("nested/deeper"))
        .passes()
        .stdout_has("1 passed");
}
