//! Output formats and color handling.

use crate::prelude::*;

/// > JSON output has a timestamp, per-test outcomes, and totals
#[test]
fn json_report_shape() {
    let mut temp = Project::empty();
    temp.test("ok", "true").test("broken", "exit 1");

    let json = run().pwd(temp.path()).json().exits(1);

    assert!(json.require("timestamp").as_str().unwrap().ends_with('Z'));
    assert_eq!(json.require("passed"), false);
    assert_eq!(json.require("timed_out"), false);
    assert!(json.value().get("aborted").is_none());
    assert!(json.value().get("banner").is_none());
    assert!(json.require("duration_ms").is_u64());

    assert_eq!(json.test("ok")["status"], "passed");
    let broken = json.test("broken");
    assert_eq!(broken["status"], "failed");
    assert!(
        broken["message"]
            .as_str()
            .unwrap()
            .contains("exited with status 1")
    );
}

/// > NO_COLOR disables ANSI escapes
#[test]
fn no_color_env_disables_color() {
    let mut temp = Project::empty();
    temp.test("bad", "false");

    run()
        .pwd(temp.path())
        .env("NO_COLOR", "1")
        .fails()
        .stdout_lacks("\x1b[");
}

/// > --color forces ANSI escapes even when piped
#[test]
fn color_flag_forces_color() {
    let mut temp = Project::empty();
    temp.test("bad", "false");

    run()
        .pwd(temp.path())
        .args(["--color"])
        .fails()
        .stdout_has("\x1b[");
}

/// > --color and --no-color together is a usage error
#[test]
fn conflicting_color_flags_rejected() {
    let mut temp = Project::empty();
    temp.test("never", "true");

    run()
        .pwd(temp.path())
        .args(["--color", "--no-color"])
        .exits(2)
        .stderr_has("cannot be used together");
}
