//! Integration Tests for Pipelines
//!
//! Builtin and external stages mixed in every order.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use test_utils::TestShell;

#[test]
fn test_external_to_external() {
    let mut sh = TestShell::new();
    assert_eq!(sh.output("printf 'b\\na\\n' | sort"), "a\nb\n");
}

#[test]
fn test_builtin_feeds_external() {
    let mut sh = TestShell::new();
    assert_eq!(sh.output("echo hi | tr a-z A-Z"), "HI\n");
    assert_eq!(sh.output("echo {c,a,b} | tr ' ' '\\n' | sort"), "a\nb\nc\n");
}

#[test]
fn test_three_external_stages() {
    let mut sh = TestShell::new();
    assert_eq!(sh.output("printf 'x\\ny\\nz\\n' | grep -v y | wc -l | tr -d ' '"), "2\n");
}

#[test]
fn test_external_into_builtin() {
    let mut sh = TestShell::new();
    assert_eq!(sh.output("printf 'ignored' | echo done"), "done\n");
    assert_eq!(sh.session().last_status, 0);
}

#[test]
fn test_status_is_last_stage() {
    let mut sh = TestShell::new();
    assert_eq!(sh.output("false | true; echo $?"), "0\n");
    assert_eq!(sh.output("true | false; echo $?"), "1\n");
    assert_eq!(sh.run("echo x | sh -c 'cat >/dev/null; exit 4'"), 4);
}

#[test]
fn test_quoted_pipe_is_an_argument() {
    let mut sh = TestShell::new();
    assert_eq!(sh.output("echo 'a|b' \"c|d\""), "a|b c|d\n");
}

#[test]
fn test_large_output_through_pipe() {
    let mut sh = TestShell::new();
    let out = sh.output("seq 1 20000 | tail -n 1");
    assert_eq!(out, "20000\n");
}

#[test]
fn test_large_builtin_output_into_external() {
    let mut sh = TestShell::new();
    let out = sh.output("echo {1..5000} | wc -w | tr -d ' '");
    assert_eq!(out, "5000\n");
}

#[test]
fn test_stderr_of_external_is_captured() {
    let mut sh = TestShell::new();
    sh.run("sh -c 'echo oops >&2'");
    assert_eq!(sh.err.take(), "oops\n");
    assert_eq!(sh.out.contents(), "");
}

#[test]
fn test_missing_program_aborts_pipeline_only() {
    let mut sh = TestShell::new();
    let status = sh.run("echo a | no_such_program_xyz | cat; echo after");
    assert_eq!(status, 0);
    assert_eq!(sh.out.take(), "after\n");
    assert_eq!(sh.err.take(), "no_such_program_xyz: command not found\n");
}
