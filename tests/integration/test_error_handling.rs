//! Integration Tests for Error Handling
//!
//! Failures are reported on the error sink with an exit status; the
//! session keeps going.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use std::fs;
use std::os::unix::fs::PermissionsExt;

use tempfile::TempDir;
use test_utils::{create_test_env, write_file, TestShell};

#[test]
fn test_command_not_found() {
    let mut sh = TestShell::new();
    assert_eq!(sh.output("nonexistent_cmd; echo $?"), "127\n");
    assert_eq!(sh.err.take(), "nonexistent_cmd: command not found\n");
}

#[test]
fn test_later_commands_still_run() {
    let mut sh = TestShell::new();
    assert_eq!(sh.output("nonexistent_cmd; echo still here"), "still here\n");
    assert_eq!(sh.session().last_status, 0);
}

#[test]
fn test_unreadable_input_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.txt");
    let mut sh = TestShell::new();

    let status = sh.run(&format!("cat < {}", missing.display()));
    assert_eq!(status, 1);
    let err = sh.err.take();
    assert!(err.starts_with("cat: "), "{}", err);
    assert!(err.contains("No such file or directory"), "{}", err);
}

#[test]
fn test_redirection_failure_spawns_nothing() {
    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("marker");
    let mut sh = TestShell::new();

    let line = format!(
        "touch {} | cat > {}/no/such/dir/out",
        marker.display(),
        dir.path().display()
    );
    assert_eq!(sh.run(&line), 1);
    assert!(!marker.exists());
}

#[test]
fn test_missing_redirection_target() {
    let mut sh = TestShell::new();
    assert_eq!(sh.run("echo hi >"), 1);
    assert_eq!(sh.err.take(), "echo: syntax error: missing redirection target\n");
    assert_eq!(sh.out.contents(), "");
}

#[test]
fn test_non_executable_file_is_not_a_program() {
    let dir = TempDir::new().unwrap();
    let script = write_file(dir.path(), "tool", "#!/bin/sh\necho ran\n");
    fs::set_permissions(&script, fs::Permissions::from_mode(0o644)).unwrap();

    let mut env = create_test_env();
    env.insert("PATH".to_string(), dir.path().display().to_string());
    let mut sh = TestShell::with_env(env);
    assert_eq!(sh.run("tool"), 127);

    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    assert_eq!(sh.output("tool"), "ran\n");
}

#[test]
fn test_spawn_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    // executable bit set but not a valid program or script
    let bogus = write_file(dir.path(), "bogus", "\u{0}\u{1}\u{2}");
    fs::set_permissions(&bogus, fs::Permissions::from_mode(0o755)).unwrap();

    let mut sh = TestShell::new();
    let status = sh.run(&bogus.display().to_string());
    assert_eq!(status, 1);
    assert!(sh.err.take().starts_with(&format!("{}: ", bogus.display())));
}

#[test]
fn test_cd_errors() {
    let mut sh = TestShell::new();
    assert_eq!(sh.run("cd /no/such/dir/here"), 1);
    assert_eq!(
        sh.err.take(),
        "cd: /no/such/dir/here: No such file or directory\n"
    );
    assert_eq!(sh.run("cd a b"), 1);
    assert_eq!(sh.err.take(), "cd: too many arguments\n");
}

#[test]
fn test_exit_with_bad_argument() {
    let mut sh = TestShell::new();
    assert_eq!(sh.run("exit nope"), 2);
    assert_eq!(sh.err.take(), "exit: nope: numeric argument required\n");
}

#[test]
fn test_unterminated_quote_is_lenient() {
    let mut sh = TestShell::new();
    assert_eq!(sh.output("echo 'unclosed quote"), "unclosed quote\n");
}

#[test]
fn test_unalias_without_names() {
    let mut sh = TestShell::new();
    assert_eq!(sh.run("unalias"), 2);
    assert!(sh.err.take().starts_with("unalias: usage"));
}
