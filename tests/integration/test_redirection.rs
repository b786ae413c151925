//! Integration Tests for Redirection

#[path = "../test_utils/mod.rs"]
mod test_utils;

use std::fs;

use tempfile::TempDir;
use test_utils::{write_file, TestShell};

#[test]
fn test_stdout_truncate() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("out.txt");
    let mut sh = TestShell::new();

    sh.run(&format!("echo first > {}", file.display()));
    sh.run(&format!("echo hi > {}", file.display()));
    assert_eq!(fs::read_to_string(&file).unwrap(), "hi\n");
    assert_eq!(sh.out.contents(), "");
}

#[test]
fn test_stdout_append() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("log.txt");
    let mut sh = TestShell::new();

    sh.run(&format!("echo one >> {}", file.display()));
    sh.run(&format!("echo two 1>>{}", file.display()));
    assert_eq!(fs::read_to_string(&file).unwrap(), "one\ntwo\n");
}

#[test]
fn test_no_space_before_target() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("tight.txt");
    let mut sh = TestShell::new();

    sh.run(&format!("echo tight >{}", file.display()));
    assert_eq!(fs::read_to_string(&file).unwrap(), "tight\n");
}

#[test]
fn test_brace_range_directly_before_redirection() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("range.txt");
    let mut sh = TestShell::new();

    assert_eq!(sh.output(&format!("echo {{1..3}}>{}", file.display())), "");
    assert_eq!(fs::read_to_string(&file).unwrap(), "1 2 3\n");
}

#[test]
fn test_external_stdout_to_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("sorted.txt");
    let mut sh = TestShell::new();

    sh.run(&format!("printf 'b\\na\\n' | sort > {}", file.display()));
    assert_eq!(fs::read_to_string(&file).unwrap(), "a\nb\n");
    assert_eq!(sh.out.contents(), "");
}

#[test]
fn test_stdin_from_file() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "in.txt", "hello\n");
    let mut sh = TestShell::new();

    assert_eq!(sh.output(&format!("tr a-z A-Z < {}", input.display())), "HELLO\n");
    assert_eq!(sh.output(&format!("cat <{} | wc -c | tr -d ' '", input.display())), "6\n");
}

#[test]
fn test_stderr_redirection() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("err.txt");
    let mut sh = TestShell::new();

    sh.run(&format!("sh -c 'echo bad >&2' 2> {}", file.display()));
    sh.run(&format!("sh -c 'echo worse >&2' 2>> {}", file.display()));
    assert_eq!(fs::read_to_string(&file).unwrap(), "bad\nworse\n");
    assert_eq!(sh.err.contents(), "");
}

#[test]
fn test_builtin_stderr_redirection() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("cd.txt");
    let mut sh = TestShell::new();

    let status = sh.run(&format!("cd /no/such/dir/here 2> {}", file.display()));
    assert_eq!(status, 1);
    let message = fs::read_to_string(&file).unwrap();
    assert!(message.contains("No such file or directory"), "{}", message);
}

#[test]
fn test_command_not_found_goes_to_stderr_target() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("missing.txt");
    let mut sh = TestShell::new();

    let status = sh.run(&format!("no_such_program_xyz 2> {}", file.display()));
    assert_eq!(status, 127);
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "no_such_program_xyz: command not found\n"
    );
}

#[test]
fn test_last_redirection_wins() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    let mut sh = TestShell::new();

    sh.run(&format!("echo x > {} > {}", a.display(), b.display()));
    assert_eq!(fs::read_to_string(&b).unwrap(), "x\n");
}

#[test]
fn test_redirection_inside_quotes_is_literal() {
    let mut sh = TestShell::new();
    assert_eq!(sh.output("echo 'a > b' \"<c>\""), "a > b <c>\n");
}

#[test]
fn test_redirection_only_command_creates_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("empty.txt");
    let mut sh = TestShell::new();

    assert_eq!(sh.run(&format!("> {}", file.display())), 0);
    assert_eq!(fs::read_to_string(&file).unwrap(), "");
}
