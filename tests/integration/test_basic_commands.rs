//! Integration Tests for Basic Command Execution
//!
//! Lines go through the whole front end (brace expansion, aliases,
//! splitting, tokenizing) and run against an in-memory session.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use test_utils::TestShell;

#[test]
fn test_echo_joins_arguments() {
    let mut sh = TestShell::new();
    assert_eq!(sh.output("echo hello   world"), "hello world\n");
    assert_eq!(sh.output("echo -n no newline"), "no newline");
}

#[test]
fn test_brace_expansion_cross_product() {
    let mut sh = TestShell::new();
    assert_eq!(sh.output("echo {a,b}{1,2}"), "a1 a2 b1 b2\n");
    assert_eq!(sh.output("echo pre{x,y}post"), "prexpost preypost\n");
}

#[test]
fn test_brace_expansion_ranges() {
    let mut sh = TestShell::new();
    assert_eq!(sh.output("echo {1..3}"), "1 2 3\n");
    assert_eq!(sh.output("echo {3..1}"), "3 2 1\n");
    assert_eq!(sh.output("echo file{01..03}.txt"), "file01.txt file02.txt file03.txt\n");
    assert_eq!(sh.output("echo {a..c}"), "a b c\n");
}

#[test]
fn test_brace_expansion_next_to_operators() {
    let mut sh = TestShell::new();
    assert_eq!(sh.output("echo {a,b}|tr a-z A-Z"), "A B\n");
    assert_eq!(sh.output("echo {a,b};echo c"), "a b\nc\n");
    assert_eq!(sh.output("echo x{1,2};echo 'y|{3,4}'"), "x1 x2\ny|{3,4}\n");
}

#[test]
fn test_quoted_braces_stay_literal() {
    let mut sh = TestShell::new();
    assert_eq!(sh.output("echo '{a,b}'"), "{a,b}\n");
    assert_eq!(sh.output("echo {a}"), "{a}\n");
}

#[test]
fn test_quoting_and_escapes() {
    let mut sh = TestShell::new();
    assert_eq!(sh.output("echo 'a  b' \"c  d\""), "a  b c  d\n");
    assert_eq!(sh.output("echo a\\ b"), "a b\n");
    assert_eq!(sh.output("echo '$HOME' \"$HOME\""), "$HOME /home/tester\n");
}

#[test]
fn test_semicolon_runs_every_command() {
    let mut sh = TestShell::new();
    assert_eq!(sh.output("echo one; false; echo two"), "one\ntwo\n");
    assert_eq!(sh.output("echo 'a;b'"), "a;b\n");
}

#[test]
fn test_exit_status_variable() {
    let mut sh = TestShell::new();
    assert_eq!(sh.output("false; echo $?"), "1\n");
    assert_eq!(sh.output("true; echo $?"), "0\n");
    assert_eq!(sh.run("false"), 1);
}

#[test]
fn test_assignment_sets_variable() {
    let mut sh = TestShell::new();
    assert_eq!(sh.run("GREETING='hello there'"), 0);
    assert_eq!(sh.output("echo $GREETING"), "hello there\n");
    assert_eq!(sh.session().var("GREETING"), Some("hello there"));
}

#[test]
fn test_assignment_is_exported_to_children() {
    let mut sh = TestShell::new();
    sh.run("MOSAICSH_TEST_VALUE=exported");
    assert_eq!(sh.output("printenv MOSAICSH_TEST_VALUE"), "exported\n");
}

#[test]
fn test_unset_variable_expands_to_nothing() {
    let mut sh = TestShell::new();
    assert_eq!(sh.output("echo a $NOT_SET_ANYWHERE b"), "a b\n");
}

#[test]
fn test_alias_expansion() {
    let mut sh = TestShell::new();
    assert_eq!(sh.run("alias greet='echo hi'"), 0);
    assert_eq!(sh.output("greet there"), "hi there\n");
    assert_eq!(sh.output("alias greet"), "alias greet='echo hi'\n");
}

#[test]
fn test_self_referencing_alias_terminates() {
    let mut sh = TestShell::new();
    sh.run("alias echo='echo wrapped'");
    assert_eq!(sh.output("echo text"), "wrapped text\n");
}

#[test]
fn test_mutually_recursive_aliases_terminate() {
    let mut sh = TestShell::new();
    sh.run("alias a='b x'");
    sh.run("alias b='a y'");
    // a -> b x -> a y x; `a` is already expanded, so `a` is looked up as a program
    let status = sh.run("a");
    assert_eq!(status, 127);
    assert!(sh.err.take().contains("a: command not found"));
}

#[test]
fn test_unalias() {
    let mut sh = TestShell::new();
    sh.run("alias ll='echo listing'");
    assert_eq!(sh.run("unalias ll"), 0);
    assert_eq!(sh.run("unalias ll"), 1);
    assert!(sh.err.take().contains("unalias: ll: not found"));
}

#[test]
fn test_type_builtin() {
    let mut sh = TestShell::new();
    sh.run("alias ll='ls -l'");
    assert_eq!(sh.output("type cd"), "cd is a shell builtin\n");
    assert_eq!(sh.output("type ll"), "ll is aliased to `ls -l'\n");
    assert!(sh.output("type sh").starts_with("sh is /"));
    assert_eq!(sh.run("type no_such_program_here"), 1);
}

#[test]
fn test_external_program_output_is_captured() {
    let mut sh = TestShell::new();
    assert_eq!(sh.output("printf '%s-%s' a b"), "a-b");
    assert_eq!(sh.run("sh -c 'exit 7'"), 7);
    assert_eq!(sh.output("echo $?"), "7\n");
}

#[test]
fn test_exit_requests_end_of_session() {
    let mut sh = TestShell::new();
    sh.run("exit 3; echo never");
    assert_eq!(sh.shell.exit_requested(), Some(3));
    assert_eq!(sh.out.contents(), "");
}

#[test]
fn test_comments_and_blank_lines() {
    let mut sh = TestShell::new();
    sh.run("false");
    assert_eq!(sh.run("# echo nothing"), 1);
    assert_eq!(sh.run("   "), 1);
    assert_eq!(sh.out.contents(), "");
}

#[test]
fn test_history_builtin_lists_entries() {
    let mut sh = TestShell::new();
    sh.session().history.add("echo one");
    sh.session().history.add("echo two");
    assert_eq!(sh.output("history 1"), "    2  echo two\n");
    sh.run("history -c");
    assert_eq!(sh.output("history"), "");
}
