//! Integration Tests for Job Control
//!
//! Background launch, the job table state machine and `jobs`/`fg`/`bg`.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use std::thread;
use std::time::{Duration, Instant};

use mosaicsh::models::JobState;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use test_utils::TestShell;

/// Refresh until job `id` reaches `state` or a few seconds pass
fn wait_for_state(sh: &mut TestShell, id: usize, state: JobState) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        sh.session().jobs.refresh();
        if sh.session().jobs.get(id).map(|j| j.state) == Some(state) {
            return true;
        }
        thread::sleep(Duration::from_millis(20));
    }
    false
}

fn kill_job(sh: &mut TestShell, id: usize) {
    let pids = sh.session().jobs.get(id).map(|j| j.pids()).unwrap_or_default();
    for pid in pids {
        let _ = kill(Pid::from_raw(pid), Signal::SIGKILL);
    }
    wait_for_state(sh, id, JobState::Done);
}

#[test]
fn test_background_launch_reports_job() {
    let mut sh = TestShell::new();
    assert_eq!(sh.run("sleep 5 &"), 0);

    let job = sh.session().jobs.get(1).cloned().unwrap();
    assert_eq!(job.command, "sleep 5");
    assert_eq!(job.state, JobState::Running);
    assert_eq!(sh.err.take(), format!("[1] {}\n", job.pids()[0]));

    assert_eq!(sh.output("jobs"), "[1]+  Running   sleep 5\n");
    kill_job(&mut sh, 1);
}

#[test]
fn test_background_does_not_block() {
    let mut sh = TestShell::new();
    let started = Instant::now();
    sh.run("sleep 3 &");
    assert!(started.elapsed() < Duration::from_secs(2));
    kill_job(&mut sh, 1);
}

#[test]
fn test_finished_job_is_reported_then_pruned() {
    let mut sh = TestShell::new();
    sh.run("true &");
    sh.err.take();

    let deadline = Instant::now() + Duration::from_secs(5);
    let mut reported = String::new();
    while Instant::now() < deadline && reported.is_empty() {
        thread::sleep(Duration::from_millis(20));
        sh.shell.notify_jobs();
        reported = sh.err.take();
    }
    assert_eq!(reported, "[1]+  Done      true\n");
    assert!(sh.session().jobs.is_empty());
}

#[test]
fn test_job_ids_are_not_reused() {
    let mut sh = TestShell::new();
    sh.run("true &");
    assert!(wait_for_state(&mut sh, 1, JobState::Done));
    sh.session().jobs.cleanup();

    sh.run("true &");
    assert!(sh.session().jobs.get(2).is_some());
    assert!(wait_for_state(&mut sh, 2, JobState::Done));
}

#[test]
fn test_done_job_stays_until_cleanup() {
    let mut sh = TestShell::new();
    sh.run("true &");
    assert!(wait_for_state(&mut sh, 1, JobState::Done));
    sh.session().jobs.refresh();
    assert_eq!(sh.session().jobs.len(), 1);

    assert_eq!(sh.run("fg 1"), 1);
    assert_eq!(sh.err.take().lines().last(), Some("fg: job 1 has terminated"));
}

#[test]
fn test_fg_waits_and_returns_status() {
    let mut sh = TestShell::new();
    sh.run("sh -c 'sleep 0.2; exit 5' &");
    sh.err.take();

    assert_eq!(sh.run("fg"), 5);
    assert_eq!(sh.err.take(), "sh -c 'sleep 0.2; exit 5'\n");
    assert_eq!(sh.session().jobs.get(1).map(|j| j.state), Some(JobState::Done));

    assert_eq!(sh.run("fg %1"), 1);
    assert_eq!(sh.err.take(), "fg: job 1 has terminated\n");

    sh.shell.notify_jobs();
    assert_eq!(sh.err.take(), "");
    assert!(sh.session().jobs.is_empty());
}

#[test]
fn test_fg_and_bg_without_jobs() {
    let mut sh = TestShell::new();
    assert_eq!(sh.run("fg"), 1);
    assert_eq!(sh.err.take(), "fg: current: no such job\n");
    assert_eq!(sh.run("bg %3"), 1);
    assert_eq!(sh.err.take(), "bg: %3: no such job\n");
}

#[test]
fn test_bg_on_running_job() {
    let mut sh = TestShell::new();
    sh.run("sleep 5 &");
    sh.err.take();

    assert_eq!(sh.run("bg"), 0);
    assert_eq!(sh.err.take(), "bg: job 1 already in background\n");
    kill_job(&mut sh, 1);
}

#[test]
fn test_stopped_job_resumed_with_bg() {
    let mut sh = TestShell::new();
    sh.run("sleep 30 &");
    let pid = sh.session().jobs.get(1).unwrap().pids()[0];

    kill(Pid::from_raw(pid), Signal::SIGSTOP).unwrap();
    assert!(wait_for_state(&mut sh, 1, JobState::Stopped));
    assert_eq!(sh.output("jobs"), "[1]+  Stopped   sleep 30\n");

    assert_eq!(sh.output("bg %1"), "[1]+ sleep 30 &\n");
    assert_eq!(sh.session().jobs.get(1).unwrap().state, JobState::Running);
    kill_job(&mut sh, 1);
}

#[test]
fn test_jobs_long_listing_includes_pids() {
    let mut sh = TestShell::new();
    sh.run("sleep 5 | sleep 5 &");
    let pids = sh.session().jobs.get(1).unwrap().pids();
    assert_eq!(pids.len(), 2);

    let listing = sh.output("jobs -l");
    assert!(listing.starts_with("[1]+"), "{}", listing);
    for pid in &pids {
        assert!(listing.contains(&pid.to_string()), "{}", listing);
    }
    kill_job(&mut sh, 1);
}

#[test]
fn test_builtin_only_background_runs_inline() {
    let mut sh = TestShell::new();
    assert_eq!(sh.output("echo inline &"), "inline\n");
    assert!(sh.session().jobs.is_empty());
}
