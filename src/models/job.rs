//! Job Model
//!
//! A job is a pipeline the shell keeps track of after launching it in the
//! background, or after it was stopped in the foreground. Its state is
//! derived from the status of each of its processes and only moves along
//! the transitions below:
//!
//! ```text
//! Running -> Stopped -> Running
//! Running -> Done
//! Stopped -> Done   (killed while stopped)
//! ```
//!
//! Nothing leaves `Done`.

use chrono::{DateTime, Local};
use std::fmt;

/// Lifecycle state of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    Running,
    Stopped,
    Done,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            JobState::Running => "Running",
            JobState::Stopped => "Stopped",
            JobState::Done => "Done",
        };
        // pad() so width specifiers like {:<10} apply
        f.pad(text)
    }
}

/// Last known status of one process of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    Running,
    /// Stopped by the given signal number
    Stopped(i32),
    /// Finished with the given shell exit status (128+N when killed by signal N)
    Exited(i32),
}

/// One process of a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobProcess {
    pub pid: i32,
    pub status: ProcessStatus,
}

/// A tracked pipeline
#[derive(Debug, Clone)]
pub struct Job {
    /// Job number shown as `[id]`, starting at 1
    pub id: usize,

    /// Command text as typed
    pub command: String,

    /// Current lifecycle state
    pub state: JobState,

    /// Launched with `&` (as opposed to stopped in the foreground)
    pub background: bool,

    /// Processes in pipeline order
    pub processes: Vec<JobProcess>,

    /// Process group of the job when it has its own
    pub pgid: Option<i32>,

    /// When the job was launched
    pub started_at: DateTime<Local>,

    /// Exit status of the last process once Done
    pub exit_status: Option<i32>,
}

impl Job {
    /// Create a running job over the given pids
    pub fn new(id: usize, command: String, pids: &[i32], pgid: Option<i32>, background: bool) -> Self {
        Self {
            id,
            command,
            state: JobState::Running,
            background,
            processes: pids
                .iter()
                .map(|&pid| JobProcess {
                    pid,
                    status: ProcessStatus::Running,
                })
                .collect(),
            pgid,
            started_at: Local::now(),
            exit_status: None,
        }
    }

    pub fn pids(&self) -> Vec<i32> {
        self.processes.iter().map(|p| p.pid).collect()
    }

    /// Pids that have not exited yet
    pub fn live_pids(&self) -> Vec<i32> {
        self.processes
            .iter()
            .filter(|p| !matches!(p.status, ProcessStatus::Exited(_)))
            .map(|p| p.pid)
            .collect()
    }

    pub fn is_done(&self) -> bool {
        self.state == JobState::Done
    }

    pub fn is_stopped(&self) -> bool {
        self.state == JobState::Stopped
    }

    /// Stopped -> Running. Returns false if the transition is not allowed.
    pub fn mark_running(&mut self) -> bool {
        if self.state != JobState::Stopped {
            return false;
        }
        for p in &mut self.processes {
            if matches!(p.status, ProcessStatus::Stopped(_)) {
                p.status = ProcessStatus::Running;
            }
        }
        self.state = JobState::Running;
        true
    }

    /// Running -> Stopped
    pub fn mark_stopped(&mut self) -> bool {
        if self.state != JobState::Running {
            return false;
        }
        self.state = JobState::Stopped;
        true
    }

    /// Running or Stopped -> Done
    pub fn mark_done(&mut self, exit_status: i32) -> bool {
        if self.state == JobState::Done {
            return false;
        }
        self.state = JobState::Done;
        self.exit_status = Some(exit_status);
        true
    }

    /// Record a status change of one process and update the job state
    /// from the statuses of all its processes.
    ///
    /// Returns true when the job state changed.
    pub fn update_process(&mut self, pid: i32, status: ProcessStatus) -> bool {
        if self.is_done() {
            return false;
        }
        match self.processes.iter_mut().find(|p| p.pid == pid) {
            Some(process) => process.status = status,
            None => return false,
        }

        let all_exited = self
            .processes
            .iter()
            .all(|p| matches!(p.status, ProcessStatus::Exited(_)));
        let any_running = self
            .processes
            .iter()
            .any(|p| p.status == ProcessStatus::Running);

        if all_exited {
            let last = match self.processes.last().map(|p| p.status) {
                Some(ProcessStatus::Exited(code)) => code,
                _ => 0,
            };
            self.mark_done(last)
        } else if any_running {
            self.mark_running()
        } else {
            self.mark_stopped()
        }
    }

    /// Line shown by `jobs`; `marker` is `+` for the current job, `-` for
    /// the previous one and a space otherwise.
    pub fn describe(&self, marker: char) -> String {
        format!("[{}]{}  {:<10}{}", self.id, marker, self.state, self.command)
    }

    /// Line shown by `jobs -l`
    pub fn describe_long(&self, marker: char) -> String {
        let pids = self
            .pids()
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "[{}]{} {} {:<10}{}  {}",
            self.id,
            marker,
            pids,
            self.state,
            self.started_at.format("%H:%M:%S"),
            self.command
        )
    }
}
