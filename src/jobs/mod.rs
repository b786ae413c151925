//! Job Controller
//!
//! Owns the table of background and stopped jobs. Job state is refreshed by
//! polling each job's processes when [`JobController::refresh`] is called
//! (the REPL does so once per prompt), so between refreshes the table may
//! be stale. Finished jobs stay in the table until
//! [`JobController::cleanup`] removes them.

pub mod wait;

use crate::error::{Error, Result};
use crate::models::{Job, JobState, ProcessStatus};

/// Result of `bg`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundOutcome {
    /// A stopped job was continued
    Resumed,
    /// The job was already running
    AlreadyRunning,
}

/// Table of jobs with monotonically increasing ids
#[derive(Debug)]
pub struct JobController {
    jobs: Vec<Job>,
    next_id: usize,
}

impl Default for JobController {
    fn default() -> Self {
        Self::new()
    }
}

impl JobController {
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            next_id: 1,
        }
    }

    /// Register a newly launched job and return its id
    pub fn add(&mut self, command: String, pids: &[i32], pgid: Option<i32>, background: bool) -> usize {
        let id = self.take_id();
        debug!("job [{}] started: {} (pids {:?})", id, command, pids);
        self.jobs.push(Job::new(id, command, pids, pgid, background));
        id
    }

    /// Take over a job built outside the table (a stopped foreground
    /// pipeline), giving it the next id
    pub fn adopt(&mut self, mut job: Job) -> usize {
        let id = self.take_id();
        job.id = id;
        debug!("job [{}] adopted in state {}", id, job.state);
        self.jobs.push(job);
        id
    }

    fn take_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// All jobs in creation order
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn get(&self, id: usize) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    pub fn get_mut(&mut self, id: usize) -> Option<&mut Job> {
        self.jobs.iter_mut().find(|j| j.id == id)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// The most recently created job
    pub fn current(&self) -> Option<&Job> {
        self.jobs.last()
    }

    /// `+` for the current job, `-` for the one before it
    pub fn marker(&self, id: usize) -> char {
        let n = self.jobs.len();
        match self.jobs.iter().position(|j| j.id == id) {
            Some(pos) if pos + 1 == n => '+',
            Some(pos) if pos + 2 == n => '-',
            _ => ' ',
        }
    }

    /// Poll every unfinished job once and return the ids whose state
    /// changed.
    pub fn refresh(&mut self) -> Vec<usize> {
        let mut changed = Vec::new();
        for job in self.jobs.iter_mut().filter(|j| !j.is_done()) {
            let before = job.state;
            for pid in job.live_pids() {
                match wait::poll(pid) {
                    Ok(Some(status)) => {
                        job.update_process(pid, status);
                    }
                    Ok(None) => {}
                    Err(e) => warn!("job [{}]: {}", job.id, e),
                }
            }
            if job.state != before {
                debug!("job [{}] {} -> {}", job.id, before, job.state);
                changed.push(job.id);
            }
        }
        changed
    }

    /// Remove finished jobs from the table and return them
    pub fn cleanup(&mut self) -> Vec<Job> {
        let (done, kept): (Vec<Job>, Vec<Job>) =
            std::mem::take(&mut self.jobs).into_iter().partition(Job::is_done);
        self.jobs = kept;
        done
    }

    /// Find the job a `%N` / `N` / `%+` / `%-` spec names, defaulting to
    /// the current job. Fails if it does not exist or is already Done.
    pub fn resolve(&self, builtin: &str, spec: Option<&str>) -> Result<usize> {
        let not_found = |spec: &str| Error::JobNotFound {
            builtin: builtin.to_string(),
            spec: spec.to_string(),
        };

        let job = match spec {
            None | Some("%") | Some("%%") | Some("%+") => {
                self.current().ok_or_else(|| not_found("current"))?
            }
            Some("%-") => {
                let n = self.jobs.len();
                n.checked_sub(2)
                    .and_then(|i| self.jobs.get(i))
                    .ok_or_else(|| not_found("%-"))?
            }
            Some(text) => {
                let number = text.strip_prefix('%').unwrap_or(text);
                let id: usize = number.parse().map_err(|_| not_found(text))?;
                self.get(id).ok_or_else(|| not_found(text))?
            }
        };

        if job.is_done() {
            return Err(Error::JobTerminated {
                builtin: builtin.to_string(),
                id: job.id,
            });
        }
        Ok(job.id)
    }

    /// Continue a job if stopped and wait for it in the foreground.
    ///
    /// The job stays in the table whether it finishes or stops again; a
    /// finished one is dropped by the next [`cleanup`](Self::cleanup).
    /// Returns the exit status to record in `$?`. The terminal is not
    /// handed to the job's process group.
    pub fn foreground(&mut self, id: usize) -> Result<i32> {
        let job = self.get_mut(id).ok_or_else(|| Error::JobNotFound {
            builtin: "fg".to_string(),
            spec: id.to_string(),
        })?;

        if job.is_stopped() {
            wait::resume(job.pgid, &job.live_pids())?;
            job.mark_running();
        }
        job.background = false;

        wait_in_foreground(job)
    }

    /// Continue a stopped job in the background
    pub fn background(&mut self, id: usize) -> Result<BackgroundOutcome> {
        let job = self.get_mut(id).ok_or_else(|| Error::JobNotFound {
            builtin: "bg".to_string(),
            spec: id.to_string(),
        })?;

        match job.state {
            JobState::Running => Ok(BackgroundOutcome::AlreadyRunning),
            JobState::Stopped => {
                wait::resume(job.pgid, &job.live_pids())?;
                job.mark_running();
                job.background = true;
                debug!("job [{}] continued in background", job.id);
                Ok(BackgroundOutcome::Resumed)
            }
            JobState::Done => Err(Error::JobTerminated {
                builtin: "bg".to_string(),
                id,
            }),
        }
    }
}

/// Block until every process of `job` exits, or until one of them stops.
///
/// Returns the last process's exit status, or 128+signal when stopped. A
/// stop from the terminal reaches the whole pipeline, so the remaining
/// processes are recorded as stopped too.
pub fn wait_in_foreground(job: &mut Job) -> Result<i32> {
    for pid in job.live_pids() {
        match wait::wait_for(pid)? {
            ProcessStatus::Stopped(signal) => {
                for p in job.processes.iter_mut() {
                    if !matches!(p.status, ProcessStatus::Exited(_)) {
                        p.status = ProcessStatus::Stopped(signal);
                    }
                }
                job.mark_stopped();
                debug!("pipeline {:?} stopped by signal {}", job.command, signal);
                return Ok(128 + signal);
            }
            status => {
                job.update_process(pid, status);
            }
        }
    }
    Ok(job.exit_status.unwrap_or(0))
}
