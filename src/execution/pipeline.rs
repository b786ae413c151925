//! Pipeline execution
//!
//! Runs in two phases. Planning opens every redirection and resolves every
//! program of the pipeline; if anything fails there, the error is reported
//! and no process is started. Spawning then walks the stages in order,
//! running builtins in-process and starting externals with their standard
//! streams connected:
//!
//! - external -> external: OS pipe
//! - builtin -> external: the builtin's captured stdout is written into the
//!   external's stdin by a feeder thread once it is spawned
//! - external -> builtin: the pipe's read end is dropped (the writer gets
//!   `EPIPE`/`SIGPIPE` like it would from a reader that exited)
//! - builtin -> builtin: the upstream output is discarded
//!
//! Redirection files are owned by the planned stages, so they are closed
//! whatever path the execution takes.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::{self, JoinHandle};

use super::path::resolve_program;
use crate::builtins::{self, BuiltinFn};
use crate::error::{describe_io_error, Error, Result};
use crate::jobs::{wait, wait_in_foreground};
use crate::models::{Job, ParsedCommand, Pipeline, RedirectionSpec};
use crate::session::ShellSession;

enum StageKind {
    Builtin(BuiltinFn),
    External(PathBuf),
}

/// A stage with its redirections opened and its program located
struct PlannedStage<'p> {
    command: &'p ParsedCommand,
    kind: StageKind,
    stdin: Option<File>,
    stdout: Option<File>,
    stderr: Option<File>,
}

/// Why planning stopped; `stderr` is the stage's own stderr target if it
/// was already opened, which is where the message belongs
struct PlanFailure {
    error: Error,
    stderr: Option<File>,
}

impl From<Error> for PlanFailure {
    fn from(error: Error) -> Self {
        Self {
            error,
            stderr: None,
        }
    }
}

/// Write to a sink, ignoring a closed reader
fn emit(sink: &mut dyn Write, bytes: &[u8]) {
    if bytes.is_empty() {
        return;
    }
    if let Err(e) = sink.write_all(bytes).and_then(|_| sink.flush()) {
        if e.kind() != io::ErrorKind::BrokenPipe {
            warn!("failed to write output: {}", e);
        }
    }
}

fn open_redirection(command: &str, spec: &RedirectionSpec) -> Result<Option<File>> {
    let (path, opened) = match spec {
        RedirectionSpec::None => return Ok(None),
        RedirectionSpec::FromFile { path } => (path, File::open(path)),
        RedirectionSpec::ToFile { path, append } => (
            path,
            OpenOptions::new()
                .write(true)
                .create(true)
                .append(*append)
                .truncate(!*append)
                .open(path),
        ),
    };
    opened.map(Some).map_err(|e| Error::RedirectionFailed {
        command: command.to_string(),
        path: path.clone(),
        reason: describe_io_error(&e),
    })
}

fn plan_stage<'p>(
    session: &ShellSession,
    index: usize,
    count: usize,
    command: &'p ParsedCommand,
) -> std::result::Result<PlannedStage<'p>, PlanFailure> {
    let name = command.name();
    let label = if name.is_empty() { crate::NAME } else { name };
    let first = index == 0;
    let last = index + 1 == count;
    let redirections = &command.redirections;

    if !first && !redirections.stdin.is_none() {
        warn!("{}: input redirection ignored inside a pipeline", label);
    }
    if !last && !(redirections.stdout.is_none() && redirections.stderr.is_none()) {
        warn!("{}: output redirection ignored inside a pipeline", label);
    }

    let stdin = if first {
        open_redirection(label, &redirections.stdin)?
    } else {
        None
    };
    let (stdout, stderr) = if last {
        (
            open_redirection(label, &redirections.stdout)?,
            open_redirection(label, &redirections.stderr)?,
        )
    } else {
        (None, None)
    };

    let kind = if name.is_empty() {
        // redirection-only stage: files are created, nothing runs
        StageKind::Builtin(builtins::core::true_)
    } else if let Some(handler) = builtins::lookup(name) {
        StageKind::Builtin(handler)
    } else {
        match resolve_program(name, session.search_path(), &session.cwd()) {
            Some(path) => StageKind::External(path),
            None => {
                return Err(PlanFailure {
                    error: Error::CommandNotFound {
                        command: name.to_string(),
                    },
                    stderr,
                })
            }
        }
    };

    Ok(PlannedStage {
        command,
        kind,
        stdin,
        stdout,
        stderr,
    })
}

/// Runs pipelines against a session
pub struct PipelineExecutor<'a> {
    session: &'a mut ShellSession,
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
    capture: bool,
}

impl<'a> PipelineExecutor<'a> {
    /// Builtin output and messages go to `out` / `err`; external programs
    /// inherit the shell's own streams.
    pub fn new(session: &'a mut ShellSession, out: &'a mut dyn Write, err: &'a mut dyn Write) -> Self {
        Self {
            session,
            out,
            err,
            capture: false,
        }
    }

    /// Route the unredirected output of foreground externals through
    /// `out` / `err` as well
    pub fn capture_output(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }

    /// Run one pipeline and return its exit status
    pub fn execute(&mut self, pipeline: &Pipeline) -> i32 {
        if pipeline.is_empty() {
            return 0;
        }
        debug!(
            "executing {:?}: {} stage(s), background: {}",
            pipeline.text,
            pipeline.len(),
            pipeline.background
        );

        let count = pipeline.len();
        let mut planned = Vec::with_capacity(count);
        for (index, command) in pipeline.stages.iter().enumerate() {
            match plan_stage(self.session, index, count, command) {
                Ok(stage) => planned.push(stage),
                Err(failure) => {
                    let message = format!("{}\n", failure.error);
                    match failure.stderr {
                        Some(mut file) => emit(&mut file, message.as_bytes()),
                        None => emit(self.err, message.as_bytes()),
                    }
                    return failure.error.exit_status();
                }
            }
        }

        match self.run(planned, pipeline) {
            Ok(status) => status,
            Err(e) => {
                emit(self.err, format!("{e}\n").as_bytes());
                e.exit_status()
            }
        }
    }

    fn run(&mut self, stages: Vec<PlannedStage<'_>>, pipeline: &Pipeline) -> Result<i32> {
        let count = stages.len();
        let capture = self.capture && !pipeline.background;
        let external: Vec<bool> = stages
            .iter()
            .map(|s| matches!(s.kind, StageKind::External(_)))
            .collect();

        let mut children: Vec<Child> = Vec::new();
        let mut pgid: Option<i32> = None;
        let mut upstream: Option<ChildStdout> = None;
        let mut pending_input: Option<Vec<u8>> = None;
        let mut feeders: Vec<JoinHandle<()>> = Vec::new();
        let mut drains: Vec<JoinHandle<Vec<u8>>> = Vec::new();
        let mut captured_stdout: Option<ChildStdout> = None;
        let mut builtin_status: Option<i32> = None;

        for (index, stage) in stages.into_iter().enumerate() {
            let last = index + 1 == count;
            let next_is_external = external.get(index + 1).copied().unwrap_or(false);
            let name = stage.command.name();

            match stage.kind {
                StageKind::Builtin(handler) => {
                    // nobody reads what an upstream stage writes
                    drop(upstream.take());
                    pending_input = None;

                    let output = handler(&mut *self.session, stage.command.arguments(), &mut *self.err);
                    trace!("builtin {:?} exited with {}", name, output.status);

                    match stage.stderr {
                        Some(mut file) => emit(&mut file, output.stderr.as_bytes()),
                        None => emit(self.err, output.stderr.as_bytes()),
                    }
                    if last {
                        match stage.stdout {
                            Some(mut file) => emit(&mut file, output.stdout.as_bytes()),
                            None => emit(self.out, output.stdout.as_bytes()),
                        }
                        builtin_status = Some(output.status);
                    } else if next_is_external {
                        pending_input = Some(output.stdout.into_bytes());
                    }
                }
                StageKind::External(path) => {
                    let mut command = Command::new(&path);
                    command
                        .arg0(name)
                        .args(stage.command.arguments())
                        .env_clear()
                        .envs(&self.session.env);

                    let mut feed = None;
                    if let Some(file) = stage.stdin {
                        command.stdin(file);
                    } else if let Some(pipe) = upstream.take() {
                        command.stdin(Stdio::from(pipe));
                    } else if let Some(bytes) = pending_input.take() {
                        command.stdin(Stdio::piped());
                        feed = Some(bytes);
                    }

                    if !last || (stage.stdout.is_none() && capture) {
                        command.stdout(Stdio::piped());
                    } else if let Some(file) = stage.stdout {
                        command.stdout(file);
                    }

                    if let Some(file) = stage.stderr {
                        command.stderr(file);
                    } else if capture {
                        command.stderr(Stdio::piped());
                    }

                    if pipeline.background {
                        command.process_group(pgid.unwrap_or(0));
                    }

                    let mut child = match command.spawn() {
                        Ok(child) => child,
                        Err(e) => {
                            drop(command);
                            drop(upstream.take());
                            let started: Vec<i32> = children.iter().map(|c| c.id() as i32).collect();
                            drop(children);
                            wait::terminate(&started);
                            return Err(Error::SpawnFailed {
                                command: name.to_string(),
                                reason: describe_io_error(&e),
                            });
                        }
                    };

                    let pid = child.id() as i32;
                    debug!("spawned {} as pid {}", path.display(), pid);
                    if pipeline.background && pgid.is_none() {
                        pgid = Some(pid);
                    }

                    if let (Some(bytes), Some(mut stdin)) = (feed, child.stdin.take()) {
                        feeders.push(thread::spawn(move || {
                            if let Err(e) = stdin.write_all(&bytes) {
                                if e.kind() != io::ErrorKind::BrokenPipe {
                                    debug!("feeding pipeline stage failed: {}", e);
                                }
                            }
                        }));
                    }
                    if let Some(mut stderr) = child.stderr.take() {
                        drains.push(thread::spawn(move || {
                            let mut buf = Vec::new();
                            if let Err(e) = stderr.read_to_end(&mut buf) {
                                debug!("reading stage stderr failed: {}", e);
                            }
                            buf
                        }));
                    }

                    let stdout = child.stdout.take();
                    if last {
                        captured_stdout = stdout;
                    } else if next_is_external {
                        upstream = stdout;
                    }
                    children.push(child);
                }
            }
        }

        if let Some(mut stdout) = captured_stdout {
            let mut buf = Vec::new();
            if let Err(e) = stdout.read_to_end(&mut buf) {
                warn!("reading pipeline output failed: {}", e);
            }
            emit(self.out, &buf);
        }
        for drain in drains {
            if let Ok(buf) = drain.join() {
                emit(self.err, &buf);
            }
        }

        let pids: Vec<i32> = children.iter().map(|c| c.id() as i32).collect();
        drop(children);

        if pids.is_empty() {
            return Ok(if pipeline.background {
                0
            } else {
                builtin_status.unwrap_or(0)
            });
        }

        if pipeline.background {
            // feeders finish on their own; a background reader may never drain them
            drop(feeders);
            let id = self.session.jobs.add(pipeline.text.clone(), &pids, pgid, true);
            let last_pid = pids.last().copied().unwrap_or_default();
            emit(self.err, format!("[{id}] {last_pid}\n").as_bytes());
            return Ok(0);
        }

        let mut job = Job::new(0, pipeline.text.clone(), &pids, None, false);
        let status = wait_in_foreground(&mut job)?;
        for feeder in feeders {
            if feeder.join().is_err() {
                warn!("builtin output feeder panicked");
            }
        }

        if job.is_stopped() {
            let id = self.session.jobs.adopt(job);
            if let Some(job) = self.session.jobs.get(id) {
                let line = job.describe(self.session.jobs.marker(id));
                emit(self.err, format!("\n{line}\n").as_bytes());
            }
            return Ok(status);
        }

        Ok(builtin_status.unwrap_or(status))
    }
}
