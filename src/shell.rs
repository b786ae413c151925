//! Line driver
//!
//! [`Shell`] takes one input line through the whole pipeline:
//!
//! ```text
//! raw line -> brace expansion (per unit) -> alias expansion (leading word)
//!          -> split on ; | &  -> per command: tokenize, expand parameters,
//!             resolve redirections -> execute -> update $? and jobs
//! ```
//!
//! Tokenizing happens per command, right before it runs, so `$?` in
//! `false; echo $?` sees the status of `false`.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::config::PromptFormatter;
use crate::error::{Error, Result};
use crate::execution::PipelineExecutor;
use crate::expansion::{expand_aliases, expand_line, ExpansionGuard};
use crate::models::Pipeline;
use crate::parser::tokenizer::words;
use crate::parser::{parse_command, split_commands, tokenize, CommandUnit};
use crate::session::ShellSession;

/// A session plus the sinks its output is written to
pub struct Shell {
    session: ShellSession,
    out: Box<dyn Write>,
    err: Box<dyn Write>,
    /// External programs write through `out`/`err` instead of inheriting
    /// the terminal
    capture: bool,
}

impl Shell {
    /// Shell writing to the process's stdout and stderr
    pub fn new(session: ShellSession) -> Self {
        Self {
            session,
            out: Box::new(io::stdout()),
            err: Box::new(io::stderr()),
            capture: false,
        }
    }

    /// Shell whose output, including that of external programs run in the
    /// foreground, goes to the given sinks
    pub fn with_output(session: ShellSession, out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        Self {
            session,
            out,
            err,
            capture: true,
        }
    }

    pub fn session(&self) -> &ShellSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ShellSession {
        &mut self.session
    }

    /// Exit code requested by `exit`, if any
    pub fn exit_requested(&self) -> Option<i32> {
        self.session.exit_requested()
    }

    /// Run one input line and return the resulting `$?`
    pub fn run_line(&mut self, line: &str) -> i32 {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return self.session.last_status;
        }

        let braced = expand_line(line);
        let expanded = expand_aliases(&braced, &self.session.aliases, &ExpansionGuard::new());
        trace!("line {:?} expanded to {:?}", line, expanded);

        for unit in split_commands(&expanded) {
            let status = self.run_unit(unit);
            self.session.last_status = status;
            if self.session.exit_requested().is_some() {
                break;
            }
        }
        self.session.last_status
    }

    fn run_unit(&mut self, unit: CommandUnit) -> i32 {
        match unit {
            CommandUnit::Assignment { name, value } => {
                let value = {
                    let ctx = self.session.expansion_context();
                    words(&tokenize(&value, &ctx)).join(" ")
                };
                debug!("{}={:?}", name, value);
                self.session.set_var(name, value);
                0
            }
            CommandUnit::Pipeline {
                stages,
                background,
                text,
            } => {
                let parsed = {
                    let ctx = self.session.expansion_context();
                    stages
                        .iter()
                        .map(|stage| parse_command(stage, &ctx))
                        .collect::<Result<Vec<_>>>()
                };
                let mut commands = match parsed {
                    Ok(commands) => commands,
                    Err(e) => return self.report(&e),
                };
                for command in &mut commands {
                    command.background = background;
                }

                let pipeline = Pipeline::new(commands, background, text);
                PipelineExecutor::new(&mut self.session, &mut *self.out, &mut *self.err)
                    .capture_output(self.capture)
                    .execute(&pipeline)
            }
        }
    }

    fn report(&mut self, error: &Error) -> i32 {
        self.notice(&error.to_string());
        error.exit_status()
    }

    /// Write one line to the error sink
    pub fn notice(&mut self, message: &str) {
        if let Err(e) = writeln!(self.err, "{message}").and_then(|_| self.err.flush()) {
            debug!("failed to write notice: {}", e);
        }
    }

    /// Run every line of a script; stops early on `exit`
    pub fn run_script(&mut self, content: &str) -> i32 {
        for line in content.lines() {
            self.run_line(line);
            if self.exit_requested().is_some() {
                break;
            }
        }
        self.session.last_status
    }

    /// Run a script file
    pub fn run_file(&mut self, path: &Path) -> Result<i32> {
        let content = fs::read_to_string(path)?;
        info!("running {}", path.display());
        Ok(self.run_script(&content))
    }

    /// Refresh the job table, report jobs that finished or stopped since
    /// the last refresh and drop the finished ones
    pub fn notify_jobs(&mut self) {
        let changed = self.session.jobs.refresh();
        let mut lines = Vec::new();
        for id in changed {
            if let Some(job) = self.session.jobs.get(id) {
                if job.is_done() || job.is_stopped() {
                    lines.push(job.describe(self.session.jobs.marker(id)));
                }
            }
        }
        for line in lines {
            self.notice(&line);
        }
        self.session.jobs.cleanup();
    }

    /// Prompt text for the current state
    pub fn prompt(&self, formatter: &PromptFormatter) -> String {
        formatter.render(&self.session.env, &self.session.cwd(), self.session.last_status)
    }

    /// End the session, flushing history
    pub fn teardown(&mut self) -> Result<()> {
        if let Err(e) = self.out.flush() {
            warn!("flush stdout: {}", e);
        }
        self.session.teardown()
    }
}
