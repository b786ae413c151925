//! Parsed Command Model
//!
//! A `ParsedCommand` is built for one pipeline stage, handed to the
//! orchestrator once and then dropped. Redirections are one tagged value
//! per stream, so "no redirection" is a case of its own rather than a
//! missing path.

use std::path::PathBuf;

/// Where one standard stream of a command is rebound to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RedirectionSpec {
    /// Stream is inherited (or piped, inside a pipeline)
    #[default]
    None,
    /// Output goes to a file, truncated unless `append`
    ToFile { path: PathBuf, append: bool },
    /// Input is read from a file
    FromFile { path: PathBuf },
}

impl RedirectionSpec {
    pub fn is_none(&self) -> bool {
        matches!(self, RedirectionSpec::None)
    }
}

/// The three stream redirections of a command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Redirections {
    pub stdin: RedirectionSpec,
    pub stdout: RedirectionSpec,
    pub stderr: RedirectionSpec,
}

/// One command with its arguments resolved and redirections extracted
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedCommand {
    /// `args[0]` is the program or builtin name
    pub args: Vec<String>,
    /// Stream redirections
    pub redirections: Redirections,
    /// Command was marked with a trailing `&`
    pub background: bool,
}

impl ParsedCommand {
    /// Program or builtin name
    pub fn name(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or("")
    }

    /// Arguments after the name
    pub fn arguments(&self) -> &[String] {
        self.args.get(1..).unwrap_or(&[])
    }
}

/// Stages of one pipeline, connected stdout to stdin
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pipeline {
    /// At least one stage
    pub stages: Vec<ParsedCommand>,
    /// Run without blocking and register a job
    pub background: bool,
    /// Command text as shown by `jobs`
    pub text: String,
}

impl Pipeline {
    pub fn new(stages: Vec<ParsedCommand>, background: bool, text: String) -> Self {
        Self {
            stages,
            background,
            text,
        }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
