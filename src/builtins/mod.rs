//! Builtin commands
//!
//! Builtins run inside the shell process. Each one is a plain function
//! looked up by name in a static table; a name that is not in the table
//! falls through to an external program. Output is captured in a
//! [`BuiltinOutput`] so builtins compose with external stages in a
//! pipeline.

pub mod alias;
pub mod core;
pub mod history;
pub mod jobs;

use std::collections::HashMap;
use std::io::Write;

use once_cell::sync::Lazy;

use crate::session::ShellSession;

/// Captured result of a builtin
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuiltinOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl BuiltinOutput {
    /// Status 0 with nothing printed
    pub fn success() -> Self {
        Self::default()
    }

    /// Status 0 with `stdout`
    pub fn with_stdout(stdout: impl Into<String>) -> Self {
        Self {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failure with a one-line message on stderr
    pub fn failure(status: i32, message: impl std::fmt::Display) -> Self {
        Self {
            status,
            stdout: String::new(),
            stderr: format!("{message}\n"),
        }
    }

    /// Append a line to stdout
    pub fn println(&mut self, line: impl std::fmt::Display) {
        self.stdout.push_str(&line.to_string());
        self.stdout.push('\n');
    }

    /// Append a line to stderr
    pub fn eprintln(&mut self, line: impl std::fmt::Display) {
        self.stderr.push_str(&line.to_string());
        self.stderr.push('\n');
    }
}

/// Handler signature. `args` excludes the builtin name. `notices` is the
/// shell's error sink for messages that must appear before the builtin
/// returns (`fg` announcing the job it waits on).
pub type BuiltinFn = fn(&mut ShellSession, &[String], &mut dyn Write) -> BuiltinOutput;

static REGISTRY: Lazy<HashMap<&'static str, BuiltinFn>> = Lazy::new(|| {
    self::core::BUILTINS
        .iter()
        .chain(alias::BUILTINS)
        .chain(jobs::BUILTINS)
        .chain(history::BUILTINS)
        .map(|&(name, handler)| (name, handler))
        .collect()
});

/// Handler for `name`, if it is a builtin
pub fn lookup(name: &str) -> Option<BuiltinFn> {
    REGISTRY.get(name).copied()
}

pub fn is_builtin(name: &str) -> bool {
    REGISTRY.contains_key(name)
}
