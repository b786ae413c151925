//! Shell session state
//!
//! Everything a command can observe or change between lines lives here:
//! `$?`, aliases, jobs, variables and history. The session is created once
//! at startup, passed explicitly to every builtin and to the orchestrator,
//! and torn down when the shell exits.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::Result;
use crate::expansion::{AliasTable, ExpansionContext};
use crate::history::HistoryManager;
use crate::jobs::JobController;

/// Process-wide interpreter state
#[derive(Debug)]
pub struct ShellSession {
    /// Exit status of the last command, exposed as `$?`
    pub last_status: i32,
    /// Alias definitions
    pub aliases: AliasTable,
    /// Background and stopped jobs
    pub jobs: JobController,
    /// Variables; all of them are exported to child processes
    pub env: HashMap<String, String>,
    /// Command history
    pub history: HistoryManager,
    exit_request: Option<i32>,
}

impl ShellSession {
    /// Session seeded from the process environment
    pub fn new(history: HistoryManager) -> Self {
        let mut env: HashMap<String, String> = std::env::vars().collect();
        if let Ok(cwd) = std::env::current_dir() {
            env.insert("PWD".to_string(), cwd.display().to_string());
        }
        Self::with_env(env, history)
    }

    /// Session with an explicit variable map
    pub fn with_env(env: HashMap<String, String>, history: HistoryManager) -> Self {
        Self {
            last_status: 0,
            aliases: AliasTable::new(),
            jobs: JobController::new(),
            env,
            history,
            exit_request: None,
        }
    }

    /// View used by the tokenizer for `$NAME`, `$?` and `~`
    pub fn expansion_context(&self) -> ExpansionContext<'_> {
        ExpansionContext::new(&self.env, self.last_status)
    }

    pub fn var(&self, name: &str) -> Option<&str> {
        self.env.get(name).map(String::as_str)
    }

    pub fn set_var(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.env.insert(name.into(), value.into());
    }

    /// Directory commands run in
    pub fn cwd(&self) -> PathBuf {
        std::env::current_dir()
            .ok()
            .or_else(|| self.var("PWD").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("/"))
    }

    /// Search list for external programs
    pub fn search_path(&self) -> &str {
        self.var("PATH").unwrap_or("")
    }

    /// Ask the driver to end the session with `code`
    pub fn request_exit(&mut self, code: i32) {
        self.exit_request = Some(code);
    }

    pub fn exit_requested(&self) -> Option<i32> {
        self.exit_request
    }

    /// Flush collaborators that own external state (the history file)
    pub fn teardown(&mut self) -> Result<()> {
        if let Err(e) = self.history.save() {
            warn!("{}", e);
            return Err(e);
        }
        debug!("session torn down");
        Ok(())
    }
}

impl Default for ShellSession {
    fn default() -> Self {
        Self::new(HistoryManager::in_memory())
    }
}
