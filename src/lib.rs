//! mosaicsh - a small interactive command interpreter
//!
//! This library holds everything the `mosaicsh` binary does apart from
//! line editing: parsing, expansion, pipeline execution, builtins, job
//! control and configuration.
//!
//! ## Module Organization
//!
//! ### Front end
//!
//! - [`expansion`] - Brace expansion, alias expansion, `$VAR` lookup
//! - [`parser`] - Command splitting, tokenizing, redirections
//! - [`shell`] - Drives one line through the stages below
//!
//! ### Execution
//!
//! - [`execution`] - Program lookup and pipeline execution
//! - [`builtins`] - Commands that run inside the shell process
//! - [`jobs`] - Job table, `fg`/`bg` and process waiting
//! - [`platform`] - Signal dispositions for interactive use
//!
//! ### State and settings
//!
//! - [`session`] - Aliases, variables, `$?`, jobs and history of one session
//! - [`history`] - Command history with file persistence
//! - [`config`] - TOML/JSON configuration and prompt rendering
//! - [`models`] - Parsed commands, pipelines and jobs
//! - [`mod@error`] - Error types and Result aliases
//!
//! ## Quick Start
//!
//! ```no_run
//! use mosaicsh::{Shell, ShellSession};
//!
//! let mut shell = Shell::new(ShellSession::default());
//! let status = shell.run_line("echo {a,b}{1,2} | tr a-z A-Z");
//! assert_eq!(status, 0);
//! ```
//!
//! ## Platform Support
//!
//! Unix only. Pipelines, process groups and job control are built on
//! `std::process` and `nix`.

#![allow(unexpected_cfgs)]

#[macro_use]
extern crate tracing;

pub mod config;
pub mod error;
pub mod history;
pub mod session;
pub mod shell;

// Front end
pub mod expansion;
pub mod parser;

// Execution
pub mod builtins;
pub mod execution;
pub mod jobs;
pub mod platform;

// Model modules
pub mod models;

// Re-exports for core functionality
pub use config::{Config, ConfigLoader, PromptFormatter};
pub use error::{Error, Result};
pub use history::HistoryManager;
pub use session::ShellSession;
pub use shell::Shell;

// Version information
/// The current version of mosaicsh from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The application name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// The application description from Cargo.toml
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build a session from the configuration.
///
/// History is loaded from the configured file; a history file that cannot
/// be read is logged and the session starts with empty history.
pub fn create_session(config: &Config) -> ShellSession {
    info!("initializing {} v{}", NAME, VERSION);

    let mut history = config.history.manager();
    match history.load() {
        Ok(()) => debug!("loaded {} history entries", history.len()),
        Err(e) => warn!("{}", e),
    }

    ShellSession::new(history)
}
