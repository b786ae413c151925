//! Command history
//!
//! In-memory list of entered lines with optional file persistence. The
//! `history` builtin reads and writes it; the REPL adds every line and
//! flushes the list to the history file when the session ends.

use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default history file name, relative to the home directory
pub const DEFAULT_HISTORY_FILE: &str = ".mosaicsh_history";

/// Default number of entries kept
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Command history manager
#[derive(Debug, Clone)]
pub struct HistoryManager {
    /// History file; `None` keeps history in memory only
    history_file: Option<PathBuf>,
    /// Entries, oldest first
    history: VecDeque<String>,
    /// Maximum history size
    max_size: usize,
    /// Entries added since the last append or write
    unsynced: usize,
}

impl HistoryManager {
    /// History backed by `path`; nothing is read until [`load`](Self::load)
    pub fn new(history_file: Option<PathBuf>, max_size: usize) -> Self {
        Self {
            history_file,
            history: VecDeque::new(),
            max_size: max_size.max(1),
            unsynced: 0,
        }
    }

    /// History that is never written to disk unless asked explicitly
    pub fn in_memory() -> Self {
        Self::new(None, DEFAULT_MAX_ENTRIES)
    }

    /// `~/.mosaicsh_history`
    pub fn default_history_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_HISTORY_FILE))
    }

    fn history_error(path: &Path, err: std::io::Error) -> Error {
        Error::History {
            path: path.to_path_buf(),
            reason: crate::error::describe_io_error(&err),
        }
    }

    /// Replace the in-memory list with the history file's contents.
    /// A missing file is not an error.
    pub fn load(&mut self) -> Result<()> {
        let Some(path) = self.history_file.clone() else {
            return Ok(());
        };
        if !path.exists() {
            return Ok(());
        }
        self.history.clear();
        self.read_from(&path)?;
        self.unsynced = 0;
        Ok(())
    }

    /// Append the lines of `path` to the in-memory list
    pub fn read_from(&mut self, path: &Path) -> Result<usize> {
        let content = fs::read_to_string(path).map_err(|e| Self::history_error(path, e))?;
        let mut count = 0;
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            self.history.push_back(line.to_string());
            count += 1;
        }
        self.trim();
        Ok(count)
    }

    /// Write the whole list to the history file
    pub fn save(&mut self) -> Result<()> {
        match self.history_file.clone() {
            Some(path) => self.write_to(&path),
            None => Ok(()),
        }
    }

    /// Write the whole list to `path`, replacing its contents
    pub fn write_to(&mut self, path: &Path) -> Result<()> {
        let mut text = String::new();
        for entry in &self.history {
            text.push_str(entry);
            text.push('\n');
        }
        fs::write(path, text).map_err(|e| Self::history_error(path, e))?;
        self.unsynced = 0;
        Ok(())
    }

    /// Append entries added since the last append or write to `path`
    pub fn append_to(&mut self, path: &Path) -> Result<usize> {
        let start = self.history.len().saturating_sub(self.unsynced);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| Self::history_error(path, e))?;
        let mut count = 0;
        for entry in self.history.iter().skip(start) {
            writeln!(file, "{}", entry).map_err(|e| Self::history_error(path, e))?;
            count += 1;
        }
        self.unsynced = 0;
        Ok(count)
    }

    /// Add a line. Blank lines and repeats of the previous line are skipped.
    pub fn add(&mut self, command: &str) {
        let command = command.trim_end();
        if command.trim().is_empty() {
            return;
        }
        if self.history.back().map(String::as_str) == Some(command) {
            return;
        }
        self.history.push_back(command.to_string());
        self.unsynced += 1;
        self.trim();
    }

    fn trim(&mut self) {
        while self.history.len() > self.max_size {
            self.history.pop_front();
        }
        self.unsynced = self.unsynced.min(self.history.len());
    }

    /// All entries, oldest first
    pub fn entries(&self) -> &VecDeque<String> {
        &self.history
    }

    /// The last `n` entries with their 1-based numbers
    pub fn tail(&self, n: usize) -> Vec<(usize, &str)> {
        let skip = self.history.len().saturating_sub(n);
        self.history
            .iter()
            .enumerate()
            .skip(skip)
            .map(|(i, e)| (i + 1, e.as_str()))
            .collect()
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.unsynced = 0;
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn history_file(&self) -> Option<&Path> {
        self.history_file.as_deref()
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::in_memory()
    }
}
