//! Test Utilities
//!
//! A [`TestShell`] runs lines against a fresh session and keeps everything
//! written to stdout and stderr, including the output of external
//! programs, in memory.

#![allow(dead_code)]

pub mod fixtures;

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use mosaicsh::{HistoryManager, Shell, ShellSession};

pub use fixtures::{create_test_env, write_file};

/// Cloneable in-memory sink
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Return the contents and empty the buffer
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.0.lock().unwrap());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Shell wired to in-memory sinks
pub struct TestShell {
    pub shell: Shell,
    pub out: SharedBuffer,
    pub err: SharedBuffer,
}

impl TestShell {
    /// Shell over [`create_test_env`] with in-memory history
    pub fn new() -> Self {
        Self::with_env(create_test_env())
    }

    pub fn with_env(env: HashMap<String, String>) -> Self {
        let out = SharedBuffer::default();
        let err = SharedBuffer::default();
        let session = ShellSession::with_env(env, HistoryManager::in_memory());
        let shell = Shell::with_output(session, Box::new(out.clone()), Box::new(err.clone()));
        Self { shell, out, err }
    }

    /// Run one line, returning its status
    pub fn run(&mut self, line: &str) -> i32 {
        self.shell.run_line(line)
    }

    /// Run one line and return what it wrote to stdout
    pub fn output(&mut self, line: &str) -> String {
        self.out.take();
        self.shell.run_line(line);
        self.out.take()
    }

    pub fn session(&mut self) -> &mut ShellSession {
        self.shell.session_mut()
    }
}

impl Default for TestShell {
    fn default() -> Self {
        Self::new()
    }
}
