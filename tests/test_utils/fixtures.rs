//! Test Fixtures
//!
//! Common environment and file helpers

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Variables a child needs to find the usual tools
pub fn create_test_env() -> HashMap<String, String> {
    let mut env = HashMap::new();
    env.insert(
        "PATH".to_string(),
        std::env::var("PATH").unwrap_or_else(|_| "/usr/local/bin:/usr/bin:/bin".to_string()),
    );
    env.insert("HOME".to_string(), "/home/tester".to_string());
    env.insert("USER".to_string(), "tester".to_string());
    env
}

/// Write `content` to `name` inside `dir` and return the full path
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}
