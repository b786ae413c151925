//! Prompt Formatting
//!
//! Expands `$USER`, `$HOSTNAME`, `$PWD`, `$HOME`, `$SHELL` and `$?` in the
//! configured prompt template. `$$` produces a literal `$`, so `$$USER`
//! renders as `$USER`.

use std::collections::HashMap;
use std::path::Path;

/// Prompt formatter that handles variable substitution
#[derive(Debug, Clone)]
pub struct PromptFormatter {
    /// The format template
    format: String,
}

const VARIABLES: &[&str] = &["HOSTNAME", "SHELL", "USER", "HOME", "PWD", "?"];

impl PromptFormatter {
    /// Create a new prompt formatter with the given format string
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    /// Render the prompt for the given variables, directory and last status
    pub fn render(&self, env: &HashMap<String, String>, working_dir: &Path, last_status: i32) -> String {
        let home = env.get("HOME").map(String::as_str).unwrap_or("/");
        let mut result = String::with_capacity(self.format.len() + 32);
        let mut rest = self.format.as_str();

        while let Some(pos) = rest.find('$') {
            result.push_str(&rest[..pos]);
            rest = &rest[pos + 1..];

            if let Some(after) = rest.strip_prefix('$') {
                result.push('$');
                rest = after;
                continue;
            }

            match VARIABLES.iter().find(|name| rest.starts_with(*name)) {
                Some(name) => {
                    let value = match *name {
                        "USER" => env
                            .get("USER")
                            .or_else(|| env.get("USERNAME"))
                            .cloned()
                            .unwrap_or_else(|| "user".to_string()),
                        "HOSTNAME" => hostname::get()
                            .ok()
                            .and_then(|h| h.into_string().ok())
                            .unwrap_or_else(|| "localhost".to_string()),
                        "PWD" => abbreviate_home(working_dir, home),
                        "HOME" => home.to_string(),
                        "SHELL" => env.get("SHELL").cloned().unwrap_or_else(|| "sh".to_string()),
                        _ => last_status.to_string(),
                    };
                    result.push_str(&value);
                    rest = &rest[name.len()..];
                }
                None => result.push('$'),
            }
        }
        result.push_str(rest);
        result
    }
}

impl Default for PromptFormatter {
    fn default() -> Self {
        Self::new("$USER@$HOSTNAME:$PWD$ ")
    }
}

/// `working_dir` with the home directory shown as `~`
fn abbreviate_home(working_dir: &Path, home: &str) -> String {
    if home != "/" {
        if let Ok(stripped) = working_dir.strip_prefix(home) {
            if stripped.as_os_str().is_empty() {
                return "~".to_string();
            }
            return format!("~/{}", stripped.display());
        }
    }
    working_dir.display().to_string()
}
