//! Parameter substitution: `$NAME`, `${NAME}` and `$?`
//!
//! Called by the tokenizer right after it consumes an active `$`, so the
//! quoting rules (no expansion inside single quotes) live there.

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

/// Read-only view of the session values parameter expansion needs
#[derive(Debug, Clone, Copy)]
pub struct ExpansionContext<'a> {
    /// Environment variable map
    pub env: &'a HashMap<String, String>,
    /// Exit status of the previous command, exposed as `$?`
    pub last_status: i32,
}

impl<'a> ExpansionContext<'a> {
    pub fn new(env: &'a HashMap<String, String>, last_status: i32) -> Self {
        Self { env, last_status }
    }

    /// Value of a variable, or the empty string when unset
    pub fn lookup(&self, name: &str) -> &str {
        self.env.get(name).map(String::as_str).unwrap_or("")
    }

    /// Target of `~` expansion
    pub fn home(&self) -> Option<&str> {
        self.env.get("HOME").map(String::as_str)
    }
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_name_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

/// True if `name` is a valid shell identifier
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if is_name_start(c)) && chars.all(is_name_char)
}

/// Expand the parameter following a `$` that has already been consumed.
///
/// Anything that does not form a parameter reference leaves the `$` literal
/// and consumes nothing else.
pub fn expand_parameter(chars: &mut Peekable<Chars<'_>>, ctx: &ExpansionContext<'_>) -> String {
    match chars.peek().copied() {
        Some('?') => {
            chars.next();
            ctx.last_status.to_string()
        }
        Some('{') => {
            let mut lookahead = chars.clone();
            lookahead.next();
            let mut name = String::new();
            while let Some(c) = lookahead.next() {
                if c == '}' {
                    let value = if name == "?" {
                        Some(ctx.last_status.to_string())
                    } else if is_identifier(&name) {
                        Some(ctx.lookup(&name).to_string())
                    } else {
                        None
                    };
                    return match value {
                        Some(value) => {
                            *chars = lookahead;
                            value
                        }
                        None => "$".to_string(),
                    };
                }
                name.push(c);
            }
            // unterminated `${`
            "$".to_string()
        }
        Some(c) if is_name_start(c) => {
            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if !is_name_char(c) {
                    break;
                }
                name.push(c);
                chars.next();
            }
            ctx.lookup(&name).to_string()
        }
        _ => "$".to_string(),
    }
}
