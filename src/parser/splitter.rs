//! Command splitter
//!
//! Segments a line into `;`-separated commands, each either a variable
//! assignment or a pipeline of `|`-separated stages with an optional
//! trailing `&`. Stage text is returned raw: tokenizing is deferred until
//! the command runs so `$?` reflects the commands before it.

use once_cell::sync::Lazy;
use regex::Regex;

use super::quote::{split_unquoted, QuoteScanner};

static ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^([A-Za-z_][A-Za-z0-9_]*)=(.*)$").expect("assignment pattern is valid")
});

/// One sequential command of a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandUnit {
    /// `NAME=value`; the value is still raw text
    Assignment { name: String, value: String },
    /// Pipeline stages as raw text
    Pipeline {
        stages: Vec<String>,
        background: bool,
        text: String,
    },
}

/// Split a line into sequential command units.
///
/// Empty segments and empty pipeline stages are dropped.
pub fn split_commands(line: &str) -> Vec<CommandUnit> {
    split_unquoted(line, ';')
        .into_iter()
        .filter_map(parse_segment)
        .collect()
}

fn parse_segment(segment: &str) -> Option<CommandUnit> {
    let trimmed = segment.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (body, background) = strip_background(trimmed);
    if body.is_empty() {
        return None;
    }

    let stages: Vec<String> = split_unquoted(body, '|')
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if stages.len() == 1 {
        if let Some(caps) = ASSIGNMENT.captures(&stages[0]) {
            return Some(CommandUnit::Assignment {
                name: caps[1].to_string(),
                value: caps[2].to_string(),
            });
        }
    }

    if stages.is_empty() {
        return None;
    }

    Some(CommandUnit::Pipeline {
        stages,
        background,
        text: body.to_string(),
    })
}

/// Remove a trailing structural `&`
fn strip_background(segment: &str) -> (&str, bool) {
    let last = QuoteScanner::new(segment).last();
    match last {
        Some(sc) if sc.structural && sc.ch == '&' => (segment[..sc.index].trim_end(), true),
        _ => (segment, false),
    }
}
