//! Alias expansion
//!
//! Only the leading word of a line is looked up. A replacement may itself
//! start with an alias, so expansion recurses; an [`ExpansionGuard`] records
//! the names already substituted in the chain and stops a name from being
//! expanded twice.

use std::collections::{BTreeMap, BTreeSet};

use crate::parser::quote::QuoteScanner;

/// Name to replacement text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: BTreeMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define or redefine an alias
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Remove an alias, returning its replacement if it existed
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Aliases in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Alias names already substituted in the current rewrite chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionGuard {
    seen: BTreeSet<String>,
}

impl ExpansionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    /// A new guard that also holds `name`; `self` is left untouched
    pub fn with(&self, name: &str) -> Self {
        let mut seen = self.seen.clone();
        seen.insert(name.to_string());
        Self { seen }
    }
}

/// Byte span of the first word of `line`
fn leading_word(line: &str) -> Option<(usize, usize)> {
    let mut start = None;
    for sc in QuoteScanner::new(line) {
        let ends_word = sc.structural && (sc.ch.is_whitespace() || matches!(sc.ch, ';' | '|' | '&'));
        match (start, ends_word) {
            (None, true) if sc.ch.is_whitespace() => continue,
            (None, true) => return None,
            (None, false) => start = Some(sc.index),
            (Some(s), true) => return Some((s, sc.index)),
            (Some(_), false) => {}
        }
    }
    start.map(|s| (s, line.len()))
}

/// Rewrite the leading word of `line` if it names an alias not yet in
/// `guard`, then repeat on the result.
pub fn expand_aliases(line: &str, aliases: &AliasTable, guard: &ExpansionGuard) -> String {
    let Some((start, end)) = leading_word(line) else {
        return line.to_string();
    };
    let word = &line[start..end];
    if guard.contains(word) {
        return line.to_string();
    }
    let Some(replacement) = aliases.get(word) else {
        return line.to_string();
    };

    let rewritten = format!("{}{}{}", &line[..start], replacement, &line[end..]);
    trace!("alias {} -> {:?}", word, rewritten);
    expand_aliases(&rewritten, aliases, &guard.with(word))
}
