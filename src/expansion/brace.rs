//! Brace expansion
//!
//! `pre{a,b}post` becomes `preapost prebpost`, and `{1..3}` / `{a..c}`
//! generate ranges. Braces inside quotes, escaped braces and the `{` of
//! `${NAME}` never open a group. A string without a valid group expands to
//! itself.

use crate::parser::quote::{unit_spans, QuoteScanner, ScannedChar};

/// Expand every brace group of one whitespace-delimited unit.
///
/// Always returns at least one string. Groups multiply left to right.
pub fn expand_braces(unit: &str) -> Vec<String> {
    let scanned: Vec<ScannedChar> = QuoteScanner::new(unit).collect();

    for (pos, open) in scanned.iter().enumerate() {
        if !is_group_opener(&scanned, pos) {
            continue;
        }
        let Some(close_pos) = matching_close(&scanned, pos) else {
            continue;
        };
        let close = &scanned[close_pos];
        let Some(values) = group_values(unit, &scanned[pos + 1..close_pos], open.index, close.index)
        else {
            continue;
        };

        let prefix = &unit[..open.index];
        let suffix = &unit[close.index + 1..];
        trace!("brace group {:?} in {:?}", &unit[open.index..=close.index], unit);
        return values
            .iter()
            .flat_map(|value| expand_braces(&format!("{prefix}{value}{suffix}")))
            .collect();
    }

    vec![unit.to_string()]
}

/// Brace-expand each unit of a full command line, keeping the separators
/// and operators between units as they were.
///
/// A generated word directly before `<` or `>` is spaced off so it cannot
/// read as a descriptor prefix such as `2>`.
pub fn expand_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut last = 0;
    for (start, end) in unit_spans(line) {
        out.push_str(&line[last..start]);
        let unit = &line[start..end];
        let words = expand_braces(unit);
        let changed = words.len() != 1 || words[0] != unit;
        out.push_str(&words.join(" "));
        if changed && line[end..].starts_with(['<', '>']) {
            out.push(' ');
        }
        last = end;
    }
    out.push_str(&line[last..]);
    out
}

fn is_group_opener(scanned: &[ScannedChar], pos: usize) -> bool {
    let sc = &scanned[pos];
    if !(sc.structural && sc.ch == '{') {
        return false;
    }
    // `${` belongs to parameter syntax
    !matches!(pos.checked_sub(1).map(|p| &scanned[p]), Some(prev) if prev.structural && prev.ch == '$')
}

fn matching_close(scanned: &[ScannedChar], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (pos, sc) in scanned.iter().enumerate().skip(open) {
        if !sc.structural {
            continue;
        }
        match sc.ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(pos);
                }
            }
            _ => {}
        }
    }
    None
}

/// Values of the group between `open` and `close` (byte offsets), or
/// `None` if the interior is neither a list nor a valid range.
fn group_values(
    unit: &str,
    interior: &[ScannedChar],
    open: usize,
    close: usize,
) -> Option<Vec<String>> {
    let mut depth = 0usize;
    let mut commas = Vec::new();
    for sc in interior.iter().filter(|sc| sc.structural) {
        match sc.ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => commas.push(sc.index),
            _ => {}
        }
    }

    if !commas.is_empty() {
        let mut items = Vec::with_capacity(commas.len() + 1);
        let mut start = open + 1;
        for comma in commas {
            items.push(unit[start..comma].to_string());
            start = comma + 1;
        }
        items.push(unit[start..close].to_string());
        return Some(items);
    }

    expand_range(&unit[open + 1..close])
}

/// Largest number of values a single range may generate; bigger ranges
/// stay literal
pub const MAX_RANGE_LEN: u64 = 100_000;

fn range_too_long(span: u64, interior: &str) -> bool {
    if span >= MAX_RANGE_LEN {
        warn!("brace range {{{}}} exceeds {} values; left literal", interior, MAX_RANGE_LEN);
        return true;
    }
    false
}

/// `start..end` as an integer or character sequence
fn expand_range(interior: &str) -> Option<Vec<String>> {
    let (start, end) = interior.split_once("..")?;

    if let (Ok(from), Ok(to)) = (start.parse::<i64>(), end.parse::<i64>()) {
        if range_too_long(from.abs_diff(to), interior) {
            return None;
        }
        let width = if start.len() > 1 && start.starts_with('0') {
            start.len()
        } else {
            0
        };
        let values = if from <= to {
            (from..=to).map(|n| format!("{n:0width$}")).collect()
        } else {
            (to..=from).rev().map(|n| format!("{n:0width$}")).collect()
        };
        return Some(values);
    }

    let mut s = start.chars();
    let mut e = end.chars();
    match (s.next(), s.next(), e.next(), e.next()) {
        (Some(a), None, Some(b), None) => {
            let (a, b) = (a as u32, b as u32);
            if range_too_long(u64::from(a.abs_diff(b)), interior) {
                return None;
            }
            let codes: Vec<u32> = if a <= b {
                (a..=b).collect()
            } else {
                (b..=a).rev().collect()
            };
            Some(
                codes
                    .into_iter()
                    .filter_map(char::from_u32)
                    .map(String::from)
                    .collect(),
            )
        }
        _ => None,
    }
}
