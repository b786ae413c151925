//! Quote-aware character scanning
//!
//! Brace expansion, alias lookup and command splitting all need to know
//! whether a character sits outside any quote and is not escaped. The
//! tokenizer owns the full quote-removal state machine; this scanner only
//! classifies characters and never rewrites them.

/// Quoting mode a character is read in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteMode {
    /// Outside any quotes
    #[default]
    Unquoted,
    /// Inside `'...'`
    Single,
    /// Inside `"..."`
    Double,
}

/// A character of the input plus its quoting context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedChar {
    /// Byte offset of the character in the input
    pub index: usize,
    /// The character itself
    pub ch: char,
    /// Mode the character was read in
    pub mode: QuoteMode,
    /// True when the character is unquoted, unescaped and not itself a
    /// quote or escape marker
    pub structural: bool,
}

/// Iterator classifying every character of a line
pub struct QuoteScanner<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    mode: QuoteMode,
    escaped: bool,
}

impl<'a> QuoteScanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().peekable(),
            mode: QuoteMode::Unquoted,
            escaped: false,
        }
    }
}

impl Iterator for QuoteScanner<'_> {
    type Item = ScannedChar;

    fn next(&mut self) -> Option<ScannedChar> {
        let (index, ch) = self.chars.next()?;
        let mode = self.mode;

        if self.escaped {
            self.escaped = false;
            return Some(ScannedChar {
                index,
                ch,
                mode,
                structural: false,
            });
        }

        let structural = match (mode, ch) {
            (QuoteMode::Unquoted, '\\') | (QuoteMode::Double, '\\') => {
                self.escaped = true;
                false
            }
            (QuoteMode::Unquoted, '\'') => {
                self.mode = QuoteMode::Single;
                false
            }
            (QuoteMode::Unquoted, '"') => {
                self.mode = QuoteMode::Double;
                false
            }
            (QuoteMode::Single, '\'') | (QuoteMode::Double, '"') => {
                self.mode = QuoteMode::Unquoted;
                false
            }
            (QuoteMode::Unquoted, _) => true,
            _ => false,
        };

        Some(ScannedChar {
            index,
            ch,
            mode,
            structural,
        })
    }
}

/// Split `input` at every structural occurrence of `sep`.
///
/// Always returns at least one piece; pieces are not trimmed.
pub fn split_unquoted(input: &str, sep: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for sc in QuoteScanner::new(input) {
        if sc.structural && sc.ch == sep {
            pieces.push(&input[start..sc.index]);
            start = sc.index + sc.ch.len_utf8();
        }
    }
    pieces.push(&input[start..]);
    pieces
}

/// Byte offset of the first structural character matching `pred`
pub fn find_unquoted(input: &str, pred: impl Fn(char) -> bool) -> Option<usize> {
    QuoteScanner::new(input)
        .find(|sc| sc.structural && pred(sc.ch))
        .map(|sc| sc.index)
}

/// Characters that end a unit even without surrounding whitespace
pub const OPERATOR_CHARS: [char; 5] = [';', '|', '&', '<', '>'];

/// Byte spans of the units of a line: runs of text delimited by
/// whitespace and the operators in [`OPERATOR_CHARS`].
///
/// Delimiters inside quotes or after a backslash do not delimit.
pub fn unit_spans(input: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    for sc in QuoteScanner::new(input) {
        let separator =
            sc.structural && (sc.ch.is_whitespace() || OPERATOR_CHARS.contains(&sc.ch));
        match (separator, start) {
            (true, Some(s)) => {
                spans.push((s, sc.index));
                start = None;
            }
            (false, None) => start = Some(sc.index),
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, input.len()));
    }
    spans
}
