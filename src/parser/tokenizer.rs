//! Tokenizer / quote parser
//!
//! Turns one command's text into words and redirection operators. The state
//! machine runs over three modes (unquoted, single-quoted, double-quoted) and
//! never fails: an unterminated quote simply runs to the end of the line.
//! Parameter expansion happens here, while the quoting context is known.

use super::quote::QuoteMode;
use crate::expansion::parameter::{expand_parameter, ExpansionContext};

/// Redirection operator as written in the command text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectOp {
    /// `>` or `1>`
    StdoutTruncate,
    /// `>>` or `1>>`
    StdoutAppend,
    /// `2>`
    StderrTruncate,
    /// `2>>`
    StderrAppend,
    /// `<`
    Stdin,
}

impl RedirectOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedirectOp::StdoutTruncate => ">",
            RedirectOp::StdoutAppend => ">>",
            RedirectOp::StderrTruncate => "2>",
            RedirectOp::StderrAppend => "2>>",
            RedirectOp::Stdin => "<",
        }
    }
}

/// A lexical unit of one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A fully resolved argument
    Word(String),
    /// A redirection operator; its filename is the following word
    Redirect(RedirectOp),
}

/// Word under construction
#[derive(Debug, Default)]
struct WordBuffer {
    text: String,
    /// A word exists even if `text` is empty (`""` yields an empty argument)
    started: bool,
    /// Only bare, unescaped, unquoted characters so far
    plain: bool,
}

impl WordBuffer {
    fn push_plain(&mut self, c: char) {
        if !self.started {
            self.started = true;
            self.plain = true;
        }
        self.text.push(c);
    }

    fn push_literal(&mut self, c: char) {
        self.started = true;
        self.plain = false;
        self.text.push(c);
    }

    fn push_literal_str(&mut self, s: &str) {
        self.started = true;
        self.plain = false;
        self.text.push_str(s);
    }

    fn push_expansion(&mut self, value: &str) {
        if !value.is_empty() {
            self.started = true;
            self.plain = false;
            self.text.push_str(value);
        }
    }

    fn mark_quoted(&mut self) {
        self.started = true;
        self.plain = false;
    }

    /// Take a bare `1` or `2` that directly precedes `>`
    fn take_fd_prefix(&mut self) -> Option<char> {
        if self.started && self.plain && (self.text == "1" || self.text == "2") {
            let fd = self.text.chars().next();
            *self = WordBuffer::default();
            fd
        } else {
            None
        }
    }

    fn flush(&mut self, tokens: &mut Vec<Token>) {
        if self.started {
            tokens.push(Token::Word(std::mem::take(&mut self.text)));
        }
        *self = WordBuffer::default();
    }
}

/// Tokenize one command with quote removal, escapes, `~` and parameter
/// expansion applied.
pub fn tokenize(input: &str, ctx: &ExpansionContext<'_>) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = WordBuffer::default();
    let mut mode = QuoteMode::Unquoted;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match mode {
            QuoteMode::Single => {
                if c == '\'' {
                    mode = QuoteMode::Unquoted;
                } else {
                    word.push_literal(c);
                }
            }
            QuoteMode::Double => match c {
                '"' => mode = QuoteMode::Unquoted,
                '\\' => match chars.peek().copied() {
                    Some(next @ ('\\' | '"' | '$')) => {
                        chars.next();
                        word.push_literal(next);
                    }
                    _ => word.push_literal('\\'),
                },
                '$' => {
                    let value = expand_parameter(&mut chars, ctx);
                    word.mark_quoted();
                    word.push_expansion(&value);
                }
                _ => word.push_literal(c),
            },
            QuoteMode::Unquoted => match c {
                '\\' => {
                    // a trailing backslash has nothing to escape and is dropped
                    if let Some(next) = chars.next() {
                        word.push_literal(next);
                    }
                }
                '\'' => {
                    mode = QuoteMode::Single;
                    word.mark_quoted();
                }
                '"' => {
                    mode = QuoteMode::Double;
                    word.mark_quoted();
                }
                '$' => {
                    let value = expand_parameter(&mut chars, ctx);
                    word.push_expansion(&value);
                }
                '~' if !word.started && ends_tilde_prefix(chars.peek().copied()) => {
                    match ctx.home() {
                        Some(home) => word.push_literal_str(home),
                        None => word.push_literal('~'),
                    }
                }
                '<' => {
                    word.flush(&mut tokens);
                    tokens.push(Token::Redirect(RedirectOp::Stdin));
                }
                '>' => {
                    let fd = word.take_fd_prefix();
                    word.flush(&mut tokens);
                    let append = chars.next_if_eq(&'>').is_some();
                    let op = match (fd, append) {
                        (Some('2'), false) => RedirectOp::StderrTruncate,
                        (Some('2'), true) => RedirectOp::StderrAppend,
                        (_, false) => RedirectOp::StdoutTruncate,
                        (_, true) => RedirectOp::StdoutAppend,
                    };
                    tokens.push(Token::Redirect(op));
                }
                c if c.is_whitespace() => word.flush(&mut tokens),
                _ => word.push_plain(c),
            },
        }
    }

    word.flush(&mut tokens);
    tokens
}

fn ends_tilde_prefix(next: Option<char>) -> bool {
    match next {
        None => true,
        Some(c) => c == '/' || c.is_whitespace() || c == '<' || c == '>',
    }
}

/// The plain words of a token stream, ignoring redirections
pub fn words(tokens: &[Token]) -> Vec<String> {
    tokens
        .iter()
        .filter_map(|t| match t {
            Token::Word(w) => Some(w.clone()),
            Token::Redirect(_) => None,
        })
        .collect()
}
