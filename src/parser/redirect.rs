//! Redirection resolver
//!
//! Pulls redirection operators and their filenames out of a token stream,
//! leaving only positional arguments behind.

use std::path::PathBuf;

use super::tokenizer::{RedirectOp, Token};
use crate::error::{Error, Result};
use crate::models::{ParsedCommand, RedirectionSpec, Redirections};

/// Build a `ParsedCommand` from tokens.
///
/// A later redirection of the same stream replaces an earlier one. An
/// operator with no filename after it is an error for this command only.
pub fn resolve(tokens: Vec<Token>) -> Result<ParsedCommand> {
    let mut args = Vec::new();
    let mut redirections = Redirections::default();
    let mut iter = tokens.into_iter();

    while let Some(token) = iter.next() {
        match token {
            Token::Word(word) => args.push(word),
            Token::Redirect(op) => {
                let path = match iter.next() {
                    Some(Token::Word(target)) => PathBuf::from(target),
                    _ => {
                        return Err(Error::MissingRedirectionTarget {
                            command: args.first().cloned().unwrap_or_else(|| op.as_str().to_string()),
                        })
                    }
                };
                match op {
                    RedirectOp::StdoutTruncate => {
                        redirections.stdout = RedirectionSpec::ToFile { path, append: false }
                    }
                    RedirectOp::StdoutAppend => {
                        redirections.stdout = RedirectionSpec::ToFile { path, append: true }
                    }
                    RedirectOp::StderrTruncate => {
                        redirections.stderr = RedirectionSpec::ToFile { path, append: false }
                    }
                    RedirectOp::StderrAppend => {
                        redirections.stderr = RedirectionSpec::ToFile { path, append: true }
                    }
                    RedirectOp::Stdin => redirections.stdin = RedirectionSpec::FromFile { path },
                }
            }
        }
    }

    Ok(ParsedCommand {
        args,
        redirections,
        background: false,
    })
}
