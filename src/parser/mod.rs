//! Command-line parsing
//!
//! - [`quote`] - quote-aware character classification shared by every pass
//! - [`tokenizer`] - quote removal, escapes and parameter expansion
//! - [`redirect`] - redirection extraction into `ParsedCommand`
//! - [`splitter`] - `;`, `|` and `&` segmentation

pub mod quote;
pub mod redirect;
pub mod splitter;
pub mod tokenizer;

pub use splitter::{split_commands, CommandUnit};
pub use tokenizer::{tokenize, RedirectOp, Token};

use crate::error::Result;
use crate::expansion::parameter::ExpansionContext;
use crate::models::ParsedCommand;

/// Tokenize one pipeline stage and resolve its redirections
pub fn parse_command(text: &str, ctx: &ExpansionContext<'_>) -> Result<ParsedCommand> {
    redirect::resolve(tokenize(text, ctx))
}
