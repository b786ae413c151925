//! Expansion passes applied to a line before it is executed
//!
//! Brace expansion and alias expansion rewrite raw text; parameter
//! expansion runs inside the tokenizer.

pub mod alias;
pub mod brace;
pub mod parameter;

pub use alias::{expand_aliases, AliasTable, ExpansionGuard};
pub use brace::{expand_braces, expand_line};
pub use parameter::ExpansionContext;
