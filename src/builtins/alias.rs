//! `alias` and `unalias`

use std::io::Write;

use super::{BuiltinFn, BuiltinOutput};
use crate::session::ShellSession;

pub const BUILTINS: &[(&str, BuiltinFn)] = &[("alias", alias), ("unalias", unalias)];

/// Render a definition so it can be pasted back into the shell
fn format_alias(name: &str, value: &str) -> String {
    format!("alias {}='{}'", name, value.replace('\'', r"'\''"))
}

/// `alias` lists, `alias name` shows one, `alias name=value` defines
pub fn alias(session: &mut ShellSession, args: &[String], _notices: &mut dyn Write) -> BuiltinOutput {
    let mut out = BuiltinOutput::success();

    if args.is_empty() {
        for (name, value) in session.aliases.iter() {
            out.println(format_alias(name, value));
        }
        return out;
    }

    for arg in args {
        match arg.split_once('=') {
            Some((name, _)) if name.is_empty() => {
                out.eprintln(format!("alias: `{arg}': invalid alias name"));
                out.status = 1;
            }
            Some((name, value)) => {
                debug!("alias {}={:?}", name, value);
                session.aliases.set(name, value);
            }
            None => match session.aliases.get(arg) {
                Some(value) => out.println(format_alias(arg, value)),
                None => {
                    out.eprintln(format!("alias: {arg}: not found"));
                    out.status = 1;
                }
            },
        }
    }
    out
}

/// `unalias [-a] name...`
pub fn unalias(session: &mut ShellSession, args: &[String], _notices: &mut dyn Write) -> BuiltinOutput {
    if args.is_empty() {
        return BuiltinOutput::failure(2, "unalias: usage: unalias [-a] name [name ...]");
    }
    if args.iter().any(|a| a == "-a") {
        session.aliases.clear();
        return BuiltinOutput::success();
    }

    let mut out = BuiltinOutput::success();
    for name in args {
        if session.aliases.remove(name).is_none() {
            out.eprintln(format!("unalias: {name}: not found"));
            out.status = 1;
        }
    }
    out
}
