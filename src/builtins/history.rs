//! `history`: list, clear, read, write and append the command history

use std::io::Write;
use std::path::PathBuf;

use super::{BuiltinFn, BuiltinOutput};
use crate::session::ShellSession;

pub const BUILTINS: &[(&str, BuiltinFn)] = &[("history", history)];

fn file_argument(session: &ShellSession, arg: Option<&String>) -> Option<PathBuf> {
    arg.map(PathBuf::from)
        .or_else(|| session.history.history_file().map(PathBuf::from))
}

/// `history [N]`, `history -c`, `history -r|-w|-a [file]`
pub fn history(session: &mut ShellSession, args: &[String], _notices: &mut dyn Write) -> BuiltinOutput {
    let flag = args.first().map(String::as_str);

    if let Some(op @ ("-r" | "-w" | "-a")) = flag {
        let Some(path) = file_argument(session, args.get(1)) else {
            return BuiltinOutput::failure(1, "history: no history file");
        };
        let result = match op {
            "-r" => session.history.read_from(&path).map(|_| ()),
            "-w" => session.history.write_to(&path),
            _ => session.history.append_to(&path).map(|_| ()),
        };
        return match result {
            Ok(()) => BuiltinOutput::success(),
            Err(e) => BuiltinOutput::failure(1, e),
        };
    }

    let count = match flag {
        Some("-c") => {
            session.history.clear();
            return BuiltinOutput::success();
        }
        None => session.history.len(),
        Some(n) => match n.parse::<usize>() {
            Ok(n) => n,
            Err(_) => {
                return BuiltinOutput::failure(1, format!("history: {n}: numeric argument required"))
            }
        },
    };

    let mut out = BuiltinOutput::success();
    for (number, entry) in session.history.tail(count) {
        out.println(format!("{number:>5}  {entry}"));
    }
    out
}
