//! Basic builtins: `echo`, `cd`, `pwd`, `type`, `exit`, `true`, `false`

use std::io::Write;
use std::path::PathBuf;

use super::{BuiltinFn, BuiltinOutput};
use crate::error::describe_io_error;
use crate::execution::path::resolve_program;
use crate::session::ShellSession;

pub const BUILTINS: &[(&str, BuiltinFn)] = &[
    ("echo", echo),
    ("cd", cd),
    ("pwd", pwd),
    ("type", type_of),
    ("exit", exit),
    ("true", true_),
    ("false", false_),
];

/// `echo [-n] args...`
pub fn echo(_session: &mut ShellSession, args: &[String], _notices: &mut dyn Write) -> BuiltinOutput {
    let newline = args.first().map(String::as_str) != Some("-n");
    let words = if newline { args } else { &args[1..] };
    let mut text = words.join(" ");
    if newline {
        text.push('\n');
    }
    BuiltinOutput::with_stdout(text)
}

/// `cd [dir|-]`
pub fn cd(session: &mut ShellSession, args: &[String], _notices: &mut dyn Write) -> BuiltinOutput {
    if args.len() > 1 {
        return BuiltinOutput::failure(1, "cd: too many arguments");
    }

    let mut out = BuiltinOutput::success();
    let target = match args.first().map(String::as_str) {
        None | Some("~") => match session.var("HOME") {
            Some(home) => PathBuf::from(home),
            None => return BuiltinOutput::failure(1, "cd: HOME not set"),
        },
        Some("-") => match session.var("OLDPWD") {
            Some(old) => {
                out.println(old);
                PathBuf::from(old)
            }
            None => return BuiltinOutput::failure(1, "cd: OLDPWD not set"),
        },
        Some(dir) => PathBuf::from(dir),
    };

    let previous = session.cwd();
    if let Err(e) = std::env::set_current_dir(&target) {
        return BuiltinOutput::failure(
            1,
            format!("cd: {}: {}", target.display(), describe_io_error(&e)),
        );
    }

    let now = session.cwd();
    debug!("cd {} -> {}", previous.display(), now.display());
    session.set_var("OLDPWD", previous.display().to_string());
    session.set_var("PWD", now.display().to_string());
    out
}

/// `pwd`
pub fn pwd(session: &mut ShellSession, _args: &[String], _notices: &mut dyn Write) -> BuiltinOutput {
    BuiltinOutput::with_stdout(format!("{}\n", session.cwd().display()))
}

/// `type name...`
pub fn type_of(session: &mut ShellSession, args: &[String], _notices: &mut dyn Write) -> BuiltinOutput {
    let mut out = BuiltinOutput::success();
    let cwd = session.cwd();
    for name in args {
        if let Some(value) = session.aliases.get(name) {
            out.println(format!("{name} is aliased to `{value}'"));
        } else if super::is_builtin(name) {
            out.println(format!("{name} is a shell builtin"));
        } else if let Some(path) = resolve_program(name, session.search_path(), &cwd) {
            out.println(format!("{name} is {}", path.display()));
        } else {
            out.eprintln(format!("type: {name}: not found"));
            out.status = 1;
        }
    }
    out
}

/// `exit [n]`; without `n` the last status is used
pub fn exit(session: &mut ShellSession, args: &[String], _notices: &mut dyn Write) -> BuiltinOutput {
    match args.first() {
        None => {
            let code = session.last_status;
            session.request_exit(code);
            BuiltinOutput {
                status: code,
                ..Default::default()
            }
        }
        Some(arg) => match arg.parse::<i32>() {
            Ok(code) => {
                session.request_exit(code);
                BuiltinOutput {
                    status: code,
                    ..Default::default()
                }
            }
            Err(_) => {
                session.request_exit(2);
                BuiltinOutput::failure(2, format!("exit: {arg}: numeric argument required"))
            }
        },
    }
}

pub fn true_(_session: &mut ShellSession, _args: &[String], _notices: &mut dyn Write) -> BuiltinOutput {
    BuiltinOutput::success()
}

pub fn false_(_session: &mut ShellSession, _args: &[String], _notices: &mut dyn Write) -> BuiltinOutput {
    BuiltinOutput {
        status: 1,
        ..Default::default()
    }
}
