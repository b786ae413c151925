//! Job control builtins: `jobs`, `fg`, `bg`

use std::io::Write;

use super::{BuiltinFn, BuiltinOutput};
use crate::jobs::BackgroundOutcome;
use crate::session::ShellSession;

pub const BUILTINS: &[(&str, BuiltinFn)] = &[("jobs", jobs), ("fg", fg), ("bg", bg)];

/// `jobs [-l]`: refresh and list, then drop the finished jobs just shown
pub fn jobs(session: &mut ShellSession, args: &[String], _notices: &mut dyn Write) -> BuiltinOutput {
    let long = args.iter().any(|a| a == "-l");
    if let Some(bad) = args.iter().find(|a| a.starts_with('-') && *a != "-l") {
        return BuiltinOutput::failure(2, format!("jobs: {bad}: invalid option"));
    }

    session.jobs.refresh();
    let mut out = BuiltinOutput::success();
    for job in session.jobs.jobs() {
        let marker = session.jobs.marker(job.id);
        if long {
            out.println(job.describe_long(marker));
        } else {
            out.println(job.describe(marker));
        }
    }
    session.jobs.cleanup();
    out
}

/// `fg [job]`
pub fn fg(session: &mut ShellSession, args: &[String], notices: &mut dyn Write) -> BuiltinOutput {
    let id = match session.jobs.resolve("fg", args.first().map(String::as_str)) {
        Ok(id) => id,
        Err(e) => return BuiltinOutput::failure(1, e),
    };

    if let Some(job) = session.jobs.get(id) {
        if let Err(e) = writeln!(notices, "{}", job.command).and_then(|()| notices.flush()) {
            debug!("fg: cannot echo job command: {}", e);
        }
    }

    match session.jobs.foreground(id) {
        Ok(status) => {
            let mut out = BuiltinOutput {
                status,
                ..Default::default()
            };
            if let Some(job) = session.jobs.get(id) {
                if job.is_stopped() {
                    out.eprintln(format!("\n{}", job.describe(session.jobs.marker(id))));
                }
            }
            out
        }
        Err(e) => BuiltinOutput::failure(1, e),
    }
}

/// `bg [job]`
pub fn bg(session: &mut ShellSession, args: &[String], _notices: &mut dyn Write) -> BuiltinOutput {
    let id = match session.jobs.resolve("bg", args.first().map(String::as_str)) {
        Ok(id) => id,
        Err(e) => return BuiltinOutput::failure(1, e),
    };

    match session.jobs.background(id) {
        Ok(BackgroundOutcome::Resumed) => {
            let mut out = BuiltinOutput::success();
            if let Some(job) = session.jobs.get(id) {
                out.println(format!("[{}]{} {} &", id, session.jobs.marker(id), job.command));
            }
            out
        }
        Ok(BackgroundOutcome::AlreadyRunning) => {
            let mut out = BuiltinOutput::success();
            out.eprintln(format!("bg: job {id} already in background"));
            out
        }
        Err(e) => BuiltinOutput::failure(1, e),
    }
}
