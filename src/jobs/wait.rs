//! Waiting on and signalling child processes
//!
//! Thin layer over `waitpid(2)` and `kill(2)` that speaks in
//! [`ProcessStatus`] values.

use nix::errno::Errno;
use nix::sys::signal::{kill, killpg, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

use crate::error::{Error, Result};
use crate::models::ProcessStatus;

fn to_status(status: WaitStatus) -> Option<ProcessStatus> {
    match status {
        WaitStatus::Exited(_, code) => Some(ProcessStatus::Exited(code)),
        WaitStatus::Signaled(_, signal, _) => Some(ProcessStatus::Exited(128 + signal as i32)),
        WaitStatus::Stopped(_, signal) => Some(ProcessStatus::Stopped(signal as i32)),
        WaitStatus::Continued(_) => Some(ProcessStatus::Running),
        _ => None,
    }
}

fn control_error(action: &str, pid: i32, errno: Errno) -> Error {
    Error::ProcessControlFailed {
        action: action.to_string(),
        pid,
        reason: errno.desc().to_string(),
    }
}

/// Check a child without blocking.
///
/// `Ok(None)` means nothing changed since the last check. A child that was
/// already reaped elsewhere is reported as exited with status 0.
pub fn poll(pid: i32) -> Result<Option<ProcessStatus>> {
    let flags = WaitPidFlag::WNOHANG | WaitPidFlag::WUNTRACED | WaitPidFlag::WCONTINUED;
    loop {
        match waitpid(Pid::from_raw(pid), Some(flags)) {
            Ok(status) => return Ok(to_status(status)),
            Err(Errno::EINTR) => continue,
            Err(Errno::ECHILD) => {
                debug!("process {} already reaped", pid);
                return Ok(Some(ProcessStatus::Exited(0)));
            }
            Err(errno) => return Err(control_error("poll", pid, errno)),
        }
    }
}

/// Block until a child exits or stops
pub fn wait_for(pid: i32) -> Result<ProcessStatus> {
    loop {
        match waitpid(Pid::from_raw(pid), Some(WaitPidFlag::WUNTRACED)) {
            Ok(status) => {
                if let Some(status) = to_status(status) {
                    if status != ProcessStatus::Running {
                        return Ok(status);
                    }
                }
            }
            Err(Errno::EINTR) => continue,
            Err(Errno::ECHILD) => {
                debug!("process {} already reaped", pid);
                return Ok(ProcessStatus::Exited(0));
            }
            Err(errno) => return Err(control_error("wait for", pid, errno)),
        }
    }
}

/// Send `SIGCONT` to a job: to its process group when it has one,
/// otherwise to each live pid.
pub fn resume(pgid: Option<i32>, pids: &[i32]) -> Result<()> {
    match pgid {
        Some(pgid) => killpg(Pid::from_raw(pgid), Signal::SIGCONT)
            .map_err(|errno| control_error("continue", pgid, errno)),
        None => {
            for &pid in pids {
                match kill(Pid::from_raw(pid), Signal::SIGCONT) {
                    Ok(()) | Err(Errno::ESRCH) => {}
                    Err(errno) => return Err(control_error("continue", pid, errno)),
                }
            }
            Ok(())
        }
    }
}

/// Kill and reap processes started for a pipeline that could not be
/// completed.
pub fn terminate(pids: &[i32]) {
    for &pid in pids {
        if let Err(errno) = kill(Pid::from_raw(pid), Signal::SIGKILL) {
            debug!("kill {} failed: {}", pid, errno);
        }
        if let Err(e) = wait_for(pid) {
            debug!("{}", e);
        }
    }
}
