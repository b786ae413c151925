//! Signal dispositions for the interactive shell
//!
//! Foreground children share the shell's process group, so a Ctrl-C or
//! Ctrl-Z at the terminal reaches the shell too. The interactive binary
//! installs do-nothing handlers for those signals; children get the
//! default dispositions back on exec, which would not happen with
//! `SIG_IGN`.

use nix::libc::c_int;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};

use crate::error::{Error, Result};

/// Signals the shell survives while children receive them
pub const GUARDED_SIGNALS: [Signal; 3] = [Signal::SIGINT, Signal::SIGTSTP, Signal::SIGQUIT];

extern "C" fn swallow_signal(_signal: c_int) {}

/// Install the handlers for [`GUARDED_SIGNALS`]
pub fn install_interrupt_guard() -> Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(swallow_signal),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    for signal in GUARDED_SIGNALS {
        // SAFETY: the handler touches no state at all
        unsafe { sigaction(signal, &action) }.map_err(|errno| {
            Error::Other(format!("failed to install {} handler: {}", signal, errno.desc()))
        })?;
        trace!("installed no-op handler for {}", signal);
    }
    Ok(())
}
