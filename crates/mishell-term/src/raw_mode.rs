//! Terminal I/O primitive: enter/leave raw mode around a line editor
//! session.

use anyhow::{Context, Result};
use nix::sys::termios::{self, SetArg, Termios};
use std::os::fd::{BorrowedFd, RawFd};

/// Disables canonical mode and echo on `fd` (expected to be the stdin tty)
/// for as long as the guard is alive, restoring the original mode on drop.
///
/// `leave_raw()` happens in `Drop` so it runs on every exit path of the
/// editor session — normal return, `?` propagation, or panic unwind.
pub struct RawModeGuard {
    fd: RawFd,
    original: Termios,
}

impl RawModeGuard {
    /// Enter raw mode on `fd`.
    pub fn enter(fd: RawFd) -> Result<Self> {
        let borrowed = unsafe { BorrowedFd::borrow_raw(fd) };
        let original = termios::tcgetattr(&borrowed).context("tcgetattr failed")?;
        let mut raw = original.clone();
        termios::cfmakeraw(&mut raw);
        termios::tcsetattr(&borrowed, SetArg::TCSANOW, &raw).context("tcsetattr failed")?;
        tracing::debug!("entered raw mode on fd {fd}");
        Ok(Self { fd, original })
    }
}

impl Drop for RawModeGuard {
    /// Restores the original terminal mode. Best-effort: a failure here
    /// has nowhere else to propagate to.
    fn drop(&mut self) {
        let borrowed = unsafe { BorrowedFd::borrow_raw(self.fd) };
        if termios::tcsetattr(&borrowed, SetArg::TCSANOW, &self.original).is_err() {
            tracing::warn!("failed to restore terminal mode on fd {}", self.fd);
        } else {
            tracing::debug!("left raw mode on fd {}", self.fd);
        }
    }
}
