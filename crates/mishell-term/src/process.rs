//! Process interface: fork/dup2/execve/waitpid/pipe2, the primitives the
//! evaluator composes into redirections and pipelines.

use anyhow::{Context, Result};
use nix::fcntl::OFlag;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{dup2, execve, pipe2, Pid};
use std::ffi::CString;
use std::os::fd::{OwnedFd, RawFd};

pub use nix::unistd::ForkResult;

/// The three standard streams a command runs with. Defaults to the
/// shell's own inherited fds.
#[derive(Debug, Clone, Copy)]
pub struct Stdio {
    pub stdin: RawFd,
    pub stdout: RawFd,
    pub stderr: RawFd,
}

impl Stdio {
    pub fn inherited() -> Self {
        Self {
            stdin: 0,
            stdout: 1,
            stderr: 2,
        }
    }
}

/// A forked, not-yet-waited-for child process.
#[derive(Debug)]
pub struct Child(Pid);

impl Child {
    pub fn pid(&self) -> i32 {
        self.0.as_raw()
    }

    /// Block until this child exits; returns its exit status.
    pub fn wait(self) -> Result<i32> {
        let status = match waitpid(self.0, None).context("waitpid failed")? {
            WaitStatus::Exited(_, code) => code,
            WaitStatus::Signaled(_, sig, _) => 128 + sig as i32,
            _ => -1,
        };
        tracing::info!(pid = self.0.as_raw(), status, "child exited");
        Ok(status)
    }
}

/// `fork()`, wrapped so callers match on the portable `ForkResult`
/// without reaching for `unsafe` at every call site.
///
/// # Safety contract
/// Must be called with no other threads holding locks the child might
/// need (POSIX fork-in-multithreaded-process hazard); this shell is
/// single-threaded at every call site.
pub fn fork_child() -> Result<ForkResult> {
    unsafe { nix::unistd::fork() }.context("fork failed")
}

/// `dup2` each non-default element of `stdio` onto fds 0/1/2. Only called
/// in a child, right before `execve_or_exit127`.
pub fn dup2_stdio(stdio: Stdio) -> Result<()> {
    if stdio.stdin != 0 {
        dup2(stdio.stdin, 0).context("dup2 stdin")?;
    }
    if stdio.stdout != 1 {
        dup2(stdio.stdout, 1).context("dup2 stdout")?;
    }
    if stdio.stderr != 2 {
        dup2(stdio.stderr, 2).context("dup2 stderr")?;
    }
    Ok(())
}

/// `execve`, replacing the calling process. Only returns on failure, in
/// which case it exits 127 rather than returning to the caller — a
/// failed `execve` must never let a forked child fall back into running
/// shell logic meant for the parent.
pub fn execve_or_exit127(path: &CString, argv: &[CString], envp: &[CString]) -> ! {
    let _ = execve(path.as_c_str(), argv, envp);
    unsafe { libc::_exit(127) }
}

/// Fork and, in the child, `dup2` `stdio` onto fds 0/1/2 and `execve`
/// `path` with `argv`/`envp`.
pub fn spawn(path: &CString, argv: &[CString], envp: &[CString], stdio: Stdio) -> Result<Child> {
    match fork_child()? {
        ForkResult::Child => {
            let _ = dup2_stdio(stdio);
            execve_or_exit127(path, argv, envp);
        }
        ForkResult::Parent { child } => {
            tracing::info!(pid = child.as_raw(), path = %path.to_string_lossy(), "spawned child");
            Ok(Child(child))
        }
    }
}

/// Allocate one pipe with both ends `O_CLOEXEC`, so a fd duplicated onto
/// some stage's 0/1/2 survives `execve` while the original pipe fd, left
/// open only in the parent or in a sibling that never needed it, closes
/// itself automatically.
pub fn make_pipe() -> Result<(OwnedFd, OwnedFd)> {
    pipe2(OFlag::O_CLOEXEC).context("pipe2 failed")
}
