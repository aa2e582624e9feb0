//! Evaluator: walks the AST, resolving commands, wiring up redirections
//! and pipelines, forking children, and collecting results.

use crate::ast::Ast;
use crate::builtins;
use crate::fdio::write_all;
use crate::resolve::{resolve, Resolution};
use anyhow::{Context, Result};
use mishell_common::error::EvalError;
use mishell_common::session::SessionState;
use mishell_term::process::{dup2_stdio, execve_or_exit127, fork_child, make_pipe, ForkResult, Stdio};
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::close;
use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::os::fd::{AsRawFd, OwnedFd, RawFd};
use std::os::unix::ffi::OsStrExt;

/// Run `ast` with the given I/O triple, returning the exit status of
/// whatever ultimately ran (or a synthetic non-zero status for a line
/// abandoned on a non-fatal evaluator error).
pub fn run(ast: &Ast, stdio: Stdio, session: &mut SessionState) -> Result<i32> {
    match ast {
        Ast::Command { arguments } => run_command(arguments, stdio, session),
        Ast::Redirect { inner, fd, target_path, append } => {
            run_redirect(inner, *fd, target_path, *append, stdio, session)
        }
        Ast::Pipeline { stages } => run_pipeline(stages, stdio, session),
    }
}

fn run_command(arguments: &[String], stdio: Stdio, session: &mut SessionState) -> Result<i32> {
    let name = &arguments[0];
    match resolve(name, session.get_env("PATH")) {
        None => {
            write_all(stdio.stderr, EvalError::CommandNotFound(name.clone()).to_string().as_bytes());
            write_all(stdio.stderr, b"\n");
            Ok(0)
        }
        Some(Resolution::Builtin) => Ok(builtins::run(name, arguments, stdio, session)),
        Some(Resolution::Executable(dir)) => {
            let path = CString::new(dir.join(name).as_os_str().as_bytes())
                .context("path contains a NUL byte")?;
            let argv = arguments
                .iter()
                .map(|a| CString::new(a.as_bytes()))
                .collect::<std::result::Result<Vec<_>, _>>()
                .context("argument contains a NUL byte")?;
            let envp = session.envp();
            let child = mishell_term::process::spawn(&path, &argv, &envp, stdio)?;
            child.wait()
        }
    }
}

fn open_redirect_file(fd: u8, path: &str, append: bool) -> std::io::Result<File> {
    match fd {
        0 => OpenOptions::new().read(true).open(path),
        _ => {
            let mut opts = OpenOptions::new();
            opts.write(true).create(true);
            if append {
                opts.append(true);
            } else {
                opts.truncate(true);
            }
            opts.open(path)
        }
    }
}

fn run_redirect(
    inner: &Ast,
    fd: u8,
    target_path: &str,
    append: bool,
    mut stdio: Stdio,
    session: &mut SessionState,
) -> Result<i32> {
    if !matches!(fd, 0 | 1 | 2) {
        write_all(stdio.stderr, EvalError::UnsupportedRedirect(fd).to_string().as_bytes());
        write_all(stdio.stderr, b"\n");
        return Ok(1);
    }
    let file = match open_redirect_file(fd, target_path, append) {
        Ok(file) => file,
        Err(e) => {
            let diag = EvalError::RedirectIo {
                path: target_path.to_string(),
                reason: e.to_string(),
            };
            write_all(stdio.stderr, diag.to_string().as_bytes());
            write_all(stdio.stderr, b"\n");
            return Ok(1);
        }
    };
    let raw = file.as_raw_fd();
    match fd {
        0 => stdio.stdin = raw,
        1 => stdio.stdout = raw,
        2 => stdio.stderr = raw,
        _ => unreachable!(),
    }
    let result = run(inner, stdio, session);
    drop(file);
    result
}

/// Run a pipeline stage that is itself either a `Redirect` chain or a
/// `Command`, entirely within an already-forked child: redirects are
/// applied in place (no further fork), and a `Command` resolving to an
/// external program `dup2`s and `execve`s directly rather than forking
/// again. Never returns — always exits the process.
fn run_pipeline_stage_child(ast: &Ast, mut stdio: Stdio, session: &mut SessionState) -> ! {
    let status = run_stage_in_place(ast, &mut stdio, session);
    std::process::exit(status);
}

fn run_stage_in_place(ast: &Ast, stdio: &mut Stdio, session: &mut SessionState) -> i32 {
    match ast {
        Ast::Redirect { inner, fd, target_path, append } => {
            if !matches!(fd, 0 | 1 | 2) {
                write_all(stdio.stderr, EvalError::UnsupportedRedirect(*fd).to_string().as_bytes());
                write_all(stdio.stderr, b"\n");
                return 1;
            }
            match open_redirect_file(*fd, target_path, *append) {
                Ok(file) => {
                    let raw = file.as_raw_fd();
                    match fd {
                        0 => stdio.stdin = raw,
                        1 => stdio.stdout = raw,
                        2 => stdio.stderr = raw,
                        _ => unreachable!(),
                    }
                    let status = run_stage_in_place(inner, stdio, session);
                    drop(file);
                    status
                }
                Err(e) => {
                    let diag = EvalError::RedirectIo {
                        path: target_path.clone(),
                        reason: e.to_string(),
                    };
                    write_all(stdio.stderr, diag.to_string().as_bytes());
                    write_all(stdio.stderr, b"\n");
                    1
                }
            }
        }
        Ast::Command { arguments } => {
            let name = &arguments[0];
            match resolve(name, session.get_env("PATH")) {
                None => {
                    write_all(stdio.stderr, EvalError::CommandNotFound(name.clone()).to_string().as_bytes());
                    write_all(stdio.stderr, b"\n");
                    0
                }
                Some(Resolution::Builtin) => builtins::run(name, arguments, *stdio, session),
                Some(Resolution::Executable(dir)) => {
                    if dup2_stdio(*stdio).is_err() {
                        return 126;
                    }
                    let Ok(path) = CString::new(dir.join(name).as_os_str().as_bytes()) else {
                        unsafe { libc::_exit(127) }
                    };
                    let Ok(argv) = arguments
                        .iter()
                        .map(|a| CString::new(a.as_bytes()))
                        .collect::<std::result::Result<Vec<_>, _>>()
                    else {
                        unsafe { libc::_exit(127) }
                    };
                    let envp = session.envp();
                    execve_or_exit127(&path, &argv, &envp);
                }
            }
        }
        Ast::Pipeline { .. } => unreachable!("the grammar never nests a pipeline inside a stage"),
    }
}

/// Close every pipe end not owned by stage `stage_index` of an
/// `n`-stage pipeline, in a just-forked child. `pipes` holds the raw fds
/// for all `n - 1` inter-stage pipes, `(read, write)` per pipe.
fn close_unused_pipes(pipes: &[(RawFd, RawFd)], stage_index: usize, n: usize) {
    for (k, (read_fd, write_fd)) in pipes.iter().enumerate() {
        if stage_index != k + 1 {
            let _ = close(*read_fd);
        }
        if stage_index != k {
            let _ = close(*write_fd);
        }
    }
}

fn run_pipeline(stages: &[Ast], stdio: Stdio, session: &mut SessionState) -> Result<i32> {
    let n = stages.len();
    debug_assert!(n >= 2, "a Pipeline AST always has at least two stages");

    let mut owned_pipes: Vec<(OwnedFd, OwnedFd)> = Vec::with_capacity(n - 1);
    for _ in 0..n - 1 {
        owned_pipes.push(make_pipe()?);
    }
    let raw_pipes: Vec<(RawFd, RawFd)> = owned_pipes
        .iter()
        .map(|(r, w)| (r.as_raw_fd(), w.as_raw_fd()))
        .collect();
    // Taken (closed) as each spawning stage consumes its end: the parent
    // closes every pipe end that was consumed by an already-spawned child.
    let mut remaining: Vec<(Option<OwnedFd>, Option<OwnedFd>)> = owned_pipes
        .into_iter()
        .map(|(r, w)| (Some(r), Some(w)))
        .collect();

    let mut children = Vec::with_capacity(n);
    for i in 0..n {
        let stage_stdin = if i > 0 { raw_pipes[i - 1].0 } else { stdio.stdin };
        let stage_stdout = if i < n - 1 { raw_pipes[i].1 } else { stdio.stdout };
        let stage_stdio = Stdio {
            stdin: stage_stdin,
            stdout: stage_stdout,
            stderr: stdio.stderr,
        };

        match fork_child()? {
            ForkResult::Child => {
                close_unused_pipes(&raw_pipes, i, n);
                run_pipeline_stage_child(&stages[i], stage_stdio, session);
            }
            ForkResult::Parent { child } => {
                if i > 0 {
                    remaining[i - 1].0.take();
                }
                if i < n - 1 {
                    remaining[i].1.take();
                }
                children.push(child);
            }
        }
    }
    drop(remaining);

    let mut last_status = 0;
    for (idx, child) in children.into_iter().enumerate() {
        let status = match waitpid(child, None).context("waitpid failed")? {
            WaitStatus::Exited(_, code) => code,
            WaitStatus::Signaled(_, sig, _) => 128 + sig as i32,
            _ => -1,
        };
        if idx == n - 1 {
            last_status = status;
        }
    }
    Ok(last_status)
}
