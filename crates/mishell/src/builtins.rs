//! Built-in commands: `exit`, `echo`, `type`, `pwd`, `cd`.

use crate::fdio::write_all;
use crate::resolve::{resolve, Resolution};
use mishell_common::session::SessionState;
use mishell_term::process::Stdio;

/// Dispatch `name` (already confirmed a built-in by `resolve`) with its
/// full `arguments` (index 0 is the name itself).
pub fn run(name: &str, arguments: &[String], stdio: Stdio, session: &mut SessionState) -> i32 {
    match name {
        "exit" => exit(arguments, session),
        "echo" => echo(arguments, stdio),
        "type" => type_(arguments, stdio, session),
        "pwd" => pwd(stdio),
        "cd" => cd(arguments, stdio, session),
        _ => unreachable!("run called with a non-builtin name: {name}"),
    }
}

fn exit(arguments: &[String], session: &mut SessionState) -> i32 {
    let code = arguments
        .get(1)
        .and_then(|s| s.parse::<i32>().ok())
        .unwrap_or(0);
    session.request_exit(code);
    code
}

fn echo(arguments: &[String], stdio: Stdio) -> i32 {
    let mut line = arguments[1..].join(" ");
    line.push('\n');
    write_all(stdio.stdout, line.as_bytes());
    0
}

fn type_(arguments: &[String], stdio: Stdio, session: &mut SessionState) -> i32 {
    for name in &arguments[1..] {
        match resolve(name, session.get_env("PATH")) {
            Some(Resolution::Builtin) => {
                write_all(stdio.stdout, format!("{name} is a shell builtin\n").as_bytes());
            }
            Some(Resolution::Executable(dir)) => {
                write_all(
                    stdio.stdout,
                    format!("{name} is {}/{name}\n", dir.display()).as_bytes(),
                );
            }
            None => {
                write_all(stdio.stderr, format!("{name}: not found\n").as_bytes());
            }
        }
    }
    0
}

fn pwd(stdio: Stdio) -> i32 {
    match std::env::current_dir().and_then(std::fs::canonicalize) {
        Ok(path) => {
            write_all(stdio.stdout, format!("{}\n", path.display()).as_bytes());
            0
        }
        Err(e) => {
            write_all(stdio.stderr, format!("pwd: {e}\n").as_bytes());
            1
        }
    }
}

fn cd(arguments: &[String], stdio: Stdio, session: &mut SessionState) -> i32 {
    let Some(raw_target) = arguments.get(1) else {
        return 0;
    };
    let target = if let Some(rest) = raw_target.strip_prefix('~') {
        let home = session.get_env("HOME").unwrap_or(".");
        format!("{home}{rest}")
    } else {
        raw_target.clone()
    };
    match std::env::set_current_dir(&target) {
        Ok(()) => 0,
        Err(_) => {
            write_all(
                stdio.stderr,
                format!("cd: {target}: No such file or directory\n").as_bytes(),
            );
            1
        }
    }
}
