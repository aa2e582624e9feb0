use mishell_term::process::{make_pipe, spawn, Stdio};
use nix::unistd::read;
use std::ffi::CString;
use std::os::fd::AsRawFd;

fn cstr(s: &str) -> CString {
    CString::new(s).unwrap()
}

#[test]
fn test_spawn_true_exits_zero() {
    let child = spawn(
        &cstr("/bin/true"),
        &[cstr("true")],
        &[],
        Stdio::inherited(),
    )
    .unwrap();
    assert!(child.pid() > 0);
    assert_eq!(child.wait().unwrap(), 0);
}

#[test]
fn test_spawn_false_exits_nonzero() {
    let child = spawn(
        &cstr("/bin/false"),
        &[cstr("false")],
        &[],
        Stdio::inherited(),
    )
    .unwrap();
    assert_eq!(child.wait().unwrap(), 1);
}

#[test]
fn test_exec_failure_exits_127() {
    let child = spawn(
        &cstr("/no/such/executable"),
        &[cstr("nope")],
        &[],
        Stdio::inherited(),
    )
    .unwrap();
    assert_eq!(child.wait().unwrap(), 127);
}

#[test]
fn test_pipe_carries_stdout_to_parent() {
    let (read_end, write_end) = make_pipe().unwrap();

    let stdio = Stdio {
        stdin: 0,
        stdout: write_end.as_raw_fd(),
        stderr: 2,
    };
    let child = spawn(
        &cstr("/bin/echo"),
        &[cstr("echo"), cstr("hello_pipe")],
        &[],
        stdio,
    )
    .unwrap();
    drop(write_end);

    let mut buf = [0u8; 256];
    let n = read(read_end.as_raw_fd(), &mut buf).unwrap();
    let output = String::from_utf8_lossy(&buf[..n]);
    assert!(output.contains("hello_pipe"), "got: {output}");
    assert_eq!(child.wait().unwrap(), 0);
}
