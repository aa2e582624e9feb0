//! Raw-fd byte writes used by built-ins and diagnostics, which must write
//! to whatever fd a redirect has substituted in for stdout/stderr rather
//! than assuming the classic fds 1/2.

use nix::unistd::write;
use std::os::fd::{BorrowedFd, RawFd};

pub fn write_all(fd: RawFd, mut bytes: &[u8]) {
    // SAFETY: `fd` is one of the process's currently-open descriptors for
    // the lifetime of this call — owned either by the shell itself (0/1/2)
    // or by a `std::fs::File`/pipe kept alive by the evaluator for the
    // duration of the command that receives it.
    let borrowed = unsafe { BorrowedFd::borrow_raw(fd) };
    while !bytes.is_empty() {
        match write(borrowed, bytes) {
            Ok(0) => break,
            Ok(n) => bytes = &bytes[n..],
            Err(nix::errno::Errno::EINTR) => continue,
            Err(_) => break,
        }
    }
}
