//! Terminal raw mode and POSIX process primitives used by `mishell`.

pub mod process;
pub mod raw_mode;
