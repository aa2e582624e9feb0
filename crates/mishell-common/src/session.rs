//! Session state: one per shell process — an exit flag, the environment
//! map, the current working directory, and line history.

use crate::history::History;
use std::collections::HashMap;
use std::ffi::CString;

#[derive(Debug)]
pub struct SessionState {
    exit_requested: bool,
    exit_code: i32,
    env: HashMap<String, String>,
    pub history: History,
}

impl SessionState {
    /// Build a session from the process's inherited environment; this
    /// just snapshots it into the session's owned map.
    pub fn from_inherited_env(max_history: usize) -> Self {
        Self {
            exit_requested: false,
            exit_code: 0,
            env: std::env::vars().collect(),
            history: History::new(max_history),
        }
    }

    pub fn get_env(&self, name: &str) -> Option<&str> {
        self.env.get(name).map(String::as_str)
    }

    pub fn env_map(&self) -> &HashMap<String, String> {
        &self.env
    }

    /// `envp` for `execve`: `NAME=value` strings, `NUL`-free by construction
    /// since environment names/values never contain embedded `NUL` bytes
    /// from the OS in the first place; a value that did would simply fail
    /// `CString::new` and is dropped rather than passed through malformed.
    pub fn envp(&self) -> Vec<CString> {
        self.env
            .iter()
            .filter_map(|(k, v)| CString::new(format!("{k}={v}")).ok())
            .collect()
    }

    pub fn request_exit(&mut self, code: i32) {
        self.exit_requested = true;
        self.exit_code = code;
    }

    pub fn exit_requested(&self) -> Option<i32> {
        self.exit_requested.then_some(self.exit_code)
    }
}
