//! The fixed built-in keyword set, shared between resolution, completion,
//! and dispatch so the three never drift apart.

pub const BUILTIN_NAMES: &[&str] = &["exit", "echo", "type", "pwd", "cd"];

pub fn is_builtin(name: &str) -> bool {
    BUILTIN_NAMES.contains(&name)
}
