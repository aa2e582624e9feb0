//! Completion engine: candidates drawn from built-in names, `PATH`
//! directories, and optionally the current directory.

use crate::builtin_names::BUILTIN_NAMES;
use std::collections::BTreeSet;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

/// Returns sorted, unique candidates whose name starts with `input`.
/// Errors opening or iterating any one directory are swallowed for that
/// directory only.
pub fn complete(input: &str, path_var: Option<&str>, search_cwd: bool) -> Vec<String> {
    let mut candidates = BTreeSet::new();

    for name in BUILTIN_NAMES {
        if name.starts_with(input) {
            candidates.insert(name.to_string());
        }
    }

    if let Some(path_var) = path_var {
        for dir in path_var.split(':') {
            if !dir.is_empty() {
                collect_executables(Path::new(dir), input, &mut candidates);
            }
        }
    }

    if search_cwd {
        collect_executables(Path::new("."), input, &mut candidates);
    }

    candidates.into_iter().collect()
}

fn collect_executables(dir: &Path, input: &str, out: &mut BTreeSet<String>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if !name.starts_with(input) {
            continue;
        }
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        if meta.permissions().mode() & 0o111 != 0 {
            out.insert(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt as _;

    #[test]
    fn candidates_all_start_with_input_and_are_unique() {
        let cands = complete("e", None, false);
        assert!(cands.contains(&"echo".to_string()));
        for c in &cands {
            assert!(c.starts_with('e'));
        }
        let mut sorted = cands.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(cands, sorted);
    }

    #[test]
    fn finds_executables_in_path() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("customtool");
        std::fs::write(&bin, b"#!/bin/sh\n").unwrap();
        let mut perms = std::fs::metadata(&bin).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&bin, perms).unwrap();

        let path_var = dir.path().to_str().unwrap();
        let cands = complete("custom", Some(path_var), false);
        assert_eq!(cands, vec!["customtool".to_string()]);
    }

    #[test]
    fn unreadable_directory_does_not_abort_completion() {
        let cands = complete("ec", Some("/no/such/directory"), false);
        assert!(cands.contains(&"echo".to_string()));
    }

    #[test]
    fn no_match_returns_empty() {
        assert!(complete("zzzznosuchprefix", None, false).is_empty());
    }
}
