//! AST node kinds: the parser's output, consumed once each by the
//! evaluator.

/// Word bytes decoded by the scanner are converted to `String` here: the
/// evaluator needs to build `CString` argv/envp for `execve` and compare
/// names against `PATH` entries, both of which are naturally text
/// operations. A scanned word containing invalid UTF-8 is lossily
/// converted rather than rejected, matching how argument bytes flow
/// through the rest of the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    /// `arguments` includes the command name as index 0.
    Command { arguments: Vec<String> },
    /// Wraps a single command or redirect; `inner` runs with `fd`
    /// replaced by the opened `target_path`.
    Redirect {
        inner: Box<Ast>,
        fd: u8,
        target_path: String,
        append: bool,
    },
    /// Two or more `|`-connected stages.
    Pipeline { stages: Vec<Ast> },
}
