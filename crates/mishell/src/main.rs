mod ast;
mod builtin_names;
mod builtins;
mod completion;
mod display;
mod editor;
mod evaluator;
mod fdio;
mod parser;
mod resolve;
mod scanner;
mod token;

use anyhow::Result;
use editor::PromptState;
use mishell_common::config::{self, MishellConfig};
use mishell_common::error::EditOutcome;
use mishell_common::session::SessionState;
use mishell_term::process::Stdio;
use mishell_term::raw_mode::RawModeGuard;
use std::os::fd::AsRawFd;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mishell=info")),
        )
        .init();

    let config = config::load_config();
    let mut session = SessionState::from_inherited_env(config.history.max_entries);

    let exit_code = run_shell(&config, &mut session)?;
    std::process::exit(exit_code);
}

fn run_shell(config: &MishellConfig, session: &mut SessionState) -> Result<i32> {
    loop {
        let outcome = read_one_line(config, session)?;
        match outcome {
            EditOutcome::EndOfTransmission => return Ok(0),
            EditOutcome::EndOfText => continue,
            EditOutcome::Line(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                session.history.push(&line);
                if let Err(e) = evaluate_line(&line, session) {
                    tracing::error!(error = %e, "fatal I/O error evaluating line");
                    return Err(e);
                }
                if let Some(code) = session.exit_requested() {
                    return Ok(code);
                }
            }
        }
    }
}

fn read_one_line(config: &MishellConfig, session: &SessionState) -> Result<EditOutcome> {
    let stdin = std::io::stdin();
    let guard = RawModeGuard::enter(stdin.as_raw_fd())?;

    let prompt = PromptState::new(config.prompt.template.clone(), session.history.len());
    let path = session.get_env("PATH").map(str::to_string);
    let search_cwd = config.completion.search_cwd;
    let complete = move |word: &[u8]| {
        let input = String::from_utf8_lossy(word).into_owned();
        completion::complete(&input, path.as_deref(), search_cwd)
    };

    let outcome = prompt.read_line(&session.history, complete)?;
    drop(guard);
    Ok(outcome)
}

fn evaluate_line(line: &str, session: &mut SessionState) -> Result<()> {
    let tokens = scanner::scan(line.as_bytes());
    let ast = match parser::parse(&tokens) {
        Ok(ast) => ast,
        Err(e) => {
            fdio::write_all(2, format!("{e}\n").as_bytes());
            return Ok(());
        }
    };
    tracing::debug!(?ast, "parsed line");
    let status = evaluator::run(&ast, Stdio::inherited(), session)?;
    tracing::info!(status, "line evaluated");
    Ok(())
}
