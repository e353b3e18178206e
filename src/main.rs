use std::io;

use anyhow::Context;
use myshell::completion::ShellCompleter;
use myshell::{ProcessEnv, Shell};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let mut editor: Editor<ShellCompleter, DefaultHistory> =
        Editor::with_config(Config::builder().auto_add_history(false).build())
            .context("failed to initialize line editor")?;
    editor.set_helper(Some(ShellCompleter::new()));

    let mut shell = Shell::new(ProcessEnv);
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    loop {
        match editor.readline("$ ") {
            Ok(line) => {
                let report = shell.run(&line, &mut stdout, &mut stderr)?;
                if let Some(status) = report.exit {
                    log::debug!("exit requested with status {status}");
                    std::process::exit(status);
                }
            }
            Err(ReadlineError::Eof) => {
                println!("closing shell...");
                return Ok(());
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(e) => eprintln!("error: {e}"),
        }
    }
}
