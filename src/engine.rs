use std::io::{self, Write};
use std::path::Path;
use std::process::Command;

use crate::commands::{Flow, execute_builtin};
use crate::context::{ExecutionContext, FAILURE, SUCCESS};
use crate::env::Env;
use crate::error::ShellError;
use crate::redirection::{redirect, segment};
use crate::resolve::{Resolution, resolve};
use crate::tokenize::tokenize;

/// Which stream a line's report belongs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Stdout(String),
    Stderr(String),
}

/// The result of one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Trimmed text to show, `None` when there is nothing to print.
    pub output: Option<Output>,
    pub status: i32,
    /// Set when `exit` ran; the caller terminates with this status.
    pub exit: Option<i32>,
}

/// Runs input lines against an environment.
pub struct Shell<E: Env> {
    env: E,
}

impl<E: Env> Shell<E> {
    pub fn new(env: E) -> Self {
        Self { env }
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    /// Tokenizes, segments and executes one line, segment by segment.
    ///
    /// Only redirect segments read the previous segment's output. Execution
    /// stops early only for `exit`.
    pub fn execute(&mut self, line: &str) -> Report {
        let mut previous = ExecutionContext::default();

        for words in segment(tokenize(line)) {
            if words.is_empty() {
                continue;
            }
            let mut ctx = ExecutionContext::new(words);

            match resolve(&ctx.command_name, &self.env) {
                Resolution::Redirect => redirect(&mut ctx, &previous, &self.env),
                Resolution::Builtin(builtin) => {
                    if let Flow::Exit(status) = execute_builtin(builtin, &mut ctx, &mut self.env) {
                        return Report {
                            output: report_text(&ctx.stderr).map(Output::Stderr),
                            status,
                            exit: Some(status),
                        };
                    }
                }
                Resolution::System(path) => run_external(&mut ctx, &path, &self.env),
                Resolution::NotFound => {
                    ctx.fail(&ShellError::CommandNotFound(ctx.command_name.clone()))
                }
            }
            previous = ctx;
        }

        let output = if previous.status != SUCCESS {
            report_text(&previous.stderr).map(Output::Stderr)
        } else {
            report_text(&previous.stdout).map(Output::Stdout)
        };
        Report {
            output,
            status: previous.status,
            exit: None,
        }
    }

    /// Executes a line and writes its report, newline-terminated, to the
    /// matching stream.
    pub fn run(
        &mut self,
        line: &str,
        stdout: &mut impl Write,
        stderr: &mut impl Write,
    ) -> io::Result<Report> {
        let report = self.execute(line);
        match &report.output {
            Some(Output::Stdout(text)) => {
                writeln!(stdout, "{text}")?;
                stdout.flush()?;
            }
            Some(Output::Stderr(text)) => {
                writeln!(stderr, "{text}")?;
                stderr.flush()?;
            }
            None => {}
        }
        Ok(report)
    }
}

fn report_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Variables the child sees exactly as the shell's `Env` has them.
const CHILD_VARS: &[&str] = &["PATH", "HOME"];

/// Spawns an external program and captures both of its streams.
fn run_external(ctx: &mut ExecutionContext, program: &Path, env: &dyn Env) {
    let mut command = Command::new(program);
    command.args(ctx.operands());
    if let Ok(dir) = env.current_dir() {
        command.current_dir(dir);
    }
    for &key in CHILD_VARS {
        match env.var(key) {
            Some(value) => command.env(key, value),
            None => command.env_remove(key),
        };
    }

    log::debug!("spawning {} with {:?}", program.display(), ctx.operands());
    match command.output() {
        Ok(output) => {
            ctx.stdout = String::from_utf8_lossy(&output.stdout).into_owned();
            ctx.stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            ctx.status = if output.status.success() { SUCCESS } else { FAILURE };
            log::debug!("{} exited with {}", program.display(), output.status);
        }
        Err(e) => {
            log::warn!("failed to spawn {}: {e}", program.display());
            ctx.fail(&ShellError::Spawn {
                program: ctx.command_name.clone(),
                source: e,
            });
        }
    }
}
