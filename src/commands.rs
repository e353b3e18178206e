use std::path::{Path, PathBuf};

use crate::context::{ExecutionContext, FAILURE};
use crate::env::Env;
use crate::error::{Result, ShellError};
use crate::resolve::{Builtin, Resolution, resolve};

/// What the engine should do once a builtin returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Stop the shell with this status.
    Exit(i32),
}

/// Executes a builtin command, settling its context.
pub fn execute_builtin(builtin: Builtin, ctx: &mut ExecutionContext, env: &mut dyn Env) -> Flow {
    match builtin {
        Builtin::Exit => return execute_exit(ctx),
        Builtin::Echo => ctx.succeed(ctx.operands().join(" ")),
        Builtin::Cd => {
            let result = execute_cd(ctx.operands(), env);
            ctx.settle(result);
        }
        Builtin::Pwd => {
            let result = execute_pwd(ctx.operands(), env);
            ctx.settle(result);
        }
        Builtin::Type => execute_type(ctx, env),
    }
    Flow::Continue
}

fn execute_exit(ctx: &mut ExecutionContext) -> Flow {
    if ctx.args.len() > 2 {
        ctx.fail(&ShellError::TooManyArguments);
        return Flow::Continue;
    }

    // A non-numeric status is reported but still exits, with status 0.
    let status = match ctx.operands().first().cloned() {
        None => 0,
        Some(arg) => arg.parse::<i32>().unwrap_or_else(|_| {
            ctx.stderr = format!("exit: {arg}: numeric argument required");
            0
        }),
    };
    ctx.status = status;
    Flow::Exit(status)
}

fn execute_cd(operands: &[String], env: &mut dyn Env) -> Result<String> {
    let arg = operands.concat();
    let target = if arg.is_empty() || arg == "~" {
        env.home_dir().ok_or(ShellError::HomeNotSet)?
    } else if let Some(rest) = arg.strip_prefix("~/") {
        env.home_dir().ok_or(ShellError::HomeNotSet)?.join(rest)
    } else {
        PathBuf::from(&arg)
    };

    if !env.absolute(&target).is_ok_and(|p| p.is_dir()) {
        return Err(ShellError::NoSuchDirectory(display_arg(&arg, &target)));
    }
    env.set_current_dir(&target)
        .map(|_| String::new())
        .map_err(|_| ShellError::NoSuchDirectory(display_arg(&arg, &target)))
}

/// The path as the user typed it, or the expanded one for `~` forms.
fn display_arg(arg: &str, target: &Path) -> String {
    if arg.starts_with('~') || arg.is_empty() {
        target.display().to_string()
    } else {
        arg.to_string()
    }
}

fn execute_pwd(operands: &[String], env: &dyn Env) -> Result<String> {
    if operands.len() > 2 {
        return Err(ShellError::TooManyArguments);
    }
    env.current_dir()
        .map(|p| p.display().to_string())
        .map_err(|e| ShellError::io("pwd", e))
}

/// Reports each name in input order. Any unknown name fails the whole
/// command, and the full report then goes to stderr.
fn execute_type(ctx: &mut ExecutionContext, env: &dyn Env) {
    let mut lines = Vec::with_capacity(ctx.operands().len());
    let mut all_found = true;

    for name in ctx.operands() {
        let line = match resolve(name, env) {
            Resolution::Builtin(_) => format!("{name} is a shell builtin"),
            Resolution::System(path) => {
                let base = path
                    .file_name()
                    .map(|b| b.to_string_lossy().into_owned())
                    .unwrap_or_else(|| name.clone());
                format!("{base} is {}", path.display())
            }
            Resolution::Redirect | Resolution::NotFound => {
                all_found = false;
                format!("{name}: not found")
            }
        };
        lines.push(line);
    }

    let report = lines.join("\n");
    if all_found {
        ctx.succeed(report);
    } else {
        ctx.status = FAILURE;
        ctx.stderr = report;
    }
}
