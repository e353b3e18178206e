//! A small interactive shell.
//!
//! A line goes through [`tokenize`](tokenize::tokenize), is split into
//! segments at redirection markers by [`segment`](redirection::segment), and
//! each segment is resolved and executed by [`Shell`]. Process state is
//! reached through the [`Env`] trait so a shell can run against
//! [`MemoryEnv`] in tests.

pub mod commands;
pub mod completion;
pub mod context;
pub mod engine;
pub mod env;
pub mod error;
pub mod redirection;
pub mod resolve;
pub mod tokenize;

pub use context::ExecutionContext;
pub use engine::{Output, Report, Shell};
pub use env::{Env, MemoryEnv, ProcessEnv};
pub use error::ShellError;
