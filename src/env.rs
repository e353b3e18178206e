use std::collections::HashMap;
use std::env as stdenv;
use std::io;
use std::path::{Path, PathBuf};

/// The slice of process state the shell reads and mutates.
///
/// `ProcessEnv` talks to the real process; `MemoryEnv` keeps its own
/// variables and working directory so a `Shell` can run in isolation.
pub trait Env {
    /// Value of an environment variable such as `PATH`.
    fn var(&self, key: &str) -> Option<String>;

    fn current_dir(&self) -> io::Result<PathBuf>;

    /// Changes the working directory. `path` may be relative to the current one.
    fn set_current_dir(&mut self, path: &Path) -> io::Result<()>;

    /// The invoking user's home directory.
    fn home_dir(&self) -> Option<PathBuf> {
        self.var("HOME").filter(|h| !h.is_empty()).map(PathBuf::from)
    }

    /// Resolves `path` against the working directory, dropping `.` components.
    fn absolute(&self, path: &Path) -> io::Result<PathBuf> {
        let full = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.current_dir()?.join(path)
        };
        Ok(full.components().collect())
    }
}

/// The real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl Env for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        stdenv::var(key).ok()
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        stdenv::current_dir()
    }

    fn set_current_dir(&mut self, path: &Path) -> io::Result<()> {
        stdenv::set_current_dir(path)
    }
}

/// An environment detached from the process, with its own variables and
/// working directory. Directory changes are still checked against the
/// real filesystem.
#[derive(Debug, Clone)]
pub struct MemoryEnv {
    vars: HashMap<String, String>,
    current_dir: PathBuf,
}

impl MemoryEnv {
    pub fn new(current_dir: impl Into<PathBuf>) -> Self {
        Self {
            vars: HashMap::new(),
            current_dir: current_dir.into(),
        }
    }

    pub fn with_var(mut self, key: impl Into<String>, val: impl Into<String>) -> Self {
        self.set_var(key, val);
        self
    }

    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }
}

impl Env for MemoryEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        Ok(self.current_dir.clone())
    }

    fn set_current_dir(&mut self, path: &Path) -> io::Result<()> {
        let target = self.absolute(path)?.canonicalize()?;
        if !target.is_dir() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "not a directory"));
        }
        self.current_dir = target;
        Ok(())
    }
}
