use std::fmt;
use std::path::{Path, PathBuf};

use crate::env::Env;
use crate::redirection::is_redirect_marker;

/// The fixed set of shell builtins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Cd,
    Echo,
    Exit,
    Pwd,
    Type,
}

/// List of builtin commands
pub const BUILTINS: &[Builtin] = &[
    Builtin::Cd,
    Builtin::Echo,
    Builtin::Exit,
    Builtin::Pwd,
    Builtin::Type,
];

impl Builtin {
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Cd => "cd",
            Builtin::Echo => "echo",
            Builtin::Exit => "exit",
            Builtin::Pwd => "pwd",
            Builtin::Type => "type",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        BUILTINS.iter().copied().find(|b| b.name() == name)
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a command name was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Builtin,
    Redirect,
    System,
    NotFound,
}

/// A classification together with what is needed to run it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Redirect,
    Builtin(Builtin),
    System(PathBuf),
    NotFound,
}

impl Resolution {
    pub fn classification(&self) -> Classification {
        match self {
            Resolution::Redirect => Classification::Redirect,
            Resolution::Builtin(_) => Classification::Builtin,
            Resolution::System(_) => Classification::System,
            Resolution::NotFound => Classification::NotFound,
        }
    }
}

/// Classifies a command name: redirect, then builtin, then PATH, else not found.
///
/// Nothing is cached; PATH and the filesystem are consulted on every call.
pub fn resolve(name: &str, env: &dyn Env) -> Resolution {
    let resolution = if is_redirect_marker(name) {
        Resolution::Redirect
    } else if let Some(builtin) = Builtin::from_name(name) {
        Resolution::Builtin(builtin)
    } else if let Some(path) = full_path(name, env) {
        Resolution::System(path)
    } else {
        Resolution::NotFound
    };
    log::debug!("resolved {name:?} as {resolution:?}");
    resolution
}

/// Finds the full path of a command.
///
/// Names containing a `/` are checked as given; anything else is looked up
/// in each PATH directory in order, first match wins. Relative names and
/// PATH entries resolve against the shell's working directory, so the
/// returned path is always absolute.
pub fn full_path(command: &str, env: &dyn Env) -> Option<PathBuf> {
    if command.is_empty() {
        return None;
    }
    if command.contains('/') {
        let path = env.absolute(Path::new(command)).ok()?;
        return is_executable(&path).then_some(path);
    }

    env.var("PATH")?
        .split(':')
        .filter(|dir| !dir.is_empty())
        .filter_map(|dir| env.absolute(&Path::new(dir).join(command)).ok())
        .find(|full| is_executable(full))
}

/// Executables on PATH whose names start with `prefix`, sorted and deduplicated.
pub fn executables_with_prefix(prefix: &str, env: &dyn Env) -> Vec<String> {
    let Some(path) = env.var("PATH") else {
        return Vec::new();
    };
    let mut names: Vec<String> = path
        .split(':')
        .filter(|dir| !dir.is_empty())
        .filter_map(|dir| env.absolute(Path::new(dir)).ok())
        .filter_map(|dir| std::fs::read_dir(dir).ok())
        .flat_map(|entries| entries.flatten())
        .filter(|e| is_executable(&e.path()))
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| name.starts_with(prefix))
        .collect();
    names.sort();
    names.dedup();
    names
}

fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path).is_ok_and(|m| {
        m.is_file() && {
            #[cfg(unix)]
            {
                m.permissions().mode() & 0o111 != 0
            }
            #[cfg(not(unix))]
            {
                true
            }
        }
    })
}
