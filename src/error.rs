use std::io;

/// Errors raised while executing a single segment.
///
/// The `Display` text is exactly what the user sees on stderr.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("too many arguments")]
    TooManyArguments,

    #[error("{0}: command not found")]
    CommandNotFound(String),

    #[error("cd: {0}: No such file or directory")]
    NoSuchDirectory(String),

    #[error("cd: HOME not set")]
    HomeNotSet,

    #[error("syntax error near unexpected token `newline'")]
    MissingRedirectTarget,

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("{program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl ShellError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        ShellError::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ShellError>;
