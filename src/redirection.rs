use std::io::Write;
use std::path::Path;

use crate::context::ExecutionContext;
use crate::env::Env;
use crate::error::{Result, ShellError};

/// Marker character that ends every redirection word.
pub const REDIRECT_MARKER: char = '>';

/// Which captured stream of the previous segment a redirection writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Represents a redirection operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirection {
    pub stream: Stream,
    pub append: bool,
}

impl Redirection {
    /// Parses a marker word. `>`, `1>`, `>>`, `1>>`, `2>` and `2>>` are
    /// recognized; any other word ending in `>` truncates stdout.
    pub fn parse(marker: &str) -> Option<Self> {
        if !is_redirect_marker(marker) {
            return None;
        }
        let redirection = match marker {
            ">>" | "1>>" => Redirection {
                stream: Stream::Stdout,
                append: true,
            },
            "2>" => Redirection {
                stream: Stream::Stderr,
                append: false,
            },
            "2>>" => Redirection {
                stream: Stream::Stderr,
                append: true,
            },
            _ => Redirection {
                stream: Stream::Stdout,
                append: false,
            },
        };
        Some(redirection)
    }
}

pub fn is_redirect_marker(word: &str) -> bool {
    word.ends_with(REDIRECT_MARKER)
}

/// Splits words into segments, opening a new one at every redirection marker.
///
/// There is always one more segment than there are markers; the segments
/// concatenate back to the input. Segments may be empty.
pub fn segment(words: Vec<String>) -> Vec<Vec<String>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();

    for word in words {
        if is_redirect_marker(&word) {
            segments.push(std::mem::take(&mut current));
        }
        current.push(word);
    }
    segments.push(current);

    log::debug!("segmented into {segments:?}");
    segments
}

/// Runs a redirection segment: writes the previous segment's captured stream,
/// followed by any literal words after the target, to the target file.
pub fn redirect(ctx: &mut ExecutionContext, previous: &ExecutionContext, env: &dyn Env) {
    let redirection = Redirection::parse(&ctx.command_name).unwrap_or(Redirection {
        stream: Stream::Stdout,
        append: false,
    });
    let (captured, passthrough) = match redirection.stream {
        Stream::Stdout => (previous.stdout.as_str(), ""),
        Stream::Stderr => (previous.stderr.as_str(), previous.stdout.as_str()),
    };

    let result: Result<String> = match ctx.operands().split_first() {
        None => Err(ShellError::MissingRedirectTarget),
        Some((target, literal)) => {
            let content = payload(captured, literal);
            log::debug!(
                "redirecting {} bytes of {:?} to {target:?} (append: {})",
                content.len(),
                redirection.stream,
                redirection.append
            );
            env.absolute(Path::new(target))
                .and_then(|path| write_to_file(&path, &content, redirection.append))
                .map(|_| passthrough.to_string())
                .map_err(|e| ShellError::io(target.as_str(), e))
        }
    };
    ctx.settle(result);
}

/// Captured text followed by the literal words, newline-terminated if non-empty.
fn payload(captured: &str, literal: &[String]) -> String {
    let mut content = captured.to_string();
    if !literal.is_empty() {
        if !content.is_empty() && !content.ends_with(['\n', ' ']) {
            content.push(' ');
        }
        content.push_str(&literal.join(" "));
    }
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content
}

/// Writes content to a file, with optional append mode.
pub fn write_to_file(file: &Path, content: &str, append: bool) -> std::io::Result<()> {
    if append {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file)
            .and_then(|mut f| f.write_all(content.as_bytes()))
    } else {
        std::fs::write(file, content)
    }
}
