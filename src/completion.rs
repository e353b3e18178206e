use rustyline::Helper;
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;

use crate::env::ProcessEnv;
use crate::resolve::{BUILTINS, executables_with_prefix};

/// Shell completer for tab completion.
///
/// The first word completes against builtins and PATH executables, later
/// words against filenames.
pub struct ShellCompleter {
    filename_completer: FilenameCompleter,
}

impl ShellCompleter {
    pub fn new() -> Self {
        Self {
            filename_completer: FilenameCompleter::new(),
        }
    }
}

impl Default for ShellCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &rustyline::Context<'_>,
    ) -> Result<(usize, Vec<Self::Candidate>), ReadlineError> {
        let (start, word) = extract_word(line, pos);
        if is_first_word(line, pos) {
            Ok((start, command_candidates(&word)))
        } else {
            self.filename_completer.complete(line, pos, ctx)
        }
    }
}

fn command_candidates(word: &str) -> Vec<Pair> {
    let mut names: Vec<String> = BUILTINS
        .iter()
        .map(|b| b.name().to_string())
        .filter(|name| name.starts_with(word))
        .chain(executables_with_prefix(word, &ProcessEnv))
        .collect();
    names.sort();
    names.dedup();

    names
        .into_iter()
        .map(|name| Pair {
            replacement: format!("{name} "),
            display: name,
        })
        .collect()
}

fn is_first_word(line: &str, pos: usize) -> bool {
    let before = &line[..pos];
    let words = before.split_whitespace().count();
    words == 0 || (words == 1 && !before.ends_with(char::is_whitespace))
}

fn extract_word(line: &str, pos: usize) -> (usize, String) {
    let before = &line[..pos];
    let start = before.rfind(|c: char| c.is_whitespace()).map_or(0, |i| i + 1);
    (start, line[start..pos].to_string())
}

impl Helper for ShellCompleter {}
impl Hinter for ShellCompleter {
    type Hint = String;
}
impl Highlighter for ShellCompleter {}
impl Validator for ShellCompleter {}
