/// Lexer state while scanning a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unquoted,
    UnquotedEscaped,
    SingleQuoted,
    DoubleQuoted,
    DoubleQuotedEscaped,
}

/// Characters a backslash may escape inside double quotes.
const DOUBLE_QUOTE_ESCAPABLE: &[char] = &['"', '$', '`', '\\', '\n'];

/// Tokenizes shell input into a vector of words.
///
/// Quotes and escapes are resolved here, so the returned words need no
/// further interpretation. Unterminated quotes run to the end of the line.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut state = State::Unquoted;

    for c in input.trim().chars() {
        state = match state {
            State::Unquoted => match c {
                '"' => State::DoubleQuoted,
                '\'' => State::SingleQuoted,
                '\\' => State::UnquotedEscaped,
                c if c.is_whitespace() => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                    State::Unquoted
                }
                c => {
                    current.push(c);
                    State::Unquoted
                }
            },
            State::UnquotedEscaped => {
                current.push(c);
                State::Unquoted
            }
            State::SingleQuoted => {
                if c == '\'' {
                    State::Unquoted
                } else {
                    current.push(c);
                    State::SingleQuoted
                }
            }
            State::DoubleQuoted => match c {
                '\\' => State::DoubleQuotedEscaped,
                '"' => State::Unquoted,
                c => {
                    current.push(c);
                    State::DoubleQuoted
                }
            },
            State::DoubleQuotedEscaped => {
                if !DOUBLE_QUOTE_ESCAPABLE.contains(&c) {
                    current.push('\\');
                }
                current.push(c);
                State::DoubleQuoted
            }
        };
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    log::debug!("tokenized {input:?} into {tokens:?}");
    tokens
}
