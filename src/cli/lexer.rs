//! Splits one input line into words.
//!
//! Words are separated by whitespace. A double-quoted word may contain
//! spaces and `\"`; `\\` stands for one backslash. Quoting is remembered so
//! `change "3"` (a label) and `change 3` (a line to copy from) differ.

use super::CliError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub quoted: bool,
}

impl Token {
    pub fn word(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: false,
        }
    }

    pub fn quoted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: true,
        }
    }

    pub fn is_integer(&self) -> bool {
        !self.quoted && !self.text.is_empty() && self.text.bytes().all(|b| b.is_ascii_digit())
    }
}

pub fn tokenize(line: &str) -> Result<Vec<Token>, CliError> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '"' {
            chars.next();
            let mut text = String::new();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '"' => {
                        closed = true;
                        break;
                    }
                    '\\' => match chars.peek() {
                        Some(&next @ ('"' | '\\')) => {
                            text.push(next);
                            chars.next();
                        }
                        _ => text.push('\\'),
                    },
                    _ => text.push(c),
                }
            }
            if !closed {
                return Err(CliError::UnterminatedQuote);
            }
            tokens.push(Token::quoted(text));
            continue;
        }

        let mut text = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                break;
            }
            text.push(c);
            chars.next();
        }
        tokens.push(Token::word(text));
    }

    Ok(tokens)
}

#[cfg(test)]
#[path = "../../tests/unit/cli/lexer.rs"]
mod tests;
