//! Command dispatch.
//!
//! A line is `[count] [-]verb args...`: an optional repetition count, an
//! optional `-` forcing the verb, then its arguments. Positions are bare
//! line numbers or `(lower,upper)` ranges with either bound optional.

use super::lexer::{tokenize, Token};
use super::CliError;
use crate::models::range::{LineRange, Target};
use crate::session::Session;
use crate::store::{LabelSource, MoveOutcome};

/// Position argument of `line` that means one past the last line.
const APPEND: &str = "$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Insert,
    Delete,
    Rename,
    Move,
    Swap,
    Goto,
    Undo,
    Redo,
    Status,
    Info,
    List,
    Cd,
    Quit,
}

impl Verb {
    pub fn from_name(name: &str) -> Option<Self> {
        let verb = match name.to_ascii_lowercase().as_str() {
            "l" | "line" | "i" | "insert" => Verb::Insert,
            "d" | "delete" => Verb::Delete,
            "c" | "change" | "rename" => Verb::Rename,
            "m" | "move" => Verb::Move,
            "x" | "swap" => Verb::Swap,
            "g" | "goto" | "cursor" => Verb::Goto,
            "u" | "undo" => Verb::Undo,
            "r" | "redo" => Verb::Redo,
            "s" | "status" => Verb::Status,
            "info" => Verb::Info,
            "ls" => Verb::List,
            "cd" => Verb::Cd,
            "q" | "quit" | "exit" => Verb::Quit,
            _ => return None,
        };
        Some(verb)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Verb::Insert => "line",
            Verb::Delete => "delete",
            Verb::Rename => "change",
            Verb::Move => "move",
            Verb::Swap => "swap",
            Verb::Goto => "goto",
            Verb::Undo => "undo",
            Verb::Redo => "redo",
            Verb::Status => "status",
            Verb::Info => "info",
            Verb::List => "ls",
            Verb::Cd => "cd",
            Verb::Quit => "quit",
        }
    }

    pub fn usage(&self) -> &'static str {
        match self {
            Verb::Insert => "line [\"label\"] [position|$]  (default: cursor; $ appends)",
            Verb::Delete => "[-]delete [position|(lower,upper)]",
            Verb::Rename => "change \"label\"|<line> [position|(lower,upper)]",
            Verb::Move => "move <position|(lower,upper)> <target>",
            Verb::Swap => "swap <line> <line>",
            Verb::Goto => "goto <position>",
            Verb::Undo => "undo",
            Verb::Redo => "redo",
            Verb::Status => "status",
            Verb::Info => "info <line>",
            Verb::List => "ls",
            Verb::Cd => "cd <line>|..",
            Verb::Quit => "quit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub repeat: usize,
    pub force: bool,
    pub verb: Verb,
    pub args: Vec<Token>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Lines to print.
    Continue(Vec<String>),
    Quit,
}

/// `None` for a blank line.
pub fn parse(line: &str) -> Result<Option<Request>, CliError> {
    let mut tokens = tokenize(line)?.into_iter().peekable();

    let mut repeat = 1;
    if let Some(first) = tokens.peek() {
        if first.is_integer() {
            repeat = first
                .text
                .parse()
                .map_err(|_| CliError::UnknownCommand(first.text.clone()))?;
            tokens.next();
        }
    }

    let Some(head) = tokens.next() else {
        return Ok(None);
    };
    let (force, name) = match head.text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, head.text.as_str()),
    };
    let verb = Verb::from_name(name).ok_or_else(|| CliError::UnknownCommand(head.text.clone()))?;

    Ok(Some(Request {
        repeat,
        force,
        verb,
        args: tokens.collect(),
    }))
}

/// Runs `request` `repeat` times. `confirm` is asked before a move that
/// would have to create blank lines.
pub fn execute(
    session: &mut Session,
    request: &Request,
    confirm: &mut dyn FnMut(&str) -> bool,
) -> Result<Outcome, CliError> {
    let mut output = Vec::new();
    for _ in 0..request.repeat {
        if request.verb == Verb::Quit {
            return Ok(Outcome::Quit);
        }
        run_once(session, request, confirm, &mut output)?;
    }
    Ok(Outcome::Continue(output))
}

fn run_once(
    session: &mut Session,
    request: &Request,
    confirm: &mut dyn FnMut(&str) -> bool,
    output: &mut Vec<String>,
) -> Result<(), CliError> {
    let verb = request.verb;
    let args = request.args.as_slice();
    let usage = || CliError::Usage(verb.usage());

    match verb {
        Verb::Insert => {
            if args.len() > 2 {
                return Err(usage());
            }
            let label = args.first().map(|t| t.text.as_str());
            let at = match args.get(1) {
                Some(token) if !token.quoted && token.text == APPEND => Some(session.count()? + 1),
                Some(token) => Some(position(token, verb)?),
                None => None,
            };
            session.insert(label, at)?;
        }
        Verb::Delete => {
            if args.len() > 1 {
                return Err(usage());
            }
            let target = optional_range(session, args.first())?;
            session.delete(target, request.force)?;
        }
        Verb::Rename => {
            let (source, rest) = args.split_first().ok_or_else(usage)?;
            if rest.len() > 1 {
                return Err(usage());
            }
            let source = if source.is_integer() {
                LabelSource::Line(position(source, verb)?)
            } else {
                LabelSource::Text(source.text.as_str().into())
            };
            let target = optional_range(session, rest.first())?;
            session.rename(&source, target)?;
        }
        Verb::Move => {
            let [range, to] = args else {
                return Err(usage());
            };
            let count = session.count()?;
            let range = Target::parse(&range.text, count)?.into_range();
            let to = position(to, verb)?;

            if let MoveOutcome::NeedsConfirmation { count, required } =
                session.move_lines(range, to, false)?
            {
                let question = format!(
                    "Line {} does not exist ({} lines). Create blank lines up to it? y/n: ",
                    required, count
                );
                if confirm(&question) {
                    session.move_lines(range, to, true)?;
                } else {
                    output.push("Move cancelled".to_string());
                }
            }
        }
        Verb::Swap => {
            let [a, b] = args else {
                return Err(usage());
            };
            session.swap(position(a, verb)?, position(b, verb)?)?;
        }
        Verb::Goto => {
            let [line] = args else {
                return Err(usage());
            };
            session.set_cursor(position(line, verb)?)?;
        }
        Verb::Undo => session.undo()?,
        Verb::Redo => session.redo()?,
        Verb::Status => {
            output.push(format!("Number of lines: {}", session.count()?));
            output.push(format!("Cursor: {}", session.cursor()));
        }
        Verb::Info => {
            let [line] = args else {
                return Err(usage());
            };
            let info = session.info(position(line, verb)?)?;
            output.push(format!("Text: {}", info.label));
            output.push(format!("Lines: {}", info.children));
        }
        Verb::List => {
            let cursor = session.cursor();
            for entry in session.entries()? {
                let marker = if entry.key == cursor { '>' } else { ' ' };
                output.push(format!("{} {} {}", marker, entry.key, entry.label));
            }
        }
        Verb::Cd => {
            let [target] = args else {
                return Err(usage());
            };
            if target.text == ".." {
                session.leave();
            } else {
                session.enter(position(target, verb)?)?;
            }
        }
        Verb::Quit => {}
    }
    Ok(())
}

fn position(token: &Token, verb: Verb) -> Result<usize, CliError> {
    if !token.is_integer() {
        return Err(CliError::Usage(verb.usage()));
    }
    token
        .text
        .parse()
        .map_err(|_| CliError::Usage(verb.usage()))
}

fn optional_range(session: &mut Session, token: Option<&Token>) -> Result<Option<LineRange>, CliError> {
    let Some(token) = token else {
        return Ok(None);
    };
    let count = session.count()?;
    Ok(Some(Target::parse(&token.text, count)?.into_range()))
}

#[cfg(test)]
#[path = "../../tests/unit/cli/dispatch.rs"]
mod tests;
