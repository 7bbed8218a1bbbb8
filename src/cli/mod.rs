//! Interactive command syntax: tokenizing and dispatch onto a [`Session`].
//!
//! [`Session`]: crate::session::Session

pub mod dispatch;
pub mod lexer;

pub use dispatch::{execute, parse, Outcome, Request, Verb};
pub use lexer::{tokenize, Token};

use crate::error::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("unterminated quote")]
    UnterminatedQuote,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}
