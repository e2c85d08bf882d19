use thiserror::Error;

use crate::token::Location;
use crate::value::Value;

/// Everything that can go wrong while scanning, parsing or evaluating.
///
/// Each variant is fatal for the evaluation unit it occurs in and is rendered
/// as `Error: <message>` on the output sink. Scan and parse errors carry the
/// source location; runtime errors are plain messages.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed literal, unknown character or bad escape.
    #[error("[line {}:{}] {}", .location.line + 1, .location.column + 1, .message)]
    Lex { location: Location, message: String },

    /// Unexpected token or missing terminator.
    #[error("[line {}:{}] {}", .location.line + 1, .location.column + 1, .message)]
    Parse { location: Location, message: String },

    /// Reference to an undefined variable.
    #[error("Undefined variable '{0}'")]
    Name(String),

    /// Operator or built-in applied to an unsupported combination of kinds.
    #[error("{0}")]
    Type(String),

    /// Arity mismatch for a call or a built-in.
    #[error("{0}")]
    Arg(String),

    /// Index or slice out of range, and other bound violations.
    #[error("{0}")]
    Range(String),

    /// Division by zero, negative repetition and friends.
    #[error("{0}")]
    Arith(String),

    /// Calling a non-function, or a control-flow escape with nothing to
    /// catch it.
    #[error("{0}")]
    Call(String),
}

/// A non-local exit propagating up the recursive evaluator.
///
/// `break`, `continue` and `return` are not errors: they are distinct signal
/// kinds that loops and function calls catch. An error unwinds all the way to
/// the entry point. Keeping all four in one enum lets evaluation use `?`
/// throughout.
#[derive(Debug, Clone)]
pub enum Exit {
    Error(Error),
    Return(Value),
    Break,
    Continue,
}

impl From<Error> for Exit {
    fn from(error: Error) -> Self {
        Exit::Error(error)
    }
}
