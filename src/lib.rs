//! ITMOScript is a small dynamically typed scripting language with numbers,
//! booleans, nil, strings, lists, first-class functions and lexically scoped
//! variables. The interpreter is a tree-walker with a hand-written recursive
//! descent parser.
//!
//! ## Scanning
//! The first step is scanning: turning source text into tokens. The scanner
//! lives in the [`scanner`](scanner) module and walks the characters with one
//! or two characters of look-ahead. Keywords and built-in names are reserved
//! at this level, and the word `end` fuses with a following `if`, `for`,
//! `while` or `function` into a single block-terminator token. A malformed
//! literal or an unexpected character stops the scan with a
//! [`Lex`](error::Error::Lex) error.
//!
//! ## Parsing
//! The parser in the [`parser`](parser) module consumes the token stream and
//! builds the AST out of [`expressions`](expr::Expr), which produce a
//! [`Value`](value::Value) when evaluated, and [`statements`](stmt::Stmt),
//! which drive control flow and side effects. Expressions are parsed with one
//! precedence-climbing method per level; compound assignments are desugared
//! on the spot. The first mismatched token stops the parse with a
//! [`Parse`](error::Error::Parse) error.
//!
//! ## Evaluating
//! The [`interpreter`](interpreter) module walks the AST against a
//! [scope chain](environment::Environment) and an output sink. `if`, `for`
//! and `while` bodies run in the scope of their host; only a function call
//! opens a child scope, built as a copy of the caller's chain with one fresh
//! frame on top. Functions do not capture their defining environment.
//! `break`, `continue` and `return` unwind the recursion as
//! [`Exit`](error::Exit) signals until a loop or a call catches them, and
//! runtime failures surface as `Error: <message>` on the sink.
//!
//! Two entry points cover both ways of hosting the interpreter: [`interpret`]
//! evaluates one complete program, and a persistent
//! [`Interpreter`](interpreter::Interpreter) evaluates successive snippets
//! that share one global scope, the way the REPL feeds it.

use std::io::Write;

pub mod error;
pub mod token;
pub mod literal;
pub mod builtin;
pub mod scanner;
pub mod expr;
pub mod stmt;
pub mod parser;
pub mod environment;
pub mod value;
pub mod function;
pub mod interpreter;

pub use error::Error;
pub use interpreter::Interpreter;
pub use value::Value;

/// Evaluates a complete program against the given output sink.
///
/// Returns whether the program ran cleanly; on failure, a diagnostic has
/// already been written to the sink.
pub fn interpret(source: &str, out: &mut dyn Write) -> bool {
    Interpreter::new(out).run(source)
}
