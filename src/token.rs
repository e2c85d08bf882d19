use std::fmt::{self, Display};

use crate::builtin::Builtin;
use crate::literal::Literal;

/// Kinds of tokens in the language.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Type {
  // Punctuation.
  LeftParen, RightParen, LeftBracket, RightBracket,
  Comma, Colon,

  // Operators.
  Plus, Minus, Star, Slash, Percent, Caret,
  Equal, EqualEqual, NotEqual,
  Greater, GreaterEqual,
  Less, LessEqual,

  // Compound assignment.
  PlusEqual, MinusEqual, StarEqual, SlashEqual, PercentEqual, CaretEqual,

  // Literals.
  Identifier, String, Int, Float,

  // Keywords.
  If, Then, Else, For, In, While, Function,
  Return, Break, Continue,
  And, Or, Not,
  True, False, Nil,

  // Block terminators. `End` is the bare `end` keyword; the fused forms are
  // produced by the scanner when `end` is followed by the matching word.
  End, EndIf, EndFor, EndWhile, EndFunction,

  // Built-ins are reserved at the lexical level.
  Builtin(Builtin),

  EOF
}

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Location { line, column }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Represents a token in the language.
#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub r#type: Type,
    pub lexeme: String, // String representation of the token
    pub literal: Option<Literal>,
    pub location: Location,
}

impl Token {
    /// Creates a new token.
    pub fn new(
        r#type: Type,
        lexeme: String,
        literal: Option<Literal>,
        location: Location,
    ) -> Token {
        Token { r#type, lexeme, literal, location }
    }
}

impl From<&str> for Token {
    fn from(token: &str) -> Self {
        Token::new(Type::Identifier, token.to_string(), None, Location::new(0, 0))
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.lexeme)
    }
}
