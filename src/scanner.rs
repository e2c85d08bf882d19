use std::str::Chars;

use peekmore::{PeekMore, PeekMoreIterator};

use crate::builtin::Builtin;
use crate::error::Error;
use crate::literal::Literal;
use crate::token::{Token, Type, Location};

type ScanResult<T> = Result<T, Error>;

pub struct Scanner<'a> {
    source: PeekMoreIterator<Chars<'a>>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
    column_offset: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner.
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source: source.chars().peekmore(),
            tokens: vec!(),
            start: 0,
            current: 0,
            line: 0,
            column_offset: 0,
        }
    }

    /// Scans the source code and returns a vector of tokens. The first
    /// malformed character aborts the scan.
    pub fn scan_tokens(&mut self) -> ScanResult<Vec<Token>> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token()?;
        }

        self.tokens.push(
            Token::new(
                Type::EOF,
                String::from(""),
                None,
                Location::new(self.line, 0),
            )
        );

        Ok(self.tokens.clone())
    }

    /// Returns the next character and consumes it.
    fn advance(&mut self) -> char {
        match self.source.next() {
            Some(char) => {
                self.current += 1;
                char
            },
            None => panic!("tried to advance past end of the source."),
        }
    }

    /// Returns the next character without consuming it.
    fn peek(&mut self) -> Option<char> {
        self.source.peek().copied()
    }

    /// Returns the next next character without consuming it.
    fn peek_next(&mut self) -> Option<char> {
        self.source.peek_nth(1).copied()
    }

    /// Returns if the character after the current one is the expected one.
    fn match_next(&mut self, expected: char) -> bool {
        self.peek_next() == Some(expected)
    }

    /// Returns if the scanner has reached the end of the source.
    fn is_at_end(&mut self) -> bool {
        self.peek().is_none()
    }

    /// Location of the token currently being scanned.
    fn location(&self) -> Location {
        Location::new(self.line, self.start - self.column_offset)
    }

    fn error(&self, message: String) -> Error {
        Error::Lex { location: self.location(), message }
    }

    /// Adds a new token to the list of tokens.
    fn add_token(&mut self, r#type: Type, lexeme: String, literal: Option<Literal>) {
        let location = self.location();
        self.tokens.push(Token::new(r#type, lexeme, literal, location));
    }

    /// Adds a new single char token to the list of tokens.
    fn add_single_char_token(&mut self, r#type: Type) {
        let c = self.advance();
        self.add_token(r#type, c.to_string(), None);
    }

    /// Adds a new double char token to the list of tokens.
    fn add_double_char_token(&mut self, r#type: Type) {
        let first = self.advance();
        let second = self.advance();

        self.add_token(r#type, format!("{first}{second}"), None);
    }

    /// Consumes a newline, keeping the line counter current.
    fn new_line(&mut self) {
        self.advance();
        self.line += 1;
        self.column_offset = self.current;
    }

    /// Skips whitespace between `end` and the word that may follow it.
    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                Some(' ') | Some('\r') | Some('\t') => { self.advance(); },
                Some('\n') => self.new_line(),
                _ => break,
            }
        }
    }

    /// Reads a run of identifier characters.
    fn word(&mut self) -> String {
        let mut value = Vec::new();

        // is_alphanumeric does not include underscores.
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            value.push(self.advance());
        }

        String::from_iter(value)
    }

    /// Handles a string literal.
    fn string(&mut self) -> ScanResult<()> {
        self.advance(); // Move past the starting double quotes.

        let mut value = String::new();
        let mut raw = String::new();

        loop {
            match self.peek() {
                None => {
                    return Err(self.error(String::from("Unterminated string")));
                },
                Some('"') => {
                    self.advance();
                    break;
                },
                Some('\\') => {
                    self.advance();
                    let Some(escape) = self.peek() else {
                        return Err(self.error(String::from("Unterminated string")));
                    };
                    self.advance();

                    let unescaped = match escape {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        '\\' => '\\',
                        '"' => '"',
                        '\'' => '\'',
                        '0' => '\0',
                        c => {
                            return Err(self.error(format!("Unknown escape sequence '\\{c}'")));
                        },
                    };

                    value.push(unescaped);
                    raw.push('\\');
                    raw.push(escape);
                },
                Some('\n') => {
                    value.push('\n');
                    raw.push('\n');
                    self.new_line();
                },
                Some(c) => {
                    value.push(c);
                    raw.push(c);
                    self.advance();
                },
            }
        }

        // The literal holds the unescaped contents; the lexeme keeps the
        // source form so a token stream can be printed back out.
        self.add_token(Type::String, format!("\"{raw}\""), Some(Literal::String(value)));
        Ok(())
    }

    /// Handles a number literal. A literal with a fraction or an exponent is
    /// a float, anything else an integer.
    fn number(&mut self) -> ScanResult<()> {
        let mut value = Vec::new();
        let mut is_float = false;

        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            value.push(self.advance());
        }

        if self.peek() == Some('.') {
            if matches!(self.peek_next(), Some(c) if c.is_ascii_digit()) {
                is_float = true;
                value.push(self.advance());  // Consume the dot.

                while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    value.push(self.advance());
                }
            } else {
                return Err(self.error(String::from("Unterminated number")));
            }
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            is_float = true;
            value.push(self.advance());

            if matches!(self.peek(), Some('+') | Some('-')) {
                value.push(self.advance());
            }

            if !matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                return Err(self.error(String::from("Malformed exponent")));
            }

            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                value.push(self.advance());
            }
        }

        let value: String = value.into_iter().collect();

        if is_float {
            let number: f64 = value.parse()
                .map_err(|_| self.error(format!("Invalid number literal '{value}'")))?;
            self.add_token(Type::Float, value, Some(Literal::Float(number)));
        } else {
            let number: i64 = value.parse()
                .map_err(|_| self.error(format!("Integer literal '{value}' is out of range")))?;
            self.add_token(Type::Int, value, Some(Literal::Int(number)));
        }

        Ok(())
    }

    /// Handles an identifier, a keyword or a fused `end <keyword>` pair.
    fn identifier(&mut self) -> ScanResult<()> {
        let word = self.word();

        if word == "end" {
            let end_location = self.location();
            self.skip_whitespace();

            if matches!(self.peek(), Some(c) if c.is_alphabetic() || c == '_') {
                self.start = self.current;
                let next = self.word();

                let fused = match next.as_str() {
                    "if"       => Some(Type::EndIf),
                    "for"      => Some(Type::EndFor),
                    "while"    => Some(Type::EndWhile),
                    "function" => Some(Type::EndFunction),
                    _ => None,
                };

                match fused {
                    Some(r#type) => {
                        self.tokens.push(Token::new(r#type, format!("end {next}"), None, end_location));
                    },
                    None => {
                        self.tokens.push(Token::new(Type::End, word, None, end_location));
                        self.add_word(next);
                    },
                }
            } else {
                self.tokens.push(Token::new(Type::End, word, None, end_location));
            }

            return Ok(());
        }

        self.add_word(word);
        Ok(())
    }

    /// Adds the token for a scanned word, checking the reserved set.
    fn add_word(&mut self, word: String) {
        let token_type = match word.as_str() {
            "if"       => Type::If,
            "then"     => Type::Then,
            "else"     => Type::Else,
            "for"      => Type::For,
            "in"       => Type::In,
            "while"    => Type::While,
            "function" => Type::Function,
            "return"   => Type::Return,
            "break"    => Type::Break,
            "continue" => Type::Continue,
            "and"      => Type::And,
            "or"       => Type::Or,
            "not"      => Type::Not,
            "true"     => Type::True,
            "false"    => Type::False,
            "nil"      => Type::Nil,
            _ => match Builtin::from_keyword(&word) {
                Some(builtin) => Type::Builtin(builtin),
                None => Type::Identifier,
            },
        };

        let literal = match token_type {
            Type::True => Some(Literal::Bool(true)),
            Type::False => Some(Literal::Bool(false)),
            Type::Nil => Some(Literal::Nil),
            _ => None,
        };

        self.add_token(token_type, word, literal);
    }

    /// Scans the next token.
    fn scan_token(&mut self) -> ScanResult<()> {
        let Some(c) = self.peek() else { return Ok(()) };

        match c {
            // One character tokens
            '(' => self.add_single_char_token(Type::LeftParen),
            ')' => self.add_single_char_token(Type::RightParen),
            '[' => self.add_single_char_token(Type::LeftBracket),
            ']' => self.add_single_char_token(Type::RightBracket),
            ',' => self.add_single_char_token(Type::Comma),
            ':' => self.add_single_char_token(Type::Colon),

            // Operators, possibly compound
            '+' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::PlusEqual);
                } else {
                    self.add_single_char_token(Type::Plus);
                };
            },
            '-' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::MinusEqual);
                } else {
                    self.add_single_char_token(Type::Minus);
                };
            },
            '*' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::StarEqual);
                } else {
                    self.add_single_char_token(Type::Star);
                };
            },
            '%' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::PercentEqual);
                } else {
                    self.add_single_char_token(Type::Percent);
                };
            },
            '^' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::CaretEqual);
                } else {
                    self.add_single_char_token(Type::Caret);
                };
            },
            '/' => {
                if self.match_next('/') {
                    while !self.is_at_end() && self.peek() != Some('\n') {
                        self.advance();
                    }
                } else if self.match_next('=') {
                    self.add_double_char_token(Type::SlashEqual);
                } else {
                    self.add_single_char_token(Type::Slash);
                }
            },
            '=' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::EqualEqual);
                } else {
                    self.add_single_char_token(Type::Equal);
                };
            },
            '!' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::NotEqual);
                } else {
                    self.advance();
                    return Err(self.error(String::from("Expected '!=', got '!'")));
                };
            },
            '<' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::LessEqual);
                } else {
                    self.add_single_char_token(Type::Less);
                };
            },
            '>' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::GreaterEqual);
                } else {
                    self.add_single_char_token(Type::Greater);
                };
            },

            // Ignore whitespace
            ' ' | '\r' | '\t' => {
                self.advance();
            },

            // Update line counter
            '\n' => self.new_line(),

            // String
            '"' => return self.string(),

            // Numbers
            c if c.is_ascii_digit() => return self.number(),

            // Identifiers and keywords
            c if c.is_alphabetic() || c == '_' => return self.identifier(),

            _ => {
                self.advance();
                return Err(self.error(format!("Unexpected character '{c}'")));
            },
        }

        Ok(())
    }
}
