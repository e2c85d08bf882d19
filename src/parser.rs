use std::rc::Rc;

use crate::error::Error;
use crate::expr::*;
use crate::literal::Literal;
use crate::stmt::*;
use crate::token::{Token, Type};

type ParseResult<T> = Result<T, Error>;

/// Returns if the next token is any of the given types.
macro_rules! matches {
    ( $self:ident, $( $type:expr ),+ ) => {
        {
            if $( $self.check($type) ) ||* {
                $self.advance();
                true
            } else {
                false
            }
        }
    }
}

/// Parses the tokens and returns the resulting program.
///
/// - Program    -> Statement* EOF ;
/// - Statement  -> IfStmt | ForStmt | WhileStmt | "break" | "continue"
///                 | ReturnStmt | Assignment | ExprStmt ;
/// - IfStmt     -> "if" Expression "then" Statement*
///                 ( "else" "if" Expression "then" Statement* )*
///                 ( "else" Statement* )? ( "end if" | "end" ) ;
/// - ForStmt    -> "for" IDENTIFIER "in" ( RangeClause | Expression )
///                 Statement* ( "end for" | "end" ) ;
/// - RangeClause-> "range" "(" Expression ( "," Expression ( "," Expression )? )? ")" ;
/// - WhileStmt  -> "while" Expression Statement* ( "end while" | "end" ) ;
/// - ReturnStmt -> "return" Expression? ;
/// - Assignment -> IDENTIFIER ( "=" | "+=" | "-=" | "*=" | "/=" | "%=" | "^=" ) Expression ;
/// - ExprStmt   -> Expression ;
/// - Expression -> LogicOr ;
/// - LogicOr    -> LogicAnd ( "or" LogicAnd )* ;
/// - LogicAnd   -> Comparison ( "and" Comparison )* ;
/// - Comparison -> Term ( ( "==" | "!=" | "<" | ">" | "<=" | ">=" ) Term )* ;
/// - Term       -> Factor ( ( "+" | "-" ) Factor )* ;
/// - Factor     -> Unary ( ( "*" | "/" | "%" | "^" ) Unary )* ;
/// - Unary      -> ( "not" | "-" ) Unary | Postfix ;
/// - Postfix    -> Primary ( "(" Arguments? ")" | "[" IndexOrSlice "]" )* ;
/// - Primary    -> Literal | IDENTIFIER | "(" Expression ")" | ListLiteral
///                 | FunctionLiteral | BuiltinCall ;
///
/// `^` shares the factor level and is left-associative; unary minus binds
/// tighter than any binary operator.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            current: 0,
        }
    }

    /// Parses the tokens and returns the statements of the program. The
    /// first mismatched token aborts the parse.
    pub fn parse(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            statements.push(self.statement()?);
        }

        Ok(statements)
    }

    /// Returns the next token without consuming it.
    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// Returns the previous token without consuming it.
    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    /// Returns if the parser has reached the end of the token stream.
    fn is_at_end(&self) -> bool {
        self.peek().r#type == Type::EOF
    }

    /// Returns if the next token is of the given type.
    fn check(&self, r#type: Type) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().r#type == r#type
    }

    /// Returns if the token after the next one is any of the given types.
    fn check_next(&self, types: &[Type]) -> bool {
        match self.tokens.get(self.current + 1) {
            Some(token) => types.contains(&token.r#type),
            None => false,
        }
    }

    /// Consumes the next token and returns it.
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    /// Consumes the next token if it is of the given type.
    fn consume(&mut self, r#type: Type, message: &str) -> ParseResult<&Token> {
        if self.check(r#type) {
            return Ok(self.advance());
        }

        Err(Self::error_at(self.peek(), message))
    }

    fn error_at_current(&self, message: &str) -> Error {
        Self::error_at(self.peek(), message)
    }

    /// Builds a parse error naming the expectation and the offending token.
    fn error_at(token: &Token, message: &str) -> Error {
        let message = if token.r#type == Type::EOF {
            format!("{message}, got end of input")
        } else {
            format!("{message}, got '{}'", token.lexeme)
        };

        Error::Parse { location: token.location, message }
    }

    /// Parses statements until one of the given terminators (or the end of
    /// the input, which the caller reports).
    fn block(&mut self, terminators: &[Type]) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.is_at_end() && !terminators.contains(&self.peek().r#type) {
            statements.push(self.statement()?);
        }

        Ok(statements)
    }

    /// Consumes a block terminator. Bare `end` is accepted as a synonym for
    /// the specific `end <keyword>`.
    fn end_block(&mut self, terminator: Type, message: &str) -> ParseResult<()> {
        if matches!(self, terminator, Type::End) {
            return Ok(());
        }

        Err(self.error_at_current(message))
    }

    /// Parses a statement.
    fn statement(&mut self) -> ParseResult<Stmt> {
        if matches!(self, Type::If) {
            return self.if_statement();
        }

        if matches!(self, Type::For) {
            return self.for_statement();
        }

        if matches!(self, Type::While) {
            return self.while_statement();
        }

        if matches!(self, Type::Break) {
            return Ok(Stmt::Break);
        }

        if matches!(self, Type::Continue) {
            return Ok(Stmt::Continue);
        }

        if matches!(self, Type::Return) {
            return self.return_statement();
        }

        let assign_ops = [
            Type::Equal,
            Type::PlusEqual, Type::MinusEqual, Type::StarEqual,
            Type::SlashEqual, Type::PercentEqual, Type::CaretEqual,
        ];
        if self.check(Type::Identifier) && self.check_next(&assign_ops) {
            return self.assignment();
        }

        self.expression_statement()
    }

    /// Parses an assignment statement. `x op= e` desugars to `x = x op e`.
    fn assignment(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, "Expected variable name")?.clone();
        let operator = self.advance().clone();
        let value = self.expression()?;

        let value = match operator.r#type {
            Type::Equal => value,
            _ => {
                let binary_type = match operator.r#type {
                    Type::PlusEqual    => Type::Plus,
                    Type::MinusEqual   => Type::Minus,
                    Type::StarEqual    => Type::Star,
                    Type::SlashEqual   => Type::Slash,
                    Type::PercentEqual => Type::Percent,
                    Type::CaretEqual   => Type::Caret,
                    _ => unreachable!(),
                };
                let lexeme = operator.lexeme[..1].to_string();

                Expr::Binary(BinaryData {
                    left: Box::new(Expr::Variable(VariableData { name: name.clone() })),
                    operator: Token::new(binary_type, lexeme, None, operator.location),
                    right: Box::new(value),
                })
            },
        };

        Ok(Stmt::Assign(AssignData { name, value }))
    }

    /// Parses an if statement with its else-if chain.
    fn if_statement(&mut self) -> ParseResult<Stmt> {
        let condition = self.expression()?;
        self.consume(Type::Then, "Expected 'then' after if condition")?;

        let then_branch = self.block(&[Type::Else, Type::EndIf, Type::End])?;

        let mut else_if_branches = Vec::new();
        let mut else_branch = Vec::new();

        while matches!(self, Type::Else) {
            if matches!(self, Type::If) {
                let condition = self.expression()?;
                self.consume(Type::Then, "Expected 'then' after else if condition")?;
                let body = self.block(&[Type::Else, Type::EndIf, Type::End])?;

                else_if_branches.push(ElseIfBranch { condition, body });
            } else {
                else_branch = self.block(&[Type::EndIf, Type::End])?;
                break;
            }
        }

        self.end_block(Type::EndIf, "Expected 'end if' after if statement")?;

        Ok(Stmt::If(IfData { condition, then_branch, else_if_branches, else_branch }))
    }

    /// Parses a for statement: either over `range(...)` or over an iterable.
    fn for_statement(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, "Expected loop variable after 'for'")?.clone();
        self.consume(Type::In, "Expected 'in' after loop variable")?;

        // `range` is contextual: an identifier spelled "range" followed by a
        // parenthesis. Anything else after `in` is a plain iterable.
        let is_range = self.check(Type::Identifier)
            && self.peek().lexeme == "range"
            && self.check_next(&[Type::LeftParen]);

        if is_range {
            self.advance();
            self.consume(Type::LeftParen, "Expected '(' after 'range'")?;

            let mut args = vec![self.expression()?];
            while matches!(self, Type::Comma) {
                args.push(self.expression()?);
            }
            self.consume(Type::RightParen, "Expected ')' after range arguments")?;

            if args.len() > 3 {
                return Err(self.error_at_current("range takes at most three arguments"));
            }

            let count = args.len();
            let mut args = args.into_iter();
            let (start, end, step) = match count {
                1 => (
                    Expr::Literal(Literal::Int(0)),
                    args.next().unwrap(),
                    Expr::Literal(Literal::Int(1)),
                ),
                2 => (
                    args.next().unwrap(),
                    args.next().unwrap(),
                    Expr::Literal(Literal::Int(1)),
                ),
                _ => (
                    args.next().unwrap(),
                    args.next().unwrap(),
                    args.next().unwrap(),
                ),
            };

            let body = self.block(&[Type::EndFor, Type::End])?;
            self.end_block(Type::EndFor, "Expected 'end for' after for statement")?;

            return Ok(Stmt::ForRange(ForRangeData { name, start, end, step, body }));
        }

        let iterable = self.expression()?;
        let body = self.block(&[Type::EndFor, Type::End])?;
        self.end_block(Type::EndFor, "Expected 'end for' after for statement")?;

        Ok(Stmt::ForEach(ForEachData { name, iterable, body }))
    }

    /// Parses a while statement.
    fn while_statement(&mut self) -> ParseResult<Stmt> {
        let condition = self.expression()?;
        let body = self.block(&[Type::EndWhile, Type::End])?;
        self.end_block(Type::EndWhile, "Expected 'end while' after while statement")?;

        Ok(Stmt::While(WhileData { condition, body }))
    }

    /// Parses a return statement. The expression is optional: a `return`
    /// right before a block terminator yields nil.
    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let value = match self.peek().r#type {
            Type::End | Type::EndIf | Type::EndFor | Type::EndWhile
            | Type::EndFunction | Type::Else | Type::EOF => None,
            _ => Some(self.expression()?),
        };

        Ok(Stmt::Return(ReturnData { value }))
    }

    /// Parses an expression statement.
    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;

        Ok(Stmt::Expression(ExpressionData { expr }))
    }

    /// Parses an expression.
    fn expression(&mut self) -> ParseResult<Expr> {
        self.or()
    }

    /// Parses an or expression.
    fn or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.and()?;

        while matches!(self, Type::Or) {
            let operator = self.previous().clone();
            let right = self.and()?;
            expr = Expr::Logical(LogicalData {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            });
        }

        Ok(expr)
    }

    /// Parses an and expression.
    fn and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.comparison()?;

        while matches!(self, Type::And) {
            let operator = self.previous().clone();
            let right = self.comparison()?;
            expr = Expr::Logical(LogicalData {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            });
        }

        Ok(expr)
    }

    /// Parses a comparison expression.
    fn comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;

        while matches!(
            self,
            Type::EqualEqual, Type::NotEqual,
            Type::Less, Type::Greater, Type::LessEqual, Type::GreaterEqual
        ) {
            let operator = self.previous().clone();
            let right = self.term()?;
            expr = Expr::Binary(BinaryData {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            });
        }

        Ok(expr)
    }

    /// Parses a term expression.
    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;

        while matches!(self, Type::Plus, Type::Minus) {
            let operator = self.previous().clone();
            let right = self.factor()?;
            expr = Expr::Binary(BinaryData {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            });
        }

        Ok(expr)
    }

    /// Parses a factor expression.
    fn factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;

        while matches!(self, Type::Star, Type::Slash, Type::Percent, Type::Caret) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::Binary(BinaryData {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            });
        }

        Ok(expr)
    }

    /// Parses a unary expression.
    fn unary(&mut self) -> ParseResult<Expr> {
        if matches!(self, Type::Not, Type::Minus) {
            let operator = self.previous().clone();
            let right = self.unary()?;

            return Ok(Expr::Unary(UnaryData {
                operator,
                expr: Box::new(right),
            }));
        }

        self.postfix()
    }

    /// Parses call, index and slice trailers.
    fn postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            if matches!(self, Type::LeftParen) {
                expr = self.finish_call(expr)?;
            } else if matches!(self, Type::LeftBracket) {
                expr = self.index_or_slice(expr)?;
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parses the arguments of a call expression.
    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = Vec::new();

        if !self.check(Type::RightParen) {
            loop {
                arguments.push(self.expression()?);

                if !matches!(self, Type::Comma) {
                    break;
                }
            }
        }

        self.consume(Type::RightParen, "Expected ')' after arguments")?;

        Ok(Expr::Call(CallData {
            callee: Box::new(callee),
            arguments,
        }))
    }

    /// Parses an index or slice trailer, after the opening bracket.
    fn index_or_slice(&mut self, container: Expr) -> ParseResult<Expr> {
        if matches!(self, Type::Colon) {
            let end = match self.check(Type::RightBracket) {
                true => None,
                false => Some(Box::new(self.expression()?)),
            };
            self.consume(Type::RightBracket, "Expected ']' after slice")?;

            return Ok(Expr::Slice(SliceData {
                container: Box::new(container),
                start: None,
                end,
            }));
        }

        let first = self.expression()?;

        if matches!(self, Type::Colon) {
            let end = match self.check(Type::RightBracket) {
                true => None,
                false => Some(Box::new(self.expression()?)),
            };
            self.consume(Type::RightBracket, "Expected ']' after slice")?;

            return Ok(Expr::Slice(SliceData {
                container: Box::new(container),
                start: Some(Box::new(first)),
                end,
            }));
        }

        self.consume(Type::RightBracket, "Expected ']' after index")?;

        Ok(Expr::Index(IndexData {
            container: Box::new(container),
            index: Box::new(first),
        }))
    }

    /// Parses a list literal, after the opening bracket. A trailing comma is
    /// tolerated.
    fn list(&mut self) -> ParseResult<Expr> {
        let mut elements = Vec::new();

        if !self.check(Type::RightBracket) {
            loop {
                elements.push(self.expression()?);

                if !matches!(self, Type::Comma) {
                    break;
                }

                if self.check(Type::RightBracket) {
                    break;
                }
            }
        }

        self.consume(Type::RightBracket, "Expected ']' after list items")?;

        Ok(Expr::List(ListData { elements }))
    }

    /// Parses a function literal, after the `function` keyword.
    fn function_literal(&mut self) -> ParseResult<Expr> {
        self.consume(Type::LeftParen, "Expected '(' after 'function'")?;

        let mut params = Vec::new();

        if !self.check(Type::RightParen) {
            loop {
                params.push(self.consume(Type::Identifier, "Expected parameter name")?.clone());

                if !matches!(self, Type::Comma) {
                    break;
                }
            }
        }

        self.consume(Type::RightParen, "Expected ')' after parameters")?;

        let body = self.block(&[Type::EndFunction, Type::End])?;
        self.end_block(Type::EndFunction, "Expected 'end function' after function body")?;

        Ok(Expr::Function(FunctionData { params, body: Rc::new(body) }))
    }

    /// Parses a built-in call. Built-in names are reserved, so the argument
    /// list is mandatory.
    fn builtin_call(&mut self, builtin: crate::builtin::Builtin) -> ParseResult<Expr> {
        self.consume(Type::LeftParen, &format!("Expected '(' after '{builtin}'"))?;

        let mut arguments = Vec::new();

        if !self.check(Type::RightParen) {
            loop {
                arguments.push(self.expression()?);

                if !matches!(self, Type::Comma) {
                    break;
                }
            }
        }

        self.consume(Type::RightParen, "Expected ')' after arguments")?;

        Ok(Expr::Builtin(BuiltinData { builtin, arguments }))
    }

    /// Parses a primary expression.
    fn primary(&mut self) -> ParseResult<Expr> {
        if matches!(self, Type::Int, Type::Float, Type::String, Type::True, Type::False, Type::Nil) {
            return Ok(Expr::Literal(self.previous().clone().literal
                .expect("literal token to have a value")));
        }

        if matches!(self, Type::Identifier) {
            return Ok(Expr::Variable(VariableData {
                name: self.previous().clone(),
            }));
        }

        if matches!(self, Type::LeftParen) {
            let expr = self.expression()?;
            self.consume(Type::RightParen, "Expected ')' after expression")?;

            // No grouping node; parentheses only shape the tree.
            return Ok(expr);
        }

        if matches!(self, Type::LeftBracket) {
            return self.list();
        }

        if matches!(self, Type::Function) {
            return self.function_literal();
        }

        if let Type::Builtin(builtin) = self.peek().r#type {
            self.advance();
            return self.builtin_call(builtin);
        }

        Err(self.error_at_current("Expected expression"))
    }
}
