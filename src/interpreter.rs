use std::cmp::Ordering;
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use substring::Substring;

use crate::builtin::Builtin;
use crate::environment::Environment;
use crate::error::{Error, Exit};
use crate::expr::{Expr, BinaryData, BuiltinData, CallData, LogicalData, SliceData, UnaryData};
use crate::function::Function;
use crate::parser::Parser;
use crate::scanner::Scanner;
use crate::stmt::{Stmt, ForEachData, ForRangeData, IfData, WhileData};
use crate::token::Type;
use crate::value::Value;

type EvalResult = Result<Value, Exit>;

/// A persistent interpreter: one global scope shared by every snippet it
/// evaluates, one call stack, one output sink.
pub struct Interpreter<'a> {
    environment: Environment,
    call_stack: Vec<String>,
    out: &'a mut dyn Write,
}

impl<'a> Interpreter<'a> {
    pub fn new(out: &'a mut dyn Write) -> Self {
        Interpreter {
            environment: Environment::new(),
            call_stack: Vec::new(),
            out,
        }
    }

    /// Scans, parses and evaluates a complete snippet, returning the value
    /// of its last statement. The global scope survives a failed snippet, so
    /// a REPL can keep going.
    pub fn eval(&mut self, source: &str) -> Result<Value, Error> {
        let tokens = Scanner::new(source).scan_tokens()?;
        let statements = Parser::new(tokens).parse()?;

        let mut value = Value::Nil;
        for statement in &statements {
            value = match self.execute(statement) {
                Ok(value) => value,
                Err(Exit::Error(error)) => return Err(error),
                Err(Exit::Return(_)) => {
                    return Err(Error::Call(String::from("'return' outside a function")));
                },
                Err(Exit::Break) => {
                    return Err(Error::Call(String::from("'break' outside a loop")));
                },
                Err(Exit::Continue) => {
                    return Err(Error::Call(String::from("'continue' outside a loop")));
                },
            };
        }

        Ok(value)
    }

    /// Evaluates a snippet and renders any diagnostic on the sink. Returns
    /// whether the snippet succeeded.
    pub fn run(&mut self, source: &str) -> bool {
        match self.eval(source) {
            Ok(_) => true,
            Err(error) => {
                let _ = writeln!(self.out, "Error: {error}");
                false
            },
        }
    }

    /// Executes a statement. The value is discarded by every caller except
    /// the REPL, which shows the result of the last statement.
    fn execute(&mut self, stmt: &Stmt) -> EvalResult {
        match stmt {
            Stmt::Expression(data) => self.evaluate(&data.expr),
            Stmt::Assign(data) => {
                let value = self.evaluate(&data.value)?;
                self.environment.define(&data.name.lexeme, value.clone());
                Ok(value)
            },
            Stmt::If(data) => self.execute_if(data),
            Stmt::ForRange(data) => self.execute_for_range(data),
            Stmt::ForEach(data) => self.execute_for_each(data),
            Stmt::While(data) => self.execute_while(data),
            Stmt::Break => Err(Exit::Break),
            Stmt::Continue => Err(Exit::Continue),
            Stmt::Return(data) => {
                let value = match &data.value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                Err(Exit::Return(value))
            },
        }
    }

    /// Executes a statement list in the current scope.
    fn execute_block(&mut self, statements: &[Stmt]) -> EvalResult {
        for statement in statements {
            self.execute(statement)?;
        }

        Ok(Value::Nil)
    }

    /// If bodies run in the host scope; there is no block scope.
    fn execute_if(&mut self, data: &IfData) -> EvalResult {
        if self.evaluate(&data.condition)?.is_truthy() {
            return self.execute_block(&data.then_branch);
        }

        for branch in &data.else_if_branches {
            if self.evaluate(&branch.condition)?.is_truthy() {
                return self.execute_block(&branch.body);
            }
        }

        self.execute_block(&data.else_branch)
    }

    /// Runs one loop iteration, catching `break` and `continue`.
    /// Returns whether the loop should keep going.
    fn loop_iteration(&mut self, body: &[Stmt]) -> Result<bool, Exit> {
        match self.execute_block(body) {
            Ok(_) | Err(Exit::Continue) => Ok(true),
            Err(Exit::Break) => Ok(false),
            Err(exit) => Err(exit),
        }
    }

    fn execute_for_range(&mut self, data: &ForRangeData) -> EvalResult {
        let start = self.range_bound(&data.start, "start")?;
        let end = self.range_bound(&data.end, "end")?;
        let step = self.range_bound(&data.step, "step")?;

        if step == 0 {
            return Err(Error::Range(String::from("Range step cannot be zero")).into());
        }

        let mut i = start;
        while (step > 0 && i < end) || (step < 0 && i > end) {
            self.environment.define(&data.name.lexeme, Value::Int(i));

            if !self.loop_iteration(&data.body)? {
                break;
            }

            i = i.wrapping_add(step);
        }

        Ok(Value::Nil)
    }

    fn range_bound(&mut self, expr: &Expr, which: &str) -> Result<i64, Exit> {
        match self.evaluate(expr)? {
            Value::Int(n) => Ok(n),
            Value::Float(n) => Ok(n as i64),
            _ => Err(Error::Type(format!("Range {which} is not a number")).into()),
        }
    }

    fn execute_for_each(&mut self, data: &ForEachData) -> EvalResult {
        match self.evaluate(&data.iterable)? {
            Value::List(list) => {
                // By index: the body may grow or shrink the list it walks.
                let mut index = 0;
                loop {
                    let item = {
                        let items = list.borrow();
                        match items.get(index) {
                            Some(item) => item.clone(),
                            None => break,
                        }
                    };

                    self.environment.define(&data.name.lexeme, item);

                    if !self.loop_iteration(&data.body)? {
                        break;
                    }

                    index += 1;
                }
            },
            Value::Str(s) => {
                for c in s.chars() {
                    self.environment.define(&data.name.lexeme, Value::from(c.to_string()));

                    if !self.loop_iteration(&data.body)? {
                        break;
                    }
                }
            },
            value => {
                return Err(Error::Type(format!(
                    "Cannot iterate over {} type", value.type_str(),
                )).into());
            },
        }

        Ok(Value::Nil)
    }

    fn execute_while(&mut self, data: &WhileData) -> EvalResult {
        while self.evaluate(&data.condition)?.is_truthy() {
            if !self.loop_iteration(&data.body)? {
                break;
            }
        }

        Ok(Value::Nil)
    }

    /// Evaluates an expression.
    fn evaluate(&mut self, expr: &Expr) -> EvalResult {
        match expr {
            Expr::Literal(literal) => Ok(Value::from(literal.clone())),
            Expr::Variable(data) => {
                match self.environment.get(&data.name.lexeme) {
                    Some(value) => Ok(value),
                    None => Err(Error::Name(data.name.lexeme.clone()).into()),
                }
            },
            Expr::Unary(data) => self.unary(data),
            Expr::Binary(data) => self.binary(data),
            Expr::Logical(data) => self.logical(data),
            Expr::List(data) => {
                let mut items = Vec::with_capacity(data.elements.len());
                for element in &data.elements {
                    items.push(self.evaluate(element)?);
                }
                Ok(Value::list(items))
            },
            Expr::Index(data) => {
                let container = self.evaluate(&data.container)?;
                let index = self.evaluate(&data.index)?;
                self.index(container, &index)
            },
            Expr::Slice(data) => self.slice(data),
            Expr::Call(data) => self.call(data),
            Expr::Function(data) => {
                let params = data.params.iter().map(|param| param.lexeme.clone()).collect();
                Ok(Value::Function(Rc::new(Function {
                    params,
                    body: Rc::clone(&data.body),
                })))
            },
            Expr::Builtin(data) => self.builtin(data),
        }
    }

    fn unary(&mut self, data: &UnaryData) -> EvalResult {
        let value = self.evaluate(&data.expr)?;

        match data.operator.r#type {
            Type::Minus => Ok(value.neg()?),
            Type::Not => Ok(Value::Bool(!value.is_truthy())),
            _ => unreachable!(),
        }
    }

    fn binary(&mut self, data: &BinaryData) -> EvalResult {
        let left = self.evaluate(&data.left)?;
        let right = self.evaluate(&data.right)?;

        let value = match data.operator.r#type {
            Type::Plus    => left.add(&right)?,
            Type::Minus   => left.sub(&right)?,
            Type::Star    => left.mul(&right)?,
            Type::Slash   => left.div(&right)?,
            Type::Percent => left.rem(&right)?,
            Type::Caret   => left.pow(&right)?,
            Type::EqualEqual => Value::Bool(left.equals(&right)?),
            Type::NotEqual   => Value::Bool(!left.equals(&right)?),
            r#type => {
                let ordering = left.compare(&right, &data.operator.lexeme)?;
                let result = match r#type {
                    Type::Less         => ordering == Ordering::Less,
                    Type::LessEqual    => ordering != Ordering::Greater,
                    Type::Greater      => ordering == Ordering::Greater,
                    Type::GreaterEqual => ordering != Ordering::Less,
                    _ => unreachable!(),
                };
                Value::Bool(result)
            },
        };

        Ok(value)
    }

    /// Short-circuit `and`/`or`. The result is the boolean of the truthiness,
    /// and the right side only runs when the left side does not decide.
    fn logical(&mut self, data: &LogicalData) -> EvalResult {
        let left = self.evaluate(&data.left)?.is_truthy();

        let result = match data.operator.r#type {
            Type::Or if left => true,
            Type::And if !left => false,
            _ => self.evaluate(&data.right)?.is_truthy(),
        };

        Ok(Value::Bool(result))
    }

    /// Converts a value to an index: int, truncated float, bool, or a string
    /// holding an integer.
    fn index_number(value: &Value) -> Result<i64, Error> {
        match value {
            Value::Int(n) => Ok(*n),
            Value::Float(n) => Ok(*n as i64),
            Value::Bool(b) => Ok(*b as i64),
            Value::Str(s) => s.trim().parse().map_err(|_| {
                Error::Type(format!("Cannot use string '{s}' as an index"))
            }),
            _ => Err(Error::Type(format!(
                "Cannot use {} type as an index", value.type_str(),
            ))),
        }
    }

    fn index(&mut self, container: Value, index: &Value) -> EvalResult {
        let i = Self::index_number(index)?;

        match container {
            Value::List(items) => {
                let items = items.borrow();
                if i < 0 || i as usize >= items.len() {
                    return Err(Error::Range(format!("Index {i} is out of range")).into());
                }
                Ok(items[i as usize].clone())
            },
            Value::Str(s) => {
                if i < 0 || i as usize >= s.chars().count() {
                    return Err(Error::Range(format!("Index {i} is out of range")).into());
                }
                Ok(Value::from(s.substring(i as usize, i as usize + 1)))
            },
            value => Err(Error::Type(format!(
                "Cannot index {} type", value.type_str(),
            )).into()),
        }
    }

    /// Clamps slice bounds to `0..len`; a start past the end yields empty.
    fn slice_bounds(start: i64, end: i64, len: usize) -> (usize, usize) {
        let start = (start.max(0) as usize).min(len);
        let end = (end.max(0) as usize).min(len).max(start);
        (start, end)
    }

    fn slice(&mut self, data: &SliceData) -> EvalResult {
        let container = self.evaluate(&data.container)?;

        let start = match &data.start {
            Some(expr) => {
                let value = self.evaluate(expr)?;
                Self::index_number(&value)?
            },
            None => 0,
        };
        let end = match &data.end {
            Some(expr) => {
                let value = self.evaluate(expr)?;
                Self::index_number(&value)?
            },
            None => i64::MAX,
        };

        match container {
            Value::List(items) => {
                let items = items.borrow();
                let (start, end) = Self::slice_bounds(start, end, items.len());
                Ok(Value::list(items[start..end].to_vec()))
            },
            Value::Str(s) => {
                let (start, end) = Self::slice_bounds(start, end, s.chars().count());
                Ok(Value::from(s.substring(start, end)))
            },
            value => Err(Error::Type(format!(
                "Cannot slice {} type", value.type_str(),
            )).into()),
        }
    }

    fn call(&mut self, data: &CallData) -> EvalResult {
        let callee = self.evaluate(&data.callee)?;

        let Value::Function(function) = callee else {
            return Err(Error::Call(format!(
                "Cannot call {} type", callee.type_str(),
            )).into());
        };

        if data.arguments.len() != function.arity() {
            return Err(Error::Arg(format!(
                "Expected {} arguments but got {}",
                function.arity(),
                data.arguments.len(),
            )).into());
        }

        let mut arguments = Vec::with_capacity(data.arguments.len());
        for argument in &data.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        // The stack frame is named after the callee variable when there is
        // one; a function called off a list or another call has no name.
        let name = match data.callee.as_ref() {
            Expr::Variable(variable) => variable.name.lexeme.clone(),
            _ => String::from("<anon>"),
        };

        self.call_function(&function, arguments, name)
    }

    fn call_function(&mut self, function: &Function, arguments: Vec<Value>, name: String) -> EvalResult {
        let mut child = self.environment.create_child();
        for (param, argument) in function.params.iter().zip(arguments) {
            child.define(param, argument);
        }

        let caller = std::mem::replace(&mut self.environment, child);
        self.call_stack.push(name);

        let result = self.execute_block(&function.body);

        // The stack and the caller's chain come back on every exit path,
        // unwinding errors included.
        self.call_stack.pop();
        self.environment = caller;

        match result {
            Ok(_) => Ok(Value::Nil),
            Err(Exit::Return(value)) => Ok(value),
            Err(Exit::Break) => Err(Error::Call(String::from("'break' outside a loop")).into()),
            Err(Exit::Continue) => Err(Error::Call(String::from("'continue' outside a loop")).into()),
            Err(exit) => Err(exit),
        }
    }

    /// Evaluates a built-in call: arity check, arguments left to right, then
    /// the operation itself.
    fn builtin(&mut self, data: &BuiltinData) -> EvalResult {
        let builtin = data.builtin;

        if data.arguments.len() != builtin.arity() {
            return Err(Error::Arg(format!(
                "{builtin}() expected {} arguments but got {}",
                builtin.arity(),
                data.arguments.len(),
            )).into());
        }

        let mut args = Vec::with_capacity(data.arguments.len());
        for argument in &data.arguments {
            args.push(self.evaluate(argument)?);
        }

        match builtin {
            Builtin::Print => {
                let _ = write!(self.out, "{}", args[0]);
                Ok(Value::Nil)
            },
            Builtin::Println => {
                let _ = writeln!(self.out, "{}", args[0]);
                Ok(Value::Nil)
            },
            Builtin::Read => self.read_line(),
            Builtin::Stacktrace => {
                let names = self.call_stack.iter()
                    .map(|name| Value::from(name.as_str()))
                    .collect();
                Ok(Value::list(names))
            },
            Builtin::Len => match &args[0] {
                Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
                Value::List(items) => Ok(Value::Int(items.borrow().len() as i64)),
                value => Err(Self::builtin_type_error(builtin, value)),
            },
            Builtin::Max | Builtin::Min => {
                let Value::List(items) = &args[0] else {
                    return Err(Self::builtin_type_error(builtin, &args[0]));
                };

                // Only integer elements take part; anything else is skipped.
                let ints = items.borrow().iter().filter_map(|item| match item {
                    Value::Int(n) => Some(*n),
                    _ => None,
                }).collect::<Vec<i64>>();

                let best = match builtin {
                    Builtin::Max => ints.into_iter().max(),
                    _ => ints.into_iter().min(),
                };

                Ok(best.map_or(Value::Nil, Value::Int))
            },
            Builtin::Abs => match &args[0] {
                Value::Int(n) => Ok(Value::Int(n.wrapping_abs())),
                Value::Float(n) => Ok(Value::Float(n.abs())),
                value => Err(Self::builtin_type_error(builtin, value)),
            },
            Builtin::Ceil => Self::to_int(builtin, &args[0], f64::ceil),
            Builtin::Floor => Self::to_int(builtin, &args[0], f64::floor),
            Builtin::Round => Self::to_int(builtin, &args[0], f64::round),
            Builtin::Sqrt => match &args[0] {
                Value::Int(n) => Ok(Value::Float((*n as f64).sqrt())),
                Value::Float(n) => Ok(Value::Float(n.sqrt())),
                value => Err(Self::builtin_type_error(builtin, value)),
            },
            Builtin::Rnd => match &args[0] {
                Value::Int(n) if *n > 0 => Ok(Value::Int(Self::random_below(*n))),
                Value::Int(_) => {
                    Err(Error::Range(String::from("rnd() expects a positive bound")).into())
                },
                value => Err(Self::builtin_type_error(builtin, value)),
            },
            Builtin::ParseNum => match &args[0] {
                Value::Str(s) => Ok(s.trim().parse().map_or(Value::Nil, Value::Int)),
                value => Err(Self::builtin_type_error(builtin, value)),
            },
            Builtin::ToString => Ok(Value::from(args[0].to_string())),
            Builtin::Lower => match &args[0] {
                Value::Str(s) => Ok(Value::from(s.to_ascii_lowercase())),
                value => Err(Self::builtin_type_error(builtin, value)),
            },
            Builtin::Upper => match &args[0] {
                Value::Str(s) => Ok(Value::from(s.to_ascii_uppercase())),
                value => Err(Self::builtin_type_error(builtin, value)),
            },
            Builtin::Split => match (&args[0], &args[1]) {
                (Value::Str(s), Value::Str(delimiter)) => {
                    if delimiter.is_empty() {
                        return Ok(Value::list(vec![args[0].clone()]));
                    }

                    let parts = s.split(&**delimiter)
                        .map(Value::from)
                        .collect();
                    Ok(Value::list(parts))
                },
                (value, Value::Str(_)) => Err(Self::builtin_type_error(builtin, value)),
                (_, value) => Err(Self::builtin_type_error(builtin, value)),
            },
            Builtin::Join => match (&args[0], &args[1]) {
                (Value::List(items), Value::Str(delimiter)) => {
                    let joined = items.borrow().iter()
                        .map(|item| item.to_string())
                        .collect::<Vec<String>>()
                        .join(&**delimiter);
                    Ok(Value::from(joined))
                },
                (value, Value::Str(_)) => Err(Self::builtin_type_error(builtin, value)),
                (_, value) => Err(Self::builtin_type_error(builtin, value)),
            },
            Builtin::Replace => match (&args[0], &args[1], &args[2]) {
                (Value::Str(s), Value::Str(from), Value::Str(to)) => {
                    if from.is_empty() {
                        return Ok(args[0].clone());
                    }

                    Ok(Value::from(s.replace(&**from, &**to)))
                },
                (value, _, _) if !matches!(value, Value::Str(_)) => {
                    Err(Self::builtin_type_error(builtin, value))
                },
                (_, value, _) if !matches!(value, Value::Str(_)) => {
                    Err(Self::builtin_type_error(builtin, value))
                },
                (_, _, value) => Err(Self::builtin_type_error(builtin, value)),
            },
            Builtin::Push => match &args[0] {
                Value::List(items) => {
                    items.borrow_mut().push(args[1].clone());
                    Ok(Value::Nil)
                },
                value => Err(Self::builtin_type_error(builtin, value)),
            },
            Builtin::Pop => match &args[0] {
                Value::List(items) => match items.borrow_mut().pop() {
                    Some(_) => Ok(Value::Nil),
                    None => Err(Error::Range(String::from("pop() from an empty list")).into()),
                },
                value => Err(Self::builtin_type_error(builtin, value)),
            },
            Builtin::Insert => match &args[0] {
                Value::List(items) => {
                    let i = Self::index_number(&args[1])?;
                    let mut items = items.borrow_mut();
                    if i < 0 || i as usize > items.len() {
                        return Err(Error::Range(format!("Index {i} is out of range")).into());
                    }
                    items.insert(i as usize, args[2].clone());
                    Ok(Value::Nil)
                },
                value => Err(Self::builtin_type_error(builtin, value)),
            },
            Builtin::Remove => match &args[0] {
                Value::List(items) => {
                    let i = Self::index_number(&args[1])?;
                    let mut items = items.borrow_mut();
                    if i < 0 || i as usize >= items.len() {
                        return Err(Error::Range(format!("Index {i} is out of range")).into());
                    }
                    items.remove(i as usize);
                    Ok(Value::Nil)
                },
                value => Err(Self::builtin_type_error(builtin, value)),
            },
            Builtin::Sort => match &args[0] {
                Value::List(items) => {
                    Self::sort_list(&mut items.borrow_mut())?;
                    Ok(Value::Nil)
                },
                value => Err(Self::builtin_type_error(builtin, value)),
            },
        }
    }

    fn builtin_type_error(builtin: Builtin, value: &Value) -> Exit {
        Error::Type(format!(
            "{builtin}() is not supported for {} type", value.type_str(),
        )).into()
    }

    fn to_int(builtin: Builtin, value: &Value, round: fn(f64) -> f64) -> EvalResult {
        match value {
            Value::Int(n) => Ok(Value::Int(*n)),
            Value::Float(n) => Ok(Value::Int(round(*n) as i64)),
            value => Err(Self::builtin_type_error(builtin, value)),
        }
    }

    /// Uniform integer in `[0, bound)`, drawn from a time-seeded hash.
    fn random_below(bound: i64) -> i64 {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;

        let mut hasher = RandomState::new().build_hasher();
        hasher.write_u64(nanos);

        (hasher.finish() % bound as u64) as i64
    }

    /// In-place sort: numeric lists by value, string lists lexicographically.
    fn sort_list(items: &mut Vec<Value>) -> Result<(), Error> {
        if items.iter().all(|item| matches!(item, Value::Int(_) | Value::Float(_))) {
            items.sort_by(|a, b| {
                let number = |value: &Value| match value {
                    Value::Int(n) => *n as f64,
                    Value::Float(n) => *n,
                    _ => unreachable!(),
                };
                number(a).partial_cmp(&number(b)).unwrap_or(Ordering::Equal)
            });
            return Ok(());
        }

        if items.iter().all(|item| matches!(item, Value::Str(_))) {
            items.sort_by(|a, b| {
                match (a, b) {
                    (Value::Str(l), Value::Str(r)) => l.cmp(r),
                    _ => unreachable!(),
                }
            });
            return Ok(());
        }

        Err(Error::Type(String::from(
            "sort() expects a list of numbers or a list of strings",
        )))
    }

    /// One line from standard input, without the trailing newline. The only
    /// blocking operation in the interpreter.
    fn read_line(&mut self) -> EvalResult {
        let mut line = String::new();

        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => Err(Error::Call(String::from("read() reached end of input")).into()),
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Ok(Value::from(line))
            },
            Err(_) => Err(Error::Call(String::from("read() failed to read input")).into()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn eval(source: &str) -> Result<Value, Error> {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);
        interpreter.eval(source)
    }

    fn eval_display(source: &str) -> String {
        eval(source).unwrap().to_string()
    }

    #[test]
    fn evaluate_arithmetic() {
        assert_eq!(eval_display("1 + 2 * 3"), "7");
        assert_eq!(eval_display("(1 + 2) * 3"), "9");
        assert_eq!(eval_display("7 % 3"), "1");
        assert_eq!(eval_display("2 ^ 8"), "256");
        assert_eq!(eval_display("-2 ^ 2"), "4");
    }

    #[test]
    fn evaluate_logical() {
        assert_eq!(eval_display("true and 1"), "true");
        assert_eq!(eval_display("0 or \"\""), "false");
        assert_eq!(eval_display("not nil"), "true");
    }

    #[test]
    fn short_circuit_skips_the_right_side() {
        // The right side would fail with an undefined variable.
        assert_eq!(eval_display("false and missing"), "false");
        assert_eq!(eval_display("1 or missing"), "true");
    }

    #[test]
    fn assignment_yields_the_value() {
        assert_eq!(eval_display("x = 41 x + 1"), "42");
    }

    #[test]
    fn undefined_variable() {
        assert!(matches!(eval("missing"), Err(Error::Name(_))));
    }

    #[test]
    fn break_outside_a_loop() {
        assert!(matches!(eval("break"), Err(Error::Call(_))));
        assert!(matches!(eval("f = function() break end function f()"), Err(Error::Call(_))));
    }

    #[test]
    fn return_outside_a_function() {
        assert!(matches!(eval("return 1"), Err(Error::Call(_))));
    }

    #[test]
    fn scope_survives_a_failed_snippet() {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);

        interpreter.eval("x = 1").unwrap();
        assert!(interpreter.eval("x + missing").is_err());
        assert_eq!(interpreter.eval("x").unwrap().to_string(), "1");
    }

    #[test]
    fn function_values_survive_storage() {
        // The same function value is stored, fetched and called twice.
        assert_eq!(eval_display("
            fns = [function(x) return x * 2 end function]
            fns[0](3) + fns[0](4)
        "), "14");
    }

    #[test]
    fn call_stack_balances_after_an_error() {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);

        interpreter.eval("f = function() missing end function").unwrap();
        assert!(interpreter.eval("f()").is_err());
        assert_eq!(interpreter.eval("stacktrace()").unwrap().to_string(), "[]");
    }

    #[test]
    fn rnd_stays_in_range() {
        for _ in 0..32 {
            let Ok(Value::Int(n)) = eval("rnd(4)") else { panic!("expected an int") };
            assert!((0..4).contains(&n));
        }
    }
}
