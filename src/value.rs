use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::rc::Rc;

use crate::error::Error;
use crate::function::Function;
use crate::literal::Literal;

/// A list value. Lists are shared by reference: every clone of the value is
/// an alias of the same storage.
pub type List = Rc<RefCell<Vec<Value>>>;

/// Represents a runtime value in the language.
///
/// Strings are immutable and compared by content; lists are mutable and
/// compared by identity. Cloning a value never copies heap storage.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Nil,
    Str(Rc<str>),
    List(List),
    Function(Rc<Function>),
}

/// A numeric operand pair after int/float promotion.
enum Numbers {
    Ints(i64, i64),
    Floats(f64, f64),
}

fn type_error(op: &str, left: &Value, right: &Value) -> Error {
    Error::Type(format!(
        "Binary operation '{op}' is not supported between {} type and {} type",
        left.type_str(),
        right.type_str(),
    ))
}

impl Value {
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn type_str(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Nil => "nil",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Function(_) => "function",
        }
    }

    /// Boolean interpretation of the value. `false`, `nil`, both numeric
    /// zeros and the empty string are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Nil => false,
            Value::Int(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    fn numbers(left: &Value, right: &Value) -> Option<Numbers> {
        match (left, right) {
            (Value::Int(l), Value::Int(r)) => Some(Numbers::Ints(*l, *r)),
            (Value::Int(l), Value::Float(r)) => Some(Numbers::Floats(*l as f64, *r)),
            (Value::Float(l), Value::Int(r)) => Some(Numbers::Floats(*l, *r as f64)),
            (Value::Float(l), Value::Float(r)) => Some(Numbers::Floats(*l, *r)),
            _ => None,
        }
    }

    pub fn add(&self, other: &Value) -> Result<Value, Error> {
        if let Some(numbers) = Self::numbers(self, other) {
            return Ok(match numbers {
                Numbers::Ints(l, r) => Value::Int(l.wrapping_add(r)),
                Numbers::Floats(l, r) => Value::Float(l + r),
            });
        }

        match (self, other) {
            (Value::Str(l), Value::Str(r)) => Ok(Value::from(format!("{l}{r}"))),
            (Value::List(l), Value::List(r)) => {
                let mut items = l.borrow().clone();
                items.extend(r.borrow().iter().cloned());
                Ok(Value::list(items))
            },
            _ => Err(type_error("+", self, other)),
        }
    }

    pub fn sub(&self, other: &Value) -> Result<Value, Error> {
        if let Some(numbers) = Self::numbers(self, other) {
            return Ok(match numbers {
                Numbers::Ints(l, r) => Value::Int(l.wrapping_sub(r)),
                Numbers::Floats(l, r) => Value::Float(l - r),
            });
        }

        match (self, other) {
            // Removes the suffix if it is one, otherwise leaves the string.
            (Value::Str(l), Value::Str(r)) => match l.strip_suffix(&**r) {
                Some(rest) => Ok(Value::from(rest)),
                None => Ok(Value::Str(Rc::clone(l))),
            },
            _ => Err(type_error("-", self, other)),
        }
    }

    pub fn mul(&self, other: &Value) -> Result<Value, Error> {
        if let Some(numbers) = Self::numbers(self, other) {
            return Ok(match numbers {
                Numbers::Ints(l, r) => Value::Int(l.wrapping_mul(r)),
                Numbers::Floats(l, r) => Value::Float(l * r),
            });
        }

        match (self, other) {
            (Value::Str(s), Value::Int(n)) | (Value::Int(n), Value::Str(s)) => {
                Ok(Value::from(s.repeat(Self::repetitions(*n)?)))
            },
            (Value::List(l), Value::Int(n)) | (Value::Int(n), Value::List(l)) => {
                let count = Self::repetitions(*n)?;
                let items = l.borrow();
                let mut repeated = Vec::with_capacity(items.len() * count);
                for _ in 0..count {
                    repeated.extend(items.iter().cloned());
                }
                Ok(Value::list(repeated))
            },
            _ => Err(type_error("*", self, other)),
        }
    }

    fn repetitions(n: i64) -> Result<usize, Error> {
        if n < 0 {
            return Err(Error::Arith(String::from("Negative repetition count")));
        }

        Ok(n as usize)
    }

    pub fn div(&self, other: &Value) -> Result<Value, Error> {
        match Self::numbers(self, other) {
            Some(Numbers::Ints(l, r)) => {
                if r == 0 {
                    return Err(Error::Arith(String::from("Division by zero")));
                }
                Ok(Value::Int(l.wrapping_div(r)))
            },
            Some(Numbers::Floats(l, r)) => {
                if r == 0.0 {
                    return Err(Error::Arith(String::from("Division by zero")));
                }
                Ok(Value::Float(l / r))
            },
            None => Err(type_error("/", self, other)),
        }
    }

    pub fn rem(&self, other: &Value) -> Result<Value, Error> {
        match (self, other) {
            (Value::Int(l), Value::Int(r)) => {
                if *r == 0 {
                    return Err(Error::Arith(String::from("Modulo by zero")));
                }
                Ok(Value::Int(l.wrapping_rem(*r)))
            },
            _ => Err(type_error("%", self, other)),
        }
    }

    pub fn pow(&self, other: &Value) -> Result<Value, Error> {
        // An integer base and a non-negative integer exponent stay integer.
        if let (Value::Int(base), Value::Int(exp)) = (self, other) {
            if (0..=u32::MAX as i64).contains(exp) {
                return Ok(Value::Int(base.wrapping_pow(*exp as u32)));
            }
        }

        match Self::numbers(self, other) {
            Some(Numbers::Ints(l, r)) => Ok(Value::Float((l as f64).powf(r as f64))),
            Some(Numbers::Floats(l, r)) => Ok(Value::Float(l.powf(r))),
            None => Err(type_error("^", self, other)),
        }
    }

    pub fn neg(&self) -> Result<Value, Error> {
        match self {
            Value::Int(n) => Ok(Value::Int(n.wrapping_neg())),
            Value::Float(n) => Ok(Value::Float(-n)),
            _ => Err(Error::Type(format!(
                "Unary '-' is not supported for {} type",
                self.type_str(),
            ))),
        }
    }

    /// Equality of two values. Defined for same-kind scalars and promoted
    /// numeric pairs; nil equals only nil and is unequal to everything else
    /// without an error; lists compare by identity; functions do not compare.
    pub fn equals(&self, other: &Value) -> Result<bool, Error> {
        match (self, other) {
            (Value::Nil, Value::Nil) => Ok(true),
            (Value::Nil, _) | (_, Value::Nil) => Ok(false),
            (Value::Function(_), _) | (_, Value::Function(_)) => {
                Err(Error::Type(String::from("Functions are not comparable")))
            },
            (Value::Bool(l), Value::Bool(r)) => Ok(l == r),
            (Value::Str(l), Value::Str(r)) => Ok(l == r),
            (Value::List(l), Value::List(r)) => Ok(Rc::ptr_eq(l, r)),
            _ => match Self::numbers(self, other) {
                Some(Numbers::Ints(l, r)) => Ok(l == r),
                Some(Numbers::Floats(l, r)) => Ok(l == r),
                None => Err(type_error("==", self, other)),
            },
        }
    }

    /// Ordering of two values, for `<`, `>`, `<=` and `>=`. Defined for
    /// promoted numeric pairs and for two strings (lexicographic).
    pub fn compare(&self, other: &Value, op: &str) -> Result<Ordering, Error> {
        if let Some(numbers) = Self::numbers(self, other) {
            return match numbers {
                Numbers::Ints(l, r) => Ok(l.cmp(&r)),
                Numbers::Floats(l, r) => l.partial_cmp(&r)
                    .ok_or_else(|| Error::Arith(String::from("Cannot order NaN"))),
            };
        }

        match (self, other) {
            (Value::Str(l), Value::Str(r)) => Ok(l.cmp(r)),
            _ => Err(type_error(op, self, other)),
        }
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Int(n) => Value::Int(n),
            Literal::Float(n) => Value::Float(n),
            Literal::String(s) => Value::from(s),
            Literal::Bool(b) => Value::Bool(b),
            Literal::Nil => Value::Nil,
        }
    }
}

impl From<String> for Value {
    fn from(string: String) -> Self {
        Value::Str(Rc::from(string))
    }
}

impl From<&str> for Value {
    fn from(string: &str) -> Self {
        Value::Str(Rc::from(string))
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Value::Int(number)
    }
}

impl From<bool> for Value {
    fn from(boolean: bool) -> Self {
        Value::Bool(boolean)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Nil => write!(f, "nil"),
            Value::Str(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            },
            Value::Function(function) => write!(f, "{function}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn int_arithmetic() {
        assert!(matches!(Value::Int(2).add(&Value::Int(3)), Ok(Value::Int(5))));
        assert!(matches!(Value::Int(7).div(&Value::Int(2)), Ok(Value::Int(3))));
        assert!(matches!(Value::Int(7).rem(&Value::Int(2)), Ok(Value::Int(1))));
        assert!(matches!(Value::Int(2).pow(&Value::Int(10)), Ok(Value::Int(1024))));
    }

    #[test]
    fn mixed_arithmetic_promotes() {
        let Ok(Value::Float(x)) = Value::Int(1).add(&Value::Float(0.5)) else {
            panic!("expected a float");
        };
        assert_eq!(x, 1.5);

        let Ok(Value::Float(x)) = Value::Float(7.0).div(&Value::Int(2)) else {
            panic!("expected a float");
        };
        assert_eq!(x, 3.5);
    }

    #[test]
    fn division_by_zero() {
        assert!(Value::Int(1).div(&Value::Int(0)).is_err());
        assert!(Value::Float(1.0).div(&Value::Float(0.0)).is_err());
        assert!(Value::Int(1).rem(&Value::Int(0)).is_err());
    }

    #[test]
    fn negative_exponent_goes_float() {
        let Ok(Value::Float(x)) = Value::Int(2).pow(&Value::Int(-1)) else {
            panic!("expected a float");
        };
        assert_eq!(x, 0.5);
    }

    #[test]
    fn string_operators() {
        let hello = Value::from("hello ");
        let world = Value::from("world");

        let Ok(Value::Str(s)) = hello.add(&world) else { panic!("expected a string") };
        assert_eq!(&*s, "hello world");

        let Ok(Value::Str(s)) = Value::from("foobar").sub(&Value::from("bar")) else {
            panic!("expected a string");
        };
        assert_eq!(&*s, "foo");

        // Not a suffix: unchanged.
        let Ok(Value::Str(s)) = Value::from("foobar").sub(&Value::from("foo")) else {
            panic!("expected a string");
        };
        assert_eq!(&*s, "foobar");

        let Ok(Value::Str(s)) = Value::from("ab").mul(&Value::Int(3)) else {
            panic!("expected a string");
        };
        assert_eq!(&*s, "ababab");

        assert!(Value::from("ab").mul(&Value::Int(-1)).is_err());
    }

    #[test]
    fn list_operators() {
        let a = Value::list(vec![Value::Int(1)]);
        let b = Value::list(vec![Value::Int(2)]);

        let Ok(Value::List(joined)) = a.add(&b) else { panic!("expected a list") };
        assert_eq!(joined.borrow().len(), 2);

        let Ok(Value::List(repeated)) = a.mul(&Value::Int(3)) else { panic!("expected a list") };
        assert_eq!(repeated.borrow().len(), 3);
    }

    #[test]
    fn equality() {
        assert_eq!(Value::Nil.equals(&Value::Nil), Ok(true));
        assert_eq!(Value::Nil.equals(&Value::Int(0)), Ok(false));
        assert_eq!(Value::Int(1).equals(&Value::Float(1.0)), Ok(true));
        assert_eq!(Value::from("a").equals(&Value::from("a")), Ok(true));
        assert!(Value::Int(1).equals(&Value::from("1")).is_err());

        let a = Value::list(vec![Value::Int(1)]);
        let b = a.clone();
        let c = Value::list(vec![Value::Int(1)]);
        assert_eq!(a.equals(&b), Ok(true));
        assert_eq!(a.equals(&c), Ok(false));
    }

    #[test]
    fn ordering() {
        assert_eq!(Value::Int(1).compare(&Value::Float(1.5), "<"), Ok(Ordering::Less));
        assert_eq!(Value::from("a").compare(&Value::from("b"), "<"), Ok(Ordering::Less));
        assert!(Value::Int(1).compare(&Value::from("a"), "<").is_err());
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(!Value::from("").is_truthy());

        assert!(Value::Int(-1).is_truthy());
        assert!(Value::from("x").is_truthy());
        assert!(Value::list(vec![]).is_truthy());
    }

    #[test]
    fn display() {
        assert_eq!(Value::Int(7).to_string(), "7");
        assert_eq!(Value::Float(3.0).to_string(), "3");
        assert_eq!(Value::Float(12.25).to_string(), "12.25");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::from("hi").to_string(), "hi");

        let list = Value::list(vec![Value::Int(1), Value::from("two"), Value::Float(3.5)]);
        assert_eq!(list.to_string(), "[1, two, 3.5]");
    }
}
