use std::fmt::{self, Display};
use std::rc::Rc;

use crate::stmt::Stmt;

/// A function value: formal parameters and a body shared with the program
/// AST it was parsed from.
///
/// Functions do not capture their defining environment. A call runs against a
/// child of the *caller's* scope chain, which keeps function values free of
/// ownership cycles with the scopes that hold them.
#[derive(Debug, Clone)]
pub struct Function {
    pub params: Vec<String>,
    pub body: Rc<Vec<Stmt>>,
}

impl Function {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function>")
    }
}
