use std::collections::HashMap;

use crate::value::Value;

#[derive(Debug, Clone, Default)]
struct Scope {
    variables: HashMap<String, Value>,
}

/// The scope chain: a stack of frames searched tip to root on lookup.
///
/// Assignment always writes the innermost frame, so an assignment in a nested
/// scope shadows instead of updating an outer binding. A function call gets a
/// copy of the caller's chain with one fresh frame on top; the copy shares
/// heap values (lists, function bodies) but new bindings in it never reach
/// the caller.
#[derive(Debug, Clone)]
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            scopes: vec![Scope::default()],
        }
    }

    /// Copies the chain and pushes one fresh innermost frame.
    pub fn create_child(&self) -> Self {
        let mut child = self.clone();
        child.scopes.push(Scope::default());
        child
    }

    /// Binds a name in the innermost frame.
    pub fn define(&mut self, name: &str, value: Value) {
        let scope = self.scopes.last_mut().expect("scope chain to have a frame");
        scope.variables.insert(name.to_string(), value);
    }

    /// Looks a name up, innermost frame first.
    pub fn get(&self, name: &str) -> Option<Value> {
        for scope in self.scopes.iter().rev() {
            if let Some(value) = scope.variables.get(name) {
                return Some(value.clone());
            }
        }

        None
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
