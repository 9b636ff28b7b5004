//! Scope semantics: an externally owned, mutable identifier → value
//! mapping, shared between the caller and the evaluator, and shared
//! (not copied) by function closures that capture it.
//!
//! A function assignment's closure holds a handle to the same scope
//! that may later contain the function itself; the resulting cycle is
//! benign because the scope outlives the function value, so plain
//! shared ownership (`Rc`) is enough without weak back-references.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::MathError;

/// Names that may never appear as a key in a caller-provided scope.
pub const RESERVED_NAMES: &[&str] = &["end"];

struct Frame<V> {
    vars: HashMap<String, V>,
    parent: Option<Scope<V>>,
}

/// A mutable identifier → value mapping. Cloning a `Scope` is cheap
/// (it clones an `Rc`) and yields a handle to the *same* underlying
/// mapping — this is what lets a `FunctionAssignmentNode`'s callable
/// capture its defining scope by reference.
pub struct Scope<V> {
    inner: Rc<RefCell<Frame<V>>>,
}

impl<V> Clone for Scope<V> {
    fn clone(&self) -> Self {
        Scope { inner: Rc::clone(&self.inner) }
    }
}

impl<V: Clone> Scope<V> {
    /// Wraps a plain mapping as a root scope with no parent. This is
    /// the scope shape the public API hands to [`crate::compile::Compiled::eval`].
    pub fn new(vars: HashMap<String, V>) -> Scope<V> {
        Scope {
            inner: Rc::new(RefCell::new(Frame { vars, parent: None })),
        }
    }

    /// An empty root scope, the default for `Compiled::eval(None)`.
    pub fn empty() -> Scope<V> {
        Scope::new(HashMap::new())
    }

    /// Creates a transient child scope overlaid on `self`: a function
    /// call binds its parameters (shadowing same-named outer bindings)
    /// in a fresh child scope over the defining scope.
    pub fn child(&self) -> Scope<V> {
        Scope {
            inner: Rc::new(RefCell::new(Frame {
                vars: HashMap::new(),
                parent: Some(self.clone()),
            })),
        }
    }

    /// Looks up `name`, walking outward through parent scopes. Mirrors
    /// prototypal lookup: a name defined in a child shadows the same
    /// name in a parent.
    pub fn get(&self, name: &str) -> Option<V> {
        let frame = self.inner.borrow();
        if let Some(value) = frame.vars.get(name) {
            return Some(value.clone());
        }
        match &frame.parent {
            Some(parent) => parent.get(name),
            None => {
                log::debug!("scope lookup failed: {} is undefined", name);
                None
            }
        }
    }

    /// Writes `name` into *this* scope level, never a parent. An
    /// `AssignmentNode` always writes to the scope it was compiled
    /// against: it evaluates its RHS, writes the result to scope, and
    /// returns the value.
    pub fn set(&self, name: impl Into<String>, value: V) {
        self.inner.borrow_mut().vars.insert(name.into(), value);
    }

    /// Supplying a reserved name in the scope handed to `eval` is an
    /// error. Checked once, against only this scope's own level —
    /// internal child scopes created for function calls are never
    /// user-supplied and are not re-checked.
    pub fn assert_no_reserved_names(&self) -> Result<(), MathError> {
        let frame = self.inner.borrow();
        if let Some(reserved) = RESERVED_NAMES.iter().find(|n| frame.vars.contains_key(**n)) {
            log::debug!("scope contains reserved name {:?}", reserved);
            return Err(MathError::IllegalScope);
        }
        Ok(())
    }

    /// Drains this scope's own level into a plain map, for embedders
    /// that want to inspect final bindings after an `eval` call (e.g.
    /// after `a=3; b=4`, a snapshot should read `a=3, b=4`).
    pub fn snapshot(&self) -> HashMap<String, V> {
        self.inner.borrow().vars.clone()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn child_shadows_parent() {
        let root = Scope::new(HashMap::from([("x".to_string(), 1)]));
        let child = root.child();
        child.set("x", 2);
        assert_eq!(child.get("x"), Some(2));
        assert_eq!(root.get("x"), Some(1));
    }

    #[test]
    fn child_sees_parent_mutations_made_after_capture() {
        // Lexical capture: a=3; f(x)=a*x; f(2)=6; a=5; f(2)=10
        let root = Scope::new(HashMap::from([("a".to_string(), 3)]));
        let captured = root.clone();
        root.set("a", 5);
        assert_eq!(captured.get("a"), Some(5));
    }

    #[test]
    fn reserved_name_is_rejected() {
        let scope = Scope::new(HashMap::from([("end".to_string(), 1)]));
        assert!(scope.assert_no_reserved_names().is_err());
    }

    #[test]
    fn ordinary_name_is_accepted() {
        let scope: Scope<i32> = Scope::new(HashMap::from([("x".to_string(), 1)]));
        assert!(scope.assert_no_reserved_names().is_ok());
    }
}
