//! Compiled form: each [`crate::ast::Node`] compiles to an opaque
//! [`Evaluable`] closing over its children and the host. Evaluables
//! take a [`Scope`] and return a [`Value`], so the same compiled tree
//! can be run against many scopes without recompiling.

use std::fmt;
use std::rc::Rc;

use crate::error::MathError;
use crate::host::Host;
use crate::scope::Scope;

/// The full value space the evaluator works with: a host's own plain
/// values, plus the two constructs the language adds on top of the
/// host — user-defined callables and multi-value result sets. `Host`
/// never needs to know about either.
pub enum Value<H: Host> {
    Host(H::Value),
    Closure(Rc<Closure<H>>),
    ResultSet(Vec<Value<H>>),
}

impl<H: Host> Clone for Value<H> {
    fn clone(&self) -> Self {
        match self {
            Value::Host(v) => Value::Host(v.clone()),
            Value::Closure(c) => Value::Closure(Rc::clone(c)),
            Value::ResultSet(vs) => Value::ResultSet(vs.clone()),
        }
    }
}

impl<H: Host> fmt::Debug for Value<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Host(v) => write!(f, "Host({:?})", v),
            Value::Closure(c) => write!(f, "Closure({})", c.syntax),
            Value::ResultSet(vs) => write!(f, "ResultSet({:?})", vs),
        }
    }
}

impl<H: Host> Value<H> {
    /// Unwraps a plain host value, for the many places (operator
    /// arguments, conditional tests, range endpoints, ...) that only
    /// make sense applied to the host's own domain.
    pub fn expect_host(self) -> Result<H::Value, MathError> {
        match self {
            Value::Host(v) => Ok(v),
            Value::Closure(c) => Err(MathError::HostError(format!(
                "Unexpected type of argument (got callable {})",
                c.syntax
            ))),
            Value::ResultSet(_) => Err(MathError::HostError(
                "Unexpected type of argument (got a result set)".to_string(),
            )),
        }
    }
}

/// A user-defined callable produced by a `FunctionAssignmentNode`.
/// Captures its defining scope by reference — the same [`Scope`]
/// handle, not a copy — so later mutations of captured names are
/// visible on invocation.
pub struct Closure<H: Host> {
    pub params: Vec<String>,
    pub body: Evaluable<H>,
    pub scope: Scope<Value<H>>,
    /// `name(params…)`, exposed to callers as the closure's syntax.
    pub syntax: String,
}

impl<H: Host> Closure<H> {
    /// Invokes the closure: binds `args` positionally to `params` in a
    /// fresh child scope over the captured defining scope, then
    /// evaluates the body. Undefined symbols inside the body raise
    /// here, at call time, never at definition time.
    pub fn call(&self, host: &H, args: Vec<Value<H>>) -> Result<Value<H>, MathError> {
        if args.len() != self.params.len() {
            return Err(MathError::ArgumentsError {
                expected: self.params.len(),
                actual: args.len(),
            });
        }
        let call_scope = self.scope.child();
        for (param, arg) in self.params.iter().zip(args.into_iter()) {
            call_scope.set(param.clone(), arg);
        }
        self.body.eval(host, &call_scope)
    }
}

/// A compiled, scope-parameterized computation derived from one AST
/// node.
pub struct Evaluable<H: Host> {
    run: Rc<dyn Fn(&H, &Scope<Value<H>>) -> Result<Value<H>, MathError>>,
}

impl<H: Host> Clone for Evaluable<H> {
    fn clone(&self) -> Self {
        Evaluable { run: Rc::clone(&self.run) }
    }
}

impl<H: Host> Evaluable<H> {
    pub fn new(
        f: impl Fn(&H, &Scope<Value<H>>) -> Result<Value<H>, MathError> + 'static,
    ) -> Evaluable<H> {
        Evaluable { run: Rc::new(f) }
    }

    pub fn eval(&self, host: &H, scope: &Scope<Value<H>>) -> Result<Value<H>, MathError> {
        (self.run)(host, scope)
    }
}

/// The result of [`crate::ast::Node::compile`]: a host bound to a
/// compiled evaluable tree, ready to run against any scope.
pub struct Compiled<H: Host + Clone> {
    host: H,
    evaluable: Evaluable<H>,
}

impl<H: Host + Clone> Compiled<H> {
    pub fn new(host: H, evaluable: Evaluable<H>) -> Compiled<H> {
        Compiled { host, evaluable }
    }

    /// Evaluates the compiled tree against `scope`, or a fresh empty
    /// scope if none is given.
    pub fn eval(&self, scope: Option<Scope<Value<H>>>) -> Result<Value<H>, MathError> {
        let scope = scope.unwrap_or_else(Scope::empty);
        scope.assert_no_reserved_names()?;
        self.evaluable.eval(&self.host, &scope)
    }
}
