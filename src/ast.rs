//! The syntax tree.
//!
//! [`Node`] is a closed `enum` with one variant per node kind, rather
//! than an open class hierarchy — every variant implements the same
//! three operations: compiling to an [`Evaluable`], stringifying back
//! to source, and structural traversal via [`Node::find`]. Named
//! operators dispatch through a host-provided registry rather than
//! being hardcoded per arithmetic symbol.

use std::fmt;

use crate::compile::{Closure, Compiled, Evaluable, Value};
use crate::error::MathError;
use crate::host::{DimIndex, Host};
use crate::scope::Scope;

/// A literal value baked directly into the tree. The numeric text is
/// kept verbatim rather than
/// pre-parsed, so stringification reproduces the source exactly and
/// parsing stays independent of the host's number representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Number(String),
    Str(String),
    Boolean(bool),
    Undefined,
}

/// One dimension of an `IndexNode`/`UpdateNode` subscript, prior to
/// evaluation. Mirrors [`crate::host::DimIndex`] but holds
/// sub-expressions (which may reference `end`) rather than
/// already-evaluated values.
#[derive(Debug)]
pub enum IndexDimNode<H: Host> {
    Single(Node<H>),
    Range {
        start: Node<H>,
        end: Node<H>,
        step: Option<Node<H>>,
    },
    All,
}

/// One entry in a `BlockNode`: `visible` is `false` when the entry was
/// terminated by `;`, meaning
/// it still executes (for side effects, e.g. an assignment) but its
/// value is excluded from the block's result.
#[derive(Debug)]
pub struct BlockEntry<H: Host> {
    pub node: Node<H>,
    pub visible: bool,
}

/// An extensibility point for node kinds beyond the core closed list.
/// A custom node is responsible for its own compilation, traversal,
/// and stringification — the core tree only needs to hold it behind
/// this trait object.
pub trait CustomNode<H: Host>: fmt::Debug {
    fn compile(&self, host: &H) -> Result<Evaluable<H>, MathError>;
    fn stringify(&self) -> String;
    fn children(&self) -> Vec<&Node<H>>;
}

/// Constructs a custom node from its already-parsed argument list.
pub type CustomNodeFactory<H> =
    std::rc::Rc<dyn Fn(Vec<Node<H>>) -> Result<Box<dyn CustomNode<H>>, MathError>>;

/// The syntax tree node. One variant per core node kind, plus
/// [`Node::Custom`] for the extensibility slot.
#[derive(Debug)]
pub enum Node<H: Host> {
    Constant(Constant),
    Symbol(String),
    /// `op` is the operator text as it should stringify (`"+"`, `"to"`,
    /// `"in"`, ...); `func` is the host function name it dispatches
    /// to — both `to` and `in` share `func == "to"`.
    Operator {
        op: String,
        func: String,
        args: Vec<Node<H>>,
    },
    Conditional {
        condition: Box<Node<H>>,
        when_true: Box<Node<H>>,
        when_false: Box<Node<H>>,
    },
    Range {
        start: Box<Node<H>>,
        end: Box<Node<H>>,
        step: Option<Box<Node<H>>>,
    },
    /// Row-major matrix literal; a bare vector is a single row.
    Array(Vec<Vec<Node<H>>>),
    Index {
        object: Box<Node<H>>,
        dimensions: Vec<IndexDimNode<H>>,
    },
    Assignment {
        name: String,
        value: Box<Node<H>>,
    },
    /// `name[dimensions] = value`.
    Update {
        name: String,
        dimensions: Vec<IndexDimNode<H>>,
        value: Box<Node<H>>,
    },
    FunctionCall {
        callee: Box<Node<H>>,
        args: Vec<Node<H>>,
    },
    FunctionAssignment {
        name: String,
        params: Vec<String>,
        body: Box<Node<H>>,
        /// `name(params…)`, reproduced verbatim as the resulting
        /// closure's `syntax` attribute.
        syntax: String,
    },
    Block(Vec<BlockEntry<H>>),
    /// An explicitly parenthesized expression. Evaluates exactly like
    /// its child; exists so stringification reproduces the source
    /// parentheses.
    Parenthesis(Box<Node<H>>),
    Custom(Box<dyn CustomNode<H>>),
}

impl<H: Host> Node<H> {
    /// Compiles this node and every descendant into a reusable
    /// [`Compiled`] computation.
    pub fn compile(&self, host: &H) -> Result<Compiled<H>, MathError>
    where
        H: Clone,
    {
        let evaluable = self.to_evaluable(host)?;
        Ok(Compiled::new(host.clone(), evaluable))
    }

    /// If this node is a bare symbol reference, its name — used by
    /// `FunctionCall` to decide between a host operator and a
    /// scope-bound closure.
    fn as_symbol_name(&self) -> Option<&str> {
        match self {
            Node::Symbol(name) => Some(name),
            _ => None,
        }
    }

    fn to_evaluable(&self, host: &H) -> Result<Evaluable<H>, MathError> {
        match self {
            Node::Constant(c) => Self::compile_constant(c, host),
            Node::Symbol(name) => {
                let name = name.clone();
                Ok(Evaluable::new(move |_host, scope| {
                    scope
                        .get(&name)
                        .ok_or_else(|| MathError::UndefinedSymbol(name.clone()))
                }))
            }
            Node::Operator { func, args, .. } => Self::compile_operator(func, args, host),
            Node::Conditional { condition, when_true, when_false } => {
                let condition = condition.to_evaluable(host)?;
                let when_true = when_true.to_evaluable(host)?;
                let when_false = when_false.to_evaluable(host)?;
                Ok(Evaluable::new(move |host, scope| {
                    let test = condition.eval(host, scope)?.expect_host()?;
                    if host.truthy(&test) {
                        when_true.eval(host, scope)
                    } else {
                        when_false.eval(host, scope)
                    }
                }))
            }
            Node::Range { start, end, step } => {
                let start = start.to_evaluable(host)?;
                let end = end.to_evaluable(host)?;
                let step = step.as_ref().map(|s| s.to_evaluable(host)).transpose()?;
                Ok(Evaluable::new(move |host, scope| {
                    let start = start.eval(host, scope)?.expect_host()?;
                    let end = end.eval(host, scope)?.expect_host()?;
                    let step = match &step {
                        Some(s) => s.eval(host, scope)?.expect_host()?,
                        None => host.constant_number("1")?,
                    };
                    Ok(Value::Host(host.range(start, end, step)?))
                }))
            }
            Node::Array(rows) => {
                let rows: Vec<Vec<Evaluable<H>>> = rows
                    .iter()
                    .map(|row| row.iter().map(|cell| cell.to_evaluable(host)).collect())
                    .collect::<Result<_, _>>()?;
                Ok(Evaluable::new(move |host, scope| {
                    let mut values = Vec::with_capacity(rows.len());
                    for row in &rows {
                        let mut out_row = Vec::with_capacity(row.len());
                        for cell in row {
                            out_row.push(cell.eval(host, scope)?.expect_host()?);
                        }
                        values.push(out_row);
                    }
                    Ok(Value::Host(host.matrix(values)?))
                }))
            }
            Node::Index { object, dimensions } => {
                let object = object.to_evaluable(host)?;
                let dimensions = compile_dimensions(dimensions, host)?;
                Ok(Evaluable::new(move |host, scope| {
                    let object = object.eval(host, scope)?.expect_host()?;
                    let dims = eval_dimensions(&dimensions, &object, host, scope)?;
                    let result = host.subset_get(&object, &dims).map_err(|e| {
                        let e = e.reindex_from_zero_based();
                        log::warn!("indexing failed: {}", e);
                        e
                    })?;
                    Ok(Value::Host(result))
                }))
            }
            Node::Assignment { name, value } => {
                let name = name.clone();
                let value = value.to_evaluable(host)?;
                Ok(Evaluable::new(move |host, scope| {
                    let value = value.eval(host, scope)?;
                    scope.set(name.clone(), value.clone());
                    Ok(value)
                }))
            }
            Node::Update { name, dimensions, value } => {
                let name = name.clone();
                let dimensions = compile_dimensions(dimensions, host)?;
                let value = value.to_evaluable(host)?;
                Ok(Evaluable::new(move |host, scope| {
                    let container = scope
                        .get(&name)
                        .ok_or_else(|| MathError::UndefinedSymbol(name.clone()))?
                        .expect_host()?;
                    let dims = eval_dimensions(&dimensions, &container, host, scope)?;
                    let replacement = value.eval(host, scope)?.expect_host()?;
                    let updated = host
                        .subset_set(&container, &dims, replacement.clone())
                        .map_err(MathError::reindex_from_zero_based)?;
                    scope.set(name.clone(), Value::Host(updated));
                    Ok(Value::Host(replacement))
                }))
            }
            Node::FunctionCall { callee, args } => Self::compile_call(callee, args, host),
            Node::FunctionAssignment { name, params, body, syntax } => {
                let name = name.clone();
                let params = params.clone();
                let syntax = syntax.clone();
                let body = body.to_evaluable(host)?;
                Ok(Evaluable::new(move |_host, scope| {
                    let closure = Closure {
                        params: params.clone(),
                        body: body.clone(),
                        scope: scope.clone(),
                        syntax: syntax.clone(),
                    };
                    let value = Value::Closure(std::rc::Rc::new(closure));
                    scope.set(name.clone(), value.clone());
                    Ok(value)
                }))
            }
            Node::Block(entries) => {
                let entries: Vec<(Evaluable<H>, bool)> = entries
                    .iter()
                    .map(|e| Ok::<_, MathError>((e.node.to_evaluable(host)?, e.visible)))
                    .collect::<Result<_, _>>()?;
                Ok(Evaluable::new(move |host, scope| {
                    let mut visible = Vec::new();
                    for (evaluable, is_visible) in &entries {
                        let value = evaluable.eval(host, scope)?;
                        if *is_visible {
                            visible.push(value);
                        }
                    }
                    // A `Block` always yields a `ResultSet`, even with
                    // exactly one visible entry (e.g. `f(x)=x^2; f(3)`
                    // -> `ResultSet([9])`). The parser only emits a
                    // `Block` once it has actually seen a statement
                    // separator; a single bare expression with none is
                    // returned unwrapped and never reaches this arm
                    // (see `Parser::parse_program`).
                    Ok(Value::ResultSet(visible))
                }))
            }
            Node::Parenthesis(inner) => inner.to_evaluable(host),
            Node::Custom(custom) => custom.compile(host),
        }
    }

    fn compile_constant(c: &Constant, host: &H) -> Result<Evaluable<H>, MathError> {
        match c {
            Constant::Number(text) => {
                let value = host.constant_number(text)?;
                Ok(Evaluable::new(move |_h, _s| Ok(Value::Host(value.clone()))))
            }
            Constant::Str(text) => {
                let value = host.constant_string(text);
                Ok(Evaluable::new(move |_h, _s| Ok(Value::Host(value.clone()))))
            }
            Constant::Boolean(b) => {
                let value = host.constant_boolean(*b);
                Ok(Evaluable::new(move |_h, _s| Ok(Value::Host(value.clone()))))
            }
            Constant::Undefined => {
                let value = host.undefined();
                Ok(Evaluable::new(move |_h, _s| Ok(Value::Host(value.clone()))))
            }
        }
    }

    fn compile_operator(
        func: &str,
        args: &[Node<H>],
        host: &H,
    ) -> Result<Evaluable<H>, MathError> {
        let func = func.to_string();
        let args: Vec<Evaluable<H>> =
            args.iter().map(|a| a.to_evaluable(host)).collect::<Result<_, _>>()?;
        Ok(Evaluable::new(move |host, scope| {
            let mut values = Vec::with_capacity(args.len());
            for arg in &args {
                values.push(arg.eval(host, scope)?.expect_host()?);
            }
            Ok(Value::Host(host.call(&func, values)?))
        }))
    }

    /// A scope-bound closure of the same name takes priority over a
    /// host operator of that name, so that assigning over a built-in
    /// (e.g. redefining `sin`) shadows it.
    fn compile_call(
        callee: &Node<H>,
        args: &[Node<H>],
        host: &H,
    ) -> Result<Evaluable<H>, MathError> {
        let args: Vec<Evaluable<H>> =
            args.iter().map(|a| a.to_evaluable(host)).collect::<Result<_, _>>()?;
        if let Some(name) = callee.as_symbol_name() {
            let name = name.to_string();
            return Ok(Evaluable::new(move |host, scope| {
                let mut values = Vec::with_capacity(args.len());
                for arg in &args {
                    values.push(arg.eval(host, scope)?);
                }
                match scope.get(&name) {
                    Some(Value::Closure(closure)) => closure.call(host, values),
                    Some(_) => Err(MathError::HostError(format!("{} is not callable", name))),
                    None if host.is_operator(&name) => {
                        let mut hosted = Vec::with_capacity(values.len());
                        for v in values {
                            hosted.push(v.expect_host()?);
                        }
                        Ok(Value::Host(host.call(&name, hosted)?))
                    }
                    None => Err(MathError::UndefinedSymbol(name.clone())),
                }
            }));
        }

        let callee = callee.to_evaluable(host)?;
        Ok(Evaluable::new(move |host, scope| {
            let target = callee.eval(host, scope)?;
            let mut values = Vec::with_capacity(args.len());
            for arg in &args {
                values.push(arg.eval(host, scope)?);
            }
            match target {
                Value::Closure(closure) => closure.call(host, values),
                _ => Err(MathError::HostError("Value is not callable".to_string())),
            }
        }))
    }

    /// All direct children, for [`Node::find`]'s traversal. Leaves
    /// return an empty vector.
    fn children(&self) -> Vec<&Node<H>> {
        match self {
            Node::Constant(_) | Node::Symbol(_) => vec![],
            Node::Operator { args, .. } => args.iter().collect(),
            Node::Conditional { condition, when_true, when_false } => {
                vec![condition, when_true, when_false]
            }
            Node::Range { start, end, step } => {
                let mut out = vec![start.as_ref(), end.as_ref()];
                if let Some(step) = step {
                    out.push(step);
                }
                out
            }
            Node::Array(rows) => rows.iter().flatten().collect(),
            Node::Index { object, dimensions } => {
                let mut out = vec![object.as_ref()];
                out.extend(dimensions.iter().flat_map(dimension_children));
                out
            }
            Node::Assignment { value, .. } => vec![value],
            Node::Update { dimensions, value, .. } => {
                let mut out: Vec<&Node<H>> = dimensions.iter().flat_map(dimension_children).collect();
                out.push(value);
                out
            }
            Node::FunctionCall { callee, args } => {
                let mut out = vec![callee.as_ref()];
                out.extend(args.iter());
                out
            }
            Node::FunctionAssignment { body, .. } => vec![body],
            Node::Block(entries) => entries.iter().map(|e| &e.node).collect(),
            Node::Parenthesis(inner) => vec![inner],
            Node::Custom(custom) => custom.children(),
        }
    }

    /// Depth-first structural search with a predicate, including
    /// `self`.
    pub fn find<'a>(&'a self, predicate: &dyn Fn(&Node<H>) -> bool) -> Vec<&'a Node<H>> {
        let mut out = Vec::new();
        if predicate(self) {
            out.push(self);
        }
        for child in self.children() {
            out.extend(child.find(predicate));
        }
        out
    }

    /// Binding power used to decide when a child needs parentheses to
    /// round-trip through `to_string`. Higher binds tighter.
    fn precedence(&self) -> u8 {
        match self {
            Node::Block(_) => 0,
            Node::Assignment { .. } | Node::FunctionAssignment { .. } | Node::Update { .. } => 1,
            Node::Conditional { .. } => 2,
            Node::Range { .. } => 3,
            Node::Operator { func, args, .. } => match (func.as_str(), args.len()) {
                ("to", 2) => 4,
                ("equal" | "unequal" | "smaller" | "larger" | "smallerEq" | "largerEq", 2) => 5,
                ("add" | "subtract", 2) => 6,
                ("multiply" | "divide" | "dotMultiply" | "dotDivide" | "mod", 2) => 7,
                ("unaryMinus" | "unaryPlus" | "not", 1) => 8,
                ("pow" | "dotPow", 2) => 9,
                ("factorial" | "transpose", 1) => 10,
                _ => 11,
            },
            Node::Index { .. } | Node::FunctionCall { .. } | Node::Array(_) => 11,
            Node::Constant(_) | Node::Symbol(_) | Node::Parenthesis(_) | Node::Custom(_) => 12,
        }
    }

    fn stringify_child(&self, parent_prec: u8, is_right: bool, right_assoc: bool) -> String {
        let own = self.precedence();
        let needs_parens = if right_assoc {
            if is_right { own < parent_prec } else { own <= parent_prec }
        } else {
            if is_right { own <= parent_prec } else { own < parent_prec }
        };
        if needs_parens {
            format!("({})", self.to_string())
        } else {
            self.to_string()
        }
    }

    /// Canonical source reconstruction.
    #[allow(clippy::inherent_to_string)]
    pub fn to_string(&self) -> String {
        match self {
            Node::Constant(Constant::Number(text)) => text.clone(),
            Node::Constant(Constant::Str(text)) => format!("\"{}\"", text),
            Node::Constant(Constant::Boolean(b)) => b.to_string(),
            Node::Constant(Constant::Undefined) => "undefined".to_string(),
            Node::Symbol(name) => name.clone(),
            Node::Operator { op, args, .. } if args.len() == 2 => {
                let prec = self.precedence();
                let right_assoc = op == "^" || op == ".^";
                format!(
                    "{} {} {}",
                    args[0].stringify_child(prec, false, right_assoc),
                    op,
                    args[1].stringify_child(prec, true, right_assoc)
                )
            }
            Node::Operator { op, args, .. } if args.len() == 1 => {
                let prec = self.precedence();
                let operand = args[0].stringify_child(prec, false, false);
                if op == "!" || op == "'" {
                    format!("{}{}", operand, op)
                } else {
                    format!("{}{}", op, operand)
                }
            }
            Node::Operator { args, .. } => {
                // No host operator takes an arity other than one or
                // two; fall back to a plain call form.
                let rendered: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                format!("op({})", rendered.join(", "))
            }
            Node::Conditional { condition, when_true, when_false } => {
                let prec = self.precedence();
                format!(
                    "{} ? {} : {}",
                    condition.stringify_child(prec, false, false),
                    when_true.stringify_child(prec, false, false),
                    when_false.stringify_child(prec, true, false)
                )
            }
            Node::Range { start, end, step } => match step {
                Some(step) => format!("{}:{}:{}", start.to_string(), step.to_string(), end.to_string()),
                None => format!("{}:{}", start.to_string(), end.to_string()),
            },
            Node::Array(rows) => {
                let rendered: Vec<String> = rows
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|cell| cell.to_string())
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .collect();
                format!("[{}]", rendered.join("; "))
            }
            Node::Index { object, dimensions } => {
                format!("{}[{}]", object.to_string(), stringify_dimensions(dimensions))
            }
            Node::Assignment { name, value } => format!("{} = {}", name, value.to_string()),
            Node::Update { name, dimensions, value } => {
                format!("{}[{}] = {}", name, stringify_dimensions(dimensions), value.to_string())
            }
            Node::FunctionCall { callee, args } => {
                let rendered: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                format!("{}({})", callee.to_string(), rendered.join(", "))
            }
            Node::FunctionAssignment { body, syntax, .. } => {
                format!("{} = {}", syntax, body.to_string())
            }
            Node::Block(entries) => {
                let rendered: Vec<String> = entries
                    .iter()
                    .map(|e| {
                        if e.visible {
                            e.node.to_string()
                        } else {
                            format!("{};", e.node.to_string())
                        }
                    })
                    .collect();
                rendered.join("\n")
            }
            Node::Parenthesis(inner) => format!("({})", inner.to_string()),
            Node::Custom(custom) => custom.stringify(),
        }
    }
}

fn dimension_children<H: Host>(dim: &IndexDimNode<H>) -> Vec<&Node<H>> {
    match dim {
        IndexDimNode::Single(n) => vec![n],
        IndexDimNode::Range { start, end, step } => {
            let mut out = vec![start, end];
            if let Some(step) = step {
                out.push(step);
            }
            out
        }
        IndexDimNode::All => vec![],
    }
}

fn stringify_dimensions<H: Host>(dims: &[IndexDimNode<H>]) -> String {
    dims.iter()
        .map(|d| match d {
            IndexDimNode::Single(n) => n.to_string(),
            IndexDimNode::Range { start, end, step: None } => {
                format!("{}:{}", start.to_string(), end.to_string())
            }
            IndexDimNode::Range { start, end, step: Some(step) } => {
                format!("{}:{}:{}", start.to_string(), step.to_string(), end.to_string())
            }
            IndexDimNode::All => ":".to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Compiled form of a dimension list, built once at compile time; the
/// `end` pseudo-symbol inside each dimension is resolved fresh on
/// every evaluation, since it depends on the runtime size of the
/// object being indexed.
enum CompiledDim<H: Host> {
    Single(Evaluable<H>),
    Range { start: Evaluable<H>, end: Evaluable<H>, step: Option<Evaluable<H>> },
    All,
}

fn compile_dimensions<H: Host>(
    dims: &[IndexDimNode<H>],
    host: &H,
) -> Result<Vec<CompiledDim<H>>, MathError> {
    dims.iter()
        .map(|d| {
            Ok(match d {
                IndexDimNode::Single(n) => CompiledDim::Single(n.to_evaluable(host)?),
                IndexDimNode::Range { start, end, step } => CompiledDim::Range {
                    start: start.to_evaluable(host)?,
                    end: end.to_evaluable(host)?,
                    step: step.as_ref().map(|s| s.to_evaluable(host)).transpose()?,
                },
                IndexDimNode::All => CompiledDim::All,
            })
        })
        .collect()
}

/// Evaluates a compiled dimension list against the object currently
/// being indexed, binding `end` to that object's size along each
/// dimension in a transient child scope.
fn eval_dimensions<H: Host>(
    dims: &[CompiledDim<H>],
    object: &H::Value,
    host: &H,
    scope: &Scope<Value<H>>,
) -> Result<Vec<DimIndex<H::Value>>, MathError> {
    let mut out = Vec::with_capacity(dims.len());
    for (i, dim) in dims.iter().enumerate() {
        let size = host.size(object, i)?;
        let end_scope = scope.child();
        end_scope.set("end", Value::Host(host.constant_number(&size.to_string())?));
        out.push(match dim {
            CompiledDim::Single(n) => DimIndex::Single(n.eval(host, &end_scope)?.expect_host()?),
            CompiledDim::Range { start, end, step } => DimIndex::Range {
                start: start.eval(host, &end_scope)?.expect_host()?,
                end: end.eval(host, &end_scope)?.expect_host()?,
                step: match step {
                    Some(s) => s.eval(host, &end_scope)?.expect_host()?,
                    None => host.constant_number("1")?,
                },
            },
            CompiledDim::All => DimIndex::All,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::stdlib::ReferenceHost;

    fn num(text: &str) -> Node<ReferenceHost> {
        Node::Constant(Constant::Number(text.to_string()))
    }

    fn sym(name: &str) -> Node<ReferenceHost> {
        Node::Symbol(name.to_string())
    }

    fn op(op_text: &str, func: &str, args: Vec<Node<ReferenceHost>>) -> Node<ReferenceHost> {
        Node::Operator { op: op_text.to_string(), func: func.to_string(), args }
    }

    #[test]
    fn implicit_multiplication_round_trips_with_explicit_parens() {
        // 1/2a -> divide(1, 2) then multiply(_, a).
        let tree = op(
            "*",
            "multiply",
            vec![op("/", "divide", vec![num("1"), num("2")]), sym("a")],
        );
        assert_eq!(tree.to_string(), "(1 / 2) * a");
    }

    #[test]
    fn addition_left_associates_without_parens() {
        let tree = op("+", "add", vec![op("+", "add", vec![num("1"), num("2")]), num("3")]);
        assert_eq!(tree.to_string(), "1 + 2 + 3");
    }

    #[test]
    fn power_is_right_associative() {
        let tree = op("^", "pow", vec![num("2"), op("^", "pow", vec![num("3"), num("2")])]);
        assert_eq!(tree.to_string(), "2 ^ 3 ^ 2");
        let left_nested = op("^", "pow", vec![op("^", "pow", vec![num("2"), num("3")]), num("2")]);
        assert_eq!(left_nested.to_string(), "(2 ^ 3) ^ 2");
    }

    #[test]
    fn find_locates_all_symbols() {
        let tree = op("+", "add", vec![sym("a"), op("*", "multiply", vec![sym("b"), sym("a")])]);
        let matches = tree.find(&|n| matches!(n, Node::Symbol(name) if name == "a"));
        assert_eq!(matches.len(), 2);
    }
}
