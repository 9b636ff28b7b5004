//! # mathex
//! A small, embeddable expression language: a lexer, a recursive-descent
//! parser, a closed-enum AST, a per-node compiler, and a scope-based
//! evaluator.
//!
//! This crate deliberately does not ship a numeric tower, a matrix
//! library, a unit-conversion table, or a function library — those are
//! supplied by whatever implements [`Host`]. [`stdlib::ReferenceHost`]
//! is a minimal `f64`-backed implementation good enough for this
//! crate's own tests and for getting started; real embedders are
//! expected to bring their own.
//!
//! ## Overview of the pipeline
//! Source text goes through four stages, each exposed as its own
//! module:
//!
//! - [`token`] turns source text into a lazy stream of [`token::Token`]s.
//!   The scanner has no notion of operator precedence or bracket
//!   nesting; it only recognizes the shape of numbers, strings,
//!   symbols, operators, and delimiters.
//! - [`parser`] consumes that stream and builds an [`ast::Node`] tree,
//!   following the precedence cascade described in the language's
//!   grammar. [`parse`] and [`parse_many`] are the two entry points.
//! - [`ast::Node::compile`] walks the tree once against a [`Host`],
//!   producing a [`compile::Compiled`] computation. Constants are
//!   parsed into host values at this stage, not re-parsed on every
//!   evaluation.
//! - [`compile::Compiled::eval`] runs the compiled computation against
//!   a [`scope::Scope`], an externally owned, mutable identifier →
//!   value mapping that the caller may reuse across many evaluations.
//!
//! ## Example
//! ```
//! use mathex::{parse, ParseOptions};
//! use mathex::stdlib::ReferenceHost;
//!
//! let host = ReferenceHost;
//! let node = parse("2 + 6 / 3", &ParseOptions::new()).unwrap();
//! let compiled = node.compile(&host).unwrap();
//! let result = compiled.eval(None).unwrap();
//! assert_eq!(format!("{:?}", result), "Host(Number(4.0))");
//! ```

pub mod ast;
pub mod compile;
pub mod error;
pub mod host;
pub mod parser;
pub mod scope;
pub mod stdlib;
pub mod token;

pub use ast::{Constant, CustomNode, CustomNodeFactory, IndexDimNode, Node};
pub use compile::{Closure, Compiled, Evaluable, Value};
pub use error::MathError;
pub use host::{DimIndex, Host, NumberMode};
pub use parser::{ParseOptions, parse, parse_many};
pub use scope::Scope;

/// Parses, compiles, and evaluates `source` in one call — a
/// convenience for the common case where the caller has no reason to
/// hold on to the intermediate [`Node`] or [`Compiled`] form.
///
/// Equivalent to `parse(source, options)?.compile(host)?.eval(scope)`.
pub fn eval<H: Host + Clone>(
    source: &str,
    options: &ParseOptions<H>,
    host: &H,
    scope: Option<Scope<Value<H>>>,
) -> Result<Value<H>, MathError> {
    parser::parse(source, options)?.compile(host)?.eval(scope)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::stdlib::ReferenceHost;

    #[test]
    fn eval_convenience_function_round_trips() {
        let host = ReferenceHost;
        let result = eval("2 + 6 / 3", &ParseOptions::new(), &host, None).unwrap();
        match result {
            Value::Host(crate::stdlib::ReferenceValue::Number(n)) => assert_eq!(n, 4.0),
            other => panic!("expected Number(4.0), got {:?}", other),
        }
    }
}
