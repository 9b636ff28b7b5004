//! The host contract: the small set of interfaces the numeric tower,
//! matrix/range backend, and function library are consumed through.
//! None of those are implemented here — only the trait they must
//! satisfy. See [`crate::stdlib`] for a minimal reference
//! implementation used by this crate's own tests.
//!
//! Named operators are all reached through a single name → function
//! registry ([`Host::call`]) rather than one trait method per
//! operator, so the numeric tower stays a genuine external
//! collaborator behind an opaque `Host::Value` associated type.

use crate::error::MathError;

/// Selects which numeric representation a bare numeric literal
/// compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberMode {
    Number,
    BigNumber,
}

/// One dimension of an index expression. `end` is resolved against
/// [`Host::size`] before this is constructed — by the
/// time a `Host` sees a `DimIndex`, `end` has already become a plain
/// value.
#[derive(Debug, Clone)]
pub enum DimIndex<V> {
    /// A single 1-based index, e.g. `a[3]`.
    Single(V),
    /// A 1-based inclusive range, e.g. `a[2:3]` or `a[2:2:10]`.
    Range { start: V, end: V, step: V },
    /// The bare `:` full-range shortcut.
    All,
}

/// The interface a numeric/data backend must satisfy to be driven by
/// this crate's parser/compiler/evaluator.
///
/// Every named function (`add`, `subtract`, ..., `unit`) is reached
/// through [`Host::call`], keyed by name, exactly as an
/// `OperatorNode`'s `fn` field names a host function.
pub trait Host: Sized {
    /// The value type this host's operations produce and consume.
    /// Kept intentionally opaque to the core crate — it never pattern
    /// matches on `Value`'s shape, only routes it through `Host`.
    type Value: Clone + std::fmt::Debug;

    fn number_mode(&self) -> NumberMode;

    fn constant_number(&self, text: &str) -> Result<Self::Value, MathError>;
    fn constant_string(&self, text: &str) -> Self::Value;
    fn constant_boolean(&self, value: bool) -> Self::Value;
    fn undefined(&self) -> Self::Value;

    /// A `ConditionalNode` consults this truthiness predicate: numbers
    /// are truthy when nonzero, booleans are themselves, and every
    /// other non-null value is truthy.
    fn truthy(&self, value: &Self::Value) -> bool;

    /// Whether `name` names a host operator function, used by
    /// `FunctionNode` to choose between invoking a host operator and
    /// looking `name` up as a user-defined callable in scope.
    fn is_operator(&self, name: &str) -> bool;

    /// Invokes the named host function (`add`, `subtract`, `pow`, ...)
    /// with already-evaluated arguments, in the order given.
    fn call(&self, name: &str, args: Vec<Self::Value>) -> Result<Self::Value, MathError>;

    /// Range evaluation produces a finite ordered sequence; endpoints
    /// are inclusive, and direction is inferred from the sign of
    /// `step`.
    fn range(
        &self,
        start: Self::Value,
        end: Self::Value,
        step: Self::Value,
    ) -> Result<Self::Value, MathError>;

    /// Builds a (possibly nested, for higher dimensions) matrix value
    /// from row-major cells.
    fn matrix(&self, rows: Vec<Vec<Self::Value>>) -> Result<Self::Value, MathError>;

    /// Size of `object` along the given 0-based dimension, used to
    /// resolve the `end` pseudo-symbol inside an index expression.
    fn size(&self, object: &Self::Value, dimension: usize) -> Result<i64, MathError>;

    /// Reads a 1-based subset of `object`. Implementations translate
    /// to their own 0-based indexing internally; out-of-range errors
    /// should be raised in 0-based terms and are re-translated to
    /// 1-based by the caller.
    fn subset_get(
        &self,
        object: &Self::Value,
        dims: &[DimIndex<Self::Value>],
    ) -> Result<Self::Value, MathError>;

    /// Returns a copy of `object` with the 1-based subset named by
    /// `dims` replaced by `replacement`. The returned container may
    /// have different dimensions than `object` if the index addressed
    /// space beyond its current bounds.
    fn subset_set(
        &self,
        object: &Self::Value,
        dims: &[DimIndex<Self::Value>],
        replacement: Self::Value,
    ) -> Result<Self::Value, MathError>;
}
