//! The error taxonomy for the expression core.
//!
//! A handful of distinct error kinds collapse into a single
//! [`MathError`] enum so that `parse`, `compile`, and `eval` all return
//! `Result<_, MathError>`.

use thiserror::Error;

/// A 1-based character offset into the original source text.
///
/// Kept as a distinct type (rather than a bare `usize`) so that the
/// 0-based/1-based translation required at an `IndexNode` boundary
/// can't be performed on the wrong kind of number by accident.
pub type CharOffset = usize;

/// Every way evaluating or compiling a [`crate::ast::Node`] can fail.
#[derive(Debug, Error, PartialEq, Clone)]
pub enum MathError {
    /// A public API function (`parse`, `eval`) was called with the
    /// wrong number of arguments.
    #[error("Wrong number of arguments ({actual} provided, {expected} expected)")]
    ArgumentsError { expected: usize, actual: usize },

    /// A public API function received an argument of the wrong kind
    /// (e.g. `parse` given neither a string nor a sequence of strings).
    #[error("Unexpected type of argument in function {function} (expected: {expected}, actual: {actual})")]
    TypeError {
        function: String,
        expected: String,
        actual: String,
    },

    /// Malformed source text. Always carries a char offset when one is
    /// known.
    #[error("{message}")]
    SyntaxError { message: String, offset: Option<CharOffset> },

    /// A `SymbolNode` referred to a name absent from scope.
    #[error("Undefined symbol {0}")]
    UndefinedSymbol(String),

    /// An index evaluated outside of the valid 1-based range for its
    /// dimension, distinguishing "too large" from "too small".
    #[error("Index out of range ({index} > {max})")]
    IndexTooLarge { index: i64, max: i64 },
    #[error("Index out of range ({index} < 1)")]
    IndexTooSmall { index: i64 },

    /// Mismatched dimensions, e.g. unequal row lengths in a matrix
    /// literal.
    #[error("{0}")]
    DimensionError(String),

    /// The caller-provided scope contained a reserved name.
    #[error("Scope contains an illegal symbol")]
    IllegalScope,

    /// Propagated verbatim from a host function.
    #[error("{0}")]
    HostError(String),
}

impl MathError {
    /// Builds a [`MathError::SyntaxError`] with a char offset, matching
    /// the `"... (char N)"` suffix convention used throughout this
    /// crate's syntax error messages.
    pub fn syntax(message: impl Into<String>, offset: CharOffset) -> MathError {
        let message = message.into();
        MathError::SyntaxError {
            message: format!("{} (char {})", message, offset),
            offset: Some(offset),
        }
    }

    /// Builds a [`MathError::SyntaxError`] with no offset, for the rare
    /// case where none is available.
    pub fn syntax_no_offset(message: impl Into<String>) -> MathError {
        MathError::SyntaxError {
            message: message.into(),
            offset: None,
        }
    }

    /// Re-translates an [`MathError::IndexTooLarge`] / `IndexTooSmall`
    /// raised by a 0-based host `subset`/`index` function into the
    /// 1-based error surfaced to the caller of an `IndexNode`.
    pub fn reindex_from_zero_based(self) -> MathError {
        match self {
            MathError::IndexTooLarge { index, max } => MathError::IndexTooLarge {
                index: index + 1,
                max: max + 1,
            },
            MathError::IndexTooSmall { index } => MathError::IndexTooSmall { index: index + 1 },
            other => other,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn syntax_message_has_offset_suffix() {
        let err = MathError::syntax("Value expected", 4);
        assert_eq!(err.to_string(), "Value expected (char 4)");
    }

    #[test]
    fn index_messages_distinguish_too_large_from_too_small() {
        assert_eq!(
            MathError::IndexTooLarge { index: 5, max: 3 }.to_string(),
            "Index out of range (5 > 3)"
        );
        assert_eq!(
            MathError::IndexTooSmall { index: 0 }.to_string(),
            "Index out of range (0 < 1)"
        );
    }

    #[test]
    fn illegal_scope_message() {
        assert_eq!(
            MathError::IllegalScope.to_string(),
            "Scope contains an illegal symbol"
        );
    }

    #[test]
    fn reindex_shifts_zero_based_to_one_based() {
        let zero_based = MathError::IndexTooSmall { index: -1 };
        assert_eq!(
            zero_based.reindex_from_zero_based(),
            MathError::IndexTooSmall { index: 0 }
        );
    }
}
