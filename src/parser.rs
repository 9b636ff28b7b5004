//! Recursive-descent parsing: a 13-level precedence cascade, lowest to
//! highest — Block, Assignment, Conditional, Range, Conversion,
//! Relational, Additive, Multiplicative, Unary prefix, Power, Postfix,
//! Implicit multiplication, Atom. Each tier is one function that calls
//! the tier below it for its operands.

use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{BlockEntry, Constant, CustomNode, CustomNodeFactory, IndexDimNode, Node};
use crate::error::MathError;
use crate::host::Host;
use crate::token::{KEYWORD_OPERATORS, Terminator, TokenKind, TokenStream};

/// Parser configuration: a mapping from name to a constructor invoked
/// when that name is used as a function call or bare identifier,
/// producing a [`crate::ast::Node::Custom`] instead of the usual
/// `FunctionCall`/`Symbol`.
pub struct ParseOptions<H: Host> {
    custom_nodes: HashMap<String, CustomNodeFactory<H>>,
}

impl<H: Host> Clone for ParseOptions<H> {
    fn clone(&self) -> Self {
        ParseOptions { custom_nodes: self.custom_nodes.clone() }
    }
}

impl<H: Host> Default for ParseOptions<H> {
    fn default() -> Self {
        ParseOptions { custom_nodes: HashMap::new() }
    }
}

impl<H: Host> ParseOptions<H> {
    pub fn new() -> ParseOptions<H> {
        ParseOptions::default()
    }

    pub fn with_custom_node(
        mut self,
        name: impl Into<String>,
        factory: impl Fn(Vec<Node<H>>) -> Result<Box<dyn CustomNode<H>>, MathError> + 'static,
    ) -> ParseOptions<H> {
        self.custom_nodes.insert(name.into(), Rc::new(factory));
        self
    }
}

const RELATIONAL_OPS: &[&str] = &["==", "!=", "<", ">", "<=", ">="];

/// Parses one complete program: `parse(source, options?) -> Node`. See
/// [`parse_many`] for the sequence-of-sources form.
pub fn parse<H: Host>(source: &str, options: &ParseOptions<H>) -> Result<Node<H>, MathError> {
    log::trace!("parse: {} byte(s) of source", source.len());
    let mut parser = Parser::new(source, options.clone())?;
    let result = parser.parse_program();
    if let Err(ref e) = result {
        log::debug!("parse failed: {}", e);
    }
    result
}

/// A source may be a single string or a sequence of strings, the
/// latter yielding a sequence of nodes meant to be evaluated against a
/// shared scope. Rust's static typing makes an overload on the
/// source's arity awkward to express as one signature, so the two
/// shapes are two functions rather than one dynamically-typed entry
/// point.
pub fn parse_many<H: Host>(
    sources: &[&str],
    options: &ParseOptions<H>,
) -> Result<Vec<Node<H>>, MathError> {
    sources.iter().map(|s| parse(s, options)).collect()
}

struct Parser<'src, H: Host> {
    tokens: TokenStream<'src>,
    custom_nodes: HashMap<String, CustomNodeFactory<H>>,
}

impl<'src, H: Host> Parser<'src, H> {
    fn new(source: &'src str, options: ParseOptions<H>) -> Result<Parser<'src, H>, MathError> {
        Ok(Parser {
            tokens: TokenStream::new(source)?,
            custom_nodes: options.custom_nodes,
        })
    }

    fn peek(&self) -> crate::token::Token {
        self.tokens.current().clone()
    }

    fn advance(&mut self) -> Result<crate::token::Token, MathError> {
        self.tokens.advance()
    }

    fn at_delimiter(&self, text: &str) -> bool {
        let tok = self.tokens.current();
        tok.kind == TokenKind::Delimiter && tok.text == text
    }

    fn at_operator(&self, text: &str) -> bool {
        let tok = self.tokens.current();
        tok.kind == TokenKind::Operator && tok.text == text
    }

    fn at_keyword(&self, text: &str) -> bool {
        let tok = self.tokens.current();
        tok.kind == TokenKind::Symbol && tok.text == text
    }

    /// The line-continuation rule: newlines right after a binary
    /// operator, or anywhere inside a balanced bracket pair, are
    /// whitespace. Every call site below that just consumed an
    /// operator, or is inside brackets, calls this before parsing the
    /// next operand.
    fn skip_newlines(&mut self) -> Result<(), MathError> {
        while matches!(self.tokens.current().kind, TokenKind::EndOfExpression(Terminator::Newline)) {
            self.advance()?;
        }
        Ok(())
    }

    fn skip_separators(&mut self) -> Result<(), MathError> {
        while matches!(self.tokens.current().kind, TokenKind::EndOfExpression(_)) {
            self.advance()?;
        }
        Ok(())
    }

    fn expect_delimiter(&mut self, text: &str) -> Result<(), MathError> {
        if self.at_delimiter(text) {
            self.advance()?;
            Ok(())
        } else {
            let offset = self.peek().offset;
            Err(MathError::syntax(format!("\"{}\" expected", text), offset))
        }
    }

    fn expect_exact(&mut self, text: &str, message: &str) -> Result<(), MathError> {
        if self.at_delimiter(text) {
            self.advance()?;
            Ok(())
        } else {
            Err(MathError::syntax_no_offset(message))
        }
    }

    fn expect_value_error(&self) -> MathError {
        let tok = self.peek();
        if tok.is_eof() {
            MathError::syntax("Unexpected end of expression", tok.offset)
        } else {
            MathError::syntax("Value expected", tok.offset)
        }
    }

    fn unexpected_part_error(&self) -> MathError {
        let tok = self.peek();
        if tok.is_eof() {
            MathError::syntax("Unexpected end of expression", tok.offset)
        } else {
            MathError::syntax_no_offset(format!("Unexpected part \"{}\"", tok.text))
        }
    }

    // ---- Tier 1: Block ----------------------------------------------

    /// A program that never contains a statement separator (`;`/
    /// newline) is a single bare expression and is returned unwrapped
    /// — it evaluates to a plain value, not a `ResultSet` (`"2 + 6 /
    /// 3"` -> `4`, not `ResultSet([4])`). As soon as one separator is
    /// seen, every subsequent (and the triggering) entry is collected
    /// into a `Block`, which always evaluates to a `ResultSet` — even
    /// if only one entry ends up visible (`"f(x) = x^2; f(3)"` ->
    /// `ResultSet([9])`).
    fn parse_program(&mut self) -> Result<Node<H>, MathError> {
        log::trace!("parse_program");
        self.skip_separators()?;
        if self.peek().is_eof() {
            return Ok(Node::Block(vec![]));
        }

        let mut pending = self.parse_assignment()?;
        let mut entries: Vec<BlockEntry<H>> = Vec::new();

        loop {
            match self.tokens.current().kind {
                TokenKind::EndOfExpression(Terminator::Semicolon) => {
                    self.advance()?;
                    entries.push(BlockEntry { node: pending, visible: false });
                    if self.peek().is_eof() {
                        return Ok(Node::Block(entries));
                    }
                    pending = self.parse_assignment()?;
                }
                TokenKind::EndOfExpression(Terminator::Newline) => {
                    self.advance()?;
                    entries.push(BlockEntry { node: pending, visible: true });
                    self.skip_separators()?;
                    if self.peek().is_eof() {
                        return Ok(Node::Block(entries));
                    }
                    pending = self.parse_assignment()?;
                }
                TokenKind::EndOfInput => {
                    if entries.is_empty() {
                        // No separator was ever seen: a single bare
                        // expression, not a Block.
                        return Ok(pending);
                    }
                    entries.push(BlockEntry { node: pending, visible: true });
                    return Ok(Node::Block(entries));
                }
                _ => return Err(self.unexpected_part_error()),
            }
        }
    }

    // ---- Tier 2: Assignment ------------------------------------------

    fn parse_assignment(&mut self) -> Result<Node<H>, MathError> {
        log::trace!("parse_assignment");
        let lhs = self.parse_conditional()?;
        if self.at_operator("=") {
            self.advance()?;
            self.skip_newlines()?;
            let rhs = self.parse_assignment()?;
            return Self::build_assignment(lhs, rhs);
        }
        Ok(lhs)
    }

    fn build_assignment(lhs: Node<H>, rhs: Node<H>) -> Result<Node<H>, MathError> {
        match lhs {
            Node::Symbol(name) => Ok(Node::Assignment { name, value: Box::new(rhs) }),
            Node::FunctionCall { callee, args } => {
                let name = match *callee {
                    Node::Symbol(name) => name,
                    _ => return Err(MathError::syntax_no_offset("invalid assignment LHS")),
                };
                let mut params = Vec::with_capacity(args.len());
                for arg in args {
                    match arg {
                        Node::Symbol(p) => params.push(p),
                        _ => return Err(MathError::syntax_no_offset("invalid assignment LHS")),
                    }
                }
                let syntax = format!("{}({})", name, params.join(", "));
                Ok(Node::FunctionAssignment { name, params, body: Box::new(rhs), syntax })
            }
            Node::Index { object, dimensions } => {
                let name = match *object {
                    Node::Symbol(name) => name,
                    _ => return Err(MathError::syntax_no_offset("invalid assignment LHS")),
                };
                Ok(Node::Update { name, dimensions, value: Box::new(rhs) })
            }
            _ => Err(MathError::syntax_no_offset("invalid assignment LHS")),
        }
    }

    // ---- Tier 3: Conditional ------------------------------------------

    fn parse_conditional(&mut self) -> Result<Node<H>, MathError> {
        let condition = self.parse_range()?;
        if self.at_delimiter("?") {
            self.advance()?;
            self.skip_newlines()?;
            let when_true = self.parse_conditional()?;
            self.skip_newlines()?;
            self.expect_exact(":", "False part of conditional expression expected")?;
            self.skip_newlines()?;
            let when_false = self.parse_conditional()?;
            return Ok(Node::Conditional {
                condition: Box::new(condition),
                when_true: Box::new(when_true),
                when_false: Box::new(when_false),
            });
        }
        Ok(condition)
    }

    // ---- Tier 4: Range --------------------------------------------------

    fn parse_range(&mut self) -> Result<Node<H>, MathError> {
        let first = self.parse_conversion()?;
        if self.at_delimiter(":") {
            self.advance()?;
            self.skip_newlines()?;
            let second = self.parse_conversion()?;
            if self.at_delimiter(":") {
                self.advance()?;
                self.skip_newlines()?;
                let third = self.parse_conversion()?;
                return Ok(Node::Range {
                    start: Box::new(first),
                    end: Box::new(third),
                    step: Some(Box::new(second)),
                });
            }
            return Ok(Node::Range { start: Box::new(first), end: Box::new(second), step: None });
        }
        Ok(first)
    }

    // ---- Tier 5: Conversion ----------------------------------------------

    fn parse_conversion(&mut self) -> Result<Node<H>, MathError> {
        let mut left = self.parse_relational()?;
        loop {
            if !(self.at_keyword("to") || self.at_keyword("in")) {
                break;
            }
            let checkpoint = self.tokens.clone();
            let op_text = self.peek().text;
            self.advance()?;
            if !self.can_start_operand() {
                // A trailing `in`/`to` with nothing after it is not a
                // conversion; leave it untouched.
                self.tokens = checkpoint;
                break;
            }
            self.skip_newlines()?;
            let right = self.parse_relational()?;
            left = Node::Operator { op: op_text, func: "to".to_string(), args: vec![left, right] };
        }
        Ok(left)
    }

    fn can_start_operand(&self) -> bool {
        match &self.tokens.current().kind {
            TokenKind::Number | TokenKind::String | TokenKind::Symbol => true,
            TokenKind::Delimiter => matches!(self.tokens.current().text.as_str(), "(" | "["),
            TokenKind::Operator => matches!(self.tokens.current().text.as_str(), "+" | "-"),
            _ => false,
        }
    }

    // ---- Tier 6: Relational ----------------------------------------------

    fn parse_relational(&mut self) -> Result<Node<H>, MathError> {
        let mut left = self.parse_additive()?;
        while self.tokens.current().kind == TokenKind::Operator
            && RELATIONAL_OPS.contains(&self.tokens.current().text.as_str())
        {
            let op = self.advance()?.text;
            self.skip_newlines()?;
            let right = self.parse_additive()?;
            let func = match op.as_str() {
                "==" => "equal",
                "!=" => "unequal",
                "<" => "smaller",
                ">" => "larger",
                "<=" => "smallerEq",
                ">=" => "largerEq",
                _ => unreachable!(),
            };
            left = Node::Operator { op, func: func.to_string(), args: vec![left, right] };
        }
        Ok(left)
    }

    // ---- Tier 7: Additive --------------------------------------------------

    fn parse_additive(&mut self) -> Result<Node<H>, MathError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let text = self.tokens.current().text.clone();
            if self.tokens.current().kind == TokenKind::Operator && (text == "+" || text == "-") {
                self.advance()?;
                self.skip_newlines()?;
                let right = self.parse_multiplicative()?;
                let func = if text == "+" { "add" } else { "subtract" };
                left = Node::Operator { op: text, func: func.to_string(), args: vec![left, right] };
            } else {
                break;
            }
        }
        Ok(left)
    }

    // ---- Tier 8: Multiplicative --------------------------------------------

    fn parse_multiplicative(&mut self) -> Result<Node<H>, MathError> {
        let mut left = self.parse_unary()?;
        loop {
            let tok = self.tokens.current();
            let is_symbolic_op = tok.kind == TokenKind::Operator
                && matches!(tok.text.as_str(), "*" | "/" | ".*" | "./" | "%");
            let is_mod_keyword = tok.kind == TokenKind::Symbol && tok.text == "mod";
            if !is_symbolic_op && !is_mod_keyword {
                break;
            }
            let text = self.advance()?.text;
            self.skip_newlines()?;
            let right = self.parse_unary()?;
            let func = match text.as_str() {
                "*" => "multiply",
                "/" => "divide",
                ".*" => "dotMultiply",
                "./" => "dotDivide",
                "%" | "mod" => "mod",
                _ => unreachable!(),
            };
            left = Node::Operator { op: text, func: func.to_string(), args: vec![left, right] };
        }
        Ok(left)
    }

    // ---- Tier 9: Unary prefix ------------------------------------------------

    fn parse_unary(&mut self) -> Result<Node<H>, MathError> {
        let tok = self.peek();
        if tok.kind == TokenKind::Operator && (tok.text == "+" || tok.text == "-") {
            self.advance()?;
            self.skip_newlines()?;
            let operand = self.parse_unary()?;
            let func = if tok.text == "-" { "unaryMinus" } else { "unaryPlus" };
            return Ok(Node::Operator { op: tok.text, func: func.to_string(), args: vec![operand] });
        }
        if tok.kind == TokenKind::Symbol && tok.text == "not" {
            self.advance()?;
            self.skip_newlines()?;
            let operand = self.parse_unary()?;
            return Ok(Node::Operator {
                op: "not".to_string(),
                func: "not".to_string(),
                args: vec![operand],
            });
        }
        self.parse_power()
    }

    // ---- Tier 10: Power ----------------------------------------------------

    fn parse_power(&mut self) -> Result<Node<H>, MathError> {
        let base = self.parse_postfix()?;
        let tok = self.peek();
        if tok.kind == TokenKind::Operator && (tok.text == "^" || tok.text == ".^") {
            self.advance()?;
            self.skip_newlines()?;
            // Unary prefix on the right operand of `^` is accepted
            // (`2^-2 = 0.25`), so the right operand is parsed at the
            // unary tier, not postfix.
            let rhs = self.parse_unary()?;
            let func = if tok.text == "^" { "pow" } else { "dotPow" };
            return Ok(Node::Operator { op: tok.text, func: func.to_string(), args: vec![base, rhs] });
        }
        Ok(base)
    }

    // ---- Tier 11: Postfix ---------------------------------------------------

    fn parse_postfix(&mut self) -> Result<Node<H>, MathError> {
        let mut node = self.parse_implicit_multiplication()?;
        loop {
            let tok = self.peek();
            if tok.kind == TokenKind::Operator && (tok.text == "!" || tok.text == "'") {
                self.advance()?;
                let func = if tok.text == "!" { "factorial" } else { "transpose" };
                node = Node::Operator { op: tok.text, func: func.to_string(), args: vec![node] };
            } else {
                break;
            }
        }
        Ok(node)
    }

    // ---- Tier 12: Implicit multiplication -------------------------------------

    fn parse_implicit_multiplication(&mut self) -> Result<Node<H>, MathError> {
        let mut left = self.parse_atom()?;
        loop {
            if matches!(left, Node::FunctionCall { .. }) {
                // Implicit multiplication only applies when the left
                // side is a non-function expression.
                break;
            }
            let can_continue = match &self.tokens.current().kind {
                TokenKind::Symbol => !KEYWORD_OPERATORS.contains(&self.tokens.current().text.as_str()),
                TokenKind::Delimiter => matches!(self.tokens.current().text.as_str(), "(" | "["),
                _ => false,
            };
            if !can_continue {
                break;
            }
            // `symbol[...]` is indexing, already consumed inside
            // parse_atom; a bare `[` here can only mean a matrix
            // literal operand.
            let right = self.parse_atom()?;
            left = Node::Operator {
                op: "*".to_string(),
                func: "multiply".to_string(),
                args: vec![left, right],
            };
        }
        Ok(left)
    }

    // ---- Tier 13: Atom, plus call/index suffixes -------------------------------

    fn parse_atom(&mut self) -> Result<Node<H>, MathError> {
        let mut node = self.parse_primary()?;
        loop {
            if self.at_delimiter("(") && matches!(node, Node::Symbol(_)) {
                let args = self.parse_argument_list()?;
                node = Node::FunctionCall { callee: Box::new(node), args };
            } else if self.at_delimiter("[") {
                node = self.parse_index_suffix(node)?;
            } else {
                break;
            }
        }
        Ok(node)
    }

    fn parse_primary(&mut self) -> Result<Node<H>, MathError> {
        let tok = self.peek();
        match tok.kind {
            TokenKind::Number => {
                self.advance()?;
                Ok(Node::Constant(Constant::Number(tok.text)))
            }
            TokenKind::String => {
                self.advance()?;
                Ok(Node::Constant(Constant::Str(tok.text)))
            }
            TokenKind::Symbol => {
                self.advance()?;
                match tok.text.as_str() {
                    "true" => Ok(Node::Constant(Constant::Boolean(true))),
                    "false" => Ok(Node::Constant(Constant::Boolean(false))),
                    "undefined" => Ok(Node::Constant(Constant::Undefined)),
                    name => {
                        if let Some(factory) = self.custom_nodes.get(name).cloned() {
                            if self.at_delimiter("(") {
                                let args = self.parse_argument_list()?;
                                Ok(Node::Custom(factory(args)?))
                            } else {
                                Ok(Node::Custom(factory(vec![])?))
                            }
                        } else {
                            Ok(Node::Symbol(name.to_string()))
                        }
                    }
                }
            }
            TokenKind::Delimiter if tok.text == "(" => {
                self.advance()?;
                self.skip_newlines()?;
                let inner = self.parse_assignment()?;
                self.skip_newlines()?;
                self.expect_exact(")", "Parenthesis ) expected")?;
                Ok(Node::Parenthesis(Box::new(inner)))
            }
            TokenKind::Delimiter if tok.text == "[" => self.parse_array_literal(),
            _ => Err(self.expect_value_error()),
        }
    }

    fn parse_argument_list(&mut self) -> Result<Vec<Node<H>>, MathError> {
        self.expect_delimiter("(")?;
        self.skip_newlines()?;
        let mut args = Vec::new();
        if !self.at_delimiter(")") {
            loop {
                args.push(self.parse_assignment()?);
                self.skip_newlines()?;
                if self.at_delimiter(",") {
                    self.advance()?;
                    self.skip_newlines()?;
                    continue;
                }
                break;
            }
        }
        self.skip_newlines()?;
        self.expect_exact(")", "Parenthesis ) expected")?;
        Ok(args)
    }

    fn parse_index_suffix(&mut self, object: Node<H>) -> Result<Node<H>, MathError> {
        self.expect_delimiter("[")?;
        self.skip_newlines()?;
        let mut dimensions = Vec::new();
        loop {
            dimensions.push(self.parse_dimension()?);
            self.skip_newlines()?;
            if self.at_delimiter(",") {
                self.advance()?;
                self.skip_newlines()?;
                continue;
            }
            break;
        }
        self.skip_newlines()?;
        self.expect_delimiter("]")?;
        Ok(Node::Index { object: Box::new(object), dimensions })
    }

    /// Each dimension's operand is parsed at the Conversion tier, one
    /// level *below* Range — `:` inside an index expression means
    /// "this dimension is a range", the same token Range would
    /// otherwise consume as a standalone expression.
    fn parse_dimension(&mut self) -> Result<IndexDimNode<H>, MathError> {
        if self.at_delimiter(":") {
            self.advance()?;
            return Ok(IndexDimNode::All);
        }
        let first = self.parse_conversion()?;
        if self.at_delimiter(":") {
            self.advance()?;
            self.skip_newlines()?;
            let second = self.parse_conversion()?;
            if self.at_delimiter(":") {
                self.advance()?;
                self.skip_newlines()?;
                let third = self.parse_conversion()?;
                return Ok(IndexDimNode::Range { start: first, end: third, step: Some(second) });
            }
            return Ok(IndexDimNode::Range { start: first, end: second, step: None });
        }
        Ok(IndexDimNode::Single(first))
    }

    /// Rows separated by `;`, columns by `,`, all rows equal length
    /// else `Column dimensions mismatch`. `[]` is the zero-row array.
    fn parse_array_literal(&mut self) -> Result<Node<H>, MathError> {
        self.expect_delimiter("[")?;
        self.skip_newlines()?;
        let mut rows: Vec<Vec<Node<H>>> = Vec::new();
        if self.at_delimiter("]") {
            self.advance()?;
            return Ok(Node::Array(rows));
        }
        rows.push(Vec::new());
        loop {
            let cell = self.parse_conditional()?;
            rows.last_mut().unwrap().push(cell);
            self.skip_newlines()?;
            if self.at_delimiter(",") {
                self.advance()?;
                self.skip_newlines()?;
                continue;
            }
            if matches!(self.tokens.current().kind, TokenKind::EndOfExpression(Terminator::Semicolon)) {
                self.advance()?;
                self.skip_newlines()?;
                rows.push(Vec::new());
                continue;
            }
            break;
        }
        self.skip_newlines()?;
        self.expect_exact("]", "End of matrix ] expected")?;
        let first_len = rows[0].len();
        if rows.iter().any(|r| r.len() != first_len) {
            return Err(MathError::syntax_no_offset("Column dimensions mismatch"));
        }
        Ok(Node::Array(rows))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ast::{Constant, Node};
    use crate::stdlib::ReferenceHost;

    fn parse_src(src: &str) -> Node<ReferenceHost> {
        parse(src, &ParseOptions::new()).unwrap()
    }

    fn single_entry(src: &str) -> Node<ReferenceHost> {
        match parse_src(src) {
            Node::Block(mut entries) => entries.remove(0).node,
            other => other,
        }
    }

    #[test]
    fn precedence_matches_arithmetic_expectations() {
        assert_eq!(single_entry("2+3*4").to_string(), "2 + 3 * 4");
        assert_eq!(single_entry("-3^2").to_string(), "-(3 ^ 2)");
        assert_eq!(single_entry("(-3)^2").to_string(), "(-3) ^ 2");
        assert_eq!(single_entry("2^3^4").to_string(), "2 ^ 3 ^ 4");
        assert_eq!(single_entry("3!^2").to_string(), "3! ^ 2");
    }

    #[test]
    fn implicit_multiplication_parses_adjacency() {
        let node = single_entry("2a");
        match node {
            Node::Operator { func, .. } => assert_eq!(func, "multiply"),
            other => panic!("expected multiply, got {:?}", other),
        }
    }

    #[test]
    fn function_assignment_captures_syntax() {
        let node = single_entry("f(x, y) = x + y");
        match node {
            Node::FunctionAssignment { syntax, params, .. } => {
                assert_eq!(syntax, "f(x, y)");
                assert_eq!(params, vec!["x".to_string(), "y".to_string()]);
            }
            other => panic!("expected FunctionAssignment, got {:?}", other),
        }
    }

    #[test]
    fn assigning_to_a_call_is_a_syntax_error() {
        let err = parse::<ReferenceHost>("sin(2) = 0.75", &ParseOptions::new()).unwrap_err();
        assert_eq!(err.to_string(), "invalid assignment LHS");
    }

    #[test]
    fn conditional_requires_false_branch() {
        let err = parse::<ReferenceHost>("1 ? 2", &ParseOptions::new()).unwrap_err();
        assert_eq!(err.to_string(), "False part of conditional expression expected");
    }

    #[test]
    fn matrix_literal_rejects_ragged_rows() {
        let err = parse::<ReferenceHost>("[1,2;3]", &ParseOptions::new()).unwrap_err();
        assert_eq!(err.to_string(), "Column dimensions mismatch");
    }

    #[test]
    fn empty_matrix_has_zero_rows() {
        let node = single_entry("[]");
        match node {
            Node::Array(rows) => assert!(rows.is_empty()),
            other => panic!("expected Array, got {:?}", other),
        }
    }

    #[test]
    fn trailing_in_without_operand_is_left_as_a_symbol() {
        let node = single_entry("2 in");
        match node {
            Node::Operator { func, args, .. } => {
                assert_eq!(func, "multiply");
                assert!(matches!(args[1], Node::Symbol(ref s) if s == "in"));
            }
            other => panic!("expected implicit multiplication, got {:?}", other),
        }
    }

    #[test]
    fn block_marks_semicolon_entries_invisible() {
        match parse_src("a=1;b=2\n") {
            Node::Block(entries) => {
                assert_eq!(entries.len(), 2);
                assert!(!entries[0].visible);
                assert!(entries[1].visible);
            }
            other => panic!("expected Block, got {:?}", other),
        }
    }

    #[test]
    fn single_statement_with_no_separator_is_not_a_block() {
        // "2 + 6 / 3" -> 4, not ResultSet([4]).
        match parse_src("2 + 6 / 3") {
            Node::Operator { func, .. } => assert_eq!(func, "add"),
            other => panic!("expected a bare Operator node, got {:?}", other),
        }
    }

    #[test]
    fn a_statement_separator_always_produces_a_block() {
        // "f(x) = x^2; f(3)" builds a Block even though only one
        // entry ends up visible.
        match parse_src("f(x) = x^2; f(3)") {
            Node::Block(entries) => {
                assert_eq!(entries.len(), 2);
                assert!(!entries[0].visible);
                assert!(entries[1].visible);
            }
            other => panic!("expected Block, got {:?}", other),
        }
    }

    #[test]
    fn index_dimension_accepts_range_with_step() {
        let node = single_entry("a[1:2:9]");
        match node {
            Node::Index { dimensions, .. } => {
                assert_eq!(dimensions.len(), 1);
                assert!(matches!(dimensions[0], IndexDimNode::Range { step: Some(_), .. }));
            }
            other => panic!("expected Index, got {:?}", other),
        }
    }

    #[test]
    fn line_continuation_inside_parens() {
        let node = single_entry("(2+\n3)");
        match node {
            Node::Parenthesis(inner) => match *inner {
                Node::Operator { func, .. } => assert_eq!(func, "add"),
                other => panic!("unexpected inner node {:?}", other),
            },
            other => panic!("expected Parenthesis, got {:?}", other),
        }
    }

    #[test]
    fn number_literal_preserves_source_text() {
        match single_entry("3.2") {
            Node::Constant(Constant::Number(text)) => assert_eq!(text, "3.2"),
            other => panic!("expected a numeric constant, got {:?}", other),
        }
    }
}
