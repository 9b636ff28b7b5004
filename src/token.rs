//! Character-level scanning.
//!
//! The scanner is a stateful cursor over the source string. It is
//! deliberately "dumb": it has no notion of operator precedence,
//! bracket nesting, or the context-sensitive `in`/`to`/`mod` keyword
//! operators — resolving those lexically would require lookahead the
//! scanner shouldn't need. Those all live in [`crate::parser`].
//!
//! Tokens are produced one at a time via a cursor over `source`,
//! rather than collected into a `Vec<Token>` up front.

use crate::error::MathError;

/// Multi-character keyword identifiers the scanner recognizes but does
/// not itself classify as operators — that promotion happens in the
/// parser, based on position.
pub const KEYWORD_OPERATORS: &[&str] = &["to", "in", "mod", "and", "or", "not", "xor"];

/// The two ways an expression can end: a `BlockNode` treats them
/// differently (an entry terminated by `;` is invisible, one
/// terminated by a newline is visible).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    Newline,
    Semicolon,
}

/// The kind of a scanned token. Keyword operators (`to`, `in`, `mod`,
/// `and`, `or`, `not`, `xor`) are scanned as [`TokenKind::Symbol`] —
/// see the module doc comment.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number,
    Symbol,
    String,
    /// `( ) [ ] { } , ; : ?` and a bare newline used as a delimiter.
    Delimiter,
    Operator,
    EndOfExpression(Terminator),
    EndOfInput,
}

/// A single scanned token: its kind, the literal source text it spans,
/// and a 1-based character offset used for user-facing error messages.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub offset: usize,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Token {
        Token { kind, text: text.into(), offset }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::EndOfInput)
    }

    pub fn is_end_of_expression(&self) -> bool {
        matches!(self.kind, TokenKind::EndOfExpression(_))
    }
}

const MULTI_CHAR_OPERATORS: &[&str] =
    &["==", "!=", "<=", ">=", "<<", ">>", ".*", "./", ".^", ".'", "->"];

const SINGLE_CHAR_OPERATORS: &str = "+-*/^%!'<>=&|#";

const SINGLE_CHAR_DELIMITERS: &str = "()[]{},;:?";

/// A lazy, single-pass scanner. Tokens are produced on demand via
/// [`TokenStream::current`] / [`TokenStream::advance`].
#[derive(Clone)]
pub struct TokenStream<'src> {
    source: &'src str,
    bytes: &'src [u8],
    /// Byte index of the next unconsumed character.
    cursor: usize,
    current: Token,
}

impl<'src> TokenStream<'src> {
    pub fn new(source: &'src str) -> Result<TokenStream<'src>, MathError> {
        let mut stream = TokenStream {
            source,
            bytes: source.as_bytes(),
            cursor: 0,
            current: Token::new(TokenKind::EndOfInput, "", 1),
        };
        stream.current = stream.scan_next()?;
        Ok(stream)
    }

    /// The token at the current cursor position. Does not advance.
    pub fn current(&self) -> &Token {
        &self.current
    }

    /// Consumes the current token and scans the next one, returning the
    /// token that was current *before* advancing.
    pub fn advance(&mut self) -> Result<Token, MathError> {
        let next = self.scan_next()?;
        let consumed = std::mem::replace(&mut self.current, next);
        log::trace!("token: {:?} {:?} (char {})", consumed.kind, consumed.text, consumed.offset);
        Ok(consumed)
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.cursor..].chars().next()
    }

    fn peek_at(&self, skip_bytes: usize) -> Option<char> {
        self.source[self.cursor + skip_bytes..].chars().next()
    }

    /// 1-based char offset of the cursor, for error messages.
    fn offset(&self) -> usize {
        self.source[..self.cursor].chars().count() + 1
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            let start = self.cursor;
            while let Some(c) = self.peek_char() {
                if c.is_whitespace() && c != '\n' {
                    self.cursor += c.len_utf8();
                } else {
                    break;
                }
            }
            if self.peek_char() == Some('#') {
                while let Some(c) = self.peek_char() {
                    if c == '\n' {
                        break;
                    }
                    self.cursor += c.len_utf8();
                }
            }
            if self.cursor == start {
                break;
            }
        }
    }

    fn scan_next(&mut self) -> Result<Token, MathError> {
        self.skip_whitespace_and_comments();

        if self.cursor >= self.bytes.len() {
            return Ok(Token::new(TokenKind::EndOfInput, "", self.offset()));
        }

        let offset = self.offset();
        let c = self.peek_char().unwrap();

        if c == '\n' {
            self.cursor += 1;
            return Ok(Token::new(
                TokenKind::EndOfExpression(Terminator::Newline),
                "\n",
                offset,
            ));
        }

        if c == ';' {
            self.cursor += 1;
            return Ok(Token::new(
                TokenKind::EndOfExpression(Terminator::Semicolon),
                ";",
                offset,
            ));
        }

        if c == '"' {
            return self.scan_string(offset);
        }

        if c.is_ascii_digit() || (c == '.' && self.peek_at(1).map_or(false, |n| n.is_ascii_digit()))
        {
            return self.scan_number(offset);
        }

        if c.is_alphabetic() || c == '_' {
            return self.scan_symbol(offset);
        }

        if SINGLE_CHAR_DELIMITERS.contains(c) {
            self.cursor += c.len_utf8();
            return Ok(Token::new(TokenKind::Delimiter, c.to_string(), offset));
        }

        for op in MULTI_CHAR_OPERATORS {
            if self.source[self.cursor..].starts_with(op) {
                self.cursor += op.len();
                return Ok(Token::new(TokenKind::Operator, *op, offset));
            }
        }

        if SINGLE_CHAR_OPERATORS.contains(c) {
            self.cursor += c.len_utf8();
            return Ok(Token::new(TokenKind::Operator, c.to_string(), offset));
        }

        Err(MathError::syntax(
            format!("Syntax error in part \"{}\"", c),
            offset,
        ))
    }

    /// Numbers are scanned permissively; malformed shapes such as
    /// `3.2.2` or `32e` are only rejected when the literal is actually
    /// consumed downstream — here, that means the scanner greedily
    /// grabs the longest plausible numeric run and leaves validation
    /// of its exact shape to [`crate::parser`].
    fn scan_number(&mut self, offset: usize) -> Result<Token, MathError> {
        let start = self.cursor;
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.cursor += 1;
        }
        if self.peek_char() == Some('.') {
            self.cursor += 1;
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.cursor += 1;
            }
        }
        if matches!(self.peek_char(), Some('e') | Some('E')) {
            let mark = self.cursor;
            self.cursor += 1;
            if matches!(self.peek_char(), Some('+') | Some('-')) {
                self.cursor += 1;
            }
            let digits_start = self.cursor;
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.cursor += 1;
            }
            if self.cursor == digits_start {
                // No digits followed the exponent marker; back out so
                // the 'e' is left for the next token (it will fail to
                // parse as a number downstream).
                self.cursor = mark;
            }
        }
        let text = &self.source[start..self.cursor];
        Ok(Token::new(TokenKind::Number, text, offset))
    }

    fn scan_symbol(&mut self, offset: usize) -> Result<Token, MathError> {
        let start = self.cursor;
        while self
            .peek_char()
            .map_or(false, |c| c.is_alphanumeric() || c == '_')
        {
            self.cursor += self.peek_char().unwrap().len_utf8();
        }
        let text = &self.source[start..self.cursor];
        Ok(Token::new(TokenKind::Symbol, text, offset))
    }

    fn scan_string(&mut self, offset: usize) -> Result<Token, MathError> {
        self.cursor += 1; // opening quote
        let start = self.cursor;
        loop {
            match self.peek_char() {
                None => {
                    return Err(MathError::syntax(
                        "Unexpected end of expression",
                        self.offset(),
                    ))
                }
                Some('"') => {
                    let text = self.source[start..self.cursor].to_string();
                    self.cursor += 1;
                    return Ok(Token::new(TokenKind::String, text, offset));
                }
                Some(c) => self.cursor += c.len_utf8(),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut stream = TokenStream::new(source).unwrap();
        let mut out = vec![];
        loop {
            let tok = stream.advance().unwrap();
            let done = tok.is_eof();
            out.push(tok.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn numbers() {
        let mut stream = TokenStream::new("3.2 .5 3 0.2e10").unwrap();
        for expected in ["3.2", ".5", "3", "0.2e10"] {
            let tok = stream.advance().unwrap();
            assert_eq!(tok.kind, TokenKind::Number);
            assert_eq!(tok.text, expected);
        }
    }

    #[test]
    fn malformed_exponent_is_left_for_later_consumption() {
        // `32e` should scan as Number("32") followed by Symbol("e"),
        // and fail only once the parser tries to use it as a number.
        let mut stream = TokenStream::new("32e").unwrap();
        let number = stream.advance().unwrap();
        assert_eq!(number.text, "32");
        let symbol = stream.advance().unwrap();
        assert_eq!(symbol.kind, TokenKind::Symbol);
        assert_eq!(symbol.text, "e");
    }

    #[test]
    fn keyword_operators_scan_as_symbols() {
        let mut stream = TokenStream::new("to in mod and or not xor").unwrap();
        for word in KEYWORD_OPERATORS {
            let tok = stream.advance().unwrap();
            assert_eq!(tok.kind, TokenKind::Symbol);
            assert_eq!(&tok.text, word);
        }
    }

    #[test]
    fn comments_are_discarded() {
        assert_eq!(kinds("1 # trailing comment\n"), vec![
            TokenKind::Number,
            TokenKind::EndOfExpression(Terminator::Newline),
            TokenKind::EndOfInput,
        ]);
    }

    #[test]
    fn string_literal() {
        let mut stream = TokenStream::new("\"hello world\"").unwrap();
        let tok = stream.advance().unwrap();
        assert_eq!(tok.kind, TokenKind::String);
        assert_eq!(tok.text, "hello world");
    }

    #[test]
    fn unterminated_string_errors() {
        let mut stream = TokenStream::new("\"hello").unwrap();
        assert!(stream.advance().is_err());
    }

    #[test]
    fn offsets_are_one_based() {
        let mut stream = TokenStream::new("  ab").unwrap();
        let tok = stream.advance().unwrap();
        assert_eq!(tok.offset, 3);
    }

    #[test]
    fn multi_char_operators_prefer_longest_match() {
        let mut stream = TokenStream::new("<=").unwrap();
        let tok = stream.advance().unwrap();
        assert_eq!(tok.kind, TokenKind::Operator);
        assert_eq!(tok.text, "<=");
    }
}

#[cfg(test)]
mod fuzz {
    use proptest::prelude::*;

    use super::*;

    fn drain(source: &str) {
        let mut stream = match TokenStream::new(source) {
            Ok(s) => s,
            Err(_) => return,
        };
        loop {
            match stream.advance() {
                Ok(tok) if tok.is_eof() => break,
                Ok(_) => continue,
                Err(_) => break,
            }
        }
    }

    proptest! {
        #[test]
        fn doesnt_crash(s in "\\PC*") {
            drain(&s);
        }

        #[test]
        fn integers(s in "-?[0-9]+") {
            drain(&s);
        }

        #[test]
        fn small_positive_floats(s in "[0-9]{1,4}\\.[0-9]{1,4}") {
            drain(&s);
        }

        #[test]
        fn operators(s in "[+\\-*/^%!'<>=&|#]+") {
            drain(&s);
        }

        #[test]
        fn offsets_never_exceed_char_count(s in "[a-zA-Z0-9 \n;+\\-]*") {
            let char_count = s.chars().count() + 1;
            if let Ok(mut stream) = TokenStream::new(&s) {
                loop {
                    let tok = stream.advance().unwrap();
                    prop_assert!(tok.offset <= char_count);
                    if tok.is_eof() {
                        break;
                    }
                }
            }
        }
    }
}
