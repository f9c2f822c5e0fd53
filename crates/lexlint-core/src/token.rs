//! Token stream model: the immutable, randomly-indexable input to all rules.
//!
//! A [`TokenStream`] is built once per file from the lexemes an external
//! tokenizer produced. The engine never re-tokenizes; it only inspects the
//! stream through the lookup helpers defined here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Language keyword (`do`, `while`, `function`, ...).
    Keyword,
    /// Bare identifier.
    Identifier,
    /// Sigil-prefixed identifier (e.g. `$name`).
    Variable,
    /// Single punctuation character that is not a bracket.
    Punctuation,
    /// Horizontal whitespace (spaces and tabs, no newlines).
    Whitespace,
    /// End-of-line marker.
    Eol,
    /// Line or block comment.
    Comment,
    /// `{`
    OpenBrace,
    /// `}`
    CloseBrace,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// Anything the tokenizer could not classify further.
    Other,
}

impl TokenKind {
    /// Returns true for tokens that carry layout only (whitespace, newlines,
    /// comments) and are skipped by the significant-token helpers.
    #[must_use]
    pub fn is_significant(self) -> bool {
        !matches!(self, Self::Whitespace | Self::Eol | Self::Comment)
    }
}

/// Position and extent of a token in the source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset from the start of the file.
    pub offset: usize,
    /// Length of the token text in bytes.
    pub length: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub fn new(line: usize, column: usize, offset: usize, length: usize) -> Self {
        Self {
            line,
            column,
            offset,
            length,
        }
    }
}

/// A single lexical token. Produced once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token classification.
    pub kind: TokenKind,
    /// Raw lexeme text.
    pub text: String,
    /// Position in the stream (gapless, 0-indexed).
    pub index: usize,
    /// Position in the source file.
    pub span: Span,
}

/// Kind of a named scope boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Function or method body.
    Function,
    /// Class body.
    Class,
}

/// An enclosing function/class boundary resolved from brace nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    /// Scope classification.
    pub kind: ScopeKind,
    /// Index of the opening brace token.
    pub opener: usize,
    /// Index of the matching closing brace token.
    pub closer: usize,
}

/// Errors raised by token stream construction and lookups.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The tokenizer handed over a malformed token. This is a programming
    /// contract violation, not a style finding, and aborts the file.
    #[error("invalid input token at index {index}: {reason}")]
    InvalidInput {
        /// Index of the offending token.
        index: usize,
        /// What the contract check rejected.
        reason: String,
    },

    /// An index past the end of the stream was requested.
    #[error("token index {index} out of bounds (stream length {len})")]
    OutOfBounds {
        /// Requested index.
        index: usize,
        /// Stream length.
        len: usize,
    },

    /// A bracket lookup was attempted on a non-bracket token.
    #[error("token at index {index} is not a bracket")]
    NotABracket {
        /// Requested index.
        index: usize,
    },

    /// No partner bracket exists before the stream boundary.
    #[error("no matching bracket for token at index {index}")]
    UnbalancedBrackets {
        /// Index of the unpartnered bracket.
        index: usize,
    },
}

/// Immutable, ordered sequence of tokens for one source file.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Builds a stream from `(kind, text)` lexemes in source order, computing
    /// line/column/offset spans by accumulating the lexeme texts.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidInput`] when a lexeme violates the
    /// tokenizer contract (empty text, or structural kinds whose text does
    /// not match the kind). Well-formed tokenizer output never trips this.
    pub fn from_lexemes<I>(lexemes: I) -> Result<Self, StreamError>
    where
        I: IntoIterator<Item = (TokenKind, String)>,
    {
        let mut tokens = Vec::new();
        let mut line = 1usize;
        let mut column = 1usize;
        let mut offset = 0usize;

        for (index, (kind, text)) in lexemes.into_iter().enumerate() {
            validate_lexeme(index, kind, &text)?;

            let span = Span::new(line, column, offset, text.len());
            offset += text.len();
            let newlines = text.matches('\n').count();
            if newlines > 0 {
                line += newlines;
                let tail = text.rsplit('\n').next().unwrap_or("");
                column = tail.chars().count() + 1;
            } else {
                column += text.chars().count();
            }

            tokens.push(Token {
                kind,
                text,
                index,
                span,
            });
        }

        Ok(Self { tokens })
    }

    /// Number of tokens in the stream.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true when the stream holds no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at `index`, if in bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Iterates the tokens in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    /// Index of the nearest significant token after `index`.
    #[must_use]
    pub fn next_significant(&self, index: usize) -> Option<usize> {
        self.tokens[index.saturating_add(1).min(self.tokens.len())..]
            .iter()
            .find(|t| t.kind.is_significant())
            .map(|t| t.index)
    }

    /// Index of the nearest significant token before `index`.
    #[must_use]
    pub fn previous_significant(&self, index: usize) -> Option<usize> {
        self.tokens[..index.min(self.tokens.len())]
            .iter()
            .rev()
            .find(|t| t.kind.is_significant())
            .map(|t| t.index)
    }

    /// Finds the partner of the bracket at `index`, honoring nesting.
    ///
    /// # Errors
    ///
    /// [`StreamError::UnbalancedBrackets`] when no partner exists before the
    /// stream boundary; [`StreamError::NotABracket`] /
    /// [`StreamError::OutOfBounds`] on contract misuse.
    pub fn matching_bracket(&self, index: usize) -> Result<usize, StreamError> {
        let token = self.tokens.get(index).ok_or(StreamError::OutOfBounds {
            index,
            len: self.tokens.len(),
        })?;

        let (partner, forward) = match token.kind {
            TokenKind::OpenBrace => (TokenKind::CloseBrace, true),
            TokenKind::OpenParen => (TokenKind::CloseParen, true),
            TokenKind::CloseBrace => (TokenKind::OpenBrace, false),
            TokenKind::CloseParen => (TokenKind::OpenParen, false),
            _ => return Err(StreamError::NotABracket { index }),
        };

        let mut depth = 0usize;
        if forward {
            for t in &self.tokens[index + 1..] {
                if t.kind == token.kind {
                    depth += 1;
                } else if t.kind == partner {
                    if depth == 0 {
                        return Ok(t.index);
                    }
                    depth -= 1;
                }
            }
        } else {
            for t in self.tokens[..index].iter().rev() {
                if t.kind == token.kind {
                    depth += 1;
                } else if t.kind == partner {
                    if depth == 0 {
                        return Ok(t.index);
                    }
                    depth -= 1;
                }
            }
        }

        Err(StreamError::UnbalancedBrackets { index })
    }

    /// Resolves the nearest enclosing function/class body around `index` by
    /// scanning outward through brace nesting.
    ///
    /// Returns `None` at file scope, and also when the surrounding brackets
    /// are unbalanced — scope-dependent rules then treat the position as
    /// file-level rather than failing the whole file.
    #[must_use]
    pub fn enclosing_scope(&self, index: usize) -> Option<Scope> {
        if index >= self.tokens.len() {
            return None;
        }

        let mut depth = 0usize;
        let mut j = index;
        while j > 0 {
            j -= 1;
            match self.tokens[j].kind {
                TokenKind::CloseBrace => depth += 1,
                TokenKind::OpenBrace => {
                    if depth > 0 {
                        depth -= 1;
                        continue;
                    }
                    // Unmatched opener: an enclosing block. Plain blocks
                    // (loops, conditionals) are skipped; only function and
                    // class bodies name a scope.
                    if let Some(kind) = self.scope_introducer(j) {
                        let closer = self.matching_bracket(j).ok()?;
                        return Some(Scope {
                            kind,
                            opener: j,
                            closer,
                        });
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Classifies the block opened at `open` by scanning back through its
    /// introducing statement (`function name(...)`, `class Name extends ...`).
    fn scope_introducer(&self, open: usize) -> Option<ScopeKind> {
        let mut j = open;
        while j > 0 {
            j -= 1;
            let token = &self.tokens[j];
            match token.kind {
                TokenKind::Whitespace | TokenKind::Eol | TokenKind::Comment => {}
                TokenKind::CloseParen => {
                    // Jump over a parameter list.
                    j = self.matching_bracket(j).ok()?;
                }
                TokenKind::Identifier | TokenKind::Variable | TokenKind::Other => {}
                TokenKind::Punctuation => {
                    if token.text == ";" {
                        return None;
                    }
                }
                TokenKind::Keyword => match token.text.as_str() {
                    "function" => return Some(ScopeKind::Function),
                    "class" => return Some(ScopeKind::Class),
                    _ => {}
                },
                TokenKind::OpenBrace | TokenKind::CloseBrace | TokenKind::OpenParen => {
                    return None;
                }
            }
        }
        None
    }
}

fn validate_lexeme(index: usize, kind: TokenKind, text: &str) -> Result<(), StreamError> {
    let reject = |reason: &str| {
        Err(StreamError::InvalidInput {
            index,
            reason: reason.to_string(),
        })
    };

    if text.is_empty() {
        return reject("empty token text");
    }
    match kind {
        TokenKind::OpenBrace if text != "{" => reject("open brace text must be \"{\""),
        TokenKind::CloseBrace if text != "}" => reject("close brace text must be \"}\""),
        TokenKind::OpenParen if text != "(" => reject("open paren text must be \"(\""),
        TokenKind::CloseParen if text != ")" => reject("close paren text must be \")\""),
        TokenKind::Eol if text != "\n" && text != "\r\n" => {
            reject("end-of-line text must be a newline")
        }
        TokenKind::Whitespace if text.contains('\n') => {
            reject("whitespace must not contain newlines")
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testlex::lex;

    #[test]
    fn spans_are_gapless_and_monotonic() {
        let stream = lex("if ($a) {\n\treturn;\n}\n");
        let mut offset = 0;
        for (i, token) in stream.iter().enumerate() {
            assert_eq!(token.index, i);
            assert_eq!(token.span.offset, offset);
            offset += token.span.length;
        }
    }

    #[test]
    fn line_and_column_tracking() {
        let stream = lex("$a;\n\t$b;\n");
        let b = stream
            .iter()
            .find(|t| t.text == "$b")
            .map(|t| t.span.clone())
            .unwrap();
        assert_eq!(b.line, 2);
        assert_eq!(b.column, 2);
    }

    #[test]
    fn rejects_empty_lexeme() {
        let result = TokenStream::from_lexemes(vec![(TokenKind::Identifier, String::new())]);
        assert!(matches!(result, Err(StreamError::InvalidInput { .. })));
    }

    #[test]
    fn rejects_mislabeled_bracket() {
        let result = TokenStream::from_lexemes(vec![(TokenKind::OpenBrace, "(".to_string())]);
        assert!(matches!(
            result,
            Err(StreamError::InvalidInput { index: 0, .. })
        ));
    }

    #[test]
    fn next_and_previous_significant_skip_layout() {
        let stream = lex("} \n else");
        let else_idx = stream.iter().position(|t| t.text == "else").unwrap();
        assert_eq!(stream.next_significant(0), Some(else_idx));
        assert_eq!(stream.previous_significant(else_idx), Some(0));
        assert_eq!(stream.previous_significant(0), None);
        assert_eq!(stream.next_significant(else_idx), None);
    }

    #[test]
    fn matching_bracket_nested() {
        let stream = lex("{ ( ) { } }");
        let open = 0;
        let close = stream.matching_bracket(open).unwrap();
        assert_eq!(stream.get(close).unwrap().text, "}");
        assert_eq!(stream.matching_bracket(close).unwrap(), open);

        let inner_open = stream.iter().position(|t| t.text == "(").unwrap();
        let inner_close = stream.matching_bracket(inner_open).unwrap();
        assert_eq!(stream.get(inner_close).unwrap().text, ")");
    }

    #[test]
    fn matching_bracket_unbalanced() {
        let stream = lex("{ ( }");
        let open = stream.iter().position(|t| t.text == "(").unwrap();
        assert!(matches!(
            stream.matching_bracket(open),
            Err(StreamError::UnbalancedBrackets { .. })
        ));
    }

    #[test]
    fn matching_bracket_contract_errors() {
        let stream = lex("$a");
        assert!(matches!(
            stream.matching_bracket(0),
            Err(StreamError::NotABracket { index: 0 })
        ));
        assert!(matches!(
            stream.matching_bracket(9),
            Err(StreamError::OutOfBounds { index: 9, .. })
        ));
    }

    #[test]
    fn enclosing_scope_function() {
        let stream = lex("function foo() {\n\t$bar = 1;\n}\n");
        let var = stream.iter().position(|t| t.text == "$bar").unwrap();
        let scope = stream.enclosing_scope(var).unwrap();
        assert_eq!(scope.kind, ScopeKind::Function);
        assert_eq!(stream.get(scope.opener).unwrap().text, "{");
        assert_eq!(stream.get(scope.closer).unwrap().text, "}");
    }

    #[test]
    fn enclosing_scope_class_member() {
        let stream = lex("class Foo extends Bar {\n\tpublic $strTable;\n}\n");
        let var = stream.iter().position(|t| t.text == "$strTable").unwrap();
        let scope = stream.enclosing_scope(var).unwrap();
        assert_eq!(scope.kind, ScopeKind::Class);
    }

    #[test]
    fn enclosing_scope_method_inside_class() {
        let stream = lex("class Foo {\n\tfunction bar() {\n\t\t$x = 1;\n\t}\n}\n");
        let var = stream.iter().position(|t| t.text == "$x").unwrap();
        let scope = stream.enclosing_scope(var).unwrap();
        // The nearest named scope is the method, not the class.
        assert_eq!(scope.kind, ScopeKind::Function);
    }

    #[test]
    fn enclosing_scope_skips_plain_blocks() {
        let stream = lex("function foo() {\n\tif ($a) {\n\t\t$y = 2;\n\t}\n}\n");
        let var = stream.iter().position(|t| t.text == "$y").unwrap();
        let scope = stream.enclosing_scope(var).unwrap();
        assert_eq!(scope.kind, ScopeKind::Function);
    }

    #[test]
    fn enclosing_scope_at_file_level() {
        let stream = lex("$top = 1;\n");
        assert!(stream.enclosing_scope(0).is_none());
    }

    #[test]
    fn enclosing_scope_unbalanced_treated_as_file_level() {
        // The class body never closes; scope lookup degrades to file level.
        let stream = lex("class Foo {\n\tpublic $str_table;\n");
        let var = stream.iter().position(|t| t.text == "$str_table").unwrap();
        assert!(stream.enclosing_scope(var).is_none());
    }
}
