//! Structural layout patterns and the matcher that checks token streams
//! against them.
//!
//! Patterns are compiled from a small DSL: literal keywords and punctuation,
//! single spaces for required whitespace, `EOL` / `EOL?` for end-of-line
//! markers, and `...` for a skip-any run bounded by the next literal.
//! `"do {...} while (...);EOL"` is a typical pattern. A [`PatternSet`] is
//! anchored at candidate tokens and reports at most one failure per anchor.

use crate::token::{TokenKind, TokenStream};
use thiserror::Error;

/// One compiled pattern element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternElement {
    /// The token text must match exactly.
    Literal(String),
    /// Exactly one space token is required.
    Whitespace,
    /// An end-of-line marker must follow, after optional blanks.
    EolRequired,
    /// An end-of-line marker may follow.
    EolOptional,
    /// Match anything up to the next literal element.
    SkipAny,
}

/// Context guard deciding whether a pattern anchors at a candidate token.
///
/// Several patterns can share an anchor literal (a `while` opens a loop but
/// also terminates a `do` body). The guard is the fixed dispatch table that
/// resolves which pattern owns an occurrence; it is data, not a heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorGuard {
    /// Anchor on the literal text alone.
    None,
    /// Skip a `while` that terminates a `do { ... }` body.
    NotDoWhileTail,
    /// Skip when the previous significant token is the given keyword.
    NotPrecededBy(&'static str),
    /// Anchor only when the next significant token is the given keyword.
    FollowedBy(&'static str),
}

/// Errors raised while compiling a pattern string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    /// The pattern string compiled to no elements.
    #[error("pattern is empty")]
    Empty,

    /// The first element must be a literal so the pattern can anchor.
    #[error("pattern {0:?} must start with a literal token")]
    NonLiteralAnchor(String),

    /// A skip-any element needs a following literal to terminate it.
    #[error("skip-any in pattern {0:?} is not followed by a literal")]
    DanglingSkip(String),
}

/// Why a pattern attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The layout deviates from the pattern at a specific token.
    Mismatch,
    /// A skip-any never found its terminating literal.
    NotTerminated,
    /// A bracket consumed by the pattern has no partner.
    UnbalancedBrackets,
}

impl FailureKind {
    /// Stable finding code for this failure kind.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Mismatch => "PatternMismatch",
            Self::NotTerminated => "PatternNotTerminated",
            Self::UnbalancedBrackets => "UnbalancedBrackets",
        }
    }
}

/// A failed pattern attempt: the deviation point and what was expected there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternFailure {
    /// Source DSL of the pattern that was attempted.
    pub pattern: String,
    /// Failure classification.
    pub kind: FailureKind,
    /// Token index of the deviation point.
    pub token_index: usize,
    /// Description of what the pattern required.
    pub expected: String,
    /// Description of what the stream held instead.
    pub found: String,
}

/// Outcome of checking a pattern set at an anchor token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternOutcome {
    /// Some pattern in the set matched completely.
    Matched,
    /// Every qualifying pattern failed; this is the best-guess failure.
    Failed(PatternFailure),
}

/// An immutable compiled pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    elements: Vec<PatternElement>,
    guard: AnchorGuard,
}

impl Pattern {
    /// Compiles a pattern from its DSL source.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] for empty patterns, patterns that do not
    /// begin with a literal, or skip-any elements without a terminator.
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        let elements = parse_elements(source);
        if elements.is_empty() {
            return Err(PatternError::Empty);
        }
        if !matches!(elements[0], PatternElement::Literal(_)) {
            return Err(PatternError::NonLiteralAnchor(source.to_string()));
        }
        for (i, element) in elements.iter().enumerate() {
            if *element == PatternElement::SkipAny
                && !matches!(elements.get(i + 1), Some(PatternElement::Literal(_)))
            {
                return Err(PatternError::DanglingSkip(source.to_string()));
            }
        }
        Ok(Self {
            source: source.to_string(),
            elements,
            guard: AnchorGuard::None,
        })
    }

    /// Attaches an anchor guard to this pattern.
    #[must_use]
    pub fn with_guard(mut self, guard: AnchorGuard) -> Self {
        self.guard = guard;
        self
    }

    /// The DSL source this pattern was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The literal text this pattern anchors on.
    #[must_use]
    pub fn anchor(&self) -> &str {
        match &self.elements[0] {
            PatternElement::Literal(text) => text,
            // Compile rejects non-literal anchors.
            _ => "",
        }
    }

    /// The compiled element sequence.
    #[must_use]
    pub fn elements(&self) -> &[PatternElement] {
        &self.elements
    }

    fn guard_allows(&self, stream: &TokenStream, index: usize) -> bool {
        match self.guard {
            AnchorGuard::None => true,
            AnchorGuard::NotPrecededBy(keyword) => stream
                .previous_significant(index)
                .and_then(|i| stream.get(i))
                .map_or(true, |t| t.text != keyword),
            AnchorGuard::FollowedBy(keyword) => stream
                .next_significant(index)
                .and_then(|i| stream.get(i))
                .is_some_and(|t| t.text == keyword),
            AnchorGuard::NotDoWhileTail => !is_do_while_tail(stream, index),
        }
    }

    /// Walks the pattern against the stream starting at `anchor`.
    ///
    /// # Errors
    ///
    /// Returns the [`PatternFailure`] describing the first deviation.
    pub fn match_at(&self, stream: &TokenStream, anchor: usize) -> Result<(), PatternFailure> {
        let mut cursor = anchor;
        // Stream indices of open brackets this pattern has consumed, so a
        // later skip-any can jump straight to the matching close bracket.
        let mut consumed_opens: Vec<(char, usize)> = Vec::new();

        let mut idx = 0;
        while idx < self.elements.len() {
            match &self.elements[idx] {
                PatternElement::Literal(text) => {
                    while stream.get(cursor).is_some_and(|t| t.kind == TokenKind::Comment) {
                        cursor += 1;
                    }
                    match stream.get(cursor) {
                        Some(token) if token.text == *text => {
                            if text == "{" {
                                consumed_opens.push(('{', cursor));
                            } else if text == "(" {
                                consumed_opens.push(('(', cursor));
                            }
                            cursor += 1;
                        }
                        Some(token) => {
                            return Err(self.fail(
                                FailureKind::Mismatch,
                                cursor,
                                format!("\"{text}\""),
                                describe(token.kind, &token.text),
                            ));
                        }
                        None => {
                            return Err(self.fail(
                                FailureKind::Mismatch,
                                stream.len().saturating_sub(1),
                                format!("\"{text}\""),
                                "end of file".to_string(),
                            ));
                        }
                    }
                }
                PatternElement::Whitespace => match stream.get(cursor) {
                    Some(token) if token.kind == TokenKind::Whitespace && token.text == " " => {
                        cursor += 1;
                    }
                    Some(token) => {
                        return Err(self.fail(
                            FailureKind::Mismatch,
                            cursor,
                            "a single space".to_string(),
                            describe(token.kind, &token.text),
                        ));
                    }
                    None => {
                        return Err(self.fail(
                            FailureKind::Mismatch,
                            stream.len().saturating_sub(1),
                            "a single space".to_string(),
                            "end of file".to_string(),
                        ));
                    }
                },
                PatternElement::EolRequired => {
                    let mut probe = cursor;
                    while stream
                        .get(probe)
                        .is_some_and(|t| t.kind == TokenKind::Whitespace)
                    {
                        probe += 1;
                    }
                    match stream.get(probe) {
                        Some(token) if token.kind == TokenKind::Eol => cursor = probe + 1,
                        // End of file terminates the last line.
                        None => cursor = probe,
                        Some(token) => {
                            return Err(self.fail(
                                FailureKind::Mismatch,
                                probe,
                                "end of line".to_string(),
                                describe(token.kind, &token.text),
                            ));
                        }
                    }
                }
                PatternElement::EolOptional => {
                    let mut probe = cursor;
                    while stream
                        .get(probe)
                        .is_some_and(|t| t.kind == TokenKind::Whitespace)
                    {
                        probe += 1;
                    }
                    if stream.get(probe).is_some_and(|t| t.kind == TokenKind::Eol) {
                        cursor = probe + 1;
                    }
                }
                PatternElement::SkipAny => {
                    let terminator = match self.elements.get(idx + 1) {
                        Some(PatternElement::Literal(text)) => text.clone(),
                        // Compile guarantees a literal follows.
                        _ => unreachable!("skip-any without terminator"),
                    };
                    cursor = self.skip_until(stream, cursor, &terminator, &consumed_opens)?;
                }
            }
            idx += 1;
        }
        Ok(())
    }

    /// Advances past a skip-any run, returning the index of the terminator.
    fn skip_until(
        &self,
        stream: &TokenStream,
        start: usize,
        terminator: &str,
        consumed_opens: &[(char, usize)],
    ) -> Result<usize, PatternFailure> {
        // When the terminator closes a bracket this pattern already opened,
        // nesting is resolved through the bracket pair itself.
        let opening = match terminator {
            "}" => Some('{'),
            ")" => Some('('),
            _ => None,
        };
        if let Some(open_char) = opening {
            if let Some(&(_, open_idx)) = consumed_opens.iter().rev().find(|(c, _)| *c == open_char)
            {
                return stream.matching_bracket(open_idx).map_err(|_| {
                    self.fail(
                        FailureKind::UnbalancedBrackets,
                        open_idx,
                        format!("\"{terminator}\""),
                        "no matching bracket before end of file".to_string(),
                    )
                });
            }
        }

        let mut cursor = start;
        let mut depth = 0usize;
        loop {
            match stream.get(cursor) {
                None => {
                    return Err(self.fail(
                        FailureKind::NotTerminated,
                        start,
                        format!("\"{terminator}\""),
                        "end of file".to_string(),
                    ));
                }
                Some(token) => {
                    if depth == 0 && token.text == terminator {
                        return Ok(cursor);
                    }
                    match token.kind {
                        TokenKind::OpenBrace => depth += 1,
                        TokenKind::CloseBrace => {
                            if depth == 0 {
                                return Err(self.fail(
                                    FailureKind::NotTerminated,
                                    start,
                                    format!("\"{terminator}\""),
                                    "end of enclosing block".to_string(),
                                ));
                            }
                            depth -= 1;
                        }
                        _ => {}
                    }
                    cursor += 1;
                }
            }
        }
    }

    fn fail(
        &self,
        kind: FailureKind,
        token_index: usize,
        expected: String,
        found: String,
    ) -> PatternFailure {
        PatternFailure {
            pattern: self.source.clone(),
            kind,
            token_index,
            expected,
            found,
        }
    }
}

/// An ordered set of patterns sharing one rule, tried independently per
/// anchor. Declaration order is the tie-break order.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Creates a set from already compiled patterns.
    #[must_use]
    pub fn new(patterns: Vec<Pattern>) -> Self {
        Self { patterns }
    }

    /// Compiles a set of guard-less patterns from their DSL sources.
    ///
    /// # Errors
    ///
    /// Propagates the first [`PatternError`].
    pub fn compile<'a, I>(sources: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let patterns = sources
            .into_iter()
            .map(Pattern::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// The patterns in declaration order.
    #[must_use]
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Checks all patterns anchored at `index`.
    ///
    /// Returns `None` when no pattern anchors here (wrong literal, or the
    /// guard assigns the occurrence to another pattern). Otherwise every
    /// qualifying pattern is attempted: any complete match wins, and when all
    /// fail, the single failure reported is the attempt that progressed
    /// furthest into the stream.
    #[must_use]
    pub fn check_at(&self, stream: &TokenStream, index: usize) -> Option<PatternOutcome> {
        let token = stream.get(index)?;
        let mut best: Option<PatternFailure> = None;
        let mut attempted = false;

        for pattern in &self.patterns {
            if pattern.anchor() != token.text || !pattern.guard_allows(stream, index) {
                continue;
            }
            attempted = true;
            match pattern.match_at(stream, index) {
                Ok(()) => return Some(PatternOutcome::Matched),
                Err(failure) => {
                    let further = best
                        .as_ref()
                        .map_or(true, |b| failure.token_index > b.token_index);
                    if further {
                        best = Some(failure);
                    }
                }
            }
        }

        if !attempted {
            return None;
        }
        best.map(PatternOutcome::Failed)
    }
}

/// Returns true when the token at `index` is the `while` tail of a
/// `do { ... } while (...)` statement.
fn is_do_while_tail(stream: &TokenStream, index: usize) -> bool {
    let Some(prev) = stream.previous_significant(index) else {
        return false;
    };
    if stream.get(prev).map(|t| t.kind) != Some(TokenKind::CloseBrace) {
        return false;
    }
    let Ok(open) = stream.matching_bracket(prev) else {
        return false;
    };
    stream
        .previous_significant(open)
        .and_then(|i| stream.get(i))
        .is_some_and(|t| t.text == "do")
}

fn parse_elements(source: &str) -> Vec<PatternElement> {
    let mut elements = Vec::new();
    let mut rest = source;
    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix("...") {
            elements.push(PatternElement::SkipAny);
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("EOL?") {
            elements.push(PatternElement::EolOptional);
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("EOL") {
            elements.push(PatternElement::EolRequired);
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix(' ') {
            elements.push(PatternElement::Whitespace);
            rest = tail;
        } else if rest
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        {
            let end = rest
                .find(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'))
                .unwrap_or(rest.len());
            elements.push(PatternElement::Literal(rest[..end].to_string()));
            rest = &rest[end..];
        } else {
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                elements.push(PatternElement::Literal(c.to_string()));
            }
            rest = chars.as_str();
        }
    }
    elements
}

fn describe(kind: TokenKind, text: &str) -> String {
    match kind {
        TokenKind::Eol => "end of line".to_string(),
        TokenKind::Whitespace => format!("whitespace \"{}\"", text.escape_default()),
        _ => format!("\"{text}\""),
    }
}
