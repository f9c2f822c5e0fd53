//! Minimal lexer used by tests to build token streams from source snippets.
//!
//! Compiled into downstream test suites through the `testlex` feature; not
//! part of the public API.

use crate::token::{TokenKind, TokenStream};

const KEYWORDS: &[&str] = &[
    "do", "while", "for", "foreach", "if", "else", "elseif", "function", "class", "extends",
    "return", "echo", "true", "false", "null", "new", "public", "private", "protected", "static",
    "as",
];

/// Lexes a source snippet into a token stream.
///
/// Panics on input the stream model rejects; test fixtures are expected to
/// be well formed.
pub fn lex(src: &str) -> TokenStream {
    let mut lexemes = Vec::new();
    let mut chars = src.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            '\n' => {
                chars.next();
                lexemes.push((TokenKind::Eol, "\n".to_string()));
            }
            ' ' | '\t' => {
                let mut text = String::new();
                while let Some(&w) = chars.peek() {
                    if w == ' ' || w == '\t' {
                        text.push(w);
                        chars.next();
                    } else {
                        break;
                    }
                }
                lexemes.push((TokenKind::Whitespace, text));
            }
            '{' => {
                chars.next();
                lexemes.push((TokenKind::OpenBrace, "{".to_string()));
            }
            '}' => {
                chars.next();
                lexemes.push((TokenKind::CloseBrace, "}".to_string()));
            }
            '(' => {
                chars.next();
                lexemes.push((TokenKind::OpenParen, "(".to_string()));
            }
            ')' => {
                chars.next();
                lexemes.push((TokenKind::CloseParen, ")".to_string()));
            }
            '$' => {
                let mut text = String::from(c);
                chars.next();
                while let Some(&w) = chars.peek() {
                    if w.is_alphanumeric() || w == '_' {
                        text.push(w);
                        chars.next();
                    } else {
                        break;
                    }
                }
                lexemes.push((TokenKind::Variable, text));
            }
            '/' => {
                chars.next();
                if chars.peek() == Some(&'/') {
                    let mut text = String::from("/");
                    while let Some(&w) = chars.peek() {
                        if w == '\n' {
                            break;
                        }
                        text.push(w);
                        chars.next();
                    }
                    lexemes.push((TokenKind::Comment, text));
                } else {
                    lexemes.push((TokenKind::Punctuation, "/".to_string()));
                }
            }
            _ if c.is_alphabetic() || c == '_' => {
                let mut text = String::new();
                while let Some(&w) = chars.peek() {
                    if w.is_alphanumeric() || w == '_' {
                        text.push(w);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let kind = if KEYWORDS.contains(&text.as_str()) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                };
                lexemes.push((kind, text));
            }
            _ if c.is_ascii_digit() => {
                let mut text = String::new();
                while let Some(&w) = chars.peek() {
                    if w.is_ascii_digit() {
                        text.push(w);
                        chars.next();
                    } else {
                        break;
                    }
                }
                lexemes.push((TokenKind::Other, text));
            }
            _ => {
                chars.next();
                lexemes.push((TokenKind::Punctuation, c.to_string()));
            }
        }
    }

    TokenStream::from_lexemes(lexemes).expect("test fixture should lex cleanly")
}
