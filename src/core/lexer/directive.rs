//! Preprocessor directive scanning and splitting.
//!
//! `body_len` finds where a `#...` line ends: at the first newline outside
//! a backslash continuation, a block comment or a quoted literal. `split`
//! then turns the line into lexemes: the include operand becomes an
//! `IncludeTarget`, embedded C comments become `Comment`, and everything
//! else stays `Directive` text.

use std::sync::OnceLock;

use regex::Regex;

use super::{Lexeme, TokenKind};

fn include_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^#[ \t]*include(?:_next)?[ \t]*(<[^>\n]*>|"[^"\n]*")"#)
            .expect("include pattern is valid")
    })
}

/// Quoted literals (closing quote optional at end of line) and comments.
/// Literals are matched only so that `/*` or `//` inside them is skipped.
fn literal_or_comment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?s)"(?:[^"\\\n]|\\.)*"?|'(?:[^'\\\n]|\\.)*'?|/\*.*?(?:\*/|$)|//[^\n]*"#)
            .expect("literal/comment pattern is valid")
    })
}

/// Length in bytes of a directive body, `rest` being the text after `#`.
/// The terminating newline is not included.
pub(super) fn body_len(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => break,
            b'\\' => i += escape_len(&bytes[i..]),
            b'"' | b'\'' => i += quoted_len(&bytes[i..]),
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += rest[i + 2..].find("*/").map_or(bytes.len() - i, |end| end + 4);
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += if bytes[i] == b'\\' { escape_len(&bytes[i..]) } else { 1 };
                }
            }
            _ => i += 1,
        }
    }

    i.min(bytes.len())
}

/// A backslash plus what it escapes; `\` + newline is a line splice.
fn escape_len(bytes: &[u8]) -> usize {
    match bytes.get(1) {
        Some(b'\r') if bytes.get(2) == Some(&b'\n') => 3,
        Some(_) => 2,
        None => 1,
    }
}

/// A quoted literal starting at `bytes[0]`. An unterminated literal ends
/// before the newline.
fn quoted_len(bytes: &[u8]) -> usize {
    let quote = bytes[0];
    let mut j = 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\n' => return j,
            b'\\' => j += escape_len(&bytes[j..]),
            c if c == quote => return j + 1,
            _ => j += 1,
        }
    }
    bytes.len()
}

pub(super) fn split<'a>(text: &'a str, out: &mut Vec<Lexeme<'a>>) {
    let target = include_pattern()
        .captures(text)
        .and_then(|caps| caps.get(1));

    match target {
        Some(target) => {
            push_segment(&text[..target.start()], out);
            out.push(Lexeme::new(TokenKind::IncludeTarget, target.as_str()));
            push_segment(&text[target.end()..], out);
        }
        None => push_segment(text, out),
    }
}

fn push_segment<'a>(segment: &'a str, out: &mut Vec<Lexeme<'a>>) {
    let mut last = 0;
    for found in literal_or_comment_pattern().find_iter(segment) {
        if !found.as_str().starts_with('/') {
            continue;
        }
        push_non_empty(TokenKind::Directive, &segment[last..found.start()], out);
        push_non_empty(TokenKind::Comment, found.as_str(), out);
        last = found.end();
    }
    push_non_empty(TokenKind::Directive, &segment[last..], out);
}

fn push_non_empty<'a>(kind: TokenKind, text: &'a str, out: &mut Vec<Lexeme<'a>>) {
    if !text.is_empty() {
        out.push(Lexeme::new(kind, text));
    }
}
