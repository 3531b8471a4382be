//! Fortran grammar, free form and fixed form.
//!
//! Fixed form is handled line by line: comment lines are recognised from
//! column 1, the label and continuation columns are split off, and the
//! statement text is lexed with the free-form rules.

use logos::{Lexer, Logos};

use super::{directive, Lexeme, TokenKind};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Raw {
    #[regex(r"[ \t\r\n\x0C]+")]
    Whitespace,

    #[regex(r"![^\n]*")]
    Comment,

    #[regex(r#""([^"\n]|"")*""#)]
    #[regex(r#"'([^'\n]|'')*'"#)]
    Str,

    #[token("#", scan_directive)]
    Directive,

    #[regex(r"[A-Za-z][A-Za-z0-9_$]*")]
    Name,

    #[regex(r"[0-9]+(\.[0-9]*)?([eEdDqQ][+-]?[0-9]+)?(_[A-Za-z0-9_]+)?")]
    #[regex(r"\.[0-9]+([eEdDqQ][+-]?[0-9]+)?(_[A-Za-z0-9_]+)?")]
    Number,

    #[regex(r"\.[A-Za-z]+\.")]
    DotOperator,

    #[regex(r"[-+*/=<>%&:.]")]
    Operator,

    #[regex(r"[(),;\[\]]")]
    Punctuation,

    #[regex(r"[^\x00-\x7F]+")]
    NonAscii,
}

fn scan_directive(lex: &mut Lexer<'_, Raw>) {
    let len = directive::body_len(lex.remainder());
    lex.bump(len);
}

const KEYWORDS: &[&str] = &[
    "abstract", "allocatable", "allocate", "assign", "associate", "backspace", "bind", "block",
    "blockdata", "call", "case", "character", "class", "close", "common", "complex", "contains",
    "continue", "cycle", "data", "deallocate", "default", "dimension", "do", "double", "else",
    "elseif", "elsewhere", "end", "enddo", "endif", "entry", "enum", "enumerator", "equivalence",
    "exit", "extends", "external", "final", "forall", "format", "function", "generic", "goto",
    "if", "implicit", "import", "in", "include", "inout", "integer", "intent", "interface",
    "intrinsic", "kind", "len", "logical", "module", "namelist", "none", "nullify", "only",
    "open", "optional", "out", "parameter", "pass", "pause", "pointer", "precision", "print",
    "private", "procedure", "program", "protected", "public", "pure", "read", "real",
    "recursive", "result", "return", "rewind", "save", "select", "sequence", "stop",
    "subroutine", "target", "then", "type", "use", "value", "volatile", "where", "while",
    "write",
];

fn is_keyword(word: &str) -> bool {
    KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word))
}

pub(super) fn lex_free(text: &str) -> Vec<Lexeme<'_>> {
    let mut out = Vec::new();
    lex_into(text, &mut out);
    out
}

pub(super) fn lex_fixed(text: &str) -> Vec<Lexeme<'_>> {
    let mut out = Vec::new();

    for line in text.split_inclusive('\n') {
        let body = line.strip_suffix('\n').unwrap_or(line);
        let newline = &line[body.len()..];

        if is_comment_line(body) {
            out.push(Lexeme::new(TokenKind::Comment, body));
        } else if let Some((label, statement)) = split_label(body) {
            out.push(Lexeme::new(TokenKind::Label, label));
            lex_into(statement, &mut out);
        } else {
            lex_into(body, &mut out);
        }

        if !newline.is_empty() {
            out.push(Lexeme::new(TokenKind::Whitespace, newline));
        }
    }

    out
}

fn is_comment_line(line: &str) -> bool {
    matches!(line.chars().next(), Some('c' | 'C' | '*' | '!'))
}

/// Split columns 1-6 (statement label plus continuation mark) from the
/// statement, when the line is laid out in fixed columns.
fn split_label(line: &str) -> Option<(&str, &str)> {
    let head = line.get(..6)?;
    let (label, mark) = head.split_at(5);

    let label_ok = label.bytes().all(|b| b == b' ' || b.is_ascii_digit());
    let mark_ok = mark.bytes().all(|b| b.is_ascii_graphic() || b == b' ');
    if label_ok && mark_ok {
        Some((head, &line[6..]))
    } else {
        None
    }
}

fn lex_into<'a>(text: &'a str, out: &mut Vec<Lexeme<'a>>) {
    let mut lexer = Raw::lexer(text);

    while let Some(raw) = lexer.next() {
        let slice = lexer.slice();
        let kind = match raw {
            Ok(Raw::Directive) => {
                directive::split(slice, out);
                continue;
            }
            Ok(Raw::Name) if is_keyword(slice) => TokenKind::Keyword,
            Ok(Raw::Name) => TokenKind::Name,
            Ok(Raw::Whitespace) => TokenKind::Whitespace,
            Ok(Raw::Comment) => TokenKind::Comment,
            Ok(Raw::Str) => TokenKind::StringLiteral,
            Ok(Raw::Number) => TokenKind::Number,
            Ok(Raw::DotOperator) | Ok(Raw::Operator) => TokenKind::Operator,
            Ok(Raw::Punctuation) => TokenKind::Punctuation,
            Ok(Raw::NonAscii) | Err(()) => TokenKind::Unknown,
        };
        out.push(Lexeme::new(kind, slice));
    }
}
