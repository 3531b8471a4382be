//! C, C++ and CUDA grammar.

use logos::{Lexer, Logos};

use super::{directive, Lexeme, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Dialect {
    C,
    Cpp,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Raw {
    #[regex(r"[ \t\r\n\x0B\x0C]+")]
    Whitespace,

    #[regex(r"\\\r?\n")]
    Continuation,

    #[regex(r"//([^\\\n]|\\\r?\n|\\[^\r\n])*")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    #[regex(r#"(u8|[uUL])?"([^"\\\n]|\\\r?\n|\\[^\r\n])*""#)]
    Str,

    #[regex(r#"(u8|[uUL])?'([^'\\\n]|\\\r?\n|\\[^\r\n])*'"#)]
    Char,

    // Runs to end of line; continuations, block comments and quoted
    // literals extend it.
    #[token("#", scan_directive)]
    Directive,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Name,

    #[regex(r"[0-9]([0-9A-Za-z_.']|[eEpP][+-])*")]
    #[regex(r"\.[0-9]([0-9A-Za-z_.']|[eEpP][+-])*")]
    Number,

    #[regex(r"[-+*/%=<>!&|^~?:.]")]
    Operator,

    #[regex(r"[(){}\[\];,]")]
    Punctuation,

    #[regex(r"[^\x00-\x7F]+")]
    NonAscii,
}

const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "_Alignas", "_Alignof", "_Atomic", "_Bool",
    "_Complex", "_Generic", "_Imaginary", "_Noreturn", "_Static_assert", "_Thread_local",
];

const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "bitand", "bitor", "bool", "catch", "class",
    "compl", "concept", "consteval", "constexpr", "constinit", "const_cast", "co_await",
    "co_return", "co_yield", "decltype", "delete", "dynamic_cast", "explicit", "export", "false",
    "friend", "mutable", "namespace", "new", "noexcept", "not", "not_eq", "nullptr", "operator",
    "or", "or_eq", "private", "protected", "public", "reinterpret_cast", "requires",
    "static_assert", "static_cast", "template", "this", "thread_local", "throw", "true", "try",
    "typeid", "typename", "using", "virtual", "wchar_t", "xor", "xor_eq",
];

fn scan_directive(lex: &mut Lexer<'_, Raw>) {
    let len = directive::body_len(lex.remainder());
    lex.bump(len);
}

impl Dialect {
    fn is_keyword(self, word: &str) -> bool {
        C_KEYWORDS.contains(&word) || (self == Dialect::Cpp && CPP_KEYWORDS.contains(&word))
    }
}

pub(super) fn lex(text: &str, dialect: Dialect) -> Vec<Lexeme<'_>> {
    let mut out = Vec::new();
    let mut lexer = Raw::lexer(text);

    while let Some(raw) = lexer.next() {
        let slice = lexer.slice();
        let kind = match raw {
            Ok(Raw::Directive) => {
                directive::split(slice, &mut out);
                continue;
            }
            Ok(Raw::Name) if dialect.is_keyword(slice) => TokenKind::Keyword,
            Ok(Raw::Name) => TokenKind::Name,
            Ok(Raw::Whitespace) | Ok(Raw::Continuation) => TokenKind::Whitespace,
            Ok(Raw::LineComment) | Ok(Raw::BlockComment) => TokenKind::Comment,
            Ok(Raw::Str) => TokenKind::StringLiteral,
            Ok(Raw::Char) => TokenKind::CharLiteral,
            Ok(Raw::Number) => TokenKind::Number,
            Ok(Raw::Operator) => TokenKind::Operator,
            Ok(Raw::Punctuation) => TokenKind::Punctuation,
            Ok(Raw::NonAscii) | Err(()) => TokenKind::Unknown,
        };
        out.push(Lexeme::new(kind, slice));
    }

    out
}
