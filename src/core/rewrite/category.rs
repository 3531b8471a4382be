//! Collapse lexer kinds into the four categories the rewriter acts on.

use serde::Serialize;

use crate::lexer::TokenKind;

/// What the rewrite engine does with a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Whole-token exact lookup.
    Identifier,
    /// Word-boundary substitution inside the directive text.
    PreprocDirective,
    /// Whole-value lookup of an include operand.
    PreprocFileReference,
    /// Copied verbatim.
    Other,
}

/// Total, pure mapping from lexer kind to category. Literals, comments and
/// anything unrecognised are never rewritten.
pub fn classify(kind: TokenKind) -> Category {
    match kind {
        TokenKind::Name => Category::Identifier,
        TokenKind::Directive => Category::PreprocDirective,
        TokenKind::IncludeTarget => Category::PreprocFileReference,
        TokenKind::Keyword
        | TokenKind::Comment
        | TokenKind::StringLiteral
        | TokenKind::CharLiteral
        | TokenKind::Number
        | TokenKind::Operator
        | TokenKind::Punctuation
        | TokenKind::Whitespace
        | TokenKind::Label
        | TokenKind::Unknown => Category::Other,
    }
}
