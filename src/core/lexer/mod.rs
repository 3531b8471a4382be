//! Split a source file into an ordered, gap-free sequence of classified
//! lexemes.
//!
//! The grammar is chosen from the file extension. Concatenating the text of
//! every lexeme returned for an input reproduces that input byte for byte;
//! anything a grammar does not recognise is emitted as `TokenKind::Unknown`
//! rather than dropped.

mod c_family;
mod directive;
mod fortran;

use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};

/// Fine-grained lexical kinds reported by the grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Ordinary name: variable, function, type, macro use.
    Name,
    /// Reserved word of the language.
    Keyword,
    /// Preprocessor directive text (outside include targets and comments).
    Directive,
    /// `<header.h>` or `"header.h"` operand of an `#include`.
    IncludeTarget,
    Comment,
    StringLiteral,
    CharLiteral,
    Number,
    Operator,
    Punctuation,
    Whitespace,
    /// Fixed-form Fortran label or continuation column.
    Label,
    /// Input no grammar rule matched.
    Unknown,
}

/// A classified span of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

impl<'a> Lexeme<'a> {
    pub fn new(kind: TokenKind, text: &'a str) -> Self {
        Self { kind, text }
    }
}

/// Source languages with a grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    C,
    /// C++ and CUDA.
    Cpp,
    FortranFree,
    FortranFixed,
}

impl Language {
    /// Detect the grammar from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "c" | "h" => Some(Language::C),
            "cpp" | "hpp" | "cc" | "cxx" | "hh" | "hxx" | "cu" | "cuh" => Some(Language::Cpp),
            "f90" | "f95" | "f03" | "f08" => Some(Language::FortranFree),
            "f" | "f77" | "for" | "ftn" => Some(Language::FortranFixed),
            _ => None,
        }
    }

    /// Tokenize `text` with this language's grammar.
    pub fn lex(self, text: &str) -> Vec<Lexeme<'_>> {
        match self {
            Language::C => c_family::lex(text, c_family::Dialect::C),
            Language::Cpp => c_family::lex(text, c_family::Dialect::Cpp),
            Language::FortranFree => fortran::lex_free(text),
            Language::FortranFixed => fortran::lex_fixed(text),
        }
    }
}

/// Capability interface for turning a file's text into lexemes.
///
/// Implementations must return a sequence whose concatenated text equals
/// the input, and must fail with `lexer.unsupported_language` when they
/// have no grammar for the path.
pub trait Tokenizer: Sync {
    fn tokenize<'a>(&self, path: &Path, text: &'a str) -> Result<Vec<Lexeme<'a>>>;
}

/// Default tokenizer backed by the built-in C-family and Fortran grammars.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceLexer;

impl Tokenizer for SourceLexer {
    fn tokenize<'a>(&self, path: &Path, text: &'a str) -> Result<Vec<Lexeme<'a>>> {
        let language = Language::from_path(path).ok_or_else(|| {
            Error::lexer_unsupported_language(
                path.display().to_string(),
                path.extension().map(|e| e.to_string_lossy().to_string()),
            )
        })?;

        Ok(language.lex(text))
    }
}
