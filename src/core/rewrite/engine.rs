//! Apply an `IdentifierMap` to classified tokens.
//!
//! The map is category-agnostic; the token's category only selects how the
//! text is matched:
//! - identifiers are looked up whole,
//! - directive text is searched for whole words (`[A-Za-z0-9_]` runs),
//! - include operands are looked up whole, then by the name between their
//!   `<>` / `""` delimiters.
//!
//! Output order is input order; nothing is merged, dropped or reordered.

use std::borrow::Cow;
use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::category::{classify, Category};
use crate::error::Result;
use crate::identifier_map::IdentifierMap;
use crate::lexer::{Lexeme, Tokenizer};

/// A classified span of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub category: Category,
    pub text: &'a str,
}

impl<'a> From<Lexeme<'a>> for Token<'a> {
    fn from(lexeme: Lexeme<'a>) -> Self {
        Token {
            category: classify(lexeme.kind),
            text: lexeme.text,
        }
    }
}

/// Transformed text of one input plus whether anything differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    pub text: String,
    pub changed: bool,
    /// Number of individual substitutions made.
    pub replacements: usize,
}

/// Lex `text` (grammar chosen from `path`) and rewrite it.
pub fn rewrite_source(
    tokenizer: &dyn Tokenizer,
    path: &Path,
    text: &str,
    map: &IdentifierMap,
) -> Result<RewriteResult> {
    let lexemes = tokenizer.tokenize(path, text)?;
    Ok(rewrite_tokens(lexemes.into_iter().map(Token::from), map))
}

/// Rewrite an ordered token sequence.
pub fn rewrite_tokens<'a, I>(tokens: I, map: &IdentifierMap) -> RewriteResult
where
    I: IntoIterator<Item = Token<'a>>,
{
    let mut text = String::new();
    let mut changed = false;
    let mut replacements = 0;

    for token in tokens {
        let (rewritten, count) = rewrite_token(token, map);
        changed |= rewritten != token.text;
        replacements += count;
        text.push_str(&rewritten);
    }

    RewriteResult {
        text,
        changed,
        replacements,
    }
}

fn rewrite_token<'a>(token: Token<'a>, map: &IdentifierMap) -> (Cow<'a, str>, usize) {
    match token.category {
        Category::Identifier => replace_whole(token.text, map),
        Category::PreprocDirective => replace_words(token.text, map),
        Category::PreprocFileReference => replace_file_reference(token.text, map),
        Category::Other => (Cow::Borrowed(token.text), 0),
    }
}

fn replace_whole<'a>(text: &'a str, map: &IdentifierMap) -> (Cow<'a, str>, usize) {
    match map.get(text) {
        Some(new) if new != text => (Cow::Owned(new.to_string()), 1),
        _ => (Cow::Borrowed(text), 0),
    }
}

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[A-Za-z0-9_]+").expect("word pattern is valid"))
}

/// Replace every mapped whole word. A run of `[A-Za-z0-9_]` is only ever
/// looked up in full, so `foo` never matches inside `foobar` or `1foo`.
fn replace_words<'a>(text: &'a str, map: &IdentifierMap) -> (Cow<'a, str>, usize) {
    let mut count = 0;
    let replaced = word_pattern().replace_all(text, |caps: &Captures<'_>| {
        let word = &caps[0];
        match map.get(word) {
            Some(new) if new != word => {
                count += 1;
                new.to_string()
            }
            _ => word.to_string(),
        }
    });

    if count == 0 {
        return (Cow::Borrowed(text), 0);
    }
    (Cow::Owned(replaced.into_owned()), count)
}

fn replace_file_reference<'a>(text: &'a str, map: &IdentifierMap) -> (Cow<'a, str>, usize) {
    if map.contains(text) {
        return replace_whole(text, map);
    }

    let Some(inner) = strip_include_delimiters(text) else {
        return (Cow::Borrowed(text), 0);
    };

    match map.get(inner) {
        Some(new) if new != inner => {
            // Delimiters are single ASCII bytes.
            let open = &text[..1];
            let close = &text[text.len() - 1..];
            (Cow::Owned(format!("{}{}{}", open, new, close)), 1)
        }
        _ => (Cow::Borrowed(text), 0),
    }
}

fn strip_include_delimiters(text: &str) -> Option<&str> {
    text.strip_prefix('<')
        .and_then(|t| t.strip_suffix('>'))
        .or_else(|| text.strip_prefix('"').and_then(|t| t.strip_suffix('"')))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::SourceLexer;

    fn map(pairs: &[(&str, &str)]) -> IdentifierMap {
        pairs.iter().copied().collect()
    }

    fn rewrite(path: &str, text: &str, map: &IdentifierMap) -> RewriteResult {
        rewrite_source(&SourceLexer, Path::new(path), text, map).unwrap()
    }

    #[test]
    fn identifiers_are_replaced_whole() {
        let m = map(&[("fclaw2d_domain_t", "fclaw_domain_t")]);
        let result = rewrite("a.c", "fclaw2d_domain_t *d; fclaw2d_domain_t_x y;", &m);
        assert_eq!(result.text, "fclaw_domain_t *d; fclaw2d_domain_t_x y;");
        assert!(result.changed);
        assert_eq!(result.replacements, 1);
    }

    #[test]
    fn strings_and_comments_are_untouched() {
        let m = map(&[("old", "new")]);
        let text = "/* old */ puts(\"old\"); // old\nchar c = 'o';\n";
        let result = rewrite("a.c", text, &m);
        assert_eq!(result.text, text);
        assert!(!result.changed);
    }

    #[test]
    fn directive_words_respect_boundaries() {
        let m = map(&[("foo", "bar")]);
        assert_eq!(rewrite("a.h", "#define foobar 1\n", &m).text, "#define foobar 1\n");
        assert_eq!(rewrite("a.h", "#define foo 1\n", &m).text, "#define bar 1\n");
        assert_eq!(rewrite("a.h", "#define X 1foo\n", &m).text, "#define X 1foo\n");
    }

    #[test]
    fn directive_replaces_every_occurrence() {
        let m = map(&[("FCLAW2D_SPACEDIM", "FCLAW_SPACEDIM"), ("fclaw2d_f", "fclaw_f")]);
        let result = rewrite(
            "a.h",
            "#define G(x) fclaw2d_f(x, FCLAW2D_SPACEDIM) + fclaw2d_f(FCLAW2D_SPACEDIM)\n",
            &m,
        );
        assert_eq!(
            result.text,
            "#define G(x) fclaw_f(x, FCLAW_SPACEDIM) + fclaw_f(FCLAW_SPACEDIM)\n"
        );
        assert_eq!(result.replacements, 4);
    }

    #[test]
    fn directive_comments_are_untouched() {
        let m = map(&[("old", "new")]);
        let result = rewrite("a.h", "#if old /* old */\n#endif // old\n", &m);
        assert_eq!(result.text, "#if new /* old */\n#endif // old\n");
    }

    #[test]
    fn file_reference_exact_value() {
        let m = map(&[("<old.h>", "<new.h>")]);
        assert_eq!(rewrite("a.c", "#include <old.h>\n", &m).text, "#include <new.h>\n");
        let untouched = rewrite("a.c", "#include <oldx.h>\n", &m);
        assert_eq!(untouched.text, "#include <oldx.h>\n");
        assert!(!untouched.changed);
    }

    #[test]
    fn file_reference_inner_name_keeps_delimiters() {
        let m = map(&[("old_name.h", "new_name.h")]);
        assert_eq!(
            rewrite("a.c", "#include \"old_name.h\"\n#include <old_name.h>\n", &m).text,
            "#include \"new_name.h\"\n#include <new_name.h>\n"
        );
    }

    #[test]
    fn same_name_in_two_categories_is_rewritten_consistently() {
        let m = map(&[("old_func", "new_func")]);
        let result = rewrite("a.c", "#define CALL old_func()\nvoid old_func(void);\n", &m);
        assert_eq!(result.text, "#define CALL new_func()\nvoid new_func(void);\n");
        assert_eq!(result.replacements, 2);
    }

    #[test]
    fn code_after_directive_with_comment_opener_in_string_is_rewritten() {
        let m = map(&[("old_func", "new_func")]);
        let result = rewrite(
            "a.c",
            "#define PAT \"dir/*.c\"\nint old_func(void);\n/* old_func */\n",
            &m,
        );
        assert_eq!(
            result.text,
            "#define PAT \"dir/*.c\"\nint new_func(void);\n/* old_func */\n"
        );
        assert!(result.changed);
        assert_eq!(result.replacements, 1);
    }

    #[test]
    fn keywords_are_never_rewritten() {
        let m = map(&[("int", "long")]);
        let result = rewrite("a.c", "int x;\n", &m);
        assert!(!result.changed);
    }

    #[test]
    fn identity_entries_do_not_count_as_changes() {
        let m = map(&[("same", "same")]);
        let result = rewrite("a.c", "#define same same\nsame();\n", &m);
        assert!(!result.changed);
        assert_eq!(result.replacements, 0);
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let m = map(&[
            ("old_a", "new_a"),
            ("<old.h>", "<new.h>"),
            ("OLD_MACRO", "NEW_MACRO"),
        ]);
        let text =
            "#include <old.h>\n#ifdef OLD_MACRO\nint old_a = OLD_MACRO; /* old_a */\n#endif\n";
        let first = rewrite("a.cpp", text, &m);
        assert!(first.changed);

        let second = rewrite("a.cpp", &first.text, &m);
        assert!(!second.changed);
        assert_eq!(second.text, first.text);
    }

    #[test]
    fn fortran_calls_are_rewritten() {
        let m = map(&[("fclaw2d_map_c2m", "fclaw_map_2d_c2m")]);
        let result = rewrite("m.f90", "call fclaw2d_map_c2m(cont) ! fclaw2d_map_c2m\n", &m);
        assert_eq!(result.text, "call fclaw_map_2d_c2m(cont) ! fclaw2d_map_c2m\n");
    }

    #[test]
    fn plain_token_sequences_can_be_rewritten_directly() {
        let m = map(&[("a", "b")]);
        let tokens = [
            Token {
                category: Category::Identifier,
                text: "a",
            },
            Token {
                category: Category::Other,
                text: " a ",
            },
            Token {
                category: Category::PreprocDirective,
                text: "#if a",
            },
        ];
        let result = rewrite_tokens(tokens, &m);
        assert_eq!(result.text, "b a #if b");
    }
}
