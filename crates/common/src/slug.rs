//! Slug generation.
//!
//! Derives URL-safe identifiers from human-readable titles. The unique-slug
//! collision loop lives in the topic service, next to the repository that
//! performs the existence checks; this module is the pure transform.

/// Derive a URL-safe slug from a title.
///
/// Lower-cases, folds common Latin diacritics to ASCII, maps runs of
/// non-alphanumeric characters to single hyphens, and trims leading and
/// trailing hyphens. Characters outside ASCII after folding are dropped.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for ch in title.chars() {
        for folded in fold_char(ch) {
            if folded.is_ascii_alphanumeric() {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(folded.to_ascii_lowercase());
            } else if folded.is_ascii_whitespace() || folded == '-' || folded == '_' {
                pending_hyphen = true;
            }
            // other punctuation is dropped without producing a separator
        }
    }

    slug
}

/// Fold a character to its ASCII equivalent(s).
///
/// Covers the Latin-1 and Latin Extended-A ranges that show up in
/// Portuguese, Spanish, French and German titles. Anything unmapped is
/// returned unchanged and later filtered by `slugify`.
fn fold_char(ch: char) -> impl Iterator<Item = char> {
    let folded: &str = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "a",
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => "i",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => "o",
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => "u",
        'ç' | 'Ç' => "c",
        'ñ' | 'Ñ' => "n",
        'ý' | 'ÿ' | 'Ý' => "y",
        'ß' => "ss",
        'æ' | 'Æ' => "ae",
        'ø' | 'Ø' => "o",
        _ => return FoldIter::Single(Some(ch)),
    };
    FoldIter::Str(folded.chars())
}

enum FoldIter<'a> {
    Single(Option<char>),
    Str(std::str::Chars<'a>),
}

impl Iterator for FoldIter<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        match self {
            Self::Single(ch) => ch.take(),
            Self::Str(chars) => chars.next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_slugify() {
        assert_eq!(slugify("Test Topic"), "test-topic");
        assert_eq!(slugify("Hello World"), "hello-world");
    }

    #[test]
    fn test_diacritics_folded() {
        assert_eq!(slugify("Programação Funcional"), "programacao-funcional");
        assert_eq!(slugify("Café com Rust"), "cafe-com-rust");
        assert_eq!(slugify("Straße"), "strasse");
    }

    #[test]
    fn test_punctuation_dropped() {
        assert_eq!(slugify("What's new in Rust?"), "whats-new-in-rust");
        assert_eq!(slugify("C++ vs. Rust!"), "c-vs-rust");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(slugify("  lots   of \t spaces  "), "lots-of-spaces");
        assert_eq!(slugify("snake_case_title"), "snake-case-title");
    }

    #[test]
    fn test_non_latin_dropped() {
        assert_eq!(slugify("日本語"), "");
        assert_eq!(slugify("rust 勉強会 meetup"), "rust-meetup");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }
}
