//! Splitting text into contiguous tokens.
//!
//! Tokens borrow from the source and tile it exactly: concatenating them
//! gives back the input byte for byte, and any run of tokens maps back to a
//! single slice of the source through [`Tokens::span`].

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

use crate::engine::Granularity;

/// A text split into contiguous tokens.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    source: &'a str,
    /// Byte offset of every token start, followed by `source.len()`.
    offsets: Vec<usize>,
    pieces: Vec<&'a str>,
}

impl<'a> Tokens<'a> {
    /// Splits into lines, each keeping its trailing `\n`.
    ///
    /// A `\r\n` ending stays inside its line.
    #[must_use]
    pub fn lines(source: &'a str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(at, _)| at + 1))
            .filter(|&at| at < source.len());
        Self::from_starts(source, starts)
    }

    /// Splits into words, whitespace runs and single punctuation characters.
    ///
    /// Apostrophes between letters belong to the word ("don't").
    #[must_use]
    pub fn words(source: &'a str) -> Self {
        let mut starts = Vec::new();
        let mut previous = None;
        let mut chars = source.char_indices().peekable();

        while let Some((at, c)) = chars.next() {
            let mut class = CharClass::of(c);
            if class == CharClass::Other
                && is_apostrophe(c)
                && previous == Some(CharClass::Word)
                && chars
                    .peek()
                    .is_some_and(|&(_, next)| CharClass::of(next) == CharClass::Word)
            {
                class = CharClass::Word;
            }
            if class == CharClass::Other || previous != Some(class) {
                starts.push(at);
            }
            previous = Some(class);
        }

        Self::from_starts(source, starts)
    }

    /// Splits into extended grapheme clusters.
    #[must_use]
    pub fn graphemes(source: &'a str) -> Self {
        Self::from_starts(source, source.grapheme_indices(true).map(|(at, _)| at))
    }

    /// Splits at the given in-line granularity.
    #[must_use]
    pub fn split(source: &'a str, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Word => Self::words(source),
            Granularity::Char => Self::graphemes(source),
        }
    }

    fn from_starts(source: &'a str, starts: impl IntoIterator<Item = usize>) -> Self {
        let mut offsets: Vec<usize> = starts.into_iter().collect();
        offsets.push(source.len());
        let pieces = offsets
            .windows(2)
            .map(|pair| &source[pair[0]..pair[1]])
            .collect();
        Self {
            source,
            offsets,
            pieces,
        }
    }

    /// The tokens as string slices.
    #[must_use]
    pub fn pieces(&self) -> &[&'a str] {
        &self.pieces
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Returns true if the source was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// The source slice covered by a range of tokens.
    ///
    /// # Panics
    ///
    /// Panics if the range ends past the last token.
    #[must_use]
    pub fn span(&self, range: Range<usize>) -> &'a str {
        &self.source[self.offsets[range.start]..self.offsets[range.end]]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Word,
    Space,
    Other,
}

impl CharClass {
    fn of(c: char) -> Self {
        if c.is_alphanumeric() || c == '_' {
            Self::Word
        } else if c.is_whitespace() {
            Self::Space
        } else {
            Self::Other
        }
    }
}

fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_keep_terminators() {
        let tokens = Tokens::lines("one\ntwo\r\nthree");
        assert_eq!(tokens.pieces(), ["one\n", "two\r\n", "three"]);
        assert_eq!(tokens.span(1..3), "two\r\nthree");
    }

    #[test]
    fn test_lines_trailing_newline_adds_no_empty_token() {
        assert_eq!(Tokens::lines("a\n\nb\n").pieces(), ["a\n", "\n", "b\n"]);
        assert!(Tokens::lines("").is_empty());
    }

    #[test]
    fn test_words_split_classes() {
        let tokens = Tokens::words("Hello,  world! don't stop");
        assert_eq!(
            tokens.pieces(),
            ["Hello", ",", "  ", "world", "!", " ", "don't", " ", "stop"]
        );
    }

    #[test]
    fn test_words_trailing_apostrophe_is_punctuation() {
        assert_eq!(Tokens::words("dogs' toys").pieces(), ["dogs", "'", " ", "toys"]);
    }

    #[test]
    fn test_words_repeated_punctuation_stays_separate() {
        assert_eq!(Tokens::words("wait...").pieces(), ["wait", ".", ".", "."]);
    }

    #[test]
    fn test_graphemes_keep_combining_marks() {
        let tokens = Tokens::graphemes("cafe\u{301}!");
        assert_eq!(tokens.pieces(), ["c", "a", "f", "e\u{301}", "!"]);
    }

    #[test]
    fn test_tokens_tile_source() {
        let source = "Grandma's garden\n\tgrew  tomatoes, 🍅 and more.";
        for tokens in [
            Tokens::lines(source),
            Tokens::words(source),
            Tokens::graphemes(source),
        ] {
            assert_eq!(tokens.pieces().concat(), source);
            assert_eq!(tokens.span(0..tokens.len()), source);
            assert_eq!(tokens.span(1..1), "");
        }
    }
}
