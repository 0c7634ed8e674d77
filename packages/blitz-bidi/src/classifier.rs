//! Character classification
//!
//! The resolver never looks up Unicode data directly. Every stage reads the
//! classification captured in [`CharRecord`]s, which are built once per call
//! through a [`Classifier`].

use unicode_bidi::{BidiDataSource, HardcodedBidiData};

use crate::tables;
use crate::types::{BidiClass, BracketInfo, CharRecord};

/// Source of per-character bidi properties.
///
/// Implementations must be pure: the same character always yields the same
/// answer for the lifetime of a resolution call.
pub trait Classifier: Send + Sync {
    /// Bidi_Class of `ch`
    fn category_of(&self, ch: char) -> BidiClass;

    /// Bidi_Paired_Bracket_Type and canonical pair of `ch`, if it is a bracket
    fn bracket_info(&self, ch: char) -> Option<BracketInfo>;

    /// Bidi_Mirrored property of `ch`
    fn mirrored(&self, ch: char) -> bool;

    /// Mirrored glyph to display for `ch` at an odd level
    fn mirror_glyph(&self, ch: char) -> Option<char> {
        tables::mirror_glyph(ch)
    }
}

impl<C: Classifier + ?Sized> Classifier for &C {
    fn category_of(&self, ch: char) -> BidiClass {
        (**self).category_of(ch)
    }

    fn bracket_info(&self, ch: char) -> Option<BracketInfo> {
        (**self).bracket_info(ch)
    }

    fn mirrored(&self, ch: char) -> bool {
        (**self).mirrored(ch)
    }

    fn mirror_glyph(&self, ch: char) -> Option<char> {
        (**self).mirror_glyph(ch)
    }
}

/// Classifier backed by the Unicode Character Database tables compiled into
/// `unicode-bidi` and this crate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnicodeClassifier;

impl Classifier for UnicodeClassifier {
    #[inline]
    fn category_of(&self, ch: char) -> BidiClass {
        HardcodedBidiData.bidi_class(ch)
    }

    fn bracket_info(&self, ch: char) -> Option<BracketInfo> {
        let matched = HardcodedBidiData.bidi_matched_opening_bracket(ch)?;
        Some(BracketInfo {
            pair_class: canonical_bracket(matched.opening),
            is_opening: matched.is_open,
        })
    }

    #[inline]
    fn mirrored(&self, ch: char) -> bool {
        tables::is_mirrored(ch)
    }
}

/// U+2329/U+232A are canonically equivalent to U+3008/U+3009 and must pair
/// with them (BD16)
#[inline]
fn canonical_bracket(opening: char) -> char {
    match opening {
        '\u{2329}' => '\u{3008}',
        other => other,
    }
}

/// Build one record per character. `offset` is added to each position so
/// that records of a paragraph keep their index in the whole input.
pub fn classify<C: Classifier + ?Sized>(
    classifier: &C,
    chars: &[char],
    offset: usize,
) -> Vec<CharRecord> {
    chars
        .iter()
        .enumerate()
        .map(|(i, &ch)| {
            let bracket = classifier.bracket_info(ch);
            // Paired brackets are always Bidi_Mirrored
            let mirrorable = classifier.mirrored(ch) || bracket.is_some();
            CharRecord::new(offset + i, ch, classifier.category_of(ch), bracket, mirrorable)
        })
        .collect()
}
