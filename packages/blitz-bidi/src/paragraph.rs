//! Paragraph splitting and base level detection (P1-P3)

use std::ops::Range;

use crate::classifier::Classifier;
use crate::config::ParagraphSeparators;
use crate::types::{BidiClass, CharRecord, Direction};

/// One paragraph's records plus its resolved base level.
///
/// Paragraphs never share state, so each one can be resolved on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    /// Character range of this paragraph in the whole input
    pub range: Range<usize>,
    /// 0 for LTR, 1 for RTL
    pub base_level: u8,
    pub records: Vec<CharRecord>,
}

impl Paragraph {
    /// Wrap classified records, running P2/P3 when `direction` is `Auto`
    pub fn new(range: Range<usize>, records: Vec<CharRecord>, direction: Direction) -> Self {
        let base_level = direction.explicit_level().unwrap_or_else(|| {
            detect_base_level(records.iter().map(|r| r.category)).unwrap_or(0)
        });

        log::debug!(
            "paragraph {:?}: base level {} ({} requested)",
            range,
            base_level,
            direction
        );

        Self {
            range,
            base_level,
            records,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Split `chars` into paragraph ranges (P1).
///
/// The separator stays at the end of the paragraph it terminates, and a
/// CR LF pair is kept together as one separator. Text after the last
/// separator forms a final paragraph; no empty paragraph is produced after
/// a trailing separator.
pub fn split_paragraphs<C: Classifier + ?Sized>(
    chars: &[char],
    separators: &ParagraphSeparators,
    classifier: &C,
) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if separators.is_separator(ch, classifier.category_of(ch)) {
            let mut end = i + 1;
            if ch == '\r' && chars.get(end) == Some(&'\n') {
                end += 1;
            }
            ranges.push(start..end);
            start = end;
            i = end;
        } else {
            i += 1;
        }
    }

    if start < chars.len() {
        ranges.push(start..chars.len());
    }

    ranges
}

/// Find the paragraph level from the first strong character (P2, P3).
///
/// Characters between an isolate initiator and its matching PDI are
/// skipped. Returns `None` when no strong character is found. Also used for
/// the content of an FSI, bounded by its matching PDI.
pub fn detect_base_level<I>(classes: I) -> Option<u8>
where
    I: IntoIterator<Item = BidiClass>,
{
    use BidiClass::*;

    let mut isolate_depth = 0usize;
    for class in classes {
        match class {
            LRI | RLI | FSI => isolate_depth += 1,
            PDI if isolate_depth > 0 => isolate_depth -= 1,
            L if isolate_depth == 0 => return Some(0),
            R | AL if isolate_depth == 0 => return Some(1),
            _ => {}
        }
    }
    None
}
