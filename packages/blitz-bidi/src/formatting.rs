//! Directional formatting helpers
//!
//! String-level utilities for wrapping text in explicit bidi controls,
//! repairing unbalanced controls and removing them again.

use std::fmt;
use std::str::FromStr;

use crate::error::BidiError;
use crate::types::{BidiClass, Direction};

pub const LRE: char = '\u{202A}';
pub const RLE: char = '\u{202B}';
pub const PDF: char = '\u{202C}';
pub const LRO: char = '\u{202D}';
pub const RLO: char = '\u{202E}';
pub const LRI: char = '\u{2066}';
pub const RLI: char = '\u{2067}';
pub const FSI: char = '\u{2068}';
pub const PDI: char = '\u{2069}';
pub const LRM: char = '\u{200E}';
pub const RLM: char = '\u{200F}';
pub const ALM: char = '\u{061C}';

/// Kind of explicit formatting used by [`envelope`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnvelopeMode {
    #[default]
    Isolate,
    Embedding,
    Override,
}

impl fmt::Display for EnvelopeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EnvelopeMode::Isolate => "isolate",
            EnvelopeMode::Embedding => "embedding",
            EnvelopeMode::Override => "override",
        })
    }
}

impl FromStr for EnvelopeMode {
    type Err = BidiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "isolate" => Ok(EnvelopeMode::Isolate),
            "embedding" | "embedded" => Ok(EnvelopeMode::Embedding),
            "override" => Ok(EnvelopeMode::Override),
            other => Err(BidiError::InvalidConfig(format!(
                "unknown envelope mode {other:?}"
            ))),
        }
    }
}

/// Explicit embedding and override initiators
#[inline]
pub fn is_embedding_initiator(ch: char) -> bool {
    matches!(ch, LRE | RLE | LRO | RLO)
}

#[inline]
pub fn is_isolate_initiator(ch: char) -> bool {
    matches!(ch, LRI | RLI | FSI)
}

/// Explicit directional formatting characters U+202A..U+202E and
/// U+2066..U+2069
#[inline]
pub fn is_format_char(ch: char) -> bool {
    matches!(ch, '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}')
}

/// Whether `text` needs the bidi algorithm at all: any right-to-left,
/// Arabic number or explicit formatting character
pub fn has_bidi_content(text: &str) -> bool {
    use BidiClass::*;
    text.chars().any(|ch| {
        matches!(
            unicode_bidi::bidi_class(ch),
            R | AL | AN | LRE | RLE | LRO | RLO | PDF | LRI | RLI | FSI | PDI
        )
    })
}

pub fn has_format_chars(text: &str) -> bool {
    text.chars().any(is_format_char)
}

/// Alphabetic (U+FB00..U+FB4F) or Arabic (U+FB50..U+FDFF, U+FE70..U+FEFF)
/// presentation form
#[inline]
pub fn is_presentation_form(ch: char) -> bool {
    matches!(ch, '\u{FB00}'..='\u{FDFF}' | '\u{FE70}'..='\u{FEFF}')
}

/// Whether `text` contains presentation-form characters, which usually
/// come from text extracted after shaping
pub fn has_presentation_forms(text: &str) -> bool {
    text.chars().any(is_presentation_form)
}

/// Wrap `text` in explicit formatting characters.
///
/// Isolates map `Auto` to FSI. Embeddings and overrides have no
/// first-strong form, so `Auto` falls back to right-to-left.
///
/// ```
/// use blitz_bidi::{envelope, Direction, EnvelopeMode};
///
/// assert_eq!(envelope("abc", Direction::Auto, EnvelopeMode::Isolate), "\u{2068}abc\u{2069}");
/// assert_eq!(envelope("abc", Direction::Auto, EnvelopeMode::Override), "\u{202E}abc\u{202C}");
/// ```
pub fn envelope(text: &str, direction: Direction, mode: EnvelopeMode) -> String {
    let (open, close) = match (mode, direction) {
        (EnvelopeMode::Isolate, Direction::LeftToRight) => (LRI, PDI),
        (EnvelopeMode::Isolate, Direction::RightToLeft) => (RLI, PDI),
        (EnvelopeMode::Isolate, Direction::Auto) => (FSI, PDI),
        (EnvelopeMode::Embedding, Direction::LeftToRight) => (LRE, PDF),
        (EnvelopeMode::Embedding, _) => (RLE, PDF),
        (EnvelopeMode::Override, Direction::LeftToRight) => (LRO, PDF),
        (EnvelopeMode::Override, _) => (RLO, PDF),
    };

    let mut out = String::with_capacity(text.len() + 6);
    out.push(open);
    out.push_str(text);
    out.push(close);
    out
}

/// Balance `text` and wrap it in an isolate, so it cannot affect the
/// ordering of surrounding text
pub fn isolate(text: &str, direction: Direction) -> String {
    envelope(&balance_format_chars(text), direction, EnvelopeMode::Isolate)
}

/// Drop terminators that close nothing and append the terminators missing
/// for unclosed initiators. PDFs close embeddings and overrides; PDIs close
/// isolates.
pub fn balance_format_chars(text: &str) -> String {
    if !has_format_chars(text) {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + 4);
    let mut embedding_depth = 0usize;
    let mut isolate_depth = 0usize;

    for ch in text.chars() {
        match ch {
            PDF => {
                if embedding_depth == 0 {
                    continue;
                }
                embedding_depth -= 1;
            }
            PDI => {
                if isolate_depth == 0 {
                    continue;
                }
                isolate_depth -= 1;
            }
            ch if is_embedding_initiator(ch) => embedding_depth += 1,
            ch if is_isolate_initiator(ch) => isolate_depth += 1,
            _ => {}
        }
        out.push(ch);
    }

    out.extend(std::iter::repeat(PDF).take(embedding_depth));
    out.extend(std::iter::repeat(PDI).take(isolate_depth));
    out
}

/// Remove every explicit directional formatting character
pub fn strip_format_chars(text: &str) -> String {
    text.chars().filter(|&ch| !is_format_char(ch)).collect()
}
