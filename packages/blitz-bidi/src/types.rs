//! BiDi types and data structures
//!
//! This module contains the per-character record shared by every resolver
//! stage, the base direction enum and the embedding level helpers.

use std::fmt;
use std::str::FromStr;

pub use unicode_bidi::BidiClass;

use crate::error::BidiError;

/// Deepest explicit embedding level a valid initiator may open (BD2).
pub const MAX_DEPTH: u8 = 125;

/// Capacity of the directional status stack: every level up to
/// `MAX_DEPTH` plus the paragraph sentinel, with one slot of headroom.
pub const MAX_STACK_DEPTH: usize = MAX_DEPTH as usize + 2;

/// Capacity of the bracket pair stack (BD16).
pub const MAX_BRACKET_DEPTH: usize = 63;

/// Text direction for bidi text processing
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
    Default,
)]
pub enum Direction {
    LeftToRight,
    RightToLeft,
    #[default]
    Auto,
}

impl Direction {
    /// Explicit paragraph level for this direction, `None` for `Auto`
    #[inline]
    pub const fn explicit_level(self) -> Option<u8> {
        match self {
            Direction::LeftToRight => Some(0),
            Direction::RightToLeft => Some(1),
            Direction::Auto => None,
        }
    }

    /// Direction implied by an embedding level (odd = RTL)
    #[inline]
    pub const fn from_level(level: u8) -> Self {
        if is_rtl_level(level) {
            Direction::RightToLeft
        } else {
            Direction::LeftToRight
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::LeftToRight => "ltr",
            Direction::RightToLeft => "rtl",
            Direction::Auto => "auto",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = BidiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Direction::Auto),
            "ltr" | "left-to-right" | "lefttoright" => Ok(Direction::LeftToRight),
            "rtl" | "right-to-left" | "righttoleft" => Ok(Direction::RightToLeft),
            _ => Err(BidiError::InvalidBaseDirection(s.to_string())),
        }
    }
}

/// Directional override in effect for a character (X4-X6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OverrideStatus {
    #[default]
    Neutral,
    ForcedL,
    ForcedR,
}

impl OverrideStatus {
    /// Class forced onto a character by this override, if any
    #[inline]
    pub const fn forced_class(self) -> Option<BidiClass> {
        match self {
            OverrideStatus::Neutral => None,
            OverrideStatus::ForcedL => Some(BidiClass::L),
            OverrideStatus::ForcedR => Some(BidiClass::R),
        }
    }
}

/// Paired bracket properties of a character (BidiBrackets.txt)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BracketInfo {
    /// Canonical opening bracket of the pair; both members of a pair share it
    pub pair_class: char,
    pub is_opening: bool,
}

/// Per-character state threaded through every resolver stage.
///
/// `category` is written once at classification time and never changed.
/// `class` starts as a copy of it and is rewritten by the explicit, weak,
/// neutral and bracket rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharRecord {
    /// Index of the character in the caller's input
    pub original_index: usize,
    pub ch: char,
    /// Bidi class reported by the classifier
    pub category: BidiClass,
    /// Working class, rewritten by the resolver stages
    pub class: BidiClass,
    pub bracket: Option<BracketInfo>,
    /// Classifier reports the character as Bidi_Mirrored
    pub mirrorable: bool,
    pub level: u8,
    pub override_status: OverrideStatus,
    /// Removed from consideration by X9 (embeddings, overrides, PDF, BN)
    pub removed: bool,
    /// Initiator that exceeded the nesting limit and opened nothing
    pub overflow: bool,
    /// Final L4 mirror flag
    pub mirrored: bool,
}

impl CharRecord {
    pub fn new(
        original_index: usize,
        ch: char,
        category: BidiClass,
        bracket: Option<BracketInfo>,
        mirrorable: bool,
    ) -> Self {
        Self {
            original_index,
            ch,
            category,
            class: category,
            bracket,
            mirrorable,
            level: 0,
            override_status: OverrideStatus::Neutral,
            removed: is_removed_by_x9(category),
            overflow: false,
            mirrored: false,
        }
    }

    #[inline]
    pub fn is_rtl(&self) -> bool {
        is_rtl_level(self.level)
    }
}

#[inline]
pub const fn is_rtl_level(level: u8) -> bool {
    level % 2 == 1
}

/// Strong class of the embedding direction at `level`
#[inline]
pub const fn level_class(level: u8) -> BidiClass {
    if is_rtl_level(level) {
        BidiClass::R
    } else {
        BidiClass::L
    }
}

/// Least odd level greater than `level`, if within `MAX_DEPTH`
#[inline]
pub const fn next_rtl_level(level: u8) -> Option<u8> {
    let next = if is_rtl_level(level) {
        level.saturating_add(2)
    } else {
        level.saturating_add(1)
    };
    if next <= MAX_DEPTH {
        Some(next)
    } else {
        None
    }
}

/// Least even level greater than `level`, if within `MAX_DEPTH`
#[inline]
pub const fn next_ltr_level(level: u8) -> Option<u8> {
    let next = if is_rtl_level(level) {
        level.saturating_add(1)
    } else {
        level.saturating_add(2)
    };
    if next <= MAX_DEPTH {
        Some(next)
    } else {
        None
    }
}

/// Classes ignored by every rule after X9
#[inline]
pub fn is_removed_by_x9(class: BidiClass) -> bool {
    use BidiClass::*;
    matches!(class, RLE | LRE | RLO | LRO | PDF | BN)
}

#[inline]
pub fn is_isolate_initiator(class: BidiClass) -> bool {
    matches!(class, BidiClass::LRI | BidiClass::RLI | BidiClass::FSI)
}

/// Neutral or isolate formatting character (NI in UAX #9)
#[inline]
pub fn is_neutral_or_isolate(class: BidiClass) -> bool {
    use BidiClass::*;
    matches!(class, B | S | WS | ON | FSI | LRI | RLI | PDI)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_helpers() {
        assert_eq!(next_rtl_level(0), Some(1));
        assert_eq!(next_rtl_level(1), Some(3));
        assert_eq!(next_ltr_level(0), Some(2));
        assert_eq!(next_ltr_level(1), Some(2));
        assert_eq!(next_rtl_level(124), Some(125));
        assert_eq!(next_rtl_level(125), None);
        assert_eq!(next_ltr_level(124), None);
        assert_eq!(level_class(4), BidiClass::L);
        assert_eq!(level_class(5), BidiClass::R);
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("auto".parse::<Direction>().unwrap(), Direction::Auto);
        assert_eq!("LTR".parse::<Direction>().unwrap(), Direction::LeftToRight);
        assert_eq!(
            " right-to-left ".parse::<Direction>().unwrap(),
            Direction::RightToLeft
        );
        assert!(matches!(
            "sideways".parse::<Direction>(),
            Err(BidiError::InvalidBaseDirection(ref s)) if s == "sideways"
        ));
    }

    #[test]
    fn test_record_marks_removed_classes() {
        let record = CharRecord::new(3, '\u{202A}', BidiClass::LRE, None, false);
        assert!(record.removed);
        assert_eq!(record.class, BidiClass::LRE);

        let record = CharRecord::new(0, 'a', BidiClass::L, None, false);
        assert!(!record.removed);
        assert_eq!(record.original_index, 0);
    }
}
