//! Resolving implicit levels (I1, I2)

use crate::types::{is_rtl_level, BidiClass, CharRecord};

/// Raise levels by resolved class. Returns the highest level in the
/// paragraph.
///
/// A character at the deepest explicit level (125) can reach 126 here; this
/// is the only place a level exceeds the explicit limit.
pub fn resolve_implicit(records: &mut [CharRecord]) -> u8 {
    use BidiClass::*;

    let mut max_level = 0;
    for record in records.iter_mut() {
        let raise = match (is_rtl_level(record.level), record.class) {
            // I1
            (false, R) => 1,
            (false, AN | EN) => 2,
            // I2
            (true, L | EN | AN) => 1,
            _ => 0,
        };
        record.level = record.level.saturating_add(raise);
        max_level = max_level.max(record.level);
    }
    max_level
}

/// Give characters removed by X9 the level of the preceding character, or
/// the paragraph level at the start, so they never break a level run.
pub fn assign_removed_levels(records: &mut [CharRecord], para_level: u8) {
    let mut prev_level = para_level;
    for record in records.iter_mut() {
        if record.removed {
            record.level = prev_level;
        }
        prev_level = record.level;
    }
}
