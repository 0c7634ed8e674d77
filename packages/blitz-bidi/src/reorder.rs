//! Reordering resolved levels (L1, L2, L4)
//!
//! Each paragraph is treated as a single line; line breaking is left to the
//! caller.

use crate::types::{is_rtl_level, BidiClass, CharRecord};

/// Reset separators and trailing whitespace to the paragraph level (L1).
///
/// Works on the classifier categories, not the resolved classes. Removed
/// characters inside a whitespace sequence are reset with it.
pub fn reset_whitespace_levels(records: &mut [CharRecord], para_level: u8) {
    use BidiClass::*;

    let mut reset_from: Option<usize> = None;
    for i in 0..records.len() {
        match records[i].category {
            B | S => {
                let from = reset_from.unwrap_or(i);
                for record in &mut records[from..=i] {
                    record.level = para_level;
                }
                reset_from = None;
            }
            WS | FSI | LRI | RLI | PDI | RLE | LRE | RLO | LRO | PDF | BN => {
                reset_from.get_or_insert(i);
            }
            _ => reset_from = None,
        }
    }

    if let Some(from) = reset_from {
        for record in &mut records[from..] {
            record.level = para_level;
        }
    }
}

/// Visual order of record indices (L2): from the highest level down to the
/// lowest odd level, reverse every maximal span at or above that level.
///
/// Removed characters are still present in the returned order.
pub fn visual_order(records: &[CharRecord]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..records.len()).collect();

    let Some(max_level) = records.iter().map(|r| r.level).max() else {
        return order;
    };
    let min_level = records.iter().map(|r| r.level).min().unwrap_or(0);
    let lowest_odd = if is_rtl_level(min_level) {
        min_level
    } else {
        min_level + 1
    };

    let mut level = max_level;
    while level >= lowest_odd {
        let mut pos = 0;
        while pos < order.len() {
            if records[order[pos]].level < level {
                pos += 1;
                continue;
            }
            let start = pos;
            while pos < order.len() && records[order[pos]].level >= level {
                pos += 1;
            }
            order[start..pos].reverse();
        }
        level -= 1;
    }

    order
}

/// Set the L4 mirror flag: mirrorable characters at odd levels
pub fn assign_mirroring(records: &mut [CharRecord]) {
    for record in records.iter_mut() {
        record.mirrored = record.mirrorable && !record.removed && is_rtl_level(record.level);
    }
}

/// Run L1, L4 and L2 over one paragraph and return the visual order as
/// original indices, without removed characters
pub fn reorder(records: &mut [CharRecord], para_level: u8) -> Vec<usize> {
    reset_whitespace_levels(records, para_level);
    assign_mirroring(records);

    let order = visual_order(records);
    log::trace!("reordered {} characters", records.len());

    order
        .into_iter()
        .filter(|&i| !records[i].removed)
        .map(|i| records[i].original_index)
        .collect()
}
