//! Explicit levels and directions (X1-X9)
//!
//! Walks the paragraph once with a directional status stack. Embedding and
//! override controls are kept in the record array as `BN` placeholders
//! rather than deleted, so indices stay stable for every later stage.

use arrayvec::ArrayVec;

use crate::error::{Diagnostic, OverflowKind};
use crate::paragraph::detect_base_level;
use crate::types::{
    is_isolate_initiator, next_ltr_level, next_rtl_level, BidiClass, CharRecord, OverrideStatus,
    MAX_STACK_DEPTH,
};

/// Entry of the directional status stack
#[derive(Debug, Clone, Copy)]
struct Status {
    level: u8,
    override_status: OverrideStatus,
    isolate: bool,
}

/// Bounded directional status stack (BD2: 125 levels plus the paragraph
/// entry).
struct DirectionalStatusStack {
    entries: ArrayVec<Status, MAX_STACK_DEPTH>,
}

impl DirectionalStatusStack {
    fn new(para_level: u8) -> Self {
        let mut entries = ArrayVec::new();
        entries.push(Status {
            level: para_level,
            override_status: OverrideStatus::Neutral,
            isolate: false,
        });
        Self { entries }
    }

    /// The paragraph entry is never popped, so the stack is never empty
    #[inline]
    fn last(&self) -> Status {
        match self.entries.last() {
            Some(status) => *status,
            None => unreachable!("directional status stack lost its paragraph entry"),
        }
    }

    #[inline]
    fn push(&mut self, status: Status) -> bool {
        self.entries.try_push(status).is_ok()
    }

    /// Pop entries up to and including the last isolate entry (X6a)
    fn pop_isolate(&mut self) {
        while self.entries.len() > 1 {
            if let Some(status) = self.entries.pop() {
                if status.isolate {
                    break;
                }
            }
        }
    }

    /// Pop a non-isolate entry (X7)
    fn pop_embedding(&mut self) {
        if self.entries.len() >= 2 && !self.last().isolate {
            self.entries.pop();
        }
    }
}

/// Index of the PDI matching each isolate initiator (BD9), `None` for every
/// other record and for initiators left open at the paragraph end
pub fn matching_pdis(records: &[CharRecord]) -> Vec<Option<usize>> {
    let mut matches = vec![None; records.len()];
    let mut open = Vec::new();

    for (i, record) in records.iter().enumerate() {
        if is_isolate_initiator(record.category) {
            open.push(i);
        } else if record.category == BidiClass::PDI {
            if let Some(initiator) = open.pop() {
                matches[initiator] = Some(i);
            }
        }
    }
    matches
}

/// Apply X1-X9 to one paragraph.
///
/// On return every record carries its explicit level and override status,
/// removed characters have class `BN`, and overflowing initiators are
/// flagged with `overflow` and reported in `diagnostics`.
pub fn resolve_explicit(
    records: &mut [CharRecord],
    para_level: u8,
    diagnostics: &mut Vec<Diagnostic>,
) {
    use BidiClass::*;

    let pdi_of = matching_pdis(records);

    // X1
    let mut stack = DirectionalStatusStack::new(para_level);
    let mut overflow_isolate_count = 0u32;
    let mut overflow_embedding_count = 0u32;
    let mut valid_isolate_count = 0u32;

    for i in 0..records.len() {
        match records[i].category {
            // X2-X5c
            RLE | LRE | RLO | LRO | RLI | LRI | FSI => {
                let category = records[i].category;
                let last = stack.last();
                let is_isolate = matches!(category, RLI | LRI | FSI);

                records[i].level = last.level;
                if is_isolate {
                    records[i].override_status = last.override_status;
                    if let Some(forced) = last.override_status.forced_class() {
                        records[i].class = forced;
                    }
                }

                let can_push = overflow_isolate_count == 0 && overflow_embedding_count == 0;
                let rtl = match category {
                    RLE | RLO | RLI => true,
                    // X5c: FSI behaves as RLI when its content up to the
                    // matching PDI starts RTL. Skipped once nesting overflowed.
                    FSI if can_push => {
                        let end = pdi_of[i].unwrap_or(records.len());
                        let content = records[i + 1..end].iter().map(|r| r.category);
                        detect_base_level(content) == Some(1)
                    }
                    _ => false,
                };
                let new_level = if rtl {
                    next_rtl_level(last.level)
                } else {
                    next_ltr_level(last.level)
                };

                let pushed = match new_level {
                    Some(level) if can_push => {
                        stack.push(Status {
                            level,
                            override_status: match category {
                                RLO => OverrideStatus::ForcedR,
                                LRO => OverrideStatus::ForcedL,
                                _ => OverrideStatus::Neutral,
                            },
                            isolate: is_isolate,
                        })
                    }
                    _ => false,
                };

                if pushed {
                    if is_isolate {
                        valid_isolate_count += 1;
                    } else {
                        records[i].level = stack.last().level;
                    }
                } else {
                    records[i].overflow = true;
                    let kind = if is_isolate {
                        overflow_isolate_count += 1;
                        OverflowKind::Isolate
                    } else {
                        if overflow_isolate_count == 0 {
                            overflow_embedding_count += 1;
                        }
                        OverflowKind::Embedding
                    };
                    diagnostics.push(Diagnostic::NestingOverflow {
                        position: records[i].original_index,
                        kind,
                    });
                }

                // X9: embeddings and overrides stay as BN placeholders
                if !is_isolate {
                    records[i].class = BN;
                }
            }

            // X6a
            PDI => {
                if overflow_isolate_count > 0 {
                    overflow_isolate_count -= 1;
                } else if valid_isolate_count > 0 {
                    overflow_embedding_count = 0;
                    stack.pop_isolate();
                    valid_isolate_count -= 1;
                }
                let last = stack.last();
                records[i].level = last.level;
                records[i].override_status = last.override_status;
                if let Some(forced) = last.override_status.forced_class() {
                    records[i].class = forced;
                }
            }

            // X7
            PDF => {
                if overflow_isolate_count > 0 {
                    // matched an overflowed isolate's content; ignored
                } else if overflow_embedding_count > 0 {
                    overflow_embedding_count -= 1;
                } else {
                    stack.pop_embedding();
                }
                records[i].level = stack.last().level;
                records[i].class = BN;
            }

            // X8
            B => {
                records[i].level = para_level;
            }

            // X6
            _ => {
                let last = stack.last();
                records[i].level = last.level;
                if records[i].category != BN {
                    records[i].override_status = last.override_status;
                    if let Some(forced) = last.override_status.forced_class() {
                        records[i].class = forced;
                    }
                }
            }
        }
    }

    log::trace!(
        "explicit levels resolved for {} characters, {} diagnostics",
        records.len(),
        diagnostics.len()
    );
}
