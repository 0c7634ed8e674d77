//! Resolving weak types (W1-W7)
//!
//! The rules are defined as seven passes over the sequence. They are folded
//! into one left-to-right walk here, keeping the class each neighbour had
//! before the later rules rewrote it, followed by a separate W7 pass.

use crate::sequence::IsolatingRunSequence;
use crate::types::{BidiClass, CharRecord};

/// Resolve weak types of one isolating run sequence in place
pub fn resolve_weak(sequence: &IsolatingRunSequence, records: &mut [CharRecord]) {
    use BidiClass::*;

    // Previous class as seen by W4/W6, before W4 rewrote it
    let mut prev_class_before_w4 = sequence.sos;
    // Previous class as seen by W5
    let mut prev_class_before_w5 = sequence.sos;
    // Previous class as seen by W1, untouched by the other rules
    let mut prev_class_before_w1 = sequence.sos;
    let mut last_strong_is_al = false;
    let mut et_run_indices = Vec::<usize>::new();
    let mut bn_run_indices = Vec::new();

    for (run_index, level_run) in sequence.runs.iter().enumerate() {
        for i in level_run.clone() {
            if records[i].class == BN {
                // Removed characters adjacent to an ET run join it (W5)
                bn_run_indices.push(i);
                continue;
            }

            let mut w2_class = records[i].class;

            // W1
            if records[i].class == NSM {
                records[i].class = match prev_class_before_w1 {
                    RLI | LRI | FSI | PDI => ON,
                    class => class,
                };
                w2_class = records[i].class;
            }
            prev_class_before_w1 = records[i].class;

            // W2, W3
            match records[i].class {
                EN if last_strong_is_al => records[i].class = AN,
                AL => records[i].class = R,
                _ => {}
            }
            match w2_class {
                L | R => last_strong_is_al = false,
                AL => last_strong_is_al = true,
                _ => {}
            }

            let class_before_w456 = records[i].class;

            match records[i].class {
                // W5: ETs before an EN
                EN => {
                    for &j in &et_run_indices {
                        records[j].class = EN;
                    }
                    et_run_indices.clear();
                }

                // W4, W6 for separators
                ES | CS => {
                    let mut next_class = sequence
                        .iter_forwards_from(i + 1, run_index)
                        .map(|j| records[j].class)
                        .find(|&class| class != BN)
                        .unwrap_or(sequence.eos);
                    if next_class == EN && last_strong_is_al {
                        next_class = AN;
                    }
                    records[i].class = match (prev_class_before_w4, records[i].class, next_class) {
                        (EN, ES, EN) | (EN, CS, EN) => EN,
                        (AN, CS, AN) => AN,
                        _ => ON,
                    };

                    // Removed characters next to a separator that became ON
                    // follow it, before W5 can mistake them for an ET run
                    if records[i].class == ON {
                        for idx in sequence.iter_backwards_from(i, run_index) {
                            if records[idx].class != BN {
                                break;
                            }
                            records[idx].class = ON;
                        }
                        for idx in sequence.iter_forwards_from(i + 1, run_index) {
                            if records[idx].class != BN {
                                break;
                            }
                            records[idx].class = ON;
                        }
                    }
                }

                // W5: ETs after an EN
                ET => match prev_class_before_w5 {
                    EN => records[i].class = EN,
                    _ => {
                        et_run_indices.extend(&bn_run_indices);
                        et_run_indices.push(i);
                    }
                },

                _ => {}
            }

            bn_run_indices.clear();

            prev_class_before_w5 = records[i].class;

            // W6 for terminators not adjacent to an EN
            if prev_class_before_w5 != ET {
                for &j in &et_run_indices {
                    records[j].class = ON;
                }
                et_run_indices.clear();
            }

            prev_class_before_w4 = class_before_w456;
        }
    }

    // Sequence ended inside an ET run
    for &j in &et_run_indices {
        records[j].class = ON;
    }

    // W7
    let mut last_strong_is_l = sequence.sos == L;
    for i in sequence.indices() {
        match records[i].class {
            EN if last_strong_is_l => records[i].class = L,
            L => last_strong_is_l = true,
            R | AL => last_strong_is_l = false,
            _ => {}
        }
    }
}
