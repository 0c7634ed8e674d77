//! Resolving neutral and isolate types (BD16, N0-N2)

use arrayvec::ArrayVec;

use crate::error::Diagnostic;
use crate::sequence::IsolatingRunSequence;
use crate::types::{is_neutral_or_isolate, BidiClass, CharRecord, MAX_BRACKET_DEPTH};

/// A matched bracket pair, as record indices and the runs that hold them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketPair {
    pub opening: usize,
    pub closing: usize,
    pub opening_run: usize,
    pub closing_run: usize,
}

/// Identify bracket pairs in one isolating run sequence (BD16).
///
/// Only characters whose working class is still `ON` take part, so a
/// bracket under an override is never paired. When more than 63 openers are
/// pending the scan stops for the rest of the sequence; pairs already closed
/// are kept and a [`Diagnostic::BracketStackOverflow`] is recorded.
pub fn identify_bracket_pairs(
    sequence: &IsolatingRunSequence,
    records: &[CharRecord],
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<BracketPair> {
    let mut pairs = Vec::new();
    // (canonical opening bracket, record index, run index)
    let mut stack: ArrayVec<(char, usize, usize), MAX_BRACKET_DEPTH> = ArrayVec::new();

    'runs: for (run_index, run) in sequence.runs.iter().enumerate() {
        for i in run.clone() {
            let record = &records[i];
            if record.class != BidiClass::ON {
                continue;
            }
            let Some(bracket) = record.bracket else {
                continue;
            };

            if bracket.is_opening {
                if stack.try_push((bracket.pair_class, i, run_index)).is_err() {
                    diagnostics.push(Diagnostic::BracketStackOverflow {
                        position: record.original_index,
                    });
                    break 'runs;
                }
            } else if let Some(depth) = stack
                .iter()
                .rposition(|&(opening, _, _)| opening == bracket.pair_class)
            {
                let (_, opening, opening_run) = stack[depth];
                pairs.push(BracketPair {
                    opening,
                    closing: i,
                    opening_run,
                    closing_run: run_index,
                });
                stack.truncate(depth);
            }
        }
    }

    pairs.sort_by_key(|pair| pair.opening);
    pairs
}

/// Resolve neutrals of one isolating run sequence in place
pub fn resolve_neutral(
    sequence: &IsolatingRunSequence,
    records: &mut [CharRecord],
    diagnostics: &mut Vec<Diagnostic>,
) {
    resolve_bracket_pairs(sequence, records, diagnostics);
    resolve_neutral_runs(sequence, records);
}

/// Strong direction of a class for N0, where numbers count as `R`
#[inline]
fn n0_strong(class: BidiClass) -> Option<BidiClass> {
    match class {
        BidiClass::L => Some(BidiClass::L),
        BidiClass::R | BidiClass::EN | BidiClass::AN => Some(BidiClass::R),
        _ => None,
    }
}

/// N0
fn resolve_bracket_pairs(
    sequence: &IsolatingRunSequence,
    records: &mut [CharRecord],
    diagnostics: &mut Vec<Diagnostic>,
) {
    use BidiClass::*;

    let e = sequence.embedding_class();
    let pairs = identify_bracket_pairs(sequence, records, diagnostics);

    for pair in pairs {
        let mut found_e = false;
        let mut found_not_e = false;

        for enclosed in sequence.iter_forwards_from(pair.opening + 1, pair.opening_run) {
            if enclosed >= pair.closing {
                break;
            }
            match n0_strong(records[enclosed].class) {
                Some(strong) if strong == e => {
                    found_e = true;
                    break;
                }
                Some(_) => found_not_e = true,
                None => {}
            }
        }

        let class_to_set = if found_e {
            e
        } else if found_not_e {
            // N0 c: context before the opening bracket decides
            sequence
                .iter_backwards_from(pair.opening, pair.opening_run)
                .find_map(|i| n0_strong(records[i].class))
                .unwrap_or(sequence.sos)
        } else {
            // N0 d: no strong type inside, leave for N1/N2
            continue;
        };

        records[pair.opening].class = class_to_set;
        records[pair.closing].class = class_to_set;

        // Removed characters directly before the opener follow it
        for i in sequence.iter_backwards_from(pair.opening, pair.opening_run) {
            if records[i].class != BN {
                break;
            }
            records[i].class = class_to_set;
        }

        // Original NSMs after a bracket that changed take its type
        for (start, run) in [
            (pair.opening + 1, pair.opening_run),
            (pair.closing + 1, pair.closing_run),
        ] {
            for i in sequence.iter_forwards_from(start, run) {
                if records[i].category == NSM || records[i].class == BN {
                    records[i].class = class_to_set;
                } else {
                    break;
                }
            }
        }
    }
}

/// N1, N2
fn resolve_neutral_runs(sequence: &IsolatingRunSequence, records: &mut [CharRecord]) {
    use BidiClass::*;

    let e = sequence.embedding_class();
    let mut indices = sequence.indices();
    let mut prev_class = sequence.sos;
    let mut ni_run = Vec::new();

    while let Some(mut i) = indices.next() {
        let class = records[i].class;
        if is_neutral_or_isolate(class) || class == BN {
            ni_run.push(i);
            let next_class = loop {
                match indices.next() {
                    Some(j) => {
                        i = j;
                        let class = records[j].class;
                        if is_neutral_or_isolate(class) || class == BN {
                            ni_run.push(j);
                        } else {
                            break class;
                        }
                    }
                    None => break sequence.eos,
                }
            };

            let new_class = match (prev_class, next_class) {
                (L, L) => L,
                (R | AN | EN, R | AN | EN) => R,
                _ => e,
            };
            for &j in &ni_run {
                records[j].class = new_class;
            }
            ni_run.clear();
        }
        prev_class = records[i].class;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::testing::{classes, records};
    use crate::explicit::resolve_explicit;
    use crate::sequence::isolating_run_sequences;
    use crate::weak::resolve_weak;
    use BidiClass::*;

    fn neutral(text: &str, para_level: u8) -> (Vec<BidiClass>, Vec<Diagnostic>) {
        let mut records = records(text);
        let mut diagnostics = Vec::new();
        resolve_explicit(&mut records, para_level, &mut diagnostics);
        for sequence in isolating_run_sequences(&records, para_level) {
            resolve_weak(&sequence, &mut records);
            resolve_neutral(&sequence, &mut records, &mut diagnostics);
        }
        (classes(&records), diagnostics)
    }

    #[test]
    fn test_n1_neutrals_between_same_direction() {
        assert_eq!(neutral("A B", 0).0, vec![R, R, R]);
        assert_eq!(neutral("a b", 1).0, vec![L, L, L]);
        // Numbers count as R for N1
        assert_eq!(neutral("A 1", 0).0, vec![R, R, EN]);
    }

    #[test]
    fn test_n2_mixed_context_takes_embedding() {
        assert_eq!(neutral("a B", 0).0, vec![L, L, R]);
        assert_eq!(neutral("a B", 1).0, vec![L, R, R]);
    }

    #[test]
    fn test_n0_bracket_matches_embedding() {
        // a ( B ) c in LTR: pair contains only R, preceded by L → L
        let (classes, _) = neutral("a(B)c", 0);
        assert_eq!(classes, vec![L, L, R, L, L]);
        // A ( B ) in LTR: opposite direction established before → R
        let (classes, _) = neutral("A(B)c", 0);
        assert_eq!(classes, vec![R, R, R, R, L]);
        // ( a ) in RTL paragraph with strong L inside only, sos R → R
        let (classes, _) = neutral("(a)", 1);
        assert_eq!(classes, vec![R, L, R]);
    }

    #[test]
    fn test_n0_without_strong_content() {
        // Brackets with only neutrals inside fall through to N1/N2
        let (classes, _) = neutral("A( )B", 0);
        assert_eq!(classes, vec![R, R, R, R, R]);
    }

    #[test]
    fn test_n0_nsm_after_bracket() {
        // The NSM after the closing bracket follows the bracket, not W1
        let (classes, _) = neutral("A(B)`c", 0);
        assert_eq!(classes, vec![R, R, R, R, R, L]);
    }

    #[test]
    fn test_bracket_pairs_mismatched() {
        let mut records = records("a(b]c)d");
        resolve_explicit(&mut records, 0, &mut Vec::new());
        let sequences = isolating_run_sequences(&records, 0);
        let pairs = identify_bracket_pairs(&sequences[0], &records, &mut Vec::new());
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].opening, pairs[0].closing), (1, 5));
    }

    #[test]
    fn test_bracket_stack_overflow() {
        let mut text = "(".repeat(64);
        text.push_str("a)");
        let mut records = records(&text);
        resolve_explicit(&mut records, 0, &mut Vec::new());
        let sequences = isolating_run_sequences(&records, 0);
        let mut diagnostics = Vec::new();
        let pairs = identify_bracket_pairs(&sequences[0], &records, &mut diagnostics);
        assert!(pairs.is_empty());
        assert_eq!(
            diagnostics,
            vec![Diagnostic::BracketStackOverflow { position: 63 }]
        );
    }

    #[test]
    fn test_overridden_brackets_are_not_paired() {
        // RLO ( a ) PDF: brackets are forced to R and never reach N0
        let (classes, _) = neutral("\u{202E}(a)\u{202C}", 0);
        assert_eq!(&classes[1..4], &[R, R, R]);
    }
}
