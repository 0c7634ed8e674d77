//! Level runs and isolating run sequences (BD7, BD13, X10)

use std::ops::Range;

use crate::types::{is_isolate_initiator, level_class, BidiClass, CharRecord};

/// Maximal span of records at one level, ignoring removed characters
pub type LevelRun = Range<usize>;

/// Level runs linked through matched isolate initiator/PDI pairs.
///
/// Built fresh for each paragraph and consumed by the weak, neutral and
/// implicit stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsolatingRunSequence {
    pub runs: Vec<LevelRun>,
    /// Embedding level shared by every non-removed record of the sequence
    pub level: u8,
    /// Start-of-sequence type, `L` or `R`
    pub sos: BidiClass,
    /// End-of-sequence type, `L` or `R`
    pub eos: BidiClass,
}

impl IsolatingRunSequence {
    /// Record indices of this sequence in logical order
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.runs.iter().flat_map(Clone::clone)
    }

    /// Indices from `pos` (inclusive) to the end of the sequence.
    /// `run_index` is the run containing `pos`.
    pub fn iter_forwards_from(
        &self,
        pos: usize,
        run_index: usize,
    ) -> impl Iterator<Item = usize> + '_ {
        let runs = &self.runs[run_index..];
        debug_assert!(runs[0].start <= pos && pos <= runs[0].end);
        (pos..runs[0].end).chain(runs[1..].iter().flat_map(Clone::clone))
    }

    /// Indices before `pos` (exclusive) back to the start of the sequence
    pub fn iter_backwards_from(
        &self,
        pos: usize,
        run_index: usize,
    ) -> impl Iterator<Item = usize> + '_ {
        let prev_runs = &self.runs[..run_index];
        let current = &self.runs[run_index];
        debug_assert!(current.start <= pos && pos <= current.end);
        (current.start..pos)
            .rev()
            .chain(prev_runs.iter().rev().flat_map(Clone::clone))
    }

    /// Embedding direction of the sequence as a strong class
    #[inline]
    pub fn embedding_class(&self) -> BidiClass {
        level_class(self.level)
    }
}

/// Split a paragraph into level runs (BD7).
///
/// Removed characters never start a run; they join whichever run they sit
/// in, so an embedding control cannot split surrounding text.
pub fn level_runs(records: &[CharRecord]) -> Vec<LevelRun> {
    let mut runs = Vec::new();
    if records.is_empty() {
        return runs;
    }

    let mut run_start = 0;
    let mut run_level = None;
    for (i, record) in records.iter().enumerate() {
        if record.removed {
            continue;
        }
        match run_level {
            Some(level) if level != record.level => {
                runs.push(run_start..i);
                run_start = i;
                run_level = Some(record.level);
            }
            Some(_) => {}
            None => run_level = Some(record.level),
        }
    }
    runs.push(run_start..records.len());

    runs
}

/// Build the isolating run sequences of a paragraph (BD13) and compute
/// their `sos`/`eos` types (X10).
pub fn isolating_run_sequences(
    records: &[CharRecord],
    para_level: u8,
) -> Vec<IsolatingRunSequence> {
    let runs = level_runs(records);
    let mut sequences: Vec<Vec<LevelRun>> = Vec::with_capacity(runs.len());

    // Sequences interrupted by an isolate, resumed at the matching PDI
    let mut stack: Vec<Vec<LevelRun>> = vec![Vec::new()];

    for run in runs {
        let first = records[run.clone()].iter().find(|r| !r.removed);
        let last = records[run.clone()].iter().rev().find(|r| !r.removed);

        let starts_with_pdi = first.is_some_and(|r| r.category == BidiClass::PDI);
        let mut sequence = match stack.pop() {
            Some(sequence) if starts_with_pdi && !stack.is_empty() => sequence,
            Some(sequence) => {
                stack.push(sequence);
                Vec::new()
            }
            None => Vec::new(),
        };

        sequence.push(run);

        if last.is_some_and(|r| is_isolate_initiator(r.category)) {
            stack.push(sequence);
        } else {
            sequences.push(sequence);
        }
    }
    sequences.extend(stack.into_iter().rev().filter(|seq| !seq.is_empty()));

    let sequences: Vec<IsolatingRunSequence> = sequences
        .into_iter()
        .map(|runs| with_boundaries(records, para_level, runs))
        .collect();

    log::debug!(
        "built {} isolating run sequences over {} characters",
        sequences.len(),
        records.len()
    );

    sequences
}

/// X10: `sos` and `eos` from the higher of the sequence level and the level
/// of the adjacent non-removed character
fn with_boundaries(
    records: &[CharRecord],
    para_level: u8,
    runs: Vec<LevelRun>,
) -> IsolatingRunSequence {
    let start = runs.first().map_or(0, |run| run.start);
    let end = runs.last().map_or(0, |run| run.end);

    let mut members = runs
        .iter()
        .flat_map(Clone::clone)
        .map(|i| &records[i])
        .filter(|r| !r.removed);
    let level = members.next().map_or(para_level, |r| r.level);

    let pred_level = records[..start]
        .iter()
        .rev()
        .find(|r| !r.removed)
        .map_or(para_level, |r| r.level);

    // An isolate initiator at the end has no PDI in this sequence; the
    // paragraph level stands in for whatever follows
    let ends_with_initiator = records[..end]
        .iter()
        .rev()
        .find(|r| !r.removed)
        .is_some_and(|r| is_isolate_initiator(r.category));
    let succ_level = if ends_with_initiator {
        para_level
    } else {
        records[end..]
            .iter()
            .find(|r| !r.removed)
            .map_or(para_level, |r| r.level)
    };

    IsolatingRunSequence {
        runs,
        level,
        sos: level_class(level.max(pred_level)),
        eos: level_class(level.max(succ_level)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::testing::records;
    use crate::explicit::resolve_explicit;

    fn sequences(text: &str, para_level: u8) -> Vec<IsolatingRunSequence> {
        let mut records = records(text);
        resolve_explicit(&mut records, para_level, &mut Vec::new());
        isolating_run_sequences(&records, para_level)
    }

    #[test]
    fn test_level_runs_ignore_removed() {
        // a RLE b PDF c
        let mut records = records("a\u{202B}b\u{202C}c");
        resolve_explicit(&mut records, 0, &mut Vec::new());
        assert_eq!(level_runs(&records), vec![0..2, 2..4, 4..5]);
    }

    #[test]
    fn test_single_run() {
        let seqs = sequences("abc", 0);
        assert_eq!(seqs.len(), 1);
        assert_eq!(seqs[0].runs, vec![0..3]);
        assert_eq!(seqs[0].sos, BidiClass::L);
        assert_eq!(seqs[0].eos, BidiClass::L);
    }

    #[test]
    fn test_isolate_links_runs() {
        // a RLI B PDI c: runs [a RLI], [B], [PDI c]
        let seqs = sequences("a\u{2067}B\u{2069}c", 0);
        assert_eq!(seqs.len(), 2);
        let outer = seqs.iter().find(|s| s.level == 0).unwrap();
        assert_eq!(outer.runs, vec![0..2, 3..5]);
        assert_eq!(outer.indices().collect::<Vec<_>>(), vec![0, 1, 3, 4]);
        let inner = seqs.iter().find(|s| s.level == 1).unwrap();
        assert_eq!(inner.runs, vec![2..3]);
        assert_eq!(inner.sos, BidiClass::R);
        assert_eq!(inner.eos, BidiClass::R);
    }

    #[test]
    fn test_unmatched_isolate_uses_paragraph_level() {
        // a LRI b (no PDI)
        let seqs = sequences("a\u{2066}b", 1);
        assert_eq!(seqs.len(), 2);
        let outer = seqs.iter().find(|s| s.level == 1).unwrap();
        assert_eq!(outer.runs, vec![0..2]);
        // eos taken from paragraph level because the run ends with an initiator
        assert_eq!(outer.eos, BidiClass::R);
        let inner = seqs.iter().find(|s| s.level == 2).unwrap();
        assert_eq!(inner.sos, BidiClass::L);
        assert_eq!(inner.eos, BidiClass::L);
    }

    #[test]
    fn test_iterators() {
        let seq = IsolatingRunSequence {
            runs: vec![0..2, 5..7],
            level: 0,
            sos: BidiClass::L,
            eos: BidiClass::L,
        };
        assert_eq!(seq.iter_forwards_from(1, 0).collect::<Vec<_>>(), vec![1, 5, 6]);
        assert_eq!(seq.iter_backwards_from(6, 1).collect::<Vec<_>>(), vec![5, 1, 0]);
        assert_eq!(seq.embedding_class(), BidiClass::L);
    }
}
