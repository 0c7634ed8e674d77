//! Bidi resolver
//!
//! [`BidiResolver`] runs the stage pipeline over each paragraph:
//! classification, explicit levels, isolating run sequences, weak and
//! neutral types, implicit levels and reordering. The resolver holds only
//! its classifier and configuration; every call starts from scratch.

use std::ops::Range;

use once_cell::sync::Lazy;

use crate::classifier::{classify, Classifier, UnicodeClassifier};
use crate::config::BidiConfig;
use crate::error::{BidiResult, Diagnostic};
use crate::explicit::resolve_explicit;
use crate::implicit::{assign_removed_levels, resolve_implicit};
use crate::neutral::resolve_neutral;
use crate::paragraph::{split_paragraphs, Paragraph};
use crate::reorder::reorder;
use crate::sequence::isolating_run_sequences;
use crate::types::{CharRecord, Direction};
use crate::weak::resolve_weak;

/// Resolution of one paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphResolution {
    /// Character range of the paragraph in the whole input
    pub range: Range<usize>,
    pub base_level: u8,
    /// Final per-character state, in logical order
    pub records: Vec<CharRecord>,
    /// Original indices in display order, removed characters excluded
    pub visual_order: Vec<usize>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParagraphResolution {
    #[inline]
    pub fn direction(&self) -> Direction {
        Direction::from_level(self.base_level)
    }

    pub fn levels(&self) -> Vec<u8> {
        self.records.iter().map(|r| r.level).collect()
    }

    pub fn mirrored(&self) -> Vec<bool> {
        self.records.iter().map(|r| r.mirrored).collect()
    }
}

/// Resolution of a whole text, paragraphs concatenated in logical order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BidiResolution {
    /// Embedding level of every input character
    pub levels: Vec<u8>,
    /// L4 mirror flag of every input character
    pub mirrored: Vec<bool>,
    /// Original indices in display order, removed characters excluded
    pub visual_order: Vec<usize>,
    pub paragraphs: Vec<ParagraphResolution>,
    pub diagnostics: Vec<Diagnostic>,
}

impl BidiResolution {
    fn from_paragraphs(paragraphs: Vec<ParagraphResolution>) -> Self {
        let len = paragraphs.last().map_or(0, |p| p.range.end);
        let mut resolution = BidiResolution {
            levels: Vec::with_capacity(len),
            mirrored: Vec::with_capacity(len),
            visual_order: Vec::with_capacity(len),
            paragraphs: Vec::new(),
            diagnostics: Vec::new(),
        };

        for paragraph in &paragraphs {
            resolution
                .levels
                .extend(paragraph.records.iter().map(|r| r.level));
            resolution
                .mirrored
                .extend(paragraph.records.iter().map(|r| r.mirrored));
            resolution
                .visual_order
                .extend_from_slice(&paragraph.visual_order);
            resolution
                .diagnostics
                .extend_from_slice(&paragraph.diagnostics);
        }
        resolution.paragraphs = paragraphs;
        resolution
    }

    /// Number of input characters
    #[inline]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Whether any character resolved to an odd level
    pub fn has_rtl(&self) -> bool {
        self.levels.iter().any(|&level| level % 2 == 1)
    }

    /// Visual position to original index
    #[inline]
    pub fn visual_to_logical(&self) -> &[usize] {
        &self.visual_order
    }

    /// Original index to visual position; `None` for removed characters
    pub fn logical_to_visual(&self) -> Vec<Option<usize>> {
        let mut map = vec![None; self.len()];
        for (visual, &logical) in self.visual_order.iter().enumerate() {
            if let Some(slot) = map.get_mut(logical) {
                *slot = Some(visual);
            }
        }
        map
    }

    /// Apply the visual order to `text`, substituting mirrored glyphs from
    /// the Unicode tables.
    ///
    /// `text` must be the string that was resolved.
    pub fn reorder_text(&self, text: &str) -> String {
        self.reorder_text_with(text, &UnicodeClassifier)
    }

    /// Same as [`BidiResolution::reorder_text`], taking mirrored glyphs from
    /// `classifier`
    pub fn reorder_text_with<C: Classifier + ?Sized>(&self, text: &str, classifier: &C) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len());
        for &index in &self.visual_order {
            let Some(&ch) = chars.get(index) else {
                continue;
            };
            let mirrored = self.mirrored.get(index).copied().unwrap_or(false);
            out.push(if mirrored {
                classifier.mirror_glyph(ch).unwrap_or(ch)
            } else {
                ch
            });
        }
        out
    }
}

/// Unicode Bidirectional Algorithm resolver
#[derive(Debug, Clone)]
pub struct BidiResolver<C = UnicodeClassifier> {
    classifier: C,
    config: BidiConfig,
}

impl Default for BidiResolver<UnicodeClassifier> {
    fn default() -> Self {
        Self::new(UnicodeClassifier)
    }
}

impl<C: Classifier> BidiResolver<C> {
    /// Create a resolver with the default configuration
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            config: BidiConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BidiConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn config(&self) -> &BidiConfig {
        &self.config
    }

    #[inline]
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Resolve a whole text, splitting it into paragraphs with the
    /// configured separators
    pub fn resolve(&self, text: &str) -> BidiResult<BidiResolution> {
        let chars: Vec<char> = text.chars().collect();
        self.resolve_chars(&chars)
    }

    pub fn resolve_chars(&self, chars: &[char]) -> BidiResult<BidiResolution> {
        let paragraphs = self
            .paragraph_ranges(chars)
            .into_iter()
            .map(|range| self.resolve_range(chars, range, self.config.base_direction))
            .collect();
        Ok(BidiResolution::from_paragraphs(paragraphs))
    }

    /// Resolve `chars` as exactly one paragraph, whatever separators it
    /// contains
    pub fn resolve_paragraph(
        &self,
        chars: &[char],
        base: Direction,
    ) -> BidiResult<ParagraphResolution> {
        Ok(self.resolve_range(chars, 0..chars.len(), base))
    }

    /// Same result as [`BidiResolver::resolve`], with paragraphs resolved
    /// concurrently on the rayon pool
    #[cfg(feature = "parallel")]
    pub fn resolve_parallel(&self, text: &str) -> BidiResult<BidiResolution> {
        use rayon::prelude::*;

        let chars: Vec<char> = text.chars().collect();
        let ranges = self.paragraph_ranges(&chars);
        let direction = self.config.base_direction;

        let paragraphs = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            ranges
                .into_par_iter()
                .map(|range| self.resolve_range(&chars, range, direction))
                .collect::<Vec<_>>()
        }))
        .map_err(|_| crate::error::BidiError::WorkerPanicked)?;

        Ok(BidiResolution::from_paragraphs(paragraphs))
    }

    /// Without the `parallel` feature paragraphs are resolved in order
    #[cfg(not(feature = "parallel"))]
    pub fn resolve_parallel(&self, text: &str) -> BidiResult<BidiResolution> {
        self.resolve(text)
    }

    fn paragraph_ranges(&self, chars: &[char]) -> Vec<Range<usize>> {
        let ranges = split_paragraphs(chars, &self.config.paragraph_separators, &self.classifier);
        log::trace!(
            "split {} characters into {} paragraphs",
            chars.len(),
            ranges.len()
        );
        ranges
    }

    fn resolve_range(
        &self,
        chars: &[char],
        range: Range<usize>,
        direction: Direction,
    ) -> ParagraphResolution {
        let records = classify(&self.classifier, &chars[range.clone()], range.start);
        let paragraph = Paragraph::new(range, records, direction);
        resolve_stages(paragraph, self.config.log_diagnostics)
    }
}

/// Run every resolver stage over one classified paragraph
fn resolve_stages(paragraph: Paragraph, log_diagnostics: bool) -> ParagraphResolution {
    let Paragraph {
        range,
        base_level,
        mut records,
    } = paragraph;
    let mut diagnostics = Vec::new();

    log::trace!("paragraph {:?}: {} characters", range, records.len());

    resolve_explicit(&mut records, base_level, &mut diagnostics);

    let sequences = isolating_run_sequences(&records, base_level);
    for sequence in &sequences {
        resolve_weak(sequence, &mut records);
    }
    log::trace!("paragraph {:?}: weak types resolved", range);

    for sequence in &sequences {
        resolve_neutral(sequence, &mut records, &mut diagnostics);
    }
    log::trace!("paragraph {:?}: neutral types resolved", range);

    let max_level = resolve_implicit(&mut records);
    assign_removed_levels(&mut records, base_level);
    log::trace!("paragraph {:?}: max level {}", range, max_level);

    let visual_order = reorder(&mut records, base_level);

    if log_diagnostics {
        if let Some(summary) = diagnostic_summary(&diagnostics) {
            log::warn!("bidi paragraph {:?}: {}", range, summary);
        }
    }

    ParagraphResolution {
        range,
        base_level,
        records,
        visual_order,
        diagnostics,
    }
}

/// One line describing a paragraph's diagnostics: the count and the first
/// event
fn diagnostic_summary(diagnostics: &[Diagnostic]) -> Option<String> {
    let first = diagnostics.first()?;
    Some(match diagnostics.len() {
        1 => first.to_string(),
        count => format!("{count} diagnostics, first: {first}"),
    })
}

/// Global resolver with Unicode tables and the default configuration
static GLOBAL_RESOLVER: Lazy<BidiResolver> = Lazy::new(BidiResolver::default);

/// Resolve `text` with the global default resolver
#[inline]
pub fn resolve(text: &str) -> BidiResult<BidiResolution> {
    GLOBAL_RESOLVER.resolve(text)
}

/// Resolve `text` with an explicit base direction given as `auto`, `ltr` or
/// `rtl`
pub fn resolve_with_direction(text: &str, direction: &str) -> BidiResult<BidiResolution> {
    let direction: Direction = direction.parse()?;
    if direction == GLOBAL_RESOLVER.config().base_direction {
        return GLOBAL_RESOLVER.resolve(text);
    }
    BidiResolver::<UnicodeClassifier>::default()
        .with_config(BidiConfig::default().with_base_direction(direction))
        .resolve(text)
}
