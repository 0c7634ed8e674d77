//! Unicode Bidirectional Algorithm for Blitz
//!
//! Resolves embedding levels, mirror flags and the logical-to-visual
//! permutation of mixed left-to-right and right-to-left text (UAX #9),
//! including isolates, the 125-level nesting limit and bracket pairs.
//!
//! The algorithm itself is a pipeline of stages over a flat array of
//! [`CharRecord`]s, one module per stage:
//!
//! - [`paragraph`]: P1-P3
//! - [`explicit`]: X1-X9
//! - [`sequence`]: BD7, BD13, X10
//! - [`weak`]: W1-W7
//! - [`neutral`]: BD16, N0-N2
//! - [`implicit`]: I1, I2
//! - [`reorder`]: L1, L2, L4
//!
//! Unicode data comes in through the [`Classifier`] trait; most callers use
//! [`UnicodeClassifier`] through [`BidiResolver::default`].
//!
//! ```
//! use blitz_bidi::BidiResolver;
//!
//! let resolver: BidiResolver = BidiResolver::default();
//! let text = "abc \u{05D0}\u{05D1}\u{05D2}";
//! let resolution = resolver.resolve(text).unwrap();
//!
//! assert_eq!(resolution.levels, vec![0, 0, 0, 0, 1, 1, 1]);
//! assert_eq!(resolution.visual_order, vec![0, 1, 2, 3, 6, 5, 4]);
//! ```

pub mod classifier;
pub mod config;
pub mod error;
pub mod explicit;
pub mod formatting;
pub mod implicit;
pub mod neutral;
pub mod paragraph;
pub mod reorder;
pub mod resolver;
pub mod scan;
pub mod script;
pub mod sequence;
pub mod tables;
pub mod types;
pub mod weak;

pub use classifier::{Classifier, UnicodeClassifier};
pub use config::{BidiConfig, ParagraphSeparators};
pub use error::{BidiError, BidiResult, Diagnostic, OverflowKind};
pub use formatting::{
    balance_format_chars, envelope, has_bidi_content, has_presentation_forms, isolate,
    strip_format_chars, EnvelopeMode,
};
pub use paragraph::{detect_base_level, split_paragraphs, Paragraph};
pub use resolver::{
    resolve, resolve_with_direction, BidiResolution, BidiResolver, ParagraphResolution,
};
pub use scan::{scan_bidi, BidiScan};
pub use types::{
    BidiClass, BracketInfo, CharRecord, Direction, OverrideStatus, MAX_BRACKET_DEPTH, MAX_DEPTH,
    MAX_STACK_DEPTH,
};
