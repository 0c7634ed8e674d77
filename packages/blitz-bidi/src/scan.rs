//! Bidi content report for a string

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::formatting::{
    has_bidi_content, is_isolate_initiator, is_presentation_form, ALM, LRE, LRM, LRO, PDF, PDI,
    RLE, RLM, RLO,
};

/// What bidi support a string needs and which controls it already uses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidiScan {
    /// Right-to-left or Arabic number characters, or explicit controls
    pub has_rtl: bool,
    /// An isolate initiator and a PDI are both present
    pub has_isolates: bool,
    /// An embedding initiator and a PDF are both present
    pub has_embeddings: bool,
    /// LRM, RLM or ALM present
    pub has_marks: bool,
    /// An override initiator and a PDF are both present
    pub has_overrides: bool,
    /// Alphabetic or Arabic presentation forms present
    pub has_presentation_forms: bool,
    /// Every distinct mark and explicit formatting character found
    pub formatting_chars: BTreeSet<char>,
}

impl BidiScan {
    /// `U+XXXX` labels of the formatting characters, in codepoint order
    pub fn formatting_codepoints(&self) -> Vec<String> {
        self.formatting_chars
            .iter()
            .map(|&ch| format!("U+{:04X}", ch as u32))
            .collect()
    }

    /// True when the string uses any mark or explicit control
    #[inline]
    pub fn uses_formatting(&self) -> bool {
        !self.formatting_chars.is_empty()
    }
}

/// Scan `text` for bidi content and formatting characters
pub fn scan_bidi(text: &str) -> BidiScan {
    let mut scan = BidiScan {
        has_rtl: has_bidi_content(text),
        ..BidiScan::default()
    };

    let mut isolate_open = false;
    let mut embedding_open = false;
    let mut override_open = false;
    let mut has_pdf = false;
    let mut has_pdi = false;

    for ch in text.chars() {
        match ch {
            LRE | RLE => embedding_open = true,
            LRO | RLO => override_open = true,
            PDF => has_pdf = true,
            PDI => has_pdi = true,
            LRM | RLM | ALM => scan.has_marks = true,
            ch if is_isolate_initiator(ch) => isolate_open = true,
            ch => {
                scan.has_presentation_forms |= is_presentation_form(ch);
                continue;
            }
        }
        scan.formatting_chars.insert(ch);
    }

    scan.has_isolates = isolate_open && has_pdi;
    scan.has_embeddings = embedding_open && has_pdf;
    scan.has_overrides = override_open && has_pdf;

    log::trace!("scanned {} bytes: {:?}", text.len(), scan);
    scan
}
