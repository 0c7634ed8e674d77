//! Resolver-wide properties
//!
//! Checks that hold for every input: the visual order is a permutation of
//! the retained characters, results are repeatable, mirror flags only appear
//! at odd levels, and nesting overflow degrades instead of failing.

use blitz_bidi::{
    BidiClass, BidiConfig, BidiResolution, BidiResolver, BracketInfo, Classifier, Diagnostic,
    Direction, OverflowKind, UnicodeClassifier,
};

const SAMPLES: &[&str] = &[
    "",
    "a",
    "hello world",
    "\u{05E9}\u{05DC}\u{05D5}\u{05DD} \u{05E2}\u{05D5}\u{05DC}\u{05DD}",
    "abc \u{05D0}\u{05D1}\u{05D2} 123 def",
    "\u{0627}\u{0644}\u{0639}\u{0631}\u{0628}\u{064A}\u{0629} 2024 (\u{0661}\u{0662})",
    "(abc \u{05E9}\u{05DC}\u{05D5}\u{05DD})",
    "a\u{202B}b\u{202C}c\u{202E}def\u{202C}",
    "x \u{2067}\u{05D0} [y]\u{2069} z",
    "\u{2068}\u{2069}\u{2069}\u{202C}",
    "1+2=3 \u{05D0}\u{05D1} $5.00",
    "line one\n\u{05E9}\u{05D5}\u{05E8}\u{05D4} \u{05E9}\u{05E0}\u{05D9}\u{05D4}\r\nthird\u{2029}",
    "a\u{200D}b\u{00AD}\u{05D0}\tq",
];

fn resolver() -> BidiResolver {
    BidiResolver::default().with_config(BidiConfig::default().with_log_diagnostics(false))
}

fn resolve(text: &str) -> BidiResolution {
    resolver().resolve(text).unwrap()
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn is_removed(ch: char) -> bool {
    use BidiClass::*;
    matches!(
        UnicodeClassifier.category_of(ch),
        RLE | LRE | RLO | LRO | PDF | BN
    )
}

#[cfg(test)]
mod bidi_properties_tests {
    use super::*;

    #[test]
    fn test_visual_order_is_permutation_of_retained_characters() {
        for text in SAMPLES {
            let chars: Vec<char> = text.chars().collect();
            let resolution = resolve(text);
            assert_eq!(resolution.levels.len(), chars.len(), "{text:?}");
            assert_eq!(resolution.mirrored.len(), chars.len(), "{text:?}");

            let mut order = resolution.visual_order.clone();
            order.sort_unstable();
            let expected: Vec<usize> = (0..chars.len()).filter(|&i| !is_removed(chars[i])).collect();
            assert_eq!(order, expected, "{text:?}");
        }
    }

    #[test]
    fn test_all_ltr_keeps_logical_order() {
        let text = "plain latin text";
        let resolution = resolve(text);
        assert_eq!(resolution.paragraphs[0].base_level, 0);
        assert!(resolution.levels.iter().all(|&level| level == 0));
        assert_eq!(
            resolution.visual_order,
            (0..text.chars().count()).collect::<Vec<_>>()
        );
        assert_eq!(resolution.reorder_text(text), text);
    }

    #[test]
    fn test_all_rtl_is_reversed() {
        let text = "\u{05D0}\u{05D1}\u{05D2}\u{05D3}";
        let resolution = resolve(text);
        assert_eq!(resolution.paragraphs[0].base_level, 1);
        assert_eq!(resolution.visual_order, vec![3, 2, 1, 0]);
        assert_eq!(resolution.reorder_text(text), "\u{05D3}\u{05D2}\u{05D1}\u{05D0}");
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let resolver = resolver();
        for text in SAMPLES {
            let first = resolver.resolve(text).unwrap();
            let second = resolver.resolve(text).unwrap();
            assert_eq!(first, second, "{text:?}");
        }
    }

    #[test]
    fn test_brackets_around_mixed_text_follow_base_direction() {
        let text = "(abc \u{05E9}\u{05DC}\u{05D5}\u{05DD})";
        let chars: Vec<char> = text.chars().collect();
        let paragraph = resolver()
            .resolve_paragraph(&chars, Direction::LeftToRight)
            .unwrap();
        let levels = paragraph.levels();

        assert_eq!(levels[0], 0);
        assert_eq!(levels[9], 0);
        assert_eq!(&levels[5..9], &[1, 1, 1, 1]);
        assert!(!paragraph.records[0].mirrored);
        assert!(!paragraph.records[9].mirrored);
    }

    #[test]
    fn test_brackets_in_rtl_context_are_mirrored() {
        // שלום (abc) in an RTL paragraph: the brackets take R from context
        let text = "\u{05E9}\u{05DC}\u{05D5}\u{05DD} (abc)";
        let resolution = resolve(text);
        assert_eq!(resolution.levels[5], 1);
        assert_eq!(resolution.levels[9], 1);
        assert!(resolution.mirrored[5]);
        assert!(resolution.mirrored[9]);
        assert_eq!(resolution.reorder_text(text), "(abc) \u{05DD}\u{05D5}\u{05DC}\u{05E9}");
    }

    #[test]
    fn test_math_operators_in_rtl_context_are_mirrored() {
        // ∑ and √ are Bidi_Mirrored but have no mirror glyph
        let text = "\u{05D0} \u{2211} \u{221A} \u{05D1}";
        let resolution = resolve(text);
        assert_eq!(resolution.levels, vec![1; 7]);
        assert!(resolution.mirrored[2]);
        assert!(resolution.mirrored[4]);
        assert!(!resolution.mirrored[0]);
        assert_eq!(
            resolution.reorder_text(text),
            "\u{05D1} \u{221A} \u{2211} \u{05D0}"
        );
    }

    #[test]
    fn test_nesting_at_limit_and_overflow() {
        init_logging();

        // 125 alternating RLI/LRI reach level 125
        let mut text = String::new();
        for depth in 1..=125u32 {
            text.push(if depth % 2 == 1 { '\u{2067}' } else { '\u{2066}' });
        }
        text.push('\u{05D0}');
        // The 126th isolate overflows and opens nothing
        text.push('\u{2066}');
        text.push('\u{05D1}');

        // Diagnostics are logged as well as returned
        let resolver: BidiResolver = BidiResolver::default();
        let resolution = resolver.resolve(&text).unwrap();
        assert_eq!(resolution.levels[125], 125);
        assert_eq!(resolution.levels[127], 125);
        assert!(resolution.paragraphs[0].records[126].overflow);
        assert_eq!(
            resolution.diagnostics,
            vec![Diagnostic::NestingOverflow {
                position: 126,
                kind: OverflowKind::Isolate
            }]
        );
        assert!(resolution.levels.iter().all(|&level| level <= 126));
    }

    #[test]
    fn test_unmatched_isolate_alone() {
        let resolution = resolve("\u{2067}");
        assert_eq!(resolution.levels, vec![0]);
        assert_eq!(resolution.visual_order, vec![0]);

        let resolution = resolve("\u{2067}abc");
        assert_eq!(resolution.levels.len(), 4);
        assert_eq!(resolution.levels[0], 0);
        assert!(resolution.diagnostics.is_empty());
    }

    #[test]
    fn test_mirror_flags_match_classifier_at_odd_levels() {
        let classifier = UnicodeClassifier;
        for text in SAMPLES {
            let resolution = resolve(text);
            for (i, ch) in text.chars().enumerate() {
                let mirrorable =
                    classifier.mirrored(ch) || classifier.bracket_info(ch).is_some();
                let expected = mirrorable && !is_removed(ch) && resolution.levels[i] % 2 == 1;
                assert_eq!(resolution.mirrored[i], expected, "{text:?} at {i}");
                if resolution.mirrored[i] {
                    assert_eq!(resolution.levels[i] % 2, 1);
                }
            }
        }
    }

    #[test]
    fn test_paragraphs_resolved_independently() {
        let text = "abc\n\u{05D0}\u{05D1}\n123";
        let resolution = resolve(text);
        let bases: Vec<u8> = resolution.paragraphs.iter().map(|p| p.base_level).collect();
        assert_eq!(bases, vec![0, 1, 0]);
        assert_eq!(resolution.paragraphs[1].range, 4..7);
        // The separator closing the RTL paragraph is reset to its base level
        assert_eq!(resolution.levels[6], 1);
        assert_eq!(resolution.visual_order, vec![0, 1, 2, 3, 6, 5, 4, 7, 8, 9]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let text = SAMPLES.join("\n").repeat(8);
        let resolver = resolver();
        assert_eq!(
            resolver.resolve_parallel(&text).unwrap(),
            resolver.resolve(&text).unwrap()
        );
    }

    #[test]
    fn test_logical_to_visual_inverts_visual_order() {
        let text = "abc \u{05D0}\u{202B}\u{05D1}\u{202C} def";
        let resolution = resolve(text);
        let map = resolution.logical_to_visual();
        for (visual, &logical) in resolution.visual_to_logical().iter().enumerate() {
            assert_eq!(map[logical], Some(visual));
        }
        assert_eq!(map[5], None);
        assert_eq!(map[7], None);
    }
}

/// Classifier that treats every ASCII digit as right-to-left
struct DigitsAreRtl;

impl Classifier for DigitsAreRtl {
    fn category_of(&self, ch: char) -> BidiClass {
        if ch.is_ascii_digit() {
            BidiClass::R
        } else {
            UnicodeClassifier.category_of(ch)
        }
    }

    fn bracket_info(&self, ch: char) -> Option<BracketInfo> {
        UnicodeClassifier.bracket_info(ch)
    }

    fn mirrored(&self, ch: char) -> bool {
        UnicodeClassifier.mirrored(ch)
    }

    fn mirror_glyph(&self, ch: char) -> Option<char> {
        match ch {
            '(' => Some(']'),
            ')' => Some('['),
            _ => UnicodeClassifier.mirror_glyph(ch),
        }
    }
}

#[cfg(test)]
mod custom_classifier_tests {
    use super::*;

    #[test]
    fn test_resolver_uses_supplied_classifier() {
        let resolver = BidiResolver::new(DigitsAreRtl);
        let resolution = resolver.resolve("123 abc").unwrap();
        assert_eq!(resolution.paragraphs[0].base_level, 1);
        assert_eq!(resolution.levels, vec![1, 1, 1, 1, 2, 2, 2]);
        assert_eq!(resolution.reorder_text("123 abc"), "abc 321");
    }

    #[test]
    fn test_reorder_text_with_classifier_glyphs() {
        let resolver = BidiResolver::new(DigitsAreRtl);
        let resolution = resolver.resolve("1(2)").unwrap();
        assert_eq!(resolution.levels, vec![1, 1, 1, 1]);
        assert_eq!(resolution.reorder_text("1(2)"), "(2)1");
        assert_eq!(
            resolution.reorder_text_with("1(2)", resolver.classifier()),
            "[2]1"
        );
    }

    #[test]
    fn test_explicit_direction_config() {
        let resolver = BidiResolver::new(DigitsAreRtl).with_config(
            BidiConfig::from_json(r#"{ "base_direction": "ltr", "log_diagnostics": false }"#)
                .unwrap(),
        );
        let resolution = resolver.resolve("123 abc").unwrap();
        assert_eq!(resolution.paragraphs[0].base_level, 0);
        assert_eq!(resolution.levels, vec![1, 1, 1, 0, 0, 0, 0]);
    }
}
