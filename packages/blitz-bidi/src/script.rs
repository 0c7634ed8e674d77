//! Script detection helpers
//!
//! Counts Unicode Script property values over a string. Used to pick a
//! default base direction or language-specific handling before resolution.

use std::collections::HashMap;

use unicode_script::{Script, UnicodeScript};

/// Share of each script in `text`, most frequent first.
///
/// Ties keep the order in which scripts first appear. Returns an empty
/// list for empty input.
pub fn script_shares(text: &str) -> Vec<(Script, f64)> {
    let mut counts: HashMap<Script, (usize, usize)> = HashMap::new();
    let mut total = 0usize;

    for (position, ch) in text.chars().enumerate() {
        let entry = counts.entry(ch.script()).or_insert((0, position));
        entry.0 += 1;
        total += 1;
    }

    let mut shares: Vec<(Script, usize, usize)> = counts
        .into_iter()
        .map(|(script, (count, first))| (script, count, first))
        .collect();
    shares.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    shares
        .into_iter()
        .map(|(script, count, _)| (script, count as f64 / total as f64))
        .collect()
}

/// Most frequent script other than Common and Inherited, with its share of
/// the whole string
///
/// ```
/// use blitz_bidi::script::dominant_script;
/// use unicode_script::Script;
///
/// let (script, share) = dominant_script("שלום, abc").unwrap();
/// assert_eq!(script, Script::Hebrew);
/// assert!(share > 0.4);
/// ```
pub fn dominant_script(text: &str) -> Option<(Script, f64)> {
    script_shares(text)
        .into_iter()
        .find(|(script, _)| !matches!(script, Script::Common | Script::Inherited))
}

/// Whether every character of `text` belongs to `script`. With
/// `allow_common`, Common and Inherited characters (spaces, digits,
/// punctuation, combining marks) are accepted too. Empty text never matches.
pub fn is_script(text: &str, script: Script, allow_common: bool) -> bool {
    !text.is_empty()
        && text.chars().all(|ch| {
            let actual = ch.script();
            actual == script
                || (allow_common && matches!(actual, Script::Common | Script::Inherited))
        })
}

/// Whether the script is written right-to-left
pub fn is_rtl_script(script: Script) -> bool {
    matches!(
        script,
        Script::Arabic
            | Script::Hebrew
            | Script::Syriac
            | Script::Thaana
            | Script::Nko
            | Script::Samaritan
            | Script::Mandaic
            | Script::Adlam
            | Script::Hanifi_Rohingya
            | Script::Mende_Kikakui
            | Script::Old_South_Arabian
            | Script::Imperial_Aramaic
            | Script::Phoenician
            | Script::Yezidi
    )
}
