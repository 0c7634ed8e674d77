//! Configuration for bidi resolution
//!
//! A [`BidiConfig`] selects the base direction, the characters that split
//! input into paragraphs and whether diagnostics are logged.

use serde::{Deserialize, Serialize};

use crate::error::{BidiError, BidiResult};
use crate::types::Direction;

/// Characters that terminate a paragraph (rule P1)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParagraphSeparators {
    /// Every character the classifier reports as `B`
    #[default]
    Unicode,
    /// Only the listed characters
    Custom(Vec<char>),
}

impl ParagraphSeparators {
    /// Whether `ch`, classified as `class`, ends a paragraph
    #[inline]
    pub fn is_separator(&self, ch: char, class: unicode_bidi::BidiClass) -> bool {
        match self {
            ParagraphSeparators::Unicode => class == unicode_bidi::BidiClass::B,
            ParagraphSeparators::Custom(chars) => chars.contains(&ch),
        }
    }
}

/// Configuration for a [`BidiResolver`](crate::BidiResolver)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidiConfig {
    /// Base direction applied to every paragraph; `Auto` runs P2/P3
    pub base_direction: Direction,
    /// Paragraph boundary characters
    pub paragraph_separators: ParagraphSeparators,
    /// Emit `log::warn!` for nesting and bracket overflow diagnostics
    pub log_diagnostics: bool,
}

impl Default for BidiConfig {
    fn default() -> Self {
        Self {
            base_direction: Direction::Auto,
            paragraph_separators: ParagraphSeparators::Unicode,
            log_diagnostics: true,
        }
    }
}

/// On-disk shape of a config; directions are plain strings so that a bad
/// value is reported as `InvalidBaseDirection` instead of a serde error
#[derive(Debug, Deserialize)]
struct RawBidiConfig {
    base_direction: Option<String>,
    paragraph_separators: Option<Vec<char>>,
    log_diagnostics: Option<bool>,
}

impl BidiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_direction(mut self, direction: Direction) -> Self {
        self.base_direction = direction;
        self
    }

    /// Parse and set the base direction from `auto`, `ltr` or `rtl`
    pub fn with_base_direction_str(mut self, direction: &str) -> BidiResult<Self> {
        self.base_direction = direction.parse()?;
        Ok(self)
    }

    pub fn with_paragraph_separators(mut self, separators: ParagraphSeparators) -> Self {
        self.paragraph_separators = separators;
        self
    }

    pub fn with_log_diagnostics(mut self, enabled: bool) -> Self {
        self.log_diagnostics = enabled;
        self
    }

    /// Load a config from JSON. Missing fields keep their defaults.
    ///
    /// ```
    /// use blitz_bidi::{BidiConfig, Direction};
    ///
    /// let config = BidiConfig::from_json(r#"{ "base_direction": "rtl" }"#).unwrap();
    /// assert_eq!(config.base_direction, Direction::RightToLeft);
    /// ```
    pub fn from_json(json: &str) -> BidiResult<Self> {
        let raw: RawBidiConfig = serde_json::from_str(json)?;
        let mut config = Self::default();

        if let Some(direction) = raw.base_direction {
            config.base_direction = direction.parse()?;
        }
        if let Some(separators) = raw.paragraph_separators {
            config.paragraph_separators = ParagraphSeparators::Custom(separators);
        }
        if let Some(log_diagnostics) = raw.log_diagnostics {
            config.log_diagnostics = log_diagnostics;
        }

        Ok(config)
    }

    /// Serialize to the same JSON shape accepted by [`BidiConfig::from_json`]
    pub fn to_json(&self) -> BidiResult<String> {
        let mut value = serde_json::json!({
            "base_direction": self.base_direction.as_str(),
            "log_diagnostics": self.log_diagnostics,
        });
        if let ParagraphSeparators::Custom(chars) = &self.paragraph_separators {
            value["paragraph_separators"] = serde_json::to_value(chars)?;
        }
        serde_json::to_string(&value).map_err(BidiError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BidiConfig::default();
        assert_eq!(config.base_direction, Direction::Auto);
        assert_eq!(config.paragraph_separators, ParagraphSeparators::Unicode);
        assert!(config.log_diagnostics);
    }

    #[test]
    fn test_from_json_with_custom_separators() {
        let config = BidiConfig::from_json(
            r#"{ "base_direction": "LTR", "paragraph_separators": ["|"], "log_diagnostics": false }"#,
        )
        .unwrap();
        assert_eq!(config.base_direction, Direction::LeftToRight);
        assert_eq!(
            config.paragraph_separators,
            ParagraphSeparators::Custom(vec!['|'])
        );
        assert!(!config.log_diagnostics);
    }

    #[test]
    fn test_from_json_rejects_bad_direction() {
        let err = BidiConfig::from_json(r#"{ "base_direction": "upward" }"#).unwrap_err();
        assert!(matches!(err, BidiError::InvalidBaseDirection(ref d) if d == "upward"));
    }

    #[test]
    fn test_from_json_rejects_malformed_json() {
        let err = BidiConfig::from_json("{ base_direction").unwrap_err();
        assert!(matches!(err, BidiError::Serialization(_)));
    }

    #[test]
    fn test_json_round_trip_keeps_custom_separators() {
        let config = BidiConfig::new()
            .with_base_direction(Direction::RightToLeft)
            .with_paragraph_separators(ParagraphSeparators::Custom(vec!['\n', '\u{2029}']));
        let json = config.to_json().unwrap();
        assert_eq!(BidiConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_with_base_direction_str() {
        let config = BidiConfig::new().with_base_direction_str("rtl").unwrap();
        assert_eq!(config.base_direction, Direction::RightToLeft);
        assert!(BidiConfig::new().with_base_direction_str("ttb").is_err());
    }
}
