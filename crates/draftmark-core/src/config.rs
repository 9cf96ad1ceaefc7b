//! Engine and rendering options.
//!
//! Options can be built in code or read from a small KDL document:
//!
//! ```kdl
//! cursor-marker "▏"
//! initial-capacity 512
//! bold-weight 700
//! cursor-alpha 40
//! ```

use kdl::{KdlDocument, KdlValue};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Visual parameters handed to the rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// Font weight for bold spans (CSS scale, 600 = semi-bold).
    pub bold_weight: u16,
    /// Foreground opacity of the cursor marker, in percent.
    pub cursor_alpha_percent: u8,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            bold_weight: 600,
            cursor_alpha_percent: 50,
        }
    }
}

impl RenderStyle {
    /// Cursor alpha on the 16-bit scale used by attribute lists.
    pub fn cursor_alpha_u16(&self) -> u16 {
        (u32::from(self.cursor_alpha_percent) * 65535 / 100) as u16
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Codepoint appended to the text to draw the insertion point.
    pub cursor_marker: char,
    /// Spare bytes reserved when a paragraph buffer is created, so that
    /// typing rarely reallocates.
    pub initial_capacity: usize,
    pub style: RenderStyle,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cursor_marker: '_',
            initial_capacity: 256,
            style: RenderStyle::default(),
        }
    }
}

impl EngineConfig {
    /// Parse options from KDL. Missing nodes keep their defaults and unknown
    /// nodes are ignored.
    pub fn from_kdl(source: &str) -> Result<Self> {
        let doc: KdlDocument = source.parse()?;
        let mut config = Self::default();

        if let Some(value) = first_value(&doc, "cursor-marker") {
            let marker = value.as_string().ok_or_else(|| invalid("cursor-marker", "expected a string"))?;
            let mut chars = marker.chars();
            config.cursor_marker = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => return Err(invalid("cursor-marker", "expected exactly one character")),
            };
        }

        if let Some(value) = first_value(&doc, "initial-capacity") {
            let capacity = value
                .as_i64()
                .ok_or_else(|| invalid("initial-capacity", "expected an integer"))?;
            config.initial_capacity = usize::try_from(capacity)
                .map_err(|_| invalid("initial-capacity", "must not be negative"))?;
        }

        if let Some(value) = first_value(&doc, "bold-weight") {
            let weight = value
                .as_i64()
                .ok_or_else(|| invalid("bold-weight", "expected an integer"))?;
            config.style.bold_weight = match u16::try_from(weight) {
                Ok(w @ 100..=1000) => w,
                _ => return Err(invalid("bold-weight", "must be between 100 and 1000")),
            };
        }

        if let Some(value) = first_value(&doc, "cursor-alpha") {
            let alpha = value
                .as_i64()
                .ok_or_else(|| invalid("cursor-alpha", "expected an integer percentage"))?;
            config.style.cursor_alpha_percent = match u8::try_from(alpha) {
                Ok(a @ 0..=100) => a,
                _ => return Err(invalid("cursor-alpha", "must be between 0 and 100")),
            };
        }

        Ok(config)
    }
}

fn first_value<'a>(doc: &'a KdlDocument, name: &str) -> Option<&'a KdlValue> {
    doc.get(name)?.entries().first().map(|entry| entry.value())
}

fn invalid(key: &'static str, reason: &str) -> EngineError {
    EngineError::InvalidConfig {
        key,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.cursor_marker, '_');
        assert_eq!(config.initial_capacity, 256);
        assert_eq!(config.style.bold_weight, 600);
        assert_eq!(config.style.cursor_alpha_u16(), 32767);
    }

    #[test]
    fn test_from_kdl() {
        let config = EngineConfig::from_kdl(
            r#"
            cursor-marker "▏"
            initial-capacity 512
            bold-weight 700
            cursor-alpha 40
            theme "ignored"
            "#,
        )
        .unwrap();
        assert_eq!(config.cursor_marker, '▏');
        assert_eq!(config.initial_capacity, 512);
        assert_eq!(config.style.bold_weight, 700);
        assert_eq!(config.style.cursor_alpha_percent, 40);
    }

    #[test]
    fn test_from_kdl_partial_keeps_defaults() {
        let config = EngineConfig::from_kdl("bold-weight 800\n").unwrap();
        assert_eq!(config.style.bold_weight, 800);
        assert_eq!(config.cursor_marker, '_');
        assert_eq!(config.initial_capacity, 256);
    }

    #[test]
    fn test_from_kdl_rejects_bad_values() {
        assert!(matches!(
            EngineConfig::from_kdl(r#"cursor-marker "ab""#),
            Err(EngineError::InvalidConfig { key: "cursor-marker", .. })
        ));
        assert!(matches!(
            EngineConfig::from_kdl("initial-capacity -1"),
            Err(EngineError::InvalidConfig { key: "initial-capacity", .. })
        ));
        assert!(matches!(
            EngineConfig::from_kdl("cursor-alpha 150"),
            Err(EngineError::InvalidConfig { key: "cursor-alpha", .. })
        ));
        assert!(matches!(
            EngineConfig::from_kdl("bold-weight \"heavy\""),
            Err(EngineError::InvalidConfig { key: "bold-weight", .. })
        ));
    }

    #[test]
    fn test_serde_round_trip() {
        let config = EngineConfig::from_kdl("cursor-marker \"▏\"\ncursor-alpha 40\n").unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<EngineConfig>(&json).unwrap(), config);
    }

    #[test]
    fn test_serde_missing_fields_default() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"style": {"bold_weight": 700}}"#).unwrap();
        assert_eq!(config.cursor_marker, '_');
        assert_eq!(config.initial_capacity, 256);
        assert_eq!(config.style.bold_weight, 700);
        assert_eq!(config.style.cursor_alpha_percent, 50);
    }

    #[test]
    fn test_from_kdl_parse_error() {
        assert!(matches!(
            EngineConfig::from_kdl("cursor-marker \"unterminated"),
            Err(EngineError::ConfigParse(_))
        ));
    }
}
