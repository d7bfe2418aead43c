use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{convert::WallOptions, math::Vec3, Result};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub text: TextConfig,
    pub walls: WallOptions,
}

impl AppConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizontalAnchor {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalAnchor {
    Top,
    Center,
    #[default]
    Bottom,
}

/// Layout settings for text built from a letter model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextConfig {
    pub horizontal_anchor: HorizontalAnchor,
    pub vertical_anchor: VerticalAnchor,
    pub position: Option<Vec3>,
    pub rotation: Option<Vec3>,
    pub scale: Option<Vec3>,
    /// Height of the finished text in world units.
    pub height: f64,
    /// Fraction of the model height used as the advance of each letter.
    pub letter_spacing: f64,
    /// Fraction of the letter advance used as the width of a space.
    pub word_spacing: f64,
    /// Fail on characters the model has no pieces for instead of skipping them.
    pub strict: bool,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            horizontal_anchor: HorizontalAnchor::default(),
            vertical_anchor: VerticalAnchor::default(),
            position: None,
            rotation: None,
            scale: None,
            height: 2.0,
            letter_spacing: 0.8,
            word_spacing: 0.8,
            strict: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.text.height, 2.0);
        assert_eq!(config.text.horizontal_anchor, HorizontalAnchor::Center);
        assert_eq!(config.text.vertical_anchor, VerticalAnchor::Bottom);
        assert_eq!(config.walls.anim_freq, 1.0 / 64.0);
    }

    #[test]
    fn partial_sections_override_defaults() {
        let json = r#"{
            "text": {"horizontalAnchor": "Left", "height": 4, "position": [0, 2, 10]},
            "walls": {"distribution": null, "optimizer": {"tolerance": 0.1}}
        }"#;
        let config = AppConfig::from_json_str(json).unwrap();
        assert_eq!(config.text.horizontal_anchor, HorizontalAnchor::Left);
        assert_eq!(config.text.height, 4.0);
        assert_eq!(config.text.position, Some([0.0, 2.0, 10.0]));
        assert_eq!(config.text.letter_spacing, 0.8);
        assert_eq!(config.walls.distribution, None);
        assert_eq!(config.walls.optimizer.tolerance, 0.1);
        assert!(config.walls.optimizer.remove_duplicates);
    }

    #[test]
    fn rejects_unknown_anchor() {
        let err = AppConfig::from_json_str(r#"{"text": {"verticalAnchor": "Middle"}}"#);
        assert!(err.is_err());
    }
}
