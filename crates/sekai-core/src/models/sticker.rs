//! Asset URL helpers and the plain-data input for composing a sticker.

use crate::config::{RepositoryConfig, StickerConfig};
use crate::models::character::EnhancedCharacter;
use serde::{Deserialize, Serialize};

/// Join a repository base URL and a document or asset path.
pub fn build_asset_url(repository_url: &str, path: &str) -> String {
    format!("{}/{}", repository_url, path)
}

/// URL of a character's sticker image.
///
/// Paths that already carry the `stickers/` prefix are used as-is.
pub fn sticker_image_url(repository_url: &str, img: &str) -> String {
    let prefix = format!("{}/", RepositoryConfig::STICKERS_DIR);
    if img.starts_with(&prefix) {
        build_asset_url(repository_url, img)
    } else {
        build_asset_url(repository_url, &format!("{}{}", prefix, img))
    }
}

/// Placement of the caption on the sticker canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSettings {
    pub text: String,
    pub x: i32,
    pub y: i32,
    /// Font size in pixels.
    pub size: u32,
    /// Rotation in tenths of a radian.
    pub rotation: i32,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            text: StickerConfig::DEFAULT_TEXT.to_string(),
            x: StickerConfig::DEFAULT_X,
            y: StickerConfig::DEFAULT_Y,
            size: StickerConfig::DEFAULT_FONT_SIZE,
            rotation: StickerConfig::DEFAULT_ROTATION,
        }
    }
}

/// Everything a renderer needs to draw one sticker.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerDraft {
    pub character: EnhancedCharacter,
    pub image_url: String,
    pub text: TextSettings,
    pub line_spacing: u32,
    pub curve: bool,
}

impl StickerDraft {
    /// Start a draft for `character` with the default caption.
    pub fn new(character: EnhancedCharacter, repository_url: &str) -> Self {
        let image_url = sticker_image_url(repository_url, &character.img);
        Self {
            character,
            image_url,
            text: TextSettings::default(),
            line_spacing: StickerConfig::DEFAULT_LINE_SPACING,
            curve: false,
        }
    }

    /// Replace the caption, keeping placement.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text.text = text.into();
        self
    }

    /// Caption lines in draw order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.text.split('\n')
    }

    /// Total arc angle used when the caption is curved.
    pub fn curve_angle(&self) -> f64 {
        std::f64::consts::PI * self.text.text.chars().count() as f64 / 7.0
    }
}
