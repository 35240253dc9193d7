//! Centralized configuration for the Sekai sticker library.
//!
//! This module provides configuration constants for network operations,
//! repository document layout, and sticker composition defaults.

use std::time::Duration;

/// Application-level configuration.
pub struct AppConfig;

impl AppConfig {
    pub const APP_NAME: &'static str = "SekaiPlus";
    pub const USER_AGENT: &'static str = "SekaiPlus-Stickers/1.0";
}

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
}

/// Layout of a sticker repository on its host.
pub struct RepositoryConfig;

impl RepositoryConfig {
    pub const META_DOCUMENT: &'static str = "meta.json";
    pub const CHARACTERS_DOCUMENT: &'static str = "characters.json";
    pub const STICKERS_DIR: &'static str = "stickers";
    pub const DEFAULT_REPOSITORY_NAME: &'static str = "Project Sekai Stickers";
    pub const DEFAULT_REPOSITORY_META_URL: &'static str =
        "https://raw.githubusercontent.com/ItsLogic/SekaiPlus/refs/heads/sekai/meta.json";
}

/// Default text placement for a freshly composed sticker.
pub struct StickerConfig;

impl StickerConfig {
    pub const DEFAULT_TEXT: &'static str = "奏でーかわいい";
    pub const DEFAULT_X: i32 = 148;
    pub const DEFAULT_Y: i32 = 128;
    pub const DEFAULT_FONT_SIZE: u32 = 24;
    pub const DEFAULT_ROTATION: i32 = 0;
    pub const DEFAULT_LINE_SPACING: u32 = 36;
}
