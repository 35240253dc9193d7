//! Sekai Core - Headless library for sticker character repositories.
//!
//! This crate fetches character metadata from any number of independently
//! hosted repositories, caches it in memory, and merges it into one
//! searchable index. It has no UI; hosts (such as the `sekai-rpc` server)
//! drive it and present its notifications.
//!
//! A repository is two JSON documents under a base URL:
//!
//! - `meta.json`: `{ "name": ..., "description"?: ..., "version"?: ... }`
//! - `characters.json`: `[{ "id", "name", "character", "img", "color" }, ...]`
//!
//! # Example
//!
//! ```rust,ignore
//! use sekai_core::{reload_repositories, RepositoryManager, RepositorySettings};
//!
//! #[tokio::main]
//! async fn main() -> sekai_core::Result<()> {
//!     let manager = RepositoryManager::builder().build()?;
//!
//!     let report = reload_repositories(&manager, &RepositorySettings::default()).await;
//!     println!("{} repositories loaded", report.loaded.len());
//!
//!     for character in manager.search_characters("miku") {
//!         println!("{} ({})", character.name, character.unique_id);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod models;
pub mod network;
pub mod notify;
pub mod reload;
pub mod settings;

pub use error::{Result, SekaiError};
pub use manager::{ChangeListener, RepositoryManager, RepositoryManagerBuilder};
pub use models::{
    build_asset_url, sticker_image_url, unique_id, CharacterRecord, EnhancedCharacter,
    RepositoryData, RepositoryDescriptor, RepositoryMeta, StickerDraft, TextSettings,
};
pub use network::{HttpClient, HttpRepositoryFetcher, RepositoryFetcher};
pub use notify::{LogNotifier, Notification, NotificationSink, QueueNotifier};
pub use reload::{reload_repositories, ReloadReport};
pub use settings::{RepositoryEntry, RepositorySettings};
