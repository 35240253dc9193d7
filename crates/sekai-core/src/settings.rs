//! User-configured repository list.
//!
//! Users enter the direct URL of a repository's `meta.json` together with a
//! display name. The cache works on base URLs, so entries are converted to
//! [`RepositoryDescriptor`]s before loading.

use crate::config::RepositoryConfig;
use crate::error::{Result, SekaiError};
use crate::models::RepositoryDescriptor;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// One configured repository.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryEntry {
    /// Direct URL of the repository's `meta.json`.
    pub meta_url: String,
    pub name: String,
}

impl RepositoryEntry {
    pub fn new(meta_url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            meta_url: meta_url.into(),
            name: name.into(),
        }
    }

    /// Both the URL and the name are filled in.
    pub fn is_well_formed(&self) -> bool {
        !self.meta_url.trim().is_empty() && !self.name.trim().is_empty()
    }

    /// Base URL the repository documents live under.
    ///
    /// A trailing `/meta.json` is removed; a URL without it is taken to be
    /// the base URL already.
    pub fn base_url(&self) -> String {
        let url = self.meta_url.trim();
        let suffix = format!("/{}", RepositoryConfig::META_DOCUMENT);
        url.strip_suffix(suffix.as_str())
            .unwrap_or(url)
            .trim_end_matches('/')
            .to_string()
    }

    /// Descriptor for loading, or `None` if the entry is incomplete.
    pub fn descriptor(&self) -> Option<RepositoryDescriptor> {
        self.is_well_formed()
            .then(|| RepositoryDescriptor::new(self.name.trim(), self.base_url()))
    }
}

/// The configured repository list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySettings {
    #[serde(default)]
    pub repositories: Vec<RepositoryEntry>,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repositories: vec![RepositoryEntry::new(
                RepositoryConfig::DEFAULT_REPOSITORY_META_URL,
                RepositoryConfig::DEFAULT_REPOSITORY_NAME,
            )],
        }
    }
}

impl RepositorySettings {
    pub fn new(repositories: Vec<RepositoryEntry>) -> Self {
        Self { repositories }
    }

    /// Descriptors for every well-formed entry, in configured order.
    pub fn descriptors(&self) -> Vec<RepositoryDescriptor> {
        self.repositories
            .iter()
            .filter_map(RepositoryEntry::descriptor)
            .collect()
    }

    /// Number of entries skipped as incomplete.
    pub fn incomplete_count(&self) -> usize {
        self.repositories
            .iter()
            .filter(|entry| !entry.is_well_formed())
            .count()
    }

    /// Load settings from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| SekaiError::io_with_path(e, path))?;
        let settings: Self = serde_json::from_str(&contents).map_err(|e| SekaiError::Config {
            message: format!("Invalid settings file {}: {}", path.display(), e),
        })?;
        debug!(
            "Loaded {} repository entries from {}",
            settings.repositories.len(),
            path.display()
        );
        Ok(settings)
    }

    /// Write settings to a JSON file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SekaiError::io_with_path(e, parent))?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|e| SekaiError::io_with_path(e, path))
    }
}
