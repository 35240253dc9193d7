//! Repository descriptors, metadata, and the loaded per-repository unit.

use crate::config::RepositoryConfig;
use crate::error::{Result, SekaiError};
use crate::models::character::{CharacterRecord, EnhancedCharacter};
use serde::{Deserialize, Serialize};

/// Names a repository and the base URL its documents live under.
///
/// The URL is the cache key. Descriptors are immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    name: String,
    url: String,
}

impl RepositoryDescriptor {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Display name given by the user.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base URL, also the cache key.
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Contents of a repository's `meta.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl RepositoryMeta {
    /// The declared name prefixes every composite id, so it must be present.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SekaiError::invalid_document(
                RepositoryConfig::META_DOCUMENT,
                "repository name is empty",
            ));
        }
        Ok(())
    }
}

/// One successfully loaded repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct RepositoryData {
    pub meta: RepositoryMeta,
    pub characters: Vec<EnhancedCharacter>,
    pub repository: RepositoryDescriptor,
}

impl RepositoryData {
    /// Normalize raw records under the repository's declared name.
    pub(crate) fn new(
        repository: RepositoryDescriptor,
        meta: RepositoryMeta,
        records: Vec<CharacterRecord>,
    ) -> Self {
        let characters = records
            .into_iter()
            .map(|record| EnhancedCharacter::new(record, &meta.name))
            .collect();

        Self {
            meta,
            characters,
            repository,
        }
    }

    /// Cache key of this repository.
    pub fn key(&self) -> &str {
        self.repository.url()
    }

    /// Characters shown in this repository's picker tab for `query`.
    ///
    /// An empty query shows the whole tab. Otherwise a character qualifies on
    /// an exact id match or a case-insensitive substring of its display or
    /// in-universe name.
    pub fn search(&self, query: &str) -> Vec<&EnhancedCharacter> {
        let lowered = query.to_lowercase();
        self.characters
            .iter()
            .filter(|c| c.matches_picker(&lowered))
            .collect()
    }
}
