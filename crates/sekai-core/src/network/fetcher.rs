//! Fetch adapter for repository documents.
//!
//! A repository is two JSON documents under one base URL. The manager only
//! talks to the [`RepositoryFetcher`] trait so hosts (and tests) can supply
//! their own transport; [`HttpRepositoryFetcher`] is the reqwest-backed one.

use crate::config::RepositoryConfig;
use crate::error::Result;
use crate::models::{
    build_asset_url, CharacterRecord, RepositoryData, RepositoryDescriptor, RepositoryMeta,
};
use crate::network::client::HttpClient;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Transport for repository documents.
#[async_trait]
pub trait RepositoryFetcher: Send + Sync {
    /// Fetch and decode a `meta.json` document.
    async fn fetch_meta(&self, meta_url: &str) -> Result<RepositoryMeta>;

    /// Fetch and decode a `characters.json` document.
    async fn fetch_characters(&self, characters_url: &str) -> Result<Vec<CharacterRecord>>;
}

/// Shared handle to a fetcher.
pub type DynRepositoryFetcher = Arc<dyn RepositoryFetcher>;

/// Fetcher backed by [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpRepositoryFetcher {
    http: HttpClient,
}

impl HttpRepositoryFetcher {
    /// Create a fetcher with a default HTTP client.
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: HttpClient::new()?,
        })
    }

    /// Create a fetcher around an existing client.
    pub fn with_client(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl RepositoryFetcher for HttpRepositoryFetcher {
    async fn fetch_meta(&self, meta_url: &str) -> Result<RepositoryMeta> {
        self.http.get_json(meta_url).await
    }

    async fn fetch_characters(&self, characters_url: &str) -> Result<Vec<CharacterRecord>> {
        self.http.get_json(characters_url).await
    }
}

/// Load both documents of a repository and normalize them.
///
/// The character list is only requested once the metadata has been fetched
/// and validated. Any failure aborts the whole load.
pub async fn fetch_repository(
    fetcher: &dyn RepositoryFetcher,
    repository: &RepositoryDescriptor,
) -> Result<RepositoryData> {
    let meta_url = build_asset_url(repository.url(), RepositoryConfig::META_DOCUMENT);
    let meta = fetcher.fetch_meta(&meta_url).await?;
    meta.validate()?;

    let characters_url = build_asset_url(repository.url(), RepositoryConfig::CHARACTERS_DOCUMENT);
    let records = fetcher.fetch_characters(&characters_url).await?;
    for (position, record) in records.iter().enumerate() {
        record.validate(position)?;
    }

    debug!(
        "Fetched repository {} ({} characters)",
        meta.name,
        records.len()
    );

    Ok(RepositoryData::new(repository.clone(), meta, records))
}

/// Fetch a `meta.json` and return the name it declares.
///
/// Used to confirm a user-entered URL points at a repository. Any failure
/// yields `None`.
pub async fn probe_repository_name(
    fetcher: &dyn RepositoryFetcher,
    meta_url: &str,
) -> Option<String> {
    match fetcher.fetch_meta(meta_url).await {
        Ok(meta) if !meta.name.trim().is_empty() => Some(meta.name),
        Ok(_) => {
            debug!("Repository at {} declares no name", meta_url);
            None
        }
        Err(e) => {
            debug!("Probe of {} failed: {}", meta_url, e);
            None
        }
    }
}
