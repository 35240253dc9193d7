//! Network access for repository documents.
//!
//! This module provides:
//! - An HTTP client wrapper with status checking and JSON decoding
//! - The `RepositoryFetcher` seam the cache manager loads through
//! - Helpers to load a whole repository and to probe a `meta.json` URL

mod client;
mod fetcher;

pub use client::{extract_domain, HttpClient};
pub use fetcher::{
    fetch_repository, probe_repository_name, DynRepositoryFetcher, HttpRepositoryFetcher,
    RepositoryFetcher,
};
