//! Reloading the whole configured repository list.

use crate::manager::RepositoryManager;
use crate::models::RepositoryDescriptor;
use crate::settings::RepositorySettings;
use futures::future::join_all;
use serde::Serialize;
use tracing::info;

/// Outcome of a reload, one entry per dispatched repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadReport {
    pub loaded: Vec<RepositoryDescriptor>,
    pub failed: Vec<RepositoryDescriptor>,
    /// Configured entries skipped because they were incomplete.
    pub skipped: usize,
}

impl ReloadReport {
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Clear the cache and load every well-formed configured repository.
///
/// Loads run concurrently and each succeeds or fails on its own; the call
/// returns once all of them have settled.
pub async fn reload_repositories(
    manager: &RepositoryManager,
    settings: &RepositorySettings,
) -> ReloadReport {
    manager.clear_cache();

    let descriptors = settings.descriptors();
    let outcomes = join_all(descriptors.iter().map(|d| manager.load_repository(d))).await;

    let mut report = ReloadReport {
        skipped: settings.incomplete_count(),
        ..Default::default()
    };
    for (descriptor, outcome) in descriptors.into_iter().zip(outcomes) {
        match outcome {
            Some(_) => report.loaded.push(descriptor),
            None => report.failed.push(descriptor),
        }
    }

    info!(
        "Reloaded repositories: {} loaded, {} failed, {} skipped",
        report.loaded.len(),
        report.failed.len(),
        report.skipped
    );
    report
}
