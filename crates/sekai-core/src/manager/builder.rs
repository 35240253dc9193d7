//! Builder for configuring a RepositoryManager.

use crate::config::NetworkConfig;
use crate::error::Result;
use crate::manager::RepositoryManager;
use crate::network::{DynRepositoryFetcher, HttpClient, HttpRepositoryFetcher};
use crate::notify::{DynNotificationSink, LogNotifier};
use std::sync::Arc;
use std::time::Duration;

/// Builder for configuring a [`RepositoryManager`].
///
/// # Example
///
/// ```rust,ignore
/// use sekai_core::{QueueNotifier, RepositoryManager};
/// use std::sync::Arc;
///
/// let notifications = Arc::new(QueueNotifier::new());
/// let manager = RepositoryManager::builder()
///     .request_timeout(Duration::from_secs(5))
///     .notifier(notifications.clone())
///     .build()?;
/// ```
pub struct RepositoryManagerBuilder {
    fetcher: Option<DynRepositoryFetcher>,
    notifier: Option<DynNotificationSink>,
    request_timeout: Duration,
}

impl RepositoryManagerBuilder {
    pub fn new() -> Self {
        Self {
            fetcher: None,
            notifier: None,
            request_timeout: NetworkConfig::REQUEST_TIMEOUT,
        }
    }

    /// Use a custom fetcher instead of HTTP.
    ///
    /// Overrides `request_timeout`.
    pub fn fetcher(mut self, fetcher: DynRepositoryFetcher) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Where load failures are reported.
    ///
    /// Default: log only.
    pub fn notifier(mut self, notifier: DynNotificationSink) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Timeout for each document request of the default HTTP fetcher.
    ///
    /// Default: `NetworkConfig::REQUEST_TIMEOUT`
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build the manager.
    pub fn build(self) -> Result<RepositoryManager> {
        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => {
                let http = HttpClient::with_timeout(self.request_timeout)?;
                Arc::new(HttpRepositoryFetcher::with_client(http))
            }
        };
        let notifier = self.notifier.unwrap_or_else(|| Arc::new(LogNotifier));

        Ok(RepositoryManager::new(fetcher, notifier))
    }
}

impl Default for RepositoryManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
