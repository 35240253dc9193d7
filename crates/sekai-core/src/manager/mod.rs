//! Repository cache manager.
//!
//! Owns every successfully loaded repository, the flattened character index
//! built from them, and the listeners told about changes.
//!
//! # Architecture
//!
//! ```text
//! RepositoryManager (cheap clone, Arc inside)
//!     │
//!     ├── RepositoryFetcher - meta.json, then characters.json
//!     │
//!     ├── ManagerState (one lock, never held across .await)
//!     │     ├── repositories + insertion order
//!     │     ├── in-flight loads (Shared futures, one per URL)
//!     │     ├── CharacterIndex (rebuilt on every change)
//!     │     └── generation (bumped by clear_cache)
//!     │
//!     ├── ChangeListeners
//!     │
//!     └── NotificationSink - load failures
//! ```

mod builder;
mod index;
mod listeners;

pub use builder::RepositoryManagerBuilder;
pub use listeners::ChangeListener;

use crate::models::{EnhancedCharacter, RepositoryData, RepositoryDescriptor, StickerDraft};
use crate::network::{fetch_repository, probe_repository_name, DynRepositoryFetcher};
use crate::notify::{DynNotificationSink, Notification};
use futures::future::{BoxFuture, FutureExt, Shared};
use index::CharacterIndex;
use listeners::ChangeListeners;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

type LoadFuture = Shared<BoxFuture<'static, Option<Arc<RepositoryData>>>>;

struct InFlightLoad {
    generation: u64,
    future: LoadFuture,
}

#[derive(Default)]
struct ManagerState {
    repositories: HashMap<String, Arc<RepositoryData>>,
    order: Vec<String>,
    loading: HashMap<String, InFlightLoad>,
    index: CharacterIndex,
    generation: u64,
}

impl ManagerState {
    fn insert(&mut self, key: &str, data: Arc<RepositoryData>) {
        if self.repositories.insert(key.to_string(), data).is_none() {
            self.order.push(key.to_string());
        }
        let repositories = &self.repositories;
        self.index
            .rebuild(self.order.iter().filter_map(|k| repositories.get(k)));
    }

    /// Empty the cache and detach in-flight loads.
    ///
    /// The detached loads are returned so the caller can drop them after
    /// releasing the state lock: dropping the last handle to a load runs its
    /// `LoadGuard`, which takes the same lock.
    fn clear(&mut self) -> HashMap<String, InFlightLoad> {
        self.generation += 1;
        self.repositories.clear();
        self.order.clear();
        self.index.clear();
        std::mem::take(&mut self.loading)
    }
}

struct ManagerInner {
    fetcher: DynRepositoryFetcher,
    notifier: DynNotificationSink,
    state: Mutex<ManagerState>,
    listeners: Mutex<ChangeListeners>,
}

impl ManagerInner {
    fn state(&self) -> MutexGuard<'_, ManagerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn listeners(&self) -> MutexGuard<'_, ChangeListeners> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify_change(&self) {
        let listeners = self.listeners().snapshot();
        for listener in listeners {
            listener();
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.state().generation == generation
    }

    async fn run_load(
        self: Arc<Self>,
        repository: RepositoryDescriptor,
        generation: u64,
    ) -> Option<Arc<RepositoryData>> {
        let _guard = LoadGuard {
            inner: &self,
            key: repository.url(),
            generation,
        };

        match fetch_repository(self.fetcher.as_ref(), &repository).await {
            Ok(data) => self.commit(repository.url(), data, generation),
            Err(e) => {
                if self.is_current(generation) {
                    warn!("Failed to load repository {}: {}", repository.name(), e);
                    self.notifier
                        .notify(Notification::load_failure(repository.name(), &e));
                } else {
                    debug!(
                        "Ignoring failure of {} from before the last cache clear: {}",
                        repository.name(),
                        e
                    );
                }
                None
            }
        }
    }

    fn commit(
        &self,
        key: &str,
        data: RepositoryData,
        generation: u64,
    ) -> Option<Arc<RepositoryData>> {
        let data = Arc::new(data);
        {
            let mut state = self.state();
            if state.generation != generation {
                debug!("Discarding load of {} from before the last cache clear", key);
                return None;
            }
            state.insert(key, Arc::clone(&data));
            info!(
                "Loaded repository {} ({} characters, {} indexed)",
                data.meta.name,
                data.characters.len(),
                state.index.len()
            );
        }
        self.notify_change();
        Some(data)
    }
}

/// Drops the in-flight marker for one load on every exit path, unless a
/// cache clear already replaced it.
struct LoadGuard<'a> {
    inner: &'a ManagerInner,
    key: &'a str,
    generation: u64,
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        let finished = {
            let mut state = self.inner.state();
            let owned = state
                .loading
                .get(self.key)
                .map(|load| load.generation == self.generation)
                .unwrap_or(false);
            if owned {
                state.loading.remove(self.key)
            } else {
                None
            }
        };
        drop(finished);
    }
}

/// In-memory cache of sticker repositories and their characters.
///
/// Cloning yields another handle to the same cache. Build one per host
/// lifetime and hand clones to consumers.
///
/// # Example
///
/// ```rust,ignore
/// use sekai_core::{RepositoryDescriptor, RepositoryManager};
///
/// let manager = RepositoryManager::builder().build()?;
/// let alpha = RepositoryDescriptor::new("Alpha", "https://example.com/alpha");
/// if let Some(data) = manager.load_repository(&alpha).await {
///     println!("{} characters", data.characters.len());
/// }
/// let hits = manager.search_characters("miku");
/// ```
#[derive(Clone)]
pub struct RepositoryManager {
    inner: Arc<ManagerInner>,
}

impl RepositoryManager {
    /// Create a manager over the given fetcher and notification sink.
    pub fn new(fetcher: DynRepositoryFetcher, notifier: DynNotificationSink) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                fetcher,
                notifier,
                state: Mutex::new(ManagerState::default()),
                listeners: Mutex::new(ChangeListeners::default()),
            }),
        }
    }

    /// Create a builder with HTTP fetching and log notifications by default.
    pub fn builder() -> RepositoryManagerBuilder {
        RepositoryManagerBuilder::new()
    }

    /// Load a repository, or return it from the cache.
    ///
    /// Concurrent calls for the same URL share one fetch and one result. A
    /// URL that is already loaded returns immediately without network
    /// activity. Failures are reported through the notification sink and
    /// yield `None`.
    pub async fn load_repository(
        &self,
        repository: &RepositoryDescriptor,
    ) -> Option<Arc<RepositoryData>> {
        let load = {
            let mut state = self.inner.state();
            let key = repository.url();

            if let Some(in_flight) = state.loading.get(key) {
                debug!("Joining in-flight load of {}", key);
                in_flight.future.clone()
            } else if let Some(data) = state.repositories.get(key) {
                return Some(Arc::clone(data));
            } else {
                let generation = state.generation;
                let future = Arc::clone(&self.inner)
                    .run_load(repository.clone(), generation)
                    .boxed()
                    .shared();
                state.loading.insert(
                    key.to_string(),
                    InFlightLoad {
                        generation,
                        future: future.clone(),
                    },
                );
                debug!("Started load of {} ({})", repository.name(), key);
                future
            }
        };

        load.await
    }

    /// Snapshot of every loaded repository, in load order.
    pub fn all_repositories(&self) -> Vec<Arc<RepositoryData>> {
        let state = self.inner.state();
        state
            .order
            .iter()
            .filter_map(|key| state.repositories.get(key).cloned())
            .collect()
    }

    /// A loaded repository by its base URL.
    pub fn repository(&self, url: &str) -> Option<Arc<RepositoryData>> {
        self.inner.state().repositories.get(url).cloned()
    }

    /// Look up a character by composite id.
    pub fn character_by_unique_id(&self, unique_id: &str) -> Option<EnhancedCharacter> {
        self.inner.state().index.get(unique_id).cloned()
    }

    /// Case-insensitive substring search over id, name, in-universe name,
    /// and composite id. An empty query returns the whole index.
    pub fn search_characters(&self, query: &str) -> Vec<EnhancedCharacter> {
        self.inner.state().index.search(query)
    }

    /// Drop every repository and detach in-flight loads.
    ///
    /// Loads still awaited by a caller finish their fetches but their results
    /// are discarded. Loads nobody awaits any more are cancelled. Listeners
    /// are told once.
    pub fn clear_cache(&self) {
        let detached = self.inner.state().clear();
        // Outside the lock; see ManagerState::clear
        drop(detached);
        info!("Repository cache cleared");
        self.inner.notify_change();
    }

    /// Register a listener. Registering the same `Arc` twice has no effect.
    pub fn add_change_listener(&self, listener: ChangeListener) {
        if !self.inner.listeners().add(listener) {
            debug!("Change listener already registered");
        }
    }

    /// Deregister a listener. Unknown listeners are ignored.
    pub fn remove_change_listener(&self, listener: &ChangeListener) {
        self.inner.listeners().remove(listener);
    }

    /// Number of loaded repositories.
    pub fn repository_count(&self) -> usize {
        self.inner.state().repositories.len()
    }

    /// Number of indexed characters.
    pub fn character_count(&self) -> usize {
        self.inner.state().index.len()
    }

    /// Whether a load for `url` is currently in flight.
    pub fn is_loading(&self, url: &str) -> bool {
        self.inner.state().loading.contains_key(url)
    }

    /// Start a sticker for an indexed character with the default caption.
    pub fn sticker_draft(&self, unique_id: &str) -> Option<StickerDraft> {
        let state = self.inner.state();
        let character = state.index.get(unique_id)?.clone();
        // Several repositories may declare the same name; the index kept the
        // last one, so resolve the URL the same way.
        let url = state
            .order
            .iter()
            .rev()
            .filter_map(|key| state.repositories.get(key))
            .find(|data| data.characters.contains(&character))
            .map(|data| data.repository.url().to_string())?;
        Some(StickerDraft::new(character, &url))
    }

    /// Fetch a `meta.json` and return its declared name without caching it.
    pub async fn probe_repository(&self, meta_url: &str) -> Option<String> {
        probe_repository_name(self.inner.fetcher.as_ref(), meta_url).await
    }
}

impl std::fmt::Debug for RepositoryManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state();
        f.debug_struct("RepositoryManager")
            .field("repositories", &state.order)
            .field("loading", &state.loading.keys().collect::<Vec<_>>())
            .field("characters", &state.index.len())
            .field("generation", &state.generation)
            .finish()
    }
}
