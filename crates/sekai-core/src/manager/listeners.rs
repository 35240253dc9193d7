//! Change listener registry.

use std::sync::Arc;

/// Callback invoked after the manager's repository set changes.
pub type ChangeListener = Arc<dyn Fn() + Send + Sync + 'static>;

/// Listeners in registration order, unique by `Arc` identity.
#[derive(Default)]
pub(crate) struct ChangeListeners {
    listeners: Vec<ChangeListener>,
}

impl ChangeListeners {
    /// Returns false when this exact listener was already registered.
    pub(crate) fn add(&mut self, listener: ChangeListener) -> bool {
        if self.position(&listener).is_some() {
            return false;
        }
        self.listeners.push(listener);
        true
    }

    /// Returns false when the listener was not registered.
    pub(crate) fn remove(&mut self, listener: &ChangeListener) -> bool {
        match self.position(listener) {
            Some(pos) => {
                self.listeners.remove(pos);
                true
            }
            None => false,
        }
    }

    pub(crate) fn snapshot(&self) -> Vec<ChangeListener> {
        self.listeners.clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    fn position(&self, listener: &ChangeListener) -> Option<usize> {
        let target = Arc::as_ptr(listener) as *const ();
        self.listeners
            .iter()
            .position(|l| Arc::as_ptr(l) as *const () == target)
    }
}

impl std::fmt::Debug for ChangeListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeListeners")
            .field("count", &self.len())
            .finish()
    }
}
