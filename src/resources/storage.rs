use parking_lot::RwLock;
use slotmap::{Key, SlotMap};
use std::sync::Arc;

/// Thread-safe handle-keyed store.
///
/// Writers take `&self`, so a storage can be shared with a renderer thread
/// behind an `Arc` while the frame loop installs and releases resources.
pub struct ResourceStorage<H: Key, T> {
    map: RwLock<SlotMap<H, Arc<T>>>,
}

impl<H: Key, T> Default for ResourceStorage<H, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Key, T> ResourceStorage<H, T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: RwLock::new(SlotMap::with_key()),
        }
    }

    pub fn add(&self, resource: impl Into<T>) -> H {
        self.map.write().insert(Arc::new(resource.into()))
    }

    #[must_use]
    pub fn get(&self, handle: H) -> Option<Arc<T>> {
        self.map.read().get(handle).cloned()
    }

    #[must_use]
    pub fn contains(&self, handle: H) -> bool {
        self.map.read().contains_key(handle)
    }

    /// Drops the storage's reference. Readers still holding the `Arc` keep
    /// the data alive; the handle itself is dead from now on.
    pub fn remove(&self, handle: H) -> Option<Arc<T>> {
        self.map.write().remove(handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Handles of every live entry.
    #[must_use]
    pub fn handles(&self) -> Vec<H> {
        self.map.read().keys().collect()
    }
}

impl<H: Key, T> std::fmt::Debug for ResourceStorage<H, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceStorage")
            .field("len", &self.len())
            .finish()
    }
}
