use std::collections::HashMap;
use std::ffi::c_void;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Maps opaque, never-null handles to shared objects.
///
/// Handles are plain counters cast to pointers and are never dereferenced, so
/// a stale or forged handle only misses the lookup.
pub struct HandleRegistry<T: ?Sized> {
    next: AtomicUsize,
    entries: Mutex<HashMap<usize, Arc<T>>>,
}

impl<T: ?Sized> Default for HandleRegistry<T> {
    fn default() -> Self {
        Self {
            next: AtomicUsize::new(1),
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: ?Sized> HandleRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, value: Arc<T>) -> *mut c_void {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        self.entries().insert(id, value);

        id as *mut c_void
    }

    pub fn get(&self, handle: *const c_void) -> Option<Arc<T>> {
        self.entries().get(&(handle as usize)).cloned()
    }

    pub fn destroy(&self, handle: *const c_void) -> Option<Arc<T>> {
        self.entries().remove(&(handle as usize))
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every registered object, returning how many there were.
    pub fn clear(&self) -> usize {
        self.entries().drain().count()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<usize, Arc<T>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr::null;

    #[test]
    fn handles_are_never_null() {
        let registry = HandleRegistry::<str>::new();

        let handle = registry.create(Arc::from("admin"));

        assert!(!handle.is_null());
        assert_eq!(registry.get(handle).as_deref(), Some("admin"));
    }

    #[test]
    fn unknown_handles_miss() {
        let registry = HandleRegistry::<str>::new();
        registry.create(Arc::from("admin"));

        assert!(registry.get(null()).is_none());
        assert!(registry.get(10 as *const c_void).is_none());
        assert!(registry.destroy(10 as *const c_void).is_none());
    }

    #[test]
    fn destroyed_handles_are_gone() {
        let registry = HandleRegistry::<str>::new();
        let first = registry.create(Arc::from("first"));
        let second = registry.create(Arc::from("second"));
        assert_ne!(first, second);

        assert_eq!(registry.destroy(first).as_deref(), Some("first"));
        assert!(registry.get(first).is_none());
        assert!(registry.destroy(first).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn clear_drops_everything() {
        let registry = HandleRegistry::<str>::new();
        registry.create(Arc::from("first"));
        registry.create(Arc::from("second"));

        assert_eq!(registry.clear(), 2);
        assert!(registry.is_empty());
    }
}
