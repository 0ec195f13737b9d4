use std::collections::HashSet;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

/// Keys with an operation currently running. A second `try_acquire` for the
/// same key fails until the first guard is dropped.
#[derive(Clone, Debug)]
pub struct InFlight<K> {
    keys: Arc<Mutex<HashSet<K>>>,
}

impl<K> Default for InFlight<K> {
    fn default() -> Self {
        Self {
            keys: Arc::new(Mutex::new(HashSet::new())),
        }
    }
}

impl<K: Eq + Hash + Clone> InFlight<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self, key: K) -> Option<InFlightGuard<K>> {
        let mut keys = self.keys.lock().expect("in-flight mutex poisoned");
        if !keys.insert(key.clone()) {
            return None;
        }
        Some(InFlightGuard {
            keys: self.keys.clone(),
            key,
        })
    }

    #[cfg(test)]
    pub fn is_busy(&self, key: &K) -> bool {
        self.keys
            .lock()
            .expect("in-flight mutex poisoned")
            .contains(key)
    }
}

#[derive(Debug)]
pub struct InFlightGuard<K: Eq + Hash> {
    keys: Arc<Mutex<HashSet<K>>>,
    key: K,
}

impl<K: Eq + Hash> Drop for InFlightGuard<K> {
    fn drop(&mut self) {
        if let Ok(mut keys) = self.keys.lock() {
            keys.remove(&self.key);
        }
    }
}
