//! Class label to word storage registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use tracing::debug;

use crate::storage::{StorageProvider, WordStorage};

/// Maps class labels to their word storages.
///
/// Storages are created lazily the first time a class is referenced and are
/// never removed.
#[derive(Debug)]
pub struct ClassifierRegistry {
    storages: RwLock<HashMap<String, Arc<dyn WordStorage>>>,
    provider: Arc<dyn StorageProvider>,
    default_probability: f64,
}

impl ClassifierRegistry {
    /// Create an empty registry whose storages come from `provider`.
    pub fn new(provider: Arc<dyn StorageProvider>, default_probability: f64) -> Self {
        ClassifierRegistry {
            storages: RwLock::new(HashMap::new()),
            provider,
            default_probability,
        }
    }

    /// Get the storage for a class, creating and registering it if needed.
    pub fn storage_for(&self, class: &str) -> Arc<dyn WordStorage> {
        if let Some(storage) = self.storages.read().get(class) {
            return Arc::clone(storage);
        }

        // Another thread may have created the class since the read lock was released.
        let storages = self.storages.upgradable_read();
        if let Some(storage) = storages.get(class) {
            return Arc::clone(storage);
        }

        let mut storages = RwLockUpgradableReadGuard::upgrade(storages);
        let storage = self.provider.create_storage(self.default_probability);
        storages.insert(class.to_string(), Arc::clone(&storage));
        debug!(class, provider = self.provider.name(), "created word storage for class");
        storage
    }

    /// Get the storage for a class without creating it.
    pub fn get(&self, class: &str) -> Option<Arc<dyn WordStorage>> {
        self.storages.read().get(class).cloned()
    }

    /// All registered class labels, sorted.
    pub fn classes(&self) -> Vec<String> {
        let mut classes: Vec<String> = self.storages.read().keys().cloned().collect();
        classes.sort();
        classes
    }

    /// A sorted copy of all (class, storage) pairs.
    ///
    /// Scoring works on this copy so the registry lock is not held while
    /// storages are read.
    pub fn storages(&self) -> Vec<(String, Arc<dyn WordStorage>)> {
        let mut storages: Vec<(String, Arc<dyn WordStorage>)> = self
            .storages
            .read()
            .iter()
            .map(|(class, storage)| (class.clone(), Arc::clone(storage)))
            .collect();
        storages.sort_by(|a, b| a.0.cmp(&b.0));
        storages
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.storages.read().len()
    }

    /// Whether no class has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.storages.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DEFAULT_PROBABILITY;
    use crate::storage::memory::MemoryStorageProvider;
    use std::thread;

    fn registry() -> ClassifierRegistry {
        ClassifierRegistry::new(Arc::new(MemoryStorageProvider::default()), DEFAULT_PROBABILITY)
    }

    #[test]
    fn test_storage_for_creates_once() {
        let registry = registry();
        assert!(registry.is_empty());

        let first = registry.storage_for("good");
        first.store("楽").unwrap();
        let second = registry.storage_for("good");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.total(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_idempotent_lookup() {
        let registry = registry();
        registry.storage_for("x").store("a").unwrap();

        let first = registry.storage_for("x");
        let second = registry.storage_for("x");
        assert_eq!(first.total(), second.total());
        assert_eq!(first.get("a").unwrap(), second.get("a").unwrap());
        assert_eq!(first.get("b").unwrap(), second.get("b").unwrap());
    }

    #[test]
    fn test_classes_sorted_and_stable() {
        let registry = registry();
        registry.storage_for("spam");
        registry.storage_for("ham");
        registry.storage_for("eggs");

        assert_eq!(registry.classes(), vec!["eggs", "ham", "spam"]);
        assert_eq!(registry.classes(), registry.classes());
        assert!(registry.get("bacon").is_none());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_probed_class_has_empty_storage() {
        let registry = registry();
        let storage = registry.storage_for("probe");
        assert_eq!(storage.total(), 0);
        assert_eq!(registry.classes(), vec!["probe"]);
    }

    #[test]
    fn test_concurrent_first_reference() {
        let registry = Arc::new(registry());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..100 {
                        registry.storage_for("shared").store("w").unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.storage_for("shared").total(), 800);
    }

    #[test]
    fn test_concurrent_lookups_of_known_classes() {
        let registry = Arc::new(registry());
        for class in ["a", "b", "c"] {
            registry.storage_for(class);
        }

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    let class = ["a", "b", "c"][i % 3];
                    for _ in 0..200 {
                        registry.storage_for(class).store("w").unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.classes(), vec!["a", "b", "c"]);
        let total: u64 = registry.storages().iter().map(|(_, s)| s.total()).sum();
        assert_eq!(total, 1600);
    }
}
