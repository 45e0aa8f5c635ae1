//! Singleton instance cache.

use crate::callable::Instance;
use crate::key::TypeKey;
use crate::registration::KeyMap;

/// Singleton instances keyed by type.
///
/// Entries are written once, the first time a singleton provider runs.
/// Nothing prevents an overwrite, the injector simply never issues one.
#[derive(Clone, Default)]
pub(crate) struct InstanceCache {
    instances: KeyMap<Instance>,
}

impl InstanceCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn get(&self, key: &TypeKey) -> Option<Instance> {
        self.instances.get(key).cloned()
    }

    pub(crate) fn put(&mut self, key: TypeKey, instance: Instance) {
        self.instances.insert(key, instance);
    }

    pub(crate) fn contains_key(&self, key: &TypeKey) -> bool {
        self.instances.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.instances.len()
    }
}
