//! Provider registry.

use std::sync::Arc;

use crate::callable::Instance;
use crate::error::{DiError, DiResult};
use crate::key::TypeKey;
use crate::lifetime::Lifetime;

#[cfg(feature = "ahash")]
pub(crate) type KeyMap<V> = std::collections::HashMap<TypeKey, V, ahash::RandomState>;
#[cfg(not(feature = "ahash"))]
pub(crate) type KeyMap<V> = std::collections::HashMap<TypeKey, V>;

/// Erased constructor: resolved arguments in, erased instance out.
pub(crate) type Construct = Arc<dyn Fn(&[Instance]) -> DiResult<Instance> + Send + Sync>;

/// A registered provider: lifetime, parameter keys and constructor.
pub(crate) struct ProviderEntry {
    pub(crate) key: TypeKey,
    pub(crate) lifetime: Lifetime,
    /// Keys of the constructor parameters, in call order
    pub(crate) dependencies: Vec<TypeKey>,
    pub(crate) construct: Construct,
    /// Name of the constructor type, for diagnostics
    pub(crate) implementation: &'static str,
}

impl ProviderEntry {
    pub(crate) fn new(
        key: TypeKey,
        lifetime: Lifetime,
        dependencies: Vec<TypeKey>,
        construct: Construct,
        implementation: &'static str,
    ) -> Self {
        Self {
            key,
            lifetime,
            dependencies,
            construct,
            implementation,
        }
    }

    /// Runs the constructor on arguments given in `dependencies` order.
    #[inline]
    pub(crate) fn build(&self, args: &[Instance]) -> DiResult<Instance> {
        (self.construct)(args)
    }
}

/// Maps each type key to exactly one provider.
///
/// Entries are reference counted so cloning the registry for a derived
/// injector copies the map, not the constructors.
#[derive(Clone, Default)]
pub(crate) struct Registry {
    entries: KeyMap<Arc<ProviderEntry>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds `entry`, refusing a second provider for the same key.
    pub(crate) fn register(&mut self, entry: ProviderEntry) -> DiResult<()> {
        if self.entries.contains_key(&entry.key) {
            return Err(DiError::AlreadyRegistered(entry.key));
        }
        self.entries.insert(entry.key, Arc::new(entry));
        Ok(())
    }

    pub(crate) fn lookup(&self, key: &TypeKey) -> DiResult<Arc<ProviderEntry>> {
        self.entries
            .get(key)
            .cloned()
            .ok_or(DiError::NoProvider(*key))
    }

    #[inline]
    pub(crate) fn get(&self, key: &TypeKey) -> Option<&Arc<ProviderEntry>> {
        self.entries.get(key)
    }

    #[inline]
    pub(crate) fn contains_key(&self, key: &TypeKey) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Arc<ProviderEntry>> {
        self.entries.values()
    }
}
