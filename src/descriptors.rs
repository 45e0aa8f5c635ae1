//! Provider descriptors for introspection and diagnostics.

use crate::key::TypeKey;
use crate::lifetime::Lifetime;

/// Snapshot of one registered provider.
///
/// Returned by [`Injector::descriptors`](crate::Injector::descriptors).
/// Useful for startup health checks, debugging wiring problems and dumping
/// the dependency graph.
///
/// # Examples
///
/// ```rust
/// use katana_di::{Injector, Lifetime};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct Repository { db: Arc<Database> }
///
/// let mut injector = Injector::new();
/// injector
///     .provide_value(Database { url: "postgres://localhost".to_string() })?
///     .provide_new(|db: Arc<Database>| Repository { db })?;
///
/// let descriptors = injector.descriptors();
/// let repo = descriptors
///     .iter()
///     .find(|d| d.type_name().ends_with("Repository"))
///     .unwrap();
///
/// assert_eq!(repo.lifetime, Lifetime::New);
/// assert_eq!(repo.dependency_count(), 1);
/// assert!(repo.depends_on::<Database>());
/// assert!(!repo.cached);
/// # Ok::<(), katana_di::DiError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ProviderDescriptor {
    /// Key the provider is registered under
    pub key: TypeKey,
    pub lifetime: Lifetime,
    /// Constructor parameter keys, in call order
    pub dependencies: Vec<TypeKey>,
    /// Type name of the constructor function or closure
    pub implementation: &'static str,
    /// Whether a singleton instance has already been built
    pub cached: bool,
}

impl ProviderDescriptor {
    /// Name of the provided type.
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }

    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
    }

    /// Whether the constructor takes an `Arc<T>` parameter.
    pub fn depends_on<T: ?Sized + 'static>(&self) -> bool {
        let key = TypeKey::of::<T>();
        self.dependencies.contains(&key)
    }

    pub fn is_singleton(&self) -> bool {
        self.lifetime == Lifetime::Singleton
    }
}
