//! Provider lifetime definitions.

/// Lifetime policy controlling whether constructed instances are cached.
///
/// # Examples
///
/// ```rust
/// use katana_di::{Injector, Lifetime};
/// use std::sync::Arc;
///
/// struct Connection;
/// struct Pool;
///
/// let mut injector = Injector::new();
/// injector.provide(Lifetime::New, || Connection).unwrap();
/// injector.provide(Lifetime::Singleton, || Pool).unwrap();
///
/// let c1 = injector.get::<Connection>().unwrap();
/// let c2 = injector.get::<Connection>().unwrap();
/// assert!(!Arc::ptr_eq(&c1, &c2)); // New: fresh every time
///
/// let p1 = injector.get::<Pool>().unwrap();
/// let p2 = injector.get::<Pool>().unwrap();
/// assert!(Arc::ptr_eq(&p1, &p2)); // Singleton: built once
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// Constructor invoked on every resolution, result never cached.
    New,
    /// Constructor invoked at most once per injector; the result is cached
    /// and handed out on every later resolution, including through clones
    /// taken after it was built.
    Singleton,
}

impl Lifetime {
    /// Whether instances of this lifetime go into the instance cache.
    pub fn is_cached(&self) -> bool {
        matches!(self, Lifetime::Singleton)
    }
}

impl std::fmt::Display for Lifetime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lifetime::New => f.write_str("New Instance Dependency"),
            Lifetime::Singleton => f.write_str("Singleton Dependency"),
        }
    }
}
