//! Type keys for the provider registry and instance cache.

use std::any::TypeId;
use std::fmt;

/// Key identifying an injectable type.
///
/// A key is the `TypeId` of the registered type together with its
/// `type_name` for diagnostics. Equality and hashing only look at the
/// `TypeId`; the name is carried for error messages and traces.
///
/// Interface registrations key on the trait object type itself, so
/// `TypeKey::of::<dyn Logger>()` is distinct from the key of any concrete
/// type implementing `Logger`.
///
/// # Examples
///
/// ```rust
/// use katana_di::TypeKey;
///
/// trait Logger: Send + Sync {}
/// struct ConsoleLogger;
/// impl Logger for ConsoleLogger {}
///
/// let concrete = TypeKey::of::<ConsoleLogger>();
/// let interface = TypeKey::of::<dyn Logger>();
///
/// assert_ne!(concrete, interface);
/// assert_eq!(TypeKey::of::<String>(), TypeKey::of::<String>());
/// assert_eq!(TypeKey::of::<String>().display_name(), "alloc::string::String");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for `T`, which may be unsized (`dyn Trait`, `str`, slices).
    #[inline(always)]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The `TypeId` backing this key.
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// The type name for display, as returned by `std::any::type_name`.
    pub fn display_name(&self) -> &'static str {
        self.name
    }
}

// Hot path: TypeId-only comparison, the name never participates
impl PartialEq for TypeKey {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl std::hash::Hash for TypeKey {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Shorthand for [`TypeKey::of`].
#[inline(always)]
pub fn key_of<T: ?Sized + 'static>() -> TypeKey {
    TypeKey::of::<T>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    trait Speaker {}

    #[test]
    fn keys_compare_by_type_only() {
        assert_eq!(key_of::<u32>(), TypeKey::of::<u32>());
        assert_ne!(key_of::<u32>(), key_of::<u64>());
        assert_ne!(key_of::<dyn Speaker>(), key_of::<Box<dyn Speaker>>());
    }

    #[test]
    fn keys_hash_consistently() {
        let mut set = HashSet::new();
        set.insert(key_of::<String>());
        set.insert(key_of::<String>());
        set.insert(key_of::<dyn Speaker>());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_uses_type_name() {
        assert_eq!(key_of::<u8>().to_string(), "u8");
        assert!(key_of::<dyn Speaker>().display_name().contains("Speaker"));
    }
}
