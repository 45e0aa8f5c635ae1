//! Error types for the injector.

use std::sync::Arc;

use crate::key::TypeKey;

/// Boxed error returned by fallible constructors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependency injection errors.
///
/// Every variant is a structural or configuration error; none is retried by
/// the injector. Registration and resolution both report them as returned
/// values.
///
/// # Examples
///
/// ```rust
/// use katana_di::{DiError, Injector, TypeKey};
///
/// let mut injector = Injector::new();
/// match injector.get::<String>() {
///     Err(DiError::NoProvider(key)) => {
///         assert_eq!(key, TypeKey::of::<String>());
///     }
///     _ => unreachable!(),
/// }
///
/// let cyclic = DiError::Cyclic(vec![TypeKey::of::<u8>(), TypeKey::of::<u16>(), TypeKey::of::<u8>()]);
/// assert_eq!(cyclic.to_string(), "Cyclic dependency detected: [u8 -> u16 -> u8]");
/// ```
#[derive(Debug, Clone, thiserror::Error)]
pub enum DiError {
    /// The resolution target is not a settable location
    #[error("Cannot resolve {0}: expected a settable reference")]
    NotAReference(TypeKey),
    /// The resolution target is a reference that points to nothing
    #[error("Cannot resolve {0}: reference points to nothing")]
    NilReference(TypeKey),
    /// No provider registered for the requested type
    #[error("No providers registered for dependency type {0}")]
    NoProvider(TypeKey),
    /// A provider for the type already exists in this injector
    #[error("Provider already registered for dependency type {0}")]
    AlreadyRegistered(TypeKey),
    /// The constructor does not produce exactly one value
    #[error("Invalid provider for {0}: a constructor must return exactly one value")]
    InvalidProvider(&'static str),
    /// A type transitively depends on itself; carries the full chain
    #[error("Cyclic dependency detected: [{}]", join_chain(.0))]
    Cyclic(Vec<TypeKey>),
    /// A stored instance could not be downcast to the requested type
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
    /// Maximum resolution depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
    /// A fallible constructor returned an error
    #[error("Provider for {key} failed: {error}")]
    ProviderFailed {
        key: TypeKey,
        error: Arc<BoxError>,
    },
}

impl DiError {
    /// The cycle chain for [`DiError::Cyclic`], `None` for other variants.
    pub fn cycle(&self) -> Option<&[TypeKey]> {
        match self {
            DiError::Cyclic(chain) => Some(chain),
            _ => None,
        }
    }

    pub(crate) fn provider_failed(key: TypeKey, error: impl Into<BoxError>) -> Self {
        DiError::ProviderFailed {
            key,
            error: Arc::new(error.into()),
        }
    }
}

pub(crate) fn join_chain(chain: &[TypeKey]) -> String {
    chain
        .iter()
        .map(TypeKey::display_name)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Result type for injector operations.
pub type DiResult<T> = Result<T, DiError>;
