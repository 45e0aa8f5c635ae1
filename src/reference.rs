//! Resolution targets.
//!
//! [`Injector::resolve`](crate::Injector::resolve) writes resolved values
//! into caller-owned locations. A location is anything implementing
//! [`Reference`]: an `Option<Arc<T>>` variable, or a [`Slot`] borrowing one.

use std::sync::Arc;

use crate::callable::{downcast, Instance};
use crate::error::{DiError, DiResult};
use crate::key::TypeKey;

/// A settable location for a resolved instance.
///
/// The trait is object safe so one `resolve` call can fill locations of
/// different types.
pub trait Reference {
    /// Key of the type this location holds.
    fn type_key(&self) -> TypeKey;

    /// Checks the location can be written before anything is resolved.
    fn validate(&self) -> DiResult<()> {
        Ok(())
    }

    /// Stores the resolved instance.
    fn assign(&mut self, instance: Instance) -> DiResult<()>;
}

/// The canonical empty slot: `let mut db: Option<Arc<Database>> = None;`
impl<T: ?Sized + Send + Sync + 'static> Reference for Option<Arc<T>> {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    fn assign(&mut self, instance: Instance) -> DiResult<()> {
        *self = Some(downcast::<T>(&instance)?);
        Ok(())
    }
}

/// An `Arc<T>` is an already materialized value, not a location.
///
/// Passing one to `resolve` is rejected with [`DiError::NotAReference`];
/// resolve into an `Option<Arc<T>>` instead.
impl<T: ?Sized + Send + Sync + 'static> Reference for Arc<T> {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    fn validate(&self) -> DiResult<()> {
        Err(DiError::NotAReference(TypeKey::of::<T>()))
    }

    fn assign(&mut self, _instance: Instance) -> DiResult<()> {
        Err(DiError::NotAReference(TypeKey::of::<T>()))
    }
}

/// A borrowed pointer to an `Option<Arc<T>>`, possibly pointing nowhere.
///
/// # Examples
///
/// ```rust
/// use katana_di::{DiError, Injector, Reference, Slot};
/// use std::sync::Arc;
///
/// struct Clock;
///
/// let mut injector = Injector::new();
/// injector.provide_value(Clock).unwrap();
///
/// let mut clock: Option<Arc<Clock>> = None;
/// injector.resolve(&mut [&mut Slot::new(&mut clock)]).unwrap();
/// assert!(clock.is_some());
///
/// let err = injector.resolve(&mut [&mut Slot::<Clock>::nil()]).unwrap_err();
/// assert!(matches!(err, DiError::NilReference(_)));
/// ```
pub struct Slot<'a, T: ?Sized> {
    target: Option<&'a mut Option<Arc<T>>>,
}

impl<'a, T: ?Sized + Send + Sync + 'static> Slot<'a, T> {
    /// Slot writing into `target`.
    pub fn new(target: &'a mut Option<Arc<T>>) -> Self {
        Self { target: Some(target) }
    }

    /// Slot pointing nowhere.
    pub fn nil() -> Self {
        Self { target: None }
    }

    pub fn is_nil(&self) -> bool {
        self.target.is_none()
    }
}

impl<'a, T: ?Sized + Send + Sync + 'static> From<Option<&'a mut Option<Arc<T>>>> for Slot<'a, T> {
    fn from(target: Option<&'a mut Option<Arc<T>>>) -> Self {
        Self { target }
    }
}

impl<'a, T: ?Sized + Send + Sync + 'static> Reference for Slot<'a, T> {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    fn validate(&self) -> DiResult<()> {
        if self.is_nil() {
            return Err(DiError::NilReference(TypeKey::of::<T>()));
        }
        Ok(())
    }

    fn assign(&mut self, instance: Instance) -> DiResult<()> {
        match self.target.as_deref_mut() {
            Some(target) => target.assign(instance),
            None => Err(DiError::NilReference(TypeKey::of::<T>())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callable::erase;

    #[test]
    fn option_slot_receives_value() {
        let mut slot: Option<Arc<u32>> = None;
        assert_eq!(slot.type_key(), TypeKey::of::<u32>());
        slot.validate().unwrap();
        slot.assign(erase(Arc::new(7u32))).unwrap();
        assert_eq!(slot.as_deref(), Some(&7));
    }

    #[test]
    fn option_slot_rejects_foreign_instance() {
        let mut slot: Option<Arc<u32>> = None;
        let err = slot.assign(erase(Arc::new("text".to_string()))).unwrap_err();
        assert!(matches!(err, DiError::TypeMismatch(_)));
        assert!(slot.is_none());
    }

    #[test]
    fn arc_is_not_a_reference() {
        let value = Arc::new(1u8);
        assert!(matches!(value.validate(), Err(DiError::NotAReference(_))));
    }

    #[test]
    fn nil_slot_is_rejected() {
        let slot = Slot::<u8>::nil();
        assert!(slot.is_nil());
        assert!(matches!(slot.validate(), Err(DiError::NilReference(_))));

        let slot: Slot<'_, u8> = None.into();
        assert!(slot.is_nil());
    }

    #[test]
    fn slot_writes_through() {
        let mut target: Option<Arc<str>> = None;
        {
            let mut slot = Slot::new(&mut target);
            slot.validate().unwrap();
            slot.assign(erase::<str>(Arc::from("hello"))).unwrap();
        }
        assert_eq!(target.as_deref(), Some("hello"));
    }
}
