//! Constructor introspection.
//!
//! Constructors are plain functions or closures whose parameters are
//! `Arc<T>` handles to other injectable types. [`Callable`] exposes the
//! parameter keys to the injector, rebuilds the typed argument tuple from
//! resolved instances and invokes the function.

use std::any::Any;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::TypeKey;

/// Type-erased instance as stored in the instance cache.
///
/// The payload is always an `Arc<T>` for the key `T`, which lets unsized
/// interface types share the same storage as concrete ones.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Wraps a typed handle into an [`Instance`].
#[inline]
pub(crate) fn erase<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Instance {
    Arc::new(value)
}

/// Recovers the typed handle from an [`Instance`].
#[inline]
pub(crate) fn downcast<T: ?Sized + Send + Sync + 'static>(instance: &Instance) -> DiResult<Arc<T>> {
    instance
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or(DiError::TypeMismatch(std::any::type_name::<T>()))
}

/// A constructor parameter the injector knows how to supply.
pub trait Dependency: Sized + 'static {
    /// Key the parameter is resolved under.
    fn type_key() -> TypeKey;

    /// Converts a resolved instance into the parameter value.
    fn from_instance(instance: &Instance) -> DiResult<Self>;
}

impl<T: ?Sized + Send + Sync + 'static> Dependency for Arc<T> {
    #[inline]
    fn type_key() -> TypeKey {
        TypeKey::of::<T>()
    }

    #[inline]
    fn from_instance(instance: &Instance) -> DiResult<Self> {
        downcast::<T>(instance)
    }
}

/// A function whose parameters can be resolved by the injector.
///
/// Implemented for every `Fn(Arc<A1>, ..., Arc<An>) -> Out` up to twelve
/// parameters. `Args` is the tuple of parameter types and only serves to
/// keep the implementations apart.
///
/// # Examples
///
/// ```rust
/// use katana_di::{Callable, TypeKey};
/// use std::sync::Arc;
///
/// struct Config;
/// struct Cache;
/// struct Datastore;
///
/// fn datastore(_config: Arc<Config>, _cache: Arc<Cache>) -> Datastore {
///     Datastore
/// }
///
/// fn parameters_of<Args, F: Callable<Args>>(_: &F) -> Vec<TypeKey> {
///     F::parameters()
/// }
///
/// assert_eq!(
///     parameters_of(&datastore),
///     vec![TypeKey::of::<Config>(), TypeKey::of::<Cache>()]
/// );
/// ```
pub trait Callable<Args>: 'static {
    /// The value the function returns.
    type Output;

    /// Parameter keys in declaration order.
    fn parameters() -> Vec<TypeKey>;

    /// Rebuilds the argument tuple from instances given in parameter order.
    fn extract(instances: &[Instance]) -> DiResult<Args>;

    /// Invokes the function.
    fn call(&self, args: Args) -> Self::Output;
}

macro_rules! impl_callable {
    ($count:expr; $($ty:ident $var:ident),*) => {
        impl<Func, Out, $($ty,)*> Callable<($($ty,)*)> for Func
        where
            Func: Fn($($ty),*) -> Out + 'static,
            $($ty: Dependency,)*
        {
            type Output = Out;

            fn parameters() -> Vec<TypeKey> {
                vec![$($ty::type_key()),*]
            }

            #[allow(unused_variables, unused_mut)]
            fn extract(instances: &[Instance]) -> DiResult<($($ty,)*)> {
                if instances.len() != $count {
                    return Err(DiError::InvalidProvider(std::any::type_name::<Func>()));
                }
                let mut iter = instances.iter();
                $(
                    let $var = match iter.next() {
                        Some(instance) => $ty::from_instance(instance)?,
                        None => return Err(DiError::InvalidProvider(std::any::type_name::<Func>())),
                    };
                )*
                Ok(($($var,)*))
            }

            #[inline]
            fn call(&self, args: ($($ty,)*)) -> Out {
                let ($($var,)*) = args;
                (self)($($var),*)
            }
        }
    };
}

impl_callable!(0;);
impl_callable!(1; A1 a1);
impl_callable!(2; A1 a1, A2 a2);
impl_callable!(3; A1 a1, A2 a2, A3 a3);
impl_callable!(4; A1 a1, A2 a2, A3 a3, A4 a4);
impl_callable!(5; A1 a1, A2 a2, A3 a3, A4 a4, A5 a5);
impl_callable!(6; A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6);
impl_callable!(7; A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7);
impl_callable!(8; A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7, A8 a8);
impl_callable!(9; A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7, A8 a8, A9 a9);
impl_callable!(10; A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7, A8 a8, A9 a9, A10 a10);
impl_callable!(11; A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7, A8 a8, A9 a9, A10 a10, A11 a11);
impl_callable!(12; A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7, A8 a8, A9 a9, A10 a10, A11 a11, A12 a12);

#[cfg(test)]
mod tests {
    use super::*;

    struct Left(u32);
    struct Right(u32);

    fn sum(left: Arc<Left>, right: Arc<Right>) -> u32 {
        left.0 + right.0
    }

    fn parameters_of<Args, F: Callable<Args>>(_: &F) -> Vec<TypeKey> {
        F::parameters()
    }

    fn run<Args, F: Callable<Args>>(f: &F, instances: &[Instance]) -> DiResult<F::Output> {
        Ok(f.call(F::extract(instances)?))
    }

    #[test]
    fn parameters_follow_declaration_order() {
        assert_eq!(parameters_of(&sum), vec![TypeKey::of::<Left>(), TypeKey::of::<Right>()]);
        assert!(parameters_of(&|| 1u8).is_empty());
    }

    #[test]
    fn extracts_and_calls() {
        let instances = vec![erase(Arc::new(Left(2))), erase(Arc::new(Right(40)))];
        assert_eq!(run(&sum, &instances).unwrap(), 42);
    }

    #[test]
    fn wrong_instance_type_is_a_mismatch() {
        let instances = vec![erase(Arc::new(Right(2))), erase(Arc::new(Right(40)))];
        assert!(matches!(run(&sum, &instances), Err(DiError::TypeMismatch(_))));
    }

    #[test]
    fn wrong_arity_is_rejected() {
        let instances = vec![erase(Arc::new(Left(2)))];
        assert!(matches!(run(&sum, &instances), Err(DiError::InvalidProvider(_))));
    }

    #[test]
    fn trait_object_parameters_key_on_the_trait() {
        trait Shape: Send + Sync {
            fn area(&self) -> u32;
        }
        struct Square(u32);
        impl Shape for Square {
            fn area(&self) -> u32 {
                self.0 * self.0
            }
        }

        let area = |shape: Arc<dyn Shape>| shape.area();
        assert_eq!(parameters_of(&area), vec![TypeKey::of::<dyn Shape>()]);

        let shape: Arc<dyn Shape> = Arc::new(Square(3));
        assert_eq!(run(&area, &[erase(shape)]).unwrap(), 9);
    }
}
