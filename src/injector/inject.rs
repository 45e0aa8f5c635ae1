//! Function injection: resolve a function's parameters once, call it often.

use std::fmt;

use crate::callable::Callable;
use crate::error::DiResult;
use crate::injector::Injector;

/// A function bound to its resolved arguments.
///
/// Produced by [`Injector::inject`]. Calling it never touches the injector
/// again: the arguments were resolved once, up front, and are reused on
/// every call.
pub struct Injected<F, Args> {
    callable: F,
    args: Args,
}

impl<F, Args> Injected<F, Args>
where
    F: Callable<Args>,
    Args: Clone,
{
    /// Invokes the function with the resolved arguments.
    pub fn call(&self) -> F::Output {
        self.callable.call(self.args.clone())
    }

    /// The resolved argument tuple.
    pub fn arguments(&self) -> &Args {
        &self.args
    }

    /// Splits into the function and its arguments.
    pub fn into_parts(self) -> (F, Args) {
        (self.callable, self.args)
    }
}

impl<F, Args> fmt::Debug for Injected<F, Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injected")
            .field("callable", &std::any::type_name::<F>())
            .finish_non_exhaustive()
    }
}

impl Injector {
    /// Resolves every parameter of `callable` and binds them to it.
    ///
    /// Parameters are resolved left to right with the usual lifetime rules,
    /// so new-instance parameters are constructed once here and then shared
    /// by every call of the returned [`Injected`].
    ///
    /// # Examples
    ///
    /// ```
    /// use katana_di::Injector;
    /// use std::sync::Arc;
    ///
    /// struct Greeting(String);
    ///
    /// let mut injector = Injector::new();
    /// injector.provide_value(Greeting("hello".to_string()))?;
    ///
    /// let shout = injector.inject(|greeting: Arc<Greeting>| greeting.0.to_uppercase())?;
    /// assert_eq!(shout.call(), "HELLO");
    /// assert_eq!(shout.call(), "HELLO");
    /// # Ok::<(), katana_di::DiError>(())
    /// ```
    pub fn inject<Args, F>(&mut self, callable: F) -> DiResult<Injected<F, Args>>
    where
        F: Callable<Args>,
    {
        let mut instances = Vec::new();
        for key in F::parameters() {
            instances.push(self.resolve_key(key)?);
        }
        let args = F::extract(&instances)?;
        tracing::trace!(callable = std::any::type_name::<F>(), arguments = instances.len(), "injected");
        Ok(Injected { callable, args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counter(AtomicUsize);

    #[test]
    fn arguments_are_resolved_once() {
        let built = Arc::new(AtomicUsize::new(0));
        let built_clone = built.clone();

        let mut injector = Injector::new();
        injector
            .provide_new(move || {
                built_clone.fetch_add(1, Ordering::SeqCst);
                Counter(AtomicUsize::new(0))
            })
            .unwrap();

        let bump = injector
            .inject(|counter: Arc<Counter>| counter.0.fetch_add(1, Ordering::SeqCst) + 1)
            .unwrap();

        assert_eq!(bump.call(), 1);
        assert_eq!(bump.call(), 2);
        assert_eq!(bump.call(), 3);
        assert_eq!(built.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn zero_argument_functions_inject() {
        let mut injector = Injector::new();
        let answer = injector.inject(|| 42).unwrap();
        assert_eq!(answer.call(), 42);
        let (_f, args) = answer.into_parts();
        assert_eq!(args, ());
    }

    #[test]
    fn missing_dependency_fails_injection() {
        let mut injector = Injector::new();
        let err = injector.inject(|counter: Arc<Counter>| counter.0.load(Ordering::SeqCst)).unwrap_err();
        assert!(matches!(err, DiError::NoProvider(_)));
    }

    #[test]
    fn functions_may_return_several_values() {
        let mut injector = Injector::new();
        injector.provide_value(7u32).unwrap();
        injector.provide_value("seven".to_string()).unwrap();

        let pair = injector
            .inject(|n: Arc<u32>, s: Arc<String>| (*n, s.len()))
            .unwrap();
        assert_eq!(pair.call(), (7, 5));
        assert_eq!(*pair.arguments().0, 7);
    }
}
