//! The injector: provider registration and recursive resolution.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache::InstanceCache;
use crate::callable::{downcast, erase, Callable, Instance};
use crate::config::InjectorConfig;
use crate::descriptors::ProviderDescriptor;
use crate::error::{BoxError, DiError, DiResult};
use crate::key::TypeKey;
use crate::lifetime::Lifetime;
use crate::observer::{DiObserver, Observers};
use crate::reference::Reference;
use crate::registration::{ProviderEntry, Registry};
use crate::trace::ResolutionTrace;
use crate::validation::{validate_registry, ValidationResult};

mod inject;
pub use inject::Injected;

/// Dependency injector driven by constructor functions.
///
/// An injector owns a provider registry, a singleton instance cache and a
/// resolution trace. Providers are ordinary functions whose parameters are
/// `Arc` handles to other injectable types; resolving a type resolves those
/// parameters first, recursively, then calls the constructor.
///
/// Resolution takes `&mut self`: one injector serves one logical unit of
/// work at a time. For concurrent work, [`clone`](Clone::clone) the
/// injector once per unit of work. A clone shares every provider and every
/// singleton built so far, but registrations made on it stay local.
///
/// # Examples
///
/// ```
/// use katana_di::Injector;
/// use std::sync::Arc;
///
/// struct Config { url: String }
/// struct Datastore { url: String }
///
/// let mut injector = Injector::new();
/// injector
///     .provide_value(Config { url: "https://x/db".to_string() })?
///     .provide_new(|config: Arc<Config>| Datastore { url: config.url.clone() })?;
///
/// let datastore = injector.get::<Datastore>()?;
/// assert_eq!(datastore.url, "https://x/db");
/// # Ok::<(), katana_di::DiError>(())
/// ```
pub struct Injector {
    registry: Registry,
    cache: InstanceCache,
    trace: ResolutionTrace,
    observers: Observers,
    config: InjectorConfig,
}

impl Injector {
    /// Creates an empty injector with the default configuration.
    pub fn new() -> Self {
        Self::with_config(InjectorConfig::default())
    }

    /// Creates an empty injector with `config`.
    ///
    /// A `max_depth` of zero is raised to one, so a provider without
    /// dependencies always resolves.
    pub fn with_config(mut config: InjectorConfig) -> Self {
        config.max_depth = config.max_depth.max(1);
        Self {
            registry: Registry::new(),
            cache: InstanceCache::new(),
            trace: ResolutionTrace::new(),
            observers: Observers::new(),
            config,
        }
    }

    pub fn config(&self) -> &InjectorConfig {
        &self.config
    }

    /// Adds an observer notified of every provider invocation.
    pub fn add_observer(&mut self, observer: Arc<dyn DiObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    // ----- Registration -----

    /// Registers `constructor` for its output type under `lifetime`.
    ///
    /// The constructor's parameters must be `Arc<T>` handles; each one is
    /// resolved through this injector when the output type is requested.
    pub fn provide<T, Args, F>(&mut self, lifetime: Lifetime, constructor: F) -> DiResult<&mut Self>
    where
        T: Send + Sync + 'static,
        F: Callable<Args, Output = T> + Send + Sync,
    {
        let construct = move |instances: &[Instance]| -> DiResult<Instance> {
            let args = F::extract(instances)?;
            Ok(erase(Arc::new(constructor.call(args))))
        };
        self.register::<T, Args, F>(lifetime, Arc::new(construct))
    }

    /// Registers `constructor` under [`Lifetime::New`].
    pub fn provide_new<T, Args, F>(&mut self, constructor: F) -> DiResult<&mut Self>
    where
        T: Send + Sync + 'static,
        F: Callable<Args, Output = T> + Send + Sync,
    {
        self.provide(Lifetime::New, constructor)
    }

    /// Registers `constructor` under [`Lifetime::Singleton`].
    pub fn provide_singleton<T, Args, F>(&mut self, constructor: F) -> DiResult<&mut Self>
    where
        T: Send + Sync + 'static,
        F: Callable<Args, Output = T> + Send + Sync,
    {
        self.provide(Lifetime::Singleton, constructor)
    }

    /// Registers a fallible constructor.
    ///
    /// An `Err` returned by the constructor aborts the whole resolution as
    /// [`DiError::ProviderFailed`].
    ///
    /// ```
    /// use katana_di::{DiError, Injector};
    ///
    /// struct Port(u16);
    ///
    /// let mut injector = Injector::new();
    /// injector.try_provide_new(|| "http".parse::<u16>().map(Port)).unwrap();
    ///
    /// assert!(matches!(injector.get::<Port>(), Err(DiError::ProviderFailed { .. })));
    /// ```
    pub fn try_provide<T, E, Args, F>(&mut self, lifetime: Lifetime, constructor: F) -> DiResult<&mut Self>
    where
        T: Send + Sync + 'static,
        E: Into<BoxError>,
        F: Callable<Args, Output = Result<T, E>> + Send + Sync,
    {
        let key = TypeKey::of::<T>();
        let construct = move |instances: &[Instance]| -> DiResult<Instance> {
            let args = F::extract(instances)?;
            match constructor.call(args) {
                Ok(value) => Ok(erase(Arc::new(value))),
                Err(error) => Err(DiError::provider_failed(key, error)),
            }
        };
        self.register::<T, Args, F>(lifetime, Arc::new(construct))
    }

    pub fn try_provide_new<T, E, Args, F>(&mut self, constructor: F) -> DiResult<&mut Self>
    where
        T: Send + Sync + 'static,
        E: Into<BoxError>,
        F: Callable<Args, Output = Result<T, E>> + Send + Sync,
    {
        self.try_provide(Lifetime::New, constructor)
    }

    pub fn try_provide_singleton<T, E, Args, F>(&mut self, constructor: F) -> DiResult<&mut Self>
    where
        T: Send + Sync + 'static,
        E: Into<BoxError>,
        F: Callable<Args, Output = Result<T, E>> + Send + Sync,
    {
        self.try_provide(Lifetime::Singleton, constructor)
    }

    /// Registers a ready-made value as a singleton.
    ///
    /// Every resolution of `T` returns the same `Arc` around `value`.
    pub fn provide_value<T>(&mut self, value: T) -> DiResult<&mut Self>
    where
        T: Send + Sync + 'static,
    {
        self.provide_value_as::<T>(Arc::new(value))
    }

    /// Registers a constructor under the interface type `I` rather than
    /// its concrete return type.
    ///
    /// ```
    /// use katana_di::{Injector, Lifetime};
    /// use std::sync::Arc;
    ///
    /// trait Greeter: Send + Sync {
    ///     fn greet(&self) -> String;
    /// }
    ///
    /// struct English;
    /// impl Greeter for English {
    ///     fn greet(&self) -> String { "hello".to_string() }
    /// }
    ///
    /// let mut injector = Injector::new();
    /// injector
    ///     .provide_as::<dyn Greeter, _, _>(Lifetime::Singleton, || Arc::new(English) as Arc<dyn Greeter>)
    ///     .unwrap();
    ///
    /// let greeter = injector.get::<dyn Greeter>().unwrap();
    /// assert_eq!(greeter.greet(), "hello");
    /// ```
    pub fn provide_as<I, Args, F>(&mut self, lifetime: Lifetime, constructor: F) -> DiResult<&mut Self>
    where
        I: ?Sized + Send + Sync + 'static,
        F: Callable<Args, Output = Arc<I>> + Send + Sync,
    {
        let construct = move |instances: &[Instance]| -> DiResult<Instance> {
            let args = F::extract(instances)?;
            Ok(erase(constructor.call(args)))
        };
        self.register::<I, Args, F>(lifetime, Arc::new(construct))
    }

    /// Fallible variant of [`provide_as`](Self::provide_as).
    pub fn try_provide_as<I, E, Args, F>(&mut self, lifetime: Lifetime, constructor: F) -> DiResult<&mut Self>
    where
        I: ?Sized + Send + Sync + 'static,
        E: Into<BoxError>,
        F: Callable<Args, Output = Result<Arc<I>, E>> + Send + Sync,
    {
        let key = TypeKey::of::<I>();
        let construct = move |instances: &[Instance]| -> DiResult<Instance> {
            let args = F::extract(instances)?;
            match constructor.call(args) {
                Ok(value) => Ok(erase(value)),
                Err(error) => Err(DiError::provider_failed(key, error)),
            }
        };
        self.register::<I, Args, F>(lifetime, Arc::new(construct))
    }

    /// Registers a ready-made value under the interface type `I`.
    pub fn provide_value_as<I>(&mut self, value: Arc<I>) -> DiResult<&mut Self>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        self.provide_as::<I, _, _>(Lifetime::Singleton, move || Arc::clone(&value))
    }

    fn register<T, Args, F>(
        &mut self,
        lifetime: Lifetime,
        construct: Arc<dyn Fn(&[Instance]) -> DiResult<Instance> + Send + Sync>,
    ) -> DiResult<&mut Self>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Callable<Args>,
    {
        let key = TypeKey::of::<T>();
        if key == TypeKey::of::<()>() {
            return Err(DiError::InvalidProvider(std::any::type_name::<F>()));
        }
        let dependencies = F::parameters();
        tracing::debug!(
            key = %key,
            %lifetime,
            dependencies = dependencies.len(),
            "registering provider"
        );
        self.registry.register(ProviderEntry::new(
            key,
            lifetime,
            dependencies,
            construct,
            std::any::type_name::<F>(),
        ))?;
        Ok(self)
    }

    // ----- Introspection -----

    /// Whether a provider is registered for `T`.
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.contains_key(&TypeKey::of::<T>())
    }

    pub fn contains_key(&self, key: &TypeKey) -> bool {
        self.registry.contains_key(key)
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    /// Number of singletons built (or inherited) so far.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Whether a singleton instance of `T` has already been built.
    pub fn is_cached<T: ?Sized + 'static>(&self) -> bool {
        self.cache.contains_key(&TypeKey::of::<T>())
    }

    /// Describes every registered provider.
    pub fn descriptors(&self) -> Vec<ProviderDescriptor> {
        self.registry
            .iter()
            .map(|entry| ProviderDescriptor {
                key: entry.key,
                lifetime: entry.lifetime,
                dependencies: entry.dependencies.clone(),
                implementation: entry.implementation,
                cached: self.cache.contains_key(&entry.key),
            })
            .collect()
    }

    /// Checks the provider graph without constructing anything.
    ///
    /// Reports parameters with no provider and dependency cycles as errors,
    /// and singletons that capture a new-instance dependency as warnings.
    ///
    /// ```
    /// use katana_di::{Injector, ValidationError};
    /// use std::sync::Arc;
    ///
    /// struct Config;
    /// struct Service;
    ///
    /// let mut injector = Injector::new();
    /// injector.provide_new(|_: Arc<Config>| Service)?;
    ///
    /// let report = injector.validate();
    /// assert!(!report.is_valid());
    /// assert!(matches!(report.errors[0], ValidationError::MissingDependency { .. }));
    /// # Ok::<(), katana_di::DiError>(())
    /// ```
    pub fn validate(&self) -> ValidationResult {
        validate_registry(&self.registry)
    }

    // ----- Resolution -----

    /// Resolves every reference in order, writing each resolved instance
    /// into its location.
    ///
    /// Resolution stops at the first failure; references resolved before
    /// it keep their values.
    ///
    /// ```
    /// use katana_di::Injector;
    /// use std::sync::Arc;
    ///
    /// struct Config;
    /// struct Cache;
    ///
    /// let mut injector = Injector::new();
    /// injector.provide_value(Config)?.provide_new(|_: Arc<Config>| Cache)?;
    ///
    /// let mut config: Option<Arc<Config>> = None;
    /// let mut cache: Option<Arc<Cache>> = None;
    /// injector.resolve(&mut [&mut config, &mut cache])?;
    ///
    /// assert!(config.is_some() && cache.is_some());
    /// # Ok::<(), katana_di::DiError>(())
    /// ```
    pub fn resolve(&mut self, references: &mut [&mut dyn Reference]) -> DiResult<()> {
        for reference in references.iter_mut() {
            reference.validate()?;
            let instance = self.resolve_key(reference.type_key())?;
            reference.assign(instance)?;
        }
        Ok(())
    }

    /// Resolves a single instance of `T`.
    pub fn get<T>(&mut self) -> DiResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let instance = self.resolve_key(TypeKey::of::<T>())?;
        downcast::<T>(&instance)
    }

    /// Resolves `T`, panicking on failure.
    ///
    /// # Panics
    ///
    /// Panics with the resolution error when `T` cannot be resolved.
    pub fn get_required<T>(&mut self) -> Arc<T>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {}", std::any::type_name::<T>(), e))
    }

    /// Resolves the instance registered under `key`.
    ///
    /// The resolution trace is always empty again when this returns,
    /// whether resolution succeeded or not.
    pub fn resolve_key(&mut self, key: TypeKey) -> DiResult<Instance> {
        let result = self.resolve_nested(key);
        self.trace.reset();
        result
    }

    fn resolve_nested(&mut self, key: TypeKey) -> DiResult<Instance> {
        if let Some(instance) = self.cache.get(&key) {
            tracing::trace!(key = %key, "singleton cache hit");
            return Ok(instance);
        }

        let entry = self.registry.lookup(&key)?;

        // Every key with a provider gets `resolving` followed by exactly one
        // of `resolved` or `failed`, including depth and cycle failures.
        let observed = self.observers.has_observers();
        if observed {
            self.observers.resolving(&key);
        }

        if self.trace.len() >= self.config.max_depth {
            let err = DiError::DepthExceeded(self.trace.len());
            tracing::debug!(trace = %self.trace, error = %err, "maximum resolution depth reached");
            if observed {
                self.observers.failed(&key, &err);
            }
            return Err(err);
        }
        if let Err(err) = self.trace.push(key) {
            // Drop the closing edge so the frames above pop their own keys
            self.trace.pop();
            tracing::debug!(trace = %self.trace, error = %err, "cyclic dependency detected");
            if observed {
                self.observers.failed(&key, &err);
            }
            return Err(err);
        }

        let started = (observed && self.config.record_timings).then(Instant::now);

        let built = self.construct(&entry);
        self.trace.pop();

        let instance = match built {
            Ok(instance) => instance,
            Err(err) => {
                if observed {
                    self.observers.failed(&key, &err);
                }
                return Err(err);
            }
        };

        if observed {
            let elapsed = started.map(|s| s.elapsed()).unwrap_or(Duration::ZERO);
            self.observers.resolved(&key, elapsed);
        }
        tracing::trace!(key = %key, lifetime = %entry.lifetime, "constructed instance");

        if entry.lifetime.is_cached() {
            self.cache.put(key, instance.clone());
        }
        Ok(instance)
    }

    fn construct(&mut self, entry: &ProviderEntry) -> DiResult<Instance> {
        let mut args = Vec::with_capacity(entry.dependencies.len());
        for dependency in &entry.dependencies {
            args.push(self.resolve_nested(*dependency)?);
        }
        entry.build(&args)
    }
}

impl Default for Injector {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives an isolated injector.
///
/// The clone copies the provider map and the singleton cache, so it sees
/// every provider and every singleton built so far. Later registrations
/// and later singleton constructions on either side stay on that side.
/// Observers and configuration are shared; the resolution trace is fresh.
impl Clone for Injector {
    fn clone(&self) -> Self {
        tracing::debug!(
            providers = self.registry.len(),
            singletons = self.cache.len(),
            "cloning injector"
        );
        Self {
            registry: self.registry.clone(),
            cache: self.cache.clone(),
            trace: ResolutionTrace::new(),
            observers: self.observers.clone(),
            config: self.config.clone(),
        }
    }
}

impl std::fmt::Debug for Injector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Injector")
            .field("providers", &self.registry.len())
            .field("singletons", &self.cache.len())
            .field("config", &self.config)
            .finish()
    }
}
