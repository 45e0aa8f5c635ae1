//! Diagnostic observers for resolution events.
//!
//! Observers receive a callback when the injector starts constructing a
//! type, when it finishes, and when construction fails. Cache hits do not
//! fire callbacks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::key::TypeKey;

/// Observer trait for resolution events.
///
/// Callbacks run synchronously inside the resolution call, so keep them
/// cheap.
///
/// # Examples
///
/// ```
/// use katana_di::{DiError, DiObserver, Injector, TypeKey};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder {
///     built: Mutex<Vec<&'static str>>,
/// }
///
/// impl DiObserver for Recorder {
///     fn resolving(&self, _key: &TypeKey) {}
///
///     fn resolved(&self, key: &TypeKey, _duration: Duration) {
///         self.built.lock().unwrap().push(key.display_name());
///     }
///
///     fn failed(&self, _key: &TypeKey, _error: &DiError) {}
/// }
///
/// let recorder = Arc::new(Recorder::default());
/// let mut injector = Injector::new();
/// injector.add_observer(recorder.clone());
/// injector.provide_new(|| 5u8).unwrap();
///
/// injector.get::<u8>().unwrap();
/// assert_eq!(*recorder.built.lock().unwrap(), vec!["u8"]);
/// ```
pub trait DiObserver: Send + Sync {
    /// Called when resolution of an uncached `key` starts. Always followed by
    /// `resolved` or `failed` for the same key.
    fn resolving(&self, key: &TypeKey);

    /// Called after the provider for `key` returned an instance.
    fn resolved(&self, key: &TypeKey, duration: Duration);

    /// Called when resolving `key` failed, including failures of its
    /// dependencies.
    fn failed(&self, key: &TypeKey, error: &DiError);
}

/// Registered observers, shared by clones of an injector.
#[derive(Clone, Default)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &TypeKey) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &TypeKey, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, key: &TypeKey, error: &DiError) {
        for observer in &self.observers {
            observer.failed(key, error);
        }
    }
}

/// Built-in observer that forwards events to `tracing`.
///
/// Starts and completions are logged at `DEBUG`, failures at `WARN`.
///
/// ```
/// use katana_di::{Injector, LoggingObserver};
/// use std::sync::Arc;
///
/// let mut injector = Injector::new();
/// injector.add_observer(Arc::new(LoggingObserver::with_prefix("api")));
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self {
            prefix: "katana".to_string(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for LoggingObserver {
    fn resolving(&self, key: &TypeKey) {
        tracing::debug!(prefix = %self.prefix, key = %key, "resolving");
    }

    fn resolved(&self, key: &TypeKey, duration: Duration) {
        tracing::debug!(prefix = %self.prefix, key = %key, ?duration, "resolved");
    }

    fn failed(&self, key: &TypeKey, error: &DiError) {
        tracing::warn!(prefix = %self.prefix, key = %key, %error, "resolution failed");
    }
}

/// Observer counting constructions, failures and time spent.
pub struct MetricsObserver {
    resolution_count: AtomicU64,
    failure_count: AtomicU64,
    total_resolution_nanos: AtomicU64,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self {
            resolution_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
            total_resolution_nanos: AtomicU64::new(0),
        }
    }

    /// Number of provider invocations that produced an instance.
    pub fn resolution_count(&self) -> u64 {
        self.resolution_count.load(Ordering::Relaxed)
    }

    /// Number of failed resolutions observed.
    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn total_resolution_time(&self) -> Duration {
        Duration::from_nanos(self.total_resolution_nanos.load(Ordering::Relaxed))
    }

    pub fn average_resolution_time(&self) -> Option<Duration> {
        let count = self.resolution_count();
        if count == 0 {
            return None;
        }
        let total = self.total_resolution_nanos.load(Ordering::Relaxed);
        Some(Duration::from_nanos(total / count))
    }

    pub fn reset(&self) {
        self.resolution_count.store(0, Ordering::Relaxed);
        self.failure_count.store(0, Ordering::Relaxed);
        self.total_resolution_nanos.store(0, Ordering::Relaxed);
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for MetricsObserver {
    fn resolving(&self, _key: &TypeKey) {}

    fn resolved(&self, _key: &TypeKey, duration: Duration) {
        self.resolution_count.fetch_add(1, Ordering::Relaxed);
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.total_resolution_nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    fn failed(&self, _key: &TypeKey, _error: &DiError) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }
}
