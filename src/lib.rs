//! # katana-di
//!
//! Constructor-driven dependency injection for Rust.
//!
//! ## Features
//!
//! - **Constructor injection**: providers are plain functions; their `Arc<T>` parameters are resolved recursively
//! - **Two lifetimes**: `New` builds a fresh instance per resolution, `Singleton` builds once and caches
//! - **Interface registration**: register under `dyn Trait` and resolve by capability
//! - **Cycle detection**: cyclic graphs fail with the full chain, e.g. `[A -> B -> A]`
//! - **Cheap derivation**: clone an injector per request to get isolated registrations over shared singletons
//! - **Function injection**: resolve a function's parameters once and call it repeatedly
//!
//! ## Quick Start
//!
//! ```rust
//! use katana_di::Injector;
//! use std::sync::Arc;
//!
//! struct Database {
//!     connection_string: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! let mut injector = Injector::new();
//! injector
//!     .provide_value(Database {
//!         connection_string: "postgres://localhost".to_string(),
//!     })?
//!     .provide_new(|db: Arc<Database>| UserService { db })?;
//!
//! let user_service = injector.get::<UserService>()?;
//! assert_eq!(user_service.db.connection_string, "postgres://localhost");
//! # Ok::<(), katana_di::DiError>(())
//! ```
//!
//! ## Lifetimes
//!
//! - **New**: the constructor runs on every resolution
//! - **Singleton**: the constructor runs at most once per injector lineage; the
//!   instance is cached and shared by clones derived after it was built
//!
//! ## Interfaces
//!
//! ```rust
//! use katana_di::{Injector, Lifetime};
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, message: &str) -> String;
//! }
//!
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {
//!     fn log(&self, message: &str) -> String {
//!         format!("[LOG] {message}")
//!     }
//! }
//!
//! let mut injector = Injector::new();
//! injector.provide_as::<dyn Logger, _, _>(Lifetime::Singleton, || {
//!     Arc::new(ConsoleLogger) as Arc<dyn Logger>
//! })?;
//!
//! let logger = injector.get::<dyn Logger>()?;
//! assert_eq!(logger.log("hi"), "[LOG] hi");
//! # Ok::<(), katana_di::DiError>(())
//! ```
//!
//! ## Per-request injectors
//!
//! ```rust
//! use katana_di::Injector;
//! use std::sync::Arc;
//!
//! struct Pool;
//! struct RequestId(u64);
//! struct Handler { pool: Arc<Pool>, id: Arc<RequestId> }
//!
//! let mut root = Injector::new();
//! root.provide_singleton(|| Pool)?
//!     .provide_new(|pool: Arc<Pool>, id: Arc<RequestId>| Handler { pool, id })?;
//! let pool = root.get::<Pool>()?;
//!
//! for id in 0..2 {
//!     let mut request = root.clone();
//!     request.provide_value(RequestId(id))?;
//!     let handler = request.get::<Handler>()?;
//!     assert_eq!(handler.id.0, id);
//!     assert!(Arc::ptr_eq(&handler.pool, &pool));
//! }
//! // Request registrations never leak into the root
//! assert!(!root.contains::<RequestId>());
//! # Ok::<(), katana_di::DiError>(())
//! ```

pub mod config;
pub mod descriptors;
pub mod error;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod reference;
pub mod trace;
pub mod validation;

mod cache;
mod callable;
mod injector;
mod registration;

pub use callable::{Callable, Dependency, Instance};
pub use config::InjectorConfig;
pub use descriptors::ProviderDescriptor;
pub use error::{BoxError, DiError, DiResult};
pub use injector::{Injected, Injector};
pub use key::{key_of, TypeKey};
pub use lifetime::Lifetime;
pub use observer::{DiObserver, LoggingObserver, MetricsObserver};
pub use reference::{Reference, Slot};
pub use trace::ResolutionTrace;
pub use validation::{ValidationError, ValidationResult, ValidationWarning};
