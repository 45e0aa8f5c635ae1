//! Wires a small account service graph and shows which pieces are shared.
//!
//! Run with `RUST_LOG=katana_di=debug cargo run --example account_service`
//! to see registrations and constructions as they happen.

use katana_di::{Injector, Lifetime, LoggingObserver, MetricsObserver};
use std::error::Error;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

struct Config {
    url: String,
    ttl: u64,
}

struct Cache {
    ttl: u64,
}

struct Datastore {
    config: Arc<Config>,
    cache: Arc<Cache>,
}

struct AccountService {
    datastore: Arc<Datastore>,
}

impl AccountService {
    fn describe(&self) -> String {
        format!(
            "accounts at {} (cache ttl {}ms)",
            self.datastore.config.url, self.datastore.cache.ttl
        )
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("katana_di=info".parse()?))
        .init();

    let metrics = Arc::new(MetricsObserver::new());

    let mut injector = Injector::new();
    injector
        .add_observer(Arc::new(LoggingObserver::with_prefix("accounts")))
        .add_observer(metrics.clone());

    injector
        .provide_value(Config {
            url: "https://x/db".to_string(),
            ttl: 20000,
        })?
        .provide(Lifetime::New, |config: Arc<Config>| Cache { ttl: config.ttl })?
        .provide(Lifetime::New, |config: Arc<Config>, cache: Arc<Cache>| Datastore {
            config,
            cache,
        })?
        .provide(Lifetime::Singleton, |datastore: Arc<Datastore>| AccountService {
            datastore,
        })?;

    let report = injector.validate();
    print!("{report}");
    if !report.has_warnings() {
        println!();
    }

    let first = injector.get::<AccountService>()?;
    let second = injector.get::<AccountService>()?;
    println!("{}", first.describe());
    println!("same account service: {}", Arc::ptr_eq(&first, &second));
    println!(
        "same nested datastore: {}",
        Arc::ptr_eq(&first.datastore, &second.datastore)
    );

    let direct_a = injector.get::<Datastore>()?;
    let direct_b = injector.get::<Datastore>()?;
    println!("direct datastores distinct: {}", !Arc::ptr_eq(&direct_a, &direct_b));

    for descriptor in injector.descriptors() {
        println!(
            "{:<40} {:<24} deps={} cached={}",
            descriptor.type_name(),
            descriptor.lifetime.to_string(),
            descriptor.dependency_count(),
            descriptor.cached
        );
    }

    println!(
        "{} constructions, average {:?}",
        metrics.resolution_count(),
        metrics.average_resolution_time().unwrap_or_default()
    );
    Ok(())
}
