/// End-to-end wiring of a small account service graph
///
/// Config is a value singleton, Cache and Datastore are new-instance
/// providers and AccountService is a singleton built on top of them.

use katana_di::{Injector, Lifetime};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

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

#[derive(Default)]
struct Counters {
    caches: AtomicUsize,
    datastores: AtomicUsize,
    services: AtomicUsize,
}

fn wire(counters: Arc<Counters>) -> Injector {
    let mut injector = Injector::new();

    let c = counters.clone();
    let d = counters.clone();
    let s = counters;

    injector
        .provide_value(Config {
            url: "https://x/db".to_string(),
            ttl: 20000,
        })
        .unwrap()
        .provide(Lifetime::New, move |config: Arc<Config>| {
            c.caches.fetch_add(1, Ordering::SeqCst);
            Cache { ttl: config.ttl }
        })
        .unwrap()
        .provide(Lifetime::New, move |config: Arc<Config>, cache: Arc<Cache>| {
            d.datastores.fetch_add(1, Ordering::SeqCst);
            Datastore { config, cache }
        })
        .unwrap()
        .provide(Lifetime::Singleton, move |datastore: Arc<Datastore>| {
            s.services.fetch_add(1, Ordering::SeqCst);
            AccountService { datastore }
        })
        .unwrap();

    injector
}

#[test]
fn account_service_is_built_once_with_its_graph() {
    let counters = Arc::new(Counters::default());
    let mut injector = wire(counters.clone());

    let first = injector.get::<AccountService>().unwrap();
    let second = injector.get::<AccountService>().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first.datastore, &second.datastore));
    assert!(Arc::ptr_eq(&first.datastore.cache, &second.datastore.cache));

    assert_eq!(first.datastore.config.url, "https://x/db");
    assert_eq!(first.datastore.cache.ttl, 20000);

    assert_eq!(counters.services.load(Ordering::SeqCst), 1);
    assert_eq!(counters.datastores.load(Ordering::SeqCst), 1);
    assert_eq!(counters.caches.load(Ordering::SeqCst), 1);
}

#[test]
fn new_instance_types_are_distinct_when_resolved_directly() {
    let counters = Arc::new(Counters::default());
    let mut injector = wire(counters.clone());

    let service = injector.get::<AccountService>().unwrap();

    let d1 = injector.get::<Datastore>().unwrap();
    let d2 = injector.get::<Datastore>().unwrap();
    assert!(!Arc::ptr_eq(&d1, &d2));
    assert!(!Arc::ptr_eq(&d1, &service.datastore));

    let c1 = injector.get::<Cache>().unwrap();
    let c2 = injector.get::<Cache>().unwrap();
    assert!(!Arc::ptr_eq(&c1, &c2));

    // Config is the one value singleton shared by all of them
    assert!(Arc::ptr_eq(&d1.config, &d2.config));
    assert!(Arc::ptr_eq(&d1.config, &service.datastore.config));
}

#[test]
fn batch_resolution_of_the_whole_graph() {
    let mut injector = wire(Arc::new(Counters::default()));

    let mut config: Option<Arc<Config>> = None;
    let mut datastore: Option<Arc<Datastore>> = None;
    let mut service: Option<Arc<AccountService>> = None;
    injector
        .resolve(&mut [&mut config, &mut datastore, &mut service])
        .unwrap();

    let config = config.unwrap();
    assert!(Arc::ptr_eq(&config, &datastore.unwrap().config));
    assert!(Arc::ptr_eq(&config, &service.unwrap().datastore.config));
}

#[test]
fn graph_validates_with_expected_warning() {
    let injector = wire(Arc::new(Counters::default()));
    let report = injector.validate();

    assert!(report.is_valid());
    // AccountService holds on to one Datastore forever
    assert_eq!(report.warnings.len(), 1);
}
