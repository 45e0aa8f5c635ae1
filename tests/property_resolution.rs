/// Property-based tests for resolution
///
/// These tests verify that lifetime and cloning rules hold regardless of
/// the values or the number of resolutions involved.

use katana_di::{DiError, Injector, Lifetime};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
struct ServiceA {
    value: String,
}

#[derive(Debug, Clone)]
struct ServiceB {
    number: u64,
}

fn lifetime_strategy() -> impl Strategy<Value = Lifetime> {
    prop_oneof![Just(Lifetime::New), Just(Lifetime::Singleton)]
}

// Property: value singletons always resolve to the same instance and value
proptest! {
    #[test]
    fn singleton_resolution_consistency(service_value in "\\PC{0,50}", resolutions in 2usize..10) {
        let mut injector = Injector::new();
        injector.provide_value(ServiceA { value: service_value.clone() }).unwrap();

        let first = injector.get::<ServiceA>().unwrap();
        for _ in 1..resolutions {
            let next = injector.get::<ServiceA>().unwrap();
            prop_assert!(Arc::ptr_eq(&first, &next));
            prop_assert_eq!(&next.value, &service_value);
        }
    }
}

// Property: the constructor runs once per resolution for New, once overall for Singleton
proptest! {
    #[test]
    fn constructor_invocations_follow_lifetime(lifetime in lifetime_strategy(), resolutions in 1usize..20) {
        let built = Arc::new(AtomicUsize::new(0));
        let built_clone = built.clone();

        let mut injector = Injector::new();
        injector.provide(lifetime, move || {
            let n = built_clone.fetch_add(1, Ordering::SeqCst);
            ServiceB { number: n as u64 }
        }).unwrap();

        let instances: Vec<_> = (0..resolutions)
            .map(|_| injector.get::<ServiceB>().unwrap())
            .collect();

        match lifetime {
            Lifetime::New => {
                prop_assert_eq!(built.load(Ordering::SeqCst), resolutions);
                for (i, instance) in instances.iter().enumerate() {
                    prop_assert_eq!(instance.number, i as u64);
                }
            }
            Lifetime::Singleton => {
                prop_assert_eq!(built.load(Ordering::SeqCst), 1);
                prop_assert!(instances.iter().all(|i| Arc::ptr_eq(i, &instances[0])));
            }
        }
    }
}

// Property: resolution succeeds exactly when the type is registered
proptest! {
    #[test]
    fn resolution_matches_registration(register_service in any::<bool>()) {
        let mut injector = Injector::new();
        if register_service {
            injector.provide_value(ServiceB { number: 42 }).unwrap();
        }

        match injector.get::<ServiceB>() {
            Ok(service) => {
                prop_assert!(register_service);
                prop_assert_eq!(service.number, 42);
            }
            Err(DiError::NoProvider(_)) => prop_assert!(!register_service),
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}

// Property: every clone sees the singleton built before it was taken
proptest! {
    #[test]
    fn clones_share_prebuilt_singletons(clone_count in 1usize..8) {
        let mut root = Injector::new();
        root.provide_singleton(|| ServiceA { value: "root".to_string() }).unwrap();
        let original = root.get::<ServiceA>().unwrap();

        for _ in 0..clone_count {
            let mut derived = root.clone();
            let resolved = derived.get::<ServiceA>().unwrap();
            prop_assert!(Arc::ptr_eq(&original, &resolved));
        }
    }
}

// Property: a constructor with N parameters receives N resolved instances
proptest! {
    #[test]
    fn all_parameters_are_resolved(number in any::<u64>(), value in "[a-z]{0,12}") {
        let mut injector = Injector::new();
        injector
            .provide_value(ServiceB { number }).unwrap()
            .provide_value(ServiceA { value: value.clone() }).unwrap()
            .provide_new(|a: Arc<ServiceA>, b: Arc<ServiceB>| format!("{}:{}", a.value, b.number))
            .unwrap();

        let combined = injector.get::<String>().unwrap();
        let expected = format!("{}:{}", value, number);
        prop_assert_eq!(combined.as_str(), expected.as_str());
    }
}
