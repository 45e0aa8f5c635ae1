use katana_di::{DiError, Injector};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Config {
    greeting: String,
}

struct RequestCounter {
    served: AtomicUsize,
}

fn injector() -> Injector {
    let mut injector = Injector::new();
    injector
        .provide_value(Config {
            greeting: "hello".to_string(),
        })
        .unwrap()
        .provide_new(|| RequestCounter {
            served: AtomicUsize::new(0),
        })
        .unwrap();
    injector
}

#[test]
fn injected_function_reuses_resolved_arguments() {
    let mut injector = injector();

    let handler = injector
        .inject(|config: Arc<Config>, counter: Arc<RequestCounter>| {
            let n = counter.served.fetch_add(1, Ordering::SeqCst) + 1;
            format!("{} #{}", config.greeting, n)
        })
        .unwrap();

    assert_eq!(handler.call(), "hello #1");
    assert_eq!(handler.call(), "hello #2");
    assert_eq!(handler.call(), "hello #3");
}

#[test]
fn each_injection_resolves_afresh() {
    let mut injector = injector();

    let count = |counter: Arc<RequestCounter>| counter.served.fetch_add(1, Ordering::SeqCst);
    let first = injector.inject(count).unwrap();
    let second = injector.inject(count).unwrap();

    first.call();
    first.call();
    // New-lifetime arguments are not shared between injections
    assert_eq!(second.call(), 0);
    assert!(!Arc::ptr_eq(&first.arguments().0, &second.arguments().0));
}

#[test]
fn singleton_arguments_are_shared_with_the_injector() {
    let mut injector = injector();

    let greet = injector.inject(|config: Arc<Config>| config.greeting.len()).unwrap();
    let config = injector.get::<Config>().unwrap();

    assert_eq!(greet.call(), 5);
    assert!(Arc::ptr_eq(&greet.arguments().0, &config));
}

#[test]
fn fallible_functions_return_their_result() {
    let mut injector = injector();

    let parse = injector
        .inject(|config: Arc<Config>| config.greeting.parse::<u32>())
        .unwrap();

    assert!(parse.call().is_err());
}

#[test]
fn injection_fails_on_missing_parameter() {
    struct Unregistered;

    let mut injector = injector();
    let err = injector.inject(|_: Arc<Config>, _: Arc<Unregistered>| ()).unwrap_err();
    assert!(matches!(err, DiError::NoProvider(_)));
}

#[test]
fn injection_fails_on_cycle() {
    struct A;
    struct B;

    let mut injector = Injector::new();
    injector
        .provide_new(|_: Arc<B>| A)
        .unwrap()
        .provide_new(|_: Arc<A>| B)
        .unwrap();

    let err = injector.inject(|_: Arc<A>| ()).unwrap_err();
    assert_eq!(err.cycle().map(<[_]>::len), Some(3));
}
