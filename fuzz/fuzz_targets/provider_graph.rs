#![no_main]

use katana_di::{DiError, Injector, Lifetime, ValidationError};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

#[derive(Default)]
struct N0;
#[derive(Default)]
struct N1;
#[derive(Default)]
struct N2;
#[derive(Default)]
struct N3;
#[derive(Default)]
struct N4;
#[derive(Default)]
struct N5;

const NODES: u8 = 6;

fn edge<I, J>(injector: &mut Injector, lifetime: Lifetime)
where
    I: Default + Send + Sync + 'static,
    J: Send + Sync + 'static,
{
    let _ = injector.provide(lifetime, |_: Arc<J>| I::default());
}

// Registers node `I`, depending on node `target` or on nothing
fn node<I: Default + Send + Sync + 'static>(injector: &mut Injector, target: u8, lifetime: Lifetime) {
    match target % (NODES + 1) {
        0 => edge::<I, N0>(injector, lifetime),
        1 => edge::<I, N1>(injector, lifetime),
        2 => edge::<I, N2>(injector, lifetime),
        3 => edge::<I, N3>(injector, lifetime),
        4 => edge::<I, N4>(injector, lifetime),
        5 => edge::<I, N5>(injector, lifetime),
        _ => {
            let _ = injector.provide(lifetime, I::default);
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let mut injector = Injector::new();

    // Two bytes per node: presence and lifetime, then dependency target
    for (index, pair) in data.chunks_exact(2).take(NODES as usize).enumerate() {
        let (flags, target) = (pair[0], pair[1]);
        if flags & 1 == 0 {
            continue;
        }
        let lifetime = if flags & 2 == 0 { Lifetime::New } else { Lifetime::Singleton };
        match index {
            0 => node::<N0>(&mut injector, target, lifetime),
            1 => node::<N1>(&mut injector, target, lifetime),
            2 => node::<N2>(&mut injector, target, lifetime),
            3 => node::<N3>(&mut injector, target, lifetime),
            4 => node::<N4>(&mut injector, target, lifetime),
            _ => node::<N5>(&mut injector, target, lifetime),
        }
    }

    let report = injector.validate();
    let has_cycle = report
        .errors
        .iter()
        .any(|e| matches!(e, ValidationError::CircularDependency { .. }));

    let outcomes = [
        injector.get::<N0>().map(|_| ()),
        injector.get::<N1>().map(|_| ()),
        injector.get::<N2>().map(|_| ()),
        injector.get::<N3>().map(|_| ()),
        injector.get::<N4>().map(|_| ()),
        injector.get::<N5>().map(|_| ()),
    ];

    for outcome in &outcomes {
        match outcome {
            Ok(()) => {}
            Err(DiError::Cyclic(chain)) => {
                assert!(has_cycle, "resolution found a cycle validation missed");
                assert!(chain.len() >= 2);
            }
            Err(DiError::NoProvider(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    if report.is_valid() {
        let registered = injector.len();
        let resolved = outcomes.iter().filter(|o| o.is_ok()).count();
        assert_eq!(registered, resolved, "a valid graph must resolve every provider");
    }
});
