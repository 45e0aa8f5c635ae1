#![no_main]

use katana_di::{DiError, Injector, Lifetime};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

#[derive(Debug)]
struct Value(u8);

#[derive(Debug)]
struct Wrapper(Arc<Value>);

fuzz_target!(|data: &[u8]| {
    let mut injectors = vec![Injector::new()];

    for &byte in data.iter().take(256) {
        let current = (byte as usize >> 4) % injectors.len();
        let injector = &mut injectors[current];

        match byte % 6 {
            0 => {
                let had = injector.contains::<Value>();
                let result = injector.provide_value(Value(byte));
                assert_eq!(result.is_err(), had);
            }
            1 => {
                let lifetime = if byte & 0x08 == 0 { Lifetime::New } else { Lifetime::Singleton };
                let had = injector.contains::<Wrapper>();
                let result = injector.provide(lifetime, Wrapper);
                assert_eq!(result.is_err(), had);
            }
            2 => match injector.get::<Value>() {
                Ok(_) => assert!(injector.contains::<Value>()),
                Err(DiError::NoProvider(_)) => assert!(!injector.contains::<Value>()),
                Err(other) => panic!("unexpected error: {other}"),
            },
            3 => {
                let first = injector.get::<Wrapper>();
                let second = injector.get::<Wrapper>();
                if let (Ok(a), Ok(b)) = (&first, &second) {
                    // Both wrap the single registered value
                    assert!(Arc::ptr_eq(&a.0, &b.0));
                }
                assert_eq!(first.is_ok(), second.is_ok());
            }
            4 => {
                if injectors.len() < 8 {
                    let derived = injectors[current].clone();
                    injectors.push(derived);
                }
            }
            _ => {
                let mut slot: Option<Arc<Value>> = None;
                let outcome = injector.resolve(&mut [&mut slot]);
                assert_eq!(outcome.is_ok(), slot.is_some());
            }
        }
    }
});
