//! Property-based tests for cleanup ordering and failure reporting

#[cfg(test)]
mod cleanup_property_tests {
    use proptest::prelude::*;
    use scopekit::{Error, FailurePolicy, ResourceManager, SharedResourceManager};
    use parking_lot::Mutex;
    use std::cell::RefCell;
    use std::sync::Arc;

    /// Which registered callbacks fail, by registration index
    fn arb_failure_mask() -> impl Strategy<Value = Vec<bool>> {
        prop::collection::vec(any::<bool>(), 0..64)
    }

    proptest! {
        #[test]
        fn execution_order_is_reverse_of_registration(n in 0usize..200) {
            let log = RefCell::new(Vec::new());
            let mut manager = ResourceManager::new();
            for i in 0..n {
                let log = &log;
                manager.register_cleanup(move || log.borrow_mut().push(i));
            }
            prop_assert_eq!(manager.pending(), n);

            manager.execute_cleanup().unwrap();

            let expected: Vec<usize> = (0..n).rev().collect();
            prop_assert_eq!(&*log.borrow(), &expected);
            prop_assert!(manager.is_empty());
        }

        #[test]
        fn sequential_sessions_are_independent(batches in prop::collection::vec(0usize..20, 1..6)) {
            let log = RefCell::new(Vec::new());
            let mut manager = ResourceManager::new();
            let mut expected = Vec::new();

            for (batch, &size) in batches.iter().enumerate() {
                for i in 0..size {
                    let log = &log;
                    manager.register_cleanup(move || log.borrow_mut().push((batch, i)));
                }
                manager.execute_cleanup().unwrap();
                expected.extend((0..size).rev().map(|i| (batch, i)));
            }

            prop_assert_eq!(&*log.borrow(), &expected);
        }

        #[test]
        fn continue_policy_reports_every_failure(mask in arb_failure_mask()) {
            let ran = RefCell::new(0usize);
            let mut manager = ResourceManager::new();
            for &fails in &mask {
                let ran = &ran;
                manager.register_fallible_cleanup(move || {
                    *ran.borrow_mut() += 1;
                    if fails { Err("failed") } else { Ok(()) }
                });
            }

            let result = manager.execute_cleanup();
            prop_assert_eq!(*ran.borrow(), mask.len());

            let expected_failures: Vec<usize> = mask
                .iter()
                .enumerate()
                .rev()
                .filter(|(_, fails)| **fails)
                .map(|(index, _)| index)
                .collect();

            match result {
                Ok(()) => {
                    prop_assert!(expected_failures.is_empty());
                }
                Err(err) => {
                    let reported: Vec<usize> = err.failures().iter().map(|f| f.index).collect();
                    prop_assert_eq!(reported, expected_failures);
                }
            }
        }

        #[test]
        fn fail_fast_skips_exactly_the_rest(mask in arb_failure_mask()) {
            let ran = RefCell::new(0usize);
            let mut manager = ResourceManager::with_policy(FailurePolicy::FailFast);
            for &fails in &mask {
                let ran = &ran;
                manager.register_fallible_cleanup(move || {
                    *ran.borrow_mut() += 1;
                    if fails { Err("failed") } else { Ok(()) }
                });
            }

            let first_failure = mask.iter().rposition(|&fails| fails);
            let result = manager.execute_cleanup();
            prop_assert!(manager.is_empty());

            match (first_failure, result) {
                (None, Ok(())) => {
                    prop_assert_eq!(*ran.borrow(), mask.len());
                }
                (Some(index), Err(Error::CleanupAborted { failure, skipped })) => {
                    prop_assert_eq!(failure.index, index);
                    prop_assert_eq!(skipped, index);
                    prop_assert_eq!(*ran.borrow(), mask.len() - index);
                }
                (expected, other) => {
                    prop_assert!(false, "expected failure at {:?}, got {:?}", expected, other);
                }
            }
        }

        #[test]
        fn shared_manager_preserves_order(n in 0usize..100) {
            let log = Arc::new(Mutex::new(Vec::new()));
            let manager = SharedResourceManager::new();
            for i in 0..n {
                let log = Arc::clone(&log);
                manager.register_cleanup(move || log.lock().push(i));
            }

            manager.execute_cleanup().unwrap();

            let expected: Vec<usize> = (0..n).rev().collect();
            prop_assert_eq!(&*log.lock(), &expected);
        }
    }
}
