//! Tests and examples for the testing utilities
//!
//! This suite demonstrates how downstream code can test services built on
//! try chains and pipelines.

use std::sync::{Arc, Mutex};

use sluice::prelude::*;
use sluice::testing::{count_suspensions, count_suspensions_within, Suspensions};
use sluice::{assert_failed, assert_recovered, assert_suspensions};

// Example domain types for testing
#[derive(Debug, Clone, PartialEq)]
struct Order {
    id: u32,
    total: u64,
}

#[derive(Debug, Clone, PartialEq)]
enum StoreError {
    Missing(u32),
    Corrupt,
}

#[derive(Debug, Default)]
struct Store {
    orders: Vec<Order>,
}

impl Store {
    fn with_orders(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    fn load(&self, id: u32) -> Result<Order, StoreError> {
        if id == 0 {
            return Err(StoreError::Corrupt);
        }
        self.orders
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or(StoreError::Missing(id))
    }
}

fn load_or_empty(store: &Store, id: u32) -> TryChain<Order, StoreError> {
    attempt(|| store.load(id)).case(
        |e: &StoreError| matches!(e, StoreError::Missing(_)),
        |_| Order { id, total: 0 },
    )
}

#[test]
fn test_missing_order_is_recovered() {
    let store = Store::default();
    assert_recovered!(load_or_empty(&store, 9));
}

#[test]
fn test_corrupt_store_is_not_recovered() {
    let store = Store::default();
    assert_failed!(load_or_empty(&store, 0));
}

#[test]
fn test_existing_order_is_returned() {
    let store = Store::with_orders(vec![Order { id: 1, total: 250 }]);
    assert_eq!(load_or_empty(&store, 1).done().total, 250);
}

fn price(total: u64) -> AsyncThunk<u64> {
    thunk(total)
        .pipe(|t| t * 2)
        .pipe_await(|t| async move { t + 5 })
}

#[test]
fn test_pricing_pipeline_suspends_once() {
    assert_suspensions!(price(10).done(), 25, 1);
}

#[test]
fn test_pricing_with_audit_suspends_twice() {
    let audit = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&audit);
    let chain = price(10).tap(move |t| sink.lock().unwrap().push(*t));

    let report = count_suspensions(chain.done());
    assert_eq!(
        report,
        Suspensions {
            output: 25,
            suspensions: 2
        }
    );
    assert_eq!(*audit.lock().unwrap(), vec![25]);
}

#[test]
fn test_tight_poll_limit_is_enough_for_pipelines() {
    let report = count_suspensions_within(price(1).done(), 2);
    assert_eq!(report.output, 7);
}

#[test]
#[should_panic(expected = "future still pending after 1 polls")]
fn test_poll_limit_is_enforced() {
    count_suspensions_within(price(1).done(), 1);
}

#[test]
fn test_tap_helpers_inside_pipeline() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let chain = thunk(3).pipe(move |x| tap(x, |v| sink.lock().unwrap().push(*v)).tap_me(|_| ()));

    assert_eq!(chain.done(), 3);
    assert_eq!(*seen.lock().unwrap(), vec![3]);
}
