//! Property-based tests for pipeline execution
//!
//! Every combination of sync and async steps must produce the same value as
//! the plain fold of its steps, and suspend exactly as many times as its
//! execution strategy allows.

use proptest::prelude::*;
use proptest::strategy::Strategy as _;
use sluice::testing::count_suspensions;
use sluice::{thunk, AsyncThunk, StepKind, Strategy, Thunk};

enum Chain {
    Sync(Thunk<i64>),
    Async(AsyncThunk<i64>),
}

fn build(seed: i64, plan: &[(StepKind, i64)]) -> Chain {
    let mut chain = Chain::Sync(thunk(seed));
    for &(kind, delta) in plan {
        chain = match (chain, kind) {
            (Chain::Sync(c), StepKind::Sync) => Chain::Sync(c.pipe(move |x| x + delta)),
            (Chain::Sync(c), StepKind::Async) => {
                Chain::Async(c.pipe_await(move |x| async move { x + delta }))
            }
            (Chain::Async(c), StepKind::Sync) => Chain::Async(c.pipe(move |x| x + delta)),
            (Chain::Async(c), StepKind::Async) => {
                Chain::Async(c.pipe_await(move |x| async move { x + delta }))
            }
        };
    }
    chain
}

fn expected_suspensions(plan: &[(StepKind, i64)]) -> usize {
    let async_count = plan.iter().filter(|(k, _)| k.is_async()).count();
    match (async_count, plan.last()) {
        (0, _) => 0,
        (1, Some((StepKind::Async, _))) => 1,
        (n, _) => n + 1,
    }
}

fn step() -> impl proptest::strategy::Strategy<Value = (StepKind, i64)> {
    (any::<bool>(), -100i64..100).prop_map(|(is_async, delta)| {
        let kind = if is_async {
            StepKind::Async
        } else {
            StepKind::Sync
        };
        (kind, delta)
    })
}

proptest! {
    #[test]
    fn prop_output_matches_fold(
        seed in -1000i64..1000,
        plan in prop::collection::vec(step(), 0..12)
    ) {
        let expected = plan.iter().fold(seed, |acc, (_, d)| acc + d);
        let output = match build(seed, &plan) {
            Chain::Sync(c) => c.done(),
            Chain::Async(c) => count_suspensions(c.done()).output,
        };
        prop_assert_eq!(output, expected);
    }

    #[test]
    fn prop_suspensions_follow_strategy(
        plan in prop::collection::vec(step(), 0..12)
    ) {
        let suspensions = match build(0, &plan) {
            Chain::Sync(c) => count_suspensions(async move { c.done() }).suspensions,
            Chain::Async(c) => count_suspensions(c.done()).suspensions,
        };
        prop_assert_eq!(suspensions, expected_suspensions(&plan));
    }

    #[test]
    fn prop_direct_only_for_single_trailing_async(
        plan in prop::collection::vec(step(), 1..12)
    ) {
        if let Chain::Async(c) = build(0, &plan) {
            let async_count = plan.iter().filter(|(k, _)| k.is_async()).count();
            let trailing = plan.last().map(|(k, _)| k.is_async()).unwrap_or(false);
            let expected = if async_count == 1 && trailing {
                Strategy::Direct
            } else {
                Strategy::Sequential
            };
            prop_assert_eq!(c.strategy(), expected);
        }
    }

    #[test]
    fn prop_step_kinds_record_plan(
        plan in prop::collection::vec(step(), 0..12)
    ) {
        let mut expected = vec![StepKind::Sync];
        expected.extend(plan.iter().map(|(k, _)| *k));
        let kinds = match build(0, &plan) {
            Chain::Sync(c) => c.step_kinds(),
            Chain::Async(c) => c.step_kinds(),
        };
        prop_assert_eq!(kinds, expected);
    }

    #[test]
    fn prop_reruns_are_identical(
        seed in -1000i64..1000,
        plan in prop::collection::vec(step(), 0..8)
    ) {
        if let Chain::Async(c) = build(seed, &plan) {
            let first = count_suspensions(c.done());
            let second = count_suspensions(c.done());
            prop_assert_eq!(first, second);
        }
    }
}

#[tokio::test]
async fn test_mixed_pipeline_on_spawned_task() {
    let chain = thunk(1_i64)
        .pipe_await(|x| async move {
            tokio::task::yield_now().await;
            x + 1
        })
        .pipe(|x| x * 10)
        .pipe_await(|x| async move {
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
            x - 5
        });

    let handle = tokio::spawn(chain.done());
    assert_eq!(handle.await.unwrap(), 15);
}
