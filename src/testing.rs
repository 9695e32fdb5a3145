//! Testing utilities and helpers for Sluice
//!
//! This module provides helpers for testing code built on try chains and
//! pipelines: a suspension-counting executor and assertion macros.
//!
//! # Examples
//!
//! ## Counting suspensions
//!
//! ```rust
//! use sluice::testing::count_suspensions;
//! use sluice::thunk;
//!
//! let chain = thunk(1).pipe_await(|x| async move { x + 1 });
//! let report = count_suspensions(chain.done());
//!
//! assert_eq!(report.output, 2);
//! assert_eq!(report.suspensions, 1);
//! ```
//!
//! ## Assertion Macros
//!
//! ```rust
//! use sluice::{assert_failed, assert_recovered, attempt};
//!
//! let recovered = attempt(|| Err::<i32, _>("boom")).case(|_: &&str| true, |_| 1);
//! assert_recovered!(recovered);
//!
//! let failed = attempt(|| Err::<i32, _>("boom"));
//! assert_failed!(failed);
//! ```

use std::future::Future;
use std::pin::pin;
use std::task::{Context, Poll};

use futures::task::noop_waker;

/// Polls allowed before [`count_suspensions`] gives up.
pub const DEFAULT_POLL_LIMIT: usize = 10_000;

/// Outcome of driving a future with [`count_suspensions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suspensions<T> {
    /// The value the future resolved to.
    pub output: T,
    /// How many times the future returned `Poll::Pending`.
    pub suspensions: usize,
}

/// Drive `future` to completion on the current thread, counting suspensions.
///
/// The future is polled in a loop with a no-op waker; every
/// `Poll::Pending` counts as one suspension. Only futures that make progress
/// on every poll (such as pipelines over ready futures) can be driven this
/// way.
///
/// # Panics
///
/// Panics if the future is still pending after [`DEFAULT_POLL_LIMIT`] polls.
pub fn count_suspensions<F: Future>(future: F) -> Suspensions<F::Output> {
    count_suspensions_within(future, DEFAULT_POLL_LIMIT)
}

/// Like [`count_suspensions`] with an explicit poll limit.
///
/// # Panics
///
/// Panics if the future is still pending after `limit` polls.
pub fn count_suspensions_within<F: Future>(future: F, limit: usize) -> Suspensions<F::Output> {
    let waker = noop_waker();
    let mut cx = Context::from_waker(&waker);
    let mut future = pin!(future);
    let mut suspensions = 0;

    loop {
        match future.as_mut().poll(&mut cx) {
            Poll::Ready(output) => {
                return Suspensions {
                    output,
                    suspensions,
                }
            }
            Poll::Pending => {
                suspensions += 1;
                if suspensions >= limit {
                    panic!("future still pending after {} polls", limit);
                }
            }
        }
    }
}

/// Assert that a try chain holds a success value.
///
/// This macro will panic if the chain holds a failure.
///
/// # Example
///
/// ```rust
/// use sluice::{assert_recovered, TryChain};
///
/// let chain = TryChain::<_, String>::ok(42);
/// assert_recovered!(chain);
/// ```
#[macro_export]
macro_rules! assert_recovered {
    ($chain:expr) => {
        match $crate::TryChain::into_result($chain) {
            Ok(_) => {}
            Err(e) => {
                panic!("Expected Ok, got Err: {:?}", e);
            }
        }
    };
}

/// Assert that a try chain holds a failure.
///
/// This macro will panic if the chain holds a success value.
///
/// # Example
///
/// ```rust
/// use sluice::{assert_failed, TryChain};
///
/// let chain = TryChain::<i32, _>::err("offline");
/// assert_failed!(chain);
/// ```
#[macro_export]
macro_rules! assert_failed {
    ($chain:expr) => {
        match $crate::TryChain::into_result($chain) {
            Err(_) => {}
            Ok(v) => {
                panic!("Expected Err, got Ok: {:?}", v);
            }
        }
    };
}

/// Assert the output and suspension count of a future.
///
/// # Example
///
/// ```rust
/// use sluice::{assert_suspensions, thunk};
///
/// let chain = thunk(2)
///     .pipe_await(|x| async move { x * 3 })
///     .pipe(|x| x + 1);
///
/// assert_suspensions!(chain.done(), 7, 2);
/// ```
#[macro_export]
macro_rules! assert_suspensions {
    ($future:expr, $output:expr, $suspensions:expr) => {
        let report = $crate::testing::count_suspensions($future);
        assert_eq!(report.output, $output, "unexpected output");
        assert_eq!(
            report.suspensions, $suspensions,
            "expected {} suspensions, got {}",
            $suspensions, report.suspensions
        );
    };
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
use crate::pipeline::StepKind;

#[cfg(feature = "proptest")]
impl Arbitrary for StepKind {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![Just(StepKind::Sync), Just(StepKind::Async)].boxed()
    }
}

/// Strategy producing step-kind sequences of up to `max_len` steps.
#[cfg(feature = "proptest")]
pub fn step_plans(max_len: usize) -> impl Strategy<Value = Vec<StepKind>> {
    prop::collection::vec(any::<StepKind>(), 0..=max_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thunk;
    use crate::TryChain;

    #[test]
    fn ready_future_has_no_suspensions() {
        let report = count_suspensions(async { 5 });
        assert_eq!(
            report,
            Suspensions {
                output: 5,
                suspensions: 0
            }
        );
    }

    #[test]
    fn counts_each_pending_poll() {
        let chain = thunk(0)
            .pipe_await(|x| async move { x + 1 })
            .pipe_await(|x| async move { x + 1 });
        let report = count_suspensions(chain.done());
        assert_eq!(report.output, 2);
        assert_eq!(report.suspensions, 3);
    }

    #[test]
    #[should_panic(expected = "future still pending after 3 polls")]
    fn gives_up_at_poll_limit() {
        count_suspensions_within(futures::future::pending::<()>(), 3);
    }

    #[test]
    fn assert_recovered_macro() {
        let chain = TryChain::<_, String>::ok(1);
        assert_recovered!(chain);
    }

    #[test]
    fn assert_failed_macro() {
        let chain = TryChain::<i32, _>::err("error".to_string());
        assert_failed!(chain);
    }

    #[test]
    fn assert_suspensions_macro() {
        assert_suspensions!(thunk(1).pipe_await(|x| async move { x }).done(), 1, 1);
    }

    #[test]
    #[should_panic(expected = "Expected Ok, got Err")]
    fn assert_recovered_panics_on_failure() {
        let chain = TryChain::<i32, _>::err("error".to_string());
        assert_recovered!(chain);
    }

    #[test]
    #[should_panic(expected = "Expected Err, got Ok")]
    fn assert_failed_panics_on_success() {
        let chain = TryChain::<_, String>::ok(42);
        assert_failed!(chain);
    }

    #[test]
    #[should_panic(expected = "expected 0 suspensions, got 1")]
    fn assert_suspensions_panics_on_mismatch() {
        assert_suspensions!(thunk(1).pipe_await(|x| async move { x }).done(), 1, 0);
    }

    #[cfg(feature = "proptest")]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn step_plans_respect_max_len(plan in step_plans(6)) {
                prop_assert!(plan.len() <= 6);
            }
        }
    }
}
