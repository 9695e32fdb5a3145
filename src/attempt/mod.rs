//! Exception-style recovery as a chain of expressions.
//!
//! [`attempt`] runs a fallible computation once and captures its outcome in
//! a [`TryChain`]. The chain then offers combinators to inspect, transform
//! and recover from the failure:
//!
//! | Combinator | On success | On failure |
//! |------------|------------|------------|
//! | `map(f)` | apply `f` | pass through |
//! | `case(p, h)` | pass through | if `p` matches, recover with `h` |
//! | `pick(p)` | pass through | if `p` matches keep it, else hand it back in `Err` |
//! | `tap(f)` | pass through | observe with `f` |
//! | `done()` | return value | panic |
//! | `done_or(f)` | return value | return `f(error)` |
//!
//! Failures are only recovered where the caller asks. Everywhere else they
//! flow through the chain untouched, and an unrecovered failure surfaces at
//! the end either through `?` ([`TryChain::into_result`], [`TryChain::pick`])
//! or as a panic ([`TryChain::done`]).
//!
//! # Example
//!
//! ```rust
//! use sluice::{attempt, ErrorPredicate};
//!
//! #[derive(Debug, PartialEq)]
//! enum FetchError {
//!     Timeout,
//!     NotFound,
//!     Corrupt,
//! }
//!
//! let transient = ErrorPredicate::matches(|e: &FetchError| *e == FetchError::Timeout)
//!     .or(|e: &FetchError| *e == FetchError::NotFound);
//!
//! let body = attempt(|| Err::<String, _>(FetchError::NotFound))
//!     .tap(|e| eprintln!("fetch failed: {:?}", e))
//!     .case(transient, |_| String::from("cached"))
//!     .done();
//!
//! assert_eq!(body, "cached");
//! ```

mod chain;
mod predicate;

use std::future::Future;

pub use chain::TryChain;
pub use predicate::{is_error_of, AsDynError, ErrorPredicate, IntoErrorPredicate};

/// Run `f` immediately and capture its outcome in a [`TryChain`].
///
/// Shorthand for [`TryChain::attempt`].
pub fn attempt<T, E, F>(f: F) -> TryChain<T, E>
where
    F: FnOnce() -> Result<T, E>,
{
    TryChain::attempt(f)
}

/// Await the future produced by `f` and capture its outcome.
///
/// Shorthand for [`TryChain::attempt_async`].
pub async fn attempt_async<T, E, F, Fut>(f: F) -> TryChain<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    TryChain::attempt_async(f).await
}
