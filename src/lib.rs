//! # Sluice
//!
//! > *"Let the flow through, gate what fails"*
//!
//! A Rust library for writing control flow and data flow as single
//! expressions.
//!
//! ## Two chains
//!
//! - **Try chains** ([`attempt`], [`TryChain`]) capture the outcome of a
//!   fallible computation and recover from failures with `case`, `pick` and
//!   `done_or`. Unhandled failures are never dropped: they surface through
//!   `?` or as a panic at the end of the chain.
//! - **Pipelines** ([`thunk`], [`Thunk`], [`AsyncThunk`]) collect
//!   transformation steps and run nothing until `done` is called. Steps may
//!   be synchronous or return futures.
//!
//! ## Quick Example
//!
//! ```rust
//! use sluice::{attempt, thunk};
//!
//! // Recover from a parse failure in one expression
//! let port = attempt(|| "http".parse::<u16>())
//!     .case(|_: &std::num::ParseIntError| true, |_| 80)
//!     .done();
//! assert_eq!(port, 80);
//!
//! // Describe a pipeline now, run it later
//! let pipeline = thunk(42).pipe(|x| x + 1).pipe(|x| x * 2);
//! assert_eq!(pipeline.done(), 86);
//! ```
//!
//! ## Async pipelines
//!
//! ```rust
//! use sluice::thunk;
//!
//! # tokio_test::block_on(async {
//! let greeting = thunk("world")
//!     .pipe(|name| format!("hello, {}", name))
//!     .pipe_await(|s| async move { s.to_uppercase() })
//!     .done()
//!     .await;
//!
//! assert_eq!(greeting, "HELLO, WORLD");
//! # });
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod attempt;
pub mod pipeline;
pub mod tap;
pub mod testing;
#[cfg(feature = "tracing")]
pub mod tracing;

// Re-exports
pub use attempt::{
    attempt, attempt_async, is_error_of, AsDynError, ErrorPredicate, IntoErrorPredicate, TryChain,
};
pub use pipeline::{thunk, AsyncThunk, StepKind, Strategy, Thunk, UsageError};
pub use tap::{tap, tap_async, TapExt};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::attempt::{attempt, attempt_async, ErrorPredicate, TryChain};
    pub use crate::pipeline::{thunk, AsyncThunk, Thunk};
    pub use crate::tap::{tap, tap_async, TapExt};
}
