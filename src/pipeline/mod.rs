//! Deferred transformation pipelines.
//!
//! A pipeline is an immutable list of steps built by chaining and run only
//! when a terminal `done` is called:
//!
//! ```rust
//! use sluice::thunk;
//!
//! let doubled = thunk(vec![3, 1, 2])
//!     .pipe(|mut v| {
//!         v.sort();
//!         v
//!     })
//!     .pipe(|v| v.into_iter().map(|x| x * 2).collect::<Vec<_>>());
//!
//! assert_eq!(doubled.done(), vec![2, 4, 6]);
//! ```
//!
//! # Synchronous and asynchronous chains
//!
//! [`Thunk`] holds only synchronous steps and `done` returns the value
//! directly. Appending a step that returns a future (`pipe_await`,
//! `rcall_await`, `tap_await`) produces an [`AsyncThunk`], whose `done`
//! returns a future. A chain never goes back from asynchronous to
//! synchronous.
//!
//! # Suspensions
//!
//! [`AsyncThunk::done`] picks a [`Strategy`] from the shape of the chain.
//! When the only asynchronous step is the last one, the chain costs a single
//! suspension. Otherwise every asynchronous step costs one suspension and
//! the run as a whole costs one more.
//!
//! | Steps after the seed | Suspensions |
//! |----------------------|-------------|
//! | sync, sync, async | 1 |
//! | sync, async, sync | 2 |
//! | async, sync, sync | 2 |
//! | sync, async, async | 3 |
//! | async, async, async | 4 |
//!
//! # Usage errors
//!
//! A step appended with `pipe` that returns a future is a mistake: the
//! future would be handed on unawaited. When the final output of a
//! sequentially scheduled chain is such a value, [`AsyncThunk::try_done`]
//! reports [`UsageError::PendingFromSyncStep`] and [`AsyncThunk::done`]
//! panics.
//!
//! Detection looks at the output's type name and only recognises boxed
//! futures (`BoxFuture`, `LocalBoxFuture`, `Box<dyn Future>`) and the
//! `Ready`/`Pending` futures of `std` and `futures`. A step returning an
//! `async` block or any other named future is not caught: the future
//! becomes the chain's output. Values that merely contain a future, such as
//! `Vec<BoxFuture<_>>`, are ordinary outputs.

mod async_thunk;
mod error;
mod step;
mod suspend;
mod sync_thunk;

pub use async_thunk::{AsyncThunk, Strategy};
pub use error::UsageError;
pub use step::StepKind;
pub use sync_thunk::{thunk, Thunk};
