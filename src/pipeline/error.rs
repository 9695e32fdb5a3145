//! Usage errors raised by pipeline execution.

use std::any::type_name;
use std::fmt;

/// A programmer mistake detected while running a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// A step appended with `pipe` returned a future instead of a value.
    PendingFromSyncStep {
        /// Type name of the pipeline's final output.
        output_type: &'static str,
    },
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageError::PendingFromSyncStep { output_type } => write!(
                f,
                "a synchronous step returned a pending value ({}); use `pipe_await` for steps that return futures",
                output_type
            ),
        }
    }
}

impl std::error::Error for UsageError {}

/// Prefixes of the top-level type names treated as pending.
///
/// Matching is anchored at the start, so values that merely contain a
/// future (`Vec<BoxFuture<_>>`, `(i32, Option<BoxFuture<_>>)`) are settled.
const PENDING_TYPES: &[&str] = &[
    "core::pin::Pin<alloc::boxed::Box<dyn core::future::future::Future<",
    "alloc::boxed::Box<dyn core::future::future::Future<",
    "core::future::ready::Ready<",
    "core::future::pending::Pending<",
    "futures_util::future::ready::Ready<",
    "futures_util::future::pending::Pending<",
];

/// Whether `T` is a future type the executor recognises as pending.
///
/// Covers boxed `dyn Future` values (`BoxFuture`, `LocalBoxFuture`) and the
/// ready/pending leaf futures of `std` and `futures`. Anonymous `async`
/// block types and other named futures are not recognised.
pub(crate) fn is_pending_type<T: ?Sized>() -> bool {
    let name = type_name::<T>();
    PENDING_TYPES.iter().any(|p| name.starts_with(p))
}

/// Fail when the final accumulator is itself pending.
pub(crate) fn check_settled<T>() -> Result<(), UsageError> {
    if is_pending_type::<T>() {
        Err(UsageError::PendingFromSyncStep {
            output_type: type_name::<T>(),
        })
    } else {
        Ok(())
    }
}
