//! Tracing support for pipelines.
//!
//! This module provides [`ChainTracingExt::done_in`] for running a
//! pipeline's terminal operation inside a tracing span. Feature-gated behind
//! `#[cfg(feature = "tracing")]`.

use futures::future::{BoxFuture, FutureExt};

use crate::pipeline::{AsyncThunk, Thunk};

/// Extension trait for running pipelines inside a tracing span.
///
/// This trait is only available when the `tracing` feature is enabled.
pub trait ChainTracingExt {
    /// What the terminal operation produces.
    type Output;

    /// Run `done` inside `span`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use sluice::thunk;
    /// use sluice::tracing::ChainTracingExt;
    /// use tracing::info_span;
    ///
    /// let order_id = 42;
    /// let total = thunk(order_id)
    ///     .pipe(load_order)
    ///     .pipe(price_order)
    ///     .done_in(info_span!("price_order", order_id));
    /// ```
    fn done_in(&self, span: tracing::Span) -> Self::Output;
}

impl<T: Send + 'static> ChainTracingExt for Thunk<T> {
    type Output = T;

    fn done_in(&self, span: tracing::Span) -> T {
        span.in_scope(|| self.done())
    }
}

impl<T: Send + 'static> ChainTracingExt for AsyncThunk<T> {
    type Output = BoxFuture<'static, T>;

    fn done_in(&self, span: tracing::Span) -> BoxFuture<'static, T> {
        use tracing::Instrument as _;
        // Enter the span for the eager part of `done` as well.
        let pending = span.in_scope(|| self.done());
        pending.instrument(span).boxed()
    }
}
