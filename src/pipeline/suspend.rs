//! A single cooperative suspension point.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Future that returns `Pending` exactly once, waking itself first.
///
/// Each await of `Suspend` hands control back to the executor for one
/// scheduling turn.
#[derive(Debug, Default)]
pub(crate) struct Suspend {
    yielded: bool,
}

impl Suspend {
    pub(crate) fn new() -> Self {
        Suspend { yielded: false }
    }
}

impl Future for Suspend {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}
