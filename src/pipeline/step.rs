//! Type-erased pipeline steps and the persistent step list.
//!
//! A chain's static type tracks the accumulator of its last step; at runtime
//! every step exchanges a boxed `Any` so the list can hold steps of any
//! input and output type.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

/// The accumulator passed between steps.
pub(crate) type Erased = Box<dyn Any + Send>;

type SyncOp = Arc<dyn Fn(Erased) -> Erased + Send + Sync>;
type AsyncOp = Arc<dyn Fn(Erased) -> BoxFuture<'static, Erased> + Send + Sync>;

/// Whether a step completes immediately or yields a future.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// Appended with `pipe`, `rcall` or `tap`.
    Sync,
    /// Appended with `pipe_await`, `rcall_await` or `tap_await`.
    Async,
}

impl StepKind {
    /// Returns `true` for [`StepKind::Async`].
    pub fn is_async(self) -> bool {
        matches!(self, StepKind::Async)
    }
}

/// One unit of work in a pipeline.
#[derive(Clone)]
pub(crate) enum Step {
    Sync(SyncOp),
    Async(AsyncOp),
}

impl Step {
    /// A step producing the chain's seed; it ignores its input.
    pub(crate) fn seed<T, F>(produce: F) -> Self
    where
        T: Send + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Step::Sync(Arc::new(move |_| Box::new(produce()) as Erased))
    }

    pub(crate) fn sync<T, U, F>(f: F) -> Self
    where
        T: Send + 'static,
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        Step::Sync(Arc::new(move |acc| Box::new(f(unerase::<T>(acc))) as Erased))
    }

    pub(crate) fn asynchronous<T, U, F, Fut>(f: F) -> Self
    where
        T: Send + 'static,
        U: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = U> + Send + 'static,
    {
        Step::Async(Arc::new(move |acc| {
            let pending = f(unerase::<T>(acc));
            async move { Box::new(pending.await) as Erased }.boxed()
        }))
    }

    pub(crate) fn kind(&self) -> StepKind {
        match self {
            Step::Sync(_) => StepKind::Sync,
            Step::Async(_) => StepKind::Async,
        }
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Step").field(&self.kind()).finish()
    }
}

/// Recover the concrete accumulator.
///
/// The chain's type parameter always equals the output type of the last
/// appended step, so the downcast cannot fail for a well-formed chain.
pub(crate) fn unerase<T: 'static>(value: Erased) -> T {
    match value.downcast::<T>() {
        Ok(value) => *value,
        Err(_) => unreachable!(
            "pipeline accumulator is not a {}",
            std::any::type_name::<T>()
        ),
    }
}

struct Node {
    step: Step,
    prev: Option<Arc<Node>>,
}

/// Append-only step list with a shared prefix.
///
/// Appending allocates one node pointing at the previous tail, so a chain
/// and every chain derived from it share their common steps.
#[derive(Clone)]
pub(crate) struct Steps {
    tail: Option<Arc<Node>>,
    len: usize,
    async_count: usize,
}

impl Steps {
    pub(crate) fn new(seed: Step) -> Self {
        Steps {
            tail: None,
            len: 0,
            async_count: 0,
        }
        .push(seed)
    }

    pub(crate) fn push(&self, step: Step) -> Self {
        let async_count = self.async_count + usize::from(step.kind().is_async());
        Steps {
            tail: Some(Arc::new(Node {
                step,
                prev: self.tail.clone(),
            })),
            len: self.len + 1,
            async_count,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn async_count(&self) -> usize {
        self.async_count
    }

    pub(crate) fn last_kind(&self) -> Option<StepKind> {
        self.tail.as_ref().map(|node| node.step.kind())
    }

    /// Steps in execution order.
    pub(crate) fn to_vec(&self) -> Vec<Step> {
        let mut steps = Vec::with_capacity(self.len);
        let mut cursor = self.tail.as_deref();
        while let Some(node) = cursor {
            steps.push(node.step.clone());
            cursor = node.prev.as_deref();
        }
        steps.reverse();
        steps
    }

    pub(crate) fn kinds(&self) -> Vec<StepKind> {
        self.to_vec().iter().map(Step::kind).collect()
    }
}

impl fmt::Debug for Steps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.kinds()).finish()
    }
}
