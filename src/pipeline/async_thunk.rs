//! Deferred pipelines mixing synchronous and asynchronous steps.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use futures::future::{BoxFuture, FutureExt};

use crate::pipeline::error::{check_settled, UsageError};
use crate::pipeline::step::{unerase, Erased, Step, StepKind, Steps};
use crate::pipeline::suspend::Suspend;
use crate::pipeline::sync_thunk::Thunk;

/// How [`AsyncThunk::done`] schedules a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// The only asynchronous step is the last one: all earlier steps run
    /// when `done` is called and the final step's future is returned
    /// directly, costing a single suspension.
    Direct,
    /// Asynchronous steps appear before the end, or none exist: every
    /// asynchronous step is awaited in turn, with one suspension after each
    /// plus one wrapping suspension for the whole run.
    Sequential,
}

/// A deferred pipeline containing asynchronous steps.
///
/// Created from a [`Thunk`] by appending an asynchronous step. Once a chain
/// is asynchronous every combinator keeps it so.
///
/// # Execution order
///
/// `done` runs the leading synchronous steps and invokes the first
/// asynchronous step before it returns; the rest runs as the returned
/// future is polled. Steps always run in the order they were appended.
///
/// # Example
///
/// ```rust
/// use sluice::thunk;
///
/// # tokio_test::block_on(async {
/// let chain = thunk(3)
///     .pipe_await(|x| async move { x * 10 })
///     .pipe(|x| x + 1);
///
/// assert_eq!(chain.done().await, 31);
/// # });
/// ```
pub struct AsyncThunk<T> {
    steps: Steps,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + 'static> AsyncThunk<T> {
    pub(crate) fn from_steps(steps: Steps) -> Self {
        AsyncThunk {
            steps,
            _marker: PhantomData,
        }
    }

    /// Append a synchronous step.
    pub fn pipe<U, F>(&self, f: F) -> AsyncThunk<U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        AsyncThunk::from_steps(self.steps.push(Step::sync(f)))
    }

    /// Append an asynchronous step.
    pub fn pipe_await<U, F, Fut>(&self, f: F) -> AsyncThunk<U>
    where
        U: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = U> + Send + 'static,
    {
        AsyncThunk::from_steps(self.steps.push(Step::asynchronous(f)))
    }

    /// Append a synchronous step calling `f(accumulator, args)`.
    pub fn rcall<A, U, F>(&self, f: F, args: A) -> AsyncThunk<U>
    where
        A: Clone + Send + Sync + 'static,
        U: Send + 'static,
        F: Fn(T, A) -> U + Send + Sync + 'static,
    {
        self.pipe(move |acc| f(acc, args.clone()))
    }

    /// Append an asynchronous step calling `f(accumulator, args)`.
    pub fn rcall_await<A, U, F, Fut>(&self, f: F, args: A) -> AsyncThunk<U>
    where
        A: Clone + Send + Sync + 'static,
        U: Send + 'static,
        F: Fn(T, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = U> + Send + 'static,
    {
        self.pipe_await(move |acc| f(acc, args.clone()))
    }

    /// Append a synchronous side effect.
    pub fn tap<F, R>(&self, f: F) -> AsyncThunk<T>
    where
        F: Fn(&T) -> R + Send + Sync + 'static,
    {
        self.pipe(move |acc| {
            let _ = f(&acc);
            acc
        })
    }

    /// Append an asynchronous side effect.
    pub fn tap_await<F, Fut>(&self, f: F) -> AsyncThunk<T>
    where
        F: Fn(&T) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
    {
        self.pipe_await(move |acc| {
            let pending = f(&acc);
            async move {
                pending.await;
                acc
            }
        })
    }

    /// The scheduling strategy `done` will use.
    pub fn strategy(&self) -> Strategy {
        if self.steps.async_count() == 1 && self.steps.last_kind() == Some(StepKind::Async) {
            Strategy::Direct
        } else {
            Strategy::Sequential
        }
    }

    /// Number of steps, counting the seed.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false`: a chain holds at least its seed step.
    pub fn is_empty(&self) -> bool {
        self.steps.len() == 0
    }

    /// Kind of every step in execution order.
    pub fn step_kinds(&self) -> Vec<StepKind> {
        self.steps.kinds()
    }

    /// Run the pipeline, panicking on a usage error.
    ///
    /// # Panics
    ///
    /// The returned future panics if a synchronous step produced a pending
    /// value. Use [`try_done`](Self::try_done) to receive the
    /// [`UsageError`] instead.
    pub fn done(&self) -> BoxFuture<'static, T> {
        self.try_done()
            .map(|outcome| match outcome {
                Ok(value) => value,
                Err(error) => panic!("{}", error),
            })
            .boxed()
    }

    /// Run the pipeline, reporting usage errors.
    ///
    /// A [`UsageError::PendingFromSyncStep`] is reported when a
    /// sequentially scheduled chain ends in a boxed future or a
    /// `Ready`/`Pending` future. Other futures returned from `pipe`, such as
    /// `async` blocks, are not detected and are returned as the output.
    pub fn try_done(&self) -> BoxFuture<'static, Result<T, UsageError>> {
        let strategy = self.strategy();

        #[cfg(feature = "tracing")]
        tracing::trace!(
            steps = self.steps.len(),
            async_steps = self.steps.async_count(),
            ?strategy,
            "running async pipeline"
        );

        let mut remaining = self.steps.to_vec().into_iter();
        let mut acc: Erased = Box::new(());

        // Leading synchronous steps run before `done` returns.
        let first_async = loop {
            match remaining.next() {
                Some(Step::Sync(f)) => acc = f(acc),
                Some(Step::Async(f)) => break Some(f),
                None => break None,
            }
        };

        match (strategy, first_async) {
            (Strategy::Direct, Some(f)) => {
                let pending = f(acc);
                async move {
                    let output = pending.await;
                    Suspend::new().await;
                    Ok::<T, UsageError>(unerase(output))
                }
                .boxed()
            }
            (_, first_async) => {
                let head = match first_async {
                    Some(f) => Head::Pending(f(acc)),
                    None => Head::Settled(acc),
                };
                run_sequential(head, remaining.collect()).boxed()
            }
        }
    }
}

/// Accumulator state when control leaves `try_done`.
enum Head {
    Pending(BoxFuture<'static, Erased>),
    Settled(Erased),
}

async fn run_sequential<T: Send + 'static>(head: Head, rest: Vec<Step>) -> Result<T, UsageError> {
    let mut acc = match head {
        Head::Pending(pending) => {
            let output = pending.await;
            Suspend::new().await;
            output
        }
        Head::Settled(acc) => acc,
    };

    for step in rest {
        acc = match step {
            Step::Sync(f) => f(acc),
            Step::Async(f) => {
                let output = f(acc).await;
                Suspend::new().await;
                output
            }
        };
    }

    Suspend::new().await;

    match check_settled::<T>() {
        Ok(()) => Ok(unerase(acc)),
        Err(error) => {
            #[cfg(feature = "tracing")]
            tracing::error!(%error, "pipeline finished with an unsettled value");
            Err(error)
        }
    }
}

impl<T: Send + 'static> From<Thunk<T>> for AsyncThunk<T> {
    fn from(thunk: Thunk<T>) -> Self {
        thunk.into_async()
    }
}

impl<T> Clone for AsyncThunk<T> {
    fn clone(&self) -> Self {
        AsyncThunk {
            steps: self.steps.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for AsyncThunk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncThunk")
            .field("output", &std::any::type_name::<T>())
            .field("steps", &self.steps)
            .finish()
    }
}
