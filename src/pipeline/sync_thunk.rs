//! Synchronous deferred pipelines.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use crate::pipeline::async_thunk::AsyncThunk;
use crate::pipeline::step::{unerase, Erased, Step, StepKind, Steps};

/// A deferred pipeline whose steps are all synchronous.
///
/// Building a `Thunk` never runs anything. Every combinator takes `&self`
/// and returns a new chain sharing the receiver's steps, so a chain can be
/// extended in several directions. Appending an asynchronous step with
/// [`pipe_await`](Self::pipe_await) upgrades the chain to an
/// [`AsyncThunk`].
///
/// # Example
///
/// ```rust
/// use sluice::thunk;
///
/// let total = thunk(42).pipe(|x| x + 1).pipe(|x| x * 2);
/// assert_eq!(total.done(), 86);
/// ```
pub struct Thunk<T> {
    pub(crate) steps: Steps,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + 'static> Thunk<T> {
    /// Start a pipeline seeded with `value`.
    ///
    /// The value is cloned into the accumulator on every execution.
    pub fn of(value: T) -> Self
    where
        T: Clone + Sync,
    {
        Self::from_fn(move || value.clone())
    }

    /// Start a pipeline whose seed is produced by `f` at execution time.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::from_steps(Steps::new(Step::seed(f)))
    }

    pub(crate) fn from_steps(steps: Steps) -> Self {
        Thunk {
            steps,
            _marker: PhantomData,
        }
    }

    /// Append a synchronous step.
    pub fn pipe<U, F>(&self, f: F) -> Thunk<U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        Thunk::from_steps(self.steps.push(Step::sync(f)))
    }

    /// Append an asynchronous step, upgrading to an [`AsyncThunk`].
    pub fn pipe_await<U, F, Fut>(&self, f: F) -> AsyncThunk<U>
    where
        U: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = U> + Send + 'static,
    {
        AsyncThunk::from_steps(self.steps.push(Step::asynchronous(f)))
    }

    /// Append a synchronous step calling `f(accumulator, args)`.
    ///
    /// `args` is cloned for every execution.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::thunk;
    ///
    /// let padded = thunk(String::from("7")).rcall(pad_left, (3, '0'));
    /// assert_eq!(padded.done(), "007");
    ///
    /// fn pad_left(s: String, (width, fill): (usize, char)) -> String {
    ///     let pad: String = std::iter::repeat(fill).take(width.saturating_sub(s.len())).collect();
    ///     pad + &s
    /// }
    /// ```
    pub fn rcall<A, U, F>(&self, f: F, args: A) -> Thunk<U>
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

    /// Append a synchronous side effect; the accumulator passes through.
    pub fn tap<F, R>(&self, f: F) -> Thunk<T>
    where
        F: Fn(&T) -> R + Send + Sync + 'static,
    {
        self.pipe(move |acc| {
            let _ = f(&acc);
            acc
        })
    }

    /// Append an asynchronous side effect; the accumulator passes through
    /// once the future settles.
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

    /// Run every step in order and return the final value.
    ///
    /// Each call re-runs the whole pipeline, side effects included.
    pub fn done(&self) -> T {
        #[cfg(feature = "tracing")]
        tracing::trace!(steps = self.steps.len(), "running sync pipeline");

        let seed: Erased = Box::new(());
        let output = self
            .steps
            .to_vec()
            .into_iter()
            .fold(seed, |acc, step| match step {
                Step::Sync(f) => f(acc),
                Step::Async(_) => unreachable!("Thunk holds only synchronous steps"),
            });
        unerase(output)
    }

    /// Convert into an [`AsyncThunk`] without appending a step.
    ///
    /// The resulting chain's `done` takes the sequential path.
    pub fn into_async(self) -> AsyncThunk<T> {
        AsyncThunk::from_steps(self.steps)
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
}

/// Start a synchronous pipeline seeded with `value`.
///
/// Shorthand for [`Thunk::of`].
pub fn thunk<T>(value: T) -> Thunk<T>
where
    T: Clone + Send + Sync + 'static,
{
    Thunk::of(value)
}

impl<T> Clone for Thunk<T> {
    fn clone(&self) -> Self {
        Thunk {
            steps: self.steps.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Thunk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thunk")
            .field("output", &std::any::type_name::<T>())
            .field("steps", &self.steps)
            .finish()
    }
}
