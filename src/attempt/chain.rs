//! The `TryChain` type and its recovery combinators.

use std::fmt;
use std::future::Future;

use crate::attempt::predicate::{AsDynError, IntoErrorPredicate};

/// An immutable captured outcome with chained recovery combinators.
///
/// A `TryChain` holds exactly one `Result<T, E>`. Every combinator consumes
/// the chain and returns a new one; failures flow through untouched until a
/// caller explicitly recovers them with [`case`](Self::case),
/// [`pick`](Self::pick) or one of the `done` variants.
///
/// # Example
///
/// ```rust
/// use sluice::attempt;
///
/// #[derive(Debug, PartialEq)]
/// enum ConfigError {
///     Missing,
///     Malformed(String),
/// }
///
/// fn load(raw: Option<&str>) -> Result<u16, ConfigError> {
///     let raw = raw.ok_or(ConfigError::Missing)?;
///     raw.parse().map_err(|_| ConfigError::Malformed(raw.to_string()))
/// }
///
/// let port = attempt(|| load(None))
///     .case(|e: &ConfigError| *e == ConfigError::Missing, |_| 8080)
///     .map(|port| port + 1)
///     .done();
///
/// assert_eq!(port, 8081);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TryChain<T, E> {
    result: Result<T, E>,
}

impl<T, E> TryChain<T, E> {
    /// Run `f` immediately and capture its outcome.
    ///
    /// An `Err` returned by `f` is stored, never propagated.
    pub fn attempt<F>(f: F) -> Self
    where
        F: FnOnce() -> Result<T, E>,
    {
        Self::from_result(f())
    }

    /// Await the future produced by `f` and capture its outcome.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::TryChain;
    ///
    /// # tokio_test::block_on(async {
    /// let chain = TryChain::attempt_async(|| async { Err::<i32, _>("offline") }).await;
    /// assert_eq!(chain.done_or(|_| 0), 0);
    /// # });
    /// ```
    pub async fn attempt_async<F, Fut>(f: F) -> Self
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        Self::from_result(f().await)
    }

    /// Wrap an existing result.
    pub fn from_result(result: Result<T, E>) -> Self {
        TryChain { result }
    }

    /// A chain holding a success value.
    pub fn ok(value: T) -> Self {
        TryChain { result: Ok(value) }
    }

    /// A chain holding a failure.
    pub fn err(error: E) -> Self {
        TryChain { result: Err(error) }
    }

    /// Returns `true` if the chain holds a success value.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Returns `true` if the chain holds a failure.
    pub fn is_err(&self) -> bool {
        self.result.is_err()
    }

    /// Borrow the success value, if any.
    pub fn value(&self) -> Option<&T> {
        self.result.as_ref().ok()
    }

    /// Borrow the failure, if any.
    pub fn error(&self) -> Option<&E> {
        self.result.as_ref().err()
    }

    /// Borrow the captured result.
    pub fn as_result(&self) -> &Result<T, E> {
        &self.result
    }

    /// Consume the chain, returning the captured result.
    ///
    /// This is the non-panicking exit: use `?` on the returned value to
    /// propagate an unrecovered failure.
    pub fn into_result(self) -> Result<T, E> {
        self.result
    }

    /// Transform the success value.
    ///
    /// On failure `f` is never called and the error passes through.
    pub fn map<U, F>(self, f: F) -> TryChain<U, E>
    where
        F: FnOnce(T) -> U,
    {
        TryChain {
            result: self.result.map(f),
        }
    }

    /// Transform the success value with a fallible function.
    ///
    /// A failure from `f` is not captured: it is returned in the outer
    /// `Err` so the caller propagates it with `?`. A failure already held by
    /// the chain passes through without calling `f`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::TryChain;
    ///
    /// fn run() -> Result<i32, std::num::ParseIntError> {
    ///     let chain = TryChain::<_, String>::ok("41").try_map(|s| s.parse::<i32>())?;
    ///     Ok(chain.map(|n| n + 1).done())
    /// }
    ///
    /// assert_eq!(run(), Ok(42));
    /// ```
    pub fn try_map<U, E2, F>(self, f: F) -> Result<TryChain<U, E>, E2>
    where
        F: FnOnce(T) -> Result<U, E2>,
    {
        match self.result {
            Ok(value) => Ok(TryChain::ok(f(value)?)),
            Err(error) => Ok(TryChain::err(error)),
        }
    }

    /// Keep a failure only if it matches `predicate`.
    ///
    /// A success passes through. A matching failure stays in the chain. A
    /// failure that does not match is handed back unmodified in `Err`, so
    /// `?` re-raises it at the call site.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::attempt;
    ///
    /// fn fetch() -> Result<i32, String> {
    ///     let value = attempt(|| Err::<i32, _>("timeout".to_string()))
    ///         .pick(|e: &String| e == "timeout")?
    ///         .done_or(|_| -1);
    ///     Ok(value)
    /// }
    ///
    /// assert_eq!(fetch(), Ok(-1));
    /// ```
    pub fn pick<P>(self, predicate: P) -> Result<Self, E>
    where
        P: IntoErrorPredicate<E>,
    {
        match self.result {
            Ok(value) => Ok(TryChain::ok(value)),
            Err(error) => {
                if predicate.into_error_predicate().is_match(&error) {
                    Ok(TryChain::err(error))
                } else {
                    #[cfg(feature = "tracing")]
                    tracing::debug!("error did not match pick predicate; propagating");
                    Err(error)
                }
            }
        }
    }

    /// Recover from a failure matching `predicate`.
    ///
    /// `handler` receives a fresh chain holding the failure and its return
    /// value becomes the new success. Failures that do not match, and
    /// successes, pass through unchanged.
    pub fn case<P, H>(self, predicate: P, handler: H) -> Self
    where
        P: IntoErrorPredicate<E>,
        H: FnOnce(TryChain<T, E>) -> T,
    {
        let predicate = predicate.into_error_predicate();
        match self.result {
            Err(error) if predicate.is_match(&error) => TryChain::ok(handler(TryChain::err(error))),
            result => TryChain { result },
        }
    }

    /// Observe a failure without changing the chain.
    ///
    /// `f` runs only when the chain holds a failure; its return value is
    /// discarded.
    pub fn tap<F, R>(self, f: F) -> Self
    where
        F: FnOnce(&E) -> R,
    {
        if let Err(error) = &self.result {
            let _ = f(error);
        }
        self
    }

    /// Return the success value, panicking on an unrecovered failure.
    ///
    /// The panic is the terminal raise: a failure nobody handled is never
    /// dropped silently. Use [`into_result`](Self::into_result) to propagate
    /// with `?` instead.
    ///
    /// # Panics
    ///
    /// Panics with the `Debug` rendering of the error if the chain holds a
    /// failure.
    #[track_caller]
    pub fn done(self) -> T
    where
        E: fmt::Debug,
    {
        match self.result {
            Ok(value) => value,
            Err(error) => panic!("unhandled error in try chain: {:?}", error),
        }
    }

    /// Return the success value, or the result of `fallback` on failure.
    pub fn done_or<F>(self, fallback: F) -> T
    where
        F: FnOnce(E) -> T,
    {
        self.result.unwrap_or_else(fallback)
    }

    /// Return the success value, or let a fallible `fallback` decide.
    ///
    /// `fallback` may recover with `Ok` or raise its own error with `Err`.
    pub fn try_done_or<E2, F>(self, fallback: F) -> Result<T, E2>
    where
        F: FnOnce(E) -> Result<T, E2>,
    {
        self.result.or_else(fallback)
    }
}

impl<T, E: AsDynError> TryChain<T, E> {
    /// Narrow the error type to the concrete error `K`.
    ///
    /// A success passes through. A failure that is a `K` is downcast and
    /// kept. Any other failure is handed back unmodified in `Err`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::error::Error;
    /// use std::num::ParseIntError;
    /// use sluice::attempt;
    ///
    /// let chain = attempt(|| "x".parse::<i32>().map_err(Box::<dyn Error + Send + Sync>::from))
    ///     .narrow::<ParseIntError>()
    ///     .unwrap();
    ///
    /// assert!(chain.error().is_some());
    /// ```
    pub fn narrow<K>(self) -> Result<TryChain<T, K>, E>
    where
        K: std::error::Error + 'static,
    {
        match self.result {
            Ok(value) => Ok(TryChain::ok(value)),
            Err(error) if error.as_dyn_error().is::<K>() => {
                match error.into_dyn_error().downcast::<K>() {
                    Ok(narrowed) => Ok(TryChain::err(*narrowed)),
                    Err(_) => unreachable!("downcast checked by is::<K>()"),
                }
            }
            Err(error) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    expected = std::any::type_name::<K>(),
                    "error is not of the narrowed type; propagating"
                );
                Err(error)
            }
        }
    }
}

impl<T, E> From<Result<T, E>> for TryChain<T, E> {
    fn from(result: Result<T, E>) -> Self {
        TryChain::from_result(result)
    }
}

impl<T, E> From<TryChain<T, E>> for Result<T, E> {
    fn from(chain: TryChain<T, E>) -> Self {
        chain.result
    }
}
