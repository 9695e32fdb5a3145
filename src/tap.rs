//! Side-effect pass-throughs.
//!
//! Each helper calls a function for its side effect, discards the result
//! and hands back the original value. They work standalone or as step
//! bodies in a pipeline.
//!
//! ```rust
//! use sluice::{tap, TapExt};
//!
//! let mut seen = Vec::new();
//! let value = tap(3, |x| seen.push(*x));
//! let value = (value * 2).tap_me(|x| seen.push(*x));
//!
//! assert_eq!(value, 6);
//! assert_eq!(seen, vec![3, 6]);
//! ```

use std::future::Future;

/// Call `f` with a reference to `value`, then return `value`.
pub fn tap<T, F, R>(value: T, f: F) -> T
where
    F: FnOnce(&T) -> R,
{
    let _ = f(&value);
    value
}

/// Call `f` with a reference to `value`, await its future, then return
/// `value`.
///
/// # Example
///
/// ```rust
/// use sluice::tap_async;
///
/// # tokio_test::block_on(async {
/// let value = tap_async(String::from("saved"), |s| {
///     let len = s.len();
///     async move { assert_eq!(len, 5) }
/// })
/// .await;
/// assert_eq!(value, "saved");
/// # });
/// ```
pub async fn tap_async<T, F, Fut>(value: T, f: F) -> T
where
    F: FnOnce(&T) -> Fut,
    Fut: Future,
{
    f(&value).await;
    value
}

/// Method forms of [`tap`] and [`tap_async`].
///
/// Implemented for every sized type.
pub trait TapExt: Sized {
    /// Call `f` with a reference to `self`, then return `self`.
    fn tap_me<F, R>(self, f: F) -> Self
    where
        F: FnOnce(&Self) -> R,
    {
        tap(self, f)
    }

    /// Call `f` with a reference to `self`, await its future, then return
    /// `self`.
    fn tap_me_async<F, Fut>(self, f: F) -> impl Future<Output = Self>
    where
        F: FnOnce(&Self) -> Fut,
        Fut: Future,
    {
        tap_async(self, f)
    }
}

impl<T> TapExt for T {}
