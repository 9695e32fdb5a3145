//! Error predicates for selecting which failures a chain recovers from.
//!
//! A predicate is always one of three explicitly tagged shapes, chosen when
//! it is built:
//!
//! - [`ErrorPredicate::InstanceOf`]: type membership, tested by downcasting
//! - [`ErrorPredicate::Matches`]: a boolean classifier over `&E`
//! - [`ErrorPredicate::AnyOf`]: an ordered list, matching when any member does
//!
//! # Example
//!
//! ```rust
//! use sluice::{is_error_of, ErrorPredicate};
//!
//! #[derive(Debug)]
//! enum DbError {
//!     Timeout,
//!     Missing(u64),
//! }
//!
//! let retryable = ErrorPredicate::matches(|e: &DbError| matches!(e, DbError::Timeout));
//! let missing = ErrorPredicate::matches(|e: &DbError| matches!(e, DbError::Missing(_)));
//! let either = retryable.or(missing);
//!
//! assert!(is_error_of(&DbError::Missing(7), &either));
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

type Classifier<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Classifies error values.
///
/// See the [module documentation](self) for the available shapes.
pub enum ErrorPredicate<E: ?Sized> {
    /// Matches when the error is an instance of a concrete error type.
    ///
    /// Built with [`ErrorPredicate::instance_of`].
    InstanceOf {
        /// Name of the matched type, for diagnostics.
        type_name: &'static str,
        /// Downcast test generated for the matched type.
        test: fn(&E) -> bool,
    },
    /// Matches when the classifier returns `true`.
    Matches(Classifier<E>),
    /// Matches when any contained predicate matches, checked in order.
    AnyOf(Vec<ErrorPredicate<E>>),
}

impl<E: ?Sized> ErrorPredicate<E> {
    /// Build a type-membership predicate for error type `K`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::error::Error;
    /// use std::fmt;
    /// use sluice::ErrorPredicate;
    ///
    /// #[derive(Debug)]
    /// struct Timeout;
    ///
    /// impl fmt::Display for Timeout {
    ///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    ///         write!(f, "timed out")
    ///     }
    /// }
    ///
    /// impl Error for Timeout {}
    ///
    /// let is_timeout = ErrorPredicate::<Box<dyn Error + Send + Sync>>::instance_of::<Timeout>();
    /// assert!(is_timeout.is_match(&(Box::new(Timeout) as Box<dyn Error + Send + Sync>)));
    /// ```
    pub fn instance_of<K>() -> Self
    where
        E: AsDynError,
        K: StdError + 'static,
    {
        ErrorPredicate::InstanceOf {
            type_name: std::any::type_name::<K>(),
            test: is_instance::<E, K>,
        }
    }

    /// Build a classifier predicate from a function.
    pub fn matches<F>(f: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        ErrorPredicate::Matches(Arc::new(f))
    }

    /// Build a predicate matching when any of `predicates` matches.
    ///
    /// An empty list matches nothing.
    pub fn any_of<I>(predicates: I) -> Self
    where
        I: IntoIterator<Item = ErrorPredicate<E>>,
    {
        ErrorPredicate::AnyOf(predicates.into_iter().collect())
    }

    /// Combine with OR logic, keeping `self` first in evaluation order.
    pub fn or(self, other: impl IntoErrorPredicate<E>) -> Self {
        let other = other.into_error_predicate();
        match self {
            ErrorPredicate::AnyOf(mut list) => {
                list.push(other);
                ErrorPredicate::AnyOf(list)
            }
            single => ErrorPredicate::AnyOf(vec![single, other]),
        }
    }

    /// Check whether `error` satisfies this predicate.
    pub fn is_match(&self, error: &E) -> bool {
        match self {
            ErrorPredicate::InstanceOf { test, .. } => test(error),
            ErrorPredicate::Matches(f) => f(error),
            ErrorPredicate::AnyOf(list) => list.iter().any(|p| p.is_match(error)),
        }
    }
}

impl<E: ?Sized> Clone for ErrorPredicate<E> {
    fn clone(&self) -> Self {
        match self {
            ErrorPredicate::InstanceOf { type_name, test } => ErrorPredicate::InstanceOf {
                type_name: *type_name,
                test: *test,
            },
            ErrorPredicate::Matches(f) => ErrorPredicate::Matches(Arc::clone(f)),
            ErrorPredicate::AnyOf(list) => ErrorPredicate::AnyOf(list.clone()),
        }
    }
}

impl<E: ?Sized> fmt::Debug for ErrorPredicate<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPredicate::InstanceOf { type_name, .. } => {
                f.debug_tuple("InstanceOf").field(type_name).finish()
            }
            ErrorPredicate::Matches(_) => f.debug_tuple("Matches").field(&"<function>").finish(),
            ErrorPredicate::AnyOf(list) => f.debug_tuple("AnyOf").field(list).finish(),
        }
    }
}

impl<E: ?Sized> From<Vec<ErrorPredicate<E>>> for ErrorPredicate<E> {
    fn from(list: Vec<ErrorPredicate<E>>) -> Self {
        ErrorPredicate::AnyOf(list)
    }
}

/// Conversion into an [`ErrorPredicate`].
///
/// Implemented for predicates themselves and for any `Fn(&E) -> bool`
/// closure, so recovery combinators accept either.
pub trait IntoErrorPredicate<E: ?Sized> {
    /// Perform the conversion.
    fn into_error_predicate(self) -> ErrorPredicate<E>;
}

impl<E: ?Sized> IntoErrorPredicate<E> for ErrorPredicate<E> {
    fn into_error_predicate(self) -> ErrorPredicate<E> {
        self
    }
}

impl<E: ?Sized, F> IntoErrorPredicate<E> for F
where
    F: Fn(&E) -> bool + Send + Sync + 'static,
{
    fn into_error_predicate(self) -> ErrorPredicate<E> {
        ErrorPredicate::matches(self)
    }
}

/// Error types that can be viewed as a `dyn Error` for downcasting.
///
/// Required by [`ErrorPredicate::instance_of`] and
/// [`TryChain::narrow`](crate::TryChain::narrow).
pub trait AsDynError {
    /// Borrow the error as a trait object.
    fn as_dyn_error(&self) -> &(dyn StdError + 'static);

    /// Convert the error into an owned trait object.
    fn into_dyn_error(self) -> Box<dyn StdError + 'static>
    where
        Self: Sized;
}

impl AsDynError for Box<dyn StdError + 'static> {
    fn as_dyn_error(&self) -> &(dyn StdError + 'static) {
        &**self
    }

    fn into_dyn_error(self) -> Box<dyn StdError + 'static> {
        self
    }
}

impl AsDynError for Box<dyn StdError + Send + 'static> {
    fn as_dyn_error(&self) -> &(dyn StdError + 'static) {
        &**self
    }

    fn into_dyn_error(self) -> Box<dyn StdError + 'static> {
        self
    }
}

impl AsDynError for Box<dyn StdError + Send + Sync + 'static> {
    fn as_dyn_error(&self) -> &(dyn StdError + 'static) {
        &**self
    }

    fn into_dyn_error(self) -> Box<dyn StdError + 'static> {
        self
    }
}

fn is_instance<E, K>(error: &E) -> bool
where
    E: AsDynError + ?Sized,
    K: StdError + 'static,
{
    error.as_dyn_error().is::<K>()
}

/// Check whether `error` satisfies `predicate`.
///
/// Free-function form of [`ErrorPredicate::is_match`].
pub fn is_error_of<E: ?Sized>(error: &E, predicate: &ErrorPredicate<E>) -> bool {
    predicate.is_match(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type BoxError = Box<dyn StdError + Send + Sync>;

    #[derive(Debug)]
    struct NotFound;

    impl fmt::Display for NotFound {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "not found")
        }
    }

    impl StdError for NotFound {}

    #[derive(Debug)]
    struct Denied;

    impl fmt::Display for Denied {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "denied")
        }
    }

    impl StdError for Denied {}

    #[test]
    fn instance_of_matches_exact_type() {
        let p = ErrorPredicate::<BoxError>::instance_of::<NotFound>();
        assert!(p.is_match(&(Box::new(NotFound) as BoxError)));
        assert!(!p.is_match(&(Box::new(Denied) as BoxError)));
    }

    #[test]
    fn instance_of_rejects_wrapped_strings() {
        let p = ErrorPredicate::<BoxError>::instance_of::<NotFound>();
        let e: BoxError = "not found".into();
        assert!(!p.is_match(&e));
    }

    #[test]
    fn classifier_matches_by_value() {
        let p = ErrorPredicate::matches(|e: &i32| *e > 10);
        assert!(p.is_match(&11));
        assert!(!p.is_match(&3));
    }

    #[test]
    fn any_of_matches_either_member() {
        let p = ErrorPredicate::any_of(vec![
            ErrorPredicate::<BoxError>::instance_of::<NotFound>(),
            ErrorPredicate::<BoxError>::instance_of::<Denied>(),
        ]);
        assert!(p.is_match(&(Box::new(NotFound) as BoxError)));
        assert!(p.is_match(&(Box::new(Denied) as BoxError)));
        assert!(!p.is_match(&BoxError::from("other")));
    }

    #[test]
    fn any_of_short_circuits_in_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let p = ErrorPredicate::matches(|e: &i32| *e == 1).or(move |_: &i32| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });

        assert!(p.is_match(&1));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert!(p.is_match(&2));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_any_of_matches_nothing() {
        let p = ErrorPredicate::<i32>::any_of(Vec::new());
        assert!(!p.is_match(&0));
    }

    #[test]
    fn or_flattens_into_single_list() {
        let p = ErrorPredicate::matches(|e: &i32| *e == 1)
            .or(|e: &i32| *e == 2)
            .or(|e: &i32| *e == 3);
        match &p {
            ErrorPredicate::AnyOf(list) => assert_eq!(list.len(), 3),
            other => panic!("expected AnyOf, got {:?}", other),
        }
        assert!(is_error_of(&3, &p));
        assert!(!is_error_of(&4, &p));
    }

    #[test]
    fn debug_names_instance_type() {
        let p = ErrorPredicate::<BoxError>::instance_of::<NotFound>();
        assert!(format!("{:?}", p).contains("NotFound"));
    }
}
