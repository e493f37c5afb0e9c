//! # Matchers
//!
//! Composable predicates with human-readable failure descriptions.
//!
//! A matcher answers two questions about a value: does it match, and if not,
//! what was wrong with it. Matchers are stateless and never mutate their
//! input, so one instance can back any number of assertions.
//!
//! ## Built-ins
//!
//! - **Core**: [`equal_to`], [`is`], [`anything`], [`is_none`], [`some`], [`not`],
//!   [`all_of`], [`any_of`]
//! - **Text**: [`starts_with`], [`ends_with`], [`contains_string`],
//!   [`equal_to_ignoring_case`], [`matches_pattern`], [`starts_with_elements`]
//! - **Numbers**: [`close_to`], [`greater_than`], [`less_than`]

use std::fmt::Debug;

use thiserror::Error;

mod basic;
mod number;
mod text;

pub use self::basic::{
    all_of, any_of, anything, equal_to, is, is_none, not, some, AllOf, AnyOf, Anything, EqualTo,
    Is, IsNone, Not, SomeMatching,
};
pub use self::number::{close_to, greater_than, less_than, CloseTo, OrderingComparison};
pub use self::text::{
    contains_string, ends_with, equal_to_ignoring_case, matches_pattern, starts_with,
    starts_with_elements, ContainsString, EndsWith, EqualToIgnoringCase, MatchesPattern,
    StartsWith, StartsWithElements,
};

/// A predicate over `T` paired with a description generator.
pub trait Matcher<T: ?Sized> {
    fn matches(&self, actual: &T) -> bool;

    /// Describes what this matcher accepts, e.g. `<100>` or `a string starting with "xyz"`.
    fn describe(&self) -> String;

    /// Describes why `actual` was rejected. Only meaningful when `matches` returned false.
    fn describe_mismatch(&self, actual: &T) -> String;
}

impl<T: ?Sized, M: Matcher<T> + ?Sized> Matcher<T> for &M {
    fn matches(&self, actual: &T) -> bool {
        (**self).matches(actual)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn describe_mismatch(&self, actual: &T) -> String {
        (**self).describe_mismatch(actual)
    }
}

impl<T: ?Sized, M: Matcher<T> + ?Sized> Matcher<T> for Box<M> {
    fn matches(&self, actual: &T) -> bool {
        (**self).matches(actual)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn describe_mismatch(&self, actual: &T) -> String {
        (**self).describe_mismatch(actual)
    }
}

/// Method-style composition: `starts_with("a").and(ends_with("z"))`.
pub trait MatcherExt: Sized {
    fn and<O>(self, other: O) -> AllOf<Self, O> {
        all_of(self, other)
    }

    fn or<O>(self, other: O) -> AnyOf<Self, O> {
        any_of(self, other)
    }
}

impl<M> MatcherExt for M {}

/// Rejected matcher construction.
#[derive(Debug, Error)]
pub enum MatcherError {
    #[error("tolerance must be a non-negative number, got {tolerance}")]
    InvalidTolerance { tolerance: f64 },
    #[error("invalid pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// The standard "was <actual>" mismatch text.
pub(crate) fn was<T: Debug + ?Sized>(actual: &T) -> String {
    format!("was <{:?}>", actual)
}
