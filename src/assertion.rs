//! The assertion facade.
//!
//! This is the single point where a rejected matcher becomes a propagated
//! [`Failure`]. Nothing here catches or suppresses; callers hand the result
//! back to the runner with `?`.
//!
//! ```
//! use litmus::assertion::{assert_that, Outcome};
//! use litmus::matchers::{close_to, equal_to, starts_with};
//!
//! fn body() -> Outcome {
//!     assert_that(&100, equal_to(100))?;
//!     assert_that("xyz123", starts_with("xyz"))?;
//!     assert_that(&(2.32 * 3.0), close_to(6.96, 0.005).unwrap())?;
//!     Ok(())
//! }
//! # body().unwrap();
//! ```

use std::fmt::Debug;

use crate::diagnostics::{Failure, Mismatch};
use crate::matchers::Matcher;

/// What a case body or hook returns.
pub type Outcome = Result<(), Failure>;

/// Evaluates `matcher` against `actual`, failing with the mismatch description.
pub fn assert_that<T, M>(actual: &T, matcher: M) -> Outcome
where
    T: Debug + ?Sized,
    M: Matcher<T>,
{
    check(None, actual, &matcher)
}

/// Like [`assert_that`], with a human-readable reason printed above the mismatch.
pub fn assert_that_because<T, M>(reason: &str, actual: &T, matcher: M) -> Outcome
where
    T: Debug + ?Sized,
    M: Matcher<T>,
{
    check(Some(reason), actual, &matcher)
}

fn check<T, M>(reason: Option<&str>, actual: &T, matcher: &M) -> Outcome
where
    T: Debug + ?Sized,
    M: Matcher<T>,
{
    if matcher.matches(actual) {
        return Ok(());
    }
    Err(Failure::assertion(Mismatch {
        reason: reason.map(str::to_string),
        expected: matcher.describe(),
        actual: format!("{:?}", actual),
        mismatch: matcher.describe_mismatch(actual),
    }))
}

/// Fails unless `condition` holds.
pub fn assert_true(reason: &str, condition: bool) -> Outcome {
    if condition {
        return Ok(());
    }
    Err(Failure::assertion(Mismatch {
        reason: (!reason.is_empty()).then(|| reason.to_string()),
        expected: "<true>".to_string(),
        actual: "false".to_string(),
        mismatch: "was <false>".to_string(),
    }))
}

/// Marks a point the body must never reach.
///
/// Typically placed right after a call that should have failed, when the
/// caller handles the failure locally instead of registering an expectation.
pub fn fail<T>() -> Result<T, Failure> {
    Err(Failure::explicit())
}

pub fn fail_with<T>(message: impl Into<String>) -> Result<T, Failure> {
    Err(Failure::new(
        crate::diagnostics::FailureKind::ExplicitFail,
        message,
    ))
}

/// Shorthand for [`assert_that`] / [`assert_that_because`] that borrows the value.
///
/// ```
/// use litmus::assert_that;
/// use litmus::matchers::equal_to;
///
/// fn body() -> litmus::assertion::Outcome {
///     let total = 2 + 2;
///     assert_that!(total, equal_to(4))?;
///     assert_that!("sums agree", total, equal_to(4))?;
///     Ok(())
/// }
/// # body().unwrap();
/// ```
#[macro_export]
macro_rules! assert_that {
    ($reason:expr, $actual:expr, $matcher:expr) => {
        $crate::assertion::assert_that_because($reason, &$actual, $matcher)
    };
    ($actual:expr, $matcher:expr) => {
        $crate::assertion::assert_that(&$actual, $matcher)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{FailureKind, EXPLICIT_FAILURE};
    use crate::matchers::{equal_to, not, starts_with};

    #[test]
    fn test_passing_assertion_has_no_effect() {
        assert!(assert_that(&100, equal_to(100)).is_ok());
        assert!(assert_that(&"String", equal_to("String")).is_ok());
    }

    #[test]
    fn test_failing_assertion_carries_reason_description_and_value() {
        let failure = assert_that_because("string startWith xyz", "abc123", starts_with("xyz"))
            .unwrap_err();
        assert_eq!(failure.kind(), FailureKind::Assertion);

        let mismatch = failure.mismatch().unwrap();
        assert_eq!(mismatch.reason.as_deref(), Some("string startWith xyz"));
        assert_eq!(mismatch.expected, "a string starting with \"xyz\"");
        assert_eq!(mismatch.actual, "\"abc123\"");
        assert_eq!(
            failure.message(),
            "string startWith xyz\nExpected: a string starting with \"xyz\"\n     but: was <\"abc123\">"
        );
    }

    #[test]
    fn test_negated_mismatch_names_the_value_found() {
        let failure = assert_that(&Some(5), not(equal_to(Some(5)))).unwrap_err();
        assert_eq!(failure.mismatch().unwrap().mismatch, "was <Some(5)>");
    }

    #[test]
    fn test_assert_true_mirrors_junit() {
        assert!(assert_true("", true).is_ok());
        let failure = assert_true("message shown on failure", false).unwrap_err();
        assert!(failure.message().starts_with("message shown on failure\n"));
        assert_eq!(assert_true("", false).unwrap_err().mismatch().unwrap().reason, None);
    }

    #[test]
    fn test_fail_uses_the_fixed_reason() {
        let failure = fail::<()>().unwrap_err();
        assert_eq!(failure.kind(), FailureKind::ExplicitFail);
        assert_eq!(failure.message(), EXPLICIT_FAILURE);
        assert_eq!(fail_with::<()>("custom").unwrap_err().message(), "custom");
    }

    #[test]
    fn test_macro_forms() {
        let values = vec![1, 2];
        assert!(assert_that!(values, equal_to([1, 2])).is_ok());
        assert!(assert_that!("reason", values, equal_to([2, 1])).is_err());
    }
}
