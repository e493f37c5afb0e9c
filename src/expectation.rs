//! Expected-failure declarations and their reconciliation with what a body raised.
//!
//! A case can expect a failure in two ways:
//!
//! - declaratively, with [`Case::expecting`](crate::suite::Case::expecting);
//! - through the [`ExpectationRule`] handed to the body, by calling
//!   [`ExpectationRule::expect`] and [`ExpectationRule::expect_message`]
//!   before the failing call.
//!
//! Both routes produce an [`Expectation`] that [`reconcile`] checks against the
//! body's [`Outcome`](crate::assertion::Outcome).

use std::fmt;

use crate::diagnostics::{CaseError, Failure, FailureKind};
use crate::matchers::{contains_string, Matcher};

/// A declared expected failure: an optional kind and an optional message matcher.
pub struct Expectation {
    kind: Option<FailureKind>,
    message: Option<Box<dyn Matcher<str>>>,
}

impl Expectation {
    pub fn kind(kind: FailureKind) -> Self {
        Self {
            kind: Some(kind),
            message: None,
        }
    }

    pub fn expected_kind(&self) -> Option<FailureKind> {
        self.kind
    }

    fn describe(&self) -> String {
        let kind = self
            .kind
            .map_or_else(|| "a failure".to_string(), |k| k.to_string());
        match &self.message {
            Some(m) => format!("{} with message {}", kind, m.describe()),
            None => kind,
        }
    }

    /// Checks `failure` against this expectation. `Ok` means it was the expected outcome.
    fn check(&self, failure: &Failure) -> Result<(), CaseError> {
        if let Some(kind) = self.kind {
            if failure.kind() != kind {
                return Err(CaseError::ExpectationNotSatisfied {
                    expected: Some(kind),
                    actual: Some(failure.kind()),
                    reason: format!(
                        "expected {} but {} was raised: {}",
                        kind,
                        failure.kind(),
                        failure.message()
                    ),
                });
            }
        }
        if let Some(matcher) = &self.message {
            if !matcher.matches(failure.message()) {
                return Err(CaseError::ExpectationNotSatisfied {
                    expected: self.kind,
                    actual: Some(failure.kind()),
                    reason: format!(
                        "expected {} but message {}",
                        self.describe(),
                        matcher.describe_mismatch(failure.message())
                    ),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expectation")
            .field("kind", &self.kind)
            .field("message", &self.message.as_ref().map(|m| m.describe()))
            .finish()
    }
}

/// Per-case expectation state owned by the runner.
///
/// The runner resets it before every body and takes it afterwards, so an
/// expectation registered in one case never reaches the next.
#[derive(Default)]
pub struct ExpectationRule {
    kind: Option<FailureKind>,
    message: Option<Box<dyn Matcher<str>>>,
}

impl ExpectationRule {
    /// A rule with nothing expected.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn expect(&mut self, kind: FailureKind) -> &mut Self {
        self.kind = Some(kind);
        self
    }

    pub fn expect_message<M>(&mut self, matcher: M) -> &mut Self
    where
        M: Matcher<str> + 'static,
    {
        self.message = Some(Box::new(matcher));
        self
    }

    /// Expects the failure message to contain `text`.
    pub fn expect_message_containing(&mut self, text: impl Into<String>) -> &mut Self {
        self.expect_message(contains_string(text))
    }

    pub fn is_active(&self) -> bool {
        self.kind.is_some() || self.message.is_some()
    }

    pub fn reset(&mut self) {
        self.kind = None;
        self.message = None;
    }

    /// Reads and clears the registered expectation.
    pub fn take(&mut self) -> Option<Expectation> {
        if !self.is_active() {
            return None;
        }
        Some(Expectation {
            kind: self.kind.take(),
            message: self.message.take(),
        })
    }
}

impl fmt::Debug for ExpectationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpectationRule")
            .field("kind", &self.kind)
            .field("message", &self.message.as_ref().map(|m| m.describe()))
            .finish()
    }
}

/// Decides whether a body outcome satisfies the active expectation, if any.
pub fn reconcile(
    expectation: Option<&Expectation>,
    outcome: Result<(), Failure>,
) -> Result<(), CaseError> {
    match (expectation, outcome) {
        (None, Ok(())) => Ok(()),
        (None, Err(failure)) => Err(CaseError::from_body_failure(failure)),
        (Some(expected), Ok(())) => Err(CaseError::ExpectationNotSatisfied {
            expected: expected.kind,
            actual: None,
            reason: format!("expected {} but none was raised", expected.describe()),
        }),
        (Some(expected), Err(failure)) => expected.check(&failure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::starts_with;

    #[test]
    fn test_expected_kind_raised_passes_regardless_of_message() {
        let expected = Expectation::kind(FailureKind::IllegalArgument);
        let raised = Err(Failure::illegal_argument("anything at all"));
        assert_eq!(reconcile(Some(&expected), raised), Ok(()));
    }

    #[test]
    fn test_different_kind_names_both() {
        let expected = Expectation::kind(FailureKind::IllegalArgument);
        let raised = Err(Failure::illegal_state("closed"));
        let err = reconcile(Some(&expected), raised).unwrap_err();
        let reason = err.to_string();
        assert!(reason.contains("IllegalArgument"));
        assert!(reason.contains("IllegalState"));
        assert!(matches!(
            err,
            CaseError::ExpectationNotSatisfied {
                expected: Some(FailureKind::IllegalArgument),
                actual: Some(FailureKind::IllegalState),
                ..
            }
        ));
    }

    #[test]
    fn test_nothing_raised_is_reported() {
        let expected = Expectation::kind(FailureKind::IllegalArgument);
        let err = reconcile(Some(&expected), Ok(())).unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected IllegalArgument but none was raised"
        );
    }

    #[test]
    fn test_message_matcher_is_applied() {
        let mut rule = ExpectationRule::none();
        rule.expect(FailureKind::IllegalArgument)
            .expect_message_containing("message check available");
        let expectation = rule.take().unwrap();

        let ok = Err(Failure::illegal_argument("message check available"));
        assert_eq!(reconcile(Some(&expectation), ok), Ok(()));

        let wrong = Err(Failure::illegal_argument("something else"));
        let err = reconcile(Some(&expectation), wrong).unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected IllegalArgument with message a string containing \"message check available\" but message was <\"something else\">"
        );
    }

    #[test]
    fn test_message_only_expectation_accepts_any_kind() {
        let mut rule = ExpectationRule::none();
        rule.expect_message(starts_with("disk"));
        let expectation = rule.take().unwrap();
        let raised = Err(Failure::new(FailureKind::Io, "disk full"));
        assert_eq!(reconcile(Some(&expectation), raised), Ok(()));
    }

    #[test]
    fn test_take_clears_the_rule() {
        let mut rule = ExpectationRule::none();
        assert!(rule.take().is_none());
        rule.expect(FailureKind::Io);
        assert!(rule.is_active());
        assert!(rule.take().is_some());
        assert!(!rule.is_active());
        assert!(rule.take().is_none());
    }

    #[test]
    fn test_reset_forgets_everything() {
        let mut rule = ExpectationRule::none();
        rule.expect(FailureKind::Io).expect_message_containing("x");
        rule.reset();
        assert!(!rule.is_active());
    }

    #[test]
    fn test_unexpected_failures_pass_through() {
        let err = reconcile(None, Err(Failure::illegal_state("boom"))).unwrap_err();
        assert!(matches!(err, CaseError::UnexpectedFailure { .. }));
    }
}
