//! Failure classification and the error taxonomy reported by the runner.
//!
//! Two layers live here:
//!
//! - [`Failure`] is what a case body or hook *raises*. It carries a closed
//!   [`FailureKind`] tag so that "raised kind equals expected kind" is a value
//!   comparison, plus a message and, for assertion failures, the [`Mismatch`].
//! - [`CaseError`] is what the runner *reports*. Every failed or errored
//!   [`CaseResult`](crate::report::CaseResult) carries exactly one of these.

use std::any::Any;
use std::fmt;

use miette::Diagnostic;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Fixed reason for a case that reaches an explicit `fail()`.
pub const EXPLICIT_FAILURE: &str = "explicit failure marker reached";

// =============================================================================
// LIFECYCLE PHASES
// =============================================================================

/// Where in the lifecycle something happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    BeforeAll,
    BeforeEach,
    Body,
    AfterEach,
    AfterAll,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::BeforeAll => "beforeAll",
            Phase::BeforeEach => "beforeEach",
            Phase::Body => "body",
            Phase::AfterEach => "afterEach",
            Phase::AfterAll => "afterAll",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// FAILURE KINDS
// =============================================================================

/// Type-safe failure classification used by expectation matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// A caller passed an argument the code under test rejects.
    IllegalArgument,
    /// The code under test was in the wrong state for the operation.
    IllegalState,
    Unsupported,
    NotFound,
    Io,
    /// Overflow, division by zero and friends.
    Arithmetic,
    /// A matcher rejected a value.
    Assertion,
    /// `fail()` was reached.
    ExplicitFail,
    /// A panic was caught at the runner boundary.
    Panic,
    /// Embedder-defined kind, compared by name.
    Custom(&'static str),
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::IllegalArgument => "IllegalArgument",
            FailureKind::IllegalState => "IllegalState",
            FailureKind::Unsupported => "Unsupported",
            FailureKind::NotFound => "NotFound",
            FailureKind::Io => "Io",
            FailureKind::Arithmetic => "Arithmetic",
            FailureKind::Assertion => "Assertion",
            FailureKind::ExplicitFail => "ExplicitFail",
            FailureKind::Panic => "Panic",
            FailureKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for FailureKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// =============================================================================
// RAISED FAILURES
// =============================================================================

/// A matcher rejection, rendered the way hamcrest does:
///
/// ```text
/// Expected: <101>
///      but: was <100>
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    /// Optional human context supplied by the caller.
    pub reason: Option<String>,
    /// The matcher's own description.
    pub expected: String,
    /// Debug representation of the rejected value.
    pub actual: String,
    /// The matcher's description of what was wrong with the value.
    pub mismatch: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(reason) = &self.reason {
            writeln!(f, "{}", reason)?;
        }
        write!(f, "Expected: {}\n     but: {}", self.expected, self.mismatch)
    }
}

/// A failure raised by a case body or hook.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
#[error("{kind}: {message}")]
#[diagnostic(code(litmus::failure))]
pub struct Failure {
    kind: FailureKind,
    message: String,
    mismatch: Option<Box<Mismatch>>,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            mismatch: None,
        }
    }

    pub fn illegal_argument(message: impl Into<String>) -> Self {
        Self::new(FailureKind::IllegalArgument, message)
    }

    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::new(FailureKind::IllegalState, message)
    }

    /// Builds the failure raised by an assertion whose matcher rejected a value.
    pub fn assertion(mismatch: Mismatch) -> Self {
        Self {
            kind: FailureKind::Assertion,
            message: mismatch.to_string(),
            mismatch: Some(Box::new(mismatch)),
        }
    }

    pub fn explicit() -> Self {
        Self::new(FailureKind::ExplicitFail, EXPLICIT_FAILURE)
    }

    /// Converts a caught panic payload. Non-string payloads get a placeholder message.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "panicked with a non-string payload".to_string()
        };
        Self::new(FailureKind::Panic, message)
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn mismatch(&self) -> Option<&Mismatch> {
        self.mismatch.as_deref()
    }
}

/// Converts foreign errors into [`Failure`]s so case bodies can use `?` on them.
pub trait ResultExt<T> {
    fn fail_as(self, kind: FailureKind) -> Result<T, Failure>;
}

impl<T, E: std::error::Error> ResultExt<T> for Result<T, E> {
    fn fail_as(self, kind: FailureKind) -> Result<T, Failure> {
        self.map_err(|e| Failure::new(kind, e.to_string()))
    }
}

// =============================================================================
// REPORTED CASE ERRORS
// =============================================================================

/// Why a case did not pass.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum CaseError {
    /// A matcher rejected a value.
    #[error("{0}")]
    #[diagnostic(code(litmus::assertion_failure))]
    AssertionFailure(Mismatch),

    /// The body reached `fail()`.
    #[error("{message}")]
    #[diagnostic(code(litmus::explicit_failure))]
    ExplicitFailure { message: String },

    /// The body raised something no active expectation covers.
    #[error("body raised unexpected {kind}: {message}")]
    #[diagnostic(
        code(litmus::unexpected_failure),
        help("register the failure with `expect` if it is the intended outcome")
    )]
    UnexpectedFailure { kind: FailureKind, message: String },

    /// An expectation was registered but the outcome did not satisfy it.
    #[error("{reason}")]
    #[diagnostic(code(litmus::expectation_not_satisfied))]
    ExpectationNotSatisfied {
        expected: Option<FailureKind>,
        actual: Option<FailureKind>,
        reason: String,
    },

    #[error("{phase} hook failed with {kind}: {message}")]
    #[diagnostic(code(litmus::hook_failure))]
    HookFailure {
        phase: Phase,
        kind: FailureKind,
        message: String,
    },

    /// The case declares an expected kind and its body also populated the rule.
    #[error("case declares an expected failure and also registers one through the rule")]
    #[diagnostic(
        code(litmus::conflicting_expectations),
        help("use either the declarative expected kind or the rule, not both")
    )]
    ConflictingExpectations,

    /// A message matcher panicked while the outcome was being checked.
    #[error("expectation check panicked: {message}")]
    #[diagnostic(
        code(litmus::expectation_check_panicked),
        help("the matcher passed to `expect_message` must not panic")
    )]
    ExpectationCheckPanicked { message: String },

    #[error("run was cancelled before the case started")]
    #[diagnostic(code(litmus::cancelled))]
    Cancelled,
}

impl CaseError {
    /// Classifies a failure that escaped a body with no expectation registered.
    pub fn from_body_failure(failure: Failure) -> Self {
        let Failure {
            kind,
            message,
            mismatch,
        } = failure;
        match (kind, mismatch) {
            (FailureKind::Assertion, Some(mismatch)) => CaseError::AssertionFailure(*mismatch),
            (FailureKind::ExplicitFail, _) => CaseError::ExplicitFailure { message },
            (kind, _) => CaseError::UnexpectedFailure { kind, message },
        }
    }

    pub fn hook(phase: Phase, failure: Failure) -> Self {
        CaseError::HookFailure {
            phase,
            kind: failure.kind,
            message: failure.message,
        }
    }

    /// Errors are problems around the case rather than verdicts on its body.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            CaseError::HookFailure { .. }
                | CaseError::ConflictingExpectations
                | CaseError::ExpectationCheckPanicked { .. }
                | CaseError::Cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_renders_like_hamcrest() {
        let mismatch = Mismatch {
            reason: None,
            expected: "<101>".to_string(),
            actual: "100".to_string(),
            mismatch: "was <100>".to_string(),
        };
        assert_eq!(mismatch.to_string(), "Expected: <101>\n     but: was <100>");
    }

    #[test]
    fn test_mismatch_reason_comes_first() {
        let mismatch = Mismatch {
            reason: Some("totals must agree".to_string()),
            expected: "<1>".to_string(),
            actual: "2".to_string(),
            mismatch: "was <2>".to_string(),
        };
        assert!(mismatch.to_string().starts_with("totals must agree\nExpected: <1>"));
    }

    #[test]
    fn test_panic_payloads_become_messages() {
        let failure = Failure::from_panic(Box::new("boom"));
        assert_eq!(failure.kind(), FailureKind::Panic);
        assert_eq!(failure.message(), "boom");

        let failure = Failure::from_panic(Box::new(String::from("owned boom")));
        assert_eq!(failure.message(), "owned boom");

        let failure = Failure::from_panic(Box::new(42_u8));
        assert_eq!(failure.message(), "panicked with a non-string payload");
    }

    #[test]
    fn test_body_failures_are_classified_by_kind() {
        let explicit = CaseError::from_body_failure(Failure::explicit());
        assert_eq!(
            explicit,
            CaseError::ExplicitFailure {
                message: EXPLICIT_FAILURE.to_string()
            }
        );

        let other = CaseError::from_body_failure(Failure::illegal_state("closed"));
        assert_eq!(
            other,
            CaseError::UnexpectedFailure {
                kind: FailureKind::IllegalState,
                message: "closed".to_string()
            }
        );
        assert!(!other.is_error());
    }

    #[test]
    fn test_fail_as_wraps_foreign_errors() {
        let parsed: Result<i32, _> = "x1".parse::<i32>();
        let failure = parsed.fail_as(FailureKind::IllegalArgument).unwrap_err();
        assert_eq!(failure.kind(), FailureKind::IllegalArgument);
        assert!(failure.message().contains("invalid digit"));
    }

    #[test]
    fn test_custom_kinds_compare_by_name() {
        assert_eq!(FailureKind::Custom("Timeout"), FailureKind::Custom("Timeout"));
        assert_ne!(FailureKind::Custom("Timeout"), FailureKind::Io);
        assert_eq!(FailureKind::Custom("Timeout").to_string(), "Timeout");
    }
}
