//! # Litmus
//!
//! A small, embeddable unit-test execution engine: lifecycle hook scheduling,
//! per-case failure expectations and a composable matcher library.
//!
//! Discovery, report rendering and exit codes belong to the embedding tool.
//! It registers cases and hooks on a [`Suite`], calls [`run`] and reads
//! the [`RunResult`].

pub use crate::assertion::{assert_that, assert_that_because, assert_true, fail, fail_with, Outcome};
pub use crate::config::{CancelToken, RunConfig};
pub use crate::diagnostics::{CaseError, Failure, FailureKind, Mismatch, Phase, ResultExt};
pub use crate::expectation::ExpectationRule;
pub use crate::report::{CaseResult, CaseStatus, RunResult, Summary, SuiteFailure};
pub use crate::runner::{run, Runner};
pub use crate::suite::{Case, RegistrationError, Suite};

pub mod assertion;
pub mod config;
pub mod diagnostics;
pub mod expectation;
pub mod matchers;
pub mod report;
pub mod runner;
pub mod scheduler;
pub mod suite;

/// Everything a test file usually needs.
pub mod prelude {
    pub use crate::assertion::{
        assert_that, assert_that_because, assert_true, fail, fail_with, Outcome,
    };
    pub use crate::diagnostics::{Failure, FailureKind, ResultExt};
    pub use crate::expectation::ExpectationRule;
    pub use crate::matchers::*;
    pub use crate::report::{CaseStatus, RunResult};
    pub use crate::runner::{run, Runner};
    pub use crate::suite::{Case, Suite};
    pub use crate::{Phase, RunConfig};
}
