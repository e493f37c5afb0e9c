//! The test runner.
//!
//! [`Runner::run`] makes one deterministic pass over a [`Suite`]: cases run
//! sequentially in registration order, every registered case ends up in the
//! [`RunResult`] exactly once, and nothing a hook or body does escapes `run`.
//!
//! ```
//! use litmus::prelude::*;
//!
//! let mut suite = Suite::new("arithmetic", 0_u32);
//! suite
//!     .before_each(|runs| {
//!         *runs += 1;
//!         Ok(())
//!     })
//!     .unwrap();
//! suite
//!     .case("adds", |_, _| assert_that(&(2 + 2), equal_to(4)))
//!     .unwrap();
//! suite
//!     .case_expecting("rejects", FailureKind::IllegalArgument, |_, _| {
//!         Err(Failure::illegal_argument("negative input"))
//!     })
//!     .unwrap();
//!
//! let result = run(&mut suite);
//! assert!(result.is_success());
//! assert_eq!(*suite.context(), 2);
//! ```

use tracing::{debug, info, warn};

use crate::config::{CancelToken, RunConfig};
use crate::diagnostics::{CaseError, Phase};
use crate::expectation::ExpectationRule;
use crate::report::{CaseResult, CaseStatus, RunResult, SuiteFailure};
use crate::scheduler::Scheduler;
use crate::suite::{Case, Suite};

#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: RunConfig,
    cancel: CancelToken,
}

impl Runner {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// A handle that aborts the run between cases.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    fn should_stop(&self, failures: usize) -> bool {
        self.cancel.is_cancelled() || self.config.failure_limit_reached(failures)
    }

    pub fn run<C>(&self, suite: &mut Suite<C>) -> RunResult {
        let Suite {
            name,
            context,
            cases,
            hooks,
        } = suite;
        let name = name.as_str();
        let mut result = RunResult::new(name);
        let mut scheduler = Scheduler::new(name);
        info!(suite = %name, cases = cases.len(), "suite started");

        if let Err(failure) = scheduler.suite_setup(hooks, context) {
            warn!(suite = %name, error = %failure, "beforeAll failed, skipping every case");
            result
                .suite_failures
                .push(SuiteFailure::new(Phase::BeforeAll, failure));
            return result;
        }

        let focused = cases.iter().any(Case::is_focused);
        let mut rule = ExpectationRule::none();
        let mut failures = 0;
        for case in cases.iter_mut() {
            let selected = !case.is_ignored()
                && (!focused || case.is_focused())
                && self.config.selects(case.id());
            if !selected {
                debug!(suite = %name, case = %case.id(), "case ignored");
                result
                    .cases
                    .push(CaseResult::new(case.id(), CaseStatus::Ignored, None));
                continue;
            }

            if self.should_stop(failures) {
                if !result.cancelled {
                    warn!(suite = %name, failures, "run stopped, remaining cases are skipped");
                    result.cancelled = true;
                }
                result.cases.push(CaseResult::new(
                    case.id(),
                    CaseStatus::Errored(CaseError::Cancelled),
                    None,
                ));
                continue;
            }

            let case_result = scheduler.run_case(hooks, case, context, &mut rule);
            if case_result.status.is_failure() {
                failures += 1;
            }
            result.cases.push(case_result);
        }

        if let Err(failure) = scheduler.suite_teardown(hooks, context) {
            warn!(suite = %name, error = %failure, "afterAll failed");
            result
                .suite_failures
                .push(SuiteFailure::new(Phase::AfterAll, failure));
        }

        let summary = result.summary();
        info!(
            suite = %name,
            passed = summary.passed,
            failed = summary.failed,
            ignored = summary.ignored,
            errored = summary.errored,
            "suite finished"
        );
        result
    }
}

/// Runs `suite` with the default configuration.
pub fn run<C>(suite: &mut Suite<C>) -> RunResult {
    Runner::default().run(suite)
}
