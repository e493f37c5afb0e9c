//! Lifecycle hook scheduling.
//!
//! A suite run walks this state machine:
//!
//! ```text
//! NotStarted -> SuiteSetup -> {CaseSetup -> CaseBody -> CaseTeardown}* -> SuiteTeardown -> Done
//! ```
//!
//! The [`Scheduler`] owns the per-case policy: `beforeEach` failures skip the
//! body and `afterEach`, `afterEach` always follows a successful `beforeEach`,
//! and teardown failures never mask an earlier body failure.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::assertion::Outcome;
use crate::diagnostics::{CaseError, Failure, Phase};
use crate::expectation::{reconcile, Expectation, ExpectationRule};
use crate::report::{CaseResult, CaseStatus};
use crate::suite::{Case, Hook, Hooks};

// =============================================================================
// SUITE STATE MACHINE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteState {
    NotStarted,
    SuiteSetup,
    CaseSetup,
    CaseBody,
    CaseTeardown,
    SuiteTeardown,
    Done,
}

impl SuiteState {
    pub fn can_transition_to(self, next: SuiteState) -> bool {
        use SuiteState::*;
        matches!(
            (self, next),
            (NotStarted, SuiteSetup)
                | (SuiteSetup, CaseSetup)
                | (SuiteSetup, SuiteTeardown)
                | (SuiteSetup, Done)
                | (CaseSetup, CaseBody)
                | (CaseSetup, CaseSetup)
                | (CaseSetup, SuiteTeardown)
                | (CaseBody, CaseTeardown)
                | (CaseTeardown, CaseSetup)
                | (CaseTeardown, SuiteTeardown)
                | (SuiteTeardown, Done)
        )
    }
}

// =============================================================================
// CASE EXECUTION
// =============================================================================

/// Runs `f`, turning a panic into a [`Failure`] of kind `Panic`.
pub(crate) fn guarded<F: FnOnce() -> Outcome>(f: F) -> Outcome {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(outcome) => outcome,
        Err(payload) => Err(Failure::from_panic(payload)),
    }
}

pub struct Scheduler<'s> {
    suite: &'s str,
    state: SuiteState,
}

impl<'s> Scheduler<'s> {
    pub fn new(suite: &'s str) -> Self {
        Self {
            suite,
            state: SuiteState::NotStarted,
        }
    }

    pub fn state(&self) -> SuiteState {
        self.state
    }

    fn transition(&mut self, next: SuiteState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal scheduler transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!(suite = %self.suite, from = ?self.state, to = ?next, "scheduler transition");
        self.state = next;
    }

    fn invoke<C>(&self, phase: Phase, hook: &mut Option<Hook<C>>, ctx: &mut C) -> Outcome {
        let Some(hook) = hook.as_mut() else {
            return Ok(());
        };
        debug!(suite = %self.suite, phase = %phase, "invoking hook");
        let outcome = guarded(|| hook(ctx));
        if let Err(failure) = &outcome {
            warn!(suite = %self.suite, phase = %phase, error = %failure, "hook failed");
        }
        outcome
    }

    /// Runs `beforeAll`. On failure the suite is finished: no cases, no `afterAll`.
    pub fn suite_setup<C>(&mut self, hooks: &mut Hooks<C>, ctx: &mut C) -> Outcome {
        self.transition(SuiteState::SuiteSetup);
        let outcome = self.invoke(Phase::BeforeAll, &mut hooks.before_all, ctx);
        if outcome.is_err() {
            self.transition(SuiteState::Done);
        }
        outcome
    }

    /// Runs one non-ignored case through setup, body and teardown.
    pub fn run_case<C>(
        &mut self,
        hooks: &mut Hooks<C>,
        case: &mut Case<C>,
        ctx: &mut C,
        rule: &mut ExpectationRule,
    ) -> CaseResult {
        let id = case.id().to_string();

        self.transition(SuiteState::CaseSetup);
        if let Err(failure) = self.invoke(Phase::BeforeEach, &mut hooks.before_each, ctx) {
            return CaseResult::new(
                id,
                CaseStatus::Errored(CaseError::hook(Phase::BeforeEach, failure)),
                Some(Phase::BeforeEach),
            );
        }

        self.transition(SuiteState::CaseBody);
        debug!(suite = %self.suite, case = %id, "running case body");
        rule.reset();
        let body = case.body_mut();
        let raised = guarded(|| body(ctx, rule));
        let registered = rule.take();
        let declared = case.expected_kind();
        // Message matchers are user code too.
        let verdict = panic::catch_unwind(AssertUnwindSafe(|| match (declared, registered) {
            (Some(_), Some(_)) => Err(CaseError::ConflictingExpectations),
            (Some(kind), None) => reconcile(Some(&Expectation::kind(kind)), raised),
            (None, registered) => reconcile(registered.as_ref(), raised),
        }))
        .unwrap_or_else(|payload| {
            let failure = Failure::from_panic(payload);
            warn!(suite = %self.suite, case = %id, error = %failure, "expectation check panicked");
            Err(CaseError::ExpectationCheckPanicked {
                message: failure.message().to_string(),
            })
        });

        self.transition(SuiteState::CaseTeardown);
        let teardown = self
            .invoke(Phase::AfterEach, &mut hooks.after_each, ctx)
            .map_err(|failure| CaseError::hook(Phase::AfterEach, failure));

        match (verdict, teardown) {
            (Ok(()), Ok(())) => CaseResult::new(id, CaseStatus::Passed, None),
            (Ok(()), Err(hook_error)) => {
                CaseResult::new(id, CaseStatus::Errored(hook_error), Some(Phase::AfterEach))
            }
            (Err(error), teardown) => {
                let status = if error.is_error() {
                    CaseStatus::Errored(error)
                } else {
                    CaseStatus::Failed(error)
                };
                let mut result = CaseResult::new(id, status, Some(Phase::Body));
                result.secondary = teardown.err();
                result
            }
        }
    }

    /// Runs `afterAll`. Callers only get here after a successful `beforeAll`.
    pub fn suite_teardown<C>(&mut self, hooks: &mut Hooks<C>, ctx: &mut C) -> Outcome {
        self.transition(SuiteState::SuiteTeardown);
        let outcome = self.invoke(Phase::AfterAll, &mut hooks.after_all, ctx);
        self.transition(SuiteState::Done);
        outcome
    }
}
