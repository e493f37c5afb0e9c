//! Cases, hooks and the suite that owns them.
//!
//! Case discovery is somebody else's job. Whatever finds the test functions
//! registers them here in a stable order, together with at most one body for
//! each lifecycle hook, and then hands the suite to the
//! [`Runner`](crate::runner::Runner).
//!
//! Hooks and case bodies receive the suite's context by `&mut` instead of
//! sharing process-wide state.

use miette::Diagnostic;
use thiserror::Error;

use crate::assertion::Outcome;
use crate::diagnostics::{FailureKind, Phase};
use crate::expectation::ExpectationRule;

/// A lifecycle hook over the suite context.
pub type Hook<C> = Box<dyn FnMut(&mut C) -> Outcome>;

/// A case body. The rule is reset before every invocation.
pub type Body<C> = Box<dyn FnMut(&mut C, &mut ExpectationRule) -> Outcome>;

#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("case `{id}` is already registered in suite `{suite}`")]
    #[diagnostic(code(litmus::duplicate_case))]
    DuplicateCase { suite: String, id: String },

    #[error("suite `{suite}` already has a {phase} hook")]
    #[diagnostic(
        code(litmus::duplicate_hook),
        help("each suite takes at most one hook per lifecycle slot")
    )]
    DuplicateHook { suite: String, phase: Phase },
}

// =============================================================================
// CASES
// =============================================================================

/// One independent unit of test logic.
pub struct Case<C> {
    id: String,
    body: Body<C>,
    ignored: bool,
    focused: bool,
    expected: Option<FailureKind>,
}

impl<C> Case<C> {
    pub fn new<F>(id: impl Into<String>, body: F) -> Self
    where
        F: FnMut(&mut C, &mut ExpectationRule) -> Outcome + 'static,
    {
        Self {
            id: id.into(),
            body: Box::new(body),
            ignored: false,
            focused: false,
            expected: None,
        }
    }

    /// Skips the case entirely, hooks included.
    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// When any case in a suite is focused, only focused cases run.
    pub fn focused(mut self) -> Self {
        self.focused = true;
        self
    }

    /// Declares that the body must raise `kind`.
    pub fn expecting(mut self, kind: FailureKind) -> Self {
        self.expected = Some(kind);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn expected_kind(&self) -> Option<FailureKind> {
        self.expected
    }

    pub(crate) fn body_mut(&mut self) -> &mut Body<C> {
        &mut self.body
    }
}

impl<C> std::fmt::Debug for Case<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Case")
            .field("id", &self.id)
            .field("ignored", &self.ignored)
            .field("focused", &self.focused)
            .field("expected", &self.expected)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// HOOKS
// =============================================================================

/// The four hook slots of a suite.
pub struct Hooks<C> {
    pub(crate) before_all: Option<Hook<C>>,
    pub(crate) after_all: Option<Hook<C>>,
    pub(crate) before_each: Option<Hook<C>>,
    pub(crate) after_each: Option<Hook<C>>,
}

impl<C> Default for Hooks<C> {
    fn default() -> Self {
        Self {
            before_all: None,
            after_all: None,
            before_each: None,
            after_each: None,
        }
    }
}

impl<C> Hooks<C> {
    fn slot(&mut self, phase: Phase) -> Option<&mut Option<Hook<C>>> {
        match phase {
            Phase::BeforeAll => Some(&mut self.before_all),
            Phase::AfterAll => Some(&mut self.after_all),
            Phase::BeforeEach => Some(&mut self.before_each),
            Phase::AfterEach => Some(&mut self.after_each),
            Phase::Body => None,
        }
    }
}

// =============================================================================
// SUITES
// =============================================================================

/// An ordered collection of cases plus shared hooks and context.
pub struct Suite<C = ()> {
    pub(crate) name: String,
    pub(crate) context: C,
    pub(crate) cases: Vec<Case<C>>,
    pub(crate) hooks: Hooks<C>,
}

impl<C> Suite<C> {
    pub fn new(name: impl Into<String>, context: C) -> Self {
        Self {
            name: name.into(),
            context,
            cases: Vec::new(),
            hooks: Hooks::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    pub fn cases(&self) -> &[Case<C>] {
        &self.cases
    }

    /// Registers a case. Identifiers must be unique within the suite.
    pub fn add_case(&mut self, case: Case<C>) -> Result<&mut Self, RegistrationError> {
        if self.cases.iter().any(|c| c.id == case.id) {
            return Err(RegistrationError::DuplicateCase {
                suite: self.name.clone(),
                id: case.id,
            });
        }
        self.cases.push(case);
        Ok(self)
    }

    pub fn case<F>(&mut self, id: impl Into<String>, body: F) -> Result<&mut Self, RegistrationError>
    where
        F: FnMut(&mut C, &mut ExpectationRule) -> Outcome + 'static,
    {
        self.add_case(Case::new(id, body))
    }

    pub fn ignore<F>(&mut self, id: impl Into<String>, body: F) -> Result<&mut Self, RegistrationError>
    where
        F: FnMut(&mut C, &mut ExpectationRule) -> Outcome + 'static,
    {
        self.add_case(Case::new(id, body).ignored())
    }

    pub fn case_expecting<F>(
        &mut self,
        id: impl Into<String>,
        kind: FailureKind,
        body: F,
    ) -> Result<&mut Self, RegistrationError>
    where
        F: FnMut(&mut C, &mut ExpectationRule) -> Outcome + 'static,
    {
        self.add_case(Case::new(id, body).expecting(kind))
    }

    pub fn before_all<F>(&mut self, hook: F) -> Result<&mut Self, RegistrationError>
    where
        F: FnMut(&mut C) -> Outcome + 'static,
    {
        self.set_hook(Phase::BeforeAll, Box::new(hook))
    }

    pub fn after_all<F>(&mut self, hook: F) -> Result<&mut Self, RegistrationError>
    where
        F: FnMut(&mut C) -> Outcome + 'static,
    {
        self.set_hook(Phase::AfterAll, Box::new(hook))
    }

    pub fn before_each<F>(&mut self, hook: F) -> Result<&mut Self, RegistrationError>
    where
        F: FnMut(&mut C) -> Outcome + 'static,
    {
        self.set_hook(Phase::BeforeEach, Box::new(hook))
    }

    pub fn after_each<F>(&mut self, hook: F) -> Result<&mut Self, RegistrationError>
    where
        F: FnMut(&mut C) -> Outcome + 'static,
    {
        self.set_hook(Phase::AfterEach, Box::new(hook))
    }

    fn set_hook(&mut self, phase: Phase, hook: Hook<C>) -> Result<&mut Self, RegistrationError> {
        match self.hooks.slot(phase) {
            Some(slot) if slot.is_none() => *slot = Some(hook),
            _ => {
                return Err(RegistrationError::DuplicateHook {
                    suite: self.name.clone(),
                    phase,
                })
            }
        }
        Ok(self)
    }
}

impl<C> std::fmt::Debug for Suite<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("cases", &self.cases)
            .finish_non_exhaustive()
    }
}
