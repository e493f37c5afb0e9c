//! What a run hands to reporters.
//!
//! Everything here derives `Serialize`; [`RunResult::to_json`] is the
//! machine-readable hand-off to whatever renders the report.

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::diagnostics::{CaseError, Failure, FailureKind, Phase};

// =============================================================================
// CASE RESULTS
// =============================================================================

/// Terminal status of one case.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum CaseStatus {
    Passed,
    Failed(CaseError),
    Ignored,
    Errored(CaseError),
}

impl CaseStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, CaseStatus::Failed(_) | CaseStatus::Errored(_))
    }

    pub fn reason(&self) -> Option<&CaseError> {
        match self {
            CaseStatus::Failed(reason) | CaseStatus::Errored(reason) => Some(reason),
            CaseStatus::Passed | CaseStatus::Ignored => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseResult {
    pub id: String,
    #[serde(flatten)]
    pub status: CaseStatus,
    /// Lifecycle phase the failure belongs to, if any.
    pub phase: Option<Phase>,
    /// An `afterEach` failure that followed an already failed body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<CaseError>,
}

impl CaseResult {
    pub fn new(id: impl Into<String>, status: CaseStatus, phase: Option<Phase>) -> Self {
        Self {
            id: id.into(),
            status,
            phase,
            secondary: None,
        }
    }
}

// =============================================================================
// RUN RESULTS
// =============================================================================

/// A hook failure at suite scope: a fatal `beforeAll` or a failed `afterAll`.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic, Serialize)]
#[error("{phase} hook failed with {kind}: {message}")]
#[diagnostic(code(litmus::suite_hook_failure))]
pub struct SuiteFailure {
    pub phase: Phase,
    pub kind: FailureKind,
    pub message: String,
}

impl SuiteFailure {
    pub fn new(phase: Phase, failure: Failure) -> Self {
        Self {
            phase,
            kind: failure.kind(),
            message: failure.message().to_string(),
        }
    }
}

/// Aggregate counts for reporters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub ignored: usize,
    pub errored: usize,
}

impl Summary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.errored > 0
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.ignored + self.errored
    }

    /// Percentage of executed (non-ignored) cases that passed.
    pub fn success_rate(&self) -> f64 {
        let executed = self.passed + self.failed + self.errored;
        if executed == 0 {
            return 0.0;
        }
        (self.passed as f64 / executed as f64) * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    pub suite: String,
    pub cases: Vec<CaseResult>,
    pub suite_failures: Vec<SuiteFailure>,
    /// Set when cancellation or a failure limit stopped the run early.
    pub cancelled: bool,
}

impl RunResult {
    pub(crate) fn new(suite: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            cases: Vec::new(),
            suite_failures: Vec::new(),
            cancelled: false,
        }
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for case in &self.cases {
            match case.status {
                CaseStatus::Passed => summary.passed += 1,
                CaseStatus::Failed(_) => summary.failed += 1,
                CaseStatus::Ignored => summary.ignored += 1,
                CaseStatus::Errored(_) => summary.errored += 1,
            }
        }
        summary
    }

    pub fn is_success(&self) -> bool {
        !self.summary().has_failures() && self.suite_failures.is_empty()
    }

    pub fn case(&self, id: &str) -> Option<&CaseResult> {
        self.cases.iter().find(|c| c.id == id)
    }

    /// True when `beforeAll` failed and no case ran.
    pub fn setup_failed(&self) -> bool {
        self.suite_failures
            .iter()
            .any(|f| f.phase == Phase::BeforeAll)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
