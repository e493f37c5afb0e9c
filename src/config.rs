//! Run configuration and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Knobs an embedding tool may set before a run. Every field has a default,
/// so partial documents deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Stop starting new cases after the first failed or errored one.
    pub fail_fast: bool,
    /// Stop starting new cases once this many have failed or errored.
    /// `Some(0)` means no limit, like `None`.
    pub max_failures: Option<usize>,
    /// Only run cases whose identifier contains this text. Others are recorded as ignored.
    pub filter: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            max_failures: None,
            filter: None,
        }
    }
}

impl RunConfig {
    pub fn fail_fast() -> Self {
        Self {
            fail_fast: true,
            ..Self::default()
        }
    }

    /// Whether `failures` failed or errored cases should stop the run.
    pub fn failure_limit_reached(&self, failures: usize) -> bool {
        let limit = self.max_failures.filter(|&max| max > 0);
        (self.fail_fast && failures > 0) || limit.map_or(false, |max| failures >= max)
    }

    pub fn selects(&self, id: &str) -> bool {
        self.filter.as_deref().map_or(true, |needle| id.contains(needle))
    }
}

/// Shared flag an external collaborator sets to abort a run between cases.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
