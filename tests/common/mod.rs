//! # Shared fixtures for the integration tests
//!
//! An instrumented suite whose hooks count their invocations and record an
//! event log, with switches for making individual hooks fail.

#![allow(dead_code)]

use litmus::prelude::*;
use tracing_subscriber::EnvFilter;

/// Routes runner logs through the test harness. Set `RUST_LOG=litmus=debug` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Default)]
pub struct Fixture {
    pub events: Vec<String>,
    pub before_all: usize,
    pub after_all: usize,
    pub before_each: usize,
    pub after_each: usize,
}

impl Fixture {
    pub fn record(&mut self, event: impl Into<String>) {
        self.events.push(event.into());
    }
}

/// Which hooks should fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct Plan {
    pub fail_before_all: bool,
    /// Fail the n-th (1-based) `beforeEach` invocation.
    pub fail_before_each_on: Option<usize>,
    pub fail_after_each: bool,
    pub fail_after_all: bool,
}

pub fn instrumented(name: &str, plan: Plan) -> Suite<Fixture> {
    init_tracing();
    let mut suite = Suite::new(name, Fixture::default());
    suite
        .before_all(move |f| {
            f.before_all += 1;
            f.record("beforeAll");
            if plan.fail_before_all {
                return Err(Failure::illegal_state("database unreachable"));
            }
            Ok(())
        })
        .unwrap();
    suite
        .before_each(move |f| {
            f.before_each += 1;
            f.record("beforeEach");
            if plan.fail_before_each_on == Some(f.before_each) {
                return Err(Failure::illegal_state("fixture unavailable"));
            }
            Ok(())
        })
        .unwrap();
    suite
        .after_each(move |f| {
            f.after_each += 1;
            f.record("afterEach");
            if plan.fail_after_each {
                return Err(Failure::new(FailureKind::Io, "could not remove temp dir"));
            }
            Ok(())
        })
        .unwrap();
    suite
        .after_all(move |f| {
            f.after_all += 1;
            f.record("afterAll");
            if plan.fail_after_all {
                return Err(Failure::new(FailureKind::Io, "could not close pool"));
            }
            Ok(())
        })
        .unwrap();
    suite
}

/// A body that records `body:<id>` and passes.
pub fn recording(id: &'static str) -> impl FnMut(&mut Fixture, &mut ExpectationRule) -> Outcome {
    move |f, _| {
        f.record(format!("body:{}", id));
        Ok(())
    }
}

pub fn statuses(result: &RunResult) -> Vec<(&str, &CaseStatus)> {
    result
        .cases
        .iter()
        .map(|c| (c.id.as_str(), &c.status))
        .collect()
}
