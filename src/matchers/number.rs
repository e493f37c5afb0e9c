use std::fmt::Debug;

use super::{was, Matcher, MatcherError};

/// Matches numbers within `tolerance` of `target`, inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloseTo {
    target: f64,
    tolerance: f64,
}

/// Fails for a negative or NaN tolerance; there is no per-assertion check after construction.
pub fn close_to(target: f64, tolerance: f64) -> Result<CloseTo, MatcherError> {
    if !(tolerance >= 0.0) {
        return Err(MatcherError::InvalidTolerance { tolerance });
    }
    Ok(CloseTo { target, tolerance })
}

impl CloseTo {
    fn deviation(&self, actual: f64) -> f64 {
        (actual - self.target).abs()
    }
}

impl<T: Copy + Into<f64> + Debug> Matcher<T> for CloseTo {
    // Compared against the bounds so that `target + tolerance` rounds the
    // same way here as it does for the caller.
    fn matches(&self, actual: &T) -> bool {
        let actual: f64 = (*actual).into();
        self.target - self.tolerance <= actual && actual <= self.target + self.tolerance
    }

    fn describe(&self) -> String {
        format!(
            "a numeric value within <{:?}> of <{:?}>",
            self.tolerance, self.target
        )
    }

    fn describe_mismatch(&self, actual: &T) -> String {
        let excess = self.deviation((*actual).into()) - self.tolerance;
        format!(
            "<{:?}> differed by <{:?}> more than delta <{:?}>",
            actual, excess, self.tolerance
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Above,
    Below,
}

/// Strict ordering against a bound, through `PartialOrd`.
#[derive(Debug, Clone)]
pub struct OrderingComparison<E> {
    bound: E,
    direction: Bound,
}

pub fn greater_than<E>(bound: E) -> OrderingComparison<E> {
    OrderingComparison {
        bound,
        direction: Bound::Above,
    }
}

pub fn less_than<E>(bound: E) -> OrderingComparison<E> {
    OrderingComparison {
        bound,
        direction: Bound::Below,
    }
}

impl<T: PartialOrd<E> + Debug + ?Sized, E: Debug> Matcher<T> for OrderingComparison<E> {
    fn matches(&self, actual: &T) -> bool {
        match self.direction {
            Bound::Above => actual > &self.bound,
            Bound::Below => actual < &self.bound,
        }
    }

    fn describe(&self) -> String {
        match self.direction {
            Bound::Above => format!("a value greater than <{:?}>", self.bound),
            Bound::Below => format!("a value less than <{:?}>", self.bound),
        }
    }

    fn describe_mismatch(&self, actual: &T) -> String {
        was(actual)
    }
}
