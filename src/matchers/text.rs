use std::fmt::Debug;

use regex::Regex;

use super::{was, Matcher, MatcherError};

#[derive(Debug, Clone)]
pub struct StartsWith {
    prefix: String,
}

pub fn starts_with(prefix: impl Into<String>) -> StartsWith {
    StartsWith {
        prefix: prefix.into(),
    }
}

impl<T: AsRef<str> + ?Sized> Matcher<T> for StartsWith {
    fn matches(&self, actual: &T) -> bool {
        actual.as_ref().starts_with(&self.prefix)
    }

    fn describe(&self) -> String {
        format!("a string starting with {:?}", self.prefix)
    }

    fn describe_mismatch(&self, actual: &T) -> String {
        was(actual.as_ref())
    }
}

#[derive(Debug, Clone)]
pub struct EndsWith {
    suffix: String,
}

pub fn ends_with(suffix: impl Into<String>) -> EndsWith {
    EndsWith {
        suffix: suffix.into(),
    }
}

impl<T: AsRef<str> + ?Sized> Matcher<T> for EndsWith {
    fn matches(&self, actual: &T) -> bool {
        actual.as_ref().ends_with(&self.suffix)
    }

    fn describe(&self) -> String {
        format!("a string ending with {:?}", self.suffix)
    }

    fn describe_mismatch(&self, actual: &T) -> String {
        was(actual.as_ref())
    }
}

#[derive(Debug, Clone)]
pub struct ContainsString {
    needle: String,
}

pub fn contains_string(needle: impl Into<String>) -> ContainsString {
    ContainsString {
        needle: needle.into(),
    }
}

impl<T: AsRef<str> + ?Sized> Matcher<T> for ContainsString {
    fn matches(&self, actual: &T) -> bool {
        actual.as_ref().contains(&self.needle)
    }

    fn describe(&self) -> String {
        format!("a string containing {:?}", self.needle)
    }

    fn describe_mismatch(&self, actual: &T) -> String {
        was(actual.as_ref())
    }
}

#[derive(Debug, Clone)]
pub struct EqualToIgnoringCase {
    expected: String,
}

pub fn equal_to_ignoring_case(expected: impl Into<String>) -> EqualToIgnoringCase {
    EqualToIgnoringCase {
        expected: expected.into(),
    }
}

impl<T: AsRef<str> + ?Sized> Matcher<T> for EqualToIgnoringCase {
    fn matches(&self, actual: &T) -> bool {
        actual.as_ref().to_lowercase() == self.expected.to_lowercase()
    }

    fn describe(&self) -> String {
        format!("{:?} ignoring case", self.expected)
    }

    fn describe_mismatch(&self, actual: &T) -> String {
        was(actual.as_ref())
    }
}

/// Matches when the regex finds a match anywhere in the string.
#[derive(Debug, Clone)]
pub struct MatchesPattern {
    pattern: Regex,
}

pub fn matches_pattern(pattern: &str) -> Result<MatchesPattern, MatcherError> {
    let compiled = Regex::new(pattern).map_err(|source| MatcherError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    Ok(MatchesPattern { pattern: compiled })
}

impl<T: AsRef<str> + ?Sized> Matcher<T> for MatchesPattern {
    fn matches(&self, actual: &T) -> bool {
        self.pattern.is_match(actual.as_ref())
    }

    fn describe(&self) -> String {
        format!("a string matching /{}/", self.pattern.as_str())
    }

    fn describe_mismatch(&self, actual: &T) -> String {
        was(actual.as_ref())
    }
}

/// Prefix test over sequences rather than strings.
#[derive(Debug, Clone)]
pub struct StartsWithElements<E> {
    prefix: Vec<E>,
}

pub fn starts_with_elements<E>(prefix: impl IntoIterator<Item = E>) -> StartsWithElements<E> {
    StartsWithElements {
        prefix: prefix.into_iter().collect(),
    }
}

impl<E: Debug> StartsWithElements<E> {
    fn matches_slice<T: PartialEq<E>>(&self, actual: &[T]) -> bool {
        actual.len() >= self.prefix.len()
            && actual.iter().zip(&self.prefix).all(|(a, e)| a == e)
    }

    fn describe_prefix(&self) -> String {
        format!("a sequence starting with {:?}", self.prefix)
    }
}

impl<T: PartialEq<E> + Debug, E: Debug> Matcher<[T]> for StartsWithElements<E> {
    fn matches(&self, actual: &[T]) -> bool {
        self.matches_slice(actual)
    }

    fn describe(&self) -> String {
        self.describe_prefix()
    }

    fn describe_mismatch(&self, actual: &[T]) -> String {
        was(actual)
    }
}

impl<T: PartialEq<E> + Debug, E: Debug> Matcher<Vec<T>> for StartsWithElements<E> {
    fn matches(&self, actual: &Vec<T>) -> bool {
        self.matches_slice(actual.as_slice())
    }

    fn describe(&self) -> String {
        self.describe_prefix()
    }

    fn describe_mismatch(&self, actual: &Vec<T>) -> String {
        was(actual)
    }
}
