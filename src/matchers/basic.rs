use std::fmt::Debug;

use difference::{Changeset, Difference};

use super::{was, Matcher};

/// Value equality through `PartialEq`, so a `Vec<String>` can be compared
/// against `["0", "1"]` without converting either side.
#[derive(Debug, Clone)]
pub struct EqualTo<E> {
    expected: E,
}

pub fn equal_to<E>(expected: E) -> EqualTo<E> {
    EqualTo { expected }
}

impl<T, E> Matcher<T> for EqualTo<E>
where
    T: PartialEq<E> + Debug + ?Sized,
    E: Debug,
{
    fn matches(&self, actual: &T) -> bool {
        PartialEq::eq(actual, &self.expected)
    }

    fn describe(&self) -> String {
        format!("<{:?}>", self.expected)
    }

    fn describe_mismatch(&self, actual: &T) -> String {
        let mut text = was(actual);
        let expected = format!("{:#?}", self.expected);
        let found = format!("{:#?}", actual);
        if expected.contains('\n') || found.contains('\n') {
            let changeset = Changeset::new(&expected, &found, "\n");
            text.push_str("\ndiff (-expected +actual):");
            render_diff(&mut text, &changeset.diffs);
        }
        text
    }
}

fn render_diff(out: &mut String, diffs: &[Difference]) {
    for diff in diffs {
        let (marker, chunk) = match diff {
            Difference::Same(x) => (' ', x),
            Difference::Add(x) => ('+', x),
            Difference::Rem(x) => ('-', x),
        };
        for line in chunk.split('\n') {
            out.push('\n');
            out.push(marker);
            out.push_str(line);
        }
    }
}

/// Pure decoration for readability: `is(equal_to(3))` behaves like `equal_to(3)`.
#[derive(Debug, Clone)]
pub struct Is<M> {
    inner: M,
}

pub fn is<M>(inner: M) -> Is<M> {
    Is { inner }
}

impl<T: ?Sized, M: Matcher<T>> Matcher<T> for Is<M> {
    fn matches(&self, actual: &T) -> bool {
        self.inner.matches(actual)
    }

    fn describe(&self) -> String {
        format!("is {}", self.inner.describe())
    }

    fn describe_mismatch(&self, actual: &T) -> String {
        self.inner.describe_mismatch(actual)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Anything;

pub fn anything() -> Anything {
    Anything
}

impl<T: ?Sized> Matcher<T> for Anything {
    fn matches(&self, _actual: &T) -> bool {
        true
    }

    fn describe(&self) -> String {
        "anything".to_string()
    }

    fn describe_mismatch(&self, _actual: &T) -> String {
        String::new()
    }
}

/// Matches `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsNone;

pub fn is_none() -> IsNone {
    IsNone
}

impl<T: Debug> Matcher<Option<T>> for IsNone {
    fn matches(&self, actual: &Option<T>) -> bool {
        actual.is_none()
    }

    fn describe(&self) -> String {
        "none".to_string()
    }

    fn describe_mismatch(&self, actual: &Option<T>) -> String {
        was(actual)
    }
}

/// Matches `Some(v)` where `v` satisfies the inner matcher.
#[derive(Debug, Clone)]
pub struct SomeMatching<M> {
    inner: M,
}

pub fn some<M>(inner: M) -> SomeMatching<M> {
    SomeMatching { inner }
}

impl<T, M: Matcher<T>> Matcher<Option<T>> for SomeMatching<M> {
    fn matches(&self, actual: &Option<T>) -> bool {
        actual.as_ref().map_or(false, |v| self.inner.matches(v))
    }

    fn describe(&self) -> String {
        format!("some({})", self.inner.describe())
    }

    fn describe_mismatch(&self, actual: &Option<T>) -> String {
        match actual {
            Some(v) => self.inner.describe_mismatch(v),
            None => "was <None>".to_string(),
        }
    }
}

/// Logical complement of the inner matcher.
#[derive(Debug, Clone)]
pub struct Not<M> {
    inner: M,
}

pub fn not<M>(inner: M) -> Not<M> {
    Not { inner }
}

impl<T: Debug + ?Sized, M: Matcher<T>> Matcher<T> for Not<M> {
    fn matches(&self, actual: &T) -> bool {
        !self.inner.matches(actual)
    }

    fn describe(&self) -> String {
        format!("not {}", self.inner.describe())
    }

    // The inner matcher accepted the value, so its own mismatch text is empty
    // or misleading. Report what was found instead.
    fn describe_mismatch(&self, actual: &T) -> String {
        was(actual)
    }
}

#[derive(Debug, Clone)]
pub struct AllOf<A, B> {
    first: A,
    second: B,
}

pub fn all_of<A, B>(first: A, second: B) -> AllOf<A, B> {
    AllOf { first, second }
}

impl<T: ?Sized, A: Matcher<T>, B: Matcher<T>> Matcher<T> for AllOf<A, B> {
    fn matches(&self, actual: &T) -> bool {
        self.first.matches(actual) && self.second.matches(actual)
    }

    fn describe(&self) -> String {
        format!("({} and {})", self.first.describe(), self.second.describe())
    }

    fn describe_mismatch(&self, actual: &T) -> String {
        if !self.first.matches(actual) {
            format!(
                "{} {}",
                self.first.describe(),
                self.first.describe_mismatch(actual)
            )
        } else {
            format!(
                "{} {}",
                self.second.describe(),
                self.second.describe_mismatch(actual)
            )
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnyOf<A, B> {
    first: A,
    second: B,
}

pub fn any_of<A, B>(first: A, second: B) -> AnyOf<A, B> {
    AnyOf { first, second }
}

impl<T: Debug + ?Sized, A: Matcher<T>, B: Matcher<T>> Matcher<T> for AnyOf<A, B> {
    fn matches(&self, actual: &T) -> bool {
        self.first.matches(actual) || self.second.matches(actual)
    }

    fn describe(&self) -> String {
        format!("({} or {})", self.first.describe(), self.second.describe())
    }

    fn describe_mismatch(&self, actual: &T) -> String {
        was(actual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::MatcherExt;

    #[test]
    fn test_equal_to_matches_itself_and_negation_is_a_complement() {
        for v in [0, 1, -7, i32::MAX] {
            assert!(equal_to(v).matches(&v));
            assert!(!not(equal_to(v)).matches(&v));
        }
        assert!(equal_to("String").matches(&"String"));
        assert!(!not(equal_to("String")).matches(&"String"));
    }

    #[test]
    fn test_sequences_compare_independently_of_storage() {
        let owned: Vec<String> = (0..2).map(|i| i.to_string()).collect();
        assert!(equal_to(["0", "1"]).matches(&owned));
        assert!(equal_to(vec!["0", "1"]).matches(&owned));

        let raw = [1, 2];
        let boxed: Vec<i32> = vec![1, 2];
        assert!(equal_to(raw).matches(&boxed));
        assert!(equal_to(raw).matches(boxed.as_slice()));
        assert!(!equal_to([1, 2, 3]).matches(boxed.as_slice()));
        assert!(!equal_to([2, 1]).matches(&boxed));
    }

    #[test]
    fn test_equality_has_no_implicit_tolerance() {
        assert!(!equal_to(0.3).matches(&(0.1 + 0.2)));
    }

    #[test]
    fn test_equal_to_describes_like_hamcrest() {
        let m = equal_to(101);
        assert_eq!(Matcher::<i32>::describe(&m), "<101>");
        assert_eq!(m.describe_mismatch(&100), "was <100>");
    }

    #[test]
    fn test_multi_line_values_get_a_diff() {
        let m = equal_to(vec![1, 2, 3]);
        let text = m.describe_mismatch(&vec![1, 5, 3]);
        assert!(text.starts_with("was <[1, 5, 3]>"));
        assert!(text.contains("diff (-expected +actual):"));
        assert!(text.contains("\n-    2,"));
        assert!(text.contains("\n+    5,"));
    }

    #[test]
    fn test_none_and_not_none() {
        let missing: Option<String> = None;
        let present = Some("notNull".to_string());
        assert!(is_none().matches(&missing));
        assert!(not(is_none()).matches(&present));
        assert_eq!(
            not(is_none()).describe_mismatch(&missing),
            "was <None>"
        );
        assert_eq!(Matcher::<Option<i32>>::describe(&not(is_none())), "not none");
    }

    #[test]
    fn test_some_delegates_to_the_inner_matcher() {
        let m = some(equal_to(3));
        assert!(m.matches(&Some(3)));
        assert!(!m.matches(&Some(4)));
        assert_eq!(m.describe_mismatch(&Some(4)), "was <4>");
        assert_eq!(m.describe_mismatch(&None::<i32>), "was <None>");
    }

    #[test]
    fn test_is_only_decorates() {
        let m = is(equal_to("string is equal to"));
        assert!(m.matches(&"string is equal to"));
        assert_eq!(Matcher::<&str>::describe(&m), "is <\"string is equal to\">");
    }

    #[test]
    fn test_conjunction_reports_the_first_failing_side() {
        let m = equal_to(1).or(equal_to(2));
        assert!(m.matches(&2));
        assert!(!m.matches(&3));
        assert_eq!(Matcher::<i32>::describe(&m), "(<1> or <2>)");

        let m = not(equal_to(1)).and(not(equal_to(2)));
        assert!(m.matches(&3));
        assert_eq!(m.describe_mismatch(&2), "not <2> was <2>");
    }

    #[test]
    fn test_anything_matches_everything() {
        assert!(anything().matches(&()));
        assert!(anything().matches("text"));
    }
}
