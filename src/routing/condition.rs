use super::FieldValue;
use crate::graph::Condition;

impl Condition {
    /// Whether this predicate holds for the given field value.
    ///
    /// String predicates are case-sensitive. Numeric predicates parse both
    /// sides as `f64`; a side that fails to parse makes the predicate false
    /// rather than faulting, so a mistyped comparison value falls through to
    /// the next branch. `Between` is inclusive on both ends.
    pub fn matches(&self, value: &FieldValue) -> bool {
        match self {
            Condition::Equals { value: expected } => equals(value, expected),
            Condition::Contains { value: needle } => match value {
                // Membership for multiselect: "a" must not match a
                // selection of "ab".
                FieldValue::Selection(options) => options.iter().any(|o| o == needle),
                other => other.to_string().contains(needle.as_str()),
            },
            Condition::StartsWith { value: prefix } => {
                value.to_string().starts_with(prefix.as_str())
            }
            Condition::EndsWith { value: suffix } => value.to_string().ends_with(suffix.as_str()),
            Condition::GreaterThan { value: bound } => numeric(value, bound, |a, b| a > b),
            Condition::LessThan { value: bound } => numeric(value, bound, |a, b| a < b),
            Condition::GreaterOrEqual { value: bound } => numeric(value, bound, |a, b| a >= b),
            Condition::LessOrEqual { value: bound } => numeric(value, bound, |a, b| a <= b),
            Condition::Between { low, high } => match (value.as_number(), parse(low), parse(high))
            {
                (Some(n), Some(lo), Some(hi)) => lo <= n && n <= hi,
                _ => false,
            },
            Condition::IsEmpty => value.is_empty(),
            Condition::IsNotEmpty => !value.is_empty(),
            Condition::IsChecked => matches!(value, FieldValue::Bool(true)),
            Condition::IsNotChecked => !matches!(value, FieldValue::Bool(true)),
        }
    }
}

/// Equality compares numerically when both sides parse as numbers, so "10"
/// matches "10.0" on a number field, and falls back to exact string
/// comparison otherwise. A multiselect equals its expected value only when
/// exactly that one option is selected.
fn equals(value: &FieldValue, expected: &str) -> bool {
    match value {
        FieldValue::Selection(options) => options.len() == 1 && options[0] == expected,
        other => match (other.as_number(), parse(expected)) {
            (Some(a), Some(b)) => a == b,
            _ => other.to_string() == expected,
        },
    }
}

fn numeric(value: &FieldValue, bound: &str, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (value.as_number(), parse(bound)) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

fn parse(raw: &str) -> Option<f64> {
    raw.trim().parse().ok()
}
