//! Clause types for query predicates.
//!
//! A [`Clause`] is a single filter predicate: a field name, an operator, and
//! a comparison value. The engine compiles every active FilterState field into
//! one or more clauses; the statistics reducer reuses the same clauses for its
//! boolean counts.

use crate::op::Op;
use crate::value::{Number, Timestamp, Value};

/// A single filter predicate.
///
/// ```
/// use marquee_query::{Clause, Op, Value};
///
/// let clause = Clause::new("email", Op::IContains, "EXAMPLE.org");
/// assert!(clause.matches(&Value::String("ada@example.org")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    /// The field name to compare.
    pub field: String,
    /// The comparison operator.
    pub op: Op,
    /// The value to compare against.
    pub value: ClauseValue,
}

impl Clause {
    /// Creates a new clause.
    ///
    /// `IContains` patterns are folded to lowercase once here, not per entity.
    pub fn new(field: impl Into<String>, op: Op, value: impl Into<ClauseValue>) -> Self {
        let mut value = value.into();
        if op == Op::IContains {
            if let ClauseValue::String(pattern) = &mut value {
                *pattern = pattern.to_lowercase();
            }
        }
        Clause {
            field: field.into(),
            op,
            value,
        }
    }

    /// Creates a clause matching entities where `field` is absent.
    pub fn is_none(field: impl Into<String>) -> Self {
        Clause::new(field, Op::IsNone, ClauseValue::Absent)
    }

    /// Evaluates this clause against a field value.
    ///
    /// Absent values only satisfy `IsNone`. Type mismatches and operators
    /// that do not apply to the value's kind never match.
    pub fn matches(&self, field_value: &Value<'_>) -> bool {
        match (&self.value, field_value) {
            (ClauseValue::Absent, value) => self.op == Op::IsNone && value.is_none(),

            // A missing field never satisfies a positive assertion
            (_, Value::None) => false,

            (ClauseValue::String(pattern), Value::String(s) | Value::Tag(s))
                if self.op.is_text_op() =>
            {
                self.match_text(s, pattern)
            }

            (ClauseValue::Set(set), Value::String(s) | Value::Tag(s)) => {
                self.op == Op::In && set.iter().any(|candidate| candidate == s)
            }

            (ClauseValue::Number(clause_num), Value::Number(field_num))
                if self.op.is_ordered_op() =>
            {
                field_num
                    .compare(*clause_num)
                    .is_some_and(|ordering| self.op.eval_ordering(ordering))
            }

            (ClauseValue::Timestamp(clause_ts), Value::Timestamp(field_ts))
                if self.op.is_ordered_op() =>
            {
                self.op.eval_ordering(field_ts.cmp(clause_ts))
            }

            (ClauseValue::Bool(clause_bool), Value::Bool(field_bool)) if self.op.is_bool_op() => {
                if self.op.normalize() == Op::Ne {
                    field_bool != clause_bool
                } else {
                    field_bool == clause_bool
                }
            }

            _ => false,
        }
    }

    fn match_text(&self, field: &str, pattern: &str) -> bool {
        match self.op.normalize() {
            Op::Eq => field == pattern,
            Op::Ne => field != pattern,
            Op::StartsWith => field.starts_with(pattern),
            Op::EndsWith => field.ends_with(pattern),
            Op::Contains => field.contains(pattern),
            Op::IContains => field.to_lowercase().contains(pattern),
            _ => false,
        }
    }
}

/// Owned value stored in a clause.
#[derive(Debug, Clone, PartialEq)]
pub enum ClauseValue {
    /// Text value (matches `String` and `Tag` fields).
    String(String),
    /// Set of text values (for `In`).
    Set(Vec<String>),
    /// Numeric value.
    Number(Number),
    /// Timestamp value.
    Timestamp(Timestamp),
    /// Boolean value.
    Bool(bool),
    /// No value; used with `IsNone`.
    Absent,
}

impl From<String> for ClauseValue {
    fn from(s: String) -> Self {
        ClauseValue::String(s)
    }
}

impl From<&str> for ClauseValue {
    fn from(s: &str) -> Self {
        ClauseValue::String(s.to_string())
    }
}

impl From<Vec<String>> for ClauseValue {
    fn from(set: Vec<String>) -> Self {
        ClauseValue::Set(set)
    }
}

impl From<Number> for ClauseValue {
    fn from(n: Number) -> Self {
        ClauseValue::Number(n)
    }
}

impl From<Timestamp> for ClauseValue {
    fn from(t: Timestamp) -> Self {
        ClauseValue::Timestamp(t)
    }
}

impl From<bool> for ClauseValue {
    fn from(b: bool) -> Self {
        ClauseValue::Bool(b)
    }
}

macro_rules! clause_number_from {
    ($($source:ty),*) => {
        $(
            impl From<$source> for ClauseValue {
                fn from(n: $source) -> Self {
                    ClauseValue::Number(Number::from(n))
                }
            }
        )*
    };
}

clause_number_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);
