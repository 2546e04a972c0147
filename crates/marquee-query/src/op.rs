//! Comparison operators for query clauses.

use std::cmp::Ordering;

/// Comparison operator for a query clause.
///
/// - **Universal**: `Eq`, `Ne`
/// - **Text** (strings and tags): `StartsWith`, `EndsWith`, `Contains`, `IContains`, `In`
/// - **Ordered** (numbers and timestamps): `Gt`, `Gte`, `Lt`, `Lte`
/// - **Timestamp aliases**: `Before` (`Lt`), `After` (`Gt`)
/// - **Bool alias**: `Is` (`Eq`)
/// - **Presence**: `IsNone` matches only absent values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Equal (exact match).
    Eq,
    /// Not equal.
    Ne,

    /// Text starts with prefix.
    StartsWith,
    /// Text ends with suffix.
    EndsWith,
    /// Text contains substring (case sensitive).
    Contains,
    /// Text contains substring, ignoring case.
    IContains,
    /// Text is one of the given set.
    In,

    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,

    /// Earlier than (alias for `Lt` on timestamps).
    Before,
    /// Later than (alias for `Gt` on timestamps).
    After,

    /// Alias for `Eq` (reads naturally: `isActive.is(true)`).
    Is,

    /// Field is absent.
    IsNone,
}

impl Op {
    /// Returns `true` if this operator applies to string and tag values.
    pub fn is_text_op(self) -> bool {
        matches!(
            self,
            Op::Eq | Op::Ne | Op::StartsWith | Op::EndsWith | Op::Contains | Op::IContains | Op::In
        )
    }

    /// Returns `true` if this operator applies to numbers and timestamps.
    pub fn is_ordered_op(self) -> bool {
        matches!(
            self.normalize(),
            Op::Eq | Op::Ne | Op::Gt | Op::Gte | Op::Lt | Op::Lte
        )
    }

    /// Returns `true` if this operator applies to booleans.
    pub fn is_bool_op(self) -> bool {
        matches!(self, Op::Eq | Op::Ne | Op::Is)
    }

    /// Normalizes aliases: `Before` -> `Lt`, `After` -> `Gt`, `Is` -> `Eq`.
    pub fn normalize(self) -> Op {
        match self {
            Op::Before => Op::Lt,
            Op::After => Op::Gt,
            Op::Is => Op::Eq,
            other => other,
        }
    }

    /// Evaluates an ordering-based operator against a comparison result.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self.normalize() {
            Op::Eq => ordering == Ordering::Equal,
            Op::Ne => ordering != Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the display name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Ne => "ne",
            Op::StartsWith => "startswith",
            Op::EndsWith => "endswith",
            Op::Contains => "contains",
            Op::IContains => "icontains",
            Op::In => "in",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::Before => "before",
            Op::After => "after",
            Op::Is => "is",
            Op::IsNone => "isnone",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
