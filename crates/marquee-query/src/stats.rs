//! Aggregate statistics over a full collection.
//!
//! Summary cards report on the whole collection, not the filtered rows; the
//! reducer therefore takes no [`FilterState`](crate::FilterState). What it
//! computes is declared by a [`StatsSpec`]:
//!
//! - **distributions**: count per declared value of a categorical field
//! - **flags**: count of entities whose boolean field equals a value
//! - **recent**: count of entities whose timestamp is within the last N days
//! - **numeric**: sum and mean of a numeric field (missing counts as 0)
//!
//! Every count and aggregate of an empty collection is zero, and
//! percentages never divide by zero.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::clause::Clause;
use crate::engine::since_clause;
use crate::op::Op;
use crate::traits::Queryable;
use crate::value::{Timestamp, Value};

/// Longest recency window a configuration may declare (100 years).
pub const MAX_RECENT_DAYS: i64 = 36_500;

fn default_flag_value() -> bool {
    true
}

/// Count per declared value of a categorical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionSpec {
    /// Name in the summary.
    pub name: String,
    /// Field read from each entity.
    pub field: String,
    /// Buckets reported, in order. Other values are not counted.
    pub values: Vec<String>,
}

/// Count of entities whose boolean field equals `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSpec {
    /// Name in the summary.
    pub name: String,
    /// Boolean field.
    pub field: String,
    /// Expected value.
    #[serde(default = "default_flag_value")]
    pub value: bool,
}

/// Count of entities whose timestamp is within the last `days` days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSpec {
    /// Name in the summary.
    pub name: String,
    /// Timestamp field.
    pub field: String,
    /// Window length in days.
    pub days: i64,
}

impl RecentSpec {
    /// The clause counting entities inside the window ending at `now`.
    ///
    /// A window reaching past the representable range counts every entity
    /// with a timestamp.
    pub fn clause(&self, now: DateTime<Utc>) -> Clause {
        match Duration::try_days(self.days).and_then(|window| now.checked_sub_signed(window)) {
            Some(threshold) => since_clause(&self.field, threshold),
            None => Clause::new(&self.field, Op::Gte, Timestamp(i64::MIN)),
        }
    }
}

/// Sum and mean of a numeric field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericSpec {
    /// Name in the summary.
    pub name: String,
    /// Numeric field.
    pub field: String,
}

/// Declares what a summary contains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsSpec {
    /// Categorical distributions.
    pub distributions: Vec<DistributionSpec>,
    /// Boolean counts.
    pub flags: Vec<FlagSpec>,
    /// Recency counts.
    pub recent: Vec<RecentSpec>,
    /// Numeric aggregates.
    pub numeric: Vec<NumericSpec>,
}

impl StatsSpec {
    /// An empty spec (the summary reports only the total).
    pub fn new() -> Self {
        StatsSpec::default()
    }

    /// Adds a distribution.
    pub fn distribution<I, S>(mut self, name: &str, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.distributions.push(DistributionSpec {
            name: name.to_string(),
            field: field.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Adds a boolean count.
    pub fn flag(mut self, name: &str, field: &str, value: bool) -> Self {
        self.flags.push(FlagSpec {
            name: name.to_string(),
            field: field.to_string(),
            value,
        });
        self
    }

    /// Adds a recency count.
    pub fn recent(mut self, name: &str, field: &str, days: i64) -> Self {
        self.recent.push(RecentSpec {
            name: name.to_string(),
            field: field.to_string(),
            days,
        });
        self
    }

    /// Adds a numeric aggregate.
    pub fn numeric(mut self, name: &str, field: &str) -> Self {
        self.numeric.push(NumericSpec {
            name: name.to_string(),
            field: field.to_string(),
        });
        self
    }

    /// Every count and aggregate name, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.distributions
            .iter()
            .map(|d| d.name.as_str())
            .chain(self.flags.iter().map(|f| f.name.as_str()))
            .chain(self.recent.iter().map(|r| r.name.as_str()))
            .chain(self.numeric.iter().map(|n| n.name.as_str()))
    }
}

/// Sum and arithmetic mean of a numeric field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericAggregate {
    /// Sum, with missing values counted as 0.
    pub sum: f64,
    /// `sum / total`, 0 for an empty collection.
    pub mean: f64,
}

/// Derived statistics for a whole collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    /// Collection length.
    pub total: usize,
    /// Distribution name -> value -> count.
    pub distributions: BTreeMap<String, BTreeMap<String, usize>>,
    /// Flag and recency counts by name.
    pub counts: BTreeMap<String, usize>,
    /// Numeric aggregates by name.
    pub numeric: BTreeMap<String, NumericAggregate>,
}

impl StatisticsSummary {
    /// A named flag or recency count, 0 if not declared.
    pub fn count(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// A named count as a percentage of the total.
    pub fn rate(&self, name: &str) -> f64 {
        percentage(self.count(name), self.total)
    }

    /// A distribution, if declared.
    pub fn distribution(&self, name: &str) -> Option<&BTreeMap<String, usize>> {
        self.distributions.get(name)
    }

    /// Count of one bucket, 0 if not declared.
    pub fn bucket(&self, distribution: &str, value: &str) -> usize {
        self.distribution(distribution)
            .and_then(|buckets| buckets.get(value))
            .copied()
            .unwrap_or(0)
    }

    /// One bucket as a percentage of the total.
    pub fn share(&self, distribution: &str, value: &str) -> f64 {
        percentage(self.bucket(distribution, value), self.total)
    }

    /// A numeric aggregate, zero if not declared.
    pub fn aggregate(&self, name: &str) -> NumericAggregate {
        self.numeric.get(name).copied().unwrap_or_default()
    }

    /// Sum of a numeric aggregate.
    pub fn sum(&self, name: &str) -> f64 {
        self.aggregate(name).sum
    }

    /// Mean of a numeric aggregate.
    pub fn mean(&self, name: &str) -> f64 {
        self.aggregate(name).mean
    }
}

/// `count / total * 100`, or 0 when `total` is 0.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Integers are summed exactly. Floats are kept and summed in sorted order at
/// the end, so the result never depends on collection order.
#[derive(Default)]
struct Accumulator {
    exact: i128,
    floats: Vec<f64>,
}

impl Accumulator {
    fn add(&mut self, value: &Value<'_>) {
        if let Some(n) = value.as_number() {
            match n.to_i128() {
                Some(i) => self.exact += i,
                None if n.to_f64().is_finite() => self.floats.push(n.to_f64()),
                None => {}
            }
        }
    }

    fn finish(&mut self, total: usize) -> NumericAggregate {
        self.floats.sort_unstable_by(f64::total_cmp);
        let sum = self.exact as f64 + self.floats.iter().sum::<f64>();
        let mean = if total == 0 { 0.0 } else { sum / total as f64 };
        NumericAggregate { sum, mean }
    }
}

/// Summarizes a whole collection.
///
/// `now` anchors every recency count for this call.
#[instrument(skip_all, fields(total = entities.len()))]
pub fn summarize<T: Queryable>(
    entities: &[T],
    spec: &StatsSpec,
    now: DateTime<Utc>,
) -> StatisticsSummary {
    let total = entities.len();

    let mut distributions: BTreeMap<String, BTreeMap<String, usize>> = spec
        .distributions
        .iter()
        .map(|d| {
            let buckets = d.values.iter().map(|v| (v.clone(), 0)).collect();
            (d.name.clone(), buckets)
        })
        .collect();

    let flag_clauses: Vec<(&str, Clause)> = spec
        .flags
        .iter()
        .map(|f| (f.name.as_str(), Clause::new(&f.field, Op::Eq, f.value)))
        .collect();
    let recent_clauses: Vec<(&str, Clause)> = spec
        .recent
        .iter()
        .map(|r| (r.name.as_str(), r.clause(now)))
        .collect();

    let mut counts: BTreeMap<String, usize> = flag_clauses
        .iter()
        .chain(recent_clauses.iter())
        .map(|(name, _)| (name.to_string(), 0))
        .collect();
    let mut sums: Vec<Accumulator> = spec.numeric.iter().map(|_| Accumulator::default()).collect();

    for entity in entities {
        for d in &spec.distributions {
            let value = entity.field_value(&d.field);
            if let (Some(text), Some(buckets)) = (value.as_str(), distributions.get_mut(&d.name)) {
                if let Some(count) = buckets.get_mut(text) {
                    *count += 1;
                }
            }
        }

        for (name, clause) in flag_clauses.iter().chain(recent_clauses.iter()) {
            if clause.matches(&entity.field_value(&clause.field)) {
                if let Some(count) = counts.get_mut(*name) {
                    *count += 1;
                }
            }
        }

        for (n, acc) in spec.numeric.iter().zip(sums.iter_mut()) {
            acc.add(&entity.field_value(&n.field));
        }
    }

    let numeric = spec
        .numeric
        .iter()
        .zip(sums.iter_mut())
        .map(|(n, acc)| (n.name.clone(), acc.finish(total)))
        .collect();

    debug!(
        distributions = spec.distributions.len(),
        counts = counts.len(),
        "summary computed"
    );

    StatisticsSummary {
        total,
        distributions,
        counts,
        numeric,
    }
}
