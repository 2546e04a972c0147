//! Sorting: direction, ordering clauses, and the comparator factory.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::traits::Queryable;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first; absent values lead.
    Asc,
    /// Largest first; absent values trail.
    #[default]
    Desc,
}

impl SortOrder {
    /// Applies this direction to an ascending ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// The opposite direction, for header-click toggling.
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single ordering clause: a field and a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    pub order: SortOrder,
}

impl OrderBy {
    /// Creates an ordering with the given direction.
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        OrderBy {
            field: field.into(),
            order,
        }
    }

    /// Creates an ascending ordering.
    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy::new(field, SortOrder::Asc)
    }

    /// Creates a descending ordering.
    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy::new(field, SortOrder::Desc)
    }

    /// Compares two values according to this ordering.
    pub fn compare(&self, a: &Value<'_>, b: &Value<'_>) -> Ordering {
        self.order.apply(compare_values(a, b))
    }
}

/// Ascending comparison of two field values.
///
/// - text (strings and tags) compares case-insensitively
/// - timestamps by instant, numbers numerically, `false < true`
/// - `None` is the minimum of every kind
/// - mismatched kinds and NaN compare `Equal`, so a stable sort keeps
///   input order for them
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::None, Value::None) => Ordering::Equal,
        (Value::None, _) => Ordering::Less,
        (_, Value::None) => Ordering::Greater,

        (Value::String(a) | Value::Tag(a), Value::String(b) | Value::Tag(b)) => {
            compare_folded(a, b)
        }
        (Value::Number(a), Value::Number(b)) => a.compare(*b).unwrap_or(Ordering::Equal),
        (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),

        _ => Ordering::Equal,
    }
}

/// Case-insensitive comparison without allocating folded copies.
fn compare_folded(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Builds a comparator over entities for one sort key and direction.
///
/// ```
/// use marquee_query::{comparator, Queryable, SortOrder, Value};
///
/// struct Story(&'static str);
///
/// impl Queryable for Story {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "title" => Value::String(self.0),
///             _ => Value::None,
///         }
///     }
/// }
///
/// let mut stories = vec![Story("Banana"), Story("apple"), Story("Cherry")];
/// stories.sort_by(comparator("title", SortOrder::Desc));
/// let titles: Vec<_> = stories.iter().map(|s| s.0).collect();
/// assert_eq!(titles, ["Cherry", "Banana", "apple"]);
/// ```
pub fn comparator<T>(field: impl Into<String>, order: SortOrder) -> impl Fn(&T, &T) -> Ordering
where
    T: Queryable,
{
    let order_by = OrderBy::new(field, order);
    move |a: &T, b: &T| {
        order_by.compare(&a.field_value(&order_by.field), &b.field_value(&order_by.field))
    }
}

/// Compares two items using a list of ordering clauses.
///
/// The first clause is the primary key, later clauses break ties.
pub fn compare_by_orderings<T, F>(a: &T, b: &T, orderings: &[OrderBy], accessor: &F) -> Ordering
where
    for<'a> F: Fn(&'a T, &str) -> Value<'a>,
{
    for order_by in orderings {
        let ordering = order_by.compare(
            &accessor(a, &order_by.field),
            &accessor(b, &order_by.field),
        );
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Number, Timestamp};

    #[test]
    fn order_apply_and_toggle() {
        assert_eq!(SortOrder::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(SortOrder::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortOrder::Desc.apply(Ordering::Equal), Ordering::Equal);
        assert_eq!(SortOrder::Asc.toggled(), SortOrder::Desc);
        assert_eq!(SortOrder::default(), SortOrder::Desc);
    }

    #[test]
    fn strings_fold_case() {
        assert_eq!(
            compare_values(&Value::String("apple"), &Value::String("Banana")),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&Value::String("ADA"), &Value::String("ada")),
            Ordering::Equal
        );
        assert_eq!(
            compare_values(&Value::Tag("Editor"), &Value::String("admin")),
            Ordering::Greater
        );
    }

    #[test]
    fn none_is_minimum_for_every_kind() {
        let samples = [
            Value::String(""),
            Value::Number(Number::I64(i64::MIN)),
            Value::Timestamp(Timestamp(i64::MIN)),
            Value::Bool(false),
        ];
        for sample in &samples {
            assert_eq!(compare_values(&Value::None, sample), Ordering::Less);
            assert_eq!(compare_values(sample, &Value::None), Ordering::Greater);
        }
        assert_eq!(compare_values(&Value::None, &Value::None), Ordering::Equal);
    }

    #[test]
    fn none_trails_in_descending_order() {
        let desc = OrderBy::desc("rating");
        assert_eq!(
            desc.compare(&Value::None, &Value::Number(Number::F64(1.0))),
            Ordering::Greater
        );
    }

    #[test]
    fn mismatch_and_nan_are_ties() {
        assert_eq!(
            compare_values(&Value::String("1"), &Value::Number(Number::I64(1))),
            Ordering::Equal
        );
        assert_eq!(
            compare_values(
                &Value::Number(Number::F64(f64::NAN)),
                &Value::Number(Number::F64(0.0))
            ),
            Ordering::Equal
        );
    }

    #[test]
    fn timestamps_and_bools() {
        assert_eq!(
            compare_values(
                &Value::Timestamp(Timestamp(1)),
                &Value::Timestamp(Timestamp(2))
            ),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&Value::Bool(false), &Value::Bool(true)),
            Ordering::Less
        );
    }

    #[test]
    fn later_orderings_break_ties() {
        struct Item {
            status: &'static str,
            views: u64,
        }

        fn accessor<'a>(item: &'a Item, field: &str) -> Value<'a> {
            match field {
                "status" => Value::Tag(item.status),
                "views" => Value::Number(Number::U64(item.views)),
                _ => Value::None,
            }
        }

        let a = Item { status: "draft", views: 9 };
        let b = Item { status: "draft", views: 3 };
        let orderings = [OrderBy::asc("status"), OrderBy::desc("views")];

        assert_eq!(compare_by_orderings(&a, &b, &orderings, &accessor), Ordering::Less);
        assert_eq!(compare_by_orderings(&b, &a, &orderings, &accessor), Ordering::Greater);
    }
}
