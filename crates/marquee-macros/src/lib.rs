//! Proc macros for Marquee.
//!
//! - [`Queryable`] - Expose struct fields to the `marquee-query` engine
//!
//! For working examples, see `marquee-catalog/src/entities.rs` and
//! `marquee-catalog/tests/derive.rs`.

mod queryable;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Queryable` trait for dashboard entities.
///
/// Only annotated fields are exposed; everything else reads as
/// `Value::None`.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `String` | Free text (`AsRef<str>`), searchable and sortable |
/// | `Tag` | Categorical value implementing `Tagged` (alias: `ty = "enum"`) |
/// | `Number` | Integer or float field, copied into a `Number` |
/// | `Timestamp` | Instant implementing `AsTimestamp` (e.g. `DateTime<Utc>`) |
/// | `Bool` | Boolean field |
/// | `optional` | The field is `Option<_>`; `None` reads as `Value::None` |
/// | `skip` | Exclude this field from queries |
/// | `rename = "..."` | Use a custom name for queries |
/// | `ty = "..."` | Type given as a string |
///
/// `Option<_>` fields are detected from the written type, so `optional`
/// mostly serves as documentation; on a non-`Option` field it is an error.
///
/// # Container Attributes
///
/// `#[query(rename_all = "camelCase")]` names fields the way the REST
/// payloads do (`created_at` is queried as `createdAt`).
///
/// # Generated Code
///
/// 1. Field name constants (e.g., `User::CREATED_AT == "createdAt"`)
/// 2. Implementation of `Queryable::field_value()`
///
/// # Example
///
/// ```ignore
/// use chrono::{DateTime, Utc};
/// use marquee_macros::Queryable;
/// use marquee_query::{EntitySchema, Facet, TagBinding};
///
/// #[derive(Queryable)]
/// #[query(rename_all = "camelCase")]
/// struct User {
///     #[query(String)]
///     name: String,
///
///     #[query(Bool)]
///     is_active: bool,
///
///     #[query(Timestamp)]
///     created_at: DateTime<Utc>,
///
///     #[query(Timestamp, optional)]
///     last_active: Option<DateTime<Utc>>,
///
///     #[query(skip)]
///     avatar: Option<String>,
/// }
///
/// let schema = EntitySchema::new("users")
///     .search([User::NAME])
///     .facet(Facet::Status, TagBinding::flag(User::IS_ACTIVE, "active", "inactive"));
/// ```
#[proc_macro_derive(Queryable, attributes(query))]
pub fn queryable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    queryable::queryable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
