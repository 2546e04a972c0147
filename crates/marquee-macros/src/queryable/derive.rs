//! Implementation of the `#[derive(Queryable)]` macro.
//!
//! This macro generates an implementation of the `Queryable` trait and
//! field name constants for building schemas and queries without string typos.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result, Type};

use super::attrs::{parse_container_attrs, parse_query_attrs, QueryType};

/// Main implementation of the Queryable derive macro.
pub fn queryable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Queryable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Queryable can only be derived for structs",
            ))
        }
    };

    let container = parse_container_attrs(&input.attrs)?;

    let mut field_matches: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let query_attrs = parse_query_attrs(&field.attrs)?;

        if query_attrs.skip {
            continue;
        }

        // Unannotated fields are not queryable
        let query_type = match query_attrs.query_type {
            Some(t) => t,
            None => continue,
        };

        let is_option = is_option_type(&field.ty);
        if query_attrs.optional && !is_option {
            return Err(Error::new(
                query_attrs.span,
                "`optional` requires an Option<_> field",
            ));
        }

        let query_name = query_attrs
            .rename
            .unwrap_or_else(|| container.rename_all.apply(&field_name.to_string()));

        let const_name = format_ident!("{}", to_screaming_snake_case(&query_name));

        field_constants.push(quote! {
            /// Field name constant for schemas and queries.
            pub const #const_name: &'static str = #query_name;
        });

        let value_expr = if is_option {
            let inner = value_from_ref(query_type, quote! { value });
            quote! {
                match &self.#field_name {
                    ::core::option::Option::Some(value) => #inner,
                    ::core::option::Option::None => ::marquee_query::Value::None,
                }
            }
        } else {
            value_from_ref(query_type, quote! { &self.#field_name })
        };

        field_matches.push(quote! {
            #query_name => #value_expr,
        });
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::marquee_query::Queryable for #struct_name #ty_generics #where_clause {
            fn field_value(&self, field: &str) -> ::marquee_query::Value<'_> {
                match field {
                    #(#field_matches)*
                    _ => ::marquee_query::Value::None,
                }
            }
        }
    };

    Ok(expanded)
}

/// Builds the `Value` for a reference to the field's (inner) value.
fn value_from_ref(query_type: QueryType, value: TokenStream) -> TokenStream {
    match query_type {
        QueryType::String => {
            quote! { ::marquee_query::Value::String(::core::convert::AsRef::<str>::as_ref(#value)) }
        }
        QueryType::Tag => {
            quote! { ::marquee_query::Value::Tag(::marquee_query::Tagged::tag(#value)) }
        }
        QueryType::Number => {
            quote! { ::marquee_query::Value::Number(::marquee_query::Number::from(*#value)) }
        }
        QueryType::Timestamp => {
            quote! {
                ::marquee_query::Value::Timestamp(::marquee_query::AsTimestamp::as_timestamp(#value))
            }
        }
        QueryType::Bool => {
            quote! { ::marquee_query::Value::Bool(*#value) }
        }
    }
}

/// Whether the type is written as `Option<_>` (any path ending in `Option`).
fn is_option_type(ty: &Type) -> bool {
    match ty {
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        _ => false,
    }
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        }
    }

    result
}
