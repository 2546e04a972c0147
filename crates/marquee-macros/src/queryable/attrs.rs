//! Attribute parsing for the Queryable derive macro.
//!
//! Field attributes: `#[query(String | Tag | Number | Timestamp | Bool,
//! optional, rename = "...", ty = "...", skip)]`.
//!
//! Container attribute: `#[query(rename_all = "camelCase")]`.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Ident, Lit, LitStr, Meta, Result, Token,
};

/// How a field is exposed to queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    /// Free text: `#[query(String)]`
    String,
    /// Categorical value implementing `Tagged`: `#[query(Tag)]`
    Tag,
    /// Integer or float: `#[query(Number)]`
    Number,
    /// Instant implementing `AsTimestamp`: `#[query(Timestamp)]`
    Timestamp,
    /// Boolean: `#[query(Bool)]`
    Bool,
}

const EXPECTED: &str = "String, Tag, Number, Timestamp, Bool";

impl QueryType {
    /// Parse a query type from an identifier.
    pub fn from_ident(ident: &Ident) -> Result<Self> {
        Self::from_str(&ident.to_string(), ident.span())
    }

    /// Parse a query type from its name.
    pub fn from_str(s: &str, span: Span) -> Result<Self> {
        match s {
            "String" | "string" => Ok(QueryType::String),
            "Tag" | "tag" | "Enum" | "enum" => Ok(QueryType::Tag),
            "Number" | "number" => Ok(QueryType::Number),
            "Timestamp" | "timestamp" => Ok(QueryType::Timestamp),
            "Bool" | "bool" | "boolean" => Ok(QueryType::Bool),
            other => Err(Error::new(
                span,
                format!("unknown query type: '{other}'. Expected one of: {EXPECTED}"),
            )),
        }
    }
}

/// Field-level attributes from `#[query(...)]`.
#[derive(Debug, Clone)]
pub struct QueryAttr {
    /// How the field is exposed.
    pub query_type: Option<QueryType>,
    /// The field is an `Option<_>`; `None` reads as `Value::None`.
    pub optional: bool,
    /// Leave the field out entirely.
    pub skip: bool,
    /// Query name override (default: derived from the field name).
    pub rename: Option<String>,
    /// The span for error reporting.
    pub span: Span,
}

impl Default for QueryAttr {
    fn default() -> Self {
        QueryAttr {
            query_type: None,
            optional: false,
            skip: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

fn string_literal<'a>(value: &'a syn::Expr, what: &str) -> Result<&'a LitStr> {
    match value {
        syn::Expr::Lit(syn::ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s),
        other => Err(Error::new(
            other.span(),
            format!("{what} must be a string literal"),
        )),
    }
}

impl Parse for QueryAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = QueryAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) => {
                    if p.is_ident("skip") {
                        attr.skip = true;
                    } else if p.is_ident("optional") {
                        attr.optional = true;
                    } else if let Some(ident) = p.get_ident() {
                        attr.query_type = Some(QueryType::from_ident(ident)?);
                        attr.span = ident.span();
                    } else {
                        return Err(Error::new(
                            p.span(),
                            format!("expected query type ({EXPECTED}), optional, or skip"),
                        ));
                    }
                }

                Meta::NameValue(nv) => {
                    if nv.path.is_ident("rename") {
                        attr.rename = Some(string_literal(&nv.value, "rename")?.value());
                    } else if nv.path.is_ident("ty") {
                        let s = string_literal(&nv.value, "ty")?;
                        attr.query_type = Some(QueryType::from_str(&s.value(), s.span())?);
                        attr.span = s.span();
                    } else {
                        return Err(Error::new(
                            nv.path.span(),
                            "unknown attribute. Expected: rename or ty",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        format!(
                            "unknown query attribute. Expected: {EXPECTED}, optional, skip, rename = \"...\", or ty = \"...\""
                        ),
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Naming rule applied to fields without `rename`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenameRule {
    /// Keep the Rust field name.
    #[default]
    None,
    /// `created_at` becomes `createdAt`.
    CamelCase,
}

impl RenameRule {
    /// Apply the rule to a Rust field name.
    pub fn apply(self, field: &str) -> String {
        match self {
            RenameRule::None => field.to_string(),
            RenameRule::CamelCase => {
                let mut out = String::with_capacity(field.len());
                let mut upper_next = false;
                for c in field.chars() {
                    if c == '_' {
                        upper_next = !out.is_empty();
                    } else if upper_next {
                        out.extend(c.to_uppercase());
                        upper_next = false;
                    } else {
                        out.push(c);
                    }
                }
                out
            }
        }
    }
}

/// Container-level attributes from `#[query(...)]` on the struct.
#[derive(Debug, Clone, Default)]
pub struct ContainerAttr {
    pub rename_all: RenameRule,
}

impl Parse for ContainerAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = ContainerAttr::default();
        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::NameValue(nv) if nv.path.is_ident("rename_all") => {
                    let s = string_literal(&nv.value, "rename_all")?;
                    attr.rename_all = match s.value().as_str() {
                        "camelCase" => RenameRule::CamelCase,
                        "snake_case" => RenameRule::None,
                        other => {
                            return Err(Error::new(
                                s.span(),
                                format!("unsupported rename_all rule: '{other}'. Expected camelCase or snake_case"),
                            ))
                        }
                    };
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown container attribute. Expected: rename_all = \"...\"",
                    ))
                }
            }
        }

        Ok(attr)
    }
}

/// Extract `#[query(...)]` attributes from a field's attributes.
pub fn parse_query_attrs(attrs: &[Attribute]) -> Result<QueryAttr> {
    for attr in attrs {
        if attr.path().is_ident("query") {
            return attr.parse_args::<QueryAttr>();
        }
    }
    Ok(QueryAttr::default())
}

/// Extract `#[query(...)]` attributes from the struct itself.
pub fn parse_container_attrs(attrs: &[Attribute]) -> Result<ContainerAttr> {
    for attr in attrs {
        if attr.path().is_ident("query") {
            return attr.parse_args::<ContainerAttr>();
        }
    }
    Ok(ContainerAttr::default())
}
