//! Model derive macro implementation.
//!
//! Expands a struct with named fields into a `structsql::Model` impl: a
//! table layout (name + ordered columns), parameter binding in column order,
//! and positional row decoding in the same order.

use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Result};

/// Parsed content of an `#[orm(...)]` attribute.
///
/// Accepts comma-separated markers (`primary_key`) and key/value pairs
/// (`table = "..."`, `column = "..."`). Unknown markers and keys are
/// skipped rather than rejected.
struct OrmAttr {
    primary_key: bool,
    table: Option<String>,
    column: Option<String>,
}

impl syn::parse::Parse for OrmAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut primary_key = false;
        let mut table = None;
        let mut column = None;

        while !input.is_empty() {
            let ident: syn::Ident = input.parse()?;
            if input.peek(syn::Token![=]) {
                let _: syn::Token![=] = input.parse()?;
                let value: syn::LitStr = input.parse()?;
                if ident == "table" {
                    table = Some(value.value());
                } else if ident == "column" {
                    column = Some(value.value());
                }
            } else if ident == "primary_key" {
                primary_key = true;
            }

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        Ok(OrmAttr {
            primary_key,
            table,
            column,
        })
    }
}

fn parse_orm_attrs(attrs: &[syn::Attribute]) -> Result<OrmAttr> {
    let mut merged = OrmAttr {
        primary_key: false,
        table: None,
        column: None,
    };
    for attr in attrs {
        if attr.path().is_ident("orm") {
            let parsed = attr.parse_args::<OrmAttr>()?;
            merged.primary_key |= parsed.primary_key;
            if parsed.table.is_some() {
                merged.table = parsed.table;
            }
            if parsed.column.is_some() {
                merged.column = parsed.column;
            }
        }
    }
    Ok(merged)
}

struct FieldMeta {
    ident: syn::Ident,
    field: String,
    column: String,
    primary_key: bool,
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Model can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Model can only be derived for structs",
            ));
        }
    };

    let table = parse_orm_attrs(&input.attrs)?
        .table
        .unwrap_or_else(|| name.to_string().to_snake_case());

    let metas: Vec<FieldMeta> = fields
        .iter()
        .map(|field| {
            let ident = field.ident.clone().expect("named field");
            let attr = parse_orm_attrs(&field.attrs)?;
            // Strip the raw-identifier prefix so `r#type` maps to "type".
            let field_name = ident.to_string().trim_start_matches("r#").to_string();
            Ok(FieldMeta {
                column: attr.column.unwrap_or_else(|| field_name.to_snake_case()),
                field: field_name,
                primary_key: attr.primary_key,
                ident,
            })
        })
        .collect::<Result<_>>()?;

    let column_descriptors = metas.iter().map(|m| {
        let field = &m.field;
        let column = &m.column;
        let primary_key = m.primary_key;
        quote! {
            structsql::ColumnDescriptor {
                field: #field,
                column: #column,
                primary_key: #primary_key,
            }
        }
    });

    let has_pk = metas.iter().any(|m| m.primary_key);
    let binds = metas.iter().map(|m| {
        let ident = &m.ident;
        if m.primary_key {
            quote! {
                if !skip_pk {
                    values.push(structsql::Param::new(self.#ident.clone()));
                }
            }
        } else {
            quote! {
                values.push(structsql::Param::new(self.#ident.clone()));
            }
        }
    });
    let skip_pk_use = if has_pk {
        quote! {}
    } else {
        quote! { let _ = skip_pk; }
    };

    let decodes = metas.iter().enumerate().map(|(idx, m)| {
        let ident = &m.ident;
        let column = &m.column;
        quote! {
            #ident: row
                .try_get(#idx)
                .map_err(|e| structsql::Error::decode(#column, e.to_string()))?
        }
    });

    let column_count = metas.len();

    Ok(quote! {
        impl structsql::Model for #name {
            fn layout() -> structsql::TableDescriptor {
                const COLUMNS: &[structsql::ColumnDescriptor] = &[
                    #(#column_descriptors),*
                ];
                structsql::TableDescriptor {
                    table: #table,
                    columns: COLUMNS,
                }
            }

            fn bind(&self, skip_pk: bool) -> ::std::vec::Vec<structsql::Param> {
                #skip_pk_use
                let mut values = ::std::vec::Vec::with_capacity(#column_count);
                #(#binds)*
                values
            }

            fn from_row(row: &structsql::Row) -> structsql::Result<Self> {
                Ok(Self {
                    #(#decodes),*
                })
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand_flat(input: DeriveInput) -> String {
        expand(input).unwrap().to_string().replace(' ', "")
    }

    #[test]
    fn table_name_defaults_to_snake_case() {
        let input: DeriveInput = parse_quote! {
            struct HttpLogEntry {
                id: i64,
            }
        };
        let out = expand_flat(input);
        assert!(out.contains("table:\"http_log_entry\""));
    }

    #[test]
    fn raw_identifier_field_gets_a_plain_column_name() {
        let input: DeriveInput = parse_quote! {
            struct Widget {
                #[orm(primary_key)]
                id: i64,
                r#type: String,
            }
        };
        let out = expand_flat(input);
        assert!(out.contains("field:\"type\""));
        assert!(out.contains("column:\"type\""));
        assert!(!out.contains("\"r#type\""));
    }

    #[test]
    fn column_attribute_overrides_the_default() {
        let input: DeriveInput = parse_quote! {
            struct Widget {
                #[orm(column = "widget_kind")]
                kind: String,
            }
        };
        let out = expand_flat(input);
        assert!(out.contains("field:\"kind\""));
        assert!(out.contains("column:\"widget_kind\""));
    }

    #[test]
    fn tuple_struct_is_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Pair(i64, i64);
        };
        assert!(expand(input).is_err());
    }
}
