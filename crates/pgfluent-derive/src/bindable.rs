//! Bindable derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use std::collections::HashSet;
use syn::{Data, DeriveInput, Fields, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let type_name = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields: Vec<&syn::Field> = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields.named.iter().collect(),
            // Positional fields cannot carry a column tag; bind nothing.
            Fields::Unnamed(_) | Fields::Unit => Vec::new(),
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Bindable can only be derived for structs",
            ));
        }
    };

    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for field in fields {
        let Some(lit) = column_attr(field)? else {
            continue;
        };
        let column = lit.value();
        if !seen.insert(column.clone()) {
            return Err(syn::Error::new_spanned(
                &lit,
                format!("column `{column}` is bound by more than one field"),
            ));
        }
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        entries.push(quote! {
            (#column, ::pgfluent::Param::new(::core::clone::Clone::clone(&self.#ident)))
        });
    }

    Ok(quote! {
        impl #impl_generics ::pgfluent::Bindable for #name #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;

            fn bind_columns(&self) -> ::std::vec::Vec<(&'static str, ::pgfluent::Param)> {
                ::std::vec![#(#entries),*]
            }
        }
    })
}

/// Column from `#[db(column = "...")]`, or `None` for an untagged field.
fn column_attr(field: &syn::Field) -> Result<Option<syn::LitStr>> {
    let mut column = None;
    for attr in &field.attrs {
        if !attr.path().is_ident("db") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("column") {
                let lit: syn::LitStr = meta.value()?.parse()?;
                if lit.value().is_empty() {
                    return Err(meta.error("column name must not be empty"));
                }
                column = Some(lit);
                Ok(())
            } else {
                Err(meta.error("unknown db attribute, expected `column = \"...\"`"))
            }
        })?;
    }
    Ok(column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_distinct_columns_in_field_order() {
        let input: DeriveInput = parse_quote! {
            struct Account {
                #[db(column = "id")]
                id: i64,
                cache: u32,
                #[db(column = "owner_name")]
                owner: String,
            }
        };
        let tokens = expand(input).unwrap().to_string();
        assert!(tokens.contains("\"Account\""));
        let id = tokens.find("\"id\"").unwrap();
        let owner = tokens.find("\"owner_name\"").unwrap();
        assert!(id < owner);
        assert!(!tokens.contains("cache"));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Dup {
                #[db(column = "name")]
                first: String,
                #[db(column = "name")]
                second: String,
            }
        };
        let err = expand(input).unwrap_err();
        assert_eq!(err.to_string(), "column `name` is bound by more than one field");
    }

    #[test]
    fn test_empty_column_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Blank {
                #[db(column = "")]
                value: i32,
            }
        };
        assert!(expand(input).is_err());
    }

    #[test]
    fn test_enum_rejected() {
        let input: DeriveInput = parse_quote! {
            enum Status { Active }
        };
        let err = expand(input).unwrap_err();
        assert_eq!(err.to_string(), "Bindable can only be derived for structs");
    }
}
