use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use proc_macro2::TokenStream;
use proc_macro_error2::{abort, emit_error};
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, spanned::Spanned};

/// Parsed `#[sieve(...)]` options of one field.
#[derive(Default)]
struct FieldAttrs {
    name: Option<String>,
    skip: bool,
}

fn parse_field_attrs(field: &syn::Field) -> FieldAttrs {
    let mut out = FieldAttrs::default();

    for attr in field.attrs.iter().filter(|a| a.path().is_ident("sieve")) {
        let result = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                out.name = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("skip") {
                out.skip = true;
                Ok(())
            } else {
                Err(meta.error("expected `name = \"...\"` or `skip`"))
            }
        });

        if let Err(e) = result {
            emit_error!(attr.span(), "Failed to parse #[sieve] attribute: {}", e);
        }
    }

    out
}

pub fn expand_derive_sieve_schema(input: &DeriveInput) -> TokenStream {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        abort!(input.generics, "SieveSchema does not support generic structs");
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => abort!(input, "SieveSchema only supports structs with named fields"),
        },
        _ => abort!(input, "SieveSchema can only be derived for structs"),
    };

    let field_enum_name = Ident::new(&format!("{struct_name}Field"), struct_name.span());
    let schema_struct_name = Ident::new(&format!("{struct_name}Schema"), struct_name.span());
    let module_name = Ident::new(&struct_name.to_string().to_snake_case(), struct_name.span());

    let mut variants = Vec::new();
    let mut name_arms = Vec::new();
    let mut member_arms = Vec::new();
    let mut constructors = Vec::new();

    for field in fields {
        let Some(field_ident) = field.ident.as_ref() else {
            abort!(field, "SieveSchema requires named fields");
        };
        let attrs = parse_field_attrs(field);
        if attrs.skip {
            continue;
        }

        let raw_ident = field_ident.to_string();
        let plain_ident = raw_ident.trim_start_matches("r#");
        let wire_name = attrs
            .name
            .unwrap_or_else(|| plain_ident.to_lower_camel_case());
        let variant = Ident::new(&plain_ident.to_upper_camel_case(), field_ident.span());
        let field_type = &field.ty;

        name_arms.push(quote! {
            #field_enum_name::#variant => #wire_name
        });
        member_arms.push(quote! {
            #field_enum_name::#variant => #plain_ident
        });
        constructors.push(quote! {
            #[must_use]
            pub fn #field_ident()
                -> ::modkit_sieve::schema::FieldRef<#schema_struct_name, #field_type>
            {
                ::modkit_sieve::schema::FieldRef::new(#field_enum_name::#variant)
            }
        });
        variants.push(variant);
    }

    if variants.is_empty() {
        abort!(input, "SieveSchema needs at least one field that is not skipped");
    }

    let vis = &input.vis;

    quote! {
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        #vis enum #field_enum_name {
            #(#variants,)*
        }

        #vis struct #schema_struct_name;

        impl ::modkit_sieve::schema::Schema for #schema_struct_name {
            type Field = #field_enum_name;

            const FIELDS: &'static [#field_enum_name] = &[
                #(#field_enum_name::#variants,)*
            ];

            fn field_name(field: Self::Field) -> &'static str {
                match field {
                    #(#name_arms,)*
                }
            }

            fn member_name(field: Self::Field) -> &'static str {
                match field {
                    #(#member_arms,)*
                }
            }
        }

        #[allow(dead_code)]
        #vis mod #module_name {
            #[allow(unused_imports)]
            use super::*;

            #(#constructors)*
        }
    }
}
