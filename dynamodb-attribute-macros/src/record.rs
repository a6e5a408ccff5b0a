/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Expr, ExprLit, Lit, Member, Meta, Visibility};

/// Options set on the struct itself.
#[derive(Default)]
struct ContainerAttrs {
    marshaler: bool,
    unmarshaler: bool,
}

impl ContainerAttrs {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("dynamodbav")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("marshaler") {
                    parsed.marshaler = true;
                    Ok(())
                } else if meta.path.is_ident("unmarshaler") {
                    parsed.unmarshaler = true;
                    Ok(())
                } else {
                    Err(meta.error("expected `marshaler` or `unmarshaler`"))
                }
            })?;
        }
        Ok(parsed)
    }
}

/// Tags and options set on a field.
#[derive(Default)]
struct FieldAttrs {
    dynamodbav: Option<String>,
    json: Option<String>,
    flatten: bool,
}

impl FieldAttrs {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in attrs {
            if attr.path().is_ident("dynamodbav") {
                match &attr.meta {
                    Meta::NameValue(tag) => {
                        set_once(&mut parsed.dynamodbav, string_literal(&tag.value)?, attr)?
                    }
                    Meta::List(_) => attr.parse_nested_meta(|meta| {
                        if meta.path.is_ident("flatten") {
                            parsed.flatten = true;
                            Ok(())
                        } else {
                            Err(meta.error("expected `flatten`"))
                        }
                    })?,
                    Meta::Path(_) => {
                        return Err(syn::Error::new_spanned(
                            attr,
                            "expected `#[dynamodbav = \"...\"]` or `#[dynamodbav(flatten)]`",
                        ))
                    }
                }
            } else if attr.path().is_ident("json") {
                match &attr.meta {
                    Meta::NameValue(tag) => {
                        set_once(&mut parsed.json, string_literal(&tag.value)?, attr)?
                    }
                    _ => {
                        return Err(syn::Error::new_spanned(
                            attr,
                            "expected `#[json = \"...\"]`",
                        ))
                    }
                }
            }
        }
        Ok(parsed)
    }
}

fn set_once(slot: &mut Option<String>, value: String, attr: &Attribute) -> syn::Result<()> {
    if slot.is_some() {
        return Err(syn::Error::new_spanned(attr, "duplicate tag"));
    }
    *slot = Some(value);
    Ok(())
}

fn string_literal(expr: &Expr) -> syn::Result<String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(lit), ..
        }) => Ok(lit.value()),
        other => Err(syn::Error::new_spanned(other, "expected a string literal")),
    }
}

fn optional_str(value: &Option<String>) -> TokenStream2 {
    match value {
        Some(value) => quote!(::std::option::Option::Some(#value)),
        None => quote!(::std::option::Option::None),
    }
}

/// Implementation of `#[derive(Record)]`.
///
/// Generates `Native`, `Record` and `RecordFields` impls. Fields are indexed
/// in declaration order, and the same indices are used by the static field
/// descriptions.
pub(crate) fn derive_record_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "`Record` cannot be derived for generic structs",
        ));
    }
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "`Record` can only be derived for structs",
        ));
    };
    let container = ContainerAttrs::parse(&input.attrs)?;
    let ident = &input.ident;

    let mut members = Vec::with_capacity(data.fields.len());
    let mut raw_fields = Vec::with_capacity(data.fields.len());
    for (index, field) in data.fields.iter().enumerate() {
        let attrs = FieldAttrs::parse(&field.attrs)?;
        let name = field
            .ident
            .as_ref()
            .map(|ident| ident.unraw().to_string())
            .unwrap_or_default();
        let dynamodbav = optional_str(&attrs.dynamodbav);
        let json = optional_str(&attrs.json);
        let exported = matches!(field.vis, Visibility::Public(_));
        let ty = &field.ty;
        let embedded = if attrs.flatten {
            quote! {
                ::std::option::Option::Some(
                    <#ty as ::dynamodb_attribute::RecordFields>::record_fields
                        as fn() -> &'static [::dynamodb_attribute::RawField]
                )
            }
        } else {
            quote!(::std::option::Option::None)
        };
        raw_fields.push(quote! {
            ::dynamodb_attribute::RawField::new(#name, #dynamodbav, #json, #exported, #embedded)
        });
        members.push(match &field.ident {
            Some(ident) => Member::Named(ident.clone()),
            None => Member::Unnamed(syn::Index::from(index)),
        });
    }
    let indices: Vec<usize> = (0..members.len()).collect();
    let len = raw_fields.len();

    let marshaler = container.marshaler.then(|| {
        quote! {
            fn marshaler(&self) -> ::std::option::Option<&dyn ::dynamodb_attribute::Marshaler> {
                ::std::option::Option::Some(self)
            }
        }
    });
    let unmarshaler = container.unmarshaler.then(|| {
        quote! {
            fn unmarshaler(
                &mut self,
            ) -> ::std::option::Option<&mut dyn ::dynamodb_attribute::Unmarshaler> {
                ::std::option::Option::Some(self)
            }
        }
    });

    Ok(quote! {
        #[automatically_derived]
        impl ::dynamodb_attribute::Native for #ident {
            fn shape(&self) -> ::dynamodb_attribute::Shape<'_> {
                ::dynamodb_attribute::Shape::Record(self)
            }

            fn shape_mut(&mut self) -> ::dynamodb_attribute::ShapeMut<'_> {
                ::dynamodb_attribute::ShapeMut::Record(self)
            }

            fn reset(&mut self) {
                #( ::dynamodb_attribute::Native::reset(&mut self.#members); )*
            }

            #marshaler
            #unmarshaler
        }

        #[automatically_derived]
        impl ::dynamodb_attribute::Record for #ident {
            fn raw_fields(&self) -> &'static [::dynamodb_attribute::RawField] {
                <Self as ::dynamodb_attribute::RecordFields>::record_fields()
            }

            fn field(
                &self,
                index: usize,
            ) -> ::std::option::Option<&dyn ::dynamodb_attribute::Native> {
                match index {
                    #( #indices => ::std::option::Option::Some(&self.#members), )*
                    _ => ::std::option::Option::None,
                }
            }

            fn field_mut(
                &mut self,
                index: usize,
            ) -> ::std::option::Option<&mut dyn ::dynamodb_attribute::Native> {
                match index {
                    #( #indices => ::std::option::Option::Some(&mut self.#members), )*
                    _ => ::std::option::Option::None,
                }
            }
        }

        #[automatically_derived]
        impl ::dynamodb_attribute::RecordFields for #ident {
            fn record_fields() -> &'static [::dynamodb_attribute::RawField] {
                static FIELDS: [::dynamodb_attribute::RawField; #len] = [#(#raw_fields),*];
                &FIELDS
            }
        }
    })
}
