//! Module derive macro implementation

use proc_macro::TokenStream;
use proc_macro2::Ident;
use quote::quote;
use syn::{
    parse::Result, parse_macro_input, Attribute, Data, DeriveInput, Error, Fields, LitStr,
    Token, Type,
};

pub fn derive_module_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_module(&input) {
        Ok(result) => result.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Struct level `#[module(...)]` options
#[derive(Debug, Default)]
struct ModuleOptions {
    name: Option<LitStr>,
    provider: bool,
}

/// A field carrying a `#[bind(...)]` attribute
#[derive(Debug)]
struct BoundField {
    ident: Ident,
    pairs: Vec<(String, String)>,
    deferred: bool,
}

fn expand_module(input: &DeriveInput) -> Result<proc_macro2::TokenStream> {
    let options = parse_module_options(&input.attrs)?;
    let fields = extract_bound_fields(input)?;

    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let module_name = match &options.name {
        Some(name) => quote! { #name },
        None => {
            let name = struct_name.to_string();
            quote! { #name }
        }
    };

    let descriptors = fields.iter().map(|field| {
        let ident = &field.ident;
        let field_name = ident.to_string();
        let keys = field.pairs.iter().map(|(k, _)| k);
        let values = field.pairs.iter().map(|(_, v)| v);
        let slot = if field.deferred {
            quote! { ::std::clone::Clone::clone(&self.#ident) }
        } else {
            quote! { &mut self.#ident }
        };
        quote! {
            ::modbind_core::modules::Field::new(
                #field_name,
                ::modbind_core::modules::Tag::new()#(.with(#keys, #values))*,
                #slot,
            )
        }
    });

    let as_provider = if options.provider {
        quote! {
            fn as_provider(&mut self) -> ::std::option::Option<&mut dyn ::modbind_core::modules::Provider> {
                ::std::option::Option::Some(self)
            }
        }
    } else {
        quote! {}
    };

    Ok(quote! {
        impl #impl_generics ::modbind_core::modules::Module for #struct_name #ty_generics #where_clause {
            fn name(&self) -> &'static str {
                #module_name
            }

            fn fields(&mut self) -> ::std::vec::Vec<::modbind_core::modules::Field<'_>> {
                ::std::vec![#(#descriptors),*]
            }

            #as_provider
        }
    })
}

fn parse_module_options(attrs: &[Attribute]) -> Result<ModuleOptions> {
    let mut options = ModuleOptions::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("module")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                options.name = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("provider") {
                options.provider = true;
                Ok(())
            } else {
                Err(meta.error("expected `name = \"...\"` or `provider`"))
            }
        })?;
    }

    Ok(options)
}

/// Collect every `#[bind]` field in declaration order
fn extract_bound_fields(input: &DeriveInput) -> Result<Vec<BoundField>> {
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unit => return Ok(Vec::new()),
            Fields::Unnamed(_) => {
                return Err(Error::new_spanned(
                    &input.ident,
                    "#[derive(Module)] requires structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new_spanned(
                &input.ident,
                "#[derive(Module)] can only be applied to structs",
            ))
        }
    };

    let mut bound = Vec::new();
    for field in named {
        let Some(ident) = &field.ident else {
            continue;
        };

        let mut pairs = Vec::new();
        let mut tagged = false;
        for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("bind")) {
            tagged = true;
            attr.parse_nested_meta(|meta| {
                let key = meta
                    .path
                    .get_ident()
                    .map(|ident| ident.to_string())
                    .ok_or_else(|| meta.error("expected a tag key"))?;
                let value = if meta.input.peek(Token![=]) {
                    meta.value()?.parse::<LitStr>()?.value()
                } else {
                    String::new()
                };
                pairs.push((key, value));
                Ok(())
            })?;
        }

        if tagged {
            bound.push(BoundField {
                ident: ident.clone(),
                pairs,
                deferred: is_deferred(&field.ty),
            });
        }
    }

    Ok(bound)
}

/// Deferred cells are shared by cloning rather than borrowed
fn is_deferred(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map_or(false, |segment| segment.ident == "Deferred"),
        _ => false,
    }
}
