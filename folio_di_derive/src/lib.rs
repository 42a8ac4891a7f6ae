use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Field, Fields};

/// Derive `folio_di::Build` for a struct.
///
/// Every field is built from the provider, except fields marked `#[state]`,
/// which are initialized with `Default::default()`. The result is stored in
/// the provider cache.
#[proc_macro_derive(Build, attributes(state))]
pub fn derive_build(input: TokenStream) -> TokenStream {
    let DeriveInput {
        ident,
        generics,
        data,
        ..
    } = parse_macro_input!(input as DeriveInput);

    let Data::Struct(data) = data else {
        return quote! { ::core::compile_error!("Build can only be derived for structs"); }.into();
    };

    let params = generics
        .type_params()
        .map(|param| &param.ident)
        .collect::<Vec<_>>();

    let bounds = data
        .fields
        .iter()
        .filter(|field| !is_state(field))
        .map(|Field { ty, .. }| quote! { #ty: ::folio_di::Build<__Provider> });

    let construct = construct(&data.fields);

    quote! {
        impl<__Provider, #(#params),*> ::folio_di::Build<__Provider> for #ident<#(#params),*>
        where
            Self: ::core::clone::Clone + 'static,
            __Provider: ::folio_di::Provider,
            #(#bounds),*
        {
            fn build(provider: &mut __Provider) -> Self {
                if let ::core::option::Option::Some(cached) =
                    ::folio_di::Provider::cache(provider).get::<Self>()
                {
                    return ::core::clone::Clone::clone(cached);
                }

                let value = #construct;
                ::folio_di::Provider::cache(provider).insert(::core::clone::Clone::clone(&value));
                value
            }
        }
    }
    .into()
}

fn construct(fields: &Fields) -> TokenStream2 {
    match fields {
        Fields::Named(named) => {
            let inits = named.named.iter().map(|field| {
                let ident = &field.ident;
                let value = initializer(field);
                quote! { #ident: #value }
            });
            quote! { Self { #(#inits),* } }
        }
        Fields::Unnamed(unnamed) => {
            let inits = unnamed.unnamed.iter().map(initializer);
            quote! { Self( #(#inits),* ) }
        }
        Fields::Unit => quote! { Self },
    }
}

fn initializer(field: &Field) -> TokenStream2 {
    if is_state(field) {
        quote! { ::core::default::Default::default() }
    } else {
        quote! { ::folio_di::Build::build(provider) }
    }
}

fn is_state(field: &Field) -> bool {
    field.attrs.iter().any(|attr| attr.path().is_ident("state"))
}
