//! The derive macro for `relocation::Relocatable`.
//!
//! Generates one `repair`/`seal_fields`/`unseal_fields` trio per decorated
//! type, walking fields in declaration order and deferring entirely to each
//! field's own `Relocatable` impl. There is no runtime type registry and no
//! reflection; everything here runs once, at expansion time.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Data, DataEnum, DataStruct, DataUnion, DeriveInput, Fields, Index,
};

/// `#[derive(Relocatable)]`
///
/// Supported on:
/// - `struct`s with named or tuple fields: fields are walked in declaration
///   order.
/// - `enum`s with data-carrying variants: Rust's own discriminant serves as
///   the tag, matched over and never touched by seal/unseal; only the
///   active variant's fields are walked.
/// - `union`s: permitted only if every field is provably pointer-free,
///   enforced with a `const` assertion that fails to compile otherwise.
///   There is no way to know which field is active without a tag, so a
///   union containing a pointer has no sound traversal.
///
/// A field whose type never implements `Relocatable` (a raw pointer, a
/// function pointer, an opaque extern type, ...) makes the whole `derive`
/// fail with an unsatisfied trait bound, a compile-time rejection that
/// falls directly out of there being no blanket impl for those types,
/// rather than from any check in this macro.
#[proc_macro_derive(Relocatable)]
pub fn derive_relocatable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let expanded = match &input.data {
        Data::Struct(data) => derive_struct(&input, data),
        Data::Enum(data) => derive_enum(&input, data),
        Data::Union(data) => derive_union(&input, data),
    };
    TokenStream::from(expanded)
}

/// Every generic type parameter on the decorated item gets a
/// `: ::relocation::Relocatable` bound added, matching the common derive
/// convention (serde's derive does the same) so that `MyStruct<T>` only
/// implements `Relocatable` when `T` does too.
fn add_relocatable_bounds(generics: &syn::Generics) -> syn::Generics {
    let mut generics = generics.clone();
    for param in generics.params.iter_mut() {
        if let syn::GenericParam::Type(type_param) = param {
            type_param
                .bounds
                .push(syn::parse_quote!(::relocation::Relocatable));
        }
    }
    generics
}

fn field_accessors(fields: &Fields) -> Vec<TokenStream2> {
    match fields {
        Fields::Named(named) => named
            .named
            .iter()
            .map(|f| {
                let ident = f.ident.as_ref().unwrap();
                quote! { #ident }
            })
            .collect(),
        Fields::Unnamed(unnamed) => (0..unnamed.unnamed.len())
            .map(|i| {
                let index = Index::from(i);
                quote! { #index }
            })
            .collect(),
        Fields::Unit => Vec::new(),
    }
}

fn derive_struct(input: &DeriveInput, data: &DataStruct) -> TokenStream2 {
    let name = &input.ident;
    let generics = add_relocatable_bounds(&input.generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let accessors = field_accessors(&data.fields);
    let contains_pointer = field_types(&data.fields)
        .map(|ty| quote! { <#ty as ::relocation::Relocatable>::CONTAINS_POINTER })
        .fold(quote! { false }, |acc, next| quote! { #acc || #next });

    let repair_calls = accessors
        .iter()
        .map(|field| quote! { ::relocation::Relocatable::repair(&mut self.#field, alloc)?; });
    let seal_calls = accessors.iter().map(
        |field| quote! { ::relocation::Relocatable::seal_fields(&mut self.#field, region_base, region_size)?; },
    );
    let unseal_calls = accessors.iter().map(
        |field| quote! { ::relocation::Relocatable::unseal_fields(&mut self.#field, region_base, region_size)?; },
    );

    quote! {
        unsafe impl #impl_generics ::relocation::Relocatable for #name #ty_generics #where_clause {
            const CONTAINS_POINTER: bool = #contains_pointer;

            #[inline]
            unsafe fn repair<RelocAlloc: ::relocation::Allocator>(
                &mut self,
                alloc: &mut RelocAlloc,
            ) -> ::core::result::Result<(), ::relocation::Error> {
                if Self::CONTAINS_POINTER {
                    #(#repair_calls)*
                }
                ::core::result::Result::Ok(())
            }

            #[inline]
            unsafe fn seal_fields(
                &mut self,
                region_base: usize,
                region_size: usize,
            ) -> ::core::result::Result<(), ::relocation::Error> {
                if Self::CONTAINS_POINTER {
                    #(#seal_calls)*
                }
                ::core::result::Result::Ok(())
            }

            #[inline]
            unsafe fn unseal_fields(
                &mut self,
                region_base: usize,
                region_size: usize,
            ) -> ::core::result::Result<(), ::relocation::Error> {
                if Self::CONTAINS_POINTER {
                    #(#unseal_calls)*
                }
                ::core::result::Result::Ok(())
            }
        }
    }
}

fn field_types(fields: &Fields) -> impl Iterator<Item = &syn::Type> {
    fields.iter().map(|f| &f.ty)
}

fn derive_enum(input: &DeriveInput, data: &DataEnum) -> TokenStream2 {
    let name = &input.ident;
    let generics = add_relocatable_bounds(&input.generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut contains_pointer = quote! { false };
    let mut repair_arms = Vec::new();
    let mut seal_arms = Vec::new();
    let mut unseal_arms = Vec::new();

    for variant in &data.variants {
        let variant_ident = &variant.ident;
        for ty in field_types(&variant.fields) {
            contains_pointer = quote! { #contains_pointer || <#ty as ::relocation::Relocatable>::CONTAINS_POINTER };
        }

        let (pattern, bindings) = variant_pattern(&variant.fields);
        repair_arms.push(quote! {
            #name::#variant_ident #pattern => {
                #( ::relocation::Relocatable::repair(#bindings, alloc)?; )*
            }
        });
        seal_arms.push(quote! {
            #name::#variant_ident #pattern => {
                #( ::relocation::Relocatable::seal_fields(#bindings, region_base, region_size)?; )*
            }
        });
        unseal_arms.push(quote! {
            #name::#variant_ident #pattern => {
                #( ::relocation::Relocatable::unseal_fields(#bindings, region_base, region_size)?; )*
            }
        });
    }

    quote! {
        unsafe impl #impl_generics ::relocation::Relocatable for #name #ty_generics #where_clause {
            const CONTAINS_POINTER: bool = #contains_pointer;

            #[inline]
            unsafe fn repair<RelocAlloc: ::relocation::Allocator>(
                &mut self,
                alloc: &mut RelocAlloc,
            ) -> ::core::result::Result<(), ::relocation::Error> {
                if Self::CONTAINS_POINTER {
                    match self {
                        #(#repair_arms)*
                    }
                }
                ::core::result::Result::Ok(())
            }

            #[inline]
            unsafe fn seal_fields(
                &mut self,
                region_base: usize,
                region_size: usize,
            ) -> ::core::result::Result<(), ::relocation::Error> {
                if Self::CONTAINS_POINTER {
                    match self {
                        #(#seal_arms)*
                    }
                }
                ::core::result::Result::Ok(())
            }

            #[inline]
            unsafe fn unseal_fields(
                &mut self,
                region_base: usize,
                region_size: usize,
            ) -> ::core::result::Result<(), ::relocation::Error> {
                if Self::CONTAINS_POINTER {
                    match self {
                        #(#unseal_arms)*
                    }
                }
                ::core::result::Result::Ok(())
            }
        }
    }
}

/// Builds a match pattern binding every field of a variant by mutable
/// reference, plus the list of binding expressions in declaration order
/// (tag dispatch and field order both come straight from Rust's own
/// `match`, not from anything this macro tracks itself).
fn variant_pattern(fields: &Fields) -> (TokenStream2, Vec<TokenStream2>) {
    match fields {
        Fields::Named(named) => {
            let idents: Vec<_> = named.named.iter().map(|f| f.ident.clone().unwrap()).collect();
            let pattern = quote! { { #(#idents),* } };
            let bindings = idents.iter().map(|i| quote! { #i }).collect();
            (pattern, bindings)
        }
        Fields::Unnamed(unnamed) => {
            let idents: Vec<_> = (0..unnamed.unnamed.len())
                .map(|i| syn::Ident::new(&format!("field_{i}"), proc_macro2::Span::call_site()))
                .collect();
            let pattern = quote! { ( #(#idents),* ) };
            let bindings = idents.iter().map(|i| quote! { #i }).collect();
            (pattern, bindings)
        }
        Fields::Unit => (quote! {}, Vec::new()),
    }
}

/// Untagged sums are only sound when no variant (here, no field) can ever
/// contain a pointer, because there is no tag to say which field is the
/// live one. We can't check that at expansion time, since field types may
/// be generic, so we emit a `const` assertion that the compiler evaluates
/// when monomorphising, turning a pointer-containing field into a hard
/// build failure with a direct message instead of silent unsoundness.
fn derive_union(input: &DeriveInput, data: &DataUnion) -> TokenStream2 {
    let name = &input.ident;
    let generics = add_relocatable_bounds(&input.generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let assertions = data.fields.named.iter().map(|f| {
        let ty = &f.ty;
        quote! {
            const _: () = ::core::assert!(
                !<#ty as ::relocation::Relocatable>::CONTAINS_POINTER,
                "relocation: untagged sum (union) fields must not contain pointers",
            );
        }
    });

    quote! {
        #(#assertions)*

        unsafe impl #impl_generics ::relocation::Relocatable for #name #ty_generics #where_clause {
            const CONTAINS_POINTER: bool = false;

            #[inline]
            unsafe fn repair<RelocAlloc: ::relocation::Allocator>(
                &mut self,
                _alloc: &mut RelocAlloc,
            ) -> ::core::result::Result<(), ::relocation::Error> {
                ::core::result::Result::Ok(())
            }

            #[inline]
            unsafe fn seal_fields(
                &mut self,
                _region_base: usize,
                _region_size: usize,
            ) -> ::core::result::Result<(), ::relocation::Error> {
                ::core::result::Result::Ok(())
            }

            #[inline]
            unsafe fn unseal_fields(
                &mut self,
                _region_base: usize,
                _region_size: usize,
            ) -> ::core::result::Result<(), ::relocation::Error> {
                ::core::result::Result::Ok(())
            }
        }
    }
}
