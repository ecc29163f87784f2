//! Derive macro for `harness_kit::ComponentHarness`.
//!
//! Writing the trait impl by hand means repeating the same three items for
//! every harness. The derive generates them from one attribute:
//!
//! ```ignore
//! use harness_kit::{ComponentHarness, LocatorFactory};
//!
//! #[derive(ComponentHarness)]
//! #[harness(host = ".ui-chip, .ui-chip-option", ancestor = ".ui-chip-set")]
//! pub struct ChipHarness {
//!     factory: LocatorFactory,
//! }
//! ```
//!
//! # Attributes
//!
//! - `host = "..."` (required): host selector, comma-separated alternatives allowed
//! - `ancestor = "..."`: selector an ancestor of every host must match
//! - `name = "..."`: name used in query descriptions (defaults to the type name)
//!
//! The factory field is the only field, or the one marked `#[harness(factory)]`.
//! Any other field is filled with `Default::default()`.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr, Member};

/// Derive `ComponentHarness` for a struct wrapping a `LocatorFactory`.
#[proc_macro_derive(ComponentHarness, attributes(harness))]
pub fn derive_component_harness(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[derive(Default)]
struct HarnessArgs {
    host: Option<LitStr>,
    ancestor: Option<LitStr>,
    name: Option<LitStr>,
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let ident = &input.ident;
    let args = parse_type_attributes(input)?;

    let host = args.host.ok_or_else(|| {
        syn::Error::new(
            Span::call_site(),
            "missing #[harness(host = \"...\")] on a ComponentHarness derive",
        )
    })?;
    check_selector(&host)?;

    let ancestor = match &args.ancestor {
        Some(ancestor) => {
            check_selector(ancestor)?;
            quote! { ::core::option::Option::Some(#ancestor) }
        }
        None => quote! { ::core::option::Option::None },
    };
    let name = args
        .name
        .map_or_else(|| ident.to_string(), |name| name.value());

    let layout = factory_layout(input)?;
    let factory_member = &layout.factory;
    let construct = layout.constructor();

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::harness_kit::ComponentHarness for #ident #ty_generics #where_clause {
            const HOST_SELECTOR: &'static str = #host;
            const ANCESTOR_SELECTOR: ::core::option::Option<&'static str> = #ancestor;

            fn from_locator_factory(factory: ::harness_kit::LocatorFactory) -> Self {
                #construct
            }

            fn locator_factory(&self) -> &::harness_kit::LocatorFactory {
                &self.#factory_member
            }

            fn harness_name() -> &'static str {
                #name
            }
        }
    })
}

fn parse_type_attributes(input: &DeriveInput) -> syn::Result<HarnessArgs> {
    let mut args = HarnessArgs::default();
    for attr in &input.attrs {
        if !attr.path().is_ident("harness") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let slot = if meta.path.is_ident("host") {
                &mut args.host
            } else if meta.path.is_ident("ancestor") {
                &mut args.ancestor
            } else if meta.path.is_ident("name") {
                &mut args.name
            } else {
                return Err(meta.error("expected `host`, `ancestor` or `name`"));
            };
            if slot.is_some() {
                return Err(meta.error("duplicate harness attribute"));
            }
            *slot = Some(meta.value()?.parse()?);
            Ok(())
        })?;
    }
    Ok(args)
}

/// Reject selector lists with empty alternatives at compile time
fn check_selector(selector: &LitStr) -> syn::Result<()> {
    let value = selector.value();
    if split_alternatives(&value).iter().any(|alt| alt.is_empty()) {
        return Err(syn::Error::new(
            selector.span(),
            "selector list contains an empty alternative",
        ));
    }
    Ok(())
}

/// Top-level comma split, ignoring commas inside brackets, parens and quotes
fn split_alternatives(selector: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    for ch in selector.chars() {
        match (quote, ch) {
            (Some(open), _) if ch == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '[' | '(') => depth += 1,
            (None, ']' | ')') => depth -= 1,
            (None, ',') if depth == 0 => {
                out.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    out.push(current.trim().to_string());
    out
}

struct FactoryLayout {
    factory: Member,
    others: Vec<Member>,
    tuple: bool,
}

impl FactoryLayout {
    fn constructor(&self) -> proc_macro2::TokenStream {
        let factory = &self.factory;
        let others = &self.others;
        if self.tuple {
            let mut slots: Vec<(u32, proc_macro2::TokenStream)> = self
                .others
                .iter()
                .map(|member| (member_index(member), quote! { ::core::default::Default::default() }))
                .collect();
            slots.push((member_index(factory), quote! { factory }));
            slots.sort_by_key(|(index, _)| *index);
            let values = slots.into_iter().map(|(_, value)| value);
            quote! { Self(#(#values),*) }
        } else {
            quote! {
                Self {
                    #factory: factory,
                    #(#others: ::core::default::Default::default(),)*
                }
            }
        }
    }
}

fn member_index(member: &Member) -> u32 {
    match member {
        Member::Unnamed(index) => index.index,
        Member::Named(_) => 0,
    }
}

fn factory_layout(input: &DeriveInput) -> syn::Result<FactoryLayout> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "ComponentHarness can only be derived for structs",
        ));
    };
    let tuple = matches!(data.fields, Fields::Unnamed(_));
    let members: Vec<(Member, bool)> = data
        .fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let member = field.ident.clone().map_or_else(
                || Member::Unnamed(syn::Index::from(index)),
                Member::Named,
            );
            (member, is_marked_factory(field))
        })
        .collect();

    let marked: Vec<usize> = members
        .iter()
        .enumerate()
        .filter_map(|(index, (_, marked))| marked.then_some(index))
        .collect();
    let factory_index = match (marked.as_slice(), members.len()) {
        ([index], _) => *index,
        ([], 1) => 0,
        ([], 0) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "a harness needs a field holding its LocatorFactory",
            ))
        }
        ([], _) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "mark the LocatorFactory field with #[harness(factory)]",
            ))
        }
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "only one field can be #[harness(factory)]",
            ))
        }
    };

    let mut others = Vec::new();
    let mut factory = None;
    for (index, (member, _)) in members.into_iter().enumerate() {
        if index == factory_index {
            factory = Some(member);
        } else {
            others.push(member);
        }
    }
    let factory = factory.ok_or_else(|| syn::Error::new_spanned(&input.ident, "factory field missing"))?;
    Ok(FactoryLayout {
        factory,
        others,
        tuple,
    })
}

fn is_marked_factory(field: &syn::Field) -> bool {
    field.attrs.iter().any(|attr| {
        attr.path().is_ident("harness")
            && attr
                .parse_args::<syn::Ident>()
                .is_ok_and(|ident| ident == "factory")
    })
}
