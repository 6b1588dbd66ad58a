//! `#[hooks]` expansion.
//!
//! Emits the impl block unchanged plus an `impl ::docwire::Hookable` whose
//! reflection lists the tagged methods, and optionally an autoload record.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    Attribute, Expr, FnArg, Ident, ImplItem, ImplItemFn, ItemImpl, Lit, Meta, Token, Type,
    ext::IdentExt,
    parse::{Parse, ParseStream},
};

/// Arguments for the `#[hooks]` macro.
pub(crate) struct HooksArgs {
    /// Expose the route table.
    pub api: bool,
    /// Submit an autoload record.
    pub autoload: bool,
}

impl Parse for HooksArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut api = false;
        let mut autoload = false;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            match ident.to_string().as_str() {
                "api" => api = true,
                "autoload" => autoload = true,
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(HooksArgs { api, autoload })
    }
}

pub(crate) fn expand(args: &HooksArgs, input: &ItemImpl) -> syn::Result<TokenStream> {
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[hooks] must be placed on an inherent impl block",
        ));
    }
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "#[hooks] does not support generic components",
        ));
    }

    let self_ty = &input.self_ty;
    let class_doc = doc_text(&input.attrs);

    let mut methods = Vec::new();
    for item in &input.items {
        if let ImplItem::Fn(method) = item {
            if let Some(tokens) = reflect_method(method)? {
                methods.push(tokens);
            }
        }
    }

    let with_api = args.api.then(|| quote! { .with_api() });

    let autoload = args.autoload.then(|| {
        quote! {
            ::docwire::inventory::submit! {
                ::docwire::Autoload::new(
                    ::core::stringify!(#self_ty),
                    ::docwire::load_default::<#self_ty>,
                )
            }
        }
    });

    Ok(quote! {
        #input

        impl ::docwire::Hookable for #self_ty {
            fn reflection() -> ::docwire::Reflection<Self> {
                ::docwire::Reflection::<Self>::new(::core::any::type_name::<Self>(), #class_doc)
                    #(#methods)*
                    #with_api
            }
        }

        #autoload
    })
}

/// One `.method(..)` call, or `None` for methods that are not reflected.
fn reflect_method(method: &ImplItemFn) -> syn::Result<Option<TokenStream>> {
    let doc = doc_text(&method.attrs);
    if !has_tag(&doc) {
        return Ok(None);
    }

    let sig = &method.sig;
    let receiver = match sig.inputs.first() {
        Some(FnArg::Receiver(receiver)) => receiver,
        _ => return Ok(None),
    };
    if receiver.reference.is_none() || receiver.mutability.is_some() {
        return Err(syn::Error::new_spanned(
            receiver,
            "hooked methods must take `&self`",
        ));
    }
    if !sig.generics.params.is_empty() || sig.asyncness.is_some() {
        return Err(syn::Error::new_spanned(
            sig,
            "hooked methods cannot be generic or async",
        ));
    }

    let fn_name = &sig.ident;
    let name = fn_name.unraw().to_string();

    let mut index = 0usize;
    let mut call_args = Vec::new();
    for input in sig.inputs.iter().skip(1) {
        let FnArg::Typed(pat_type) = input else {
            continue;
        };
        if is_invocation(&pat_type.ty) {
            call_args.push(quote! { inv });
            continue;
        }
        let ty = &pat_type.ty;
        call_args.push(quote! { inv.arg::<#ty>(#index)? });
        index += 1;
    }

    Ok(Some(quote! {
        .method(
            #name,
            #index,
            #doc,
            |this, inv| {
                let _ = &inv;
                ::docwire::IntoReturn::into_return(this.#fn_name(#(#call_args),*))
            },
        )
    }))
}

/// Whether some line of `doc` starts with a method tag, after optional
/// whitespace and one `*`, the way the annotation parser reads it.
fn has_tag(doc: &str) -> bool {
    const SPACED: [&str; 4] = ["action", "filter", "shortcode", "command"];

    doc.lines().any(|line| {
        let line = line.trim_start_matches([' ', '\t']);
        let line = line
            .strip_prefix('*')
            .map_or(line, |rest| rest.trim_start_matches([' ', '\t']));
        let Some(rest) = line.strip_prefix('@') else {
            return false;
        };
        if let Some(after) = rest.strip_prefix("ajax") {
            return !after.starts_with(|c: char| c.is_alphanumeric() || c == '_');
        }
        SPACED.iter().any(|tag| {
            rest.strip_prefix(tag)
                .is_some_and(|after| after.starts_with([' ', '\t']))
        })
    })
}

/// Whether `ty` is `Invocation<'_>` (by last path segment).
fn is_invocation(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Invocation"),
        _ => false,
    }
}

/// Doc attribute values joined with newlines.
fn doc_text(attrs: &[Attribute]) -> String {
    attrs
        .iter()
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) if nv.path.is_ident("doc") => match &nv.value {
                Expr::Lit(expr) => match &expr.lit {
                    Lit::Str(s) => Some(s.value()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}
