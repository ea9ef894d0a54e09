use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Expr, Token};

/// Waits on a fixed list of `tessera` handles, yielding their values.
///
/// See `tessera::join!` for the user-facing documentation.
#[proc_macro]
pub fn join(input: TokenStream) -> TokenStream {
    let parser = Punctuated::<Expr, Token![,]>::parse_terminated;

    match parser.parse(input) {
        Ok(handles) => expand_join(&handles).into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Binds every handle expression first so that all of them are evaluated
/// (and their tasks spawned) before the first wait.
fn expand_join(handles: &Punctuated<Expr, Token![,]>) -> TokenStream2 {
    match handles.len() {
        0 => quote!(()),
        1 => {
            let handle = &handles[0];
            quote! {
                ::tessera::task::JoinHandle::wait(#handle)
            }
        }
        count => {
            let bindings: Vec<_> = (0..count).map(|i| format_ident!("__handle{}", i)).collect();
            let exprs = handles.iter();

            quote! {
                {
                    #( let #bindings = #exprs; )*
                    ( #( ::tessera::task::JoinHandle::wait(#bindings), )* )
                }
            }
        }
    }
}
