use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, FnArg, ItemFn, Pat, Signature, Type};

/// Transform an asynchronous test into a synchronous one, run it against a
/// server backed by an in-memory store and a recording mailer, and inject
/// dependencies.
///
/// Injectable dependencies are [`rocket::local::asynchronous::Client`],
/// `crate::store::MemoryStore` (the store behind the server) and
/// `crate::notify::Outbox` (every mail the server sends).
#[proc_macro_attribute]
pub fn backend_test(_args: TokenStream, input: TokenStream) -> TokenStream {
    let mut item_fn = parse_macro_input!(input as ItemFn);

    // Extract the parameters to inject and reject invalid function signatures.
    let test_args = match check_sig(item_fn.sig.clone()) {
        Ok(args) => args,
        Err(err) => {
            return err.into_compile_error().into();
        }
    };

    // Rename the future so the test can have its original name.
    let name = item_fn.sig.ident.clone();
    let new_name = format_ident!("{}_fut", name);
    item_fn.sig.ident = new_name.clone();

    // Rewrite the test function.
    quote! {
        #[test]
        fn #name() {
            /// The test itself.
            #item_fn

            log4rs_test_utils::test_logging::init_logging_once_for(["survey_backend"], None, None);

            // The mailer's delivery task lives on this runtime, so everything
            // has to be set up inside it.
            let runtime = rocket::tokio::runtime::Builder::new_multi_thread()
                .thread_name("rocket-worker-test-thread")
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();

            runtime.block_on(async {
                let store = crate::store::MemoryStore::default();
                let outbox = crate::notify::Outbox::default();
                let mailer = crate::notify::Mailer::spawn(outbox.clone());
                let server = crate::rocket_for_store_and_mailer(
                    crate::store::Store::new(store.clone()),
                    mailer,
                );
                let rocket_client = rocket::local::asynchronous::Client::tracked(server)
                    .await
                    .unwrap();

                #new_name(#(#test_args),*).await;
            });
        }
    }
    .into()
}

/// Ensure the wrapped test is async, extract parameters to inject, and reject unknown parameters.
fn check_sig(sig: Signature) -> Result<Vec<TokenStream2>, syn::Error> {
    if sig.asyncness.is_none() {
        return Err(syn::Error::new(sig.span(), "Test must be marked `async`"));
    }

    let mut seen = vec![];
    let mut args = vec![];

    for input in &sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            if let Pat::Ident(_) = &*pat_type.pat {
                if let Type::Path(type_path) = &*pat_type.ty {
                    if let Some(type_ident) = type_path.path.get_ident() {
                        let arg = if type_ident == "Client" {
                            quote! { rocket_client }
                        } else if type_ident == "MemoryStore" {
                            quote! { store.clone() }
                        } else if type_ident == "Outbox" {
                            quote! { outbox.clone() }
                        } else {
                            return Err(unexpected(input));
                        };

                        if seen.contains(type_ident) {
                            return Err(syn::Error::new(
                                input.span(),
                                format!("Test cannot accept more than one `{type_ident}`"),
                            ));
                        }
                        seen.push(type_ident.clone());
                        args.push(arg);
                        continue;
                    }
                }
            }
        }

        return Err(unexpected(input));
    }

    Ok(args)
}

fn unexpected(input: &FnArg) -> syn::Error {
    syn::Error::new(
        input.span(),
        "Expected one of `client_ident: Client`, `store_ident: MemoryStore` \
         or `outbox_ident: Outbox`",
    )
}
