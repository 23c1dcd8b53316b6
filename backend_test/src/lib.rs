use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, FnArg, Ident, ItemFn, Pat, Signature, Type};

/// Names a `MockServer` argument may take, one per upstream service.
const UPSTREAMS: [&str; 2] = ["civic", "elections"];

/// Run an asynchronous test against a server whose upstream services are
/// mock servers, injecting whichever of them the test asks for.
///
/// Injectable dependencies are [`rocket::local::asynchronous::Client`] and
/// [`wiremock::MockServer`]; a mock server argument must be named `civic` or
/// `elections` to say which upstream it stands in for. Expectations set on
/// the mock servers are verified when the test finishes.
#[proc_macro_attribute]
pub fn backend_test(_args: TokenStream, input: TokenStream) -> TokenStream {
    let mut item_fn = parse_macro_input!(input as ItemFn);

    // Extract the arguments to inject and reject invalid function signatures.
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

    let upstreams = UPSTREAMS.map(|upstream| format_ident!("{}", upstream));

    // Rewrite the test function.
    quote! {
        #[rocket::async_test]
        async fn #name() {
            log4rs_test_utils::test_logging::init_logging_once_for(
                ["upcoming_elections"],
                None,
                None,
            );

            /// The test itself.
            #item_fn

            // Stand up the upstream services, then a server that talks to them.
            #(
                let #upstreams = wiremock::MockServer::start().await;
            )*
            let server = crate::rocket_for_upstreams(&civic.uri(), &elections.uri());
            let rocket_client = rocket::local::asynchronous::Client::tracked(server)
                .await
                .unwrap();

            #new_name(#(#test_args),*).await;
        }
    }
    .into()
}

/// Ensure the wrapped test is async, and map each parameter to the value
/// injected for it.
fn check_sig(sig: Signature) -> Result<Vec<TokenStream2>, syn::Error> {
    if sig.asyncness.is_none() {
        return Err(syn::Error::new(sig.span(), "Test must be marked `async`"));
    }

    let mut has_client = false;
    let mut seen_upstreams: Vec<Ident> = vec![];
    let mut args = vec![];

    for input in &sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            if let Pat::Ident(pat_ident) = &*pat_type.pat {
                if let Type::Path(type_path) = &*pat_type.ty {
                    // Valid as the last path segment for any type is itself
                    let type_ident = &type_path.path.segments.last().unwrap().ident;
                    if type_ident == "Client" {
                        if has_client {
                            return Err(syn::Error::new(
                                input.span(),
                                "Test cannot accept more than one `rocket::local::asynchronous::Client`",
                            ));
                        }
                        has_client = true;
                        args.push(quote! { rocket_client });
                        continue;
                    } else if type_ident == "MockServer" {
                        let ident = &pat_ident.ident;
                        if !UPSTREAMS.iter().any(|upstream| ident == upstream) {
                            return Err(syn::Error::new(
                                ident.span(),
                                "A `MockServer` argument must be named `civic` or `elections`",
                            ));
                        }
                        if seen_upstreams.contains(ident) {
                            return Err(syn::Error::new(
                                ident.span(),
                                format!("Test cannot accept `{ident}` more than once"),
                            ));
                        }
                        seen_upstreams.push(ident.clone());
                        args.push(quote! { #ident });
                        continue;
                    }
                }
            }
        }

        return Err(syn::Error::new(
            input.span(),
            "Expected one of `client_ident: Client`, `civic: MockServer` or `elections: MockServer`",
        ));
    }

    Ok(args)
}
