use proc_macro::TokenStream;
use syn::{ItemImpl, parse_macro_input};

mod hooks;

/// Build the static reflection of a component from an inherent impl block.
///
/// The doc comment on the impl block is the class documentation, where
/// `@api-<key> <value>` lines live. Every `&self` method with a doc line
/// starting with `@action`, `@filter`, `@shortcode`, `@ajax` or `@command` is
/// reflected with its parameter count and doc text; other methods are left
/// alone and may take any parameter types.
/// Parameters are decoded from the host's arguments, so they must be owned
/// deserializable types. A parameter of type `Invocation<'_>` receives the
/// call itself and does not count as an argument.
///
/// # Options
///
/// - `api`: expose the route table (the type must implement `ApiComponent`)
/// - `autoload`: submit the component for `Registry::load_registered`
///
/// # Example
///
/// ```rust,ignore
/// /// @api-namespace acme
/// #[docwire::hooks(api)]
/// impl Forms {
///     /// @action save_post, 20
///     fn on_save(&self, post_id: u64) {}
///
///     /// @filter the_title
///     fn title(&self, title: String) -> String {
///         title.to_uppercase()
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn hooks(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as hooks::HooksArgs);
    let input = parse_macro_input!(item as ItemImpl);

    match hooks::expand(&args, &input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
