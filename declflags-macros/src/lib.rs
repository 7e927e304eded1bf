mod ast;
mod emit;
mod parse;

use parse::Derive;

#[cfg(not(test))]
#[proc_macro_derive(Args, attributes(binary_path, switch, argument, completer, register_completer))]
pub fn derive_args(ts: proc_macro::TokenStream) -> proc_macro::TokenStream {
    expand(Derive::Args, ts)
}

#[cfg(not(test))]
#[proc_macro_derive(Value)]
pub fn derive_value(ts: proc_macro::TokenStream) -> proc_macro::TokenStream {
    expand(Derive::Value, ts)
}

#[cfg(not(test))]
#[proc_macro_derive(Group)]
pub fn derive_group(ts: proc_macro::TokenStream) -> proc_macro::TokenStream {
    expand(Derive::Group, ts)
}

#[cfg(not(test))]
fn expand(derive: Derive, ts: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let text = compile_tokens(derive, ts.into());
    text.parse().unwrap()
}

fn compile_tokens(derive: Derive, ts: proc_macro2::TokenStream) -> String {
    match parse::parse(ts, derive) {
        Ok(item) => emit::emit(&item),
        Err(err) => emit::emit_error(&err.to_string()),
    }
}

#[cfg(test)]
pub(crate) fn compile(derive: Derive, src: &str) -> String {
    let ts = src.parse::<proc_macro2::TokenStream>().unwrap();
    compile_tokens(derive, ts)
}
