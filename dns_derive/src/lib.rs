// helper proc-macros used by the wire-format structures in `iterdns::wire`
use proc_macro::TokenStream;
use syn::parse_macro_input;
use syn::DeriveInput;

mod dns_struct;
use dns_struct::dns_derive;

mod dns_enum;
use dns_enum::dns_enum;

/// Derives `ToFromNetworkOrder` for a struct by calling
/// `to_network_bytes`/`from_network_bytes` on each field in declaration
/// order. Field order must match wire order.
#[proc_macro_derive(DnsStruct)]
pub fn dns_macro_struct(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    dns_derive(&ast)
}

/// Derives `Default`, `TryFrom<u8>`, `TryFrom<u16>` and `FromStr` for a
/// C-like unit-only enum whose variants all carry an integer literal
/// discriminant.
#[proc_macro_derive(DnsEnum)]
pub fn dns_macro_enum(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    dns_enum(&ast)
}

#[cfg(test)]
pub(crate) fn get_derive_input(src: &str) -> DeriveInput {
    syn::parse_str(src).expect("test fixture must parse as an item")
}
