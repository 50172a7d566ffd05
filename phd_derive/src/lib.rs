use std::borrow::Cow;

use proc_macro2::{TokenStream, Ident, Span};
use syn::{DeriveInput, Data, Fields, DataStruct, FieldsNamed, FieldsUnnamed};
use quote::quote;

fn decode_derive_impl(input: &DeriveInput) -> TokenStream {
	let (fields, tuple) = match &input.data {
		Data::Struct(DataStruct { fields: Fields::Named(FieldsNamed { named, .. }), .. }) => (named, false),
		Data::Struct(DataStruct { fields: Fields::Unnamed(FieldsUnnamed { unnamed, .. }), .. }) => (unnamed, true),
		_ => unimplemented!("only tuple struct or struct with named fields supported"),
	};
	let mut body = quote! {};
	let mut initializer = quote! {};
	let mut tuple_field_num = 0u8..;
	for field in fields {
		let mut field_expr = quote! { Decode::decode(cursor) };
		for attr in &field.attrs {
			if let Some(ident) = attr.path().get_ident() {
				match ident.to_string().as_str() {
					"list_u16" => field_expr = quote! { read_list::<_, u16>(cursor) },//read a u16, read that many items
					"list_u32" => field_expr = quote! { read_list::<_, u32>(cursor) },//read a u32, read that many items
					_ => {},
				}
			}
		}
		field_expr = quote! { phd_reader::#field_expr? };
		let field_ident = match &field.ident {
			Some(field_ident) => Cow::Borrowed(field_ident),
			None => Cow::Owned(Ident::new(&format!("field{}", tuple_field_num.next().unwrap()), Span::call_site())),
		};
		body = quote! {
			#body
			let #field_ident = #field_expr;
		};
		initializer = quote! { #initializer #field_ident, };
	}
	initializer = if tuple { quote! { (#initializer) } } else { quote! { {#initializer} } };
	let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
	let type_name = &input.ident;
	quote! {
		impl #impl_generics phd_reader::Decode for #type_name #ty_generics #where_clause {
			fn decode(cursor: &mut phd_reader::Cursor) -> phd_reader::DecodeResult<Self> {
				#body
				Ok(#type_name #initializer)
			}
		}
	}
}

#[proc_macro_derive(
	Decode,
	attributes(
		list_u16,
		list_u32,
	)
)]
pub fn decode_derive(tokens: proc_macro::TokenStream) -> proc_macro::TokenStream {
	decode_derive_impl(&syn::parse_macro_input!(tokens)).into()
}
