//! Derive macros for fieldsift
//!
//! `#[derive(ExtractSchema)]` turns a struct of text fields into an
//! extraction schema and a constructor from completed records.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::Parse, parse_macro_input, Data, DeriveInput, Fields, GenericArgument, LitStr,
    PathArguments, Token, Type,
};

/// Derives `SchemaInfo` and `FromExtraction` for a struct.
///
/// Every field must be a `String` or an `Option<String>`. Field order is the
/// schema order. Without attributes a field's only synonym is its name with
/// underscores replaced by spaces.
///
/// # Example
///
/// ```ignore
/// use fieldsift::{schema::SchemaInfo, ExtractSchema};
///
/// #[derive(ExtractSchema)]
/// struct TrialSummary {
///     #[extract(synonyms("efficacy", "effective"), description = "effectiveness findings")]
///     efficacy: String,
///     adverse_events: Option<String>,
/// }
///
/// let schema = TrialSummary::schema();
/// assert_eq!(schema.fields()[1].synonyms, vec!["adverse events"]);
/// ```
#[proc_macro_derive(ExtractSchema, attributes(extract))]
pub fn derive_extract_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => err.to_compile_error().into(),
    }
}

/// One struct field after attribute parsing.
struct FieldSpec {
    ident: syn::Ident,
    name: String,
    synonyms: Vec<String>,
    description: Option<String>,
    optional: bool,
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named
                .named
                .iter()
                .map(parse_field)
                .collect::<syn::Result<Vec<_>>>()?,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "ExtractSchema requires a struct with named fields",
                ))
            }
        },
        Data::Enum(_) | Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                name,
                "ExtractSchema can only be derived for structs",
            ))
        }
    };

    if fields.is_empty() {
        return Err(syn::Error::new_spanned(
            name,
            "ExtractSchema requires at least one field",
        ));
    }

    let field_defs = fields.iter().map(|f| {
        let field_name = &f.name;
        let synonyms = &f.synonyms;
        let description = match &f.description {
            Some(text) => quote! { .with_description(#text) },
            None => quote! {},
        };
        quote! {
            ::fieldsift::schema::FieldDef::new(#field_name, [#(#synonyms),*]) #description
        }
    });

    let field_inits = fields.iter().map(|f| {
        let ident = &f.ident;
        let field_name = &f.name;
        if f.optional {
            quote! {
                #ident: result
                    .get(#field_name)
                    .filter(|_| !result.is_sentinel(#field_name))
                    .map(::std::string::ToString::to_string)
            }
        } else {
            quote! {
                #ident: result.get(#field_name).unwrap_or_default().to_string()
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::fieldsift::schema::SchemaInfo for #name #ty_generics #where_clause {
            fn schema() -> ::fieldsift::schema::Schema {
                ::fieldsift::schema::Schema::from_derived(vec![#(#field_defs),*])
            }
        }

        impl #impl_generics ::fieldsift::result::FromExtraction for #name #ty_generics #where_clause {
            fn from_extraction(result: &::fieldsift::result::ExtractionResult) -> Self {
                Self {
                    #(#field_inits),*
                }
            }
        }
    })
}

fn parse_field(field: &syn::Field) -> syn::Result<FieldSpec> {
    let Some(ident) = field.ident.clone() else {
        return Err(syn::Error::new_spanned(field, "expected a named field"));
    };
    let name = ident.to_string();

    let optional = match text_kind(&field.ty) {
        Some(optional) => optional,
        None => {
            return Err(syn::Error::new_spanned(
                &field.ty,
                "ExtractSchema fields must be `String` or `Option<String>`",
            ))
        }
    };

    let mut synonyms = Vec::new();
    let mut description = None;

    for attr in &field.attrs {
        if !attr.path().is_ident("extract") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("synonyms") {
                let content;
                syn::parenthesized!(content in meta.input);
                let list = content.parse_terminated(<LitStr as Parse>::parse, Token![,])?;
                for lit in list {
                    let value = lit.value();
                    if value.trim().is_empty() {
                        return Err(syn::Error::new_spanned(lit, "synonyms must not be blank"));
                    }
                    synonyms.push(value);
                }
                Ok(())
            } else if meta.path.is_ident("description") {
                let lit: LitStr = meta.value()?.parse()?;
                description = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unsupported extract attribute, expected `synonyms` or `description`"))
            }
        })?;
    }

    if synonyms.is_empty() {
        synonyms.push(name.replace('_', " "));
    }

    Ok(FieldSpec {
        ident,
        name,
        synonyms,
        description,
        optional,
    })
}

/// `Some(false)` for `String`, `Some(true)` for `Option<String>`, else `None`.
fn text_kind(ty: &Type) -> Option<bool> {
    if is_string(ty) {
        return Some(false);
    }

    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if is_string(inner) => Some(true),
        _ => None,
    }
}

fn is_string(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "String" && segment.arguments.is_empty()),
        _ => false,
    }
}
