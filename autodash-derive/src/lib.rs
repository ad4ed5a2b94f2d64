use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, LitStr, Meta, Type};

/// Derive macro describing the CSV columns a record struct reads.
///
/// For each field, extracts:
/// - Column name (respects `#[serde(rename = "...")]`)
/// - Required (false for `Option<T>` or `#[serde(default)]` fields)
/// - Description (from doc comments)
///
/// Generates a `csv_columns() -> &'static [CsvColumn]` method. A `CsvColumn`
/// type with `name`, `required` and `description` fields must be in scope.
#[proc_macro_derive(CsvColumns, attributes(serde))]
pub fn derive_csv_columns(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(name, "CsvColumns needs named fields")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "CsvColumns only supports structs")
                .to_compile_error()
                .into()
        }
    };

    let mut columns = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let attrs = match SerdeAttrs::parse(&field.attrs) {
            Ok(attrs) => attrs,
            Err(err) => return err.to_compile_error().into(),
        };
        let column = attrs.rename.unwrap_or_else(|| ident.to_string());
        let required = !attrs.default && !is_option_type(&field.ty);
        let description = doc_comment(&field.attrs);
        columns.push(quote! {
            CsvColumn {
                name: #column,
                required: #required,
                description: #description,
            }
        });
    }

    let expanded = quote! {
        impl #name {
            pub fn csv_columns() -> &'static [CsvColumn] {
                static COLUMNS: &[CsvColumn] = &[
                    #(#columns),*
                ];
                COLUMNS
            }
        }
    };

    TokenStream::from(expanded)
}

#[derive(Default)]
struct SerdeAttrs {
    rename: Option<String>,
    default: bool,
}

impl SerdeAttrs {
    fn parse(attrs: &[syn::Attribute]) -> syn::Result<Self> {
        let mut parsed = SerdeAttrs::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    parsed.rename = Some(value.value());
                } else if meta.path.is_ident("default") {
                    parsed.default = true;
                    if meta.input.peek(syn::Token![=]) {
                        let _: Lit = meta.value()?.parse()?;
                    }
                } else if meta.input.peek(syn::Token![=]) {
                    // deserialize_with, alias and friends don't affect the column
                    let _: Lit = meta.value()?.parse()?;
                }
                Ok(())
            })?;
        }
        Ok(parsed)
    }
}

fn doc_comment(attrs: &[syn::Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(meta) => match &meta.value {
                syn::Expr::Lit(expr_lit) => match &expr_lit.lit {
                    Lit::Str(lit_str) => Some(lit_str.value().trim().to_string()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_option_type(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        _ => false,
    }
}
