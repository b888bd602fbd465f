use proc_macro::TokenStream;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Expr, ExprLit, Fields, Lit, LitStr, Meta, Type,
};

const ATTR: &str = "apivalidator";

/// Marks a struct as an apigen parameter record.
///
/// The derive expands to nothing on success. Its job is to register the
/// `apivalidator` field attribute so tagged records compile, and to reject
/// constraint strings the generator would refuse later on:
///
/// ```rust,ignore
/// #[derive(Deserialize, ApiParams)]
/// pub struct CreateParams {
///     #[apivalidator("required,min=10")]
///     pub login: String,
///     #[apivalidator("min=0,max=128")]
///     pub age: i32,
/// }
/// ```
#[proc_macro_derive(ApiParams, attributes(apivalidator))]
pub fn derive_api_params(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match check_record(&input) {
        Ok(()) => TokenStream::new(),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn check_record(input: &DeriveInput) -> syn::Result<()> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unit => return Ok(()),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new(
                    input.ident.span(),
                    "ApiParams requires a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new(
                input.ident.span(),
                "ApiParams can only be derived for structs",
            ))
        }
    };

    let mut errors: Option<syn::Error> = None;
    for field in fields {
        for attr in field.attrs.iter().filter(|a| a.path().is_ident(ATTR)) {
            if let Err(err) = tag_literal(attr).and_then(|lit| check_tag(&lit, &field.ty)) {
                match errors.as_mut() {
                    Some(acc) => acc.combine(err),
                    None => errors = Some(err),
                }
            }
        }
    }
    match errors {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn tag_literal(attr: &Attribute) -> syn::Result<LitStr> {
    match &attr.meta {
        Meta::List(_) => attr.parse_args::<LitStr>(),
        Meta::NameValue(nv) => match &nv.value {
            Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) => Ok(s.clone()),
            other => Err(syn::Error::new_spanned(other, "expected a string literal")),
        },
        Meta::Path(path) => Err(syn::Error::new_spanned(
            path,
            "expected #[apivalidator(\"...\")] or #[apivalidator = \"...\"]",
        )),
    }
}

fn check_tag(lit: &LitStr, ty: &Type) -> syn::Result<()> {
    let Some(is_string) = bounded_kind(ty) else {
        // Bounds on other types are ignored by the generator.
        return Ok(());
    };
    let raw = lit.value();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let Some((key, value)) = token.split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if key != "min" && key != "max" {
            continue;
        }
        match value.parse::<i128>() {
            Err(_) => {
                return Err(syn::Error::new(
                    lit.span(),
                    format!("`{key}` expects an integer, found `{value}`"),
                ));
            }
            Ok(bound) if is_string && bound < 0 => {
                return Err(syn::Error::new(
                    lit.span(),
                    format!("`{key}` is a length bound and cannot be negative"),
                ));
            }
            Ok(_) => {}
        }
    }
    Ok(())
}

/// `Some(true)` for `String`, `Some(false)` for primitive integers.
fn bounded_kind(ty: &Type) -> Option<bool> {
    let Type::Path(p) = ty else {
        return None;
    };
    if p.qself.is_some() {
        return None;
    }
    let ident = p.path.get_ident()?.to_string();
    match ident.as_str() {
        "String" => Some(true),
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
        | "u128" | "usize" => Some(false),
        _ => None,
    }
}
