//! `syn`-based front end for Rust source files.

use quote::ToTokens;
use syn::ext::IdentExt;
use syn::{
    Attribute, Expr, ExprLit, Fields, FnArg, ImplItem, Item, Lit, LitStr, Meta, ReturnType,
    Signature, Type,
};

use super::{
    DeclarationParser, DeclarationTree, FieldDecl, FunctionDecl, ParamDecl, Receiver, RecordDecl,
    TypeRef,
};
use crate::config::GeneratorConfig;
use crate::error::{GenerateError, Result};

/// Parses a Rust source file into a [`DeclarationTree`].
///
/// Only top-level items are visited: free functions, every `fn` inside an
/// `impl` block, and structs with named fields.
#[derive(Debug, Clone)]
pub struct RustDeclParser {
    validator_attr: String,
}

impl Default for RustDeclParser {
    fn default() -> Self {
        Self::new("apivalidator")
    }
}

impl RustDeclParser {
    /// Create a parser reading constraint strings from `validator_attr`.
    pub fn new(validator_attr: impl Into<String>) -> Self {
        Self {
            validator_attr: validator_attr.into(),
        }
    }

    /// Create a parser from the generator configuration.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.validator_attr.clone())
    }

    fn visit_item(&self, item: &Item, source_name: &str, tree: &mut DeclarationTree) -> Result<()> {
        match item {
            Item::Fn(f) => tree.functions.push(function_decl(&f.attrs, &f.sig, None)),
            Item::Impl(imp) => {
                let owner = type_ref(&imp.self_ty);
                for impl_item in &imp.items {
                    if let ImplItem::Fn(m) = impl_item {
                        tree.functions
                            .push(function_decl(&m.attrs, &m.sig, Some(owner.clone())));
                    }
                }
            }
            Item::Struct(s) => {
                let Fields::Named(named) = &s.fields else {
                    return Ok(());
                };
                let mut fields = Vec::with_capacity(named.named.len());
                for field in &named.named {
                    let Some(ident) = &field.ident else {
                        continue;
                    };
                    fields.push(FieldDecl {
                        name: ident.unraw().to_string(),
                        ident: ident.to_string(),
                        ty: type_ref(&field.ty),
                        tag: self.field_tag(&field.attrs, source_name)?,
                    });
                }
                tree.records.push(RecordDecl {
                    name: s.ident.to_string(),
                    fields,
                    line: s.ident.span().start().line,
                });
            }
            _ => {}
        }
        Ok(())
    }

    /// Raw constraint string of a field. Repeated attributes are joined with `,`.
    fn field_tag(&self, attrs: &[Attribute], source_name: &str) -> Result<Option<String>> {
        let mut parts = Vec::new();
        for attr in attrs.iter().filter(|a| a.path().is_ident(&self.validator_attr)) {
            let lit = match &attr.meta {
                Meta::List(_) => attr
                    .parse_args::<LitStr>()
                    .map_err(|e| parse_error(source_name, &e))?,
                Meta::NameValue(nv) => match &nv.value {
                    Expr::Lit(ExprLit {
                        lit: Lit::Str(s), ..
                    }) => s.clone(),
                    other => {
                        return Err(parse_error(
                            source_name,
                            &syn::Error::new_spanned(other, "expected a string literal"),
                        ))
                    }
                },
                Meta::Path(path) => {
                    return Err(parse_error(
                        source_name,
                        &syn::Error::new_spanned(
                            path,
                            format!(
                                "expected #[{0}(\"...\")] or #[{0} = \"...\"]",
                                self.validator_attr
                            ),
                        ),
                    ))
                }
            };
            parts.push(lit.value());
        }
        Ok((!parts.is_empty()).then(|| parts.join(",")))
    }
}

impl DeclarationParser for RustDeclParser {
    fn parse(&self, source: &str, source_name: &str) -> Result<DeclarationTree> {
        let file = syn::parse_file(source).map_err(|e| parse_error(source_name, &e))?;
        let mut tree = DeclarationTree::default();
        for item in &file.items {
            self.visit_item(item, source_name, &mut tree)?;
        }
        Ok(tree)
    }
}

fn parse_error(source_name: &str, err: &syn::Error) -> GenerateError {
    let start = err.span().start();
    GenerateError::Parse {
        source_name: source_name.to_string(),
        line: start.line,
        column: start.column,
        message: err.to_string(),
    }
}

fn function_decl(attrs: &[Attribute], sig: &Signature, owner: Option<TypeRef>) -> FunctionDecl {
    let params = sig
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(pt) => Some(ParamDecl {
                name: pt.pat.to_token_stream().to_string(),
                ty: type_ref(&pt.ty),
            }),
            FnArg::Receiver(_) => None,
        })
        .collect();
    FunctionDecl {
        name: sig.ident.unraw().to_string(),
        ident: sig.ident.to_string(),
        owner,
        receiver: sig.receiver().map(receiver_kind),
        doc: doc_text(attrs),
        params,
        output: match &sig.output {
            ReturnType::Default => None,
            ReturnType::Type(_, ty) => Some(type_ref(ty)),
        },
        is_async: sig.asyncness.is_some(),
        line: sig.ident.span().start().line,
    }
}

fn receiver_kind(receiver: &syn::Receiver) -> Receiver {
    if receiver.colon_token.is_some() {
        return Receiver::Typed(receiver.ty.to_token_stream().to_string());
    }
    match (&receiver.reference, &receiver.mutability) {
        (Some(_), None) => Receiver::Shared,
        (Some(_), Some(_)) => Receiver::Mutable,
        (None, _) => Receiver::Owned,
    }
}

fn type_ref(ty: &Type) -> TypeRef {
    match ty {
        Type::Paren(p) => type_ref(&p.elem),
        Type::Group(g) => type_ref(&g.elem),
        Type::Reference(r) => TypeRef::Reference(Box::new(type_ref(&r.elem))),
        Type::Path(p) if p.qself.is_none() => {
            if let Some(ident) = p.path.get_ident() {
                return TypeRef::Named(ident.to_string());
            }
            match p.path.segments.last() {
                Some(seg) => TypeRef::Path {
                    last: seg.ident.to_string(),
                    rendered: ty.to_token_stream().to_string(),
                },
                None => TypeRef::Other(ty.to_token_stream().to_string()),
            }
        }
        other => TypeRef::Other(other.to_token_stream().to_string()),
    }
}

/// Doc text with the first space of every line removed and surrounding blank
/// lines trimmed.
fn doc_text(attrs: &[Attribute]) -> Option<String> {
    let mut lines = Vec::new();
    for attr in attrs.iter().filter(|a| a.path().is_ident("doc")) {
        let Meta::NameValue(nv) = &attr.meta else {
            continue;
        };
        let Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) = &nv.value
        else {
            continue;
        };
        let value = s.value();
        if value.is_empty() {
            lines.push(String::new());
        }
        for line in value.lines() {
            lines.push(line.strip_prefix(' ').unwrap_or(line).to_string());
        }
    }
    let start = lines.iter().position(|l| !l.trim().is_empty())?;
    let end = lines.iter().rposition(|l| !l.trim().is_empty())?;
    Some(lines[start..=end].join("\n"))
}
