use tracing::{debug, warn};

use super::types::{ApiAnnotation, ApiSpec, ContextArg};
use crate::decl::{DeclarationTree, FunctionDecl, Receiver, TypeRef};
use crate::error::{GenerateError, Result};

/// Extract one [`ApiSpec`] per annotated function, in declaration order.
///
/// The first malformed annotation or unsupported signature aborts the whole
/// extraction; no partial list is returned.
///
/// # Arguments
///
/// * `tree` - Parsed declarations
/// * `marker` - Prefix identifying an annotation payload (e.g. `apigen:api`)
pub fn extract_api_specs(tree: &DeclarationTree, marker: &str) -> Result<Vec<ApiSpec>> {
    let mut specs = Vec::new();
    for func in &tree.functions {
        let Some(payload) = annotation_payload(func, marker) else {
            continue;
        };
        let spec = build_spec(func, payload)?;
        debug!(
            owner = %spec.owner_type,
            handler = %spec.handler_name,
            method = %spec.http_verb,
            path = %spec.route_path,
            auth = spec.requires_auth,
            params = %spec.param_type_name,
            "Extracted API spec"
        );
        specs.push(spec);
    }
    Ok(specs)
}

fn annotation_payload<'a>(func: &'a FunctionDecl, marker: &str) -> Option<&'a str> {
    func.doc.as_deref()?.trim_start().strip_prefix(marker)
}

/// Decode the JSON payload that follows the marker.
///
/// Only the first JSON value is read, so free-form documentation may follow
/// it on later lines.
pub fn decode_annotation(function: &str, payload: &str) -> Result<ApiAnnotation> {
    let mut stream = serde_json::Deserializer::from_str(payload).into_iter::<ApiAnnotation>();
    match stream.next() {
        Some(Ok(annotation)) => Ok(annotation),
        Some(Err(e)) => Err(GenerateError::Annotation {
            function: function.to_string(),
            message: e.to_string(),
        }),
        None => Err(GenerateError::Annotation {
            function: function.to_string(),
            message: "missing JSON payload after marker".to_string(),
        }),
    }
}

fn build_spec(func: &FunctionDecl, payload: &str) -> Result<ApiSpec> {
    let annotation = decode_annotation(&func.name, payload)?;

    if annotation.method.is_empty() {
        warn!(
            handler = %func.name,
            path = %annotation.url,
            "Annotation has no method; the route can never match a request"
        );
    } else if http::Method::from_bytes(annotation.method.as_bytes()).is_err() {
        return Err(GenerateError::InvalidMethod {
            function: func.name.clone(),
            method: annotation.method,
        });
    }

    let owner_type = owner_type(func)?;

    if func.is_async {
        return Err(GenerateError::AsyncMethod {
            function: func.name.clone(),
        });
    }

    // The first parameter is the request context; the second is the record.
    let (context, params) = match func.params.as_slice() {
        [context, params] => (context, params),
        [_, _, ..] => {
            return Err(GenerateError::ExtraParams {
                function: func.name.clone(),
                count: func.params.len(),
            })
        }
        _ => {
            return Err(GenerateError::MissingParams {
                function: func.name.clone(),
            })
        }
    };
    let param_type_name = params
        .ty
        .as_named()
        .ok_or_else(|| GenerateError::UnsupportedParamType {
            function: func.name.clone(),
            ty: params.ty.to_string(),
        })?
        .to_string();
    let context = match context.ty {
        TypeRef::Reference(_) => ContextArg::Borrowed,
        _ => ContextArg::Owned,
    };

    let returns_result = func
        .output
        .as_ref()
        .and_then(TypeRef::last_ident)
        .is_some_and(|name| name.ends_with("Result"));
    if !returns_result {
        return Err(GenerateError::UnsupportedReturn {
            function: func.name.clone(),
            found: func
                .output
                .as_ref()
                .map_or_else(|| "()".to_string(), ToString::to_string),
        });
    }

    Ok(ApiSpec {
        owner_type,
        handler_name: func.name.clone(),
        handler_ident: func.ident.clone(),
        route_path: annotation.url,
        http_verb: annotation.method,
        requires_auth: annotation.auth,
        param_type_name,
        context,
        line: func.line,
    })
}

fn owner_type(func: &FunctionDecl) -> Result<String> {
    let Some(owner) = &func.owner else {
        return Err(GenerateError::MissingReceiver {
            function: func.name.clone(),
        });
    };
    match &func.receiver {
        Some(Receiver::Shared) => {}
        Some(other) => {
            return Err(GenerateError::UnsupportedReceiver {
                function: func.name.clone(),
                found: other.to_string(),
            })
        }
        None => {
            return Err(GenerateError::UnsupportedReceiver {
                function: func.name.clone(),
                found: "no receiver".to_string(),
            })
        }
    }
    owner
        .as_named()
        .map(ToString::to_string)
        .ok_or_else(|| GenerateError::UnsupportedReceiver {
            function: func.name.clone(),
            found: format!("owner type `{owner}`"),
        })
}
