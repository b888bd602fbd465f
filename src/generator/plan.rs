//! Handler and router synthesis.
//!
//! Builds the intermediate representation the emitter serializes: one
//! [`HandlerPlan`] per API spec and one [`RouterPlan`] per owner type. All
//! ordering decisions are made here so rendering is a straight walk.

use indexmap::IndexMap;
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::constraints::{compile_checks, compile_fields, FieldCheck, FieldSpec};
use crate::decl::DeclarationTree;
use crate::error::{GenerateError, Result};
use crate::spec::{ApiSpec, ContextArg};

/// Credential check shared by every handler that requires auth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPlan {
    /// Header to read
    pub header: String,
    /// Expected value
    pub token: String,
}

/// The five-step pipeline for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerPlan {
    /// Type the handler is attached to
    pub owner: String,
    /// Generated handler method name
    pub handler_fn: String,
    /// Business method identifier as written
    pub method_ident: String,
    /// Verb the route matches
    pub http_verb: String,
    /// Path the route matches
    pub route_path: String,
    /// Step 1: run the credential check
    pub requires_auth: bool,
    /// Step 2: record the body decodes into
    pub param_type: String,
    /// Step 3: checks in field order, then constraint order
    pub checks: Vec<FieldCheck>,
    /// Step 4: how the context is passed to the business method
    pub context: ContextArg,
}

/// One `(verb, path)` arm of a router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Exact verb
    pub http_verb: String,
    /// Exact path
    pub route_path: String,
    /// Handler to invoke
    pub handler_fn: String,
}

/// Dispatch routine for one owner type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterPlan {
    /// Owner type
    pub owner: String,
    /// Routes in handler declaration order
    pub routes: Vec<Route>,
}

/// Everything one generation run emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Input name recorded in the header comment
    pub source_name: String,
    /// Path generated code uses to reach the runtime support library
    pub runtime_path: String,
    /// Present when at least one handler requires auth
    pub auth: Option<AuthPlan>,
    /// Handlers in declaration order
    pub handlers: Vec<HandlerPlan>,
    /// Routers in order of each owner's first appearance
    pub routers: Vec<RouterPlan>,
}

/// Compose the pipeline for one API spec from its compiled fields.
pub fn plan_handler(spec: &ApiSpec, fields: &[FieldSpec]) -> Result<HandlerPlan> {
    let mut checks = Vec::new();
    for field in fields {
        checks.extend(compile_checks(&spec.param_type_name, field)?);
    }
    Ok(HandlerPlan {
        owner: spec.owner_type.clone(),
        handler_fn: spec.handler_fn(),
        method_ident: spec.handler_ident.clone(),
        http_verb: spec.http_verb.clone(),
        route_path: spec.route_path.clone(),
        requires_auth: spec.requires_auth,
        param_type: spec.param_type_name.clone(),
        checks,
        context: spec.context,
    })
}

/// Group handlers by owner, keeping first-appearance order.
///
/// Two handlers of one owner sharing a `(verb, path)` pair is a
/// [`GenerateError::RouteConflict`]; sharing a generated name is a
/// [`GenerateError::DuplicateHandler`].
pub fn plan_routers(handlers: &[HandlerPlan]) -> Result<Vec<RouterPlan>> {
    let mut routers: IndexMap<&str, RouterPlan> = IndexMap::new();
    for handler in handlers {
        let router = routers
            .entry(handler.owner.as_str())
            .or_insert_with(|| RouterPlan {
                owner: handler.owner.clone(),
                routes: Vec::new(),
            });
        if let Some(existing) = router.routes.iter().find(|r| {
            r.http_verb == handler.http_verb && r.route_path == handler.route_path
        }) {
            return Err(GenerateError::RouteConflict {
                owner: handler.owner.clone(),
                method: handler.http_verb.clone(),
                path: handler.route_path.clone(),
                first: existing.handler_fn.clone(),
                second: handler.handler_fn.clone(),
            });
        }
        if let Some(existing) = router
            .routes
            .iter()
            .find(|r| r.handler_fn == handler.handler_fn)
        {
            return Err(GenerateError::DuplicateHandler {
                owner: handler.owner.clone(),
                handler: handler.handler_fn.clone(),
                first_route: format!("{} {}", existing.http_verb, existing.route_path),
                second_route: format!("{} {}", handler.http_verb, handler.route_path),
            });
        }
        router.routes.push(Route {
            http_verb: handler.http_verb.clone(),
            route_path: handler.route_path.clone(),
            handler_fn: handler.handler_fn.clone(),
        });
    }
    Ok(routers.into_values().collect())
}

/// Build the full artifact for a set of extracted specs.
pub fn plan_artifact(
    tree: &DeclarationTree,
    specs: &[ApiSpec],
    source_name: &str,
    config: &GeneratorConfig,
) -> Result<Artifact> {
    let mut handlers = Vec::with_capacity(specs.len());
    for spec in specs {
        let fields = compile_fields(spec, tree)?;
        let handler = plan_handler(spec, &fields)?;
        debug!(
            owner = %handler.owner,
            handler = %handler.handler_fn,
            checks = handler.checks.len(),
            "Planned handler"
        );
        handlers.push(handler);
    }
    let routers = plan_routers(&handlers)?;
    let auth = handlers.iter().any(|h| h.requires_auth).then(|| AuthPlan {
        header: config.auth.header.clone(),
        token: config.auth.token.clone(),
    });
    Ok(Artifact {
        source_name: source_name.to_string(),
        runtime_path: config.runtime_path.clone(),
        auth,
        handlers,
        routers,
    })
}
