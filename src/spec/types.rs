use serde::Deserialize;

/// Payload decoded from an annotated doc comment.
///
/// Missing keys take their zero values; unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiAnnotation {
    /// Exact request path to match
    pub url: String,
    /// Whether the credential check runs before decoding
    pub auth: bool,
    /// Exact request verb to match
    pub method: String,
}

/// How the business method takes its request context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextArg {
    /// `ctx: &Context`
    Borrowed,
    /// `ctx: Context`
    Owned,
}

/// Compiled metadata for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSpec {
    /// Type the business method is declared on
    pub owner_type: String,
    /// Business method name without any raw-identifier prefix
    pub handler_name: String,
    /// Business method identifier as written
    pub handler_ident: String,
    /// Exact path to match
    pub route_path: String,
    /// Exact verb to match
    pub http_verb: String,
    /// Whether the credential check runs
    pub requires_auth: bool,
    /// Record the request body decodes into
    pub param_type_name: String,
    /// How the context argument is passed
    pub context: ContextArg,
    /// 1-based line of the business method
    pub line: usize,
}

impl ApiSpec {
    /// Name of the generated handler method.
    pub fn handler_fn(&self) -> String {
        format!("handle_{}", self.handler_name)
    }
}
