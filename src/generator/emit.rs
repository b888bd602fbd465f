//! Source emission for a planned [`Artifact`].
//!
//! Output is built through [`CodeWriter`] rather than by concatenating
//! fragments, so indentation and line endings are uniform. Identical plans
//! always render to identical bytes.

use super::plan::{Artifact, HandlerPlan, RouterPlan};
use crate::constraints::{Check, FieldCheck};
use crate::spec::ContextArg;

/// Name of the generated constant holding the credential header.
pub const AUTH_HEADER_CONST: &str = "APIGEN_AUTH_HEADER";
/// Name of the generated constant holding the expected credential.
pub const AUTH_TOKEN_CONST: &str = "APIGEN_AUTH_TOKEN";

/// Line-oriented source builder with block indentation.
#[derive(Debug, Default)]
pub struct CodeWriter {
    buf: String,
    indent: usize,
}

impl CodeWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line at the current indentation.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.indent {
                self.buf.push_str("    ");
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
        self
    }

    /// Append an empty line.
    pub fn blank(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    /// Append `header` and indent until the matching [`close`](Self::close).
    pub fn open(&mut self, header: impl AsRef<str>) -> &mut Self {
        self.line(header);
        self.indent += 1;
        self
    }

    /// Dedent and append `footer`.
    pub fn close(&mut self, footer: impl AsRef<str>) -> &mut Self {
        self.indent = self.indent.saturating_sub(1);
        self.line(footer)
    }

    /// Consume the writer, returning the source text.
    pub fn finish(self) -> String {
        self.buf
    }
}

/// Render the artifact as a Rust source file meant to be `include!`d next to
/// the declarations it was generated from.
pub fn render_artifact(artifact: &Artifact) -> String {
    let rt = artifact.runtime_path.as_str();
    let mut w = CodeWriter::new();

    w.line(format!(
        "// Code generated by apigen from {}. DO NOT EDIT.",
        artifact.source_name.escape_debug()
    ));

    if let Some(auth) = &artifact.auth {
        w.blank();
        w.line(format!("const {AUTH_HEADER_CONST}: &str = {:?};", auth.header));
        w.line(format!("const {AUTH_TOKEN_CONST}: &str = {:?};", auth.token));
    }

    for handler in &artifact.handlers {
        w.blank();
        render_handler(&mut w, rt, handler);
    }

    for router in &artifact.routers {
        w.blank();
        render_router(&mut w, rt, router);
    }

    w.finish()
}

fn render_handler(w: &mut CodeWriter, rt: &str, handler: &HandlerPlan) {
    w.open(format!("impl {} {{", handler.owner));
    w.line(format!(
        "// {} {}",
        handler.http_verb.escape_debug(),
        handler.route_path.escape_debug()
    ));
    w.open(format!(
        "pub fn {}(&self, req: &{rt}::Request) -> {rt}::Response {{",
        handler.handler_fn
    ));
    w.line(format!("use {rt} as rt;"));

    if handler.requires_auth {
        w.open(format!(
            "if !rt::header_equals(req, {AUTH_HEADER_CONST}, {AUTH_TOKEN_CONST}) {{"
        ));
        w.line(r#"return rt::error_response(rt::StatusCode::UNAUTHORIZED, "unauthorized");"#);
        w.close("}");
    }

    w.open(format!(
        "let params: {} = match rt::decode_body(req) {{",
        handler.param_type
    ));
    w.line("Ok(params) => params,");
    w.open("Err(_) => {");
    w.line(r#"return rt::error_response(rt::StatusCode::BAD_REQUEST, "invalid request body");"#);
    w.close("}");
    w.close("};");

    for check in &handler.checks {
        w.open(format!("if {} {{", failure_condition(check)));
        w.line(format!(
            "return rt::error_response(rt::StatusCode::BAD_REQUEST, {:?});",
            check.message
        ));
        w.close("}");
    }

    w.line("let ctx = rt::Context::from_request(req);");
    let ctx_arg = match handler.context {
        ContextArg::Borrowed => "&ctx",
        ContextArg::Owned => "ctx",
    };
    w.open(format!(
        "match self.{}({ctx_arg}, params) {{",
        handler.method_ident
    ));
    w.line("Ok(result) => rt::json_response(&result),");
    w.line(
        "Err(err) => rt::error_response(rt::StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),",
    );
    w.close("}");
    w.close("}");
    w.close("}");
}

fn render_router(w: &mut CodeWriter, rt: &str, router: &RouterPlan) {
    w.open(format!("impl {rt}::ApiService for {} {{", router.owner));
    w.open(format!(
        "fn serve_http(&self, req: &{rt}::Request) -> {rt}::Response {{"
    ));
    w.line(format!("use {rt} as rt;"));
    w.open("match (req.method().as_str(), req.uri().path()) {");
    for route in &router.routes {
        w.line(format!(
            "({:?}, {:?}) => self.{}(req),",
            route.http_verb, route.route_path, route.handler_fn
        ));
    }
    w.open("(method, path) => rt::error_response(");
    w.line("rt::StatusCode::NOT_FOUND,");
    w.line(r#"&format!("unknown method {method} on {path}"),"#);
    w.close("),");
    w.close("}");
    w.close("}");
    w.close("}");
}

/// Boolean expression that is true when the check fails.
fn failure_condition(check: &FieldCheck) -> String {
    let field = format!("params.{}", check.field);
    match &check.check {
        Check::NotEmpty => format!("{field}.is_empty()"),
        Check::MinLength(n) => format!("{field}.chars().count() < {n}"),
        Check::MaxLength(n) => format!("{field}.chars().count() > {n}"),
        Check::MinValue(n) => format!("{field} < {n}"),
        Check::MaxValue(n) => format!("{field} > {n}"),
        Check::OneOfStr(values) => {
            let pattern = values
                .iter()
                .map(|value| format!("{value:?}"))
                .collect::<Vec<_>>()
                .join(" | ");
            format!("!matches!({field}.as_str(), {pattern})")
        }
        Check::OneOfInt(values) => {
            let pattern = values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" | ");
            format!("!matches!({field}, {pattern})")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(field: &str, check: Check) -> FieldCheck {
        FieldCheck {
            field: field.to_string(),
            check,
            message: String::new(),
        }
    }

    #[test]
    fn test_code_writer_indents_blocks() {
        let mut w = CodeWriter::new();
        w.open("fn f() {");
        w.line("let x = 1;");
        w.blank();
        w.open("if x > 0 {");
        w.line("");
        w.close("}");
        w.close("}");
        assert_eq!(
            w.finish(),
            "fn f() {\n    let x = 1;\n\n    if x > 0 {\n\n    }\n}\n"
        );
    }

    #[test]
    fn test_failure_conditions() {
        assert_eq!(
            failure_condition(&check("login", Check::NotEmpty)),
            "params.login.is_empty()"
        );
        assert_eq!(
            failure_condition(&check("login", Check::MinLength(10))),
            "params.login.chars().count() < 10"
        );
        assert_eq!(
            failure_condition(&check("age", Check::MaxValue(128))),
            "params.age > 128"
        );
        assert_eq!(
            failure_condition(&check("t", Check::MinValue(-5))),
            "params.t < -5"
        );
        assert_eq!(
            failure_condition(&check(
                "status",
                Check::OneOfStr(vec!["user".into(), "a\"b".into()])
            )),
            r#"!matches!(params.status.as_str(), "user" | "a\"b")"#
        );
        assert_eq!(
            failure_condition(&check("r#type", Check::OneOfInt(vec![-1, 2]))),
            "!matches!(params.r#type, -1 | 2)"
        );
    }
}
