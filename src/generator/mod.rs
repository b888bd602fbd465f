//! # Generator Module
//!
//! Drives one generation run end to end and owns the synthesis and emission
//! stages.
//!
//! ## Pipeline
//!
//! ```text
//! source → RustDeclParser → extract_api_specs → plan_artifact → render_artifact → write_artifact
//! ```
//!
//! 1. **Declaration parsing** ([`crate::decl`]) turns the input file into a
//!    syntax-independent declaration tree.
//! 2. **Extraction** ([`crate::spec`]) picks out annotated methods.
//! 3. **Planning** ([`plan`]) compiles constraints into checks, composes one
//!    handler per endpoint and groups handlers into per-owner routers.
//! 4. **Emission** ([`emit`]) serializes the plan into Rust source.
//! 5. **Writing** ([`write`]) publishes the artifact atomically, optionally
//!    through `rustfmt`.
//!
//! Every stage is fail-fast: the first error aborts the run and nothing is
//! written.
//!
//! ## Generated Code
//!
//! For each annotated method `create` on `MyApi` the artifact contains an
//! inherent `MyApi::handle_create(&self, &Request) -> Response`, and for each
//! owner type an `impl ApiService for MyApi` whose `serve_http` dispatches on
//! the exact `(method, path)` pair. The file is meant to be `include!`d next
//! to the declarations it was generated from.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use apigen::config::GeneratorConfig;
//! use apigen::generator::{generate_file, WriteOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = generate_file(
//!     "src/api.rs".as_ref(),
//!     "src/api_handlers.rs".as_ref(),
//!     &GeneratorConfig::default(),
//!     &WriteOptions::default(),
//! )?;
//! println!("{} handlers", report.handlers);
//! # Ok(())
//! # }
//! ```

mod emit;
mod plan;
mod write;

pub use emit::*;
pub use plan::*;
pub use write::*;

use std::path::Path;

use tracing::{info, warn};

use crate::config::GeneratorConfig;
use crate::decl::{DeclarationParser, RustDeclParser};
use crate::error::{GenerateError, Result};
use crate::spec::extract_api_specs;

/// Summary of one completed generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationReport {
    /// Handlers emitted
    pub handlers: usize,
    /// Routers emitted
    pub routers: usize,
    /// Size of the rendered artifact
    pub bytes: usize,
}

/// Parse, extract, plan and render a source file held in memory.
///
/// `source_name` is recorded in the artifact header and in parse errors.
pub fn generate_source(
    source: &str,
    source_name: &str,
    config: &GeneratorConfig,
) -> Result<String> {
    plan_source(source, source_name, config).map(|artifact| render_artifact(&artifact))
}

fn plan_source(source: &str, source_name: &str, config: &GeneratorConfig) -> Result<Artifact> {
    let tree = RustDeclParser::from_config(config).parse(source, source_name)?;
    let specs = extract_api_specs(&tree, &config.marker)?;
    if specs.is_empty() {
        warn!(
            source = source_name,
            marker = %config.marker,
            "No annotated functions found; the artifact will contain no handlers"
        );
    }
    plan_artifact(&tree, &specs, source_name, config)
}

fn read_input(input: &Path) -> Result<(String, String)> {
    let source = std::fs::read_to_string(input).map_err(|source| GenerateError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let source_name = input
        .file_name()
        .map_or_else(|| input.display().to_string(), |n| n.to_string_lossy().into_owned());
    Ok((source, source_name))
}

/// Generate `output` from `input`, replacing it atomically.
///
/// # Errors
///
/// Any [`GenerateError`]; on error `output` is left as it was.
pub fn generate_file(
    input: &Path,
    output: &Path,
    config: &GeneratorConfig,
    options: &WriteOptions,
) -> Result<GenerationReport> {
    let (source, source_name) = read_input(input)?;
    let artifact = plan_source(&source, &source_name, config)?;
    let rendered = render_artifact(&artifact);
    write_artifact(output, &rendered, options)?;

    let report = GenerationReport {
        handlers: artifact.handlers.len(),
        routers: artifact.routers.len(),
        bytes: rendered.len(),
    };
    info!(
        input = %input.display(),
        output = %output.display(),
        handlers = report.handlers,
        routers = report.routers,
        bytes = report.bytes,
        formatted = options.format,
        "Generated request handlers"
    );
    Ok(report)
}

/// Whether `output` already holds exactly what [`generate_file`] would write.
///
/// A missing `output` is stale, not an error. Nothing is written.
pub fn check_file(
    input: &Path,
    output: &Path,
    config: &GeneratorConfig,
    options: &WriteOptions,
) -> Result<bool> {
    let (source, source_name) = read_input(input)?;
    let rendered = generate_source(&source, &source_name, config)?;
    let expected = publishable_contents(output, &rendered, options)?;
    let up_to_date = match std::fs::read_to_string(output) {
        Ok(current) => current == expected,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(source) => {
            return Err(GenerateError::Read {
                path: output.to_path_buf(),
                source,
            })
        }
    };
    info!(
        input = %input.display(),
        output = %output.display(),
        up_to_date,
        "Checked generated handlers"
    );
    Ok(up_to_date)
}
