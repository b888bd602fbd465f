//! Generation-time errors.
//!
//! Every variant is fatal to a generation run. Runtime failures produced by
//! the generated handlers live in [`crate::runtime`] instead.

use std::io;
use std::path::PathBuf;

/// Result alias used across the generator stages.
pub type Result<T, E = GenerateError> = std::result::Result<T, E>;

/// Everything that can abort a generation run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Input path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The source text is not a valid declaration file.
    #[error("{source_name}:{line}:{column}: {message}")]
    Parse {
        /// Name of the source being parsed
        source_name: String,
        /// 1-based line of the offending token
        line: usize,
        /// 0-based column of the offending token
        column: usize,
        /// Parser diagnostic
        message: String,
    },

    /// The annotation payload after the marker is not valid JSON for an API spec.
    #[error("failed to parse annotation on `{function}`: {message}")]
    Annotation {
        /// Annotated function
        function: String,
        /// Decoder diagnostic
        message: String,
    },

    /// The annotation names a verb that is not an HTTP method token.
    #[error("`{function}` declares invalid HTTP method `{method}`")]
    InvalidMethod {
        /// Annotated function
        function: String,
        /// Verb as written
        method: String,
    },

    /// An annotated function is not declared inside an `impl` block.
    #[error("`{function}` is annotated but is not a method of a named type")]
    MissingReceiver {
        /// Annotated function
        function: String,
    },

    /// An annotated method has a receiver other than `&self`, or an owner
    /// type that is not a plain name.
    #[error("`{function}` must take `&self` on a named type, found {found}")]
    UnsupportedReceiver {
        /// Annotated function
        function: String,
        /// What was found instead
        found: String,
    },

    /// Generated handlers are synchronous.
    #[error("`{function}` is async; generated handlers call business methods synchronously")]
    AsyncMethod {
        /// Annotated function
        function: String,
    },

    /// Fewer than two parameters after the receiver.
    #[error("method {function} does not have parameters (expected a context and a parameter record)")]
    MissingParams {
        /// Annotated function
        function: String,
    },

    /// More than a context and a parameter record after the receiver.
    #[error("method {function} takes {count} parameters (expected a context and a parameter record)")]
    ExtraParams {
        /// Annotated function
        function: String,
        /// Parameters after the receiver
        count: usize,
    },

    /// The parameter record is not a bare type name.
    #[error("unsupported parameter type `{ty}` in method {function}")]
    UnsupportedParamType {
        /// Annotated function
        function: String,
        /// Type as written
        ty: String,
    },

    /// The method does not return a `Result`-shaped type.
    #[error("`{function}` must return a Result, found `{found}`")]
    UnsupportedReturn {
        /// Annotated function
        function: String,
        /// Return type as written
        found: String,
    },

    /// The parameter record named by a method is not declared in the input.
    #[error("parameter type `{ty}` used by `{function}` is not declared as a struct with named fields")]
    UndeclaredParamType {
        /// Annotated function
        function: String,
        /// Missing record name
        ty: String,
    },

    /// A constraint value cannot be turned into a check for the field's type.
    #[error("invalid constraint `{constraint}` on {record}.{field}: {reason}")]
    InvalidConstraint {
        /// Record declaring the field
        record: String,
        /// Field name
        field: String,
        /// Constraint token as written
        constraint: String,
        /// Why it was rejected
        reason: String,
    },

    /// Two endpoints of one owner type share a verb and a path.
    #[error("{owner}: route {method} {path} is declared by both `{first}` and `{second}`")]
    RouteConflict {
        /// Owner type
        owner: String,
        /// Conflicting verb
        method: String,
        /// Conflicting path
        path: String,
        /// Method registered first
        first: String,
        /// Method registered second
        second: String,
    },

    /// Two annotated methods of one owner type would produce the same handler.
    #[error("{owner}: handler `{handler}` would be generated twice (from {first_route} and {second_route})")]
    DuplicateHandler {
        /// Owner type
        owner: String,
        /// Generated handler name
        handler: String,
        /// Route of the first declaration
        first_route: String,
        /// Route of the second declaration
        second_route: String,
    },

    /// The generator configuration file is unreadable or malformed.
    #[error("failed to load config {}: {message}", path.display())]
    Config {
        /// Config file path
        path: PathBuf,
        /// Loader diagnostic
        message: String,
    },

    /// The artifact could not be staged or moved into place.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The formatter rejected the staged artifact.
    #[error("failed to format {}: {message}", path.display())]
    Format {
        /// Output path
        path: PathBuf,
        /// Formatter diagnostic
        message: String,
    },
}
