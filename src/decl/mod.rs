//! # Declaration Tree
//!
//! A syntax-independent view of the input: functions with their attached
//! documentation, and record types with named, typed, tagged fields. The rest
//! of the generator only ever sees these types, so another front end can feed
//! the same pipeline by implementing [`DeclarationParser`].
//!
//! The tree is produced once per run and never mutated afterwards.

mod rust;

pub use rust::RustDeclParser;

use crate::error::Result;
use std::fmt;

/// Turns source text into a [`DeclarationTree`].
///
/// Implementations must be all-or-nothing: a syntax error yields `Err` and no
/// partial tree.
pub trait DeclarationParser {
    /// Parse `source`; `source_name` is only used in diagnostics.
    fn parse(&self, source: &str, source_name: &str) -> Result<DeclarationTree>;
}

/// Every function and record declared in one input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationTree {
    /// Functions in declaration order
    pub functions: Vec<FunctionDecl>,
    /// Records in declaration order
    pub records: Vec<RecordDecl>,
}

impl DeclarationTree {
    /// Find a record by name.
    pub fn record(&self, name: &str) -> Option<&RecordDecl> {
        self.records.iter().find(|r| r.name == name)
    }
}

/// Reference to a type as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// A bare single-segment name with no generics, e.g. `CreateParams` or `i32`
    Named(String),
    /// Any other path; `last` is the final segment's identifier
    Path {
        /// Final segment identifier (e.g. `Result` for `Result<User, E>`)
        last: String,
        /// Full type as written
        rendered: String,
    },
    /// A borrowed type such as `&Context`
    Reference(Box<TypeRef>),
    /// Tuples, slices, trait objects and the like
    Other(String),
}

impl TypeRef {
    /// The bare name, if this is a [`TypeRef::Named`].
    pub fn as_named(&self) -> Option<&str> {
        match self {
            TypeRef::Named(name) => Some(name),
            _ => None,
        }
    }

    /// Identifier of the last path segment, for named and path types.
    pub fn last_ident(&self) -> Option<&str> {
        match self {
            TypeRef::Named(name) => Some(name),
            TypeRef::Path { last, .. } => Some(last),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{name}"),
            TypeRef::Path { rendered, .. } => write!(f, "{rendered}"),
            TypeRef::Reference(inner) => write!(f, "&{inner}"),
            TypeRef::Other(rendered) => write!(f, "{rendered}"),
        }
    }
}

/// How a method takes `self`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receiver {
    /// `&self`
    Shared,
    /// `&mut self`
    Mutable,
    /// `self`
    Owned,
    /// `self: Box<Self>` and other explicitly typed receivers
    Typed(String),
}

impl fmt::Display for Receiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Receiver::Shared => write!(f, "`&self`"),
            Receiver::Mutable => write!(f, "`&mut self`"),
            Receiver::Owned => write!(f, "`self`"),
            Receiver::Typed(ty) => write!(f, "`self: {ty}`"),
        }
    }
}

/// One non-receiver function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    /// Binding pattern as written
    pub name: String,
    /// Declared type
    pub ty: TypeRef,
}

/// A free function or a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    /// Function name without any raw-identifier prefix
    pub name: String,
    /// Identifier as written (`r#type` stays `r#type`)
    pub ident: String,
    /// Type of the enclosing `impl` block, `None` for free functions
    pub owner: Option<TypeRef>,
    /// Receiver, `None` for free functions and associated functions
    pub receiver: Option<Receiver>,
    /// Attached documentation text, markers stripped
    pub doc: Option<String>,
    /// Parameters after the receiver, in order
    pub params: Vec<ParamDecl>,
    /// Declared return type, `None` for `()`
    pub output: Option<TypeRef>,
    /// Whether the function is `async`
    pub is_async: bool,
    /// 1-based line of the function name
    pub line: usize,
}

/// A struct with named fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDecl {
    /// Record name
    pub name: String,
    /// Fields in declaration order
    pub fields: Vec<FieldDecl>,
    /// 1-based line of the record name
    pub line: usize,
}

/// A record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Field name without any raw-identifier prefix; used in messages
    pub name: String,
    /// Identifier as written; used for member access in generated code
    pub ident: String,
    /// Declared type
    pub ty: TypeRef,
    /// Raw constraint string, if the field is tagged
    pub tag: Option<String>,
}
