//! # Constraint Compiler
//!
//! Turns the raw `apivalidator` strings of a parameter record into ordered,
//! type-aware checks.
//!
//! A tag is a comma-separated token list. A token without `=` is a flag, a
//! token with `=` is split on the first `=` into key and value:
//!
//! | Token | String field | Integer field |
//! |-------|--------------|---------------|
//! | `required` | value must not be empty | skipped |
//! | `min=N` | `chars().count() >= N` | `value >= N` |
//! | `max=N` | `chars().count() <= N` | `value <= N` |
//! | `enum=a\|b` | value is one of the literals | value is one of the integers |
//!
//! Fields of any other type keep their constraints on record but produce no
//! checks. Unknown keys are ignored.

use std::fmt;
use tracing::debug;

use crate::decl::{DeclarationTree, TypeRef};
use crate::error::{GenerateError, Result};
use crate::spec::ApiSpec;

/// A recognized constraint name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// Presence
    Required,
    /// Lower bound
    Min,
    /// Upper bound
    Max,
    /// Allowed literal set
    Enum,
}

impl ConstraintKind {
    /// Map a tag key to a constraint kind.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "required" => Some(Self::Required),
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "enum" => Some(Self::Enum),
            _ => None,
        }
    }

    /// Tag key of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Min => "min",
            Self::Max => "max",
            Self::Enum => "enum",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One constraint token. `raw_value` is empty for flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// Constraint name
    pub kind: ConstraintKind,
    /// Value as written, trimmed
    pub raw_value: String,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.raw_value.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}={}", self.kind, self.raw_value)
        }
    }
}

/// Split a raw tag into constraints, preserving token order.
pub fn parse_tag(raw: &str) -> Vec<Constraint> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| {
            let (key, value) = match token.split_once('=') {
                Some((key, value)) => (key.trim(), value.trim()),
                None => (token, ""),
            };
            match ConstraintKind::from_key(key) {
                Some(kind) => Some(Constraint {
                    kind,
                    raw_value: value.to_string(),
                }),
                None => {
                    debug!(key, "Ignoring unknown constraint key");
                    None
                }
            }
        })
        .collect()
}

/// Primitive integer types, with their value ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerKind {
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
}

impl IntegerKind {
    /// Recognize a primitive integer type name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "i8" => Self::I8,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "i128" => Self::I128,
            "isize" => Self::Isize,
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "u128" => Self::U128,
            "usize" => Self::Usize,
            _ => return None,
        })
    }

    /// Smallest representable value.
    ///
    /// `isize` and `usize` take the generator's own pointer width, so the
    /// generated code is meant for a target of that width.
    pub fn min(self) -> i128 {
        match self {
            Self::I8 => i8::MIN.into(),
            Self::I16 => i16::MIN.into(),
            Self::I32 => i32::MIN.into(),
            Self::I64 => i64::MIN.into(),
            Self::I128 => i128::MIN,
            Self::Isize => isize::MIN as i128,
            Self::U8 | Self::U16 | Self::U32 | Self::U64 | Self::U128 | Self::Usize => 0,
        }
    }

    /// Largest representable value, saturated at `i128::MAX`.
    pub fn max(self) -> i128 {
        match self {
            Self::I8 => i8::MAX.into(),
            Self::I16 => i16::MAX.into(),
            Self::I32 => i32::MAX.into(),
            Self::I64 => i64::MAX.into(),
            Self::Isize => isize::MAX as i128,
            Self::U8 => u8::MAX.into(),
            Self::U16 => u16::MAX.into(),
            Self::U32 => u32::MAX.into(),
            Self::U64 => u64::MAX.into(),
            Self::Usize => usize::MAX as i128,
            Self::I128 | Self::U128 => i128::MAX,
        }
    }

    fn contains(self, value: i128) -> bool {
        (self.min()..=self.max()).contains(&value)
    }
}

/// What kind of checks a field supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticType {
    /// `String`: length bounds, presence, literal enums
    String,
    /// Primitive integers: value bounds, integer enums
    Integer(IntegerKind),
    /// Anything else; constraints are recorded but never checked
    Other(String),
}

impl SemanticType {
    /// Classify a declared field type.
    pub fn of(ty: &TypeRef) -> Self {
        match ty.as_named() {
            Some("String") => Self::String,
            Some(name) => IntegerKind::from_name(name)
                .map_or_else(|| Self::Other(name.to_string()), Self::Integer),
            None => Self::Other(ty.to_string()),
        }
    }
}

/// Compiled validation metadata for one record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name used in error messages
    pub name: String,
    /// Identifier used for member access
    pub ident: String,
    /// Check family selected from the declared type
    pub semantic_type: SemanticType,
    /// Constraints in tag order
    pub constraints: Vec<Constraint>,
}

/// Resolve the record an API spec consumes and compile its tagged fields.
///
/// Fields keep declaration order; untagged fields are left out.
pub fn compile_fields(spec: &ApiSpec, tree: &DeclarationTree) -> Result<Vec<FieldSpec>> {
    let record = tree
        .record(&spec.param_type_name)
        .ok_or_else(|| GenerateError::UndeclaredParamType {
            function: spec.handler_name.clone(),
            ty: spec.param_type_name.clone(),
        })?;
    Ok(record
        .fields
        .iter()
        .filter_map(|field| {
            let tag = field.tag.as_deref()?;
            Some(FieldSpec {
                name: field.name.clone(),
                ident: field.ident.clone(),
                semantic_type: SemanticType::of(&field.ty),
                constraints: parse_tag(tag),
            })
        })
        .collect())
}

/// A single executable validation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// String must be non-empty
    NotEmpty,
    /// Integer must be `>=` the bound
    MinValue(i128),
    /// Integer must be `<=` the bound
    MaxValue(i128),
    /// String must have at least this many characters
    MinLength(usize),
    /// String must have at most this many characters
    MaxLength(usize),
    /// String must equal one of the literals
    OneOfStr(Vec<String>),
    /// Integer must equal one of the values
    OneOfInt(Vec<i128>),
}

/// A check bound to a field, with the exact client-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCheck {
    /// Field identifier for member access
    pub field: String,
    /// What to verify
    pub check: Check,
    /// 400 message when the check fails
    pub message: String,
}

/// Compile a field's constraints into checks, in constraint order.
///
/// `record` is only used for error reporting. Bounds that cannot be
/// represented for the field's type are rejected here rather than producing
/// code that fails to build.
pub fn compile_checks(record: &str, field: &FieldSpec) -> Result<Vec<FieldCheck>> {
    let mut checks = Vec::new();
    for constraint in &field.constraints {
        let invalid = |reason: String| GenerateError::InvalidConstraint {
            record: record.to_string(),
            field: field.name.clone(),
            constraint: constraint.to_string(),
            reason,
        };
        let name = &field.name;
        let raw = &constraint.raw_value;

        let compiled = match (&field.semantic_type, constraint.kind) {
            (SemanticType::String, ConstraintKind::Required) => {
                Some((Check::NotEmpty, format!("{name} must be not empty")))
            }
            (SemanticType::String, ConstraintKind::Min) => {
                let bound = parse_length(raw).map_err(invalid)?;
                (bound > 0).then(|| {
                    (Check::MinLength(bound), format!("{name} length must be >= {raw}"))
                })
            }
            (SemanticType::String, ConstraintKind::Max) => {
                let bound = parse_length(raw).map_err(invalid)?;
                Some((Check::MaxLength(bound), format!("{name} length must be <= {raw}")))
            }
            (SemanticType::String, ConstraintKind::Enum) => Some((
                Check::OneOfStr(raw.split('|').map(str::to_string).collect()),
                format!("{name} must be one of [{raw}]"),
            )),
            (SemanticType::Integer(kind), ConstraintKind::Min) => {
                let bound = parse_integer(raw, *kind).map_err(invalid)?;
                // A bound at the type minimum can never fail.
                (bound > kind.min())
                    .then(|| (Check::MinValue(bound), format!("{name} must be >= {raw}")))
            }
            (SemanticType::Integer(kind), ConstraintKind::Max) => {
                let bound = parse_integer(raw, *kind).map_err(invalid)?;
                (bound < kind.max())
                    .then(|| (Check::MaxValue(bound), format!("{name} must be <= {raw}")))
            }
            (SemanticType::Integer(kind), ConstraintKind::Enum) => {
                let values = raw
                    .split('|')
                    .map(|literal| parse_integer(literal, *kind))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(invalid)?;
                Some((Check::OneOfInt(values), format!("{name} must be one of [{raw}]")))
            }
            _ => None,
        };

        match compiled {
            Some((check, message)) => checks.push(FieldCheck {
                field: field.ident.clone(),
                check,
                message,
            }),
            None => debug!(
                record,
                field = %field.name,
                constraint = %constraint,
                semantic_type = ?field.semantic_type,
                "Constraint produces no check"
            ),
        }
    }
    Ok(checks)
}

fn parse_length(raw: &str) -> std::result::Result<usize, String> {
    raw.parse::<usize>()
        .map_err(|_| format!("`{raw}` is not a non-negative length"))
}

fn parse_integer(raw: &str, kind: IntegerKind) -> std::result::Result<i128, String> {
    let value = raw
        .trim()
        .parse::<i128>()
        .map_err(|_| format!("`{raw}` is not an integer"))?;
    if kind.contains(value) {
        Ok(value)
    } else {
        Err(format!("`{raw}` is out of range for {kind:?}").to_lowercase())
    }
}
