//! Type system definitions
//!
//! `Type` is a closed set of variants compared structurally: two types are
//! equal iff their shapes match recursively. Nothing in the compiler relies
//! on two equal types being the same allocation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Size of a machine word in bytes. Scalars and pointers occupy one word.
pub const WORD_SIZE: u64 = 8;

/// `int` is a signed word; the largest literal magnitude is that of its minimum
pub const INT_MIN_MAGNITUDE: u64 = i64::MIN.unsigned_abs();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Int,
    Bool,
    /// The empty value, produced by blocks without a trailing expression
    Unit,
}

impl PrimitiveKind {
    /// Primitive named by a surface type name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(PrimitiveKind::Int),
            "bool" => Some(PrimitiveKind::Bool),
            "unit" => Some(PrimitiveKind::Unit),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveKind::Int => write!(f, "int"),
            PrimitiveKind::Bool => write!(f, "bool"),
            PrimitiveKind::Unit => write!(f, "unit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Primitive(PrimitiveKind),

    Pointer(Box<Type>),

    /// Nominal name plus ordered field signature; both take part in equality
    Struct {
        name: String,
        fields: Vec<StructField>,
    },

    Function {
        parameters: Vec<Type>,
        return_type: Box<Type>,
    },
}

/// Struct field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructField {
    pub name: String,
    pub field_type: Type,
}

impl StructField {
    pub fn new(name: &str, field_type: Type) -> Self {
        Self {
            name: name.to_string(),
            field_type,
        }
    }
}

/// Failed lookups on a type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("struct {struct_name} has no field `{field}`")]
    UnknownField { struct_name: String, field: String },

    #[error("type {found} is not a struct")]
    NotAStruct { found: Type },

    #[error("type {found} has no size")]
    Unsized { found: Type },
}

impl Type {
    pub const INT: Type = Type::Primitive(PrimitiveKind::Int);
    pub const BOOL: Type = Type::Primitive(PrimitiveKind::Bool);
    pub const UNIT: Type = Type::Primitive(PrimitiveKind::Unit);

    /// Pointer to `pointee`
    pub fn pointer_to(pointee: Type) -> Type {
        Type::Pointer(Box::new(pointee))
    }

    pub fn function(parameters: Vec<Type>, return_type: Type) -> Type {
        Type::Function {
            parameters,
            return_type: Box::new(return_type),
        }
    }

    pub fn is_int(&self) -> bool {
        *self == Type::INT
    }

    pub fn is_bool(&self) -> bool {
        *self == Type::BOOL
    }

    pub fn is_unit(&self) -> bool {
        *self == Type::UNIT
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Type::Pointer(_))
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, Type::Struct { .. })
    }

    /// Get pointer target type
    pub fn pointee(&self) -> Option<&Type> {
        match self {
            Type::Pointer(target) => Some(target),
            _ => None,
        }
    }

    /// Parameter and return types of a function type
    pub fn function_parts(&self) -> Option<(&[Type], &Type)> {
        match self {
            Type::Function { parameters, return_type } => Some((parameters, return_type)),
            _ => None,
        }
    }

    /// Size in bytes under sequential, unpadded layout
    pub fn size_in_bytes(&self) -> Option<u64> {
        match self {
            Type::Primitive(PrimitiveKind::Unit) => Some(0),
            Type::Primitive(_) | Type::Pointer(_) => Some(WORD_SIZE),
            Type::Struct { fields, .. } => fields
                .iter()
                .try_fold(0u64, |total, field| total.checked_add(field.field_type.size_in_bytes()?)),
            Type::Function { .. } => None,
        }
    }

    fn struct_parts(&self) -> Result<(&str, &[StructField]), TypeError> {
        match self {
            Type::Struct { name, fields } => Ok((name, fields)),
            other => Err(TypeError::NotAStruct { found: other.clone() }),
        }
    }

    /// Zero-based position of a named field
    pub fn field_index(&self, field: &str) -> Result<usize, TypeError> {
        let (struct_name, fields) = self.struct_parts()?;
        fields
            .iter()
            .position(|f| f.name == field)
            .ok_or_else(|| TypeError::UnknownField {
                struct_name: struct_name.to_string(),
                field: field.to_string(),
            })
    }

    pub fn struct_field(&self, field: &str) -> Result<&StructField, TypeError> {
        let index = self.field_index(field)?;
        let (_, fields) = self.struct_parts()?;
        Ok(&fields[index])
    }

    /// Byte offset of a named field from the start of the struct
    pub fn field_offset(&self, field: &str) -> Result<u64, TypeError> {
        let index = self.field_index(field)?;
        let (_, fields) = self.struct_parts()?;
        fields[..index].iter().try_fold(0u64, |offset, f| {
            f.field_type
                .size_in_bytes()
                .map(|size| offset + size)
                .ok_or_else(|| TypeError::Unsized { found: f.field_type.clone() })
        })
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(kind) => write!(f, "{kind}"),
            Type::Pointer(target) => write!(f, "*{target}"),
            Type::Struct { name, .. } => write!(f, "struct {name}"),
            Type::Function { parameters, return_type } => {
                write!(f, "fun(")?;
                for (i, param) in parameters.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ") -> {return_type}")
            }
        }
    }
}
