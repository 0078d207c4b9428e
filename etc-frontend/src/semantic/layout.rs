//! Struct layout calculation
//!
//! Fields are laid out one after another in declaration order, without
//! padding, at the offsets `Type::field_offset` defines. A field whose type
//! has no storage (unsized, or zero bytes such as `unit`) is rejected here
//! rather than silently sharing its offset with the next field.

use crate::semantic::errors::SemanticError;
use crate::types::{Type, TypeError};
use etc_common::{internal_fault, SourceSpan};

/// Information about a struct's memory layout
#[derive(Debug, Clone, PartialEq)]
pub struct StructLayout {
    pub fields: Vec<FieldLayout>,
    /// Size in bytes
    pub total_size: u64,
}

/// Layout information for a single field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldLayout {
    pub name: String,
    pub field_type: Type,
    /// Byte offset from start of struct
    pub offset: u64,
    pub size: u64,
}

impl StructLayout {
    pub fn find_field(&self, field_name: &str) -> Option<&FieldLayout> {
        self.fields.iter().find(|f| f.name == field_name)
    }
}

/// Calculate the memory layout of a struct type
///
/// # Errors
/// `IncompleteType` if a field is `unit`, a function type, or any other type
/// without a non-zero storage size.
pub fn calculate_struct_layout(struct_type: &Type, span: &SourceSpan) -> Result<StructLayout, SemanticError> {
    let Type::Struct { name, fields } = struct_type else {
        internal_fault(format!("layout requested for non-struct {struct_type}"));
    };

    let mut layout_fields = Vec::with_capacity(fields.len());
    for field in fields {
        let size = match field.field_type.size_in_bytes() {
            Some(size) if size > 0 => size,
            _ => {
                return Err(SemanticError::IncompleteType {
                    type_name: format!("field '{}' of struct '{}' has type {}", field.name, name, field.field_type),
                    span: span.clone(),
                });
            }
        };

        let offset = match struct_type.field_offset(&field.name) {
            Ok(offset) => offset,
            Err(TypeError::Unsized { found }) => {
                return Err(SemanticError::IncompleteType {
                    type_name: found.to_string(),
                    span: span.clone(),
                });
            }
            Err(err) => internal_fault(format!("declared field missing from {struct_type}: {err}")),
        };

        layout_fields.push(FieldLayout {
            name: field.name.clone(),
            field_type: field.field_type.clone(),
            offset,
            size,
        });
    }

    let total_size = layout_fields.last().map_or(0, |last| last.offset + last.size);
    Ok(StructLayout {
        fields: layout_fields,
        total_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{StructField, WORD_SIZE};

    fn struct_of(name: &str, fields: Vec<StructField>) -> Type {
        Type::Struct {
            name: name.to_string(),
            fields,
        }
    }

    #[test]
    fn test_simple_struct_layout() {
        let s = struct_of(
            "S",
            vec![
                StructField::new("x", Type::INT),
                StructField::new("flag", Type::BOOL),
                StructField::new("next", Type::pointer_to(Type::INT)),
            ],
        );

        let layout = calculate_struct_layout(&s, &SourceSpan::dummy()).expect("Should calculate layout");

        assert_eq!(layout.total_size, 3 * WORD_SIZE);
        assert_eq!(Some(layout.total_size), s.size_in_bytes());
        assert_eq!(layout.fields[0].offset, 0);
        assert_eq!(layout.fields[1].offset, WORD_SIZE);
        assert_eq!(layout.find_field("next").map(|f| f.offset), Some(2 * WORD_SIZE));
        assert!(layout.find_field("missing").is_none());
    }

    #[test]
    fn test_nested_struct_layout() {
        let inner = struct_of("Inner", vec![StructField::new("a", Type::INT), StructField::new("b", Type::INT)]);
        let outer = struct_of("Outer", vec![StructField::new("inner", inner), StructField::new("c", Type::BOOL)]);

        let layout = calculate_struct_layout(&outer, &SourceSpan::dummy()).unwrap();
        assert_eq!(layout.fields[1].offset, 2 * WORD_SIZE);
        assert_eq!(layout.fields[1].offset, outer.field_offset("c").unwrap());
        assert_eq!(layout.total_size, 3 * WORD_SIZE);
    }

    #[test]
    fn test_unit_field_is_incomplete() {
        let s = struct_of("S", vec![StructField::new("nothing", Type::UNIT)]);
        let result = calculate_struct_layout(&s, &SourceSpan::dummy());
        assert!(matches!(result, Err(SemanticError::IncompleteType { .. })));
    }

    #[test]
    fn test_empty_struct_field_is_incomplete() {
        let empty = struct_of("E", Vec::new());
        let s = struct_of("S", vec![StructField::new("e", empty), StructField::new("x", Type::INT)]);
        let result = calculate_struct_layout(&s, &SourceSpan::dummy());
        assert!(matches!(result, Err(SemanticError::IncompleteType { .. })));
    }
}
