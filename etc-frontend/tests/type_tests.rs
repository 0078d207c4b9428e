//! Tests for type equality, sizes and struct field lookup

use etc_frontend::types::{StructField, Type, TypeError, WORD_SIZE};

fn point(name: &str) -> Type {
    Type::Struct {
        name: name.to_string(),
        fields: vec![StructField::new("x", Type::INT), StructField::new("y", Type::INT)],
    }
}

#[test]
fn test_equality_is_structural() {
    let samples = vec![
        Type::INT,
        Type::BOOL,
        Type::UNIT,
        Type::pointer_to(Type::INT),
        Type::pointer_to(Type::pointer_to(Type::INT)),
        point("P"),
        Type::function(vec![Type::INT], Type::BOOL),
    ];

    for (i, a) in samples.iter().enumerate() {
        // independently constructed copies compare equal
        assert_eq!(a, &a.clone());
        for (j, b) in samples.iter().enumerate() {
            assert_eq!(a == b, i == j, "{a} vs {b}");
            assert_eq!(a == b, b == a);
        }
    }
}

#[test]
fn test_pointer_depth_matters() {
    let single = Type::pointer_to(Type::INT);
    let double = Type::pointer_to(Type::pointer_to(Type::INT));
    assert_ne!(single, double);
    assert_ne!(Type::pointer_to(Type::INT), Type::pointer_to(Type::BOOL));
    assert_eq!(double.pointee(), Some(&single));
}

#[test]
fn test_struct_names_distinguish_identical_layouts() {
    assert_ne!(point("P"), point("Q"));
    assert_eq!(point("P").size_in_bytes(), point("Q").size_in_bytes());
}

#[test]
fn test_field_offsets_follow_declaration_order() {
    let s = Type::Struct {
        name: "S".to_string(),
        fields: vec![StructField::new("x", Type::INT), StructField::new("y", Type::BOOL)],
    };

    assert_eq!(s.field_offset("x"), Ok(0));
    assert_eq!(s.field_offset("y"), Ok(Type::INT.size_in_bytes().unwrap()));
    assert_eq!(s.field_index("y"), Ok(1));
    assert_eq!(s.struct_field("y").map(|f| &f.field_type), Ok(&Type::BOOL));
    assert_eq!(s.size_in_bytes(), Some(2 * WORD_SIZE));
}

#[test]
fn test_lookups_fail_explicitly() {
    let s = point("P");
    assert_eq!(
        s.field_offset("z"),
        Err(TypeError::UnknownField {
            struct_name: "P".to_string(),
            field: "z".to_string(),
        })
    );
    assert!(matches!(Type::INT.field_index("x"), Err(TypeError::NotAStruct { .. })));
}

#[test]
fn test_display_for_diagnostics() {
    assert_eq!(Type::pointer_to(point("P")).to_string(), "*struct P");
    assert_eq!(
        Type::function(vec![Type::INT, Type::pointer_to(Type::BOOL)], Type::UNIT).to_string(),
        "fun(int, *bool) -> unit"
    );
}
