use biblio_core::{Column, FieldKind, FieldValue, IdentityGeneration, TableId};

#[test]
fn serializes_column_metadata_deterministically() {
    let column = Column {
        ordinal_position: 1,
        name: "author_id".to_string(),
        data_type: "integer".to_string(),
        is_nullable: false,
        default: None,
        identity: Some(IdentityGeneration::ByDefault),
    };

    let json = serde_json::to_string_pretty(&column).expect("serialize column");
    let expected = r#"{
  "ordinal_position": 1,
  "name": "author_id",
  "data_type": "integer",
  "is_nullable": false,
  "default": null,
  "identity": "by_default"
}"#;
    assert_eq!(json, expected);
    assert!(column.is_database_assigned());
    assert_eq!(column.kind(), Some(FieldKind::Integer));
}

#[test]
fn serial_default_counts_as_database_assigned() {
    let column = Column {
        ordinal_position: 1,
        name: "topic_id".to_string(),
        data_type: "integer".to_string(),
        is_nullable: false,
        default: Some("nextval('\"Topic_topic_id_seq\"'::regclass)".to_string()),
        identity: None,
    };
    assert!(column.is_database_assigned());
}

#[test]
fn table_ids_serialize_with_database_names() {
    let json = serde_json::to_string(&TableId::ArticleAuthor).expect("serialize table id");
    assert_eq!(json, "\"Article_Author\"");
}

#[test]
fn field_values_serialize_untagged() {
    let values = vec![
        FieldValue::Int(7),
        FieldValue::Text("Maria".to_string()),
        FieldValue::Null,
    ];
    let json = serde_json::to_string(&values).expect("serialize values");
    assert_eq!(json, r#"[7,"Maria",null]"#);
}
