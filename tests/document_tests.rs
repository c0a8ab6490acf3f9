//! Document Loading Tests

use std::path::{Path, PathBuf};

use schemabook::{Document, Model, PredefinedScalars, RelationDirection, SchemaError, TypeReference};

fn fixtures_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

#[test]
fn test_json_and_toml_fixtures_agree() {
    let json = Document::from_json_str(include_str!("fixtures/blog.json")).unwrap();
    let toml = Document::from_toml_str(include_str!("fixtures/blog.toml")).unwrap();
    assert_eq!(json, toml);
}

#[test]
fn test_from_path_picks_format_by_extension() {
    let from_json = Document::from_path(fixtures_path().join("blog.json")).unwrap();
    let from_toml = Document::from_path(fixtures_path().join("blog.toml")).unwrap();

    assert_eq!(from_json.title, "Blog");
    assert_eq!(from_json, from_toml);
    assert_eq!(from_json.total_declarations(), 10);
}

#[test]
fn test_fixture_details() {
    let doc = Document::from_path(fixtures_path().join("blog.json")).unwrap();

    let comment = &doc.entity_types["Comment"];
    assert_eq!(comment.description, "A reply to a post");

    let post = &doc.entity_types["Post"];
    assert_eq!(post.fields["tags"].type_ref, TypeReference::list_of("Text"));

    let comments = &post.relations["comments"];
    assert_eq!(comments.label, "Has");
    assert_eq!(comments.direction, RelationDirection::Outbound);
    assert_eq!(comments.related_type, "Comment");
    assert!(comments.fields.contains_key("since"));
}

#[test]
fn test_missing_file() {
    let err = Document::from_path(fixtures_path().join("absent.json")).unwrap_err();
    assert!(matches!(err, SchemaError::Io(_)));
}

#[test]
fn test_toml_document_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiny.toml");
    std::fs::write(
        &path,
        r#"
title = "Tiny"

["composite types".Money]
meta.amount = { type = "Number" }
meta.currency = { type = "Text" }
"#,
    )
    .unwrap();

    let doc = Document::from_path(&path).unwrap();
    let model = Model::build(&doc, &PredefinedScalars::default()).unwrap();
    assert!(model.registry.is_defined("Money"));
}

#[test]
fn test_malformed_toml_reference() {
    let result = Document::from_toml_str(
        r#"
["composite types".Money]
meta.amount = { type = "List<number>" }
"#,
    );
    assert!(matches!(result, Err(SchemaError::Toml(_))));
}
