//! Tests for the CLI commands

use std::fs;
use tempfile::TempDir;
use tripforge::schema::itinerary::itinerary_schema;
use tripforge::{GeneratorConfig, SchemaError, ScriptAssembler};
use tripforge_migrate::commands::{self, InitOutcome};

fn assembler_in(temp_dir: &TempDir) -> ScriptAssembler {
    ScriptAssembler::new(GeneratorConfig {
        output_dir: temp_dir.path().join("migrations"),
        ..Default::default()
    })
}

#[test]
fn test_load_schema_defaults_to_builtin() {
    let schema = commands::load_schema(None).unwrap();
    assert_eq!(schema, itinerary_schema());
}

#[test]
fn test_load_schema_from_json_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("schema.json");
    fs::write(
        &path,
        r#"{ "tags": { "id": { "type": "SERIAL", "primaryKey": true } } }"#,
    )
    .unwrap();

    let schema = commands::load_schema(Some(path.as_path())).unwrap();
    assert_eq!(schema.table_names().collect::<Vec<_>>(), vec!["tags"]);
}

#[test]
fn test_load_schema_rejects_unknown_extension() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("schema.yaml");
    fs::write(&path, "tags: {}").unwrap();

    let err = commands::load_schema(Some(path.as_path())).unwrap_err();
    assert!(format!("{:#}", err).contains("expected a .json or .toml extension"));
}

#[test]
fn test_init_generates_once() {
    let temp_dir = TempDir::new().unwrap();
    let assembler = assembler_in(&temp_dir);
    let schema = itinerary_schema();

    let generated = match commands::init(&assembler, &schema).unwrap() {
        InitOutcome::Generated(generated) => generated,
        other => panic!("expected a new script, got {other:?}"),
    };

    match commands::init(&assembler, &schema).unwrap() {
        InitOutcome::AlreadyInitialized(latest) => assert_eq!(latest.path, generated.path),
        other => panic!("expected existing script, got {other:?}"),
    }

    assert_eq!(commands::list(&assembler.config().output_dir).unwrap().len(), 1);
}

#[test]
fn test_list_empty_directory() {
    let temp_dir = TempDir::new().unwrap();
    let scripts = commands::list(&temp_dir.path().join("missing")).unwrap();
    assert!(scripts.is_empty());
}

#[test]
fn test_verify_up_to_date_script() {
    let temp_dir = TempDir::new().unwrap();
    let assembler = assembler_in(&temp_dir);
    let schema = itinerary_schema();

    let generated = commands::generate(&assembler, &schema).unwrap();
    let latest = commands::verify(&assembler, &schema).unwrap();
    assert_eq!(latest.path, generated.path);
    assert_eq!(latest.checksum, generated.checksum);
}

#[test]
fn test_verify_detects_edited_script() {
    let temp_dir = TempDir::new().unwrap();
    let assembler = assembler_in(&temp_dir);
    let schema = itinerary_schema();

    let generated = commands::generate(&assembler, &schema).unwrap();
    fs::write(&generated.path, format!("{}-- local edit\n", generated.sql)).unwrap();

    let err = commands::verify(&assembler, &schema).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SchemaError>(),
        Some(SchemaError::ChecksumMismatch { .. })
    ));
}

#[test]
fn test_verify_without_scripts_fails() {
    let temp_dir = TempDir::new().unwrap();
    let err = commands::verify(&assembler_in(&temp_dir), &itinerary_schema()).unwrap_err();
    assert!(err.to_string().contains("No schema script found"));
}

#[test]
fn test_print_matches_generated_file() {
    let temp_dir = TempDir::new().unwrap();
    let assembler = assembler_in(&temp_dir);
    let schema = itinerary_schema();

    let printed = commands::print(&assembler, &schema).unwrap();
    let generated = commands::generate(&assembler, &schema).unwrap();
    assert_eq!(printed, fs::read_to_string(&generated.path).unwrap());
}

#[test]
fn test_validate_reports_all_problems() {
    let schema = tripforge::schema::document::from_json_str(
        r#"{
            "expenses": {
                "activity_id": { "type": "INTEGER", "references": { "table": "activities" } },
                "indexes": [ { "columns": ["amount"] } ]
            }
        }"#,
    )
    .unwrap();

    let problems = commands::validate(&schema);
    assert_eq!(problems.len(), 2);
    assert!(commands::validate(&itinerary_schema()).is_empty());
}
