use std::fs;
use std::path::PathBuf;

use cfgtree::{ConfigError, ConfigFile, SchemaType};
use serde_json::json;

fn app_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "port": { "type": "number", "default": 4200 }
        }
    })
}

fn setup(
    schema: &serde_json::Value,
    config: Option<&serde_json::Value>,
) -> (tempfile::TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = dir.path().join("schema.json");
    fs::write(&schema_path, serde_json::to_string(schema).unwrap()).unwrap();
    let config_path = dir.path().join("config.json");
    if let Some(config) = config {
        fs::write(&config_path, serde_json::to_string(config).unwrap()).unwrap();
    }
    (dir, schema_path, config_path)
}

#[test]
fn loads_values_and_schema_defaults() {
    let (_dir, schema, config) = setup(&app_schema(), Some(&json!({ "name": "app" })));
    let file = ConfigFile::from_path(&schema, &config, &[]).unwrap();

    assert_eq!(file.get("name").unwrap(), Some(json!("app")));
    assert_eq!(file.get("port").unwrap(), Some(json!(4200)));
    assert!(!file.is_defined("port").unwrap());
    assert_eq!(file.type_of("port").unwrap(), Some(SchemaType::Number));
    assert_eq!(file.type_of("missing").unwrap(), None);
    assert!(!file.dirty());
}

#[test]
fn set_coerces_and_marks_dirty() {
    let (_dir, schema, config) = setup(&app_schema(), Some(&json!({ "name": "app" })));
    let mut file = ConfigFile::from_path(&schema, &config, &[]).unwrap();

    file.set("port", &json!("8080")).unwrap();
    assert_eq!(file.get("port").unwrap(), Some(json!(8080)));
    assert!(file.dirty());
    assert!(file.serialize().unwrap().contains("\"port\": 8080"));
}

#[test]
fn save_round_trips_through_the_file() {
    let (_dir, schema, config) = setup(&app_schema(), Some(&json!({ "name": "app" })));
    let mut file = ConfigFile::from_path(&schema, &config, &[]).unwrap();
    file.set("port", &json!(8080)).unwrap();
    file.save().unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config).unwrap()).unwrap();
    assert_eq!(written, json!({ "name": "app", "port": 8080 }));

    let reloaded = ConfigFile::from_path(&schema, &config, &[]).unwrap();
    assert_eq!(reloaded.get("name").unwrap(), Some(json!("app")));
    assert_eq!(reloaded.get("port").unwrap(), Some(json!(8080)));
    assert!(reloaded.is_defined("port").unwrap());
}

#[test]
fn on_disk_format_is_stable() {
    let (dir, schema, config) = setup(&app_schema(), Some(&json!({ "name": "app" })));
    let file = ConfigFile::from_path(&schema, &config, &[]).unwrap();

    let out = dir.path().join("out.json");
    file.save_to(&out).unwrap();
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "{\n  \"name\": \"app\"\n}\n"
    );
}

#[test]
fn undefined_properties_are_never_written() {
    let schema = json!({
        "type": "object",
        "properties": {
            "a": { "type": "string" },
            "b": { "type": "string" }
        }
    });
    let (_dir, schema, config) = setup(&schema, Some(&json!({ "a": "value" })));
    let file = ConfigFile::from_path(&schema, &config, &[]).unwrap();

    let text = file.serialize().unwrap();
    assert!(text.contains("\"a\""));
    assert!(!text.contains("\"b\""));
}

#[test]
fn missing_config_file_starts_empty() {
    let (_dir, schema, config) = setup(&app_schema(), None);
    let mut file = ConfigFile::from_path(&schema, &config, &[]).unwrap();

    assert_eq!(file.get("name").unwrap(), None);
    assert_eq!(file.get("port").unwrap(), Some(json!(4200)));
    assert!(!file.dirty());

    file.set("name", &json!("fresh")).unwrap();
    file.save().unwrap();
    assert!(config.exists());
}

#[test]
fn malformed_config_aborts_the_load() {
    let (_dir, schema, config) = setup(&app_schema(), None);
    fs::write(&config, "{ not json").unwrap();

    let err = ConfigFile::from_path(&schema, &config, &[]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::InvalidConfig { .. })
    ));
}

#[test]
fn malformed_schema_aborts_the_load() {
    let (_dir, schema, config) = setup(&app_schema(), Some(&json!({})));
    fs::write(&schema, "][").unwrap();

    let err = ConfigFile::from_path(&schema, &config, &[]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::InvalidConfig { .. })
    ));
}

#[test]
fn fallback_files_layer_under_the_config() {
    let (dir, schema, config) = setup(&app_schema(), Some(&json!({ "name": "app" })));
    let global = dir.path().join("global.json");
    fs::write(&global, serde_json::to_string(&json!({ "port": 9 })).unwrap()).unwrap();
    let missing = dir.path().join("nowhere.json");

    let mut file = ConfigFile::from_path(&schema, &config, &[missing, global]).unwrap();

    // the fallback answers before the schema default
    assert_eq!(file.get("port").unwrap(), Some(json!(9)));
    assert!(!file.is_defined("port").unwrap());

    // an explicit write shadows the fallback from then on
    file.set("port", &json!(7)).unwrap();
    assert_eq!(file.get("port").unwrap(), Some(json!(7)));
}

#[test]
fn alias_migrates_a_deprecated_key() {
    let schema = json!({
        "type": "object",
        "properties": { "root": { "type": "string" } }
    });
    let (_dir, schema, config) = setup(&schema, Some(&json!({ "appRoot": "src" })));
    let mut file = ConfigFile::from_path(&schema, &config, &[]).unwrap();

    assert!(!file.is_defined("root").unwrap());
    assert!(file.alias("root", "appRoot").unwrap());
    assert_eq!(file.get("root").unwrap(), Some(json!("src")));
    assert!(file.dirty());

    // the source is defined now, a second migration must not clobber it
    assert!(!file.alias("root", "appRoot").unwrap());
}

#[test]
fn alias_without_a_destination_value_mutates_nothing() {
    let schema = json!({
        "type": "object",
        "properties": { "root": { "type": "string" } }
    });
    let (_dir, schema, config) = setup(&schema, Some(&json!({})));
    let mut file = ConfigFile::from_path(&schema, &config, &[]).unwrap();

    assert!(!file.alias("root", "appRoot").unwrap());
    assert!(!file.is_defined("root").unwrap());
    assert!(!file.dirty());
}

#[test]
fn untyped_keys_survive_a_save() {
    let schema = json!({
        "type": "object",
        "properties": {
            "defaults": { "type": "object", "additionalProperties": true }
        }
    });
    let (_dir, schema, config) = setup(&schema, Some(&json!({ "defaults": { "x": 1 } })));
    let mut file = ConfigFile::from_path(&schema, &config, &[]).unwrap();

    file.set("defaults.y", &json!(2)).unwrap();
    let text = file.serialize().unwrap();
    assert!(text.contains("\"x\": 1"));
    assert!(text.contains("\"y\": 2"));
}

#[test]
fn delete_reverts_to_the_default_and_persists() {
    let (_dir, schema, config) = setup(&app_schema(), Some(&json!({ "port": 9999 })));
    let mut file = ConfigFile::from_path(&schema, &config, &[]).unwrap();

    file.delete("port").unwrap();
    assert_eq!(file.get("port").unwrap(), Some(json!(4200)));
    file.save().unwrap();

    let written = fs::read_to_string(&config).unwrap();
    assert_eq!(written, "{}\n");
}
