use std::path::Path;

use command_mapper_core::{ArgumentSchema, Command, CommandError, CommandSchema, SchemaPackage};
use command_mapper_db::{MapperConfig, RegistryError, RegistrySource, SchemaRegistry};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const TAR_YAML: &str = r#"
name: tar
options:
  - flag: "-c"
    name: create
  - flag: "-x"
    name: extract
  - flag: "-f"
    name: file
    value:
      type:
        kind: input_path
  - flag: "--exclude"
    repeats: true
    value:
      type:
        kind: str
  - flag: "--compress-level"
    equals: true
    value:
      type:
        kind: num
        range:
          start: 1
          end: 9
arguments:
  - name: members
    repeats: true
    value:
      required: false
"#;

const GIT_JSON: &str = r#"{
  "name": "git",
  "options": [{ "flag": "--no-pager" }],
  "subcommands": [
    {
      "name": "commit",
      "options": [
        { "flag": "--message", "value": { "type": { "kind": "str" } } },
        { "flag": "--amend" }
      ]
    }
  ]
}"#;

fn schema(name: &str) -> CommandSchema {
    CommandSchema::builder(name)
        .argument(ArgumentSchema::new("target"))
        .build()
        .unwrap()
}

fn write(dir: &Path, file: &str, contents: &str) {
    std::fs::write(dir.join(file), contents).unwrap();
}

// ---------------------------------------------------------------------------
// Definition files
// ---------------------------------------------------------------------------

#[test]
fn test_yaml_definition_drives_argv() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "tar.yaml", TAR_YAML);
    write(dir.path(), "archive.tar", "");

    let registry = SchemaRegistry::from_dir(dir.path()).unwrap();
    let mut tar = Command::new(registry.get("tar").unwrap());
    let archive = dir.path().join("archive.tar");
    tar.set_option("create", true).unwrap();
    tar.set_option("file", archive.to_string_lossy().as_ref()).unwrap();
    tar.set_option("exclude", vec!["*.o", "*.tmp"]).unwrap();
    tar.set_option("compress_level", 6).unwrap();
    tar.set_argument("members", vec!["src", "docs"]).unwrap();

    assert_eq!(
        tar.argv().unwrap(),
        vec![
            "tar".to_string(),
            "-c".to_string(),
            "-f".to_string(),
            archive.to_string_lossy().into_owned(),
            "--exclude".to_string(),
            "*.o".to_string(),
            "--exclude".to_string(),
            "*.tmp".to_string(),
            "--compress-level=6".to_string(),
            "src".to_string(),
            "docs".to_string(),
        ]
    );
}

#[test]
fn test_yaml_definition_enforces_types() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "tar.yml", TAR_YAML);

    let registry = SchemaRegistry::from_dir(dir.path()).unwrap();
    let mut tar = Command::new(registry.get("tar").unwrap());
    tar.set_option("compress_level", 12).unwrap();
    assert!(matches!(
        tar.argv().unwrap_err(),
        CommandError::Validation { .. }
    ));

    tar.set_option("compress_level", 3).unwrap();
    tar.set_option("file", "/nonexistent/archive.tar").unwrap();
    let err = tar.argv().unwrap_err();
    assert!(err.to_string().contains("path does not exist"));
}

#[test]
fn test_json_definition_with_subcommands() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "git.json", GIT_JSON);

    let registry = SchemaRegistry::load(dir.path().join("git.json")).unwrap();
    let mut git = Command::new(registry.get("git").unwrap());
    git.set_option("no_pager", true).unwrap();
    git.select_subcommand("commit", [("message", "-fix")])
        .unwrap();

    // A dash-leading separate value would be read as a flag.
    assert!(git.argv().is_err());

    git.select_subcommand("commit", [("message", "fix typo")])
        .unwrap()
        .set_option("amend", true)
        .unwrap();
    assert_eq!(
        git.to_invocation_string().unwrap(),
        "git --no-pager commit --message 'fix typo' --amend"
    );
}

#[test]
fn test_invalid_flag_in_definition_is_parse_error() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "bad.json", r#"{"name": "bad", "options": [{"flag": "verbose"}]}"#);

    assert!(matches!(
        SchemaRegistry::from_dir(dir.path()).unwrap_err(),
        RegistryError::JsonError(_)
    ));
}

#[test]
fn test_name_collision_in_definition() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "cp.json",
        r#"{"name": "cp", "options": [{"flag": "--target"}], "arguments": [{"name": "target"}]}"#,
    );

    match SchemaRegistry::from_dir(dir.path()).unwrap_err() {
        RegistryError::InvalidSchema { command, .. } => assert_eq!(command, "cp"),
        other => panic!("unexpected error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Bundles
// ---------------------------------------------------------------------------

#[test]
fn test_bundle_duplicate_commands_rejected() {
    let dir = TempDir::new().unwrap();
    let mut package = SchemaPackage::new("1.0.0");
    package.schemas.push(schema("git"));
    package.schemas.push(schema("git"));
    write(
        dir.path(),
        "bundle.json",
        &serde_json::to_string(&package).unwrap(),
    );

    assert!(matches!(
        SchemaRegistry::from_bundle(dir.path().join("bundle.json")).unwrap_err(),
        RegistryError::InvalidSchema { .. }
    ));
}

#[test]
fn test_bundle_roundtrip_through_registry() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "tar.yaml", TAR_YAML);
    write(dir.path(), "git.json", GIT_JSON);

    let registry = SchemaRegistry::from_dir(dir.path()).unwrap();
    let package = registry.to_package("1.0.0");
    let bundle = dir.path().join("out").with_extension("yaml");
    std::fs::write(&bundle, serde_yaml::to_string(&package).unwrap()).unwrap();

    let reloaded = SchemaRegistry::from_bundle(&bundle).unwrap();
    assert_eq!(reloaded.commands(), vec!["git", "tar"]);
    assert_eq!(reloaded.get("tar"), registry.get("tar"));
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn test_from_config_merges_sources() {
    let dir = TempDir::new().unwrap();
    let defs = dir.path().join("defs");
    std::fs::create_dir(&defs).unwrap();
    write(&defs, "tar.yaml", TAR_YAML);

    let mut package = SchemaPackage::new("1.0.0");
    package.schemas.push(schema("rsync"));
    write(
        dir.path(),
        "extra.json",
        &serde_json::to_string(&package).unwrap(),
    );
    write(
        dir.path(),
        "command-mapper.yml",
        "schema_dirs: [defs]\nbundles: [extra.json]\nenv:\n  LC_ALL: C\n",
    );

    let config = MapperConfig::load(dir.path().join("command-mapper.yml")).unwrap();
    let registry = SchemaRegistry::from_config(&config).unwrap();
    assert_eq!(registry.commands(), vec!["rsync", "tar"]);
    assert!(matches!(registry.source(), RegistrySource::Config(s) if s.len() == 2));
    assert_eq!(config.env.get("LC_ALL").map(String::as_str), Some("C"));
}

#[test]
fn test_from_config_without_sources() {
    assert!(matches!(
        SchemaRegistry::from_config(&MapperConfig::default()),
        Err(RegistryError::NoSourcesAvailable)
    ));
}
