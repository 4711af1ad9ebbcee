//! Hand-written `.grouper/` configurations

use grouper_core::{Engine, Error, FileRegistry, FsCorpus};
use grouper_meta::{AddressMode, ProjectLoader};
use grouper_test_utils::TestProject;
use pretty_assertions::assert_eq;

const BATCH: &str = r#"
default_template = "packed"
builders = ["characters"]
keep_groups = ["^Built In Data$"]
"#;

const CHARACTERS: &str = r#"
case_insensitive = true
ignore_patterns = ["/wip/"]

[[group]]
name = "Characters"
template = "packed"
filter = "t:prefab"
pattern = '^Assets/Characters/(\w+)/.*$'
label = "char_$1"
address = "folder-key-and-file-name"

[[group.additional_labels]]
label = "boss"
pattern = '^.*/Bosses/.*$'
"#;

const PACKED: &str = r#"
description = "Everything in one bundle"
schemas = ["Bundled"]

[settings]
compression = "lz4"
include_in_build = true
"#;

fn project_with(builder: &str) -> TestProject {
    let test = TestProject::new();
    test.write_file(".grouper/config.toml", BATCH);
    test.write_file(".grouper/templates/packed.toml", PACKED);
    test.write_file(".grouper/builders/characters.toml", builder);
    test.add_assets(&[
        "Assets/Characters/Knight/knight.prefab",
        "Assets/Characters/WIP/squire.prefab",
    ]);
    test
}

#[test]
fn test_loads_hand_written_configuration() {
    let test = project_with(CHARACTERS);

    let project = ProjectLoader::new().load(&test.normalized_root()).unwrap();

    assert_eq!(project.batch.default_group, "DefaultGroup");
    assert!(project.batch.remove_unused_groups);
    let builder = project.builder("characters").unwrap();
    assert!(builder.case_insensitive);
    let group = &builder.groups[0];
    assert_eq!(group.address, AddressMode::FolderKeyAndFileName);
    assert_eq!(group.additional_labels[0].label, "boss");
    let packed = project.templates.get("packed").unwrap();
    assert_eq!(packed.settings["include_in_build"], serde_json::json!(true));
    assert!(project.validate().is_ok());
}

#[test]
fn test_hand_written_configuration_reconciles() {
    let test = project_with(CHARACTERS);
    let project = ProjectLoader::new().load(&test.normalized_root()).unwrap();
    let registry = FileRegistry::load_or_create(test.registry_path()).unwrap();
    let mut engine = Engine::new(FsCorpus::new(test.normalized_root()), registry);

    let report = engine.reconcile(&project).unwrap();

    // The case-insensitive ignore drops the WIP folder
    assert_eq!(report.entries_created, 1);
    test.assert_file_contains(".grouper/registry.toml", "char_Knight");
}

#[test]
fn test_unknown_address_mode_fails_to_load() {
    let test = project_with(&CHARACTERS.replace("folder-key-and-file-name", "by-magic"));

    assert!(ProjectLoader::new().load(&test.normalized_root()).is_err());
}

#[test]
fn test_missing_builder_file_fails_to_load() {
    let test = project_with(CHARACTERS);
    test.write_file(
        ".grouper/config.toml",
        "default_template = \"packed\"\nbuilders = [\"characters\", \"ui\"]\n",
    );

    let err = ProjectLoader::new()
        .load(&test.normalized_root())
        .unwrap_err();

    assert!(matches!(err, grouper_meta::Error::BuilderNotFound { ref name, .. } if name == "ui"));
}

#[test]
fn test_invalid_regex_is_reported_before_any_write() {
    let test = project_with(&CHARACTERS.replace(r"(\w+)", r"(\w+"));
    let project = ProjectLoader::new().load(&test.normalized_root()).unwrap();
    let registry = FileRegistry::load_or_create(test.registry_path()).unwrap();
    let mut engine = Engine::new(FsCorpus::new(test.normalized_root()), registry);

    let err = engine.reconcile(&project).unwrap_err();

    assert!(matches!(err, Error::Meta(grouper_meta::Error::Invalid { .. })));
    assert!(err.is_configuration());
    assert!(!test.root().join(".grouper/registry.toml").exists());
}
