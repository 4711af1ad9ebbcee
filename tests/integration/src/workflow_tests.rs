//! End-to-end workflow: configure a project on disk, reconcile, edit, check
//! and reset.

use grouper_core::{AssetId, CheckStatus, Engine, FileRegistry, FsCorpus, Registry};
use grouper_fs::NormalizedPath;
use grouper_meta::{AddressMode, BuilderDefinition, Project, ProjectLoader};
use grouper_test_utils::{TestProject, batch, rule, template};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

fn characters() -> BuilderDefinition {
    BuilderDefinition::new("characters").with_group(
        rule("Characters")
            .template("separate")
            .filter("t:prefab")
            .search_in("Assets/Characters")
            .pattern(r"^Assets/Characters/(\w+)/.*$")
            .label("char_$1,characters")
            .address(AddressMode::FileNameNoExt)
            .additional_label("boss", r"^.*/Bosses/.*$")
            .build(),
    )
}

fn ui() -> BuilderDefinition {
    let mut ui = BuilderDefinition::new("ui")
        .with_group(
            rule("UI")
                .template("packed")
                .search_in("Assets/UI")
                .label("ui")
                .address(AddressMode::Dynamic)
                .build(),
        )
        .with_group(
            rule("UI_Debug")
                .template("packed")
                .pattern("^Assets/UI/Debug/.*$")
                .symbol("DEBUG_UI")
                .label("ui,debug")
                .build(),
        );
    ui.ignore_patterns = vec![r"\.psd$".to_string()];
    ui
}

fn setup() -> TestProject {
    let test = TestProject::new();
    test.add_assets(&[
        "Assets/Characters/Knight/knight.prefab",
        "Assets/Characters/Knight/knight.png",
        "Assets/Characters/Bosses/dragon.prefab",
        "Assets/Characters/Editor/knight_preview.prefab",
        "Assets/UI/menu.png",
        "Assets/UI/menu.psd",
        "Assets/UI/Debug/fps.png",
        "Assets/Audio/theme.ogg",
    ]);
    test.write_template(&template("packed", &["Bundled"]).with_setting("compression", "lz4"));
    test.write_template(&template("separate", &["Bundled", "ContentUpdate"]));
    test.write_batch(&batch("packed", &["characters", "ui"]));
    test.write_builder(&characters());
    test.write_builder(&ui());
    test
}

fn load(test: &TestProject) -> Project {
    ProjectLoader::new().load(&test.normalized_root()).unwrap()
}

fn open(test: &TestProject) -> Engine<FsCorpus, FileRegistry> {
    let registry = FileRegistry::load_or_create(test.registry_path()).unwrap();
    Engine::new(FsCorpus::new(test.normalized_root()), registry)
}

fn id(path: &str) -> AssetId {
    AssetId::from_path(&NormalizedPath::new(path))
}

fn group_of(registry: &impl Registry, path: &str) -> Option<String> {
    let entry = registry.find_entry(&id(path))?;
    registry.group(&entry.group).map(|g| g.name)
}

#[test]
fn test_full_workflow() {
    let test = setup();
    let project = load(&test);

    // Dry run first: nothing is written
    let mut engine = open(&test);
    let preview = engine.classify_batch(&project).unwrap();
    assert_eq!(preview.count(), 4);
    assert_eq!(preview.skipped_rules, vec!["ui/UI_Debug"]);
    assert!(!test.root().join(".grouper/registry.toml").exists());

    let report = engine.reconcile(&project).unwrap();
    assert_eq!(report.entries_created, 4);
    test.assert_file_exists(".grouper/registry.toml");

    let registry = engine.registry();
    assert_eq!(
        group_of(registry, "Assets/Characters/Bosses/dragon.prefab"),
        Some("Characters".to_string())
    );
    let dragon = registry
        .find_entry(&id("Assets/Characters/Bosses/dragon.prefab"))
        .unwrap();
    assert_eq!(dragon.address, "dragon");
    assert_eq!(
        dragon.labels,
        BTreeSet::from(["boss".to_string(), "char_Bosses".to_string(), "characters".to_string()])
    );
    assert!(registry.find_entry(&id("Assets/UI/menu.psd")).is_none());
    assert!(
        registry
            .find_entry(&id("Assets/Characters/Editor/knight_preview.prefab"))
            .is_none()
    );
    assert_eq!(engine.check(&project).unwrap().status, CheckStatus::Healthy);

    // A fresh process sees a converged registry
    let mut engine = open(&test);
    assert!(engine.reconcile(&project).unwrap().is_noop());

    // Enable the debug rule: fps.png moves to UI_Debug
    let mut batch_def = project.batch.clone();
    batch_def.symbols = vec!["DEBUG_UI".to_string()];
    test.write_batch(&batch_def);
    let project = load(&test);
    assert_eq!(engine.check(&project).unwrap().status, CheckStatus::Drifted);

    let report = engine.reconcile(&project).unwrap();
    assert_eq!(report.groups_created, 1);
    assert_eq!(
        group_of(engine.registry(), "Assets/UI/Debug/fps.png"),
        Some("UI_Debug".to_string())
    );
    assert!(engine.registry().labels().contains(&"debug".to_string()));

    // Reset empties the registry but keeps groups
    let report = engine.reset().unwrap();
    assert_eq!(report.entries_removed, 4);
    let reloaded = FileRegistry::load(test.registry_path()).unwrap();
    assert!(reloaded.list_entries().is_empty());
    assert_eq!(reloaded.list_groups().len(), 4);
}

#[test]
fn test_removing_a_builder_collects_its_groups() {
    let test = setup();
    let mut engine = open(&test);
    engine.reconcile(&load(&test)).unwrap();

    test.write_batch(&batch("packed", &["characters"]));
    let report = engine.reconcile(&load(&test)).unwrap();

    assert_eq!(report.groups_removed, 1);
    assert_eq!(report.entries_removed, 2);
    assert!(engine.registry().find_group_by_name("UI").is_none());
    assert!(engine.registry().find_group_by_name("DefaultGroup").is_some());
}

#[test]
fn test_template_settings_reach_the_registry() {
    let test = setup();
    let mut engine = open(&test);

    engine.reconcile(&load(&test)).unwrap();

    let ui = engine.registry().find_group_by_name("UI").unwrap();
    let info = engine.registry().group(&ui).unwrap();
    assert_eq!(info.settings["compression"], serde_json::json!("lz4"));
    let characters = engine.registry().find_group_by_name("Characters").unwrap();
    assert_eq!(
        engine.registry().group(&characters).unwrap().schemas,
        vec!["Bundled", "ContentUpdate"]
    );
}

#[test]
fn test_classify_report_serializes() {
    let test = setup();
    let engine = open(&test);

    let report = engine.classify(&load(&test), "characters").unwrap();
    let json = serde_json::to_value(&report).unwrap();

    let paths: Vec<_> = json["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        paths,
        vec![
            "Assets/Characters/Bosses/dragon.prefab",
            "Assets/Characters/Knight/knight.prefab"
        ]
    );
}
