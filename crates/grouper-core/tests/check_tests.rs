//! Drift detection between the registry and the rules

use grouper_core::{AssetId, CheckStatus, Engine, MemoryCorpus, MemoryRegistry, Registry};
use grouper_fs::NormalizedPath;
use grouper_meta::{AddressMode, BuilderDefinition, Project, TemplateCatalog};
use grouper_test_utils::{batch, rule, template};
use pretty_assertions::assert_eq;

fn project() -> Project {
    let chars = BuilderDefinition::new("chars").with_group(
        rule("Characters")
            .template("packed")
            .pattern(r"^Assets/Chars/(\w+)\.prefab$")
            .label("char_$1")
            .address(AddressMode::FileNameNoExt)
            .build(),
    );
    let ui = BuilderDefinition::new("ui").with_group(
        rule("UI")
            .template("packed")
            .search_in("Assets/UI")
            .label("ui")
            .build(),
    );
    Project::new(
        batch("packed", &[]),
        vec![chars, ui],
        TemplateCatalog::new().with(template("packed", &["Bundled"])),
    )
}

fn reconciled() -> (Engine<MemoryCorpus, MemoryRegistry>, Project) {
    let corpus = MemoryCorpus::with_files([
        "Assets/Chars/hero.prefab",
        "Assets/Chars/ogre.prefab",
        "Assets/UI/button.png",
    ]);
    let mut engine = Engine::new(corpus, MemoryRegistry::new());
    let project = project();
    engine.reconcile(&project).unwrap();
    (engine, project)
}

fn id(path: &str) -> AssetId {
    AssetId::from_path(&NormalizedPath::new(path))
}

#[test]
fn test_reconciled_registry_is_healthy() {
    let (engine, project) = reconciled();

    let report = engine.check(&project).unwrap();

    assert!(report.is_healthy(), "{:?}", report);
    assert_eq!(report.status, CheckStatus::Healthy);
}

#[test]
fn test_empty_registry_is_missing_everything() {
    let corpus = MemoryCorpus::with_files(["Assets/Chars/hero.prefab"]);
    let engine = Engine::new(corpus, MemoryRegistry::new());
    let mut project = project();
    project.builders.truncate(1);

    let report = engine.check(&project).unwrap();

    assert_eq!(report.status, CheckStatus::Missing);
    // Characters, DefaultGroup and the hero entry
    assert_eq!(report.missing.len(), 3);
    assert!(report.drifted.is_empty());
}

#[test]
fn test_manual_move_is_drift() {
    let (mut engine, project) = reconciled();
    let ui = engine.registry().find_group_by_name("UI").unwrap();
    engine
        .registry_mut()
        .create_or_move_entry(&id("Assets/Chars/hero.prefab"), &ui)
        .unwrap();

    let report = engine.check(&project).unwrap();

    assert_eq!(report.status, CheckStatus::Drifted);
    assert_eq!(report.drifted.len(), 1);
    let item = &report.drifted[0];
    assert_eq!(item.group, "Characters");
    assert_eq!(item.subject, "Assets/Chars/hero.prefab");
    assert!(item.description.contains("in group 'UI'"));
}

#[test]
fn test_wrong_address_and_labels_are_drift() {
    let (mut engine, project) = reconciled();
    let ogre = id("Assets/Chars/ogre.prefab");
    engine.registry_mut().set_address(&ogre, "renamed").unwrap();
    engine.registry_mut().remove_entry_label(&ogre, "char_ogre").unwrap();

    let report = engine.check(&project).unwrap();

    assert_eq!(report.drifted.len(), 1);
    let description = &report.drifted[0].description;
    assert!(description.contains("address 'renamed', expected 'ogre'"));
    assert!(description.contains("expected [char_ogre]"));
}

#[test]
fn test_new_asset_is_missing() {
    let (mut engine, project) = reconciled();
    engine.corpus_mut().add_file("Assets/UI/panel.png");

    let report = engine.check(&project).unwrap();

    assert_eq!(report.status, CheckStatus::Missing);
    assert_eq!(report.missing.len(), 1);
    assert_eq!(report.missing[0].subject, "Assets/UI/panel.png");
}

#[test]
fn test_leftovers_are_stale() {
    let (mut engine, project) = reconciled();
    engine.corpus_mut().remove("Assets/UI/button.png");
    engine.registry_mut().create_group("Old", &[]).unwrap();

    let report = engine.check(&project).unwrap();

    assert_eq!(report.status, CheckStatus::Stale);
    let subjects: Vec<_> = report.stale.iter().map(|i| i.subject.as_str()).collect();
    // The entry, its now unused label and the untargeted group
    assert_eq!(subjects.len(), 3);
    assert!(subjects.contains(&"ui"));
    assert!(subjects.contains(&"Old"));
}

#[test]
fn test_check_does_not_mutate() {
    let (engine, project) = reconciled();
    let before = engine.registry().state().clone();

    engine.check(&project).unwrap();

    assert_eq!(engine.registry().state(), &before);
    assert_eq!(engine.registry().persist_count(), 1);
}
