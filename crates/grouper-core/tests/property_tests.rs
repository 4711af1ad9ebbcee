//! Property-based tests for numbering and convergence

use grouper_core::{DynamicNumbering, Engine, MemoryCorpus, MemoryRegistry, split_labels};
use grouper_meta::{AddressMode, BuilderDefinition, Project, TemplateCatalog};
use grouper_test_utils::{batch, rule, template};
use proptest::prelude::*;
use std::collections::HashMap;

const POOL: &[&str] = &[
    "Assets/UI/button.png",
    "Assets/UI/panel.png",
    "Assets/UI/Editor/gizmo.png",
    "Assets/Audio/click.wav",
    "Assets/Audio/music.ogg",
    "Assets/Chars/Hero/hero.prefab",
    "Assets/Chars/Ogre/ogre.prefab",
    "Assets/Chars/Ogre/ogre.png",
];

fn project() -> Project {
    let builder = BuilderDefinition::new("all")
        .with_group(
            rule("Everything")
                .template("packed")
                .label("all")
                .address(AddressMode::Dynamic)
                .build(),
        )
        .with_group(
            rule("Characters")
                .template("packed")
                .pattern(r"^Assets/Chars/(\w+)/.*$")
                .label("char_$1")
                .additional_label("image", r"^.*\.png$")
                .address(AddressMode::FileNameNoExt)
                .build(),
        )
        .with_group(
            rule("Audio")
                .template("packed")
                .filter("t:wav t:ogg")
                .address(AddressMode::Dynamic)
                .build(),
        );
    Project::new(
        batch("packed", &[]),
        vec![builder],
        TemplateCatalog::new().with(template("packed", &[])),
    )
}

proptest! {
    #[test]
    fn prop_dynamic_numbering_is_dense(paths in prop::collection::vec("[a-d]{1,2}", 0..40)) {
        let mut numbering = DynamicNumbering::new();
        let mut first_seen: HashMap<String, usize> = HashMap::new();

        for path in &paths {
            let number = numbering.number_for(path);
            let expected = first_seen.len();
            let assigned = *first_seen.entry(path.clone()).or_insert(expected);
            prop_assert_eq!(number, assigned);
        }
        prop_assert_eq!(numbering.len(), first_seen.len());
    }

    #[test]
    fn prop_split_labels_never_yields_empty(raw in "[a-c,]{0,12}") {
        let labels: Vec<&str> = split_labels(&raw).collect();
        prop_assert!(labels.iter().all(|l| !l.is_empty()));
        prop_assert_eq!(labels.concat(), raw.replace(',', ""));
    }

    #[test]
    fn prop_reconcile_converges(
        first in prop::sample::subsequence(POOL.to_vec(), 0..=POOL.len()),
        second in prop::sample::subsequence(POOL.to_vec(), 0..=POOL.len()),
    ) {
        let project = project();
        let mut engine = Engine::new(MemoryCorpus::with_files(&first), MemoryRegistry::new())
            .with_workers(2);
        engine.reconcile(&project).unwrap();

        // Swap the corpus under the registry and converge again
        let (_, registry) = engine.into_parts();
        let mut engine = Engine::new(MemoryCorpus::with_files(&second), registry);
        engine.reconcile(&project).unwrap();

        // Overlapping rules re-apply in order, so compare outcomes not counters
        let converged = engine.registry().state().clone();
        engine.reconcile(&project).unwrap();
        prop_assert_eq!(engine.registry().state(), &converged);
        let check = engine.check(&project).unwrap();
        prop_assert!(check.is_healthy(), "drift after reconcile: {:?}", check);

        let expected = second.iter().filter(|p| !p.contains("/Editor/")).count();
        prop_assert_eq!(engine.registry().entry_count(), expected);
    }
}
