use criterion::{Criterion, black_box, criterion_group, criterion_main};
use grouper_core::{Classifier, CompiledBuilder, Engine, MemoryCorpus, MemoryRegistry, NoSymbols};
use grouper_meta::{AddressMode, BuilderDefinition, Project, TemplateCatalog};
use grouper_test_utils::{batch, rule, template};

fn corpus(size: usize) -> MemoryCorpus {
    let mut corpus = MemoryCorpus::new();
    for i in 0..size {
        corpus.add_file(&format!("Assets/Chars/Char{}/model_{}.prefab", i % 50, i));
        corpus.add_file(&format!("Assets/UI/Screen{}/icon_{}.png", i % 20, i));
    }
    corpus
}

fn builder() -> BuilderDefinition {
    let mut builder = BuilderDefinition::new("bench")
        .with_group(
            rule("Characters")
                .template("packed")
                .pattern(r"^Assets/Chars/(\w+)/.*$")
                .label("char_$1")
                .address(AddressMode::FileNameNoExt)
                .build(),
        )
        .with_group(
            rule("UI")
                .template("packed")
                .filter("t:png")
                .address(AddressMode::Dynamic)
                .build(),
        );
    builder.ignore_patterns = vec![r"/Screen1\d/".to_string()];
    builder
}

fn classify_benchmark(c: &mut Criterion) {
    let corpus = corpus(5_000);
    let definition = builder();
    let compiled = CompiledBuilder::compile(&definition).unwrap();

    c.bench_function("classify::report (10k assets, 1 worker)", |b| {
        let classifier = Classifier::new(&corpus).with_workers(1);
        b.iter(|| classifier.report(black_box(&compiled), &NoSymbols).unwrap())
    });

    c.bench_function("classify::report (10k assets, parallel)", |b| {
        let classifier = Classifier::new(&corpus);
        b.iter(|| classifier.report(black_box(&compiled), &NoSymbols).unwrap())
    });
}

fn reconcile_benchmark(c: &mut Criterion) {
    let project = Project::new(
        batch("packed", &[]),
        vec![builder()],
        TemplateCatalog::new().with(template("packed", &["Bundled"])),
    );

    // Converged registry: measures the no-change path
    c.bench_function("engine::reconcile (converged, 2k assets)", |b| {
        let mut engine = Engine::new(corpus(1_000), MemoryRegistry::new());
        engine.reconcile(&project).unwrap();
        b.iter(|| engine.reconcile(black_box(&project)).unwrap())
    });
}

criterion_group!(benches, classify_benchmark, reconcile_benchmark);
criterion_main!(benches);
