use grouper_fs::{ConfigFormat, ConfigStore, Error, NormalizedPath};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde::{Deserialize, Serialize};
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct TestConfig {
    name: String,
    count: i32,
}

#[rstest]
#[case("config.toml", "name = \"test\"\ncount = 42")]
#[case("config.json", r#"{"name": "test", "count": 42}"#)]
#[case("config.yaml", "name: test\ncount: 42")]
#[case("config.yml", "name: test\ncount: 42")]
fn test_load_by_extension(#[case] file: &str, #[case] content: &str) {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join(file);
    fs::write(&file_path, content).unwrap();

    let config: TestConfig = ConfigStore::new().load(&NormalizedPath::new(&file_path)).unwrap();

    assert_eq!(
        config,
        TestConfig {
            name: "test".into(),
            count: 42
        }
    );
}

#[test]
fn test_detect_format() {
    assert_eq!(ConfigFormat::detect(&"a/b.TOML".into()).unwrap(), ConfigFormat::Toml);
    assert_eq!(ConfigFormat::detect(&"a/b.json".into()).unwrap(), ConfigFormat::Json);
    assert!(matches!(
        ConfigFormat::detect(&"a/b.xyz".into()),
        Err(Error::UnsupportedFormat { .. })
    ));
}

#[test]
fn test_parse_error_names_format() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("broken.toml");
    fs::write(&file_path, "name = ").unwrap();

    let result: grouper_fs::Result<TestConfig> =
        ConfigStore::new().load(&NormalizedPath::new(&file_path));

    match result {
        Err(Error::ConfigParse { format, .. }) => assert_eq!(format, "TOML"),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_roundtrip_toml() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("nested/config.toml"));

    let original = TestConfig {
        name: "roundtrip".into(),
        count: 123,
    };
    let store = ConfigStore::new();

    store.save(&path, &original).unwrap();
    let loaded: TestConfig = store.load(&path).unwrap();

    assert_eq!(original, loaded);
}

#[test]
fn test_save_if_changed_skips_identical_content() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("config.json"));
    let store = ConfigStore::new();
    let config = TestConfig {
        name: "same".into(),
        count: 1,
    };

    assert!(store.save_if_changed(&path, &config).unwrap());
    assert!(!store.save_if_changed(&path, &config).unwrap());

    let changed = TestConfig {
        name: "same".into(),
        count: 2,
    };
    assert!(store.save_if_changed(&path, &changed).unwrap());
}
