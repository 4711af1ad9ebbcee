//! [`TestProject`] builder for asset-grouper test scenarios.

use grouper_fs::NormalizedPath;
use grouper_meta::{BatchDefinition, BuilderDefinition, TemplateDefinition};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A temporary project directory: asset files plus a `.grouper/`
/// configuration directory.
///
/// # Example
///
/// ```rust,no_run
/// use grouper_test_utils::{TestProject, batch, template};
///
/// let project = TestProject::new();
/// project.add_assets(&["Assets/Chars/hero.png", "Assets/UI/button.png"]);
/// project.write_template(&template("packed", &["Bundled"]));
/// project.write_batch(&batch("packed", &[]));
/// project.assert_file_exists(".grouper/config.toml");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn normalized_root(&self) -> NormalizedPath {
        NormalizedPath::new(self.root())
    }

    /// Path of the registry file used by file-registry tests.
    pub fn registry_path(&self) -> NormalizedPath {
        self.normalized_root().join(".grouper/registry.toml")
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write_file(&self, relative: &str, content: &str) {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Create an asset file with placeholder content.
    pub fn add_asset(&self, relative: &str) {
        self.write_file(relative, relative);
    }

    pub fn add_assets(&self, relatives: &[&str]) {
        for relative in relatives {
            self.add_asset(relative);
        }
    }

    pub fn remove_asset(&self, relative: &str) {
        fs::remove_file(self.root().join(relative)).unwrap();
    }

    /// Write `.grouper/config.toml`.
    pub fn write_batch(&self, batch: &BatchDefinition) {
        self.write_file(".grouper/config.toml", &toml::to_string(batch).unwrap());
    }

    /// Write `.grouper/builders/{name}.toml`.
    pub fn write_builder(&self, builder: &BuilderDefinition) {
        self.write_file(
            &format!(".grouper/builders/{}.toml", builder.name),
            &toml::to_string(builder).unwrap(),
        );
    }

    /// Write `.grouper/templates/{name}.toml`.
    pub fn write_template(&self, template: &TemplateDefinition) {
        self.write_file(
            &format!(".grouper/templates/{}.toml", template.name),
            &toml::to_string(template).unwrap(),
        );
    }

    /// Assert that `path` (relative to the project root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to root) contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let full_path = self.root().join(path);
        let file_content = fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()));
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            full_path.display(),
            content,
            file_content
        );
    }
}
