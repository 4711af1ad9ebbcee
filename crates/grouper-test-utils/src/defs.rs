//! Fluent builders for definitions used in tests.
//!
//! ```rust,no_run
//! use grouper_meta::AddressMode;
//! use grouper_test_utils::{rule, template};
//!
//! let chars = rule("Characters")
//!     .template("packed")
//!     .pattern(r"^Assets/Chars/(\w+)/.*$")
//!     .label("char_$1")
//!     .address(AddressMode::FileNameNoExt)
//!     .build();
//! let packed = template("packed", &["Bundled"]);
//! ```

use grouper_meta::{
    AdditionalLabel, AddressMode, BatchDefinition, GroupDefinition, TemplateDefinition,
};

/// Start a rule targeting group `name`.
pub fn rule(name: &str) -> RuleBuilder {
    RuleBuilder {
        group: GroupDefinition::new(name),
    }
}

/// A template with the given schemas and no settings.
pub fn template(name: &str, schemas: &[&str]) -> TemplateDefinition {
    TemplateDefinition {
        schemas: schemas.iter().map(|s| s.to_string()).collect(),
        ..TemplateDefinition::new(name)
    }
}

/// A batch with a default group using `default_template`, applying
/// `builders` in order.
pub fn batch(default_template: &str, builders: &[&str]) -> BatchDefinition {
    BatchDefinition {
        default_template: Some(default_template.to_string()),
        builders: builders.iter().map(|b| b.to_string()).collect(),
        ..BatchDefinition::default()
    }
}

/// Builder for [`GroupDefinition`].
#[derive(Debug, Clone)]
pub struct RuleBuilder {
    group: GroupDefinition,
}

impl RuleBuilder {
    pub fn template(mut self, template: &str) -> Self {
        self.group.template = Some(template.to_string());
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.group.label = label.to_string();
        self
    }

    pub fn filter(mut self, filter: &str) -> Self {
        self.group.filter = filter.to_string();
        self
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        self.group.pattern = Some(pattern.to_string());
        self
    }

    pub fn symbol(mut self, symbol: &str) -> Self {
        self.group.symbol = Some(symbol.to_string());
        self
    }

    pub fn search_in(mut self, folder: &str) -> Self {
        self.group.search_in_folders.push(folder.to_string());
        self
    }

    pub fn address(mut self, mode: AddressMode) -> Self {
        self.group.address = mode;
        self
    }

    pub fn additional_label(mut self, label: &str, pattern: &str) -> Self {
        self.group
            .additional_labels
            .push(AdditionalLabel::new(label, pattern));
        self
    }

    pub fn build(self) -> GroupDefinition {
        self.group
    }
}

impl From<RuleBuilder> for GroupDefinition {
    fn from(builder: RuleBuilder) -> Self {
        builder.build()
    }
}
