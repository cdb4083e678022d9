use serde::Serialize;

use crate::{AttributePath, Diagnostics, HostValue};

/// Scalar and collection attribute types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "element", rename_all = "snake_case")]
pub enum AttributeType {
    /// UTF-8 string.
    String,
    /// Boolean flag.
    Bool,
    /// 64-bit integer.
    Int64,
    /// Floating point number.
    Float,
    /// Ordered list of elements.
    List(Box<AttributeType>),
    /// Unordered set of elements.
    Set(Box<AttributeType>),
}

impl AttributeType {
    /// List of strings.
    #[must_use]
    pub fn string_list() -> Self {
        Self::List(Box::new(Self::String))
    }

    /// Set of strings.
    #[must_use]
    pub fn string_set() -> Self {
        Self::Set(Box::new(Self::String))
    }
}

/// How an attribute participates in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// Must be set in configuration.
    Required,
    /// May be set in configuration.
    Optional,
    /// Set only by the provider.
    Computed,
    /// May be set; otherwise filled by the provider.
    OptionalComputed,
}

/// One attribute in a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaAttribute {
    /// Attribute name in snake_case.
    pub name: String,
    /// Value type.
    pub kind: AttributeType,
    /// Configuration requirement.
    pub requirement: Requirement,
    /// Human-readable description.
    pub description: String,
    /// Hide the value in host output.
    pub sensitive: bool,
}

impl SchemaAttribute {
    /// Creates an attribute.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: AttributeType,
        requirement: Requirement,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            requirement,
            description: description.into(),
            sensitive: false,
        }
    }

    /// Required attribute of any type.
    #[must_use]
    pub fn required(
        name: impl Into<String>,
        kind: AttributeType,
        description: impl Into<String>,
    ) -> Self {
        Self::new(name, kind, Requirement::Required, description)
    }

    /// Optional attribute of any type.
    #[must_use]
    pub fn optional(
        name: impl Into<String>,
        kind: AttributeType,
        description: impl Into<String>,
    ) -> Self {
        Self::new(name, kind, Requirement::Optional, description)
    }

    /// Optional attribute the provider fills when omitted.
    #[must_use]
    pub fn optional_computed(
        name: impl Into<String>,
        kind: AttributeType,
        description: impl Into<String>,
    ) -> Self {
        Self::new(name, kind, Requirement::OptionalComputed, description)
    }

    /// Provider-computed attribute of any type.
    #[must_use]
    pub fn computed(
        name: impl Into<String>,
        kind: AttributeType,
        description: impl Into<String>,
    ) -> Self {
        Self::new(name, kind, Requirement::Computed, description)
    }

    /// Required string attribute.
    #[must_use]
    pub fn required_string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, AttributeType::String, Requirement::Required, description)
    }

    /// Optional string attribute.
    #[must_use]
    pub fn optional_string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, AttributeType::String, Requirement::Optional, description)
    }

    /// Computed string attribute.
    #[must_use]
    pub fn computed_string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, AttributeType::String, Requirement::Computed, description)
    }

    /// Optional string the provider fills when omitted.
    #[must_use]
    pub fn optional_computed_string(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            AttributeType::String,
            Requirement::OptionalComputed,
            description,
        )
    }

    /// Optional boolean attribute.
    #[must_use]
    pub fn optional_bool(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, AttributeType::Bool, Requirement::Optional, description)
    }

    /// Computed boolean attribute.
    #[must_use]
    pub fn computed_bool(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, AttributeType::Bool, Requirement::Computed, description)
    }

    /// Optional integer attribute.
    #[must_use]
    pub fn optional_int64(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, AttributeType::Int64, Requirement::Optional, description)
    }

    /// Computed integer attribute.
    #[must_use]
    pub fn computed_int64(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, AttributeType::Int64, Requirement::Computed, description)
    }

    /// Marks the attribute as sensitive.
    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    fn is_computed_only(&self) -> bool {
        self.requirement == Requirement::Computed
    }
}

/// Nesting mode of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NestingMode {
    /// At most one nested object.
    Single,
    /// Ordered list of nested objects.
    List,
}

/// Nested configuration block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NestedBlock {
    /// Block name in snake_case.
    pub name: String,
    /// Nesting mode.
    pub nesting: NestingMode,
    /// Schema of each nested object.
    pub schema: Schema,
    /// Minimum number of entries for list blocks.
    pub min_items: usize,
    /// Maximum number of entries for list blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

impl NestedBlock {
    /// Single nested object.
    #[must_use]
    pub fn single(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            nesting: NestingMode::Single,
            schema,
            min_items: 0,
            max_items: None,
        }
    }

    /// List of nested objects.
    #[must_use]
    pub fn list(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            nesting: NestingMode::List,
            schema,
            min_items: 0,
            max_items: None,
        }
    }

    /// Caps the number of list entries.
    #[must_use]
    pub fn max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }

    /// Requires a minimum number of list entries.
    #[must_use]
    pub fn min_items(mut self, min_items: usize) -> Self {
        self.min_items = min_items;
        self
    }
}

/// Schema of a resource, data source, or nested block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    /// Human-readable description.
    pub description: String,
    /// Attributes in declaration order.
    pub attributes: Vec<SchemaAttribute>,
    /// Nested blocks in declaration order.
    pub blocks: Vec<NestedBlock>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            attributes: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, attribute: SchemaAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Adds a nested block.
    #[must_use]
    pub fn with_block(mut self, block: NestedBlock) -> Self {
        self.blocks.push(block);
        self
    }

    /// Looks up an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&SchemaAttribute> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
    }

    /// Looks up a block by name.
    #[must_use]
    pub fn block(&self, name: &str) -> Option<&NestedBlock> {
        self.blocks.iter().find(|block| block.name == name)
    }

    /// Makes every attribute, nested ones included, provider-computed.
    #[must_use]
    pub fn into_computed(mut self) -> Self {
        for attribute in &mut self.attributes {
            attribute.requirement = Requirement::Computed;
        }
        self.blocks = self
            .blocks
            .into_iter()
            .map(|mut block| {
                block.schema = block.schema.into_computed();
                block.min_items = 0;
                block.max_items = None;
                block
            })
            .collect();
        self
    }

    /// Changes the requirement of a top-level attribute, adding a string
    /// attribute when it is not declared yet.
    #[must_use]
    pub fn with_requirement(mut self, name: &str, requirement: Requirement) -> Self {
        match self
            .attributes
            .iter_mut()
            .find(|attribute| attribute.name == name)
        {
            Some(attribute) => attribute.requirement = requirement,
            None => self.attributes.push(SchemaAttribute::new(
                name,
                AttributeType::String,
                requirement,
                "",
            )),
        }
        self
    }

    /// Checks structural rules: required presence, computed-only attributes,
    /// and list block cardinality.
    #[must_use]
    pub fn validate_config(&self, config: &HostValue) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        self.validate_at(config, &AttributePath::root(), &mut diagnostics);
        diagnostics
    }

    fn validate_at(&self, value: &HostValue, path: &AttributePath, diagnostics: &mut Diagnostics) {
        if !matches!(value, HostValue::Object(_)) {
            return;
        }

        for attribute in &self.attributes {
            let attribute_path = path.child(attribute.name.as_str());
            let field = value.get(attribute.name.as_str()).unwrap_or(&HostValue::Null);

            if attribute.requirement == Requirement::Required && field.is_null() {
                diagnostics.attribute_error(
                    attribute_path,
                    "Missing required argument",
                    format!("The argument \"{}\" is required.", attribute.name),
                );
            } else if attribute.is_computed_only() && !field.is_null() && !field.is_unknown() {
                diagnostics.attribute_error(
                    attribute_path,
                    "Invalid configuration",
                    format!(
                        "\"{}\" is computed by the provider and cannot be configured.",
                        attribute.name
                    ),
                );
            }
        }

        for block in &self.blocks {
            let block_path = path.child(block.name.as_str());
            let field = value.get(block.name.as_str()).unwrap_or(&HostValue::Null);

            match (block.nesting, field) {
                (NestingMode::Single, HostValue::Object(_)) => {
                    block.schema.validate_at(field, &block_path, diagnostics);
                }
                (NestingMode::List, HostValue::List(items) | HostValue::Set(items)) => {
                    if let Some(max_items) = block.max_items
                        && items.len() > max_items
                    {
                        diagnostics.attribute_error(
                            block_path.clone(),
                            "Too many list items",
                            format!(
                                "\"{}\" supports at most {max_items} entries, got {}.",
                                block.name,
                                items.len()
                            ),
                        );
                    }
                    if items.len() < block.min_items {
                        diagnostics.attribute_error(
                            block_path.clone(),
                            "Not enough list items",
                            format!(
                                "\"{}\" requires at least {} entries, got {}.",
                                block.name,
                                block.min_items,
                                items.len()
                            ),
                        );
                    }
                    for (index, item) in items.iter().enumerate() {
                        block
                            .schema
                            .validate_at(item, &block_path.index(index), diagnostics);
                    }
                }
                (NestingMode::List, HostValue::Null) if block.min_items > 0 => {
                    diagnostics.attribute_error(
                        block_path,
                        "Missing required block",
                        format!("At least {} \"{}\" block is required.", block.min_items, block.name),
                    );
                }
                _ => {}
            }
        }
    }
}
