//! Dataset schema extension.
//!
//! The theme adds a fixed set of metadata fields to the host's dataset and
//! resource schemas. They are declared once in [`EXTENSION_FIELDS`];
//! [`extend_schema`] derives the create, update and show schemas from that
//! table, and [`to_storage`] / [`from_storage`] perform the conversions the
//! rules describe (top-level field to `extras` entry, list field to
//! vocabulary tags, and back).

use indexmap::IndexMap;
use log::debug;
use serde_json::Value;

use crate::error::Result;
use crate::record::{is_empty_value, Dataset, Resource, Tag};
use crate::validation;

/// Where an extension field lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLevel {
    /// On the dataset.
    Dataset,
    /// On each resource.
    Resource,
}

/// How the host persists an extension field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStorage {
    /// Kept as is on the record.
    Plain,
    /// Stored as a key/value pair in the dataset's `extras` list.
    Extra,
    /// Stored as tags of the named vocabulary.
    VocabularyTags(&'static str),
}

/// One validator or converter in a schema entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Absent values are skipped by the remaining rules.
    IgnoreMissing,
    /// Value must be valid text.
    UnicodeSafe,
    /// Leading and trailing whitespace is stripped.
    RemoveWhitespace,
    /// URL check that is skipped for uploads.
    ValidateUrl,
    /// Field moves into `extras` on write.
    ConvertToExtras,
    /// Field is read back from `extras`.
    ConvertFromExtras,
    /// Field values become tags of the vocabulary.
    ConvertToTags(&'static str),
    /// Field is read back from tags of the vocabulary.
    ConvertFromTags(&'static str),
    /// Vocabulary tags are hidden from the free tag list.
    FreeTagsOnly,
}

/// Declaration of one extension field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionField {
    /// Field name.
    pub name: &'static str,
    /// Dataset or resource field.
    pub level: FieldLevel,
    /// Persistence.
    pub storage: FieldStorage,
    /// Extra validators for resource fields, after `IgnoreMissing`.
    pub validators: &'static [Rule],
    /// Whether the field is part of the show schema.
    pub shown: bool,
}

impl ExtensionField {
    const fn extra(name: &'static str) -> Self {
        Self {
            name,
            level: FieldLevel::Dataset,
            storage: FieldStorage::Extra,
            validators: &[],
            shown: true,
        }
    }

    const fn vocabulary(name: &'static str) -> Self {
        Self {
            name,
            level: FieldLevel::Dataset,
            storage: FieldStorage::VocabularyTags(name),
            validators: &[],
            shown: true,
        }
    }

    const fn resource(name: &'static str, validators: &'static [Rule], shown: bool) -> Self {
        Self {
            name,
            level: FieldLevel::Resource,
            storage: FieldStorage::Plain,
            validators,
            shown,
        }
    }
}

/// Every field the theme adds to the host schemas.
pub const EXTENSION_FIELDS: &[ExtensionField] = &[
    ExtensionField::extra("spatialRelationship"),
    ExtensionField::extra("dateFirstPublished"),
    ExtensionField::extra("timeRange"),
    ExtensionField::vocabulary("updateInterval"),
    ExtensionField::extra("version"),
    ExtensionField::extra("dateLastUpdated"),
    ExtensionField::extra("legalInformation"),
    ExtensionField::extra("sszBemerkungen"),
    ExtensionField::vocabulary("dataType"),
    ExtensionField::extra("sszFields"),
    ExtensionField::extra("dataQuality"),
    ExtensionField {
        name: "group",
        level: FieldLevel::Dataset,
        storage: FieldStorage::Plain,
        validators: &[],
        shown: true,
    },
    ExtensionField::resource("zh_hash", &[], true),
    ExtensionField::resource(
        "url",
        &[Rule::UnicodeSafe, Rule::RemoveWhitespace, Rule::ValidateUrl],
        false,
    ),
    ExtensionField::resource("filename", &[Rule::UnicodeSafe, Rule::RemoveWhitespace], true),
];

/// Which host schema is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaAction {
    /// Dataset creation.
    Create,
    /// Dataset update.
    Update,
    /// Dataset display.
    Show,
}

/// A host package schema: rule lists per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSchema {
    /// Dataset-level fields.
    pub fields: IndexMap<String, Vec<Rule>>,
    /// Resource-level fields.
    pub resources: IndexMap<String, Vec<Rule>>,
    /// Rules applied to the `tags` list as a whole.
    pub tag_extras: Vec<Rule>,
}

impl PackageSchema {
    /// Builds the theme's schema for `action` on top of an empty one.
    #[must_use]
    pub fn for_action(action: SchemaAction) -> Self {
        let mut schema = Self::default();
        extend_schema(&mut schema, action);
        schema
    }
}

/// Adds the extension fields to `schema`.
pub fn extend_schema(schema: &mut PackageSchema, action: SchemaAction) {
    let show = action == SchemaAction::Show;
    for field in EXTENSION_FIELDS {
        if show && !field.shown {
            continue;
        }
        let rules = field_rules(field, show);
        match field.level {
            FieldLevel::Dataset => schema.fields.insert(field.name.to_string(), rules),
            FieldLevel::Resource => schema.resources.insert(field.name.to_string(), rules),
        };
    }
    if show && !schema.tag_extras.contains(&Rule::FreeTagsOnly) {
        schema.tag_extras.push(Rule::FreeTagsOnly);
    }
}

fn field_rules(field: &ExtensionField, show: bool) -> Vec<Rule> {
    let mut rules = match (field.storage, show) {
        (FieldStorage::Extra, false) => vec![Rule::IgnoreMissing, Rule::ConvertToExtras],
        (FieldStorage::Extra, true) => vec![Rule::ConvertFromExtras, Rule::IgnoreMissing],
        (FieldStorage::VocabularyTags(vocab), false) => {
            vec![Rule::IgnoreMissing, Rule::ConvertToTags(vocab)]
        },
        (FieldStorage::VocabularyTags(vocab), true) => {
            vec![Rule::ConvertFromTags(vocab), Rule::IgnoreMissing]
        },
        (FieldStorage::Plain, _) => vec![Rule::IgnoreMissing],
    };
    rules.extend_from_slice(field.validators);
    rules
}

/// Converts a submitted dataset into its stored shape.
///
/// Extra fields move into the `extras` list (replacing an entry with the
/// same key), vocabulary fields become tags of their vocabulary.
#[must_use]
pub fn to_storage(dataset: &Dataset) -> Dataset {
    let mut stored = dataset.clone();
    for field in dataset_fields() {
        let Some(value) = stored.fields.shift_remove(field.name) else {
            continue;
        };
        if is_empty_value(&value) {
            continue;
        }
        match field.storage {
            FieldStorage::Extra => set_extra(&mut stored, field.name, extra_text(&value)),
            FieldStorage::VocabularyTags(vocab) => {
                stored
                    .tags
                    .retain(|t| t.vocabulary_id.as_deref() != Some(vocab));
                for name in tag_values(&value) {
                    stored.tags.push(Tag {
                        name,
                        vocabulary_id: Some(vocab.to_string()),
                        ..Tag::default()
                    });
                }
            },
            FieldStorage::Plain => {
                stored.fields.insert(field.name.to_string(), value);
            },
        }
    }
    stored
}

/// Converts a stored dataset into its display shape.
///
/// Extra fields are lifted out of `extras`, vocabulary tags become list
/// fields, and only free tags remain in `tags`.
#[must_use]
pub fn from_storage(dataset: &Dataset) -> Dataset {
    let mut shown = dataset.clone();
    for field in dataset_fields() {
        match field.storage {
            FieldStorage::Extra => {
                if let Some(value) = take_extra(&mut shown, field.name) {
                    shown.fields.insert(field.name.to_string(), value);
                }
            },
            FieldStorage::VocabularyTags(vocab) => {
                let values: Vec<Value> = shown
                    .tags
                    .iter()
                    .filter(|t| t.vocabulary_id.as_deref() == Some(vocab))
                    .map(|t| Value::String(t.name.clone()))
                    .collect();
                if !values.is_empty() {
                    shown.fields.insert(field.name.to_string(), Value::Array(values));
                }
            },
            FieldStorage::Plain => {},
        }
    }
    shown.tags.retain(|t| t.vocabulary_id.is_none());
    shown
}

/// Runs the resource rules of the create/update schema on `resource`.
///
/// # Errors
///
/// [`crate::error::ThemeError::Validation`] when a value fails a validator.
pub fn validate_resource(resource: &mut Resource) -> Result<()> {
    let schema = PackageSchema::for_action(SchemaAction::Create);
    for (name, rules) in &schema.resources {
        for rule in rules {
            let Some(value) = resource.fields.get(name.as_str()) else {
                if *rule == Rule::IgnoreMissing {
                    break;
                }
                continue;
            };
            match rule {
                Rule::IgnoreMissing if is_empty_value(value) => break,
                Rule::UnicodeSafe if !value.is_string() => {
                    let text = value.to_string();
                    resource.set_field(name.as_str(), text);
                },
                Rule::RemoveWhitespace => {
                    if let Some(text) = value.as_str() {
                        let trimmed = text.trim().to_string();
                        resource.set_field(name.as_str(), trimmed);
                    }
                },
                Rule::ValidateUrl => validation::validate_url(resource)?,
                _ => {},
            }
        }
    }
    debug!("Resource '{}' passed schema validation", resource.name().unwrap_or_default());
    Ok(())
}

fn dataset_fields() -> impl Iterator<Item = &'static ExtensionField> {
    EXTENSION_FIELDS
        .iter()
        .filter(|f| f.level == FieldLevel::Dataset)
}

fn extra_text(value: &Value) -> Value {
    match value {
        Value::String(_) => value.clone(),
        other => Value::String(other.to_string()),
    }
}

fn tag_values(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Value::String(s) => vec![s.clone()],
        other => vec![other.to_string()],
    }
}

fn set_extra(dataset: &mut Dataset, key: &str, value: Value) {
    let entry = serde_json::json!({"key": key, "value": value});
    match dataset.fields.get_mut("extras").and_then(Value::as_array_mut) {
        Some(extras) => {
            extras.retain(|e| e.get("key").and_then(Value::as_str) != Some(key));
            extras.push(entry);
        },
        None => {
            dataset.set_field("extras", Value::Array(vec![entry]));
        },
    }
}

fn take_extra(dataset: &mut Dataset, key: &str) -> Option<Value> {
    let extras = dataset.fields.get_mut("extras")?.as_array_mut()?;
    let position = extras
        .iter()
        .position(|e| e.get("key").and_then(Value::as_str) == Some(key))?;
    extras.remove(position).get("value").cloned()
}
