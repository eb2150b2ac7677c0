//! Dataset and resource records as handed over by the host platform.
//!
//! Records are open-ended: besides the structural lists (`tags`, `groups`,
//! `resources`, `organization`) every field is kept in an insertion-ordered
//! map so extension fields survive a round trip untouched.
//!
//! The [`FieldSource`] trait is the field extraction helper used by the RDF
//! profiles: absence is a normal case and never an error.
//!
//! # Examples
//!
//! ```ignore
//! use ogdzh::record::{Dataset, FieldSource};
//!
//! let dataset: Dataset = serde_json::from_str(r#"{"id": "1", "name": "velo"}"#)?;
//! assert_eq!(dataset.field_str("name"), Some("velo"));
//! assert!(dataset.first_field(&["maintainer", "author"]).is_none());
//! ```

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, ThemeError};

/// Returns true for values the host treats as "not set".
///
/// `null`, the empty string, the empty list and the empty object are empty.
/// Whitespace-only strings and `0` are values.
#[must_use]
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Renders a scalar value as text.
///
/// Strings are borrowed, numbers and booleans are formatted. Empty values,
/// lists and objects yield `None`.
#[must_use]
pub fn value_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) if !s.is_empty() => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}

/// Read access to named fields of a record.
///
/// Implementors only provide [`FieldSource::raw_field`]; everything else
/// is derived from it.
pub trait FieldSource {
    /// Returns the stored value for `name`, empty or not.
    fn raw_field(&self, name: &str) -> Option<&Value>;

    /// Returns the value for `name` if present and non-empty.
    fn field(&self, name: &str) -> Option<&Value> {
        self.raw_field(name).filter(|v| !is_empty_value(v))
    }

    /// Returns the first non-empty value among `names`, in order.
    fn first_field(&self, names: &[&str]) -> Option<&Value> {
        names.iter().find_map(|name| self.field(name))
    }

    /// Returns the value for `name` if it is a non-empty string.
    fn field_str(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// Returns the value for `name` rendered as text.
    fn field_text(&self, name: &str) -> Option<Cow<'_, str>> {
        self.field(name).and_then(value_text)
    }

    /// Returns the first of `names` that renders as text.
    fn first_text(&self, names: &[&str]) -> Option<Cow<'_, str>> {
        names.iter().find_map(|name| self.field_text(name))
    }

    /// Returns true if any of `names` holds a non-empty value.
    fn has_any_field(&self, names: &[&str]) -> bool {
        self.first_field(names).is_some()
    }
}

/// A free or vocabulary tag attached to a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag value.
    pub name: String,
    /// Vocabulary the tag belongs to, `None` for free tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary_id: Option<String>,
    /// Any other tag attributes.
    #[serde(flatten)]
    pub fields: IndexMap<String, Value>,
}

impl Tag {
    /// Creates a free tag.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A group (topic) a dataset belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Group slug.
    pub name: String,
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Number of datasets in the group (only in `all_fields` listings).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_count: Option<u64>,
    /// Any other group attributes.
    #[serde(flatten)]
    pub fields: IndexMap<String, Value>,
}

impl Group {
    /// Creates a group reference by slug.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// The organization owning a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    /// Organization slug.
    pub name: String,
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Any other organization attributes.
    #[serde(flatten)]
    pub fields: IndexMap<String, Value>,
}

/// One distribution (file or link) of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// All resource fields in host order.
    #[serde(flatten)]
    pub fields: IndexMap<String, Value>,
}

impl FieldSource for Resource {
    fn raw_field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl Resource {
    /// Storage type marking an uploaded file.
    pub const UPLOAD: &'static str = "upload";

    /// Resource id.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.field_str("id")
    }

    /// Human readable resource name (used by download permalinks).
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.field_str("name")
    }

    /// Access URL or storage reference.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.field_str("url")
    }

    /// Storage type: `upload` or a remote-link marker.
    #[must_use]
    pub fn url_type(&self) -> Option<&str> {
        self.field_str("url_type")
    }

    /// Declared format, e.g. `CSV` or `text/csv`.
    #[must_use]
    pub fn format(&self) -> Option<&str> {
        self.field_str("format")
    }

    /// Declared media type.
    #[must_use]
    pub fn mimetype(&self) -> Option<&str> {
        self.field_str("mimetype")
    }

    /// Original file name of an upload.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.field_str("filename")
    }

    /// Returns true if the payload is stored by the host.
    #[must_use]
    pub fn is_upload(&self) -> bool {
        self.url_type() == Some(Self::UPLOAD)
    }

    /// Sets (or replaces) a field.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }
}

/// One catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Free and vocabulary tags.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Groups the dataset belongs to.
    #[serde(default)]
    pub groups: Vec<Group>,
    /// Distributions, possibly empty.
    #[serde(default)]
    pub resources: Vec<Resource>,
    /// Owning organization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<Organization>,
    /// All remaining dataset fields in host order.
    #[serde(flatten)]
    pub fields: IndexMap<String, Value>,
}

impl FieldSource for Dataset {
    fn raw_field(&self, name: &str) -> Option<&Value> {
        self.fields
            .get(name)
            .filter(|v| !is_empty_value(v))
            .or_else(|| self.extra(name))
            .or_else(|| self.fields.get(name))
    }
}

impl Dataset {
    /// Parses a dataset from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a dataset object.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Dataset id.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.field_str("id")
    }

    /// Dataset slug.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.field_str("name")
    }

    /// Dataset title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.field_str("title")
    }

    /// Package type, `dataset` for regular catalog entries.
    #[must_use]
    pub fn dataset_type(&self) -> Option<&str> {
        self.field_str("type")
    }

    /// Returns the id, or an error naming the dataset if it is missing.
    ///
    /// # Errors
    ///
    /// [`ThemeError::InvalidRecord`] when the id is absent or empty.
    pub fn require_id(&self) -> Result<&str> {
        self.id().ok_or_else(|| {
            ThemeError::InvalidRecord(format!(
                "dataset '{}' has no id",
                self.name().unwrap_or("<unnamed>")
            ))
        })
    }

    /// Returns the name, or an error naming the dataset if it is missing.
    ///
    /// # Errors
    ///
    /// [`ThemeError::InvalidRecord`] when the name is absent or empty.
    pub fn require_name(&self) -> Result<&str> {
        self.name().ok_or_else(|| {
            ThemeError::InvalidRecord(format!(
                "dataset '{}' has no name",
                self.id().unwrap_or("<unknown>")
            ))
        })
    }

    /// Returns true if any tag has the given value.
    #[must_use]
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name == name)
    }

    /// Sets (or replaces) a field.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Looks `key` up in the host's `extras` key/value list.
    fn extra(&self, key: &str) -> Option<&Value> {
        self.fields
            .get("extras")?
            .as_array()?
            .iter()
            .find(|e| e.get("key").and_then(Value::as_str) == Some(key))
            .and_then(|e| e.get("value"))
    }
}

/// Extracts datasets from a host API payload.
///
/// Accepts a bare dataset object, a list of datasets, an action envelope
/// `{"result": ...}` and a search envelope `{"result": {"results": [...]}}`.
///
/// # Errors
///
/// Returns an error if the payload contains no dataset-shaped objects.
pub fn parse_datasets(payload: Value) -> Result<Vec<Dataset>> {
    match payload {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(ThemeError::from))
            .collect(),
        Value::Object(mut map) => {
            if let Some(result) = map.remove("result") {
                return parse_datasets(result);
            }
            if let Some(results) = map.remove("results") {
                return parse_datasets(results);
            }
            Ok(vec![serde_json::from_value(Value::Object(map))?])
        },
        other => Err(ThemeError::InvalidRecord(format!(
            "expected a dataset object or list, got {other}"
        ))),
    }
}
