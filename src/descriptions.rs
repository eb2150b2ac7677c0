//! Canned, format-keyed resource descriptions.
//!
//! Resources without an explicit description get a short text explaining
//! their file format, plus an optional Markdown link with more details.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ThemeConfig;
use crate::error::Result;
use crate::record::{FieldSource, Resource};

const BUILTIN: &str = include_str!("../config/descriptions.json");

/// Format key used when a resource declares no format.
pub const DEFAULT_FORMAT_KEY: &str = "data";

/// Description of one file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDescription {
    /// Explanatory text, may contain Markdown.
    pub description: String,
    /// Optional Markdown link with further information.
    #[serde(default)]
    pub link: Option<String>,
}

/// Lookup table from lower-cased format to description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceDescriptions {
    formats: HashMap<String, FormatDescription>,
}

impl ResourceDescriptions {
    /// The descriptions shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled JSON is malformed.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN)
    }

    /// Parses a JSON object keyed by format.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not match the expected shape.
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: HashMap<String, FormatDescription> = serde_json::from_str(json)?;
        Ok(parsed.into_iter().collect())
    }

    /// Loads descriptions from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Loads the file named in the configuration, or the built-in table.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured file cannot be loaded.
    pub fn from_config(config: &ThemeConfig) -> Result<Self> {
        match &config.descriptions_path {
            Some(path) => Self::from_json_file(path),
            None => Self::builtin(),
        }
    }

    /// Adds or replaces a description.
    pub fn insert(&mut self, format: &str, description: FormatDescription) {
        self.formats.insert(format.to_lowercase(), description);
    }

    /// Looks a format up, case-insensitively.
    #[must_use]
    pub fn get(&self, format: &str) -> Option<&FormatDescription> {
        self.formats.get(&format.to_lowercase())
    }

    /// Number of known formats.
    #[must_use]
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    /// Returns true if no formats are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Description parts for a resource.
    ///
    /// An explicit `description` wins. Otherwise the format (or `data` when
    /// none is set) selects a canned text and its link; the link is an empty
    /// string when the format has none. Unknown formats yield nothing.
    #[must_use]
    pub fn resource_descriptions(&self, resource: &Resource) -> Vec<String> {
        if let Some(description) = resource.field_text("description") {
            return vec![description.into_owned()];
        }
        let format = resource.format().unwrap_or(DEFAULT_FORMAT_KEY);
        match self.get(format) {
            Some(entry) => vec![
                entry.description.clone(),
                entry.link.clone().unwrap_or_default(),
            ],
            None => Vec::new(),
        }
    }
}

impl FromIterator<(String, FormatDescription)> for ResourceDescriptions {
    fn from_iter<I: IntoIterator<Item = (String, FormatDescription)>>(iter: I) -> Self {
        Self {
            formats: iter
                .into_iter()
                .map(|(format, entry)| (format.to_lowercase(), entry))
                .collect(),
        }
    }
}
