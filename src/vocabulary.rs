//! Tag vocabularies backing the `updateInterval` and `dataType` fields.
//!
//! [`ensure_vocabularies`] is idempotent: a vocabulary that already exists
//! is left alone, including its tags.

use std::collections::BTreeMap;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::host::HostError;

/// A vocabulary and the tags it is seeded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabularyDef {
    /// Vocabulary name, also used as its id.
    pub name: &'static str,
    /// Seed tags in display order.
    pub tags: &'static [&'static str],
}

/// Update intervals. The blank entry is the "not chosen" placeholder.
pub const UPDATE_INTERVAL: VocabularyDef = VocabularyDef {
    name: "updateInterval",
    tags: &[
        "   ",
        "laufend",
        "alle 4 Jahre",
        "jaehrlich",
        "halbjaehrlich",
        "quartalsweise",
        "monatlich",
        "vierzehntaeglich",
        "woechentlich",
        "taeglich",
        "stuendlich",
        "Echtzeit",
        "sporadisch oder unregelmaessig",
        "keines",
        "laufende Nachfuehrung",
        "keine Nachfuehrung",
    ],
};

/// Kinds of data.
pub const DATA_TYPE: VocabularyDef = VocabularyDef {
    name: "dataType",
    tags: &["   ", "Bilddatei", "Einzeldaten", "Datenaggregat", "Web-Service"],
};

/// All vocabularies the theme relies on.
pub const VOCABULARIES: &[VocabularyDef] = &[UPDATE_INTERVAL, DATA_TYPE];

/// Vocabulary operations on the host platform.
pub trait VocabularyStore {
    /// Returns true if a vocabulary with this name exists.
    ///
    /// # Errors
    ///
    /// Any host failure other than "not found".
    fn vocabulary_exists(&self, name: &str) -> std::result::Result<bool, HostError>;

    /// Creates a vocabulary and returns its id.
    ///
    /// # Errors
    ///
    /// Any host failure.
    fn create_vocabulary(&mut self, name: &str) -> std::result::Result<String, HostError>;

    /// Adds a tag to a vocabulary.
    ///
    /// # Errors
    ///
    /// Any host failure.
    fn create_tag(&mut self, vocabulary_id: &str, tag: &str) -> std::result::Result<(), HostError>;

    /// Lists the tags of a vocabulary.
    ///
    /// # Errors
    ///
    /// [`HostError::NotFound`] if the vocabulary does not exist.
    fn tag_list(&self, vocabulary: &str) -> std::result::Result<Vec<String>, HostError>;
}

/// What a bootstrap run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapReport {
    /// Vocabularies that had to be created.
    pub created_vocabularies: Vec<String>,
    /// Vocabularies that already existed.
    pub skipped_vocabularies: Vec<String>,
    /// Tags added across all created vocabularies.
    pub created_tags: usize,
}

/// Creates every vocabulary in [`VOCABULARIES`] that does not exist yet.
///
/// # Errors
///
/// The first host failure; vocabularies handled before it stay created.
pub fn ensure_vocabularies<S: VocabularyStore + ?Sized>(store: &mut S) -> Result<BootstrapReport> {
    let mut report = BootstrapReport::default();
    for def in VOCABULARIES {
        if store.vocabulary_exists(def.name)? {
            info!("Vocabulary '{}' already exists, skipping.", def.name);
            report.skipped_vocabularies.push(def.name.to_string());
            continue;
        }
        info!("Creating vocab '{}'", def.name);
        let id = store.create_vocabulary(def.name)?;
        for tag in def.tags {
            info!("Adding tag {tag:?} to vocab '{}'", def.name);
            store.create_tag(&id, tag)?;
            report.created_tags += 1;
        }
        report.created_vocabularies.push(def.name.to_string());
    }
    Ok(report)
}

/// Tags of a vocabulary, or `None` if it does not exist.
///
/// # Errors
///
/// Host failures other than "not found".
pub fn vocabulary_tags<S: VocabularyStore + ?Sized>(
    store: &S,
    name: &str,
) -> Result<Option<Vec<String>>> {
    match store.tag_list(name) {
        Ok(tags) => Ok(Some(tags)),
        Err(HostError::NotFound(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Vocabulary store kept in memory, persistable as JSON.
///
/// Vocabulary ids equal their names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryVocabularyStore {
    vocabularies: BTreeMap<String, Vec<String>>,
}

impl MemoryVocabularyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a store from a JSON file; a missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
    }

    /// Writes the store to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

impl VocabularyStore for MemoryVocabularyStore {
    fn vocabulary_exists(&self, name: &str) -> std::result::Result<bool, HostError> {
        Ok(self.vocabularies.contains_key(name))
    }

    fn create_vocabulary(&mut self, name: &str) -> std::result::Result<String, HostError> {
        self.vocabularies.entry(name.to_string()).or_default();
        Ok(name.to_string())
    }

    fn create_tag(&mut self, vocabulary_id: &str, tag: &str) -> std::result::Result<(), HostError> {
        let tags = self
            .vocabularies
            .get_mut(vocabulary_id)
            .ok_or_else(|| HostError::NotFound(format!("Vocabulary {vocabulary_id}")))?;
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
        Ok(())
    }

    fn tag_list(&self, vocabulary: &str) -> std::result::Result<Vec<String>, HostError> {
        self.vocabularies
            .get(vocabulary)
            .cloned()
            .ok_or_else(|| HostError::NotFound(format!("Vocabulary {vocabulary}")))
    }
}
