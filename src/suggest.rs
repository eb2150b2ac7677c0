//! Search-term autosuggest.
//!
//! Suggestions come from the search engine's suggest handler. Private
//! datasets are always excluded; an optional filter query narrows the
//! context further.
//!
//! # Examples
//!
//! ```ignore
//! use ogdzh::suggest::{autosuggest, Suggester};
//!
//! let terms = autosuggest(&engine, "velo", Some("groups:mobilitat"))?;
//! ```

use std::collections::BTreeSet;

use log::error;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ThemeError};
use crate::host::HostError;

/// Path of the suggest request handler on the search engine.
pub const SUGGEST_HANDLER: &str = "/suggest";

/// Number of suggestions requested from the engine.
pub const DEFAULT_SUGGEST_COUNT: usize = 10;

/// Context filter excluding private datasets.
pub const PUBLIC_ONLY: &str = "NOT private";

/// Message returned to clients when the engine fails.
pub const SUGGEST_ERROR: &str = "Error retrieving suggestions from solr";

/// Parameters of one suggest request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestParams {
    /// Partial term typed by the user.
    pub q: String,
    /// Maximum number of suggestions.
    pub count: usize,
    /// Context filter query.
    pub cfq: String,
}

impl SuggestParams {
    /// Builds the request for `q`, restricted to public datasets.
    #[must_use]
    pub fn new(q: impl Into<String>, fq: Option<&str>) -> Self {
        let cfq = match fq.map(str::trim).filter(|fq| !fq.is_empty()) {
            Some(fq) => format!("{PUBLIC_ONLY} AND {fq}"),
            None => PUBLIC_ONLY.to_string(),
        };
        Self {
            q: q.into(),
            count: DEFAULT_SUGGEST_COUNT,
            cfq,
        }
    }

    /// Query string pairs as sent to the suggest handler.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("suggest.q", self.q.clone()),
            ("suggest.count", self.count.to_string()),
            ("suggest.cfq", self.cfq.clone()),
        ]
    }
}

/// One suggestion as returned by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Suggested term.
    pub term: String,
    /// Engine weight, unused for ordering.
    #[serde(default)]
    pub weight: i64,
    /// Payload stored with the term.
    #[serde(default)]
    pub payload: String,
}

/// A search engine that can answer suggest requests.
pub trait Suggester {
    /// Runs the request against all configured suggesters.
    ///
    /// # Errors
    ///
    /// Any failure talking to the engine.
    fn suggest(&self, params: &SuggestParams) -> std::result::Result<Vec<Suggestion>, HostError>;
}

/// Returns the sorted, de-duplicated suggestions for `q`.
///
/// # Errors
///
/// [`ThemeError::Validation`] for an empty `q`; [`ThemeError::Search`] when
/// the engine fails. The engine error is logged, not returned.
pub fn autosuggest<S: Suggester + ?Sized>(
    suggester: &S,
    q: &str,
    fq: Option<&str>,
) -> Result<Vec<String>> {
    if q.trim().is_empty() {
        return Err(ThemeError::validation("q", "Missing search term"));
    }
    let params = SuggestParams::new(q, fq);
    let suggestions = suggester.suggest(&params).map_err(|e| {
        error!("Suggest request for {q:?} failed: {e}");
        ThemeError::Search(SUGGEST_ERROR.to_string())
    })?;
    Ok(suggestions
        .into_iter()
        .map(|s| s.term)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect())
}

/// A suggester over a fixed term list, matching by case-insensitive prefix.
///
/// Context filters are ignored.
#[derive(Debug, Clone, Default)]
pub struct StaticSuggester {
    terms: Vec<String>,
}

impl StaticSuggester {
    /// Creates a suggester over `terms`.
    #[must_use]
    pub fn new<I, T>(terms: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            terms: terms.into_iter().map(Into::into).collect(),
        }
    }
}

impl Suggester for StaticSuggester {
    fn suggest(&self, params: &SuggestParams) -> std::result::Result<Vec<Suggestion>, HostError> {
        let prefix = params.q.to_lowercase();
        Ok(self
            .terms
            .iter()
            .filter(|t| t.to_lowercase().starts_with(&prefix))
            .take(params.count)
            .map(|t| Suggestion {
                term: t.clone(),
                weight: 0,
                payload: String::new(),
            })
            .collect())
    }
}
