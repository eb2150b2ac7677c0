//! Search index hooks.
//!
//! These functions run before a query is sent to the search engine, before
//! a dataset is indexed and after results come back. Index documents and
//! query parameters are plain JSON maps as exchanged with the host.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use indexmap::IndexMap;
use log::{debug, warn};
use serde_json::Value;

use crate::config::ThemeConfig;
use crate::error::{Result, ThemeError};
use crate::helpers::load_json;
use crate::record::{Dataset, FieldSource, Resource};

/// A search request or index document.
pub type SearchDoc = IndexMap<String, Value>;

/// Default ordering when the caller did not ask for one.
pub const DEFAULT_SORT: &str = "score desc, date_last_modified desc";

/// Query fields; `text_de` is analysed as German text.
pub const QUERY_FIELDS: &str = "name^4 title^4 tags^2 groups^2 text_de";

/// Facets shown on the search page, with their labels.
pub const FACETS: &[(&str, &str)] = &[
    ("extras_updateInterval", "Update Interval"),
    ("tags", "Keywords"),
    ("organization", "Organizations"),
    ("res_format", "File Format"),
];

/// Package type handled by the index hook; harvest sources are skipped.
pub const SUPPORTED_PACKAGE_TYPE: &str = "dataset";

/// Fills in default sort order and query fields.
pub fn before_dataset_search(params: &mut SearchDoc) {
    let has_sort = params
        .get("sort")
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty());
    if !has_sort {
        params.insert("sort".into(), Value::from(DEFAULT_SORT));
    }
    params.insert("qf".into(), Value::from(QUERY_FIELDS));
}

/// Facet fields and labels, replacing whatever the host proposed.
#[must_use]
pub fn dataset_facets() -> IndexMap<String, String> {
    FACETS
        .iter()
        .map(|(field, label)| ((*field).to_string(), (*label).to_string()))
        .collect()
}

/// Enriches an index document.
///
/// Adds the distinct lower-cased resource formats, splits the `sszFields`
/// attribute list into names and descriptions, converts the display dates
/// to ISO timestamps and adds the cleaned suggest context.
///
/// # Errors
///
/// Returns an error if `validated_data_dict` is missing or not a dataset.
pub fn before_dataset_index(doc: &mut SearchDoc) -> Result<()> {
    if doc.get("type").and_then(Value::as_str) != Some(SUPPORTED_PACKAGE_TYPE) {
        return Ok(());
    }

    let validated = doc
        .get("validated_data_dict")
        .and_then(Value::as_str)
        .ok_or_else(|| ThemeError::InvalidRecord("index document without validated_data_dict".into()))?;
    let dataset = Dataset::from_json(validated)?;

    doc.insert("res_format".into(), Value::from(resource_formats(&dataset.resources)));

    if let Some(attributes) = doc
        .get("sszFields")
        .and_then(Value::as_str)
        .and_then(load_json)
    {
        let (names, descriptions): (Vec<_>, Vec<_>) = attributes.into_iter().unzip();
        doc.insert("attribute_names".into(), Value::from(names));
        doc.insert("attribute_descriptions".into(), Value::from(descriptions));
        doc.shift_remove("sszFields");
    }

    for (source, target) in [
        ("dateLastUpdated", "date_last_modified"),
        ("dateFirstPublished", "date_first_published"),
    ] {
        if let Some(iso) = doc.get(source).and_then(Value::as_str).and_then(index_date) {
            doc.insert(target.into(), Value::from(iso));
        }
    }

    prepare_suggest_context(doc);
    debug!(
        "Prepared index document for dataset '{}'",
        dataset.name().unwrap_or_default()
    );
    Ok(())
}

/// Distinct lower-cased formats of the given resources, sorted.
#[must_use]
pub fn resource_formats(resources: &[Resource]) -> Vec<String> {
    resources
        .iter()
        .filter_map(Resource::format)
        .map(str::to_lowercase)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Converts `dd.mm.yyyy` to `yyyy-mm-ddT00:00:00Z`.
#[must_use]
pub fn index_date(value: &str) -> Option<String> {
    match NaiveDate::parse_from_str(value.trim(), "%d.%m.%Y") {
        Ok(date) => Some(format!("{}T00:00:00Z", date.format("%Y-%m-%d"))),
        Err(e) => {
            warn!("Cannot index date {value:?}: {e}");
            None
        },
    }
}

/// Removes `-` from a suggestion term.
#[must_use]
pub fn clean_suggestion(term: &str) -> String {
    term.replace('-', "")
}

/// Adds `cleaned_*` copies of groups, tags, license and formats.
pub fn prepare_suggest_context(doc: &mut SearchDoc) {
    for (source, target) in [
        ("groups", "cleaned_groups"),
        ("tags", "cleaned_tags"),
        ("res_format", "cleaned_res_format"),
    ] {
        let cleaned: Vec<Value> = doc
            .get(source)
            .and_then(Value::as_array)
            .map(|terms| {
                terms
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|t| Value::from(clean_suggestion(t)))
                    .collect()
            })
            .unwrap_or_default();
        doc.insert(target.into(), Value::Array(cleaned));
    }
    let license = doc
        .get("license_id")
        .and_then(Value::as_str)
        .map(clean_suggestion);
    doc.insert(
        "cleaned_license_id".into(),
        license.map_or(Value::Null, Value::from),
    );
}

/// Points upload URLs at the frontend's download permalink.
pub fn replace_resource_download_urls(
    resources: &mut [Resource],
    package_name: &str,
    frontend_url: &str,
) {
    for resource in resources.iter_mut().filter(|r| r.is_upload()) {
        let url = format!(
            "{frontend_url}/dataset/{package_name}/download/{}",
            resource.name().unwrap_or_default()
        );
        resource.set_field("url", url);
    }
}

/// Post-processes a shown dataset.
///
/// `data_publisher` mirrors the dataset `url`, upload URLs are rewritten.
pub fn after_dataset_show(dataset: &mut Dataset, config: &ThemeConfig) {
    let publisher = dataset.raw_field("url").cloned().unwrap_or(Value::Null);
    dataset.set_field("data_publisher", publisher);
    if let Some(name) = dataset.name().map(String::from) {
        replace_resource_download_urls(&mut dataset.resources, &name, &config.frontend_url);
    }
}

/// Post-processes search results.
pub fn after_dataset_search(results: &mut [Dataset], config: &ThemeConfig) {
    for dataset in results {
        if let Some(name) = dataset.name().map(String::from) {
            replace_resource_download_urls(&mut dataset.resources, &name, &config.frontend_url);
        }
    }
}
