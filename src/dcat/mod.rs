//! Dataset-to-RDF mapping engine.
//!
//! Catalog records are exported as RDF for two consumers: the Swiss open
//! government data portal, which harvests DCAT, and search engines, which
//! read Schema.org `Dataset` markup.
//!
//! # Quick Start
//!
//! ```ignore
//! use ogdzh::config::{RdfFormat, ThemeConfig};
//! use ogdzh::dcat::dataset_to_dcat;
//! use ogdzh::record::Dataset;
//!
//! let config = ThemeConfig::new()
//!     .with_site_url("https://data.stadt-zuerich.ch")
//!     .with_organization_slug("stadt-zurich");
//! let dataset = Dataset::from_json(&std::fs::read_to_string("velo.json")?)?;
//! let graph = dataset_to_dcat(&dataset, &config)?;
//! println!("{}", graph.serialize(RdfFormat::Turtle)?);
//! ```
//!
//! # Profiles
//!
//! A profile is an ordered list of named steps ([`DatasetStep`]). The
//! [`ExportPipeline`] runs the steps of every configured [`Profile`] and
//! returns an [`ExportReport`] with the number of triples each step added.
//!
//! # Modules
//!
//! - `namespaces`: namespace IRIs and vocabulary terms
//! - `rdf`: the in-memory graph and its serialization
//! - `mappings`: frequency, rights and theme tables
//! - `emit`: literal/URI coercion rules
//! - `dates`, `temporal`: date normalization and `timeRange` parsing

mod dates;
mod emit;
mod mappings;
mod namespaces;
mod pipeline;
mod rdf;
mod schemaorg;
mod swiss;
mod temporal;

pub use dates::{normalize as normalize_date, parse_flexible, ParsedDate};
pub use emit::{list_values, term, ObjectKind};
pub use mappings::{
    accrual_periodicity, is_service_format, rights, themes, FREQUENCY_BASE, GEODATA_TAG,
    GEOGRAPHY_THEME, SERVICE_FORMATS,
};
pub use namespaces::{
    adms, dcat, dct, owl, schema, spdx, vcard, xsd, ADMS, DCAT, DCAT_PREFIXES, DCT, FOAF, LOCN,
    OGD_THEMES, OWL, RDF, RDFS, SCHEMA, SCHEMA_ORG_PREFIXES, SKOS, SPDX, TIME, VCARD, XSD,
};
pub use pipeline::{
    DatasetStep, ExportContext, ExportPipeline, ExportReport, Profile, StepFn, StepReport,
};
pub use namespaces::rdf as rdf_terms;
pub use rdf::{RdfGraph, RdfNode, RdfTriple};
pub use swiss::{decimal, theme_names, CONTACT_FIELDS, CONTACT_NAME_FIELDS};
pub use temporal::{TimeInterval, TIME_RANGE_FIELD};

use oxiri::Iri;

use crate::config::ThemeConfig;
use crate::descriptions::ResourceDescriptions;
use crate::error::{Result, ThemeError};
use crate::record::{Dataset, FieldSource, Resource};

/// URI of the catalog node.
#[must_use]
pub fn catalog_uri(config: &ThemeConfig) -> String {
    config.site_url.clone()
}

/// URI of a dataset node: its `uri` field if set, else `{site_url}/dataset/{id}`.
///
/// # Errors
///
/// [`ThemeError::InvalidRecord`] if the dataset has neither `uri` nor `id`,
/// or if its `uri` is not an absolute IRI.
pub fn dataset_uri(config: &ThemeConfig, dataset: &Dataset) -> Result<String> {
    if let Some(uri) = dataset.field_str("uri") {
        return match Iri::parse(uri) {
            Ok(_) => Ok(uri.to_string()),
            Err(e) => Err(ThemeError::InvalidRecord(format!("dataset uri '{uri}': {e}"))),
        };
    }
    Ok(format!("{}/dataset/{}", config.site_url, dataset.require_id()?))
}

/// Public page of a dataset, `{site_url}/dataset/{name}`.
#[must_use]
pub fn dataset_url(config: &ThemeConfig, name: &str) -> String {
    format!("{}/dataset/{name}", config.site_url)
}

/// URI of a distribution node: `{site_url}/dataset/{dataset_id}/resource/{id}`.
///
/// # Errors
///
/// [`ThemeError::InvalidRecord`] if the resource has no id.
pub fn resource_uri(config: &ThemeConfig, dataset_id: &str, resource: &Resource) -> Result<String> {
    let resource_id = resource.id().ok_or_else(|| {
        ThemeError::InvalidRecord(format!(
            "resource '{}' of dataset '{dataset_id}' has no id",
            resource.name().unwrap_or("<unnamed>")
        ))
    })?;
    Ok(format!(
        "{}/dataset/{dataset_id}/resource/{resource_id}",
        config.site_url
    ))
}

fn export_single(dataset: &Dataset, config: &ThemeConfig, profile: Profile) -> Result<RdfGraph> {
    let descriptions = ResourceDescriptions::from_config(config)?;
    let pipeline = ExportPipeline::new(config, &descriptions).with_profile(profile);
    let mut graph = RdfGraph::new();
    let dataset_ref = RdfNode::uri(dataset_uri(config, dataset)?);
    pipeline.graph_from_dataset(dataset, &dataset_ref, &mut graph)?;
    Ok(graph)
}

/// Exports one dataset with the DCAT profile into a fresh graph.
///
/// # Errors
///
/// Returns an error if the record is structurally invalid.
pub fn dataset_to_dcat(dataset: &Dataset, config: &ThemeConfig) -> Result<RdfGraph> {
    export_single(dataset, config, Profile::SwissDcat)
}

/// Exports one dataset with the Schema.org profile into a fresh graph.
///
/// # Errors
///
/// Returns an error if the record is structurally invalid or the
/// configured descriptions file cannot be loaded.
pub fn dataset_to_schema_org(dataset: &Dataset, config: &ThemeConfig) -> Result<RdfGraph> {
    export_single(dataset, config, Profile::SchemaOrg)
}

/// Exports a whole catalog: the catalog node plus every dataset, linked by
/// `dcat:dataset`.
///
/// # Errors
///
/// Fails on the first dataset that cannot be exported; nothing of that
/// dataset ends up in the graph.
pub fn graph_from_catalog(
    pipeline: &ExportPipeline<'_>,
    datasets: &[Dataset],
    graph: &mut RdfGraph,
) -> Result<ExportReport> {
    let config = pipeline.context().config;
    let catalog_ref = RdfNode::uri(catalog_uri(config));
    pipeline.graph_from_catalog(&catalog_ref, graph);

    let mut report = ExportReport::default();
    let link = term(DCAT, dcat::DATASET_PROPERTY);
    for dataset in datasets {
        let dataset_ref = RdfNode::uri(dataset_uri(config, dataset)?);
        report.merge(pipeline.graph_from_dataset(dataset, &dataset_ref, graph)?);
        if pipeline.profiles().contains(&Profile::SwissDcat) {
            graph.add(catalog_ref.clone(), link.as_str(), dataset_ref);
        }
    }
    Ok(report)
}
