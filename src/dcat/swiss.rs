//! DCAT export profile for the Swiss open government data portal.
//!
//! Each function below is one named step of the `stadtzh_swiss_dcat`
//! profile; [`STEPS`] lists them in emission order. Steps only add triples
//! for fields that are present. Structural problems (a dataset without id
//! or name, a resource without id) are returned as errors.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::record::{Dataset, FieldSource, Resource};

use super::emit::{term, ObjectKind};
use super::mappings;
use super::namespaces::{
    self, adms, dcat, dct, owl, schema, spdx, vcard, xsd, ADMS, DCAT, DCAT_PREFIXES, DCT,
    OGD_THEMES, OWL, RDF, RDFS, SCHEMA, SPDX, VCARD,
};
use super::pipeline::{DatasetStep, ExportContext};
use super::rdf::{RdfGraph, RdfNode};
use super::temporal::TimeInterval;
use super::resource_uri;

/// Dataset fields whose presence makes a contact point worth emitting.
pub const CONTACT_FIELDS: &[&str] = &[
    "contact_uri",
    "contact_name",
    "contact_email",
    "maintainer",
    "maintainer_email",
    "author",
    "author_email",
];

/// Fallback order for the contact point's formatted name.
pub const CONTACT_NAME_FIELDS: &[&str] = &["contact_name", "maintainer", "author"];

/// Steps of the DCAT profile, in emission order.
pub const STEPS: &[DatasetStep] = &[
    DatasetStep::new("dataset_type", dataset_type),
    DatasetStep::new("basic_fields", basic_fields),
    DatasetStep::new("dates", dates),
    DatasetStep::new("identification", identification),
    DatasetStep::new("update_interval", update_interval),
    DatasetStep::new("temporal", temporal),
    DatasetStep::new("themes", themes),
    DatasetStep::new("legal_information", legal_information),
    DatasetStep::new("contact_point", contact_point),
    DatasetStep::new("keywords", keywords),
    DatasetStep::new("distributions", distributions),
    DatasetStep::new("publisher", publisher),
];

fn dataset_type(
    _ctx: &ExportContext<'_>,
    graph: &mut RdfGraph,
    dataset_ref: &RdfNode,
    _dataset: &Dataset,
) -> Result<()> {
    graph.add_type(dataset_ref, DCAT, dcat::DATASET);
    for (prefix, namespace) in DCAT_PREFIXES {
        graph.bind(*prefix, *namespace);
    }
    Ok(())
}

fn basic_fields(
    ctx: &ExportContext<'_>,
    graph: &mut RdfGraph,
    dataset_ref: &RdfNode,
    dataset: &Dataset,
) -> Result<()> {
    let name = dataset.require_name()?;
    graph.add_field(
        dataset_ref,
        &term(OWL, owl::VERSION_INFO),
        dataset,
        &["version", "dcat_version"],
        ObjectKind::Literal,
    );
    graph.add_value(
        dataset_ref,
        &term(DCAT, dcat::LANDING_PAGE),
        &format!("{}/dataset/{name}", ctx.config.site_url),
        ObjectKind::Literal,
    );
    graph.add_value(
        dataset_ref,
        &term(DCT, dct::LANGUAGE),
        &ctx.config.locale_default,
        ObjectKind::Literal,
    );
    Ok(())
}

fn dates(
    _ctx: &ExportContext<'_>,
    graph: &mut RdfGraph,
    dataset_ref: &RdfNode,
    dataset: &Dataset,
) -> Result<()> {
    graph.add_date(
        dataset_ref,
        &term(DCT, dct::MODIFIED),
        dataset,
        &["dateLastUpdated", "metadata_modified"],
    );
    graph.add_date(
        dataset_ref,
        &term(DCT, dct::ISSUED),
        dataset,
        &["dateFirstPublished", "metadata_created"],
    );
    Ok(())
}

fn identification(
    ctx: &ExportContext<'_>,
    graph: &mut RdfGraph,
    dataset_ref: &RdfNode,
    dataset: &Dataset,
) -> Result<()> {
    let id = dataset.require_id()?;
    let locale = ObjectKind::Lang(&ctx.config.locale_default);
    graph.add_value(
        dataset_ref,
        &term(DCT, dct::IDENTIFIER),
        &format!("{id}@{}", ctx.config.organization_slug),
        ObjectKind::Literal,
    );
    graph.add_field(dataset_ref, &term(DCT, dct::TITLE), dataset, &["title"], locale);
    graph.add_field(
        dataset_ref,
        &term(DCT, dct::DESCRIPTION),
        dataset,
        &["notes"],
        locale,
    );
    Ok(())
}

fn update_interval(
    _ctx: &ExportContext<'_>,
    graph: &mut RdfGraph,
    dataset_ref: &RdfNode,
    dataset: &Dataset,
) -> Result<()> {
    let first = dataset
        .field("updateInterval")
        .and_then(|value| super::emit::list_values(value).into_iter().next());
    if let Some(uri) = first.as_deref().and_then(mappings::accrual_periodicity) {
        graph.add_value(
            dataset_ref,
            &term(DCT, dct::ACCRUAL_PERIODICITY),
            &uri,
            ObjectKind::Uri,
        );
    }
    Ok(())
}

fn temporal(
    _ctx: &ExportContext<'_>,
    graph: &mut RdfGraph,
    dataset_ref: &RdfNode,
    dataset: &Dataset,
) -> Result<()> {
    let Some(interval) = TimeInterval::from_record(dataset) else {
        return Ok(());
    };
    let period = graph.new_blank_node();
    graph.add_type(&period, DCT, dct::PERIOD_OF_TIME);
    graph.add_value(
        &period,
        &term(SCHEMA, schema::START_DATE),
        &interval.start_date(),
        ObjectKind::Typed(xsd::DATE),
    );
    graph.add_value(
        &period,
        &term(SCHEMA, schema::END_DATE),
        &interval.end_date(),
        ObjectKind::Typed(xsd::DATE),
    );
    graph.add(dataset_ref.clone(), term(DCT, dct::TEMPORAL), period);
    Ok(())
}

/// Portal themes implied by the dataset's groups and tags.
#[must_use]
pub fn theme_names(dataset: &Dataset) -> BTreeSet<&'static str> {
    let mut names: BTreeSet<&'static str> = dataset
        .groups
        .iter()
        .flat_map(|group| mappings::themes(&group.name).iter().copied())
        .collect();
    if dataset.has_tag(mappings::GEODATA_TAG) {
        names.insert(mappings::GEOGRAPHY_THEME);
    }
    names
}

fn themes(
    _ctx: &ExportContext<'_>,
    graph: &mut RdfGraph,
    dataset_ref: &RdfNode,
    dataset: &Dataset,
) -> Result<()> {
    let predicate = term(DCAT, dcat::THEME);
    for name in theme_names(dataset) {
        graph.add_value(
            dataset_ref,
            &predicate,
            &format!("{OGD_THEMES}{name}"),
            ObjectKind::Uri,
        );
    }
    Ok(())
}

fn legal_information(
    _ctx: &ExportContext<'_>,
    graph: &mut RdfGraph,
    dataset_ref: &RdfNode,
    dataset: &Dataset,
) -> Result<()> {
    graph.add_field(
        dataset_ref,
        &term(DCT, dct::ACCESS_RIGHTS),
        dataset,
        &["legalInformation"],
        ObjectKind::Literal,
    );
    Ok(())
}

fn contact_point(
    _ctx: &ExportContext<'_>,
    graph: &mut RdfGraph,
    dataset_ref: &RdfNode,
    dataset: &Dataset,
) -> Result<()> {
    if !dataset.has_any_field(CONTACT_FIELDS) {
        return Ok(());
    }
    let contact = graph.new_blank_node();
    graph.add_type(&contact, VCARD, vcard::ORGANIZATION);
    graph.add(dataset_ref.clone(), term(DCAT, dcat::CONTACT_POINT), contact.clone());

    // Only the maintainer address, written as stored; name and email do not
    // share a fallback.
    graph.add_field(
        &contact,
        &term(VCARD, vcard::HAS_EMAIL),
        dataset,
        &["maintainer_email"],
        ObjectKind::Uri,
    );
    graph.add_field(
        &contact,
        &term(VCARD, vcard::FN),
        dataset,
        CONTACT_NAME_FIELDS,
        ObjectKind::Literal,
    );
    Ok(())
}

fn keywords(
    ctx: &ExportContext<'_>,
    graph: &mut RdfGraph,
    dataset_ref: &RdfNode,
    dataset: &Dataset,
) -> Result<()> {
    graph.add_values(
        dataset_ref,
        &term(DCAT, dcat::KEYWORD),
        dataset.tags.iter().map(|t| t.name.as_str()),
        ObjectKind::Lang(&ctx.config.locale_default),
    );
    Ok(())
}

fn distributions(
    ctx: &ExportContext<'_>,
    graph: &mut RdfGraph,
    dataset_ref: &RdfNode,
    dataset: &Dataset,
) -> Result<()> {
    let dataset_id = dataset.require_id()?;
    let rights = dataset
        .field_str("license_id")
        .and_then(mappings::rights);
    for resource in &dataset.resources {
        let distribution = RdfNode::uri(resource_uri(ctx.config, dataset_id, resource)?);
        graph.add(
            dataset_ref.clone(),
            term(DCAT, dcat::DISTRIBUTION),
            distribution.clone(),
        );
        add_distribution(ctx, graph, &distribution, resource, rights);
    }
    Ok(())
}

fn add_distribution(
    ctx: &ExportContext<'_>,
    graph: &mut RdfGraph,
    distribution: &RdfNode,
    resource: &Resource,
    rights: Option<&str>,
) {
    graph.add_type(distribution, DCAT, dcat::DISTRIBUTION_CLASS);
    graph.add_value(
        distribution,
        &term(DCT, dct::LANGUAGE),
        &ctx.config.locale_default,
        ObjectKind::Literal,
    );

    for (field, predicate) in [
        ("id", term(DCT, dct::IDENTIFIER)),
        ("name", term(DCT, dct::TITLE)),
        ("description", term(DCT, dct::DESCRIPTION)),
        ("state", term(ADMS, adms::STATUS)),
    ] {
        graph.add_field(distribution, &predicate, resource, &[field], ObjectKind::Literal);
    }

    if let Some(rights) = rights {
        graph.add_value(distribution, &term(DCT, dct::RIGHTS), rights, ObjectKind::Literal);
        graph.add_value(distribution, &term(DCT, dct::LICENSE), rights, ObjectKind::Literal);
    }

    graph.add_list_field(
        distribution,
        &term(DCT, dct::CONFORMS_TO),
        resource,
        "conforms_to",
        ObjectKind::Literal,
    );

    let media_type = term(DCAT, dcat::MEDIA_TYPE);
    match resource.format() {
        Some(format) if format.contains('/') => {
            graph.add_value(distribution, &media_type, format, ObjectKind::Literal);
        },
        format => {
            if let Some(format) = format {
                graph.add_value(distribution, &term(DCT, dct::FORMAT), format, ObjectKind::Literal);
            }
            if let Some(mimetype) = resource.mimetype() {
                graph.add_value(distribution, &media_type, mimetype, ObjectKind::Literal);
            }
        },
    }

    if let Some(url) = resource.url() {
        graph.add_value(distribution, &term(DCAT, dcat::ACCESS_URL), url, ObjectKind::Literal);
        // Service endpoints have no downloadable payload.
        if !resource.format().is_some_and(mappings::is_service_format) {
            graph.add_value(
                distribution,
                &term(DCAT, dcat::DOWNLOAD_URL),
                url,
                ObjectKind::Literal,
            );
        }
    }

    graph.add_date(distribution, &term(DCT, dct::ISSUED), resource, &["created"]);
    graph.add_date(distribution, &term(DCT, dct::MODIFIED), resource, &["last_modified"]);

    if let Some(size) = resource.field_text("size") {
        let byte_size = term(DCAT, dcat::BYTE_SIZE);
        match decimal(&size) {
            Some(value) => graph.add_value(distribution, &byte_size, &value, ObjectKind::Typed(xsd::DECIMAL)),
            None => graph.add_value(distribution, &byte_size, &size, ObjectKind::Literal),
        };
    }

    if let Some(hash) = resource.field_text("hash") {
        let checksum = graph.new_blank_node();
        graph.add_type(&checksum, SPDX, spdx::CHECKSUM_CLASS);
        graph.add_value(
            &checksum,
            &term(SPDX, spdx::CHECKSUM_VALUE),
            &hash,
            ObjectKind::Typed(xsd::HEX_BINARY),
        );
        graph.add_field(
            &checksum,
            &term(SPDX, spdx::ALGORITHM),
            resource,
            &["hash_algorithm"],
            ObjectKind::UriIfHttp,
        );
        graph.add(distribution.clone(), term(SPDX, spdx::CHECKSUM), checksum);
    }
}

/// Formats a numeric size the way the portal expects decimals (`1024.0`).
///
/// Returns `None` for anything that is not a finite number.
#[must_use]
pub fn decimal(raw: &str) -> Option<String> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    if value.fract() == 0.0 && value.abs() < 1e16 {
        Some(format!("{value:.1}"))
    } else {
        Some(value.to_string())
    }
}

fn publisher(
    _ctx: &ExportContext<'_>,
    graph: &mut RdfGraph,
    dataset_ref: &RdfNode,
    dataset: &Dataset,
) -> Result<()> {
    if dataset.organization.is_none() {
        return Ok(());
    }
    let details = graph.new_blank_node();
    graph.add_type(&details, RDF, namespaces::rdf::DESCRIPTION);
    graph.add_field(
        &details,
        &term(RDFS, namespaces::rdf::LABEL),
        dataset,
        &["author"],
        ObjectKind::Literal,
    );
    graph.add(dataset_ref.clone(), term(DCT, dct::PUBLISHER), details);
    Ok(())
}

/// Adds the catalog node.
pub fn catalog(graph: &mut RdfGraph, catalog_ref: &RdfNode) {
    graph.add_type(catalog_ref, DCAT, dcat::CATALOG);
    for (prefix, namespace) in DCAT_PREFIXES {
        graph.bind(*prefix, *namespace);
    }
}
