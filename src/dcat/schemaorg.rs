//! Schema.org flavoured export profile (`stadtzh_schemaorg`).
//!
//! The generic mapping comes first; [`additional_fields`] then applies the
//! city-specific overrides, including the one replace-on-conflict write of
//! `schema:description`.

use crate::error::Result;
use crate::markdown::render_markdown;
use crate::record::{Dataset, FieldSource, Resource};

use super::emit::{term, ObjectKind};
use super::namespaces::{schema, SCHEMA, SCHEMA_ORG_PREFIXES};
use super::pipeline::{DatasetStep, ExportContext};
use super::rdf::{RdfGraph, RdfNode};
use super::temporal::TimeInterval;
use super::{dataset_url, resource_uri};

/// Steps of the Schema.org profile, in emission order.
pub const STEPS: &[DatasetStep] = &[
    DatasetStep::new("dataset_type", dataset_type),
    DatasetStep::new("basic_fields", basic_fields),
    DatasetStep::new("dates", dates),
    DatasetStep::new("publisher", publisher),
    DatasetStep::new("temporal", temporal),
    DatasetStep::new("distributions", distributions),
    DatasetStep::new("additional_fields", additional_fields),
];

fn dataset_type(
    _ctx: &ExportContext<'_>,
    graph: &mut RdfGraph,
    dataset_ref: &RdfNode,
    _dataset: &Dataset,
) -> Result<()> {
    graph.add_type(dataset_ref, SCHEMA, schema::DATASET);
    for (prefix, namespace) in SCHEMA_ORG_PREFIXES {
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
    for (field, predicate) in [
        ("id", schema::IDENTIFIER),
        ("title", schema::NAME),
        ("notes", schema::DESCRIPTION),
        ("version", schema::VERSION),
    ] {
        graph.add_field(
            dataset_ref,
            &term(SCHEMA, predicate),
            dataset,
            &[field],
            ObjectKind::Literal,
        );
    }
    graph.add_value(
        dataset_ref,
        &term(SCHEMA, schema::URL),
        &dataset_url(ctx.config, dataset.require_name()?),
        ObjectKind::Literal,
    );
    let language = dataset
        .field_str("language")
        .unwrap_or(ctx.config.locale_default.as_str());
    graph.add_value(
        dataset_ref,
        &term(SCHEMA, schema::IN_LANGUAGE),
        language,
        ObjectKind::Literal,
    );
    graph.add_values(
        dataset_ref,
        &term(SCHEMA, schema::KEYWORDS),
        dataset.tags.iter().map(|t| t.name.as_str()),
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
        &term(SCHEMA, schema::DATE_PUBLISHED),
        dataset,
        &["dateFirstPublished", "metadata_created"],
    );
    graph.add_date(
        dataset_ref,
        &term(SCHEMA, schema::DATE_MODIFIED),
        dataset,
        &["dateLastUpdated", "metadata_modified"],
    );
    Ok(())
}

fn publisher(
    _ctx: &ExportContext<'_>,
    graph: &mut RdfGraph,
    dataset_ref: &RdfNode,
    dataset: &Dataset,
) -> Result<()> {
    let Some(organization) = &dataset.organization else {
        return Ok(());
    };
    let node = graph.new_blank_node();
    graph.add_type(&node, SCHEMA, schema::ORGANIZATION);
    let name = organization
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(organization.name.as_str());
    graph.add_value(&node, &term(SCHEMA, schema::NAME), name, ObjectKind::Literal);
    graph.add(dataset_ref.clone(), term(SCHEMA, schema::PUBLISHER), node);
    Ok(())
}

fn temporal(
    _ctx: &ExportContext<'_>,
    graph: &mut RdfGraph,
    dataset_ref: &RdfNode,
    dataset: &Dataset,
) -> Result<()> {
    if let Some(interval) = TimeInterval::from_record(dataset) {
        graph.add_value(
            dataset_ref,
            &term(SCHEMA, schema::TEMPORAL_COVERAGE),
            &interval.to_string(),
            ObjectKind::Literal,
        );
    }
    Ok(())
}

fn distributions(
    ctx: &ExportContext<'_>,
    graph: &mut RdfGraph,
    dataset_ref: &RdfNode,
    dataset: &Dataset,
) -> Result<()> {
    let dataset_id = dataset.require_id()?;
    for resource in &dataset.resources {
        let distribution = RdfNode::uri(resource_uri(ctx.config, dataset_id, resource)?);
        graph.add(
            dataset_ref.clone(),
            term(SCHEMA, schema::DISTRIBUTION),
            distribution.clone(),
        );
        add_distribution(ctx, graph, &distribution, resource);
    }
    Ok(())
}

fn add_distribution(
    ctx: &ExportContext<'_>,
    graph: &mut RdfGraph,
    distribution: &RdfNode,
    resource: &Resource,
) {
    graph.add_type(distribution, SCHEMA, schema::DATA_DOWNLOAD);
    graph.add_field(
        distribution,
        &term(SCHEMA, schema::NAME),
        resource,
        &["name"],
        ObjectKind::Literal,
    );
    graph.add_field(
        distribution,
        &term(SCHEMA, schema::ENCODING_FORMAT),
        resource,
        &["format", "mimetype"],
        ObjectKind::Literal,
    );
    graph.add_date(distribution, &term(SCHEMA, schema::DATE_CREATED), resource, &["created"]);
    graph.add_date(
        distribution,
        &term(SCHEMA, schema::DATE_MODIFIED),
        resource,
        &["last_modified"],
    );
    graph.add_field(
        distribution,
        &term(SCHEMA, schema::CONTENT_SIZE),
        resource,
        &["size"],
        ObjectKind::Literal,
    );

    if let Some(url) = resource.url() {
        if resource.field_str("resource_type") == Some("file") {
            graph.add_value(
                distribution,
                &term(SCHEMA, schema::CONTENT_URL),
                url,
                ObjectKind::Literal,
            );
        }
        graph.add_value(distribution, &term(SCHEMA, schema::URL), url, ObjectKind::Literal);
    }

    let description = ctx.descriptions.resource_descriptions(resource).join(" ");
    graph.add_value(
        distribution,
        &term(SCHEMA, schema::DESCRIPTION),
        &render_markdown(&description),
        ObjectKind::Literal,
    );
}

fn additional_fields(
    ctx: &ExportContext<'_>,
    graph: &mut RdfGraph,
    dataset_ref: &RdfNode,
    dataset: &Dataset,
) -> Result<()> {
    graph.add_value(
        dataset_ref,
        &term(SCHEMA, schema::IDENTIFIER),
        &dataset_url(ctx.config, dataset.require_name()?),
        ObjectKind::Literal,
    );

    let remarks = render_markdown(dataset.field_str("sszBemerkungen").unwrap_or_default());
    graph.add_value(dataset_ref, &term(SCHEMA, schema::TEXT), &remarks, ObjectKind::Literal);

    let description = term(SCHEMA, schema::DESCRIPTION);
    let notes = render_markdown(dataset.field_str("notes").unwrap_or_default());
    graph.remove_matching(dataset_ref, &description);
    graph.add_value(dataset_ref, &description, &notes, ObjectKind::Literal);

    for (field, predicate) in [
        ("author", schema::SOURCE_ORGANIZATION),
        ("data_publisher", schema::AUTHOR),
        ("spatialRelationship", schema::SPATIAL_COVERAGE),
    ] {
        graph.add_field(
            dataset_ref,
            &term(SCHEMA, predicate),
            dataset,
            &[field],
            ObjectKind::Literal,
        );
    }
    Ok(())
}
