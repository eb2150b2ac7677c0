//! Integration tests for the DCAT export profile.

mod common;

use common::{dataset, dataset_node, objects, test_config, velo_dataset, SITE_URL};
use ogdzh::dcat::{
    dataset_to_dcat, dcat, dct, graph_from_catalog, rdf_terms, schema, spdx, term, vcard, xsd,
    ExportPipeline, Profile, RdfGraph, RdfNode, DCAT, DCT, FREQUENCY_BASE, OGD_THEMES, RDF,
    SCHEMA, SPDX, VCARD,
};
use ogdzh::{RdfFormat, ResourceDescriptions, ThemeError};
use serde_json::json;

fn export(dataset: &ogdzh::Dataset) -> RdfGraph {
    dataset_to_dcat(dataset, &test_config()).expect("export succeeds")
}

fn distribution_node(dataset_id: &str, resource_id: &str) -> RdfNode {
    RdfNode::uri(format!(
        "{SITE_URL}/dataset/{dataset_id}/resource/{resource_id}"
    ))
}

fn minimal(extra: serde_json::Value) -> ogdzh::Dataset {
    let mut base = json!({"id": "d-1", "name": "minimal", "title": "Minimal"});
    if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
        base.extend(extra.clone());
    }
    dataset(base)
}

#[test]
fn test_dataset_type_and_identification() {
    common::init_logging();
    let velo = velo_dataset();
    let graph = export(&velo);
    let node = dataset_node(&velo);

    assert!(graph.contains(
        &node,
        &term(RDF, rdf_terms::TYPE),
        &RdfNode::class(DCAT, dcat::DATASET)
    ));
    assert_eq!(
        objects(&graph, &node, DCT, dct::IDENTIFIER),
        vec![RdfNode::literal(
            "8f2b1c4e-7d3a-4e8b-9c1f-2a6d5e4b3c21@stadt-zurich"
        )]
    );
    assert_eq!(
        objects(&graph, &node, DCT, dct::TITLE),
        vec![RdfNode::literal_with_lang(
            "Daten der automatischen Velozählung",
            "de"
        )]
    );
    assert_eq!(
        objects(&graph, &node, DCAT, dcat::LANDING_PAGE),
        vec![RdfNode::literal(format!("{SITE_URL}/dataset/velo-zaehlungen"))]
    );
}

#[test]
fn test_dates_prefer_display_dates() {
    let velo = velo_dataset();
    let graph = export(&velo);
    let node = dataset_node(&velo);

    assert_eq!(
        objects(&graph, &node, DCT, dct::ISSUED),
        vec![RdfNode::xsd_literal("2015-03-04T00:00:00", xsd::DATE_TIME)]
    );
    assert_eq!(
        objects(&graph, &node, DCT, dct::MODIFIED),
        vec![RdfNode::xsd_literal("2021-06-01T00:00:00", xsd::DATE_TIME)]
    );
}

#[test]
fn test_unparseable_date_is_kept_as_literal() {
    let record = minimal(json!({"dateLastUpdated": "irgendwann"}));
    let graph = export(&record);
    assert_eq!(
        objects(&graph, &dataset_node(&record), DCT, dct::MODIFIED),
        vec![RdfNode::literal("irgendwann")]
    );
}

#[test]
fn test_update_interval_maps_to_frequency() {
    let velo = velo_dataset();
    let graph = export(&velo);
    assert_eq!(
        objects(&graph, &dataset_node(&velo), DCT, dct::ACCRUAL_PERIODICITY),
        vec![RdfNode::uri(format!("{FREQUENCY_BASE}daily"))]
    );

    let unmapped = minimal(json!({"updateInterval": ["   "]}));
    let graph = export(&unmapped);
    assert!(objects(&graph, &dataset_node(&unmapped), DCT, dct::ACCRUAL_PERIODICITY).is_empty());
}

#[test]
fn test_no_time_range_means_no_temporal_node() {
    for record in [
        minimal(json!({})),
        minimal(json!({"timeRange": ""})),
        minimal(json!({"timeRange": "abc"})),
    ] {
        let graph = export(&record);
        assert!(objects(&graph, &dataset_node(&record), DCT, dct::TEMPORAL).is_empty());
        assert!(graph
            .subjects_with(&term(SCHEMA, schema::START_DATE))
            .next()
            .is_none());
    }
}

#[test]
fn test_time_range_single_year_and_span() {
    for (raw, start, end) in [
        ("2015", "2015-01-01", "2015-12-31"),
        ("2015-2018", "2015-01-01", "2018-12-31"),
    ] {
        let record = minimal(json!({"timeRange": raw}));
        let graph = export(&record);
        let temporal = objects(&graph, &dataset_node(&record), DCT, dct::TEMPORAL);
        assert_eq!(temporal.len(), 1, "timeRange {raw}");
        let period = &temporal[0];
        assert!(period.is_blank());
        assert_eq!(
            objects(&graph, period, SCHEMA, schema::START_DATE),
            vec![RdfNode::xsd_literal(start, xsd::DATE)]
        );
        assert_eq!(
            objects(&graph, period, SCHEMA, schema::END_DATE),
            vec![RdfNode::xsd_literal(end, xsd::DATE)]
        );
    }
}

#[test]
fn test_service_formats_have_no_download_url() {
    let velo = velo_dataset();
    let graph = export(&velo);
    let dataset_id = velo.id().unwrap();

    let csv = distribution_node(dataset_id, "1a2b3c4d-0000-4000-8000-000000000001");
    let access = objects(&graph, &csv, DCAT, dcat::ACCESS_URL);
    let download = objects(&graph, &csv, DCAT, dcat::DOWNLOAD_URL);
    assert_eq!(access.len(), 1);
    assert_eq!(access, download);

    let wms = distribution_node(dataset_id, "1a2b3c4d-0000-4000-8000-000000000002");
    assert_eq!(objects(&graph, &wms, DCAT, dcat::ACCESS_URL).len(), 1);
    assert!(objects(&graph, &wms, DCAT, dcat::DOWNLOAD_URL).is_empty());
}

#[test]
fn test_xml_format_has_no_download_url() {
    let record = minimal(json!({"resources": [
        {"id": "r-xml", "url": "https://example.org/feed", "format": "XML"},
        {"id": "r-csv", "url": "https://example.org/feed", "format": "CSV"}
    ]}));
    let graph = export(&record);

    let xml = distribution_node("d-1", "r-xml");
    assert_eq!(
        objects(&graph, &xml, DCAT, dcat::ACCESS_URL),
        vec![RdfNode::literal("https://example.org/feed")]
    );
    assert!(objects(&graph, &xml, DCAT, dcat::DOWNLOAD_URL).is_empty());

    let csv = distribution_node("d-1", "r-csv");
    assert_eq!(
        objects(&graph, &csv, DCAT, dcat::DOWNLOAD_URL),
        objects(&graph, &csv, DCAT, dcat::ACCESS_URL)
    );
}

#[test]
fn test_rights_follow_dataset_license() {
    let record = minimal(json!({
        "license_id": "cc-by",
        "resources": [{"id": "r-1", "url": "https://example.org/a.csv"}]
    }));
    let graph = export(&record);
    let distribution = distribution_node("d-1", "r-1");
    let expected = vec![RdfNode::literal(
        "NonCommercialAllowed-CommercialAllowed-ReferenceRequired",
    )];
    assert_eq!(objects(&graph, &distribution, DCT, dct::RIGHTS), expected);
    assert_eq!(objects(&graph, &distribution, DCT, dct::LICENSE), expected);

    let unmapped = minimal(json!({
        "license_id": "odc-odbl",
        "resources": [{"id": "r-1", "url": "https://example.org/a.csv"}]
    }));
    let graph = export(&unmapped);
    assert!(objects(&graph, &distribution, DCT, dct::RIGHTS).is_empty());
}

#[test]
fn test_byte_size_and_format() {
    let velo = velo_dataset();
    let graph = export(&velo);
    let csv = distribution_node(velo.id().unwrap(), "1a2b3c4d-0000-4000-8000-000000000001");

    assert_eq!(
        objects(&graph, &csv, DCAT, dcat::BYTE_SIZE),
        vec![RdfNode::xsd_literal("1048576.0", xsd::DECIMAL)]
    );
    assert_eq!(objects(&graph, &csv, DCT, dct::FORMAT), vec![RdfNode::literal("CSV")]);
    assert_eq!(
        objects(&graph, &csv, DCAT, dcat::MEDIA_TYPE),
        vec![RdfNode::literal("text/csv")]
    );

    let mime_only = minimal(json!({"resources": [{"id": "r-1", "format": "text/csv"}]}));
    let graph = export(&mime_only);
    let distribution = distribution_node("d-1", "r-1");
    assert!(objects(&graph, &distribution, DCT, dct::FORMAT).is_empty());
    assert_eq!(
        objects(&graph, &distribution, DCAT, dcat::MEDIA_TYPE),
        vec![RdfNode::literal("text/csv")]
    );
}

#[test]
fn test_checksum_algorithm_uri_or_literal() {
    let velo = velo_dataset();
    let graph = export(&velo);
    let dataset_id = velo.id().unwrap();

    let checksum_of = |resource_id: &str| {
        let distribution = distribution_node(dataset_id, resource_id);
        let nodes = objects(&graph, &distribution, SPDX, spdx::CHECKSUM);
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].is_blank());
        nodes[0].clone()
    };

    let md5_uri = checksum_of("1a2b3c4d-0000-4000-8000-000000000001");
    assert_eq!(
        objects(&graph, &md5_uri, SPDX, spdx::ALGORITHM),
        vec![RdfNode::uri("http://spdx.org/rdf/terms#checksumAlgorithm_md5")]
    );
    assert_eq!(
        objects(&graph, &md5_uri, SPDX, spdx::CHECKSUM_VALUE),
        vec![RdfNode::xsd_literal(
            "9e107d9d372bb6826bd81d3542a419d6",
            xsd::HEX_BINARY
        )]
    );

    let md5_literal = checksum_of("1a2b3c4d-0000-4000-8000-000000000002");
    assert_eq!(
        objects(&graph, &md5_literal, SPDX, spdx::ALGORITHM),
        vec![RdfNode::literal("md5")]
    );
}

#[test]
fn test_geodata_tag_adds_geography_theme() {
    let record = minimal(json!({"tags": [{"name": "geodaten"}], "groups": []}));
    let graph = export(&record);
    assert_eq!(
        objects(&graph, &dataset_node(&record), DCAT, dcat::THEME),
        vec![RdfNode::uri(format!("{OGD_THEMES}geography"))]
    );

    let velo = velo_dataset();
    let graph = export(&velo);
    let themes = objects(&graph, &dataset_node(&velo), DCAT, dcat::THEME);
    assert!(themes.contains(&RdfNode::uri(format!("{OGD_THEMES}geography"))));
    assert!(themes.contains(&RdfNode::uri(format!("{OGD_THEMES}mobility"))));
}

#[test]
fn test_contact_point() {
    let velo = velo_dataset();
    let graph = export(&velo);
    let contact = objects(&graph, &dataset_node(&velo), DCAT, dcat::CONTACT_POINT);
    assert_eq!(contact.len(), 1);
    assert_eq!(
        objects(&graph, &contact[0], VCARD, vcard::FN),
        vec![RdfNode::literal("Mobilität und Verkehr")]
    );
    assert_eq!(
        objects(&graph, &contact[0], VCARD, vcard::HAS_EMAIL),
        vec![RdfNode::uri("velo@zuerich.ch")]
    );

    let anonymous = minimal(json!({}));
    let graph = export(&anonymous);
    assert!(objects(&graph, &dataset_node(&anonymous), DCAT, dcat::CONTACT_POINT).is_empty());
}

#[test]
fn test_malformed_email_is_skipped_and_graph_serializes() {
    let record = minimal(json!({
        "maintainer": "Velo Team",
        "maintainer_email": "Velo Team <velo@zuerich.ch>"
    }));
    let graph = export(&record);
    let contact = objects(&graph, &dataset_node(&record), DCAT, dcat::CONTACT_POINT);
    assert_eq!(contact.len(), 1);
    assert!(objects(&graph, &contact[0], VCARD, vcard::HAS_EMAIL).is_empty());
    assert_eq!(
        objects(&graph, &contact[0], VCARD, vcard::FN),
        vec![RdfNode::literal("Velo Team")]
    );
    assert!(graph.serialize(RdfFormat::Turtle).is_ok());
    assert!(graph.serialize(RdfFormat::RdfXml).is_ok());
}

#[test]
fn test_bare_http_algorithm_is_a_literal() {
    let record = minimal(json!({"resources": [
        {"id": "r-1", "url": "https://example.org/a.csv", "format": "CSV",
         "hash": "abc123", "hash_algorithm": "http"}
    ]}));
    let graph = export(&record);
    let checksum = objects(&graph, &distribution_node("d-1", "r-1"), SPDX, spdx::CHECKSUM);
    assert_eq!(checksum.len(), 1);
    assert_eq!(
        objects(&graph, &checksum[0], SPDX, spdx::ALGORITHM),
        vec![RdfNode::literal("http")]
    );
    assert!(graph.serialize(RdfFormat::NTriples).is_ok());
}

#[test]
fn test_keywords_are_language_tagged() {
    let velo = velo_dataset();
    let graph = export(&velo);
    let keywords = objects(&graph, &dataset_node(&velo), DCAT, dcat::KEYWORD);
    assert_eq!(keywords.len(), 3);
    assert!(keywords.contains(&RdfNode::literal_with_lang("velo", "de")));
}

#[test]
fn test_export_is_idempotent() {
    let velo = velo_dataset();
    let first = export(&velo);
    let second = export(&velo);
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_missing_id_is_an_error() {
    let record = dataset(json!({"name": "ohne-id", "uri": "https://example.org/ohne-id"}));
    let err = dataset_to_dcat(&record, &test_config()).unwrap_err();
    assert!(matches!(err, ThemeError::InvalidRecord(_)));
}

#[test]
fn test_relative_dataset_uri_is_an_error() {
    let record = minimal(json!({"uri": "dataset/minimal"}));
    let err = dataset_to_dcat(&record, &test_config()).unwrap_err();
    assert!(matches!(err, ThemeError::InvalidRecord(_)));
}

#[test]
fn test_failed_export_leaves_graph_untouched() {
    let config = test_config();
    let descriptions = ResourceDescriptions::builtin().unwrap();
    let pipeline = ExportPipeline::new(&config, &descriptions).with_profile(Profile::SwissDcat);
    let mut graph = RdfGraph::new();

    // the resource has no id, so the distributions step fails
    let record = minimal(json!({"resources": [{"name": "ohne-id"}]}));
    let node = dataset_node(&record);
    assert!(pipeline.graph_from_dataset(&record, &node, &mut graph).is_err());
    assert!(graph.is_empty());
}

#[test]
fn test_report_counts_steps() {
    let config = test_config();
    let descriptions = ResourceDescriptions::builtin().unwrap();
    let pipeline = ExportPipeline::new(&config, &descriptions).with_profile(Profile::SwissDcat);
    let velo = velo_dataset();
    let mut graph = RdfGraph::new();
    let report = pipeline
        .graph_from_dataset(&velo, &dataset_node(&velo), &mut graph)
        .unwrap();

    assert_eq!(report.steps.len(), 12);
    assert_eq!(usize::try_from(report.total_triples()).unwrap(), graph.len());
    assert_eq!(
        report.step(Profile::SwissDcat, "temporal").map(|s| s.net_triples),
        Some(4)
    );
}

#[test]
fn test_catalog_links_datasets() {
    let config = test_config();
    let descriptions = ResourceDescriptions::builtin().unwrap();
    let pipeline = ExportPipeline::new(&config, &descriptions).with_profile(Profile::SwissDcat);
    let datasets = vec![velo_dataset(), minimal(json!({}))];
    let mut graph = RdfGraph::new();
    graph_from_catalog(&pipeline, &datasets, &mut graph).unwrap();

    let catalog = RdfNode::uri(SITE_URL);
    assert!(graph.contains(
        &catalog,
        &term(RDF, rdf_terms::TYPE),
        &RdfNode::class(DCAT, dcat::CATALOG)
    ));
    assert_eq!(
        objects(&graph, &catalog, DCAT, dcat::DATASET_PROPERTY).len(),
        2
    );
}

#[test]
fn test_turtle_round_trip() {
    let velo = velo_dataset();
    let graph = export(&velo);
    let turtle = graph.serialize(RdfFormat::Turtle).unwrap();
    assert!(turtle.contains("@prefix dcat:"));
    assert!(turtle.contains("<velo@zuerich.ch>"));
    let parsed = RdfGraph::parse(&turtle, RdfFormat::Turtle).unwrap();
    assert_eq!(parsed.len(), graph.len());
}
