//! Integration tests for the hooks the theme registers with the host:
//! schema conversion, search indexing, suggestions, vocabularies and
//! resource validation.

mod common;

use common::{test_config, velo_dataset};
use ogdzh::schema::{from_storage, to_storage};
use ogdzh::search::{after_dataset_show, before_dataset_index, SearchDoc};
use ogdzh::suggest::{autosuggest, StaticSuggester};
use ogdzh::validation::before_resource_create;
use ogdzh::vocabulary::{ensure_vocabularies, vocabulary_tags, MemoryVocabularyStore};
use ogdzh::{FieldSource, MemoryCatalog, Resource, ThemeError};
use serde_json::{json, Value};
use tempfile::TempDir;

fn index_document() -> SearchDoc {
    let velo = velo_dataset();
    let mut doc = SearchDoc::new();
    doc.insert("type".into(), json!("dataset"));
    doc.insert("name".into(), json!(velo.name()));
    doc.insert("license_id".into(), json!("cc-zero"));
    doc.insert("groups".into(), json!(["mobilitat"]));
    doc.insert("tags".into(), json!(["velo", "verkehr", "geodaten"]));
    for field in ["sszFields", "dateLastUpdated", "dateFirstPublished"] {
        doc.insert(field.into(), json!(velo.field_str(field)));
    }
    doc.insert(
        "validated_data_dict".into(),
        Value::from(serde_json::to_string(&velo).unwrap()),
    );
    doc
}

#[test]
fn test_index_document_is_enriched() {
    common::init_logging();
    let mut doc = index_document();
    before_dataset_index(&mut doc).unwrap();

    assert_eq!(doc["res_format"], json!(["csv", "wms"]));
    assert_eq!(doc["attribute_names"], json!(["FK_ZAEHLER", "VELO_IN"]));
    assert_eq!(
        doc["attribute_descriptions"],
        json!(["Zählstelle", "Velos stadteinwärts"])
    );
    assert!(!doc.contains_key("sszFields"));
    assert_eq!(doc["date_last_modified"], json!("2021-06-01T00:00:00Z"));
    assert_eq!(doc["date_first_published"], json!("2015-03-04T00:00:00Z"));
    assert_eq!(doc["cleaned_license_id"], json!("cczero"));
    assert_eq!(doc["cleaned_res_format"], json!(["csv", "wms"]));
}

#[test]
fn test_harvest_sources_are_not_indexed() {
    let mut doc = index_document();
    doc.insert("type".into(), json!("harvest"));
    let before = doc.clone();
    before_dataset_index(&mut doc).unwrap();
    assert_eq!(doc, before);
}

#[test]
fn test_schema_storage_roundtrip_keeps_fixture_fields() {
    let velo = velo_dataset();
    let stored = to_storage(&velo);

    assert!(!stored.fields.contains_key("timeRange"));
    assert!(stored
        .tags
        .iter()
        .any(|t| t.name == "taeglich" && t.vocabulary_id.as_deref() == Some("updateInterval")));

    let shown = from_storage(&stored);
    assert_eq!(shown.field_str("timeRange"), Some("2009-2021"));
    assert_eq!(shown.fields["updateInterval"], json!(["taeglich"]));
    assert_eq!(shown.fields["dataType"], json!(["Einzeldaten"]));
    assert_eq!(shown.tags.len(), 3);
}

#[test]
fn test_shown_dataset_links_uploads_to_permalink() {
    let mut velo = velo_dataset();
    after_dataset_show(&mut velo, &test_config());

    assert_eq!(velo.field_str("data_publisher"), Some("Tiefbauamt"));
    assert_eq!(
        velo.resources[0].url(),
        Some(
            "https://www.stadt-zuerich.ch/opendata/dataset/velo-zaehlungen/download/\
             2021_verkehrszaehlungen_werte_fussgaenger_velo.csv"
        )
    );
    assert!(velo.resources[1].url().unwrap().contains("/wms/"));
}

#[test]
fn test_autosuggest() {
    let engine = StaticSuggester::new(["Velozählung", "velo", "Verkehr", "Velo", "velo"]);
    assert_eq!(
        autosuggest(&engine, "vel", Some("groups:mobilitat")).unwrap(),
        vec!["Velo", "Velozählung", "velo"]
    );
    assert!(matches!(
        autosuggest(&engine, "  ", None),
        Err(ThemeError::Validation { .. })
    ));
}

#[test]
fn test_vocabulary_bootstrap_persists() {
    let dir = TempDir::new().unwrap();
    let state = dir.path().join("vocabularies.json");

    let mut store = MemoryVocabularyStore::load(&state).unwrap();
    let first = ensure_vocabularies(&mut store).unwrap();
    assert_eq!(first.created_vocabularies, vec!["updateInterval", "dataType"]);
    store.save(&state).unwrap();

    let mut reloaded = MemoryVocabularyStore::load(&state).unwrap();
    assert_eq!(reloaded, store);
    let second = ensure_vocabularies(&mut reloaded).unwrap();
    assert!(second.created_vocabularies.is_empty());
    assert_eq!(second.created_tags, 0);

    let tags = vocabulary_tags(&reloaded, "updateInterval").unwrap().unwrap();
    assert!(tags.contains(&"taeglich".to_string()));
    assert_eq!(vocabulary_tags(&reloaded, "unknown").unwrap(), None);
}

#[test]
fn test_duplicate_resource_name_is_rejected() {
    let catalog = MemoryCatalog::new(vec![velo_dataset()]);
    let mut resource = Resource::default();
    resource.set_field("name", "Zählstellen WMS");
    resource.set_field("url_type", "upload");

    let err =
        before_resource_create(&catalog, "velo-zaehlungen", &mut resource, Some("C:\\tmp\\wms.xml"))
            .unwrap_err();
    assert!(matches!(err, ThemeError::Validation { ref field, .. } if field == "resources"));
    assert_eq!(resource.filename(), Some("wms.xml"));

    let mut fresh = Resource::default();
    fresh.set_field("name", "2022.csv");
    before_resource_create(&catalog, "velo-zaehlungen", &mut fresh, None).unwrap();
}
