//! Integration tests for download permalinks and storage cleanup.

mod common;

use std::fs;
use std::path::Path;

use common::{dataset, test_config, velo_dataset};
use ogdzh::cleanup::{
    cleanup_datastore, cleanup_filestore, DatastoreApi, MemoryDatastore, TableMetadata,
};
use ogdzh::download::{
    resolve_download, upload_path, DownloadResponse, NOT_AUTHORIZED, NO_DOWNLOAD,
    RESOURCE_NOT_FOUND,
};
use ogdzh::{HostError, MemoryCatalog, ThemeError};
use serde_json::json;
use tempfile::TempDir;

const CSV_ID: &str = "1a2b3c4d-0000-4000-8000-000000000001";
const CSV_NAME: &str = "2021_verkehrszaehlungen_werte_fussgaenger_velo.csv";

fn catalog() -> MemoryCatalog {
    MemoryCatalog::new(vec![velo_dataset()])
}

fn store_upload(root: &Path, resource_id: &str) {
    let path = upload_path(root, resource_id);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "FK_ZAEHLER,VELO_IN\nY2H,12\n").unwrap();
}

#[test]
fn test_upload_is_served_from_storage() {
    common::init_logging();
    let storage = TempDir::new().unwrap();
    store_upload(storage.path(), CSV_ID);
    let config = test_config().with_storage_path(storage.path());

    let response = resolve_download(&catalog(), &config, "velo-zaehlungen", CSV_NAME).unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response,
        DownloadResponse::File {
            path: upload_path(storage.path(), CSV_ID),
            download_name: CSV_NAME.to_string(),
            content_type: Some("text/csv".to_string()),
        }
    );
}

#[test]
fn test_missing_upload_file_is_not_found() {
    let storage = TempDir::new().unwrap();
    let config = test_config().with_storage_path(storage.path());
    let response = resolve_download(&catalog(), &config, "velo-zaehlungen", CSV_NAME).unwrap();
    assert_eq!(response, DownloadResponse::NotFound(NO_DOWNLOAD.into()));
}

#[test]
fn test_link_resource_redirects() {
    let response =
        resolve_download(&catalog(), &test_config(), "velo-zaehlungen", "Zählstellen WMS").unwrap();
    assert_eq!(response.status(), 302);
    assert!(matches!(response, DownloadResponse::Redirect(ref url) if url.contains("/wms/")));
}

#[test]
fn test_unknown_names_are_not_found() {
    let config = test_config();
    for (package, resource) in [("velo-zaehlungen", "gibt-es-nicht.csv"), ("unbekannt", CSV_NAME)] {
        let response = resolve_download(&catalog(), &config, package, resource).unwrap();
        assert_eq!(response, DownloadResponse::NotFound(RESOURCE_NOT_FOUND.into()));
    }
}

#[test]
fn test_restricted_dataset_is_forbidden() {
    let catalog = catalog().with_restricted("velo-zaehlungen");
    let response = resolve_download(&catalog, &test_config(), "velo-zaehlungen", CSV_NAME).unwrap();
    assert_eq!(response, DownloadResponse::Forbidden(NOT_AUTHORIZED.into()));
    assert_eq!(response.status(), 403);
}

#[test]
fn test_s3_filestore_redirect_uses_munged_filename() {
    let record = dataset(json!({
        "id": "d-1",
        "name": "velo",
        "resources": [{
            "id": "r-1",
            "name": "Velo Daten",
            "filename": "Velo Zählung 2021.CSV",
            "url_type": "upload"
        }]
    }));
    let catalog = MemoryCatalog::new(vec![record]);
    let config = test_config().with_s3_filestore(true);

    let response = resolve_download(&catalog, &config, "velo", "Velo Daten").unwrap();
    assert_eq!(
        response,
        DownloadResponse::Redirect(
            "https://data.stadt-zuerich.ch/dataset/velo/resource/r-1/download/velo-zahlung-2021.csv"
                .into()
        )
    );
}

#[test]
fn test_filestore_cleanup_deletes_only_orphans() {
    let storage = TempDir::new().unwrap();
    let root = storage.path().join("resources");
    store_upload(storage.path(), CSV_ID);
    store_upload(storage.path(), "9f9f9f9f-dead-4bee-8000-000000000000");

    let dry = cleanup_filestore(&catalog(), &root, true).unwrap();
    assert_eq!(dry.deleted.len(), 1);
    assert!(dry.deleted[0].exists());
    assert!(dry.removed_dirs.is_empty());

    let report = cleanup_filestore(&catalog(), &root, false).unwrap();
    assert_eq!(report.kept, vec![upload_path(storage.path(), CSV_ID)]);
    assert!(!report.deleted[0].exists());
    // the orphan's <aaa>/<bbb> chain is now empty
    assert_eq!(report.removed_dirs.len(), 2);
    assert!(!root.join("9f9").exists());
    assert!(upload_path(storage.path(), CSV_ID).exists());
}

#[test]
fn test_filestore_cleanup_stops_when_not_authorized() {
    let storage = TempDir::new().unwrap();
    let root = storage.path().join("resources");
    store_upload(storage.path(), CSV_ID);

    let catalog = catalog().with_restricted("velo-zaehlungen");
    let err = cleanup_filestore(&catalog, &root, false).unwrap_err();
    assert!(matches!(err, ThemeError::NotAuthorized(_)));
    assert!(upload_path(storage.path(), CSV_ID).exists());
}

fn table(name: &str, alias_of: Option<&str>) -> TableMetadata {
    TableMetadata {
        name: name.to_string(),
        alias_of: alias_of.map(String::from),
    }
}

#[test]
fn test_datastore_cleanup_empties_orphaned_tables() {
    let mut tables = vec![
        table(CSV_ID, None),
        table("orphan-1", None),
        table("alias-of-orphan", Some("orphan-1")),
    ];
    // more than one page of metadata
    tables.extend((0..150).map(|i| table(&format!("gone-{i}"), None)));
    let mut datastore = MemoryDatastore::new(tables);

    let dry = cleanup_datastore(&catalog(), &mut datastore, true).unwrap();
    assert_eq!(dry.pages, 2);
    assert_eq!(dry.orphaned.len(), 151);
    assert!(dry.deleted.is_empty());
    assert!(datastore.emptied().is_empty());

    let report = cleanup_datastore(&catalog(), &mut datastore, false).unwrap();
    assert_eq!(report.deleted.len(), 151);
    assert!(!report.deleted.iter().any(|t| t == CSV_ID));
    assert!(!report.deleted.iter().any(|t| t == "alias-of-orphan"));
    assert!(report.failed.is_empty());
}

struct FlakyDatastore {
    inner: MemoryDatastore,
}

impl DatastoreApi for FlakyDatastore {
    fn table_metadata(&self, offset: usize) -> Result<Vec<TableMetadata>, HostError> {
        self.inner.table_metadata(offset)
    }

    fn datastore_delete(&mut self, resource_id: &str) -> Result<(), HostError> {
        if resource_id == "orphan-1" {
            return Err(HostError::Other("table is locked".into()));
        }
        self.inner.datastore_delete(resource_id)
    }
}

#[test]
fn test_datastore_delete_failures_are_recorded() {
    let mut datastore = FlakyDatastore {
        inner: MemoryDatastore::new(vec![table("orphan-1", None), table("orphan-2", None)]),
    };
    let report = cleanup_datastore(&catalog(), &mut datastore, false).unwrap();
    assert_eq!(report.deleted, vec!["orphan-2"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "orphan-1");
}
