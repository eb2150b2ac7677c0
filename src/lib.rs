#![warn(missing_docs)]

//! # ogdzh: Open Data Zurich catalog theme
//!
//! Catalog-side logic of the Open Data Zurich portal: extension metadata
//! fields, tag vocabularies, search index hooks, download permalinks, RDF
//! export profiles and storage maintenance. The host platform is reached
//! through small traits ([`CatalogApi`], [`DatastoreApi`],
//! [`VocabularyStore`], [`Suggester`]).
//!
//! ## Quick Start
//!
//! ### Exporting a dataset as DCAT
//!
//! ```ignore
//! use ogdzh::{dataset_to_dcat, Dataset, RdfFormat, ThemeConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ThemeConfig::new()
//!     .with_site_url("https://data.stadt-zuerich.ch")
//!     .with_organization_slug("stadt-zurich");
//! let dataset = Dataset::from_json(&std::fs::read_to_string("velo.json")?)?;
//! let graph = dataset_to_dcat(&dataset, &config)?;
//! println!("{}", graph.serialize(RdfFormat::Turtle)?);
//! # Ok(())
//! # }
//! ```
//!
//! ### Resolving a download permalink
//!
//! ```ignore
//! use ogdzh::{resolve_download, MemoryCatalog, ThemeConfig};
//!
//! let catalog = MemoryCatalog::new(datasets);
//! let config = ThemeConfig::new().with_storage_path("/var/lib/ckan");
//! let response = resolve_download(&catalog, &config, "velo", "data.csv")?;
//! assert_eq!(response.status(), 200);
//! ```
//!
//! ## Modules
//!
//! - [`dcat`]: DCAT and Schema.org export profiles
//! - [`record`]: dataset and resource records
//! - [`schema`]: extension fields and their storage conversion
//! - [`validation`]: URL, date and e-mail validators
//! - [`search`]: search index hooks and facets
//! - [`suggest`]: search-term autosuggest
//! - [`vocabulary`]: `updateInterval` and `dataType` vocabularies
//! - [`download`]: download permalinks
//! - [`cleanup`]: orphaned datastore tables and uploads
//! - [`error`]: error types and result type

pub mod cleanup;
pub mod config;
pub mod dcat;
pub mod descriptions;
pub mod download;
pub mod error;
pub mod helpers;
pub mod host;
pub mod markdown;
pub mod record;
pub mod schema;
pub mod search;
pub mod suggest;
pub mod validation;
pub mod vocabulary;

pub use cleanup::{
    cleanup_datastore, cleanup_filestore, DatastoreApi, DatastoreCleanupReport,
    FilestoreCleanupReport, MemoryDatastore, TableMetadata,
};
pub use config::{RdfFormat, ThemeConfig};
pub use dcat::{
    dataset_to_dcat, dataset_to_schema_org, graph_from_catalog, ExportPipeline, ExportReport,
    Profile, RdfGraph, RdfNode,
};
pub use descriptions::ResourceDescriptions;
pub use download::{resolve_download, DownloadResponse};
pub use error::{Result, ThemeError};
pub use host::{CatalogApi, HostError, MemoryCatalog};
pub use markdown::render_markdown;
pub use record::{Dataset, FieldSource, Group, Organization, Resource, Tag};
pub use schema::{extend_schema, PackageSchema, SchemaAction};
pub use suggest::{autosuggest, Suggester};
pub use vocabulary::{ensure_vocabularies, MemoryVocabularyStore, VocabularyStore};
