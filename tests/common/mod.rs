//! Common test helpers and utilities shared across test suite.

use ogdzh::dcat::{term, RdfGraph, RdfNode};
use ogdzh::{Dataset, ThemeConfig};
use serde_json::Value;

/// Site URL used by all test configurations.
pub const SITE_URL: &str = "https://data.stadt-zuerich.ch";

/// Creates the configuration the portal runs with.
pub fn test_config() -> ThemeConfig {
    ThemeConfig::new()
        .with_site_url(SITE_URL)
        .with_frontend_url("https://www.stadt-zuerich.ch/opendata")
        .with_organization_slug("stadt-zurich")
}

/// Loads a dataset fixture from the test data directory.
pub fn load_dataset(filename: &str) -> Dataset {
    let path = format!("tests/data/{filename}");
    let json = std::fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {path}"));
    Dataset::from_json(&json).expect("fixture is a dataset")
}

/// The full-featured fixture used by most tests.
pub fn velo_dataset() -> Dataset {
    load_dataset("velo_dataset.json")
}

/// Builds a dataset from inline JSON.
#[allow(dead_code)]
pub fn dataset(value: Value) -> Dataset {
    serde_json::from_value(value).expect("valid dataset JSON")
}

/// URI node of a dataset exported with [`test_config`].
#[allow(dead_code)]
pub fn dataset_node(dataset: &Dataset) -> RdfNode {
    RdfNode::uri(format!("{SITE_URL}/dataset/{}", dataset.id().unwrap()))
}

/// All objects of `subject` for a namespaced predicate.
#[allow(dead_code)]
pub fn objects(graph: &RdfGraph, subject: &RdfNode, ns: &str, local: &str) -> Vec<RdfNode> {
    let predicate = term(ns, local);
    graph.objects(subject, &predicate).cloned().collect()
}

/// Initializes logging once per test binary.
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
